//! Project language, runtime, and template filter identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Languages a function project can be written in.
///
/// The string forms match the `language` field used by the template catalog
/// (for example `"C#"` or `"JavaScript"`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProjectLanguage {
    Bash,
    Batch,
    #[serde(rename = "C#")]
    CSharp,
    #[serde(rename = "C#Script")]
    CSharpScript,
    #[serde(rename = "F#")]
    FSharp,
    #[serde(rename = "F#Script")]
    FSharpScript,
    Java,
    JavaScript,
    #[serde(rename = "PHP")]
    Php,
    PowerShell,
    Python,
    TypeScript,
}

impl ProjectLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectLanguage::Bash => "Bash",
            ProjectLanguage::Batch => "Batch",
            ProjectLanguage::CSharp => "C#",
            ProjectLanguage::CSharpScript => "C#Script",
            ProjectLanguage::FSharp => "F#",
            ProjectLanguage::FSharpScript => "F#Script",
            ProjectLanguage::Java => "Java",
            ProjectLanguage::JavaScript => "JavaScript",
            ProjectLanguage::Php => "PHP",
            ProjectLanguage::PowerShell => "PowerShell",
            ProjectLanguage::Python => "Python",
            ProjectLanguage::TypeScript => "TypeScript",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![
            ProjectLanguage::JavaScript,
            ProjectLanguage::CSharp,
            ProjectLanguage::CSharpScript,
            ProjectLanguage::FSharpScript,
            ProjectLanguage::Java,
            ProjectLanguage::Python,
            ProjectLanguage::TypeScript,
            ProjectLanguage::PowerShell,
            ProjectLanguage::Php,
            ProjectLanguage::Bash,
            ProjectLanguage::Batch,
            ProjectLanguage::FSharp,
        ]
    }

    /// Language name as tagged in the catalog.
    ///
    /// The catalog does not distinguish compiled from script variants, so
    /// `C#Script` and `F#Script` are looked up as `C#` and `F#`.
    pub fn catalog_name(&self) -> &'static str {
        match self {
            ProjectLanguage::CSharpScript => ProjectLanguage::CSharp.as_str(),
            ProjectLanguage::FSharpScript => ProjectLanguage::FSharp.as_str(),
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ProjectLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectLanguage {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| TemplateError::UnknownValue {
                kind: "project language",
                value: s.to_string(),
            })
    }
}

/// Azure Functions host runtime versions with their own template catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum ProjectRuntime {
    #[default]
    #[serde(rename = "~1")]
    V1,
    #[serde(rename = "~2")]
    V2,
    #[serde(rename = "beta")]
    Beta,
}

impl ProjectRuntime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRuntime::V1 => "~1",
            ProjectRuntime::V2 => "~2",
            ProjectRuntime::Beta => "beta",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![ProjectRuntime::V1, ProjectRuntime::V2, ProjectRuntime::Beta]
    }

    pub fn is_default(&self) -> bool {
        *self == ProjectRuntime::default()
    }
}

impl fmt::Display for ProjectRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectRuntime {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "~1" | "v1" | "1" => Ok(ProjectRuntime::V1),
            "~2" | "v2" | "2" => Ok(ProjectRuntime::V2),
            "beta" => Ok(ProjectRuntime::Beta),
            _ => Err(TemplateError::UnknownValue {
                kind: "project runtime",
                value: s.to_string(),
            }),
        }
    }
}

/// Which subset of a language's templates to offer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TemplateFilter {
    All,
    Core,
    #[default]
    Verified,
}

impl TemplateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateFilter::All => "All",
            TemplateFilter::Core => "Core",
            TemplateFilter::Verified => "Verified",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![TemplateFilter::Verified, TemplateFilter::Core, TemplateFilter::All]
    }

    /// Parse a filter name, falling back to [`TemplateFilter::Verified`] for
    /// anything unrecognized.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => TemplateFilter::All,
            "core" => TemplateFilter::Core,
            _ => TemplateFilter::Verified,
        }
    }
}

impl fmt::Display for TemplateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category tags used in template metadata.
pub struct TemplateCategory;

impl TemplateCategory {
    pub const CORE: &'static str = "$temp_category_core";
    pub const DATA_PROCESSING: &'static str = "$temp_category_dataProcessing";
    pub const API_AND_WEBHOOKS: &'static str = "$temp_category_api";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trip() {
        for language in ProjectLanguage::all() {
            assert_eq!(language.as_str().parse::<ProjectLanguage>().unwrap(), language);
        }
        assert_eq!("javascript".parse::<ProjectLanguage>().unwrap(), ProjectLanguage::JavaScript);
        assert!("Cobol".parse::<ProjectLanguage>().is_err());
    }

    #[test]
    fn test_catalog_name_strips_script() {
        assert_eq!(ProjectLanguage::CSharpScript.catalog_name(), "C#");
        assert_eq!(ProjectLanguage::FSharpScript.catalog_name(), "F#");
        assert_eq!(ProjectLanguage::JavaScript.catalog_name(), "JavaScript");
        assert_eq!(ProjectLanguage::TypeScript.catalog_name(), "TypeScript");
    }

    #[test]
    fn test_runtime_parse() {
        assert_eq!("~1".parse::<ProjectRuntime>().unwrap(), ProjectRuntime::V1);
        assert_eq!("beta".parse::<ProjectRuntime>().unwrap(), ProjectRuntime::Beta);
        assert!(ProjectRuntime::V1.is_default());
        assert!(!ProjectRuntime::Beta.is_default());
    }

    #[test]
    fn test_filter_falls_back_to_verified() {
        assert_eq!(TemplateFilter::parse_or_default("core"), TemplateFilter::Core);
        assert_eq!(TemplateFilter::parse_or_default("All"), TemplateFilter::All);
        assert_eq!(TemplateFilter::parse_or_default("bogus"), TemplateFilter::Verified);
    }
}
