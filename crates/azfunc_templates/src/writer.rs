//! Writing a materialized function into a project.

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{TemplateError, TemplateResult};
use crate::template::MaterializedFunction;

fn function_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z\d_\-]*$").unwrap())
}

/// First free `{base}{n}` name in the project, where `base` is the default
/// name without its trailing digits (`HttpTriggerJS1` → `HttpTriggerJS2`
/// when `HttpTriggerJS1` is taken).
pub fn unique_function_name(project_path: &Path, default_name: &str) -> String {
    let base = default_name.trim_end_matches(|c: char| c.is_ascii_digit());
    let mut index = 1;
    loop {
        let candidate = format!("{}{}", base, index);
        if !project_path.join(&candidate).exists() {
            return candidate;
        }
        index += 1;
    }
}

/// Validation message for a function name, or `None` when it is usable.
pub fn validate_function_name(project_path: &Path, name: &str) -> Option<String> {
    if name.is_empty() {
        Some("A function name is required.".to_string())
    } else if !function_name_pattern().is_match(name) {
        Some(format!(
            "Function name must start with a letter and can contain letters, digits, '_' and '-'. Got: {}",
            name
        ))
    } else if project_path.join(name).exists() {
        Some(format!("A function with the name '{}' already exists.", name))
    } else {
        None
    }
}

/// Write the function's files and `function.json` into
/// `{project_path}/{function_name}`. The directory must not exist yet.
pub fn write_function(
    project_path: &Path,
    function_name: &str,
    function: &MaterializedFunction,
) -> TemplateResult<Vec<PathBuf>> {
    if !function_name_pattern().is_match(function_name) {
        return Err(TemplateError::InvalidFunctionName(function_name.to_string()));
    }

    if let Some(name) = function.files.keys().find(|name| !is_relative_file(name)) {
        return Err(TemplateError::UnsafeFilePath(name.clone()));
    }

    let function_dir = project_path.join(function_name);
    if function_dir.exists() {
        return Err(TemplateError::AlreadyExists(function_dir));
    }
    fs::create_dir_all(&function_dir)?;

    let mut created_files = Vec::new();
    for (name, content) in &function.files {
        let target = function_dir.join(name);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, content)?;
        debug!("Wrote {:?}", target);
        created_files.push(target);
    }

    let function_json = function_dir.join("function.json");
    fs::write(
        &function_json,
        serde_json::to_string_pretty(&function.function_json)?,
    )?;
    created_files.push(function_json);

    info!("Created function {} ({} files)", function_name, created_files.len());
    Ok(created_files)
}

/// A file name that stays below the directory it is joined onto.
fn is_relative_file(name: &str) -> bool {
    let path = Path::new(name);
    path.components().next().is_some()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    #[test]
    fn test_unique_function_name() {
        let temp = tempdir().unwrap();
        assert_eq!(unique_function_name(temp.path(), "HttpTriggerJS1"), "HttpTriggerJS1");

        fs::create_dir(temp.path().join("HttpTriggerJS1")).unwrap();
        fs::create_dir(temp.path().join("HttpTriggerJS2")).unwrap();
        assert_eq!(unique_function_name(temp.path(), "HttpTriggerJS1"), "HttpTriggerJS3");
    }

    #[test]
    fn test_validate_function_name() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("Taken")).unwrap();

        assert!(validate_function_name(temp.path(), "").is_some());
        assert!(validate_function_name(temp.path(), "1abc").is_some());
        assert!(validate_function_name(temp.path(), "Taken").is_some());
        assert_eq!(validate_function_name(temp.path(), "My_Func-1"), None);
    }

    #[test]
    fn test_write_function() {
        let temp = tempdir().unwrap();
        let function = MaterializedFunction {
            files: BTreeMap::from([("index.js".to_string(), "// hi\n".to_string())]),
            function_json: json!({ "bindings": [] }),
        };

        let created = write_function(temp.path(), "Hello", &function).unwrap();
        assert_eq!(created.len(), 2);
        assert_eq!(fs::read_to_string(temp.path().join("Hello/index.js")).unwrap(), "// hi\n");
        let written: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(temp.path().join("Hello/function.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written, json!({ "bindings": [] }));

        assert!(matches!(
            write_function(temp.path(), "Hello", &function),
            Err(TemplateError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_write_function_rejects_escaping_paths() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("proj");
        fs::create_dir(&project).unwrap();

        for name in ["../../escaped.txt", "/tmp/absolute.txt", "lib/../../up.txt"] {
            let function = MaterializedFunction {
                files: BTreeMap::from([(name.to_string(), "x".to_string())]),
                function_json: json!({ "bindings": [] }),
            };
            assert!(matches!(
                write_function(&project, "Hello", &function),
                Err(TemplateError::UnsafeFilePath(_))
            ));
        }

        assert!(!temp.path().join("escaped.txt").exists());
        assert!(!project.join("Hello").exists());
    }

    #[test]
    fn test_write_function_allows_nested_files() {
        let temp = tempdir().unwrap();
        let function = MaterializedFunction {
            files: BTreeMap::from([("lib/util.js".to_string(), "// util\n".to_string())]),
            function_json: json!({ "bindings": [] }),
        };

        write_function(temp.path(), "Nested", &function).unwrap();
        assert!(temp.path().join("Nested/lib/util.js").exists());
    }
}
