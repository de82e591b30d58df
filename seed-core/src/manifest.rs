//! Template metadata rewriting
//!
//! Two whole-file rewrites run against the freshly cloned template: the
//! `package.json` manifest gets the new name and description while every
//! other field keeps its value and position, and the README is replaced
//! outright with a heading plus the description.

use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use crate::{Error, Result};

/// Rewrite the manifest and README inside `dir` for the new repository
pub fn rewrite_metadata(dir: &Path, name: &str, description: &str) -> Result<()> {
    rewrite_manifest(&dir.join("package.json"), name, description)?;
    rewrite_readme(&dir.join("README.md"), name, description)?;
    Ok(())
}

/// Overwrite the `name` and `description` fields of a `package.json`,
/// preserving all other fields and their order.
pub fn rewrite_manifest(path: &Path, name: &str, description: &str) -> Result<()> {
    let contents = fs::read_to_string(path)
        .map_err(|e| Error::LocalGit(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut manifest: Value = serde_json::from_str(&contents)
        .map_err(|e| Error::LocalGit(format!("{} is not valid JSON: {}", path.display(), e)))?;

    let fields = manifest.as_object_mut().ok_or_else(|| {
        Error::LocalGit(format!("{} does not contain a JSON object", path.display()))
    })?;

    // Inserting over an existing key keeps its position in the map
    fields.insert("name".to_string(), json!(name));
    fields.insert("description".to_string(), json!(description));

    let rewritten = serde_json::to_string_pretty(&manifest)?;
    fs::write(path, rewritten)?;

    Ok(())
}

/// Replace the README wholesale with a two-line heading + description
pub fn rewrite_readme(path: &Path, name: &str, description: &str) -> Result<()> {
    fs::write(path, format!("# {}\n\n{}\n", name, description))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TEMPLATE_MANIFEST: &str = r#"{
  "name": "template-app",
  "version": "1.0.0",
  "description": "a template",
  "main": "index.js",
  "scripts": {
    "test": "jest"
  },
  "license": "MIT"
}"#;

    #[test]
    fn test_manifest_fields_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, TEMPLATE_MANIFEST).unwrap();

        rewrite_manifest(&path, "demo-app", "demo").unwrap();

        let manifest: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(manifest["name"], "demo-app");
        assert_eq!(manifest["description"], "demo");
        assert_eq!(manifest["version"], "1.0.0");
        assert_eq!(manifest["scripts"]["test"], "jest");
    }

    #[test]
    fn test_manifest_key_order_preserved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, TEMPLATE_MANIFEST).unwrap();

        rewrite_manifest(&path, "demo-app", "demo").unwrap();

        let manifest: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<&str> = manifest
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            ["name", "version", "description", "main", "scripts", "license"]
        );
    }

    #[test]
    fn test_manifest_not_an_object_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let result = rewrite_manifest(&path, "demo-app", "demo");
        assert!(matches!(result, Err(Error::LocalGit(_))));
    }

    #[test]
    fn test_readme_replaced_exactly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README.md");
        fs::write(&path, "old template docs\nwith several lines\n").unwrap();

        rewrite_readme(&path, "demo-app", "demo").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "# demo-app\n\ndemo\n");
    }

    #[test]
    fn test_rewrite_metadata_touches_both_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), TEMPLATE_MANIFEST).unwrap();
        fs::write(dir.path().join("README.md"), "old").unwrap();

        rewrite_metadata(dir.path(), "demo-app", "demo").unwrap();

        let manifest: Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("package.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["name"], "demo-app");
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "# demo-app\n\ndemo\n"
        );
    }
}
