use crate::{Error, Result};
use projdeck_types::ProjectStatus;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Per-project declaration file name.
pub const DECLARATION_FILE: &str = "catalogue.json";

/// Optional screenshot asset name, detected as a sibling of the declaration.
pub const SCREENSHOT_FILE: &str = "screenshot.png";

/// Raw on-disk shape of the declaration. Every key is optional; unknown
/// keys are ignored. `description` is a legacy alias for `oneLiner`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawDeclaration {
    id: Option<String>,
    title: Option<String>,
    one_liner: Option<String>,
    description: Option<String>,
    kind: Option<String>,
    categories: Vec<String>,
    tags: Vec<String>,
    status: Option<String>,
}

/// A parsed declaration with defaults applied. The folder name backs every
/// strictly-required concept, so a valid JSON object never hard-fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub id: String,
    pub title: String,
    pub one_liner: String,
    pub kind: String,
    pub categories: BTreeSet<String>,
    pub tags: BTreeSet<String>,
    pub status: ProjectStatus,
}

/// Read and parse the declaration file directly inside `dir`.
///
/// Returns `Ok(None)` when the file is absent (the directory is simply not
/// a project root). A present but unparsable file is an `Error::Parse`; the
/// scanner reports it as a warning and excludes the directory.
pub fn load_declaration(dir: &Path) -> Result<Option<Declaration>> {
    let path = dir.join(DECLARATION_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path)?;
    let raw: RawDeclaration = serde_json::from_str(&content)
        .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;

    let folder_name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.display().to_string());

    Ok(Some(Declaration {
        id: raw.id.filter(|s| !s.is_empty()).unwrap_or_else(|| folder_name.clone()),
        title: raw.title.filter(|s| !s.is_empty()).unwrap_or(folder_name),
        one_liner: raw.one_liner.or(raw.description).unwrap_or_default(),
        kind: raw.kind.unwrap_or_else(|| "project".to_string()),
        categories: raw.categories.into_iter().collect(),
        tags: raw.tags.into_iter().collect(),
        status: raw
            .status
            .as_deref()
            .map(ProjectStatus::parse_lenient)
            .unwrap_or_default(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_declaration(dir: &Path, content: &str) {
        std::fs::write(dir.join(DECLARATION_FILE), content).unwrap();
    }

    #[test]
    fn absent_file_is_not_a_project() {
        let tmp = TempDir::new().unwrap();
        assert!(load_declaration(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn empty_object_falls_back_to_folder_name() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("my-project");
        std::fs::create_dir(&dir).unwrap();
        write_declaration(&dir, "{}");

        let decl = load_declaration(&dir).unwrap().unwrap();
        assert_eq!(decl.id, "my-project");
        assert_eq!(decl.title, "my-project");
        assert_eq!(decl.one_liner, "");
        assert_eq!(decl.kind, "project");
        assert!(decl.categories.is_empty());
        assert!(decl.tags.is_empty());
        assert_eq!(decl.status, ProjectStatus::Unknown);
    }

    #[test]
    fn recognized_fields_populate_and_unknown_keys_are_ignored() {
        let tmp = TempDir::new().unwrap();
        write_declaration(
            tmp.path(),
            r#"{
                "id": "proj-1",
                "title": "Project One",
                "oneLiner": "does a thing",
                "kind": "tool",
                "categories": ["TOOLS"],
                "tags": ["rust", "cli"],
                "status": "active",
                "somethingElse": {"nested": true}
            }"#,
        );

        let decl = load_declaration(tmp.path()).unwrap().unwrap();
        assert_eq!(decl.id, "proj-1");
        assert_eq!(decl.title, "Project One");
        assert_eq!(decl.one_liner, "does a thing");
        assert_eq!(decl.kind, "tool");
        assert_eq!(decl.status, ProjectStatus::Active);
        assert!(decl.tags.contains("cli"));
    }

    #[test]
    fn description_is_a_one_liner_alias() {
        let tmp = TempDir::new().unwrap();
        write_declaration(tmp.path(), r#"{"description": "legacy text"}"#);
        let decl = load_declaration(tmp.path()).unwrap().unwrap();
        assert_eq!(decl.one_liner, "legacy text");
    }

    #[test]
    fn unparsable_file_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        write_declaration(tmp.path(), "not json {{{");
        match load_declaration(tmp.path()) {
            Err(Error::Parse(msg)) => assert!(msg.contains(DECLARATION_FILE)),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
