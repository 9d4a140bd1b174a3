//! Loading of template catalogs from repository directories.
//!
//! Two directory conventions: one JSON object per file for permission sets,
//! and `{"Assignments": [...]}` files for assignments, flattened into a
//! single list.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::TemplateError;
use crate::models::assignment::AssignmentTemplate;
use crate::models::permission_set::PermissionSetTemplate;

/// Every permission set template loaded from a repository directory, in
/// load order. Duplicate names survive loading; rejecting them is the
/// validator's job.
#[derive(Debug, Clone, Default)]
pub struct PermissionSetCatalog {
    templates: Vec<PermissionSetTemplate>,
}

impl PermissionSetCatalog {
    /// Build a catalog from already-loaded templates.
    pub fn from_templates(templates: Vec<PermissionSetTemplate>) -> Self {
        Self { templates }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionSetTemplate> {
        self.templates.iter()
    }

    /// First template with this name, if any.
    pub fn get(&self, name: &str) -> Option<&PermissionSetTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Load every `*.json` file in `dir` as a permission set template.
pub fn load_permission_sets(dir: &Path) -> Result<PermissionSetCatalog, TemplateError> {
    let mut templates = Vec::new();
    for path in json_files(dir)? {
        templates.push(read_json::<PermissionSetTemplate>(&path)?);
    }

    tracing::info!(
        count = templates.len(),
        dir = %dir.display(),
        "permission set templates loaded"
    );
    Ok(PermissionSetCatalog::from_templates(templates))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AssignmentFile {
    assignments: Vec<AssignmentTemplate>,
}

/// Load every `*.json` file in `dir` as an assignment file and flatten the
/// contents into one list, preserving file order.
pub fn load_assignments(dir: &Path) -> Result<Vec<AssignmentTemplate>, TemplateError> {
    let mut assignments = Vec::new();
    for path in json_files(dir)? {
        let file = read_json::<AssignmentFile>(&path)?;
        assignments.extend(file.assignments);
    }

    tracing::info!(
        count = assignments.len(),
        dir = %dir.display(),
        "assignments loaded"
    );
    Ok(assignments)
}

/// `*.json` paths under `dir`, name-sorted. `read_dir` order is
/// platform-dependent; sorting keeps load order stable.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>, TemplateError> {
    let entries = fs::read_dir(dir).map_err(|source| TemplateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TemplateError> {
    let contents = fs::read_to_string(path).map_err(|source| TemplateError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| TemplateError::Malformed {
        path: path.to_path_buf(),
        line: source.line(),
        column: source.column(),
        source,
    })
}
