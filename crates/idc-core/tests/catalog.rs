use std::fs;

use idc_core::{TemplateError, load_assignments, load_permission_sets};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

#[test]
fn loads_permission_sets_in_name_order() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "b-readonly.json",
        r#"{"Name": "ReadOnly", "Description": "ro", "SessionDuration": "PT4H"}"#,
    );
    write_file(
        &dir,
        "a-admin.json",
        r#"{"Name": "Admin", "Description": "admin", "SessionDuration": "PT1H"}"#,
    );
    // Non-JSON files are not templates.
    write_file(&dir, "README.md", "notes");

    let catalog = load_permission_sets(dir.path()).unwrap();
    let names: Vec<&str> = catalog.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Admin", "ReadOnly"]);
    assert!(catalog.get("Admin").is_some());
    assert!(catalog.get("Missing").is_none());
}

#[test]
fn flattens_assignment_files_into_one_list() {
    let dir = TempDir::new().unwrap();
    write_file(
        &dir,
        "platform.json",
        r#"{"Assignments": [
            {"SID": "platform-admin", "PrincipalType": "GROUP", "PrincipalId": "Platform",
             "PermissionSetName": "Admin", "Target": ["Root"]}
        ]}"#,
    );
    write_file(
        &dir,
        "sandbox.json",
        r#"{"Assignments": [
            {"SID": "sandbox-users", "PrincipalType": "GROUP", "PrincipalId": "Developers",
             "PermissionSetName": "ReadOnly", "Target": ["ou-ab12-cdef3456"]},
            {"SID": "sandbox-alice", "PrincipalType": "USER", "PrincipalId": "alice",
             "PermissionSetName": "ReadOnly", "Target": ["111122223333"]}
        ]}"#,
    );

    let assignments = load_assignments(dir.path()).unwrap();
    let sids: Vec<&str> = assignments.iter().map(|a| a.sid.as_str()).collect();
    assert_eq!(sids, vec!["platform-admin", "sandbox-users", "sandbox-alice"]);
}

#[test]
fn malformed_json_reports_path_and_position() {
    let dir = TempDir::new().unwrap();
    write_file(&dir, "broken.json", "{\n  \"Name\": \"Oops\",\n}");

    let err = load_permission_sets(dir.path()).unwrap_err();
    match err {
        TemplateError::Malformed { path, line, .. } => {
            assert!(path.ends_with("broken.json"));
            assert_eq!(line, 3);
        }
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    let err = load_assignments(&missing).unwrap_err();
    assert!(matches!(err, TemplateError::Io { .. }));
}
