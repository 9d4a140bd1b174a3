mod common;

use common::FakeOrg;
use idc_assignments::{TargetKind, TargetResolutionError, parse_target, resolve_all, resolve_target};

#[test]
fn parses_bare_account_id() {
    assert_eq!(
        parse_target("111122223333").unwrap(),
        TargetKind::Account("111122223333".into())
    );
}

#[test]
fn strips_type_tag_prefix() {
    assert_eq!(
        parse_target("ACCOUNT:111122223333").unwrap(),
        TargetKind::Account("111122223333".into())
    );
    assert_eq!(
        parse_target("OU:ou-ab12-cdef3456").unwrap(),
        TargetKind::Ou {
            id: "ou-ab12-cdef3456".into(),
            recursive: false
        }
    );
    assert_eq!(parse_target("ROOT:Root").unwrap(), TargetKind::Root);
}

#[test]
fn nested_suffix_marks_recursive_descent() {
    assert_eq!(
        parse_target("ou-ab12-cdef3456:*").unwrap(),
        TargetKind::Ou {
            id: "ou-ab12-cdef3456".into(),
            recursive: true
        }
    );
    // With and without a leading tag.
    assert_eq!(
        parse_target("OU:ou-ab12-cdef3456:*").unwrap(),
        TargetKind::Ou {
            id: "ou-ab12-cdef3456".into(),
            recursive: true
        }
    );
}

#[test]
fn root_forms() {
    assert_eq!(parse_target("Root").unwrap(), TargetKind::Root);
    assert_eq!(parse_target("r-ab12").unwrap(), TargetKind::Root);
}

#[test]
fn rejects_unrecognized_targets() {
    for bad in ["", "12345", "account-111122223333", "ou", "TAG:nonsense"] {
        let err = parse_target(bad).unwrap_err();
        assert!(
            matches!(err, TargetResolutionError::InvalidFormat { .. }),
            "{bad:?} should be invalid"
        );
    }
}

#[tokio::test]
async fn non_recursive_ou_lists_direct_children_only() {
    let org = FakeOrg::default()
        .with_parent("ou-abc", &["111111111111"], &["ou-xyz"])
        .with_parent("ou-xyz", &["222222222222"], &[]);

    let kind = parse_target("ou-abc").unwrap();
    let accounts = resolve_target(&org, &kind).await.unwrap();
    assert_eq!(accounts, vec!["111111111111"]);
}

#[tokio::test]
async fn recursive_ou_descends_through_nested_ous() {
    let org = FakeOrg::default()
        .with_parent("ou-abc", &["111111111111"], &["ou-xyz"])
        .with_parent("ou-xyz", &["222222222222"], &[]);

    let kind = parse_target("ou-abc:*").unwrap();
    let accounts = resolve_target(&org, &kind).await.unwrap();
    assert_eq!(accounts, vec!["111111111111", "222222222222"]);
}

#[tokio::test]
async fn recursion_reaches_arbitrary_depth() {
    let org = FakeOrg::default()
        .with_parent("ou-top", &[], &["ou-mid"])
        .with_parent("ou-mid", &["333333333333"], &["ou-leaf"])
        .with_parent("ou-leaf", &["444444444444"], &[]);

    let kind = parse_target("ou-top:*").unwrap();
    let accounts = resolve_target(&org, &kind).await.unwrap();
    assert_eq!(accounts, vec!["333333333333", "444444444444"]);
}

#[tokio::test]
async fn root_target_lists_the_whole_organization() {
    let org = FakeOrg::default().with_all_accounts(&["111111111111", "999999999999"]);

    let accounts = resolve_target(&org, &TargetKind::Root).await.unwrap();
    assert_eq!(accounts, vec!["111111111111", "999999999999"]);
}

#[tokio::test]
async fn resolve_all_unions_target_lists_in_order() {
    let org = FakeOrg::default().with_parent("ou-abc", &["222222222222"], &[]);

    let targets = vec!["111122223333".to_string(), "OU:ou-abc".to_string()];
    let accounts = resolve_all(&org, &targets).await.unwrap();
    assert_eq!(accounts, vec!["111122223333", "222222222222"]);
}

#[tokio::test]
async fn resolve_all_fails_on_first_invalid_target() {
    let org = FakeOrg::default();
    let targets = vec!["111122223333".to_string(), "bogus".to_string()];
    assert!(resolve_all(&org, &targets).await.is_err());
}
