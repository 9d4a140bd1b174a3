use idc_core::{
    AssignmentTemplate, BoundaryPolicyType, PermissionSetTemplate, PrincipalType,
    ResolvedAssignment,
};
use serde_json::json;

#[test]
fn permission_set_full_template_deserializes() {
    let raw = json!({
        "Name": "DataEngineer",
        "Description": "Data platform engineering access",
        "SessionDuration": "PT8H",
        "RelayState": "https://console.aws.amazon.com/athena/",
        "ManagedPolicies": ["arn:aws:iam::aws:policy/AmazonAthenaFullAccess"],
        "CustomPolicy": {
            "Version": "2012-10-17",
            "Statement": [{"Effect": "Allow", "Action": "s3:GetObject", "Resource": "*"}]
        },
        "CustomerManagedPolicies": ["data-engineer-guardrails"],
        "PermissionBoundary": {"PolicyType": "CUSTOMER", "Policy": "engineering-boundary"}
    });

    let template: PermissionSetTemplate = serde_json::from_value(raw).unwrap();
    assert_eq!(template.name, "DataEngineer");
    assert_eq!(template.session_duration, "PT8H");
    assert_eq!(
        template.relay_state_or_default(),
        "https://console.aws.amazon.com/athena/"
    );
    assert!(template.custom_policy().is_some());

    let boundary = template.permission_boundary.unwrap();
    assert_eq!(boundary.policy_type, BoundaryPolicyType::Customer);
    assert_eq!(boundary.policy, "engineering-boundary");
}

#[test]
fn permission_set_minimal_template_gets_defaults() {
    let raw = json!({
        "Name": "ReadOnly",
        "Description": "Read-only access",
        "SessionDuration": "PT4H"
    });

    let template: PermissionSetTemplate = serde_json::from_value(raw).unwrap();
    assert_eq!(
        template.relay_state_or_default(),
        "https://console.aws.amazon.com/"
    );
    assert!(template.managed_policies.is_empty());
    assert!(template.customer_managed_policies.is_empty());
    assert!(template.custom_policy().is_none());
    assert!(template.permission_boundary.is_none());
}

#[test]
fn empty_custom_policy_counts_as_absent() {
    let raw = json!({
        "Name": "Auditor",
        "Description": "Audit access",
        "SessionDuration": "PT1H",
        "CustomPolicy": {}
    });
    let template: PermissionSetTemplate = serde_json::from_value(raw).unwrap();
    assert!(template.custom_policy().is_none());

    let raw = json!({
        "Name": "Auditor",
        "Description": "Audit access",
        "SessionDuration": "PT1H",
        "CustomPolicy": null
    });
    let template: PermissionSetTemplate = serde_json::from_value(raw).unwrap();
    assert!(template.custom_policy().is_none());
}

#[test]
fn assignment_template_uses_upper_case_sid_key() {
    let raw = json!({
        "SID": "data-engineers-sandbox",
        "PrincipalType": "GROUP",
        "PrincipalId": "Data Engineers",
        "PermissionSetName": "DataEngineer",
        "Target": ["ACCOUNT:111122223333", "ou-ab12-cdef3456:*"]
    });

    let assignment: AssignmentTemplate = serde_json::from_value(raw).unwrap();
    assert_eq!(assignment.sid, "data-engineers-sandbox");
    assert_eq!(assignment.principal_type, PrincipalType::Group);
    assert_eq!(assignment.principal_id, "Data Engineers");
    assert_eq!(assignment.target.len(), 2);
}

#[test]
fn resolved_assignment_serializes_with_pascal_case_keys() {
    let record = ResolvedAssignment {
        sid: "111122223333Data EngineersGROUPDataEngineer".into(),
        principal_id: "9067-1234-abcd".into(),
        principal_type: PrincipalType::Group,
        permission_set_name: "arn:aws:sso:::permissionSet/ssoins-1/ps-1".into(),
        target: "111122223333".into(),
    };

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({
            "Sid": "111122223333Data EngineersGROUPDataEngineer",
            "PrincipalId": "9067-1234-abcd",
            "PrincipalType": "GROUP",
            "PermissionSetName": "arn:aws:sso:::permissionSet/ssoins-1/ps-1",
            "Target": "111122223333"
        })
    );
}

#[test]
fn derive_sid_concatenates_without_separator() {
    let sid = ResolvedAssignment::derive_sid(
        "111122223333",
        "alice",
        PrincipalType::User,
        "ReadOnly",
    );
    assert_eq!(sid, "111122223333aliceUSERReadOnly");
}
