use crate::harness::steps::ExpectedError;
use crate::harness::{Assertion, Scenario};

const NO_USERNAME: &str = r#"
[escalus_users.alice]
username = "alice"

[escalus_users.anonymous]
server = "localhost"
"#;

#[test]
fn test_unknown_role_is_incomplete_request() {
    Scenario::new("unknown_role")
        .start()
        .expect_failure(&["alice", "ghost"], ExpectedError::IncompleteRequest)
        .assert(Assertion::CreateCalls(0))
        .assert_registry_len(0)
        .assert_accounts(0)
        .run()
        .unwrap();
}

#[test]
fn test_duplicate_role_is_incomplete_request() {
    Scenario::new("duplicate_role")
        .start()
        .expect_failure(&["bob", "bob"], ExpectedError::IncompleteRequest)
        .assert(Assertion::CreateCalls(0))
        .run()
        .unwrap();
}

#[test]
fn test_template_without_username() {
    Scenario::new("missing_username")
        .with_config(NO_USERNAME)
        .start()
        .expect_failure(&["anonymous"], ExpectedError::MissingUsername)
        // other templates keep working
        .create_users(&["alice"])
        .assert_registry_len(1)
        .run()
        .unwrap();
}

#[test]
fn test_provisioning_failure_is_not_tracked() {
    Scenario::new("provisioning_failure")
        .start()
        .server_rejects_creates("kate")
        .expect_failure(&["kate"], ExpectedError::ProvisioningFailed)
        .assert_registry_len(0)
        .create_users(&["alice"])
        .assert_registry_len(1)
        .run()
        .unwrap();
}

#[test]
fn test_story_failure_keeps_users_tracked() {
    Scenario::new("story_failure")
        .start()
        .expect_failure(&["alice"], ExpectedError::StoryFailed)
        .assert_registry_len(1)
        .assert_accounts(1)
        .clean()
        .assert_accounts(0)
        .run()
        .unwrap();
}

#[test]
fn test_failing_scenario_reports_step() {
    Scenario::new("reports_step")
        .start()
        .create_users(&["ghost"])
        .run()
        .expect_failure_at(1);
}

#[test]
fn test_missing_fixture() {
    let result = Scenario::new("missing_fixture")
        .from_fixture("does-not-exist")
        .run();
    assert!(!result.success);
    assert!(result.error.unwrap().contains("Fixture not found"));
}
