use crate::harness::{Assertion, Scenario};
use anyhow::ensure;
use std::time::Duration;

#[test]
fn test_create_users_appends_suffix() {
    Scenario::new("create_users_appends_suffix")
        .start()
        .create_users(&["alice", "bob"])
        .assert_fresh_usernames()
        .assert(Assertion::AccountExists("alice0.000000".into()))
        .assert(Assertion::AccountExists("bob0.000000".into()))
        .assert_accounts(2)
        .assert_registry_len(1)
        .run()
        .unwrap();
}

#[test]
fn test_only_requested_roles_are_created() {
    Scenario::new("only_requested_roles")
        .start()
        .create_users(&["kate"])
        .assert_accounts(1)
        .assert(Assertion::AccountExists("kate0.000000".into()))
        .run()
        .unwrap();
}

#[test]
fn test_story_gets_clients_in_role_order() {
    Scenario::new("story_role_order")
        .start()
        .story(&["kate", "alice"])
        .assert(Assertion::custom(|state| {
            let names: Vec<&str> = state.stories[0]
                .iter()
                .map(|c| c.username.as_str())
                .collect();
            ensure!(names == ["kate0.000000", "alice0.000000"], "got {:?}", names);
            Ok(())
        }))
        .run()
        .unwrap();
}

#[test]
fn test_story_with_config_sees_enriched_config() {
    Scenario::new("story_with_config")
        .start()
        .story_with_config(&["alice", "bob"])
        .assert(Assertion::custom(|state| {
            let fresh = &state.created[0];
            let sessions = fresh
                .get("server_sessions")
                .ok_or_else(|| anyhow::anyhow!("config was not enriched"))?;
            ensure!(sessions["alice"] == "sid-alice0.000000");
            ensure!(sessions["bob"] == "sid-bob0.000000");
            Ok(())
        }))
        .assert_fresh_usernames()
        .run()
        .unwrap();
}

#[test]
fn test_two_concurrent_calls_get_distinct_users() {
    Scenario::new("two_concurrent_alices")
        .start()
        .create_users_concurrently(&["alice"], 2)
        .assert(Assertion::CreatedCount(2))
        .assert(Assertion::CreateCalls(2))
        .assert_fresh_usernames()
        .assert_accounts(2)
        .run()
        .unwrap();
}

#[test]
fn test_suffix_follows_clock() {
    Scenario::new("suffix_follows_clock")
        .start()
        .create_users(&["alice"])
        .wait(Duration::from_millis(1_250))
        .create_users(&["alice"])
        .assert(Assertion::AccountExists("alice0.000000".into()))
        .assert(Assertion::AccountExists("alice1.250000".into()))
        .run()
        .unwrap();
}

#[test]
fn test_base_config_is_untouched() {
    Scenario::new("base_config_untouched")
        .start()
        .create_users(&["alice"])
        .assert(Assertion::custom(|state| {
            let base = state.base_usernames()?;
            ensure!(base["alice"] == "alice", "base config was modified");
            Ok(())
        }))
        .run()
        .unwrap();
}

#[test]
fn test_base_config_cannot_connect() {
    Scenario::new("base_config_cannot_connect")
        .start()
        .story_with_base_config(&["alice", "bob"])
        .assert_accounts(2)
        .assert(Assertion::AccountExists("alice0.000000".into()))
        .assert_registry_len(1)
        .run()
        .unwrap();
}
