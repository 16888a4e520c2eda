// ctxenv: Context-scoped environment overrides
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the environment module.

use std::process::Command;
use std::sync::Once;

use super::command::apply_to_command;
use super::table::{EnvTable, match_assignment};
use super::{clearenv, environ, getenv, has_local, process_getenv, setenv, with_environ};
use crate::core::context::Context;

const SEEDED_KEY: &str = "CTXENV_UNIT_SEEDED";
const SEEDED_VALUE: &str = "from the process";

fn seed_process_env() {
    static SEED: Once = Once::new();
    SEED.call_once(|| {
        // SAFETY: the variable is unique to this module and written exactly
        // once; every reader goes through std's environment lock.
        // Because tests here and in config set variables while others run,
        // no unit test may compare the full process environment; that check
        // lives in tests/integration_env.rs.
        unsafe {
            std::env::set_var(SEEDED_KEY, SEEDED_VALUE);
        }
    });
}

fn local_ctx(entries: &[&str]) -> Context {
    with_environ(&Context::background(), entries.iter().copied())
}

// =============================================================================
// Fallback to the process environment
// =============================================================================

#[test]
fn test_getenv_falls_back_to_process() {
    seed_process_env();
    let root = Context::background();

    assert!(!has_local(&root));
    assert_eq!(getenv(&root, SEEDED_KEY), SEEDED_VALUE);
    assert_eq!(getenv(&root, "CTXENV_UNIT_NEVER_SET"), "");
}

#[test]
fn test_environ_falls_back_to_process() {
    seed_process_env();
    let root = Context::background();

    let entries = environ(&root);
    assert!(entries.contains(&format!("{SEEDED_KEY}={SEEDED_VALUE}")));
}

#[test]
fn test_fallback_survives_unrelated_values() {
    enum Unrelated {}
    impl crate::core::context::ContextKey for Unrelated {
        type Value = u8;
    }

    seed_process_env();
    let ctx = Context::background().with_value::<Unrelated>(1);

    assert!(!has_local(&ctx));
    assert_eq!(getenv(&ctx, SEEDED_KEY), SEEDED_VALUE);
}

#[test]
fn test_process_getenv_rejects_unreadable_names() {
    assert_eq!(process_getenv(""), "");
    assert_eq!(process_getenv("A=B"), "");
    assert_eq!(process_getenv("A\0B"), "");
}

// =============================================================================
// Reads from a local environment
// =============================================================================

#[test]
fn test_getenv_first_assignment_wins() {
    let ctx = local_ctx(&["DUP=first", "OTHER=x", "DUP=second"]);
    assert_eq!(getenv(&ctx, "DUP"), "first");
}

#[test]
fn test_getenv_requires_exact_name() {
    let ctx = local_ctx(&["FOOBAR=1", "FOO_=2"]);

    assert_eq!(getenv(&ctx, "FOO"), "");
    assert_eq!(getenv(&ctx, "FOOBAR"), "1");
}

#[test]
fn test_getenv_empty_value_matches_absent() {
    let ctx = local_ctx(&["EMPTY="]);

    assert_eq!(getenv(&ctx, "EMPTY"), "");
    assert_eq!(getenv(&ctx, "MISSING"), "");
}

#[test]
fn test_malformed_entries_enumerate_but_never_match() {
    let ctx = local_ctx(&["NOEQUALS", "GOOD=yes"]);

    assert_eq!(getenv(&ctx, "NOEQUALS"), "");
    assert_eq!(getenv(&ctx, "GOOD"), "yes");
    insta::assert_debug_snapshot!(environ(&ctx), @r#"
    [
        "NOEQUALS",
        "GOOD=yes",
    ]
    "#);
}

#[test]
fn test_value_may_contain_equals() {
    let ctx = local_ctx(&["OPTS=a=b=c"]);
    assert_eq!(getenv(&ctx, "OPTS"), "a=b=c");
}

#[test]
fn test_environ_returns_independent_copy() {
    let ctx = local_ctx(&["A=1"]);

    let mut first = environ(&ctx);
    first.push("B=2".to_string());
    first[0] = "A=changed".to_string();

    assert_eq!(environ(&ctx), vec!["A=1".to_string()]);
    assert_eq!(getenv(&ctx, "A"), "1");
    assert_eq!(getenv(&ctx, "B"), "");
}

// =============================================================================
// with_environ
// =============================================================================

#[test]
fn test_with_environ_round_trip() {
    let table = vec!["A=1".to_string(), "B=2".to_string(), "A=3".to_string()];
    let ctx = with_environ(&Context::background(), &table);

    assert_eq!(environ(&ctx), table);
    assert_eq!(getenv(&ctx, "A"), "1");
}

#[test]
fn test_with_environ_copies_input() {
    let mut table = vec!["A=1".to_string()];
    let ctx = with_environ(&Context::background(), &table);

    table[0] = "A=mutated".to_string();
    table.push("B=2".to_string());

    assert_eq!(environ(&ctx), vec!["A=1".to_string()]);
}

#[test]
fn test_with_environ_replaces_ancestor() {
    let parent = local_ctx(&["PARENT=1", "SHARED=parent"]);
    let child = with_environ(&parent, ["SHARED=child"]);

    assert_eq!(getenv(&child, "PARENT"), "");
    assert_eq!(getenv(&child, "SHARED"), "child");
    assert_eq!(getenv(&parent, "SHARED"), "parent");
}

#[test]
fn test_with_environ_empty_is_local() {
    seed_process_env();
    let ctx = with_environ(&Context::background(), Vec::<String>::new());

    assert!(has_local(&ctx));
    assert!(environ(&ctx).is_empty());
    assert_eq!(getenv(&ctx, SEEDED_KEY), "");
}

// =============================================================================
// setenv
// =============================================================================

#[test]
fn test_setenv_appends_new_variable() {
    let ctx = setenv(&local_ctx(&["A=1", "B=2"]), "C", "3");

    insta::assert_debug_snapshot!(environ(&ctx), @r#"
    [
        "A=1",
        "B=2",
        "C=3",
    ]
    "#);
}

#[test]
fn test_setenv_overwrites_in_place() {
    let ctx = setenv(&local_ctx(&["A=1", "B=2", "C=3"]), "B", "two");

    insta::assert_debug_snapshot!(environ(&ctx), @r#"
    [
        "A=1",
        "B=two",
        "C=3",
    ]
    "#);
}

#[test]
fn test_setenv_overwrites_first_duplicate_only() {
    let ctx = setenv(&local_ctx(&["A=1", "A=2"]), "A", "new");

    assert_eq!(environ(&ctx), vec!["A=new".to_string(), "A=2".to_string()]);
}

#[test]
fn test_setenv_empty_value_removes_entry() {
    let ctx = setenv(&local_ctx(&["A=1", "B=2", "C=3"]), "B", "");

    assert_eq!(environ(&ctx), vec!["A=1".to_string(), "C=3".to_string()]);
    assert!(!environ(&ctx).iter().any(|e| e == "B="));
}

#[test]
fn test_setenv_removing_duplicate_reveals_next() {
    let ctx = setenv(&local_ctx(&["A=1", "A=2"]), "A", "");
    assert_eq!(getenv(&ctx, "A"), "2");
}

#[test]
fn test_setenv_unset_absent_keeps_table() {
    let parent = local_ctx(&["A=1"]);
    let ctx = setenv(&parent, "MISSING", "");

    assert!(!ctx.ptr_eq(&parent));
    assert_eq!(environ(&ctx), environ(&parent));
}

#[test]
fn test_setenv_unset_last_entry_collapses_to_clear() {
    seed_process_env();
    let parent = with_environ(&Context::background(), [format!("{SEEDED_KEY}=local")]);
    let ctx = setenv(&parent, SEEDED_KEY, "");
    let cleared = clearenv(&parent);

    assert!(has_local(&ctx));
    assert!(environ(&ctx).is_empty());
    assert_eq!(environ(&ctx), environ(&cleared));
    assert_eq!(getenv(&ctx, SEEDED_KEY), "");
}

#[test]
fn test_setenv_override_precedence() {
    let ctx1 = local_ctx(&["K=v1"]);
    let ctx2 = setenv(&ctx1, "K", "v2");

    assert_eq!(getenv(&ctx2, "K"), "v2");
    assert_eq!(getenv(&ctx1, "K"), "v1");
}

#[test]
fn test_setenv_on_root_snapshots_process() {
    seed_process_env();
    let root = Context::background();
    let ctx = setenv(&root, "CTXENV_UNIT_ADDED", "added");

    assert!(has_local(&ctx));
    assert!(!has_local(&root));
    assert_eq!(getenv(&ctx, SEEDED_KEY), SEEDED_VALUE);
    assert_eq!(getenv(&ctx, "CTXENV_UNIT_ADDED"), "added");
    assert_eq!(getenv(&root, "CTXENV_UNIT_ADDED"), "");
    assert_eq!(
        environ(&ctx).last().map(String::as_str),
        Some("CTXENV_UNIT_ADDED=added")
    );
}

#[test]
fn test_setenv_unset_absent_on_root_still_attaches() {
    seed_process_env();
    let ctx = setenv(&Context::background(), "CTXENV_UNIT_NEVER_SET", "");

    assert!(has_local(&ctx));
    assert_eq!(getenv(&ctx, SEEDED_KEY), SEEDED_VALUE);
}

#[test]
fn test_setenv_never_touches_process() {
    seed_process_env();
    let ctx = setenv(&Context::background(), SEEDED_KEY, "overridden");

    assert_eq!(getenv(&ctx, SEEDED_KEY), "overridden");
    assert_eq!(
        std::env::var(SEEDED_KEY).ok().as_deref(),
        Some(SEEDED_VALUE)
    );
}

// =============================================================================
// clearenv
// =============================================================================

#[test]
fn test_clearenv_blocks_fallback() {
    seed_process_env();
    let ctx = clearenv(&Context::background());

    assert!(has_local(&ctx));
    assert!(environ(&ctx).is_empty());
    assert_eq!(getenv(&ctx, SEEDED_KEY), "");
}

#[test]
fn test_clearenv_is_idempotent() {
    let once = clearenv(&local_ctx(&["A=1"]));
    let twice = clearenv(&once);

    assert_eq!(environ(&twice), environ(&once));
    assert!(environ(&twice).is_empty());
    assert_eq!(getenv(&twice, "A"), "");
}

#[test]
fn test_siblings_are_isolated() {
    let parent = local_ctx(&["A=1"]);
    let left = setenv(&parent, "A", "left");
    let right = clearenv(&parent);
    let other = with_environ(&parent, ["B=2"]);

    let mut left_view = environ(&left);
    left_view.clear();

    assert_eq!(getenv(&left, "A"), "left");
    assert_eq!(getenv(&right, "A"), "");
    assert_eq!(getenv(&other, "B"), "2");
    assert_eq!(getenv(&parent, "A"), "1");
    assert_eq!(environ(&parent), vec!["A=1".to_string()]);
}

// =============================================================================
// Table and command helpers
// =============================================================================

#[test]
fn test_match_assignment() {
    assert_eq!(match_assignment("KEY=value", "KEY"), Some("value"));
    assert_eq!(match_assignment("KEY=", "KEY"), Some(""));
    assert_eq!(match_assignment("KEYS=value", "KEY"), None);
    assert_eq!(match_assignment("KEY", "KEY"), None);
    assert_eq!(match_assignment("KE", "KEY"), None);
}

#[test]
fn test_table_edits_leave_original() {
    let table = EnvTable::new(["A=1", "B=2"]);
    let edited = table.with_removed(0).with_appended("C=3".to_string());

    assert_eq!(table.entries(), ["A=1".to_string(), "B=2".to_string()]);
    assert_eq!(edited.entries(), ["B=2".to_string(), "C=3".to_string()]);
    assert_eq!(table.find("B"), Some((1, "2")));
}

#[test]
fn test_apply_to_command_without_local() {
    let mut command = Command::new("true");
    let applied = apply_to_command(&Context::background(), &mut command);

    assert!(!applied);
    assert_eq!(command.get_envs().count(), 0);
}

#[test]
fn test_apply_to_command_with_local() {
    let ctx = local_ctx(&["A=1", "MALFORMED", "=hidden", "A=2", "B=two"]);
    let mut command = Command::new("true");
    let applied = apply_to_command(&ctx, &mut command);

    let envs: Vec<(String, Option<String>)> = command
        .get_envs()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.map(|v| v.to_string_lossy().into_owned()),
            )
        })
        .collect();

    assert!(applied);
    assert_eq!(
        envs,
        vec![
            ("A".to_string(), Some("1".to_string())),
            ("B".to_string(), Some("two".to_string())),
        ]
    );
}
