//! Golden tests for health-condition reconciliation.
//!
//! Each case pins one payload shape the backend is known to emit.

use std::collections::BTreeSet;

use donor_sync_core::models::{HealthCondition, HealthConditionLink};
use donor_sync_core::sync::reconcile_health_condition_ids;

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    links: Vec<HealthConditionLink>,
    expected: &'static [i64],
}

fn reference() -> Vec<HealthCondition> {
    vec![
        HealthCondition::new(1, "Hypertension"),
        HealthCondition::new(3, "Diabetes"),
        HealthCondition::new(5, "Asthma"),
        HealthCondition::new(8, "Recent Tattoo"),
    ]
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "embedded-condition-id",
            links: vec![HealthConditionLink::by_condition_id(3)],
            expected: &[3],
        },
        GoldenCase {
            id: "standalone-id",
            links: vec![HealthConditionLink::by_id(5)],
            expected: &[5],
        },
        GoldenCase {
            id: "association-row-id-ignored",
            links: vec![HealthConditionLink {
                condition_id: Some(1),
                id: Some(5001),
                name: Some("Hypertension".into()),
            }],
            expected: &[1],
        },
        GoldenCase {
            id: "renumbered-matched-by-name",
            links: vec![HealthConditionLink::by_condition_id(108).with_name("recent tattoo")],
            expected: &[8],
        },
        GoldenCase {
            id: "name-only",
            links: vec![HealthConditionLink::default().with_name("Asthma")],
            expected: &[5],
        },
        GoldenCase {
            id: "unknown-id-kept",
            links: vec![HealthConditionLink::by_condition_id(99)],
            expected: &[99],
        },
        GoldenCase {
            id: "mixed-shapes-deduplicated",
            links: vec![
                HealthConditionLink::by_condition_id(3),
                HealthConditionLink::by_id(3),
                HealthConditionLink::by_id(1),
            ],
            expected: &[1, 3],
        },
        GoldenCase {
            id: "empty",
            links: vec![],
            expected: &[],
        },
    ]
}

#[test]
fn test_golden_reconciliation() {
    let reference = reference();
    let mut failures = Vec::new();

    for case in get_golden_cases() {
        let actual = reconcile_health_condition_ids(&case.links, &reference);
        let expected: BTreeSet<i64> = case.expected.iter().copied().collect();
        if actual != expected {
            failures.push(format!(
                "Case '{}': expected {:?}, got {:?}",
                case.id, expected, actual
            ));
        }
    }

    if !failures.is_empty() {
        panic!(
            "Golden test failures ({}):\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

#[test]
fn test_embedded_json_shapes() {
    // Donor read keys on conditionId, listing keys on id
    let embedded: Vec<HealthConditionLink> =
        serde_json::from_str(r#"[{"id": 70, "conditionId": 3, "name": "Diabetes"}]"#).unwrap();
    let listed: Vec<HealthConditionLink> =
        serde_json::from_str(r#"[{"id": 3, "name": "Diabetes"}]"#).unwrap();

    let reference = reference();
    assert_eq!(
        reconcile_health_condition_ids(&embedded, &reference),
        reconcile_health_condition_ids(&listed, &reference)
    );
}
