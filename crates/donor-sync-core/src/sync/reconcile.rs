//! Translation of embedded health-condition links into reference ids.
//!
//! Donor reads key conditions on `conditionId` while the reference list keys
//! on `id`. All translation happens here.

use std::collections::BTreeSet;

use crate::models::{HealthCondition, HealthConditionLink};

/// Map embedded condition links onto reference-list ids.
///
/// Per link, in order:
/// 1. the raw id (`conditionId`, else `id`) if the reference list has it
/// 2. a reference entry whose name matches, ignoring case and outer whitespace
/// 3. the raw id unchanged, so a real selection is never dropped
///
/// Links with neither an id nor a matching name are skipped.
pub fn reconcile_health_condition_ids(
    links: &[HealthConditionLink],
    reference: &[HealthCondition],
) -> BTreeSet<i64> {
    links
        .iter()
        .filter_map(|link| resolve_link(link, reference))
        .collect()
}

fn resolve_link(link: &HealthConditionLink, reference: &[HealthCondition]) -> Option<i64> {
    let raw = link.raw_id();

    if let Some(id) = raw {
        if reference.iter().any(|c| c.id == id) {
            return Some(id);
        }
    }

    if let Some(name) = link.name.as_deref() {
        if let Some(found) = find_by_name(reference, name) {
            return Some(found.id);
        }
    }

    raw
}

fn find_by_name<'a>(reference: &'a [HealthCondition], name: &str) -> Option<&'a HealthCondition> {
    let wanted = name.trim();
    if wanted.is_empty() {
        return None;
    }
    reference
        .iter()
        .find(|c| c.name.trim().eq_ignore_ascii_case(wanted))
}

/// One-shot latch so reconciliation runs once per loaded donor identity.
///
/// A later reference-data refresh for the same donor must not overwrite
/// selections the user is editing.
#[derive(Debug, Default, Clone)]
pub struct ReconcileGuard {
    reconciled_for: Option<i64>,
}

impl ReconcileGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_reconcile(&self, donor_id: i64) -> bool {
        self.reconciled_for != Some(donor_id)
    }

    pub fn mark(&mut self, donor_id: i64) {
        self.reconciled_for = Some(donor_id);
    }

    pub fn reset(&mut self) {
        self.reconciled_for = None;
    }

    pub fn reconciled_for(&self) -> Option<i64> {
        self.reconciled_for
    }
}
