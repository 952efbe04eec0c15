//! Health-condition checkbox selection.

use std::collections::BTreeSet;

use crate::models::HealthCondition;

use super::{FormError, ReconcileGuard};

/// Selected condition ids plus the guard that seeds them from a loaded record.
#[derive(Debug, Clone, Default)]
pub struct HealthConditionSelector {
    selected: BTreeSet<i64>,
    guard: ReconcileGuard,
    locked: bool,
}

impl HealthConditionSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Flip one id. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: i64) -> Result<bool, FormError> {
        if self.locked {
            return Err(FormError::Locked);
        }
        if self.selected.remove(&id) {
            Ok(false)
        } else {
            self.selected.insert(id);
            Ok(true)
        }
    }

    /// Seed the selection from a donor's reconciled ids, once per donor.
    ///
    /// Returns `false` when this donor was already seeded and the current
    /// selection was kept.
    pub fn seed(&mut self, donor_id: i64, reconciled: &BTreeSet<i64>) -> bool {
        if !self.guard.should_reconcile(donor_id) {
            return false;
        }
        self.selected = reconciled.clone();
        self.guard.mark(donor_id);
        true
    }

    /// Forget the seeded identity and clear the selection.
    pub(crate) fn reset(&mut self) {
        self.selected.clear();
        self.guard.reset();
    }

    /// Names of selected conditions the reference list marks as blocking donation.
    pub fn eligibility_warnings(&self, reference: &[HealthCondition]) -> Vec<String> {
        reference
            .iter()
            .filter(|c| c.blocks_donation() && self.selected.contains(&c.id))
            .map(|c| c.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        let mut selector = HealthConditionSelector::new();
        assert_eq!(selector.toggle(3), Ok(true));
        assert!(selector.is_selected(3));
        assert_eq!(selector.toggle(3), Ok(false));
        assert!(selector.selected().is_empty());
    }

    #[test]
    fn test_locked_toggle_rejected() {
        let mut selector = HealthConditionSelector::new();
        selector.toggle(3).unwrap();
        selector.set_locked(true);
        assert_eq!(selector.toggle(3), Err(FormError::Locked));
        assert!(selector.is_selected(3));
    }

    #[test]
    fn test_seed_once_per_donor() {
        let mut selector = HealthConditionSelector::new();
        assert!(selector.seed(7, &BTreeSet::from([3])));
        selector.toggle(5).unwrap();

        // Same donor again: user edits survive
        assert!(!selector.seed(7, &BTreeSet::from([3])));
        assert_eq!(selector.selected(), &BTreeSet::from([3, 5]));

        // Different donor: reseeded
        assert!(selector.seed(8, &BTreeSet::from([1])));
        assert_eq!(selector.selected(), &BTreeSet::from([1]));
    }

    #[test]
    fn test_eligibility_warnings() {
        let mut blocking = HealthCondition::new(3, "Hepatitis B");
        blocking.is_donation_eligible = Some(false);
        let mut fine = HealthCondition::new(5, "Seasonal allergies");
        fine.is_donation_eligible = Some(true);
        let reference = vec![blocking, fine, HealthCondition::new(9, "Anemia")];

        let mut selector = HealthConditionSelector::new();
        selector.seed(1, &BTreeSet::from([3, 5, 9]));
        assert_eq!(selector.eligibility_warnings(&reference), vec!["Hepatitis B"]);
    }
}
