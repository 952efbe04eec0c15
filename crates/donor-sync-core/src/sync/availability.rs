//! Weekly availability editor.

use crate::models::{hhmm_to_minutes, AvailabilitySlot};

use super::{FieldError, FormError};

/// One edit to a single slot. Times arrive as `HH:MM` from the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEdit {
    Weekday(u8),
    StartTime(String),
    EndTime(String),
}

/// Editable list of availability windows.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityEditor {
    slots: Vec<AvailabilitySlot>,
    default_slot: AvailabilitySlot,
    locked: bool,
}

impl AvailabilityEditor {
    pub fn new(default_slot: AvailabilitySlot) -> Self {
        Self {
            slots: Vec::new(),
            default_slot,
            locked: false,
        }
    }

    pub fn slots(&self) -> &[AvailabilitySlot] {
        &self.slots
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Replace all slots with server state. Not a user edit, so not locked.
    pub(crate) fn load(&mut self, slots: Vec<AvailabilitySlot>) {
        self.slots = slots;
    }

    /// Append the default slot and return its index.
    pub fn add(&mut self) -> Result<usize, FormError> {
        self.ensure_unlocked()?;
        self.slots.push(self.default_slot);
        Ok(self.slots.len() - 1)
    }

    /// Apply one edit to the slot at `index`.
    pub fn update(&mut self, index: usize, edit: SlotEdit) -> Result<(), FormError> {
        self.ensure_unlocked()?;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(FormError::SlotIndex(index))?;

        match edit {
            SlotEdit::Weekday(day) => {
                if day > 6 {
                    return Err(FormError::InvalidWeekday(day));
                }
                slot.weekday = day;
            }
            SlotEdit::StartTime(value) => slot.time_from_min = hhmm_to_minutes(&value)?,
            SlotEdit::EndTime(value) => slot.time_to_min = hhmm_to_minutes(&value)?,
        }
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<AvailabilitySlot, FormError> {
        self.ensure_unlocked()?;
        if index >= self.slots.len() {
            return Err(FormError::SlotIndex(index));
        }
        Ok(self.slots.remove(index))
    }

    /// Field-level problems for every slot; empty when all slots are valid.
    pub fn validate(&self) -> Vec<FieldError> {
        validate_slots(&self.slots)
    }

    fn ensure_unlocked(&self) -> Result<(), FormError> {
        if self.locked {
            Err(FormError::Locked)
        } else {
            Ok(())
        }
    }
}

/// Check each slot's ranges and start-before-end order.
pub fn validate_slots(slots: &[AvailabilitySlot]) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for (index, slot) in slots.iter().enumerate() {
        let field = format!("availabilities[{}]", index);
        if !slot.is_in_range() {
            errors.push(FieldError::new(field, "Day or time is out of range"));
        } else if !slot.is_well_ordered() {
            errors.push(FieldError::new(field, "Start time must be before end time"));
        }
    }
    errors
}
