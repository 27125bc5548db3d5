//! One-shot prefix arming

use super::merge::MergePolicy;
use crate::form::FieldId;

/// Whether the next recognized value of a field is a prefix.
///
/// Armed by the "consider coc number" voice command and consumed by the
/// next recognition event that produced text for the same field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ArmState {
    #[default]
    Idle,
    ArmedForPrepend(FieldId),
}

impl ArmState {
    pub fn arm(&mut self, field_id: FieldId) {
        *self = Self::ArmedForPrepend(field_id);
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::ArmedForPrepend(_))
    }

    /// Take the pending prepend for `field_id`, returning to `Idle`
    pub fn consume(&mut self, field_id: &FieldId) -> Option<MergePolicy> {
        match self {
            Self::ArmedForPrepend(armed) if armed == field_id => {
                *self = Self::Idle;
                Some(MergePolicy::Prepend)
            }
            _ => None,
        }
    }
}
