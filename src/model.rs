pub mod attendance;
pub mod employee;
pub mod shift;

use serde::de::DeserializeOwned;
use validator::Validate;

pub use attendance::{Attendance, AttendanceDraft, AttendancePatch, AttendancePayload};
pub use employee::{Employee, EmployeeDraft, EmployeePatch};
pub use shift::{Shift, ShiftDraft, ShiftPatch};

/// A stored row with a system-assigned id.
///
/// `Draft` is the row without its id: what `create` and `PUT` accept, and
/// what a partial update is merged into before validation. `Patch` carries
/// only the fields a caller wants to change.
pub trait Record: Clone + Send + Sync + 'static {
    type Draft: DeserializeOwned + Validate + From<Self> + Send + 'static;
    type Patch: DeserializeOwned + From<Self::Draft> + Send + 'static;

    const NAME: &'static str;

    fn id(&self) -> u64;

    fn from_draft(id: u64, draft: Self::Draft) -> Self;

    fn apply(draft: &mut Self::Draft, patch: Self::Patch);

    /// This row as a draft with `patch` laid over it.
    fn merged(self, patch: Self::Patch) -> Self::Draft {
        let mut draft = Self::Draft::from(self);
        Self::apply(&mut draft, patch);
        draft
    }
}
