use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "First Shift",
        "start_time": "09:00:00",
        "end_time": "17:00:00"
    })
)]
pub struct Shift {
    /// Assigned on create. Sent as a JSON number, never a string.
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "First Shift")]
    pub name: String,

    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "17:00:00")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct ShiftDraft {
    #[validate(length(min = 1, max = 50, message = "Name must be 1 to 50 characters."))]
    #[schema(example = "Second Shift")]
    pub name: String,

    #[schema(value_type = String, example = "14:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "22:00:00")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ShiftPatch {
    pub name: Option<String>,

    #[schema(value_type = Option<String>, example = "08:00:00")]
    pub start_time: Option<NaiveTime>,

    #[schema(value_type = Option<String>, example = "16:00:00")]
    pub end_time: Option<NaiveTime>,
}

impl ShiftDraft {
    pub fn apply(&mut self, patch: ShiftPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
    }
}

impl From<Shift> for ShiftDraft {
    fn from(shift: Shift) -> Self {
        Self {
            name: shift.name,
            start_time: shift.start_time,
            end_time: shift.end_time,
        }
    }
}

impl From<ShiftDraft> for ShiftPatch {
    fn from(draft: ShiftDraft) -> Self {
        Self {
            name: Some(draft.name),
            start_time: Some(draft.start_time),
            end_time: Some(draft.end_time),
        }
    }
}

impl Record for Shift {
    type Draft = ShiftDraft;
    type Patch = ShiftPatch;

    const NAME: &'static str = "Shift";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: ShiftDraft) -> Self {
        Self {
            id,
            name: draft.name,
            start_time: draft.start_time,
            end_time: draft.end_time,
        }
    }

    fn apply(draft: &mut ShiftDraft, patch: ShiftPatch) {
        draft.apply(patch);
    }
}
