use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Record;
use crate::error::{AppError, FieldErrors};
use crate::utils::serde_utils::double_option;

const REQUIRED: &str = "This field is required.";

/// One employee's attendance for one calendar day.
///
/// `status` is free text ("Present", "Absent", "Late", "On-time" in
/// practice). At most one row exists per `(employee, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee": 1,
        "date": "2024-01-01",
        "status": "On-time",
        "check_in_time": "09:00:00",
        "check_out_time": "17:00:00"
    })
)]
pub struct Attendance {
    /// Assigned on create. Sent as a JSON number, never a string.
    #[schema(example = 1)]
    pub id: u64,

    #[sqlx(rename = "employee_id")]
    #[schema(example = 1)]
    pub employee: u64,

    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,

    #[schema(example = "On-time")]
    pub status: String,

    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub check_in_time: Option<NaiveTime>,

    #[schema(value_type = Option<String>, example = "17:00:00")]
    pub check_out_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct AttendanceDraft {
    #[schema(example = 1)]
    pub employee: u64,

    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub date: NaiveDate,

    #[validate(length(min = 1, max = 20, message = "Status must be 1 to 20 characters."))]
    #[schema(example = "Present")]
    pub status: String,

    #[serde(default)]
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub check_in_time: Option<NaiveTime>,

    #[serde(default)]
    #[schema(value_type = Option<String>, example = "17:00:00")]
    pub check_out_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AttendancePatch {
    pub employee: Option<u64>,

    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,

    pub status: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub check_in_time: Option<Option<NaiveTime>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub check_out_time: Option<Option<NaiveTime>>,
}

/// Body of "record attendance": every field optional at parse time so a
/// check-out can carry just the key and `check_out_time`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AttendancePayload {
    #[schema(example = 1)]
    pub employee: Option<u64>,

    #[schema(value_type = Option<String>, format = Date, example = "2024-01-01")]
    pub date: Option<NaiveDate>,

    #[schema(example = "On-time")]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "09:00:00")]
    pub check_in_time: Option<Option<NaiveTime>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "17:00:00")]
    pub check_out_time: Option<Option<NaiveTime>>,
}

impl AttendancePayload {
    /// The `(employee, date)` pair, or a validation error naming whichever
    /// of the two is missing.
    pub fn natural_key(&self) -> Result<(u64, NaiveDate), AppError> {
        let mut missing = FieldErrors::new();
        if self.employee.is_none() {
            missing.add("employee", REQUIRED);
        }
        if self.date.is_none() {
            missing.add("date", REQUIRED);
        }
        match (self.employee, self.date) {
            (Some(employee), Some(date)) => Ok((employee, date)),
            _ => Err(AppError::Validation(missing)),
        }
    }

    pub fn into_draft(self) -> Result<AttendanceDraft, AppError> {
        let (employee, date) = self.natural_key()?;
        let status = self
            .status
            .ok_or_else(|| AppError::invalid("status", REQUIRED))?;

        Ok(AttendanceDraft {
            employee,
            date,
            status,
            check_in_time: self.check_in_time.flatten(),
            check_out_time: self.check_out_time.flatten(),
        })
    }
}

impl From<AttendancePayload> for AttendancePatch {
    fn from(payload: AttendancePayload) -> Self {
        Self {
            employee: payload.employee,
            date: payload.date,
            status: payload.status,
            check_in_time: payload.check_in_time,
            check_out_time: payload.check_out_time,
        }
    }
}

impl AttendanceDraft {
    pub fn apply(&mut self, patch: AttendancePatch) {
        if let Some(employee) = patch.employee {
            self.employee = employee;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(check_in_time) = patch.check_in_time {
            self.check_in_time = check_in_time;
        }
        if let Some(check_out_time) = patch.check_out_time {
            self.check_out_time = check_out_time;
        }
    }
}

impl From<Attendance> for AttendanceDraft {
    fn from(row: Attendance) -> Self {
        Self {
            employee: row.employee,
            date: row.date,
            status: row.status,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
        }
    }
}

impl From<AttendanceDraft> for AttendancePatch {
    fn from(draft: AttendanceDraft) -> Self {
        Self {
            employee: Some(draft.employee),
            date: Some(draft.date),
            status: Some(draft.status),
            check_in_time: Some(draft.check_in_time),
            check_out_time: Some(draft.check_out_time),
        }
    }
}

impl Record for Attendance {
    type Draft = AttendanceDraft;
    type Patch = AttendancePatch;

    const NAME: &'static str = "Attendance";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: AttendanceDraft) -> Self {
        Self {
            id,
            employee: draft.employee,
            date: draft.date,
            status: draft.status,
            check_in_time: draft.check_in_time,
            check_out_time: draft.check_out_time,
        }
    }

    fn apply(draft: &mut AttendanceDraft, patch: AttendancePatch) {
        draft.apply(patch);
    }
}
