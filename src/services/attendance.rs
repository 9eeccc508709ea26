use tracing::{debug, info};

use crate::db::Store;
use crate::error::AppError;
use crate::model::{Attendance, AttendancePatch, AttendancePayload};

/// What recording attendance did to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    /// No row existed for the employee and day; one was created.
    Created(Attendance),
    /// The existing row for the employee and day was updated in place.
    Modified(Attendance),
}

impl Recorded {
    pub fn attendance(&self) -> &Attendance {
        match self {
            Recorded::Created(a) | Recorded::Modified(a) => a,
        }
    }

    pub fn into_attendance(self) -> Attendance {
        match self {
            Recorded::Created(a) | Recorded::Modified(a) => a,
        }
    }
}

/// Check-in, check-out or correction for one employee on one day.
///
/// Finds the row keyed by `(employee, date)`. If present, only the fields
/// carried by `payload` overwrite it; everything else keeps its stored
/// value. Otherwise a fresh row is created, which needs `status` as well.
///
/// The lookup and the write are separate steps. Two first check-ins racing
/// for the same key can both miss; the loser fails on the unique
/// `(employee, date)` constraint. A row deleted between the lookup and the
/// update is treated as absent and created afresh.
pub async fn record(store: &Store, payload: AttendancePayload) -> Result<Recorded, AppError> {
    let (employee, date) = payload.natural_key()?;

    let existing = store
        .attendance_lookup
        .find_by_employee_and_date(employee, date)
        .await?;

    if let Some(current) = existing {
        debug!(id = current.id, employee, %date, "Updating attendance");
        match store
            .attendance
            .update(current.id, AttendancePatch::from(payload.clone()))
            .await
        {
            Ok(updated) => return Ok(Recorded::Modified(updated)),
            // deleted since the lookup
            Err(AppError::NotFound { .. }) => {
                debug!(id = current.id, "Attendance row gone, creating instead");
            }
            Err(e) => return Err(e),
        }
    }

    let draft = payload.into_draft()?;
    let created = store.attendance.create(draft).await?;
    info!(id = created.id, employee, %date, "Attendance recorded");
    Ok(Recorded::Created(created))
}
