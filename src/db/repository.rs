use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::{Attendance, Record};

pub const DUPLICATE_EMPLOYEE_ID: &str = "Employee with this employee id already exists.";
pub const DUPLICATE_ATTENDANCE: &str = "The fields employee, date must make a unique set.";
pub const MISSING_SHIFT: &str = "Referenced shift does not exist.";
pub const MISSING_EMPLOYEE: &str = "Referenced employee does not exist.";

/// Per-collection persistence.
///
/// Every write validates the resulting row (field constraints, uniqueness,
/// references) before anything is stored; a failed write leaves the
/// collection as it was.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// All rows, ordered by id.
    async fn list(&self) -> Result<Vec<T>, AppError>;

    async fn get(&self, id: u64) -> Result<T, AppError>;

    async fn create(&self, draft: T::Draft) -> Result<T, AppError>;

    /// Merges `patch` over the stored row, validates the merged result and
    /// writes it back.
    async fn update(&self, id: u64, patch: T::Patch) -> Result<T, AppError>;

    async fn delete(&self, id: u64) -> Result<(), AppError>;

    /// Deletes every row, returning how many went away.
    async fn clear(&self) -> Result<u64, AppError>;
}

/// Lookup of attendance by its natural key.
#[async_trait]
pub trait AttendanceLookup: Send + Sync {
    async fn find_by_employee_and_date(
        &self,
        employee: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError>;
}
