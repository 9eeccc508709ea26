use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::mysql::{MySqlArguments, MySqlRow};
use sqlx::query::Query;
use sqlx::{FromRow, MySql, MySqlPool};
use tracing::{debug, error};
use validator::Validate;

use super::repository::{AttendanceLookup, Repository};
use crate::error::AppError;
use crate::model::{Attendance, AttendanceDraft, Employee, EmployeeDraft, Record, Shift, ShiftDraft};
use crate::utils::db_utils::map_write_error;

type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

/// Table layout for a record: its name, the non-id columns in bind order,
/// and how a draft fills those binds.
pub trait SqlTable: Record + for<'r> FromRow<'r, MySqlRow> + Unpin {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn bind(query: MySqlQuery<'_>, draft: Self::Draft) -> MySqlQuery<'_>;
}

impl SqlTable for Shift {
    const TABLE: &'static str = "shifts";
    const COLUMNS: &'static [&'static str] = &["name", "start_time", "end_time"];

    fn bind(query: MySqlQuery<'_>, draft: ShiftDraft) -> MySqlQuery<'_> {
        query
            .bind(draft.name)
            .bind(draft.start_time)
            .bind(draft.end_time)
    }
}

impl SqlTable for Employee {
    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &[
        "employee_id",
        "full_name",
        "email",
        "department",
        "role",
        "profile_image",
        "shift_id",
    ];

    fn bind(query: MySqlQuery<'_>, draft: EmployeeDraft) -> MySqlQuery<'_> {
        query
            .bind(draft.employee_id)
            .bind(draft.full_name)
            .bind(draft.email)
            .bind(draft.department)
            .bind(draft.role)
            .bind(draft.profile_image)
            .bind(draft.shift)
    }
}

impl SqlTable for Attendance {
    const TABLE: &'static str = "attendance";
    const COLUMNS: &'static [&'static str] = &[
        "employee_id",
        "date",
        "status",
        "check_in_time",
        "check_out_time",
    ];

    fn bind(query: MySqlQuery<'_>, draft: AttendanceDraft) -> MySqlQuery<'_> {
        query
            .bind(draft.employee)
            .bind(draft.date)
            .bind(draft.status)
            .bind(draft.check_in_time)
            .bind(draft.check_out_time)
    }
}

fn select_sql<T: SqlTable>() -> String {
    format!("SELECT id, {} FROM {}", T::COLUMNS.join(", "), T::TABLE)
}

fn insert_sql<T: SqlTable>() -> String {
    let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders
    )
}

fn update_sql<T: SqlTable>() -> String {
    let set_clause = T::COLUMNS
        .iter()
        .map(|c| format!("{} = ?", c))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {} SET {} WHERE id = ?", T::TABLE, set_clause)
}

#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch<T: SqlTable>(&self, id: u64) -> Result<T, AppError> {
        let sql = format!("{} WHERE id = ?", select_sql::<T>());
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found::<T>(id))
    }
}

#[async_trait]
impl<T: SqlTable> Repository<T> for MySqlStore {
    async fn list(&self) -> Result<Vec<T>, AppError> {
        let sql = format!("{} ORDER BY id", select_sql::<T>());
        debug!(sql = %sql, "Listing rows");

        let rows = sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, table = T::TABLE, "Failed to list rows");
                AppError::from(e)
            })?;
        Ok(rows)
    }

    async fn get(&self, id: u64) -> Result<T, AppError> {
        self.fetch(id).await
    }

    async fn create(&self, draft: T::Draft) -> Result<T, AppError> {
        draft.validate()?;

        let sql = insert_sql::<T>();
        debug!(sql = %sql, "Inserting row");

        let result = T::bind(sqlx::query(&sql), draft)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        self.fetch(result.last_insert_id()).await
    }

    async fn update(&self, id: u64, patch: T::Patch) -> Result<T, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = format!("{} WHERE id = ? FOR UPDATE", select_sql::<T>());
        let current = sqlx::query_as::<_, T>(&locked)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found::<T>(id))?;

        let draft = current.merged(patch);
        draft.validate()?;

        let sql = update_sql::<T>();
        debug!(sql = %sql, id, "Updating row");

        T::bind(sqlx::query(&sql), draft)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(map_write_error)?;

        let updated = sqlx::query_as::<_, T>(&locked)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(updated)
    }

    async fn delete(&self, id: u64) -> Result<(), AppError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, table = T::TABLE, id, "Failed to delete row");
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found::<T>(id));
        }
        Ok(())
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let sql = format!("DELETE FROM {}", T::TABLE);
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl AttendanceLookup for MySqlStore {
    async fn find_by_employee_and_date(
        &self,
        employee: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        let sql = format!(
            "{} WHERE employee_id = ? AND date = ?",
            select_sql::<Attendance>()
        );
        let row = sqlx::query_as::<_, Attendance>(&sql)
            .bind(employee)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }
}
