use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tracing::{debug, info};

use crate::db::repository::{
    DUPLICATE_ATTENDANCE, DUPLICATE_EMPLOYEE_ID, MISSING_EMPLOYEE, MISSING_SHIFT,
};
use crate::error::{AppError, FieldErrors};

/// ===============================
/// Named constraints from the migrations
/// ===============================
const CONSTRAINT_FIELDS: &[(&str, &str, &str)] = &[
    ("uq_employees_employee_id", "employee_id", DUPLICATE_EMPLOYEE_ID),
    ("uq_attendance_employee_date", "date", DUPLICATE_ATTENDANCE),
    ("fk_employees_shift", "shift", MISSING_SHIFT),
    ("fk_attendance_employee", "employee", MISSING_EMPLOYEE),
];

/// ===============================
/// Open the MySQL pool
/// ===============================
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
    run_migrations: bool,
) -> Result<MySqlPool, AppError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    if run_migrations {
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| AppError::Internal(e.into()))?;
        info!("Database migrations applied");
    }

    Ok(pool)
}

/// ===============================
/// Map a failed write to a field error
/// ===============================
///
/// MySQL reports unique (1062) and foreign-key (1451/1452) violations with
/// the constraint name inside the message; that name tells us which field
/// the caller got wrong. Anything else stays a database error.
pub fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        // 1406: Data too long for column 'x' at row 1
        if let Some(column) = too_long_column(db_err.message()) {
            return AppError::invalid(column, "Ensure this field is not longer than allowed.");
        }
        if db_err.is_unique_violation() || db_err.is_foreign_key_violation() {
            let message = db_err.message();
            debug!(error = %message, "Constraint violation");

            let mut fields = FieldErrors::new();
            for (constraint, field, text) in CONSTRAINT_FIELDS {
                if message.contains(constraint) {
                    fields.add(field, *text);
                }
            }
            if !fields.is_empty() {
                return AppError::Validation(fields);
            }
        }
    }
    AppError::Database(e)
}

fn too_long_column(message: &str) -> Option<&str> {
    message
        .strip_prefix("Data too long for column '")
        .and_then(|rest| rest.split_once('\''))
        .map(|(column, _)| column)
}
