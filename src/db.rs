pub mod memory;
pub mod mysql;
pub mod repository;

use std::sync::Arc;

use anyhow::anyhow;
use serde::Serialize;
use tracing::info;

use crate::config::{Config, StorageBackend};
use crate::error::AppError;
use crate::model::{Attendance, Employee, Shift};
use crate::utils::db_utils::connect_pool;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;
pub use repository::{AttendanceLookup, Repository};

/// Handle to every collection. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    pub shifts: Arc<dyn Repository<Shift>>,
    pub employees: Arc<dyn Repository<Employee>>,
    pub attendance: Arc<dyn Repository<Attendance>>,
    pub attendance_lookup: Arc<dyn AttendanceLookup>,
}

/// Rows removed per collection by [`Store::clear_all`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Teardown {
    pub attendance: u64,
    pub employees: u64,
    pub shifts: u64,
}

impl Store {
    fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: Repository<Shift>
            + Repository<Employee>
            + Repository<Attendance>
            + AttendanceLookup
            + 'static,
    {
        Self {
            shifts: backend.clone(),
            employees: backend.clone(),
            attendance: backend.clone(),
            attendance_lookup: backend,
        }
    }

    pub fn memory() -> Self {
        Self::from_backend(Arc::new(MemoryStore::new()))
    }

    pub fn mysql(pool: sqlx::MySqlPool) -> Self {
        Self::from_backend(Arc::new(MySqlStore::new(pool)))
    }

    pub async fn init(config: &Config) -> Result<Self, AppError> {
        match config.storage {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Ok(Self::memory())
            }
            StorageBackend::MySql => {
                let url = config.database_url.as_deref().ok_or_else(|| {
                    AppError::Internal(anyhow!("DATABASE_URL must be set for mysql storage"))
                })?;
                let pool =
                    connect_pool(url, config.db_max_connections, config.run_migrations).await?;
                info!("Connected to MySQL");
                Ok(Self::mysql(pool))
            }
        }
    }

    /// Deletes every row, children before parents: attendance, then
    /// employees, then shifts.
    pub async fn clear_all(&self) -> Result<Teardown, AppError> {
        let attendance = self.attendance.clear().await?;
        info!(rows = attendance, "Cleared attendance");
        let employees = self.employees.clear().await?;
        info!(rows = employees, "Cleared employees");
        let shifts = self.shifts.clear().await?;
        info!(rows = shifts, "Cleared shifts");

        Ok(Teardown {
            attendance,
            employees,
            shifts,
        })
    }
}
