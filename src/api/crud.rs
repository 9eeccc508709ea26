use actix_web::{HttpResponse, web};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::extract::JsonBody;
use crate::db::{Repository, Store};
use crate::error::AppError;
use crate::model::{Attendance, Employee, Record, Shift};

/// Employee with its shift resolved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct EmployeeView {
    #[serde(flatten)]
    pub employee: Employee,

    /// The referenced shift, or `null` when unassigned.
    pub shift_details: Option<Shift>,
}

/// Attendance with its employee (and that employee's shift) resolved.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceView {
    #[serde(flatten)]
    pub attendance: Attendance,

    pub employee_details: EmployeeView,
}

/// A record type served over HTTP: where it is stored and how it is
/// rendered. References are looked up here, at read time.
#[allow(async_fn_in_trait)]
pub trait Resource: Record + Serialize {
    type View: Serialize;

    fn repository(store: &Store) -> &dyn Repository<Self>;

    async fn render(self, store: &Store) -> Result<Self::View, AppError>;
}

impl Resource for Shift {
    type View = Shift;

    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.shifts.as_ref()
    }

    async fn render(self, _store: &Store) -> Result<Shift, AppError> {
        Ok(self)
    }
}

impl Resource for Employee {
    type View = EmployeeView;

    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.employees.as_ref()
    }

    async fn render(self, store: &Store) -> Result<EmployeeView, AppError> {
        let shift_details = match self.shift {
            Some(id) => match store.shifts.get(id).await {
                Ok(shift) => Some(shift),
                Err(AppError::NotFound { .. }) => None,
                Err(e) => return Err(e),
            },
            None => None,
        };

        Ok(EmployeeView {
            employee: self,
            shift_details,
        })
    }
}

impl Resource for Attendance {
    type View = AttendanceView;

    fn repository(store: &Store) -> &dyn Repository<Self> {
        store.attendance.as_ref()
    }

    async fn render(self, store: &Store) -> Result<AttendanceView, AppError> {
        let employee = store.employees.get(self.employee).await?;
        Ok(AttendanceView {
            attendance: self,
            employee_details: employee.render(store).await?,
        })
    }
}

pub async fn list<T: Resource>(store: web::Data<Store>) -> Result<HttpResponse, AppError> {
    let rows = T::repository(&store).list().await?;
    let views = try_join_all(rows.into_iter().map(|row| row.render(&store))).await?;

    Ok(HttpResponse::Ok().json(views))
}

pub async fn get<T: Resource>(
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let row = T::repository(&store).get(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(row.render(&store).await?))
}

pub async fn create<T: Resource>(
    store: web::Data<Store>,
    payload: JsonBody<T::Draft>,
) -> Result<HttpResponse, AppError> {
    let row = T::repository(&store).create(payload.into_inner()).await?;
    info!(entity = T::NAME, id = row.id(), "Created");

    Ok(HttpResponse::Created().json(row.render(&store).await?))
}

/// `PUT`: every required field must be present.
pub async fn replace<T: Resource>(
    store: web::Data<Store>,
    path: web::Path<u64>,
    payload: JsonBody<T::Draft>,
) -> Result<HttpResponse, AppError> {
    let patch = T::Patch::from(payload.into_inner());
    let row = T::repository(&store).update(path.into_inner(), patch).await?;
    info!(entity = T::NAME, id = row.id(), "Replaced");

    Ok(HttpResponse::Ok().json(row.render(&store).await?))
}

/// `PATCH`: absent fields keep their stored values.
pub async fn modify<T: Resource>(
    store: web::Data<Store>,
    path: web::Path<u64>,
    payload: JsonBody<T::Patch>,
) -> Result<HttpResponse, AppError> {
    let row = T::repository(&store)
        .update(path.into_inner(), payload.into_inner())
        .await?;
    info!(entity = T::NAME, id = row.id(), "Updated");

    Ok(HttpResponse::Ok().json(row.render(&store).await?))
}

pub async fn remove<T: Resource>(
    store: web::Data<Store>,
    path: web::Path<u64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    T::repository(&store).delete(id).await?;
    info!(entity = T::NAME, id, "Deleted");

    Ok(HttpResponse::NoContent().finish())
}
