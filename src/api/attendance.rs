use actix_web::{HttpResponse, http::StatusCode, web};

use super::crud::Resource;
use super::extract::JsonBody;
use crate::db::Store;
use crate::error::AppError;
use crate::model::AttendancePayload;
use crate::services::attendance::{self, Recorded};

/// Record attendance
///
/// Creates the row for `(employee, date)` or, when one already exists,
/// updates only the fields present in the body.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = AttendancePayload,
    responses(
        (status = 201, description = "No row existed for this employee and day; created", body = super::crud::AttendanceView),
        (status = 200, description = "Existing row for this employee and day updated", body = super::crud::AttendanceView),
        (status = 400, description = "Missing key, unknown employee or invalid field", body = Object, example = json!({
            "message": "One or more fields are invalid",
            "errors": { "date": ["This field is required."] }
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn record(
    store: web::Data<Store>,
    payload: JsonBody<AttendancePayload>,
) -> Result<HttpResponse, AppError> {
    let outcome = attendance::record(&store, payload.into_inner()).await?;

    let status = match &outcome {
        Recorded::Created(_) => StatusCode::CREATED,
        Recorded::Modified(_) => StatusCode::OK,
    };
    let view = outcome.into_attendance().render(&store).await?;

    Ok(HttpResponse::build(status).json(view))
}
