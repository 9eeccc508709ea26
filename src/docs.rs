use crate::api::crud::{AttendanceView, EmployeeView};
use crate::model::{
    Attendance, AttendanceDraft, AttendancePatch, AttendancePayload, Employee, EmployeeDraft,
    EmployeePatch, Shift, ShiftDraft, ShiftPatch,
};
use utoipa::Modify;
use utoipa::openapi::path::{OperationBuilder, ParameterBuilder, ParameterIn, PathItemType};
use utoipa::openapi::request_body::RequestBodyBuilder;
use utoipa::openapi::{
    Array, Content, Object, Ref, RefOr, Required, ResponseBuilder, Schema, SchemaType,
};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System

Employee records, shift definitions and daily attendance.

### Key Features
- **Shifts**: named working windows
- **Employees**: profiles with an optional shift
- **Attendance**: one row per employee per day; posting again for the same
  day updates that row instead of creating another

### Response Format
- JSON bodies
- Employees embed `shift_details`; attendance embeds `employee_details`
- Validation failures return `400` with per-field `errors`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(crate::api::attendance::record),
    components(
        schemas(
            Shift,
            ShiftDraft,
            ShiftPatch,
            Employee,
            EmployeeDraft,
            EmployeePatch,
            EmployeeView,
            Attendance,
            AttendanceDraft,
            AttendancePatch,
            AttendancePayload,
            AttendanceView
        )
    ),
    modifiers(&CrudPaths),
    tags(
        (name = "Shift", description = "Shift management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

/// (collection path, tag, view schema, draft schema, patch schema, create on POST)
const COLLECTIONS: &[(&str, &str, &str, &str, &str, bool)] = &[
    ("/api/shifts", "Shift", "Shift", "ShiftDraft", "ShiftPatch", true),
    (
        "/api/employees",
        "Employee",
        "EmployeeView",
        "EmployeeDraft",
        "EmployeePatch",
        true,
    ),
    // POST is the documented upsert handler
    (
        "/api/attendance",
        "Attendance",
        "AttendanceView",
        "AttendanceDraft",
        "AttendancePatch",
        false,
    ),
];

/// The CRUD handlers are generic, so their paths are written out here
/// rather than through `#[utoipa::path]`.
struct CrudPaths;

fn json_ref(schema: &str) -> Content {
    Content::new(RefOr::Ref(Ref::from_schema_name(schema)))
}

fn json_body(schema: &str) -> openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content("application/json", json_ref(schema))
        .required(Some(Required::True))
        .build()
}

fn ok(description: &str, schema: &str) -> openapi::Response {
    ResponseBuilder::new()
        .description(description)
        .content("application/json", json_ref(schema))
        .build()
}

fn plain(description: &str) -> openapi::Response {
    ResponseBuilder::new().description(description).build()
}

fn id_param() -> openapi::path::Parameter {
    ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(RefOr::T(Schema::Object(Object::with_type(
            SchemaType::Integer,
        )))))
        .build()
}

impl Modify for CrudPaths {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        for &(base, tag, view, draft, patch, with_create) in COLLECTIONS {
            let list = OperationBuilder::new()
                .tag(tag)
                .summary(Some(format!("List {tag}")))
                .response(
                    "200",
                    ResponseBuilder::new()
                        .description("All rows, rendered")
                        .content(
                            "application/json",
                            Content::new(RefOr::T(Schema::Array(Array::new(RefOr::Ref(
                                Ref::from_schema_name(view),
                            ))))),
                        )
                        .build(),
                )
                .build();

            let collection = openapi.paths.paths.entry(base.to_string()).or_default();
            collection.operations.insert(PathItemType::Get, list);
            if with_create {
                let create = OperationBuilder::new()
                    .tag(tag)
                    .summary(Some(format!("Create {tag}")))
                    .request_body(Some(json_body(draft)))
                    .response("201", ok("Created", view))
                    .response("400", plain("Validation failed"))
                    .build();
                collection.operations.insert(PathItemType::Post, create);
            }

            let get = OperationBuilder::new()
                .tag(tag)
                .summary(Some(format!("Get {tag}")))
                .parameter(id_param())
                .response("200", ok("Found", view))
                .response("404", plain("Not found"))
                .build();
            let put = OperationBuilder::new()
                .tag(tag)
                .summary(Some(format!("Replace {tag}")))
                .parameter(id_param())
                .request_body(Some(json_body(draft)))
                .response("200", ok("Updated", view))
                .response("400", plain("Validation failed"))
                .response("404", plain("Not found"))
                .build();
            let patch_op = OperationBuilder::new()
                .tag(tag)
                .summary(Some(format!("Partially update {tag}")))
                .parameter(id_param())
                .request_body(Some(json_body(patch)))
                .response("200", ok("Updated", view))
                .response("400", plain("Validation failed"))
                .response("404", plain("Not found"))
                .build();
            let delete = OperationBuilder::new()
                .tag(tag)
                .summary(Some(format!("Delete {tag}")))
                .parameter(id_param())
                .response("204", plain("Deleted"))
                .response("404", plain("Not found"))
                .build();

            let item = openapi
                .paths
                .paths
                .entry(format!("{base}/{{id}}"))
                .or_default();
            item.operations.insert(PathItemType::Get, get);
            item.operations.insert(PathItemType::Put, put);
            item.operations.insert(PathItemType::Patch, patch_op);
            item.operations.insert(PathItemType::Delete, delete);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_collection() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/shifts",
            "/api/shifts/{id}",
            "/api/employees",
            "/api/employees/{id}",
            "/api/attendance",
            "/api/attendance/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let attendance = &doc.paths.paths["/api/attendance"];
        assert!(attendance.operations.contains_key(&PathItemType::Post));
        assert!(attendance.operations.contains_key(&PathItemType::Get));
    }
}
