use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::Record;
use crate::utils::serde_utils::double_option;

pub const DEFAULT_ROLE: &str = "Software Engineer";

fn default_role() -> String {
    DEFAULT_ROLE.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": "EMP01",
        "full_name": "Brett Johnson",
        "email": "emp01@example.com",
        "department": "Design",
        "role": "UI Designer",
        "profile_image": "https://i.pravatar.cc/150?u=brett",
        "shift": 1
    })
)]
pub struct Employee {
    /// Assigned on create. Sent as a JSON number, never a string.
    #[schema(example = 1)]
    pub id: u64,

    /// External employee code, unique across all employees.
    #[schema(example = "EMP01")]
    pub employee_id: String,

    #[schema(example = "Brett Johnson")]
    pub full_name: String,

    #[schema(example = "emp01@example.com")]
    pub email: String,

    #[schema(example = "Design")]
    pub department: String,

    #[schema(example = "UI Designer")]
    pub role: String,

    #[schema(example = "https://i.pravatar.cc/150?u=brett", nullable = true)]
    pub profile_image: Option<String>,

    /// Id of the assigned shift. Cleared when that shift is deleted.
    #[sqlx(rename = "shift_id")]
    #[schema(example = 1, nullable = true)]
    pub shift: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
pub struct EmployeeDraft {
    #[validate(length(min = 1, max = 20, message = "Employee id must be 1 to 20 characters."))]
    #[schema(example = "EMP05")]
    pub employee_id: String,

    #[validate(length(min = 1, max = 100, message = "Full name must be 1 to 100 characters."))]
    #[schema(example = "Dana Reyes")]
    pub full_name: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    #[schema(example = "emp05@example.com")]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Department must be 1 to 100 characters."))]
    #[schema(example = "Development")]
    pub department: String,

    #[serde(default = "default_role")]
    #[validate(length(min = 1, max = 100, message = "Role must be 1 to 100 characters."))]
    #[schema(example = "Software Engineer")]
    pub role: String,

    #[serde(default)]
    #[validate(
        url(message = "Enter a valid URL."),
        length(max = 200, message = "Ensure this field has no more than 200 characters.")
    )]
    #[schema(nullable = true)]
    pub profile_image: Option<String>,

    #[serde(default)]
    #[schema(example = 1, nullable = true)]
    pub shift: Option<u64>,
}

/// Partial update. For `profile_image` and `shift`, an explicit `null`
/// clears the value while an absent key leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct EmployeePatch {
    pub employee_id: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub role: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub profile_image: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<u64>)]
    pub shift: Option<Option<u64>>,
}

impl EmployeeDraft {
    pub fn apply(&mut self, patch: EmployeePatch) {
        if let Some(employee_id) = patch.employee_id {
            self.employee_id = employee_id;
        }
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(department) = patch.department {
            self.department = department;
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(profile_image) = patch.profile_image {
            self.profile_image = profile_image;
        }
        if let Some(shift) = patch.shift {
            self.shift = shift;
        }
    }
}

impl From<Employee> for EmployeeDraft {
    fn from(employee: Employee) -> Self {
        Self {
            employee_id: employee.employee_id,
            full_name: employee.full_name,
            email: employee.email,
            department: employee.department,
            role: employee.role,
            profile_image: employee.profile_image,
            shift: employee.shift,
        }
    }
}

impl From<EmployeeDraft> for EmployeePatch {
    fn from(draft: EmployeeDraft) -> Self {
        Self {
            employee_id: Some(draft.employee_id),
            full_name: Some(draft.full_name),
            email: Some(draft.email),
            department: Some(draft.department),
            role: Some(draft.role),
            profile_image: Some(draft.profile_image),
            shift: Some(draft.shift),
        }
    }
}

impl Record for Employee {
    type Draft = EmployeeDraft;
    type Patch = EmployeePatch;

    const NAME: &'static str = "Employee";

    fn id(&self) -> u64 {
        self.id
    }

    fn from_draft(id: u64, draft: EmployeeDraft) -> Self {
        Self {
            id,
            employee_id: draft.employee_id,
            full_name: draft.full_name,
            email: draft.email,
            department: draft.department,
            role: draft.role,
            profile_image: draft.profile_image,
            shift: draft.shift,
        }
    }

    fn apply(draft: &mut EmployeeDraft, patch: EmployeePatch) {
        draft.apply(patch);
    }
}
