use anyhow::anyhow;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::info;

use crate::db::Store;
use crate::error::AppError;
use crate::model::{AttendanceDraft, EmployeeDraft, ShiftDraft};

/// (code, full name, role, department, avatar key)
const SAMPLE_EMPLOYEES: &[(&str, &str, &str, &str, &str)] = &[
    ("EMP01", "Brett Johnson", "UI Designer", "Design", "brett"),
    ("EMP02", "Rhodes Peter", "Project Manager", "Design", "rhodes"),
    ("EMP03", "Jeff Jane", "SW Lead", "Development", "jeff"),
    ("EMP04", "Emily Butler", "Data Scientist", "Data Science", "emily"),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub shifts: usize,
    pub employees: usize,
    pub attendance: usize,
}

fn at(hour: u32) -> Result<NaiveTime, AppError> {
    NaiveTime::from_hms_opt(hour, 0, 0)
        .ok_or_else(|| AppError::Internal(anyhow!("invalid hour {hour}")))
}

/// Replaces all data with two shifts, four employees on the first shift,
/// and an on-time 09:00–17:00 attendance row for each of them on `today`.
pub async fn seed(store: &Store, today: NaiveDate) -> Result<SeedSummary, AppError> {
    store.clear_all().await?;

    let first = store
        .shifts
        .create(ShiftDraft {
            name: "First Shift".into(),
            start_time: at(9)?,
            end_time: at(17)?,
        })
        .await?;
    store
        .shifts
        .create(ShiftDraft {
            name: "Second Shift".into(),
            start_time: at(14)?,
            end_time: at(22)?,
        })
        .await?;

    let mut summary = SeedSummary {
        shifts: 2,
        ..Default::default()
    };

    for &(code, name, role, department, avatar) in SAMPLE_EMPLOYEES {
        let employee = store
            .employees
            .create(EmployeeDraft {
                employee_id: code.into(),
                full_name: name.into(),
                email: format!("{}@example.com", code.to_lowercase()),
                department: department.into(),
                role: role.into(),
                profile_image: Some(format!("https://i.pravatar.cc/150?u={avatar}")),
                shift: Some(first.id),
            })
            .await?;
        summary.employees += 1;

        store
            .attendance
            .create(AttendanceDraft {
                employee: employee.id,
                date: today,
                status: "On-time".into(),
                check_in_time: Some(at(9)?),
                check_out_time: Some(at(17)?),
            })
            .await?;
        summary.attendance += 1;
    }

    info!(?summary, "Dummy data seeded");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[actix_web::test]
    async fn seeds_fixed_sample_set() {
        let store = Store::memory();
        let summary = seed(&store, today()).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                shifts: 2,
                employees: 4,
                attendance: 4
            }
        );

        let employees = store.employees.list().await.unwrap();
        let first_shift = store.shifts.list().await.unwrap()[0].id;
        assert!(employees.iter().all(|e| e.shift == Some(first_shift)));
        assert_eq!(employees[0].email, "emp01@example.com");

        let rows = store.attendance.list().await.unwrap();
        assert!(rows.iter().all(|a| a.date == today() && a.status == "On-time"));
    }

    #[actix_web::test]
    async fn reseeding_replaces_previous_data() {
        let store = Store::memory();
        seed(&store, today()).await.unwrap();
        seed(&store, today()).await.unwrap();

        assert_eq!(store.shifts.list().await.unwrap().len(), 2);
        assert_eq!(store.employees.list().await.unwrap().len(), 4);
        assert_eq!(store.attendance.list().await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn clear_all_empties_children_first() {
        let store = Store::memory();
        seed(&store, today()).await.unwrap();

        let teardown = store.clear_all().await.unwrap();
        assert_eq!(
            (teardown.attendance, teardown.employees, teardown.shifts),
            (4, 4, 2)
        );
        assert!(store.employees.list().await.unwrap().is_empty());
    }
}
