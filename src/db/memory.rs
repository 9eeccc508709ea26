//! In-process backend with the same constraint behavior as the MySQL
//! schema. Used by the test suite and by `STORAGE_BACKEND=memory`.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::NaiveDate;
use validator::Validate;

use super::repository::{
    AttendanceLookup, DUPLICATE_ATTENDANCE, DUPLICATE_EMPLOYEE_ID, MISSING_EMPLOYEE,
    MISSING_SHIFT, Repository,
};
use crate::error::{AppError, FieldErrors};
use crate::model::{Attendance, AttendanceDraft, Employee, EmployeeDraft, Record, Shift, ShiftDraft};

struct Table<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Record> Table<T> {
    fn get(&self, id: u64) -> Result<T, AppError> {
        self.rows
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::not_found::<T>(id))
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    fn put(&mut self, row: T) -> T {
        self.rows.insert(row.id(), row.clone());
        row
    }
}

#[derive(Default)]
struct Tables {
    shifts: Table<Shift>,
    employees: Table<Employee>,
    attendance: Table<Attendance>,
}

/// How each record type sits in [`Tables`]: where its rows live, which
/// cross-row constraints a write must satisfy, and what deleting rows does
/// to dependents.
trait Stored: Record {
    fn table(tables: &Tables) -> &Table<Self>;

    fn table_mut(tables: &mut Tables) -> &mut Table<Self>;

    /// Uniqueness and reference checks. `id` is the row being replaced, if
    /// any, so it does not collide with itself.
    fn check(tables: &Tables, draft: &Self::Draft, id: Option<u64>) -> Result<(), AppError>;

    fn on_delete(_tables: &mut Tables, _removed: &[u64]) {}
}

impl Stored for Shift {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.shifts
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.shifts
    }

    fn check(_tables: &Tables, _draft: &ShiftDraft, _id: Option<u64>) -> Result<(), AppError> {
        Ok(())
    }

    // nullify
    fn on_delete(tables: &mut Tables, removed: &[u64]) {
        for employee in tables.employees.rows.values_mut() {
            if employee.shift.is_some_and(|s| removed.contains(&s)) {
                employee.shift = None;
            }
        }
    }
}

impl Stored for Employee {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.employees
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.employees
    }

    fn check(tables: &Tables, draft: &EmployeeDraft, id: Option<u64>) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        if tables
            .employees
            .rows
            .values()
            .any(|e| Some(e.id) != id && e.employee_id == draft.employee_id)
        {
            errors.add("employee_id", DUPLICATE_EMPLOYEE_ID);
        }
        if let Some(shift) = draft.shift {
            if !tables.shifts.rows.contains_key(&shift) {
                errors.add("shift", MISSING_SHIFT);
            }
        }
        errors.into_result()
    }

    // cascade
    fn on_delete(tables: &mut Tables, removed: &[u64]) {
        tables
            .attendance
            .rows
            .retain(|_, a| !removed.contains(&a.employee));
    }
}

impl Stored for Attendance {
    fn table(tables: &Tables) -> &Table<Self> {
        &tables.attendance
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.attendance
    }

    fn check(tables: &Tables, draft: &AttendanceDraft, id: Option<u64>) -> Result<(), AppError> {
        let mut errors = FieldErrors::new();
        if !tables.employees.rows.contains_key(&draft.employee) {
            errors.add("employee", MISSING_EMPLOYEE);
        }
        if tables
            .attendance
            .rows
            .values()
            .any(|a| Some(a.id) != id && a.employee == draft.employee && a.date == draft.date)
        {
            errors.add("date", DUPLICATE_ATTENDANCE);
        }
        errors.into_result()
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal(anyhow!("memory store lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal(anyhow!("memory store lock poisoned")))
    }

    fn insert<T: Stored>(&self, draft: T::Draft) -> Result<T, AppError> {
        draft.validate()?;
        let mut tables = self.write()?;
        T::check(&tables, &draft, None)?;

        let table = T::table_mut(&mut tables);
        let id = table.next_id();
        Ok(table.put(T::from_draft(id, draft)))
    }

    fn replace<T: Stored>(&self, id: u64, patch: T::Patch) -> Result<T, AppError> {
        let mut tables = self.write()?;
        let draft = T::table(&tables).get(id)?.merged(patch);
        draft.validate()?;
        T::check(&tables, &draft, Some(id))?;

        Ok(T::table_mut(&mut tables).put(T::from_draft(id, draft)))
    }

    fn remove<T: Stored>(&self, id: u64) -> Result<(), AppError> {
        let mut tables = self.write()?;
        T::table_mut(&mut tables)
            .rows
            .remove(&id)
            .ok_or_else(|| AppError::not_found::<T>(id))?;
        T::on_delete(&mut tables, &[id]);
        Ok(())
    }

    fn remove_all<T: Stored>(&self) -> Result<u64, AppError> {
        let mut tables = self.write()?;
        let removed: Vec<u64> = T::table(&tables).rows.keys().copied().collect();
        T::table_mut(&mut tables).rows.clear();
        T::on_delete(&mut tables, &removed);
        Ok(removed.len() as u64)
    }
}

#[async_trait]
impl<T: Stored> Repository<T> for MemoryStore {
    async fn list(&self) -> Result<Vec<T>, AppError> {
        Ok(T::table(&*self.read()?).rows.values().cloned().collect())
    }

    async fn get(&self, id: u64) -> Result<T, AppError> {
        T::table(&*self.read()?).get(id)
    }

    async fn create(&self, draft: T::Draft) -> Result<T, AppError> {
        self.insert(draft)
    }

    async fn update(&self, id: u64, patch: T::Patch) -> Result<T, AppError> {
        self.replace::<T>(id, patch)
    }

    async fn delete(&self, id: u64) -> Result<(), AppError> {
        self.remove::<T>(id)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        self.remove_all::<T>()
    }
}

#[async_trait]
impl AttendanceLookup for MemoryStore {
    async fn find_by_employee_and_date(
        &self,
        employee: u64,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, AppError> {
        Ok(self
            .read()?
            .attendance
            .rows
            .values()
            .find(|a| a.employee == employee && a.date == date)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttendancePatch, EmployeePatch, ShiftPatch};
    use chrono::NaiveTime;

    fn time(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn shift_draft(name: &str) -> ShiftDraft {
        ShiftDraft {
            name: name.into(),
            start_time: time(9),
            end_time: time(17),
        }
    }

    fn employee_draft(code: &str, shift: Option<u64>) -> EmployeeDraft {
        EmployeeDraft {
            employee_id: code.into(),
            full_name: "Brett Johnson".into(),
            email: format!("{}@example.com", code.to_lowercase()),
            department: "Design".into(),
            role: "UI Designer".into(),
            profile_image: None,
            shift,
        }
    }

    fn attendance_draft(employee: u64, date: NaiveDate) -> AttendanceDraft {
        AttendanceDraft {
            employee,
            date,
            status: "Present".into(),
            check_in_time: Some(time(9)),
            check_out_time: None,
        }
    }

    async fn seed_employee(store: &MemoryStore, code: &str) -> Employee {
        Repository::<Employee>::create(store, employee_draft(code, None))
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn ids_are_assigned_in_order() {
        let store = MemoryStore::new();
        let a: Shift = store.insert(shift_draft("First Shift")).unwrap();
        let b: Shift = store.insert(shift_draft("Second Shift")).unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        let all: Vec<Shift> = store.list().await.unwrap();
        assert_eq!(all, vec![a, b]);
    }

    #[actix_web::test]
    async fn duplicate_employee_code_is_rejected() {
        let store = MemoryStore::new();
        seed_employee(&store, "EMP01").await;

        let err = Repository::<Employee>::create(&store, employee_draft("EMP01", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(f) if f.contains("employee_id")));

        let all: Vec<Employee> = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[actix_web::test]
    async fn employee_may_keep_own_code_on_update() {
        let store = MemoryStore::new();
        let emp = seed_employee(&store, "EMP01").await;

        let patch = EmployeePatch {
            employee_id: Some("EMP01".into()),
            full_name: Some("Brett J.".into()),
            ..Default::default()
        };
        let updated: Employee = store.update(emp.id, patch).await.unwrap();
        assert_eq!(updated.full_name, "Brett J.");
    }

    #[actix_web::test]
    async fn unknown_shift_reference_is_rejected() {
        let store = MemoryStore::new();
        let err = Repository::<Employee>::create(&store, employee_draft("EMP01", Some(42)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(f) if f.contains("shift")));
    }

    #[actix_web::test]
    async fn duplicate_attendance_pair_leaves_existing_row() {
        let store = MemoryStore::new();
        let emp = seed_employee(&store, "EMP01").await;
        let first: Attendance = store.create(attendance_draft(emp.id, day(1))).await.unwrap();

        let mut second = attendance_draft(emp.id, day(1));
        second.status = "Late".into();
        let err = Repository::<Attendance>::create(&store, second)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(f) if f.contains("date")));

        let stored: Attendance = store.get(first.id).await.unwrap();
        assert_eq!(stored, first);
    }

    #[actix_web::test]
    async fn failed_update_changes_nothing() {
        let store = MemoryStore::new();
        let shift: Shift = store.insert(shift_draft("First Shift")).unwrap();

        let patch = ShiftPatch {
            name: Some(String::new()),
            start_time: Some(time(6)),
            ..Default::default()
        };
        assert!(Repository::<Shift>::update(&store, shift.id, patch).await.is_err());

        let stored: Shift = store.get(shift.id).await.unwrap();
        assert_eq!(stored, shift);
    }

    #[actix_web::test]
    async fn deleting_employee_cascades_to_its_attendance_only() {
        let store = MemoryStore::new();
        let brett = seed_employee(&store, "EMP01").await;
        let jeff = seed_employee(&store, "EMP03").await;
        for d in 1..=3 {
            let _: Attendance = store.create(attendance_draft(brett.id, day(d))).await.unwrap();
        }
        let kept: Attendance = store.create(attendance_draft(jeff.id, day(1))).await.unwrap();

        Repository::<Employee>::delete(&store, brett.id).await.unwrap();

        let left: Vec<Attendance> = store.list().await.unwrap();
        assert_eq!(left, vec![kept]);
        let employees: Vec<Employee> = store.list().await.unwrap();
        assert_eq!(employees, vec![jeff]);
    }

    #[actix_web::test]
    async fn deleting_shift_nullifies_employees() {
        let store = MemoryStore::new();
        let shift: Shift = store.insert(shift_draft("First Shift")).unwrap();
        let emp: Employee = store.create(employee_draft("EMP01", Some(shift.id))).await.unwrap();

        Repository::<Shift>::delete(&store, shift.id).await.unwrap();

        let stored: Employee = store.get(emp.id).await.unwrap();
        assert_eq!(stored.shift, None);
        assert_eq!(stored.employee_id, "EMP01");
    }

    #[actix_web::test]
    async fn missing_rows_report_not_found() {
        let store = MemoryStore::new();
        let err = Repository::<Shift>::delete(&store, 9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Shift", id: 9 }));

        let err = Repository::<Attendance>::update(&store, 9, AttendancePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "Attendance", .. }));
    }

    #[actix_web::test]
    async fn finds_attendance_by_natural_key() {
        let store = MemoryStore::new();
        let emp = seed_employee(&store, "EMP01").await;
        let row: Attendance = store.create(attendance_draft(emp.id, day(2))).await.unwrap();

        let found = store.find_by_employee_and_date(emp.id, day(2)).await.unwrap();
        assert_eq!(found, Some(row));
        assert!(
            store
                .find_by_employee_and_date(emp.id, day(3))
                .await
                .unwrap()
                .is_none()
        );
    }
}
