/// Employee model, onboarding status state machine, and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TYPE employee_status AS ENUM (
///     'application_received', 'interview_scheduled', 'hired', 'not_accepted'
/// );
///
/// CREATE TABLE employees (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
///     department_id UUID NOT NULL REFERENCES departments(id) ON DELETE RESTRICT,
///     employee_status employee_status NOT NULL DEFAULT 'application_received',
///     name VARCHAR(200) NOT NULL,
///     email CITEXT NOT NULL,
///     mobile_number VARCHAR(16) NOT NULL,
///     address TEXT NOT NULL,
///     designation VARCHAR(200) NOT NULL,
///     hired_on DATE,
///     days_employed INTEGER,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CHECK (employee_status <> 'hired' OR hired_on IS NOT NULL)
/// );
/// ```
///
/// # Invariants
///
/// - The employee's department must belong to the employee's company; the
///   ops layer keeps this true by deriving `company_id` from the department.
/// - `hired_on` is set exactly when the status is `hired`; `days_employed`
///   is `today - hired_on` and null for every other status.
/// - Status changes follow a fixed transition graph, see [`EmployeeStatus`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use std::fmt;
use uuid::Uuid;

/// Onboarding status of an employee
///
/// The allowed transitions form a small directed graph:
///
/// ```text
/// application_received ──> interview_scheduled ──> hired
///          │                        │
///          └────────> not_accepted <┘
/// ```
///
/// `hired` and `not_accepted` are terminal; there are no self-transitions
/// and no skipping the interview stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Initial state: application is on file
    ApplicationReceived,

    /// An interview has been scheduled
    InterviewScheduled,

    /// Terminal: the candidate was hired
    Hired,

    /// Terminal: the candidate was rejected
    NotAccepted,
}

impl EmployeeStatus {
    /// Status as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::ApplicationReceived => "application_received",
            EmployeeStatus::InterviewScheduled => "interview_scheduled",
            EmployeeStatus::Hired => "hired",
            EmployeeStatus::NotAccepted => "not_accepted",
        }
    }

    /// Whether this status admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, EmployeeStatus::Hired | EmployeeStatus::NotAccepted)
    }

    /// Pure lookup against the transition table
    ///
    /// Exact match only: no transition to the same state, and no skipping
    /// `interview_scheduled` on the way to `hired`.
    pub fn can_transition_to(&self, target: EmployeeStatus) -> bool {
        use EmployeeStatus::*;

        matches!(
            (self, target),
            (ApplicationReceived, InterviewScheduled)
                | (ApplicationReceived, NotAccepted)
                | (InterviewScheduled, Hired)
                | (InterviewScheduled, NotAccepted)
        )
    }
}

impl Default for EmployeeStatus {
    fn default() -> Self {
        EmployeeStatus::ApplicationReceived
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whole days between `hired_on` and `today`
///
/// Only meaningful while the status is `hired`; recomputed on every save.
pub fn days_employed_since(hired_on: NaiveDate, today: NaiveDate) -> i32 {
    (today - hired_on).num_days() as i32
}

/// Employee record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Employee {
    /// Unique employee ID (UUID v4)
    pub id: Uuid,

    /// Owning company; always equals the department's company
    pub company_id: Uuid,

    /// Owning department
    pub department_id: Uuid,

    /// Current onboarding status
    pub employee_status: EmployeeStatus,

    /// Full name
    pub name: String,

    /// Email address
    pub email: String,

    /// Mobile number, `+999999999` style, 9 to 15 digits
    pub mobile_number: String,

    /// Postal address
    pub address: String,

    /// Position/title
    pub designation: String,

    /// Hire date; set exactly when status is `hired`
    pub hired_on: Option<NaiveDate>,

    /// Cached `today - hired_on` in whole days; null unless hired
    pub days_employed: Option<i32>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for inserting a new employee row
///
/// The ops layer validates the company/department pairing and the
/// hired/hired_on coupling before this reaches the database.
#[derive(Debug, Clone)]
pub struct NewEmployeeRow {
    pub company_id: Uuid,
    pub department_id: Uuid,
    pub employee_status: EmployeeStatus,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub address: String,
    pub designation: String,
    pub hired_on: Option<NaiveDate>,
    pub days_employed: Option<i32>,
}

/// Final column values for an employee update
///
/// The ops layer merges requested changes into the current record and
/// persists the result in one statement.
#[derive(Debug, Clone)]
pub struct EmployeeRowUpdate {
    pub company_id: Uuid,
    pub department_id: Uuid,
    pub employee_status: EmployeeStatus,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub address: String,
    pub designation: String,
    pub hired_on: Option<NaiveDate>,
    pub days_employed: Option<i32>,
}

const EMPLOYEE_COLUMNS: &str = "id, company_id, department_id, employee_status, name, email, \
     mobile_number, address, designation, hired_on, days_employed, created_at, updated_at";

impl Employee {
    /// Inserts a new employee
    pub async fn create<'e>(
        exec: impl PgExecutor<'e>,
        data: NewEmployeeRow,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            r#"
            INSERT INTO employees
                (company_id, department_id, employee_status, name, email,
                 mobile_number, address, designation, hired_on, days_employed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(data.company_id)
        .bind(data.department_id)
        .bind(data.employee_status)
        .bind(data.name)
        .bind(data.email)
        .bind(data.mobile_number)
        .bind(data.address)
        .bind(data.designation)
        .bind(data.hired_on)
        .bind(data.days_employed)
        .fetch_one(exec)
        .await
    }

    /// Finds an employee by ID
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// Lists employees ordered by name, with pagination
    pub async fn list<'e>(
        exec: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY name ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(exec)
        .await
    }

    /// Lists all employees of a company
    pub async fn list_by_company<'e>(
        exec: impl PgExecutor<'e>,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE company_id = $1 ORDER BY name ASC"
        ))
        .bind(company_id)
        .fetch_all(exec)
        .await
    }

    /// Lists all employees of a department
    pub async fn list_by_department<'e>(
        exec: impl PgExecutor<'e>,
        department_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE department_id = $1 ORDER BY name ASC"
        ))
        .bind(department_id)
        .fetch_all(exec)
        .await
    }

    /// Lists employees in a given onboarding status, with pagination
    pub async fn list_by_status<'e>(
        exec: impl PgExecutor<'e>,
        status: EmployeeStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_status = $1 \
             ORDER BY name ASC LIMIT $2 OFFSET $3"
        ))
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(exec)
        .await
    }

    /// Persists a merged update of all mutable columns
    ///
    /// Returns the updated employee, or None if the id does not resolve.
    pub async fn update<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
        data: EmployeeRowUpdate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Employee>(&format!(
            r#"
            UPDATE employees
            SET company_id = $2, department_id = $3, employee_status = $4,
                name = $5, email = $6, mobile_number = $7, address = $8,
                designation = $9, hired_on = $10, days_employed = $11,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {EMPLOYEE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(data.company_id)
        .bind(data.department_id)
        .bind(data.employee_status)
        .bind(data.name)
        .bind(data.email)
        .bind(data.mobile_number)
        .bind(data.address)
        .bind(data.designation)
        .bind(data.hired_on)
        .bind(data.days_employed)
        .fetch_optional(exec)
        .await
    }

    /// Deletes an employee row
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all employees of a department (department cascade)
    pub async fn delete_by_department<'e>(
        exec: impl PgExecutor<'e>,
        department_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE department_id = $1")
            .bind(department_id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }

    /// Deletes all employees of a company (company cascade)
    pub async fn delete_by_company<'e>(
        exec: impl PgExecutor<'e>,
        company_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM employees WHERE company_id = $1")
            .bind(company_id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EmployeeStatus::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ApplicationReceived.as_str(), "application_received");
        assert_eq!(InterviewScheduled.as_str(), "interview_scheduled");
        assert_eq!(Hired.as_str(), "hired");
        assert_eq!(NotAccepted.as_str(), "not_accepted");
    }

    #[test]
    fn test_initial_status_is_application_received() {
        assert_eq!(EmployeeStatus::default(), ApplicationReceived);
    }

    #[test]
    fn test_allowed_transitions() {
        assert!(ApplicationReceived.can_transition_to(InterviewScheduled));
        assert!(ApplicationReceived.can_transition_to(NotAccepted));
        assert!(InterviewScheduled.can_transition_to(Hired));
        assert!(InterviewScheduled.can_transition_to(NotAccepted));
    }

    #[test]
    fn test_no_skipping_interview() {
        assert!(!ApplicationReceived.can_transition_to(Hired));
    }

    #[test]
    fn test_no_self_transitions() {
        for status in [ApplicationReceived, InterviewScheduled, Hired, NotAccepted] {
            assert!(!status.can_transition_to(status), "{status} allowed a self-transition");
        }
    }

    #[test]
    fn test_terminal_states_admit_nothing() {
        for from in [Hired, NotAccepted] {
            assert!(from.is_terminal());
            for to in [ApplicationReceived, InterviewScheduled, Hired, NotAccepted] {
                assert!(!from.can_transition_to(to), "{from} -> {to} should be forbidden");
            }
        }
    }

    #[test]
    fn test_no_backward_transitions() {
        assert!(!InterviewScheduled.can_transition_to(ApplicationReceived));
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_string(&InterviewScheduled).unwrap();
        assert_eq!(json, "\"interview_scheduled\"");

        let parsed: EmployeeStatus = serde_json::from_str("\"not_accepted\"").unwrap();
        assert_eq!(parsed, NotAccepted);
    }

    #[test]
    fn test_days_employed_since() {
        let hired = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(days_employed_since(hired, today), 30);

        // Hired today
        assert_eq!(days_employed_since(today, today), 0);
    }
}
