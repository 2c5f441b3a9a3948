//! Employee operations
//!
//! Enforces the rules the employee row cannot express on its own: the
//! onboarding transition graph, the hired/hired_on coupling, the
//! department-belongs-to-company invariant, and counter refreshes after
//! mutations that move headcount.

use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::Company;
use crate::models::department::Department;
use crate::models::employee::{
    days_employed_since, Employee, EmployeeRowUpdate, EmployeeStatus, NewEmployeeRow,
};
use crate::ops::counters::{self, CounterTargets};
use crate::ops::{map_write_err, OpsError};

/// Input for creating an employee
#[derive(Debug, Clone)]
pub struct CreateEmployee {
    pub company_id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile_number: String,
    pub address: String,
    pub designation: String,
    /// Initial status; defaults to `application_received`
    pub status: Option<EmployeeStatus>,
    /// Required when the initial status is `hired`
    pub hired_on: Option<NaiveDate>,
}

/// Input for updating an employee's record fields
///
/// Status is deliberately absent here; onboarding moves only through
/// [`update_status`]. Supplying `department_id` re-parents the employee and
/// derives the company from the new department.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployee {
    pub department_id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub address: Option<String>,
    pub designation: Option<String>,
    /// Corrects the hire date; only valid while the employee is hired
    pub hired_on: Option<NaiveDate>,
}

/// Creates an employee under a department
///
/// # Errors
///
/// - [`OpsError::NotFound`] if the department does not exist
/// - [`OpsError::ConstraintViolation`] if the department belongs to a
///   different company than the one given
/// - [`OpsError::MissingHireDate`] if the initial status is `hired` with no
///   hire date
pub async fn create(pool: &PgPool, input: CreateEmployee) -> Result<Employee, OpsError> {
    let department = Department::find_by_id(pool, input.department_id)
        .await?
        .ok_or(OpsError::NotFound("department"))?;

    if department.company_id != input.company_id {
        return Err(OpsError::ConstraintViolation(
            "department does not belong to the given company".to_string(),
        ));
    }

    let status = input.status.unwrap_or_default();
    let (hired_on, days_employed) = hired_fields(status, input.hired_on)?;

    let employee = Employee::create(
        pool,
        NewEmployeeRow {
            company_id: input.company_id,
            department_id: input.department_id,
            employee_status: status,
            name: input.name,
            email: input.email,
            mobile_number: input.mobile_number,
            address: input.address,
            designation: input.designation,
            hired_on,
            days_employed,
        },
    )
    .await
    .map_err(|e| map_write_err(e, "employee violates a data constraint"))?;

    counters::refresh(
        pool,
        CounterTargets::new()
            .department(employee.department_id)
            .company(employee.company_id),
    )
    .await;

    Ok(employee)
}

/// Fetches an employee by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Employee, OpsError> {
    Employee::find_by_id(pool, id)
        .await?
        .ok_or(OpsError::NotFound("employee"))
}

/// Lists all employees ordered by name
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Employee>, OpsError> {
    Ok(Employee::list(pool, limit, offset).await?)
}

/// Lists a company's employees
pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Employee>, OpsError> {
    if Company::find_by_id(pool, company_id).await?.is_none() {
        return Err(OpsError::NotFound("company"));
    }

    Ok(Employee::list_by_company(pool, company_id).await?)
}

/// Lists a department's employees
pub async fn list_by_department(
    pool: &PgPool,
    department_id: Uuid,
) -> Result<Vec<Employee>, OpsError> {
    if Department::find_by_id(pool, department_id).await?.is_none() {
        return Err(OpsError::NotFound("department"));
    }

    Ok(Employee::list_by_department(pool, department_id).await?)
}

/// Lists employees in a given onboarding status
pub async fn list_by_status(
    pool: &PgPool,
    status: EmployeeStatus,
    limit: i64,
    offset: i64,
) -> Result<Vec<Employee>, OpsError> {
    Ok(Employee::list_by_status(pool, status, limit, offset).await?)
}

/// Updates an employee's record fields
///
/// Requested changes are merged into the current record and persisted as one
/// statement. Re-parenting to a department in another company is allowed;
/// the employee's company follows the new department. Counters of the old
/// and new parents are refreshed on every update.
pub async fn update(pool: &PgPool, id: Uuid, input: UpdateEmployee) -> Result<Employee, OpsError> {
    let current = get(pool, id).await?;

    let (department_id, company_id) = match input.department_id {
        Some(new_dept_id) if new_dept_id != current.department_id => {
            let dept = Department::find_by_id(pool, new_dept_id)
                .await?
                .ok_or(OpsError::NotFound("department"))?;
            (dept.id, dept.company_id)
        }
        _ => (current.department_id, current.company_id),
    };

    if input.hired_on.is_some() && current.employee_status != EmployeeStatus::Hired {
        return Err(OpsError::ConstraintViolation(
            "a hire date is only valid while the employee is hired".to_string(),
        ));
    }

    let (hired_on, days_employed) = hired_fields(
        current.employee_status,
        input.hired_on.or(current.hired_on),
    )?;

    let updated = Employee::update(
        pool,
        id,
        EmployeeRowUpdate {
            company_id,
            department_id,
            employee_status: current.employee_status,
            name: input.name.unwrap_or(current.name),
            email: input.email.unwrap_or(current.email),
            mobile_number: input.mobile_number.unwrap_or(current.mobile_number),
            address: input.address.unwrap_or(current.address),
            designation: input.designation.unwrap_or(current.designation),
            hired_on,
            days_employed,
        },
    )
    .await
    .map_err(|e| map_write_err(e, "employee violates a data constraint"))?
    .ok_or(OpsError::NotFound("employee"))?;

    // Old and new parents; CounterTargets drops the duplicates when the
    // employee did not move
    counters::refresh(
        pool,
        CounterTargets::new()
            .department(current.department_id)
            .department(updated.department_id)
            .company(current.company_id)
            .company(updated.company_id),
    )
    .await;

    Ok(updated)
}

/// Moves an employee through the onboarding state machine
///
/// # Errors
///
/// - [`OpsError::InvalidTransition`] if the move is not in the transition
///   graph (including self-transitions and moves out of terminal states)
/// - [`OpsError::MissingHireDate`] when transitioning to `hired` without a
///   hire date
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    new_status: EmployeeStatus,
    hired_on: Option<NaiveDate>,
) -> Result<Employee, OpsError> {
    let current = get(pool, id).await?;

    if !current.employee_status.can_transition_to(new_status) {
        return Err(OpsError::InvalidTransition {
            from: current.employee_status,
            to: new_status,
        });
    }

    let (hired_on, days_employed) = hired_fields(new_status, hired_on.or(current.hired_on))?;

    let updated = Employee::update(
        pool,
        id,
        EmployeeRowUpdate {
            company_id: current.company_id,
            department_id: current.department_id,
            employee_status: new_status,
            name: current.name,
            email: current.email,
            mobile_number: current.mobile_number,
            address: current.address,
            designation: current.designation,
            hired_on,
            days_employed,
        },
    )
    .await
    .map_err(|e| map_write_err(e, "employee violates a data constraint"))?
    .ok_or(OpsError::NotFound("employee"))?;

    counters::refresh(
        pool,
        CounterTargets::new()
            .department(updated.department_id)
            .company(updated.company_id),
    )
    .await;

    Ok(updated)
}

/// Deletes an employee and refreshes the parent counters
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), OpsError> {
    let employee = get(pool, id).await?;

    if !Employee::delete(pool, id).await? {
        return Err(OpsError::NotFound("employee"));
    }

    counters::refresh(
        pool,
        CounterTargets::new()
            .department(employee.department_id)
            .company(employee.company_id),
    )
    .await;

    Ok(())
}

/// Resolves the hired_on/days_employed pair for a given status
///
/// Hired requires a hire date no later than today and gets its tenure
/// recomputed against today; every other status carries neither field.
fn hired_fields(
    status: EmployeeStatus,
    hired_on: Option<NaiveDate>,
) -> Result<(Option<NaiveDate>, Option<i32>), OpsError> {
    if status == EmployeeStatus::Hired {
        let hired_on = hired_on.ok_or(OpsError::MissingHireDate)?;
        let today = Utc::now().date_naive();
        if hired_on > today {
            return Err(OpsError::ConstraintViolation(
                "hire date cannot be in the future".to_string(),
            ));
        }
        let days = days_employed_since(hired_on, today);
        Ok((Some(hired_on), Some(days)))
    } else {
        Ok((None, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hired_requires_hire_date() {
        let result = hired_fields(EmployeeStatus::Hired, None);
        assert!(matches!(result, Err(OpsError::MissingHireDate)));
    }

    #[test]
    fn test_hired_computes_tenure() {
        let hired_on = Utc::now().date_naive();
        let (date, days) = hired_fields(EmployeeStatus::Hired, Some(hired_on)).unwrap();
        assert_eq!(date, Some(hired_on));
        assert_eq!(days, Some(0));
    }

    #[test]
    fn test_future_hire_date_rejected() {
        let tomorrow = Utc::now().date_naive() + chrono::Days::new(1);
        // Tenure would otherwise come out negative
        assert!(days_employed_since(tomorrow, Utc::now().date_naive()) < 0);

        let result = hired_fields(EmployeeStatus::Hired, Some(tomorrow));
        assert!(matches!(result, Err(OpsError::ConstraintViolation(_))));
    }

    #[test]
    fn test_past_hire_date_yields_positive_tenure() {
        let hired_on = Utc::now().date_naive() - chrono::Days::new(30);
        let (_, days) = hired_fields(EmployeeStatus::Hired, Some(hired_on)).unwrap();
        assert_eq!(days, Some(30));
    }

    #[test]
    fn test_non_hired_clears_hire_fields() {
        let hired_on = Utc::now().date_naive();
        for status in [
            EmployeeStatus::ApplicationReceived,
            EmployeeStatus::InterviewScheduled,
            EmployeeStatus::NotAccepted,
        ] {
            let (date, days) = hired_fields(status, Some(hired_on)).unwrap();
            assert_eq!(date, None);
            assert_eq!(days, None);
        }
    }
}
