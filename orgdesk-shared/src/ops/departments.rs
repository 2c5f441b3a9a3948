//! Department operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::Company;
use crate::models::department::{CreateDepartment, Department};
use crate::models::employee::Employee;
use crate::ops::counters::{self, CounterTargets};
use crate::ops::{map_write_err, OpsError};

/// Creates a department under a company
///
/// # Errors
///
/// Returns [`OpsError::NotFound`] if the company does not exist and
/// [`OpsError::ConstraintViolation`] if the name is already taken within
/// that company.
pub async fn create(pool: &PgPool, company_id: Uuid, name: String) -> Result<Department, OpsError> {
    if Company::find_by_id(pool, company_id).await?.is_none() {
        return Err(OpsError::NotFound("company"));
    }

    let department = Department::create(pool, CreateDepartment { company_id, name })
        .await
        .map_err(|e| map_write_err(e, "a department with this name already exists in the company"))?;

    counters::refresh(pool, CounterTargets::new().company(company_id)).await;

    Ok(department)
}

/// Fetches a department by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Department, OpsError> {
    Department::find_by_id(pool, id)
        .await?
        .ok_or(OpsError::NotFound("department"))
}

/// Lists all departments ordered by name
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Department>, OpsError> {
    Ok(Department::list(pool, limit, offset).await?)
}

/// Lists a company's departments
///
/// Fails with [`OpsError::NotFound`] if the company itself is missing, so
/// callers can tell an empty company from a nonexistent one.
pub async fn list_by_company(pool: &PgPool, company_id: Uuid) -> Result<Vec<Department>, OpsError> {
    if Company::find_by_id(pool, company_id).await?.is_none() {
        return Err(OpsError::NotFound("company"));
    }

    Ok(Department::list_by_company(pool, company_id).await?)
}

/// Renames a department
pub async fn update(pool: &PgPool, id: Uuid, name: String) -> Result<Department, OpsError> {
    Department::update_name(pool, id, name)
        .await
        .map_err(|e| map_write_err(e, "a department with this name already exists in the company"))?
        .ok_or(OpsError::NotFound("department"))
}

/// Deletes a department and its employees
///
/// The cascade runs in one transaction: employees first, then the
/// department. The parent company's counters are refreshed after commit.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), OpsError> {
    let department = get(pool, id).await?;

    let mut tx = pool.begin().await?;

    Employee::delete_by_department(&mut *tx, id).await?;
    let deleted = Department::delete(&mut *tx, id).await?;

    if !deleted {
        tx.rollback().await?;
        return Err(OpsError::NotFound("department"));
    }

    tx.commit().await?;

    counters::refresh(pool, CounterTargets::new().company(department.company_id)).await;

    Ok(())
}
