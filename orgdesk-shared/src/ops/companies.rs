//! Company operations

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::company::{Company, CreateCompany};
use crate::models::department::Department;
use crate::models::employee::Employee;
use crate::ops::{map_write_err, OpsError};

/// Creates a company
///
/// # Errors
///
/// Returns [`OpsError::ConstraintViolation`] if the name is already taken
/// or empty.
pub async fn create(pool: &PgPool, name: String) -> Result<Company, OpsError> {
    Company::create(pool, CreateCompany { name })
        .await
        .map_err(|e| map_write_err(e, "a company with this name already exists"))
}

/// Fetches a company by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Company, OpsError> {
    Company::find_by_id(pool, id)
        .await?
        .ok_or(OpsError::NotFound("company"))
}

/// Lists companies ordered by name
pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Company>, OpsError> {
    Ok(Company::list(pool, limit, offset).await?)
}

/// Renames a company
pub async fn update(pool: &PgPool, id: Uuid, name: String) -> Result<Company, OpsError> {
    Company::update_name(pool, id, name)
        .await
        .map_err(|e| map_write_err(e, "a company with this name already exists"))?
        .ok_or(OpsError::NotFound("company"))
}

/// Deletes a company and everything under it
///
/// The cascade runs in one transaction in dependency order: employees, then
/// departments, then the company row itself. Either everything is removed or
/// nothing is.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), OpsError> {
    let mut tx = pool.begin().await?;

    Employee::delete_by_company(&mut *tx, id).await?;
    Department::delete_by_company(&mut *tx, id).await?;
    let deleted = Company::delete(&mut *tx, id).await?;

    if !deleted {
        // Roll the cascade back rather than deleting orphans of a missing row
        tx.rollback().await?;
        return Err(OpsError::NotFound("company"));
    }

    tx.commit().await?;
    Ok(())
}
