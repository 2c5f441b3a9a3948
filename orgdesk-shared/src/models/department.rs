/// Department model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE departments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     company_id UUID NOT NULL REFERENCES companies(id) ON DELETE RESTRICT,
///     name VARCHAR(200) NOT NULL CHECK (name <> ''),
///     number_of_employees INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (company_id, name)
/// );
/// ```
///
/// Department names are unique within a company. `number_of_employees` is a
/// cached aggregate maintained by `ops::counters`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Department record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Department {
    /// Unique department ID (UUID v4)
    pub id: Uuid,

    /// Owning company
    pub company_id: Uuid,

    /// Department name, unique within the company
    pub name: String,

    /// Cached count of employees in this department
    pub number_of_employees: i32,

    /// When the department was created
    pub created_at: DateTime<Utc>,

    /// When the department was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new department
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartment {
    /// Owning company ID
    pub company_id: Uuid,

    /// Department name (unique within the company)
    pub name: String,
}

impl Department {
    /// Inserts a new department under a company
    ///
    /// # Errors
    ///
    /// Fails with a foreign-key violation if the company does not exist, or a
    /// unique violation if the (company, name) pair is taken.
    pub async fn create<'e>(
        exec: impl PgExecutor<'e>,
        data: CreateDepartment,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            INSERT INTO departments (company_id, name)
            VALUES ($1, $2)
            RETURNING id, company_id, name, number_of_employees, created_at, updated_at
            "#,
        )
        .bind(data.company_id)
        .bind(data.name)
        .fetch_one(exec)
        .await
    }

    /// Finds a department by ID
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            SELECT id, company_id, name, number_of_employees, created_at, updated_at
            FROM departments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// Lists departments ordered by name, with pagination
    pub async fn list<'e>(
        exec: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            SELECT id, company_id, name, number_of_employees, created_at, updated_at
            FROM departments
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(exec)
        .await
    }

    /// Lists all departments of a company
    pub async fn list_by_company<'e>(
        exec: impl PgExecutor<'e>,
        company_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            SELECT id, company_id, name, number_of_employees, created_at, updated_at
            FROM departments
            WHERE company_id = $1
            ORDER BY name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(exec)
        .await
    }

    /// Renames a department
    pub async fn update_name<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
        name: String,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Department>(
            r#"
            UPDATE departments
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, company_id, name, number_of_employees, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(exec)
        .await
    }

    /// Deletes a department row
    ///
    /// Its employees must already be gone; the cascade is performed by
    /// `ops::departments::delete`.
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all departments of a company, returning how many were removed
    ///
    /// Used by the company cascade after its employees are deleted.
    pub async fn delete_by_company<'e>(
        exec: impl PgExecutor<'e>,
        company_id: Uuid,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE company_id = $1")
            .bind(company_id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected())
    }
}
