/// Company model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE companies (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(200) NOT NULL UNIQUE CHECK (name <> ''),
///     number_of_departments INTEGER NOT NULL DEFAULT 0,
///     number_of_employees INTEGER NOT NULL DEFAULT 0,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// `number_of_departments` and `number_of_employees` are cached aggregates;
/// the department/employee rows are the source of truth and
/// `ops::counters` keeps the cache equal to the true row counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;

/// Company record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    /// Unique company ID (UUID v4)
    pub id: Uuid,

    /// Company name, unique across all companies
    pub name: String,

    /// Cached count of departments in this company
    pub number_of_departments: i32,

    /// Cached count of employees in this company
    pub number_of_employees: i32,

    /// When the company was created
    pub created_at: DateTime<Utc>,

    /// When the company was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new company
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    /// Company name (must be non-empty and unique)
    pub name: String,
}

impl Company {
    /// Inserts a new company
    ///
    /// # Errors
    ///
    /// Fails with a unique-constraint violation if the name already exists,
    /// or a check violation if the name is empty.
    pub async fn create<'e>(
        exec: impl PgExecutor<'e>,
        data: CreateCompany,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies (name)
            VALUES ($1)
            RETURNING id, name, number_of_departments, number_of_employees,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .fetch_one(exec)
        .await
    }

    /// Finds a company by ID
    pub async fn find_by_id<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, number_of_departments, number_of_employees,
                   created_at, updated_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(exec)
        .await
    }

    /// Lists companies ordered by name, with pagination
    pub async fn list<'e>(
        exec: impl PgExecutor<'e>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, number_of_departments, number_of_employees,
                   created_at, updated_at
            FROM companies
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(exec)
        .await
    }

    /// Renames a company
    ///
    /// Returns the updated company, or None if the id does not resolve.
    pub async fn update_name<'e>(
        exec: impl PgExecutor<'e>,
        id: Uuid,
        name: String,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, number_of_departments, number_of_employees,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(exec)
        .await
    }

    /// Deletes a company row
    ///
    /// Dependent departments/employees must already be gone; the foreign keys
    /// are RESTRICT and the cascade is performed by `ops::companies::delete`.
    pub async fn delete<'e>(exec: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(exec)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_company_input() {
        let data = CreateCompany {
            name: "Acme".to_string(),
        };
        assert_eq!(data.name, "Acme");
    }

    // Database-backed tests live in tests/ops_tests.rs
}
