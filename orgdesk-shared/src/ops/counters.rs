//! Denormalized counter maintenance
//!
//! Companies carry `number_of_departments` and `number_of_employees`;
//! departments carry `number_of_employees`. Counters are always recomputed
//! from an absolute `COUNT(*)` of current rows, never adjusted by deltas, so
//! a refresh converges to the true value regardless of what ran before it.
//!
//! Mutations collect the affected rows into a [`CounterTargets`] set during
//! their transaction and run [`refresh`] after commit. A failed refresh is
//! retried a few times and logged; it never fails the request that triggered
//! it, since the next refresh touching the same rows repairs the values.

use std::time::Duration;

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const REFRESH_ATTEMPTS: u32 = 3;
const RETRY_DELAY_MS: u64 = 50;

/// Recomputes a department's employee counter from an absolute count
pub async fn recompute_department<'e>(
    exec: impl PgExecutor<'e>,
    department_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE departments
        SET number_of_employees = (
                SELECT COUNT(*)::int FROM employees WHERE department_id = $1
            ),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(department_id)
    .execute(exec)
    .await?;

    Ok(())
}

/// Recomputes a company's department and employee counters from absolute counts
pub async fn recompute_company<'e>(
    exec: impl PgExecutor<'e>,
    company_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE companies
        SET number_of_departments = (
                SELECT COUNT(*)::int FROM departments WHERE company_id = $1
            ),
            number_of_employees = (
                SELECT COUNT(*)::int FROM employees WHERE company_id = $1
            ),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(company_id)
    .execute(exec)
    .await?;

    Ok(())
}

/// The set of rows whose counters a mutation affected
///
/// Deduplicates IDs and recomputes departments before companies, so a
/// company's employee total is derived after its departments have settled.
#[derive(Debug, Clone, Default)]
pub struct CounterTargets {
    departments: Vec<Uuid>,
    companies: Vec<Uuid>,
}

impl CounterTargets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn department(mut self, id: Uuid) -> Self {
        if !self.departments.contains(&id) {
            self.departments.push(id);
        }
        self
    }

    pub fn company(mut self, id: Uuid) -> Self {
        if !self.companies.contains(&id) {
            self.companies.push(id);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty() && self.companies.is_empty()
    }

    pub fn departments(&self) -> &[Uuid] {
        &self.departments
    }

    pub fn companies(&self) -> &[Uuid] {
        &self.companies
    }

    /// Recomputes every target, departments first
    pub async fn apply(&self, pool: &PgPool) -> Result<(), sqlx::Error> {
        for id in &self.departments {
            recompute_department(pool, *id).await?;
        }
        for id in &self.companies {
            recompute_company(pool, *id).await?;
        }
        Ok(())
    }
}

/// Refreshes the given counters after a committed mutation
///
/// Retries transient failures a few times with a short delay. Exhausted
/// retries are logged and swallowed: the committed mutation stands, and a
/// later refresh of the same rows restores the counters.
pub async fn refresh(pool: &PgPool, targets: CounterTargets) {
    if targets.is_empty() {
        return;
    }

    let mut last_err = None;
    for attempt in 1..=REFRESH_ATTEMPTS {
        match targets.apply(pool).await {
            Ok(()) => {
                if attempt > 1 {
                    tracing::debug!(attempt, "counter refresh succeeded after retry");
                }
                return;
            }
            Err(err) => {
                tracing::warn!(
                    attempt,
                    error = %err,
                    "counter refresh attempt failed"
                );
                last_err = Some(err);
                tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS * attempt as u64)).await;
            }
        }
    }

    tracing::error!(
        departments = targets.departments().len(),
        companies = targets.companies().len(),
        error = %last_err.expect("at least one attempt ran"),
        "counter refresh exhausted retries; values will converge on next refresh"
    );
}
