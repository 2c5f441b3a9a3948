/// Employee endpoints
///
/// # Endpoints
///
/// - `GET /api/employees` - List employees, optionally filtered by status
/// - `POST /api/employees` - Create an employee
/// - `GET /api/employees/:id` - Get an employee
/// - `PUT /api/employees/:id` - Update record fields (never status)
/// - `DELETE /api/employees/:id` - Delete an employee
/// - `PUT /api/employees/:id/status` - Move through the onboarding state machine

use crate::{
    app::AppState,
    error::{validation_errors, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use orgdesk_shared::models::employee::{Employee, EmployeeStatus};
use orgdesk_shared::ops::employees;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// International phone format: optional `+`, 9 to 15 digits
static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("valid mobile regex"));

/// Create employee request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    pub company_id: Uuid,

    pub department_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(regex(
        path = *MOBILE_RE,
        message = "Mobile number must be 9 to 15 digits, optionally prefixed with +"
    ))]
    pub mobile_number: String,

    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: String,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Designation must be between 1 and 200 characters"
    ))]
    pub designation: String,

    /// Initial onboarding status; defaults to `application_received`
    pub status: Option<EmployeeStatus>,

    /// Required when the initial status is `hired`
    pub hired_on: Option<NaiveDate>,
}

/// Update employee request
///
/// Status is deliberately not part of this payload; onboarding moves only
/// through the dedicated status endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    /// Re-parents the employee; the company follows the new department
    pub department_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(regex(
        path = *MOBILE_RE,
        message = "Mobile number must be 9 to 15 digits, optionally prefixed with +"
    ))]
    pub mobile_number: Option<String>,

    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,

    #[validate(length(
        min = 1,
        max = 200,
        message = "Designation must be between 1 and 200 characters"
    ))]
    pub designation: Option<String>,

    /// Corrects the hire date; only valid while the employee is hired
    pub hired_on: Option<NaiveDate>,
}

/// Status transition request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target onboarding status
    pub status: EmployeeStatus,

    /// Required when the target status is `hired`
    pub hired_on: Option<NaiveDate>,
}

/// Employee list query: pagination plus an optional status filter
#[derive(Debug, Deserialize)]
pub struct EmployeeListQuery {
    pub status: Option<EmployeeStatus>,

    #[serde(default = "default_limit")]
    pub limit: i64,

    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

/// Lists employees ordered by name
///
/// With `?status=`, returns only employees in that onboarding status.
pub async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<EmployeeListQuery>,
) -> ApiResult<Json<Vec<Employee>>> {
    let employees = match query.status {
        Some(status) => {
            employees::list_by_status(&state.db, status, query.limit, query.offset).await?
        }
        None => employees::list(&state.db, query.limit, query.offset).await?,
    };

    Ok(Json(employees))
}

/// Creates an employee
///
/// # Errors
///
/// - `404 Not Found`: The department does not exist
/// - `409 Conflict`: The department belongs to a different company
/// - `422 Unprocessable Entity`: Validation failed, or status is `hired`
///   without `hired_on`
pub async fn create_employee(
    State(state): State<AppState>,
    Json(req): Json<CreateEmployeeRequest>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    req.validate().map_err(validation_errors)?;

    let employee = employees::create(
        &state.db,
        employees::CreateEmployee {
            company_id: req.company_id,
            department_id: req.department_id,
            name: req.name,
            email: req.email,
            mobile_number: req.mobile_number,
            address: req.address,
            designation: req.designation,
            status: req.status,
            hired_on: req.hired_on,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(employee)))
}

/// Gets an employee by ID
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Employee>> {
    let employee = employees::get(&state.db, id).await?;
    Ok(Json(employee))
}

/// Updates an employee's record fields
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateEmployeeRequest>,
) -> ApiResult<Json<Employee>> {
    req.validate().map_err(validation_errors)?;

    let employee = employees::update(
        &state.db,
        id,
        employees::UpdateEmployee {
            department_id: req.department_id,
            name: req.name,
            email: req.email,
            mobile_number: req.mobile_number,
            address: req.address,
            designation: req.designation,
            hired_on: req.hired_on,
        },
    )
    .await?;

    Ok(Json(employee))
}

/// Moves an employee through the onboarding state machine
///
/// # Errors
///
/// - `400 Bad Request`: The transition is not allowed from the current status
/// - `422 Unprocessable Entity`: Transitioning to `hired` without `hired_on`
pub async fn update_employee_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<Employee>> {
    let employee = employees::update_status(&state.db, id, req.status, req.hired_on).await?;
    Ok(Json(employee))
}

/// Deletes an employee
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    employees::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
