/// Department endpoints
///
/// # Endpoints
///
/// - `GET /api/departments` - List departments
/// - `POST /api/departments` - Create a department under a company
/// - `GET /api/departments/:id` - Get a department
/// - `PUT /api/departments/:id` - Rename a department
/// - `DELETE /api/departments/:id` - Delete a department and its employees
/// - `GET /api/departments/:id/employees` - The department's employees

use crate::{
    app::AppState,
    error::{validation_errors, ApiResult},
    routes::Pagination,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use orgdesk_shared::models::{department::Department, employee::Employee};
use orgdesk_shared::ops::{departments, employees};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create department request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentRequest {
    pub company_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

/// Update department request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateDepartmentRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

/// Lists departments ordered by name
pub async fn list_departments(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Department>>> {
    let departments = departments::list(&state.db, page.limit, page.offset).await?;
    Ok(Json(departments))
}

/// Creates a department
///
/// # Errors
///
/// - `404 Not Found`: The company does not exist
/// - `409 Conflict`: The company already has a department with this name
pub async fn create_department(
    State(state): State<AppState>,
    Json(req): Json<CreateDepartmentRequest>,
) -> ApiResult<(StatusCode, Json<Department>)> {
    req.validate().map_err(validation_errors)?;

    let department = departments::create(&state.db, req.company_id, req.name).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

/// Gets a department by ID
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Department>> {
    let department = departments::get(&state.db, id).await?;
    Ok(Json(department))
}

/// Renames a department
pub async fn update_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateDepartmentRequest>,
) -> ApiResult<Json<Department>> {
    req.validate().map_err(validation_errors)?;

    let department = departments::update(&state.db, id, req.name).await?;
    Ok(Json(department))
}

/// Deletes a department, cascading to its employees
pub async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    departments::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists a department's employees
pub async fn list_department_employees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Employee>>> {
    let employees = employees::list_by_department(&state.db, id).await?;
    Ok(Json(employees))
}
