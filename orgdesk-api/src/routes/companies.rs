/// Company endpoints
///
/// # Endpoints
///
/// - `GET /api/companies` - List companies
/// - `POST /api/companies` - Create a company
/// - `GET /api/companies/:id` - Get a company
/// - `PUT /api/companies/:id` - Rename a company
/// - `DELETE /api/companies/:id` - Delete a company and everything under it
/// - `GET /api/companies/:id/departments` - The company's departments
/// - `GET /api/companies/:id/employees` - The company's employees

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
use orgdesk_shared::models::{company::Company, department::Department, employee::Employee};
use orgdesk_shared::ops::{companies, departments, employees};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create company request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

/// Update company request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}

/// Lists companies ordered by name
pub async fn list_companies(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<Vec<Company>>> {
    let companies = companies::list(&state.db, page.limit, page.offset).await?;
    Ok(Json(companies))
}

/// Creates a company
///
/// # Errors
///
/// - `409 Conflict`: A company with this name already exists
pub async fn create_company(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    req.validate().map_err(validation_errors)?;

    let company = companies::create(&state.db, req.name).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// Gets a company by ID
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Company>> {
    let company = companies::get(&state.db, id).await?;
    Ok(Json(company))
}

/// Renames a company
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCompanyRequest>,
) -> ApiResult<Json<Company>> {
    req.validate().map_err(validation_errors)?;

    let company = companies::update(&state.db, id, req.name).await?;
    Ok(Json(company))
}

/// Deletes a company, cascading to its departments and employees
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    companies::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists a company's departments
pub async fn list_company_departments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Department>>> {
    let departments = departments::list_by_company(&state.db, id).await?;
    Ok(Json(departments))
}

/// Lists a company's employees
pub async fn list_company_employees(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<Employee>>> {
    let employees = employees::list_by_company(&state.db, id).await?;
    Ok(Json(employees))
}
