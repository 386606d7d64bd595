//! Expense REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    DieselExpenseResponse, DieselStatusRequest, ExpenseApprovalRequest, ExpenseResponse,
    RecordDieselRequest, RecordExpenseRequest,
};
use crate::application::Services;
use crate::domain::expense::DieselStatus;
use crate::interfaces::http::common::{
    domain_error, money_field, ApiResponse, ApiResult, ValidatedJson,
};

#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    tag = "Expenses",
    request_body = RecordExpenseRequest,
    responses(
        (status = 200, description = "Expense recorded, pending approval", body = ApiResponse<ExpenseResponse>),
        (status = 404, description = "Driver not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn record_expense(
    State(services): State<Services>,
    ValidatedJson(req): ValidatedJson<RecordExpenseRequest>,
) -> ApiResult<ExpenseResponse> {
    let amount = money_field("amount", req.amount)?;
    let expense = services
        .expenses
        .record_expense(&req.driver_id, amount, req.description)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(expense.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/expenses/{id}/approve",
    tag = "Expenses",
    params(("id" = String, Path, description = "Expense ID")),
    request_body = ExpenseApprovalRequest,
    responses(
        (status = 200, description = "Approval set and driver reconciled", body = ApiResponse<ExpenseResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn approve_expense(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ExpenseApprovalRequest>,
) -> ApiResult<ExpenseResponse> {
    let expense = services
        .expenses
        .set_expense_approval(&id, req.approve)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(expense.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/diesel-expenses",
    tag = "Expenses",
    request_body = RecordDieselRequest,
    responses(
        (status = 200, description = "Diesel expense recorded as Pending", body = ApiResponse<DieselExpenseResponse>),
        (status = 404, description = "Driver not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn record_diesel(
    State(services): State<Services>,
    ValidatedJson(req): ValidatedJson<RecordDieselRequest>,
) -> ApiResult<DieselExpenseResponse> {
    let amount = money_field("amount", req.amount)?;
    let diesel = services
        .expenses
        .record_diesel(&req.driver_id, amount)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(diesel.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/diesel-expenses/{id}/status",
    tag = "Expenses",
    params(("id" = String, Path, description = "Diesel expense ID")),
    request_body = DieselStatusRequest,
    responses(
        (status = 200, description = "Status set and driver reconciled", body = ApiResponse<DieselExpenseResponse>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Unknown status")
    )
)]
pub async fn set_diesel_status(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<DieselStatusRequest>,
) -> ApiResult<DieselExpenseResponse> {
    let status = DieselStatus::from_str(&req.status).ok_or_else(|| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!(
                "status: expected Pending, Approved or Rejected, got '{}'",
                req.status
            ))),
        )
    })?;
    let diesel = services
        .expenses
        .set_diesel_status(&id, status)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(diesel.into())))
}
