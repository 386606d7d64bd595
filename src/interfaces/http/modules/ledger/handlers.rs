//! Advance ledger and salary transfer handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AdvanceResponse, AdvanceWithActorResponse, CreateAdvanceRequest, MonthlyAdvanceResponse,
    SalaryTransferResponse, TransferSalaryRequest,
};
use crate::application::{NewAdvance, Services};
use crate::domain::actor::{ActorKind, ActorRef};
use crate::domain::ledger::AdvanceType;
use crate::interfaces::http::common::{
    domain_error, money_field, ApiError, ApiResponse, ApiResult, ValidatedJson,
};

/// Accepts `Driver`, `driver` or `drivers` (and the same for the other kinds).
fn parse_actor_kind(s: &str) -> Result<ActorKind, ApiError> {
    let normalized = s.trim_end_matches('s').to_ascii_lowercase();
    let kind = match normalized.as_str() {
        "driver" => Some(ActorKind::Driver),
        "provider" => Some(ActorKind::Provider),
        "companie" | "company" => Some(ActorKind::Company),
        _ => None,
    };
    kind.ok_or_else(|| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::error(format!("unknown actor kind '{}'", s))),
        )
    })
}

#[utoipa::path(
    post,
    path = "/api/v1/advance-payment",
    tag = "Ledger",
    request_body = CreateAdvanceRequest,
    responses(
        (status = 200, description = "Advance appended and actor reconciled", body = ApiResponse<AdvanceWithActorResponse>),
        (status = 404, description = "Actor not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_advance(
    State(services): State<Services>,
    ValidatedJson(req): ValidatedJson<CreateAdvanceRequest>,
) -> ApiResult<AdvanceWithActorResponse> {
    let input = NewAdvance {
        actor: ActorRef::new(parse_actor_kind(&req.actor_kind)?, req.actor_id),
        amount: money_field("amount", req.amount)?,
        advance_type: req
            .advance_type
            .as_deref()
            .map(AdvanceType::from_label)
            .unwrap_or(AdvanceType::Advance),
        remark: req.remark,
        lines: Vec::new(),
    };

    let (advance, actor) = services
        .ledger
        .create_advance_and_reconcile(input)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(AdvanceWithActorResponse {
        advance: advance.into(),
        actor: actor.into(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/advance-payment/monthly-advance/{id}",
    tag = "Ledger",
    params(("id" = String, Path, description = "Driver ID")),
    responses(
        (status = 200, description = "Advances added to the driver this month", body = ApiResponse<MonthlyAdvanceResponse>)
    )
)]
pub async fn monthly_advance(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<MonthlyAdvanceResponse> {
    let total = services
        .ledger
        .monthly_advance(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(MonthlyAdvanceResponse {
        driver_id: id,
        monthly_advance: total.to_decimal(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/advance-payment/{kind}/{id}",
    tag = "Ledger",
    params(
        ("kind" = String, Path, description = "driver or provider"),
        ("id" = String, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Ledger entries, newest first", body = ApiResponse<Vec<AdvanceResponse>>),
        (status = 422, description = "Unknown actor kind")
    )
)]
pub async fn list_advances(
    State(services): State<Services>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Vec<AdvanceResponse>> {
    let actor = ActorRef::new(parse_actor_kind(&kind)?, id);
    let advances = services
        .ledger
        .advances_for(&actor)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(
        advances.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/salary-transactions",
    tag = "Ledger",
    request_body = TransferSalaryRequest,
    responses(
        (status = 200, description = "Salary transferred and allocated", body = ApiResponse<SalaryTransferResponse>),
        (status = 404, description = "Driver not found"),
        (status = 409, description = "Transaction already recorded"),
        (status = 422, description = "Amount exceeds unpaid salary")
    )
)]
pub async fn transfer_salary(
    State(services): State<Services>,
    ValidatedJson(req): ValidatedJson<TransferSalaryRequest>,
) -> ApiResult<SalaryTransferResponse> {
    let amount = money_field("amount", req.amount)?;
    let transfer = services
        .bookings
        .transfer_salary(&req.driver_id, &req.transaction_id, amount)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(transfer.into())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_kind_accepts_collection_names() {
        assert_eq!(parse_actor_kind("Driver").unwrap(), ActorKind::Driver);
        assert_eq!(parse_actor_kind("providers").unwrap(), ActorKind::Provider);
        assert_eq!(parse_actor_kind("companies").unwrap(), ActorKind::Company);
        assert!(parse_actor_kind("showroom").is_err());
    }
}
