//! Booking REST API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;

use super::dto::{
    AccountantVerifyRequest, ApproveRequest, BookingEventRequest, BookingFilterParams,
    BookingResponse, CashPendingRequest, CreateBookingRequest, SettleAmountRequest,
    UpdateBookingRequest, VerifyRequest,
};
use crate::application::{BookingUpdate, Services, Settlement};
use crate::domain::booking::{
    BookingFilter, BookingStatus, Creator, CreatorKind, NewBooking, WorkType,
};
use crate::domain::Money;
use crate::interfaces::http::common::{
    domain_error, money_field, money_field_signed, ApiError, ApiResponse, ApiResult,
    PaginatedResponse, PaginationParams, ValidatedJson,
};

fn unprocessable(message: String) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::error(message)),
    )
}

fn parse_work_type(s: &str) -> Result<WorkType, ApiError> {
    WorkType::from_str(s).ok_or_else(|| {
        unprocessable(format!(
            "work_type: expected RSAWork or PaymentWork, got '{}'",
            s
        ))
    })
}

fn parse_creator(kind: Option<String>, id: Option<String>) -> Result<Option<Creator>, ApiError> {
    match (kind, id) {
        (None, None) => Ok(None),
        (Some(kind), Some(id)) => {
            let kind = CreatorKind::from_str(&kind)
                .ok_or_else(|| unprocessable(format!("created_by_kind: unknown kind '{}'", kind)))?;
            Ok(Some(Creator { kind, id }))
        }
        _ => Err(unprocessable(
            "created_by_kind and created_by_id must be given together".to_string(),
        )),
    }
}

fn optional_money(field: &str, value: Option<Decimal>) -> Result<Option<Money>, ApiError> {
    value.map(|v| money_field(field, v)).transpose()
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 200, description = "Booking created", body = ApiResponse<BookingResponse>),
        (status = 409, description = "File number already exists"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_booking(
    State(services): State<Services>,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> ApiResult<BookingResponse> {
    let input = NewBooking {
        work_type: parse_work_type(&req.work_type)?,
        created_by: parse_creator(req.created_by_kind, req.created_by_id)?,
        total_amount: money_field("total_amount", req.total_amount)?,
        driver_salary: money_field("driver_salary", req.driver_salary)?,
        payable_amount_for_driver: money_field(
            "payable_amount_for_driver",
            req.payable_amount_for_driver,
        )?,
        payable_amount_for_provider: money_field(
            "payable_amount_for_provider",
            req.payable_amount_for_provider,
        )?,
        insurance_amount: money_field("insurance_amount", req.insurance_amount)?,
        adjustment_value: money_field_signed("adjustment_value", req.adjustment_value)?,
        file_number: req.file_number,
        driver_id: req.driver_id,
        provider_id: req.provider_id,
        showroom_id: req.showroom_id,
        company_id: req.company_id,
    };

    let booking = services.bookings.create(input).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(PaginationParams, BookingFilterParams),
    responses(
        (status = 200, description = "Bookings, newest first", body = ApiResponse<PaginatedResponse<BookingResponse>>)
    )
)]
pub async fn list_bookings(
    State(services): State<Services>,
    Query(paging): Query<PaginationParams>,
    Query(params): Query<BookingFilterParams>,
) -> ApiResult<PaginatedResponse<BookingResponse>> {
    let filter = BookingFilter {
        status: params.status.as_deref().map(BookingStatus::from_label),
        driver_id: params.driver_id,
        provider_id: params.provider_id,
        company_id: params.company_id,
    };
    let page = services
        .bookings
        .list(&filter, (&paging).into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PaginatedResponse::from_result(page))))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_booking(
    State(services): State<Services>,
    Path(id): Path<String>,
) -> ApiResult<BookingResponse> {
    let booking = services.bookings.get(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Status transition not allowed"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_booking(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<UpdateBookingRequest>,
) -> ApiResult<BookingResponse> {
    let changes = BookingUpdate {
        status: req.status.as_deref().map(BookingStatus::from_label),
        total_amount: optional_money("total_amount", req.total_amount)?,
        driver_salary: optional_money("driver_salary", req.driver_salary)?,
        payable_amount_for_driver: optional_money(
            "payable_amount_for_driver",
            req.payable_amount_for_driver,
        )?,
        payable_amount_for_provider: optional_money(
            "payable_amount_for_provider",
            req.payable_amount_for_provider,
        )?,
        insurance_amount: optional_money("insurance_amount", req.insurance_amount)?,
        adjustment_value: req
            .adjustment_value
            .map(|v| money_field_signed("adjustment_value", v))
            .transpose()?,
        driver_id: req.driver_id,
        provider_id: req.provider_id,
        showroom_id: req.showroom_id,
        company_id: req.company_id,
    };

    let booking = services
        .bookings
        .update(&id, changes)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/event",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = BookingEventRequest,
    responses(
        (status = 200, description = "Event applied", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Transition not allowed")
    )
)]
pub async fn apply_booking_event(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<BookingEventRequest>,
) -> ApiResult<BookingResponse> {
    let booking = services
        .bookings
        .apply_event(&id, req.event)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/sattle-amount/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = SettleAmountRequest,
    responses(
        (status = 200, description = "Amounts recorded", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found"),
        (status = 422, description = "Received amount exceeds total")
    )
)]
pub async fn settle_booking(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<SettleAmountRequest>,
) -> ApiResult<BookingResponse> {
    let settlement = Settlement {
        received_amount: money_field("received_amount", req.received_amount)?,
        partial_amount: optional_money("partial_amount", req.partial_amount)?,
    };
    let booking = services
        .bookings
        .settle(&id, settlement)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/update-approve/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = ApproveRequest,
    responses(
        (status = 200, description = "Approval set", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Booking still has an outstanding balance")
    )
)]
pub async fn set_booking_approve(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<ApproveRequest>,
) -> ApiResult<BookingResponse> {
    let booking = services
        .bookings
        .set_approve(&id, req.approve)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/verify/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification set", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn set_booking_verified(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<VerifyRequest>,
) -> ApiResult<BookingResponse> {
    let booking = services
        .bookings
        .set_verified(&id, req.verified)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/accountant-verify/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = AccountantVerifyRequest,
    responses(
        (status = 200, description = "Accountant verification set", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn set_booking_accountant_verified(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<AccountantVerifyRequest>,
) -> ApiResult<BookingResponse> {
    let booking = services
        .bookings
        .set_accountant_verified(&id, req.accountant_verified)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/cash-pending/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking ID")),
    request_body = CashPendingRequest,
    responses(
        (status = 200, description = "Cash pending flag set", body = ApiResponse<BookingResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn set_booking_cash_pending(
    State(services): State<Services>,
    Path(id): Path<String>,
    ValidatedJson(req): ValidatedJson<CashPendingRequest>,
) -> ApiResult<BookingResponse> {
    let booking = services
        .bookings
        .set_cash_pending(&id, req.cash_pending)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(booking.into())))
}
