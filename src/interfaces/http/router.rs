//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{EmptyData, PaginationParams};
use super::modules::{
    actors::{self, ActorRouteState},
    bookings, expenses,
    health::{self, HealthState},
    ledger,
    metrics::{self, http_metrics_middleware, MetricsState},
};
use crate::application::Services;
use crate::domain::actor::ActorKind;

/// Shared state for every `/api/v1` route and `/health`.
/// Handlers extract the part they need via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub services: Services,
    pub health: HealthState,
}

impl FromRef<ApiState> for Services {
    fn from_ref(s: &ApiState) -> Self {
        s.services.clone()
    }
}

impl FromRef<ApiState> for HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Bookings
        bookings::create_booking,
        bookings::list_bookings,
        bookings::get_booking,
        bookings::update_booking,
        bookings::apply_booking_event,
        bookings::settle_booking,
        bookings::set_booking_approve,
        bookings::set_booking_verified,
        bookings::set_booking_accountant_verified,
        bookings::set_booking_cash_pending,
        // Ledger
        ledger::create_advance,
        ledger::monthly_advance,
        ledger::list_advances,
        ledger::transfer_salary,
        // Actors
        actors::register_actor,
        actors::get_actor,
        actors::reconcile_actor,
        // Expenses
        expenses::record_expense,
        expenses::approve_expense,
        expenses::record_diesel,
        expenses::set_diesel_status,
    ),
    components(
        schemas(
            EmptyData,
            PaginationParams,
            health::HealthResponse,
            health::ComponentHealth,
            bookings::BookingResponse,
            bookings::CreateBookingRequest,
            bookings::UpdateBookingRequest,
            bookings::BookingEventRequest,
            bookings::SettleAmountRequest,
            bookings::ApproveRequest,
            bookings::VerifyRequest,
            bookings::AccountantVerifyRequest,
            bookings::CashPendingRequest,
            ledger::AdvanceResponse,
            ledger::AdvanceWithActorResponse,
            ledger::CorrectionLineDto,
            ledger::CreateAdvanceRequest,
            ledger::MonthlyAdvanceResponse,
            ledger::TransferSalaryRequest,
            ledger::SalaryTransactionResponse,
            ledger::SalaryTransferResponse,
            actors::ActorResponse,
            actors::SnapshotResponse,
            actors::RegisterActorRequest,
            expenses::ExpenseResponse,
            expenses::DieselExpenseResponse,
            expenses::RecordExpenseRequest,
            expenses::ExpenseApprovalRequest,
            expenses::RecordDieselRequest,
            expenses::DieselStatusRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Bookings", description = "Booking intake, lifecycle, settlement and verification"),
        (name = "Ledger", description = "Advances and salary transfers"),
        (name = "Actors", description = "Drivers, providers and companies with their financial snapshot"),
        (name = "Expenses", description = "Driver expenses and diesel expenses"),
    ),
    info(
        title = "Roadside Ledger API",
        version = "0.1.0",
        description = "Booking ledger and financial reconciliation for roadside assistance operations",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

fn booking_routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route(
            "/{id}",
            get(bookings::get_booking).put(bookings::update_booking),
        )
        .route("/{id}/event", patch(bookings::apply_booking_event))
        .route("/sattle-amount/{id}", patch(bookings::settle_booking))
        .route("/update-approve/{id}", patch(bookings::set_booking_approve))
        .route("/verify/{id}", patch(bookings::set_booking_verified))
        .route(
            "/accountant-verify/{id}",
            patch(bookings::set_booking_accountant_verified),
        )
        .route("/cash-pending/{id}", patch(bookings::set_booking_cash_pending))
}

fn advance_routes() -> Router<ApiState> {
    Router::new()
        .route("/", post(ledger::create_advance))
        .route("/monthly-advance/{id}", get(ledger::monthly_advance))
        .route("/{kind}/{id}", get(ledger::list_advances))
}

fn actor_routes(services: Services, kind: ActorKind) -> Router<ApiState> {
    Router::new()
        .route("/", post(actors::register_actor))
        .route("/{id}", get(actors::get_actor))
        .route("/{id}/reconcile", post(actors::reconcile_actor))
        .with_state(ActorRouteState { services, kind })
}

/// Create the application router.
///
/// `/metrics` is mounted only when a Prometheus handle is given.
pub fn create_api_router(
    services: Services,
    db: DatabaseConnection,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let state = ApiState {
        services: services.clone(),
        health: HealthState {
            db,
            started_at: Arc::new(Instant::now()),
        },
    };

    let mut api = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1/bookings", booking_routes())
        .nest("/api/v1/advance-payment", advance_routes())
        .route("/api/v1/salary-transactions", post(ledger::transfer_salary))
        .route("/api/v1/expenses", post(expenses::record_expense))
        .route(
            "/api/v1/expenses/{id}/approve",
            patch(expenses::approve_expense),
        )
        .route("/api/v1/diesel-expenses", post(expenses::record_diesel))
        .route(
            "/api/v1/diesel-expenses/{id}/status",
            patch(expenses::set_diesel_status),
        );

    for kind in [ActorKind::Driver, ActorKind::Provider, ActorKind::Company] {
        api = api.nest(
            &format!("/api/v1/{}", actors::collection(kind)),
            actor_routes(services.clone(), kind),
        );
    }

    let mut router = api
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    if let Some(handle) = metrics_handle {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::booking::TransitionPolicy;
    use crate::infrastructure::database::testing::memory_db;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn app() -> Router {
        let db = memory_db().await;
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let services = Services::new(repos, TransitionPolicy::Permissive);
        create_api_router(services, db, None)
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(b.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn register(app: &Router, collection: &str, name: &str) -> String {
        let (status, body) = call(
            app,
            "POST",
            &format!("/api/v1/{}", collection),
            Some(json!({"name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_database() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "ok");
    }

    #[tokio::test]
    async fn registered_driver_starts_at_zero() {
        let app = app().await;
        let id = register(&app, "drivers", "Ravi").await;

        let (status, body) = call(&app, "GET", &format!("/api/v1/drivers/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["kind"], "Driver");
        assert_eq!(body["data"]["snapshot"]["cash_in_hand"], "0.00");
        assert_eq!(body["data"]["snapshot"]["balance"], "0.00");

        // A driver id is not a provider id.
        let (status, body) = call(&app, "GET", &format!("/api/v1/providers/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn completed_settled_booking_reaches_driver_cash() {
        let app = app().await;
        let driver = register(&app, "drivers", "Ravi").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(json!({
                "file_number": "RSA-1001",
                "work_type": "PaymentWork",
                "driver_id": driver,
                "total_amount": "1000",
                "driver_salary": 300
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let booking = body["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(body["data"]["status"], "Booking Added");

        let (status, _) = call(
            &app,
            "PUT",
            &format!("/api/v1/bookings/{}", booking),
            Some(json!({"status": "Order Completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/api/v1/bookings/sattle-amount/{}", booking),
            Some(json!({"received_amount": "400"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["received_amount"], "400.00");

        let (_, body) = call(&app, "GET", &format!("/api/v1/drivers/{}", driver), None).await;
        assert_eq!(body["data"]["snapshot"]["cash_in_hand"], "600.00");

        // Outstanding balance blocks approval.
        let (status, _) = call(
            &app,
            "PATCH",
            &format!("/api/v1/bookings/update-approve/{}", booking),
            Some(json!({"approve": true})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn advance_is_added_to_cash_for_that_run() {
        let app = app().await;
        let driver = register(&app, "drivers", "Ravi").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/advance-payment",
            Some(json!({"actor_kind": "Driver", "actor_id": driver, "amount": "150"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["advance"]["added_advance"], "150.00");
        assert_eq!(body["data"]["actor"]["snapshot"]["cash_in_hand"], "150.00");

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/v1/advance-payment/driver/{}", driver),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, body) = call(
            &app,
            "GET",
            &format!("/api/v1/advance-payment/monthly-advance/{}", driver),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["monthly_advance"], "150.00");
    }

    #[tokio::test]
    async fn bad_requests_are_rejected_before_services() {
        let app = app().await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(json!({"file_number": "", "work_type": "PaymentWork", "total_amount": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = call(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(json!({"file_number": "RSA-1", "work_type": "PaymentWork", "total_amount": "12.345"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().starts_with("total_amount"));

        let (status, _) = call(
            &app,
            "POST",
            "/api/v1/bookings",
            Some(json!({"file_number": "RSA-1", "work_type": "Towing", "total_amount": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = call(&app, "GET", "/api/v1/bookings/missing", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_is_paginated() {
        let app = app().await;
        for n in 0..3 {
            let (status, _) = call(
                &app,
                "POST",
                "/api/v1/bookings",
                Some(json!({
                    "file_number": format!("RSA-{}", n),
                    "work_type": "RSAWork",
                    "total_amount": 100
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = call(&app, "GET", "/api/v1/bookings?page=1&limit=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["total_pages"], 2);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn openapi_lists_ledger_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/bookings/sattle-amount/{id}"));
        assert!(doc.paths.paths.contains_key("/api/v1/salary-transactions"));
    }
}
