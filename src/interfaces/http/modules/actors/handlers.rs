//! Actor REST API handlers
//!
//! The same handlers serve `/drivers`, `/providers` and `/companies`; the
//! router binds each collection to its [`ActorKind`] through
//! [`ActorRouteState`].

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{ActorResponse, RegisterActorRequest};
use crate::application::Services;
use crate::domain::actor::{ActorKind, ActorRef};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct ActorRouteState {
    pub services: Services,
    pub kind: ActorKind,
}

/// URL collection name for a kind.
pub fn collection(kind: ActorKind) -> &'static str {
    match kind {
        ActorKind::Driver => "drivers",
        ActorKind::Provider => "providers",
        ActorKind::Company => "companies",
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/{collection}",
    tag = "Actors",
    params(("collection" = String, Path, description = "drivers, providers or companies")),
    request_body = RegisterActorRequest,
    responses(
        (status = 200, description = "Actor registered with an empty snapshot", body = ApiResponse<ActorResponse>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register_actor(
    State(state): State<ActorRouteState>,
    ValidatedJson(req): ValidatedJson<RegisterActorRequest>,
) -> ApiResult<ActorResponse> {
    let actor = state
        .services
        .actors
        .register(state.kind, &req.name, req.phone)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(actor.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/{collection}/{id}",
    tag = "Actors",
    params(
        ("collection" = String, Path, description = "drivers, providers or companies"),
        ("id" = String, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Actor with its cached snapshot", body = ApiResponse<ActorResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_actor(
    State(state): State<ActorRouteState>,
    Path(id): Path<String>,
) -> ApiResult<ActorResponse> {
    let actor = state
        .services
        .actors
        .get(&ActorRef::new(state.kind, id))
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(actor.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/{collection}/{id}/reconcile",
    tag = "Actors",
    params(
        ("collection" = String, Path, description = "drivers, providers or companies"),
        ("id" = String, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Snapshot recomputed", body = ApiResponse<ActorResponse>),
        (status = 404, description = "Not found")
    )
)]
pub async fn reconcile_actor(
    State(state): State<ActorRouteState>,
    Path(id): Path<String>,
) -> ApiResult<ActorResponse> {
    let actor = state
        .services
        .actors
        .reconcile(&ActorRef::new(state.kind, id))
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(actor.into())))
}
