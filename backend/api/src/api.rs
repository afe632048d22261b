//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use pc_funding::{
    Decision, FundingError, FundingSnapshot, NewPcRequest, PcTier, PooledDonation,
    TargetedDonation, YearlyTarget,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{Admin, Candidate, Principal};
use crate::db;
use crate::errors::Result;
use crate::models::{
    DonationRecord, InventoryBody, InventoryRecord, MyPcRequest, OverviewStats, PcRequestBody,
    PcRequestRecord, PooledDonationBody, StatusBody, TargetedDonationBody,
};

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub yearly_target: YearlyTarget,
}

type Payload<T> = std::result::Result<Json<T>, JsonRejection>;

/// Build the application router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/donations", get(list_donations))
        .route("/api/donations/pc", post(create_targeted_donation))
        .route("/api/donations/common", post(create_pooled_donation))
        .route("/api/donations/stats", get(donation_stats))
        .route(
            "/api/pc-requests",
            post(create_pc_request).get(list_pc_requests),
        )
        .route("/api/pc-requests/me", get(my_pc_request))
        .route("/api/pc-requests/:id", get(get_pc_request))
        .route("/api/pc-requests/:id/status", patch(update_pc_request_status))
        .route("/api/inventory", post(create_inventory_item).get(list_inventory))
        .route("/api/admin/stats", get(overview_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/donations/pc`
///
/// Records a gift covering 60% or 100% of one PC. The amount is always
/// derived from the tier price; any amount in the body is ignored.
pub async fn create_targeted_donation(
    State(state): State<Arc<ApiState>>,
    payload: Payload<TargetedDonationBody>,
) -> Result<(StatusCode, Json<DonationRecord>)> {
    let Json(body) = payload?;
    let donation = TargetedDonation::from(body).into_record().map_err(|e| {
        warn!("Targeted donation rejected: {e}");
        e
    })?;

    let record = db::insert_donation(&state.pool, &donation).await?;
    info!(
        id = record.id,
        kind = %donation.kind,
        amount = record.amount,
        "donation recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// `POST /api/donations/common`
pub async fn create_pooled_donation(
    State(state): State<Arc<ApiState>>,
    payload: Payload<PooledDonationBody>,
) -> Result<(StatusCode, Json<DonationRecord>)> {
    let Json(body) = payload?;
    let donation = PooledDonation::from(body).into_record().map_err(|e| {
        warn!("Pooled donation rejected: {e}");
        e
    })?;

    let record = db::insert_donation(&state.pool, &donation).await?;
    info!(
        id = record.id,
        kind = %donation.kind,
        amount = record.amount,
        "donation recorded"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/donations`
///
/// All donations, newest first.
pub async fn list_donations(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<DonationRecord>>> {
    Ok(Json(db::list_donations(&state.pool).await?))
}

/// `GET /api/donations/stats`
pub async fn donation_stats(State(state): State<Arc<ApiState>>) -> Result<Json<FundingSnapshot>> {
    let snapshot = db::funding_snapshot(&state.pool, state.yearly_target).await?;
    Ok(Json(snapshot))
}

/// `POST /api/pc-requests`
///
/// The candidate comes from the authenticated principal; a body cannot
/// submit on someone else's behalf.
pub async fn create_pc_request(
    State(state): State<Arc<ApiState>>,
    Candidate(principal): Candidate,
    payload: Payload<PcRequestBody>,
) -> Result<(StatusCode, Json<PcRequestRecord>)> {
    let Json(body) = payload?;
    let request = NewPcRequest::validate(
        principal.user_id,
        body.pc_type.as_deref(),
        body.justification_text,
        body.future_project,
    )?;

    let record = db::insert_pc_request(&state.pool, &request)
        .await
        .map_err(|e| {
            warn!(candidate = principal.user_id, "PC request rejected: {e}");
            e
        })?;
    info!(id = record.id, candidate = principal.user_id, "PC request submitted");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/pc-requests/me`
///
/// The caller's request with its allocated laptop, or `null`. Open to any
/// authenticated user.
pub async fn my_pc_request(
    State(state): State<Arc<ApiState>>,
    principal: Principal,
) -> Result<Json<Option<MyPcRequest>>> {
    let Some(request) = db::get_pc_request_for_candidate(&state.pool, principal.user_id).await?
    else {
        return Ok(Json(None));
    };

    let assigned_pc = match request.assigned_pc_id {
        Some(pc_id) => db::get_inventory_item(&state.pool, pc_id).await?,
        None => None,
    };
    Ok(Json(Some(MyPcRequest {
        request,
        assigned_pc,
    })))
}

/// `GET /api/pc-requests`
pub async fn list_pc_requests(
    State(state): State<Arc<ApiState>>,
    _admin: Admin,
) -> Result<Json<Vec<PcRequestRecord>>> {
    Ok(Json(db::list_pc_requests(&state.pool).await?))
}

/// `GET /api/pc-requests/:id`
pub async fn get_pc_request(
    State(state): State<Arc<ApiState>>,
    _admin: Admin,
    Path(id): Path<i64>,
) -> Result<Json<PcRequestRecord>> {
    let request = db::get_pc_request(&state.pool, id)
        .await?
        .ok_or(FundingError::NotFound(id))?;
    Ok(Json(request))
}

/// `PATCH /api/pc-requests/:id/status`
///
/// Accepts or rejects a pending request. Decisions are final.
pub async fn update_pc_request_status(
    State(state): State<Arc<ApiState>>,
    Admin(admin): Admin,
    Path(id): Path<i64>,
    payload: Payload<StatusBody>,
) -> Result<Json<PcRequestRecord>> {
    let Json(body) = payload?;
    let decision: Decision = body.status.unwrap_or_default().parse()?;

    let record = db::decide_pc_request(&state.pool, id, decision)
        .await
        .map_err(|e| {
            warn!(request = id, admin = admin.user_id, "Decision rejected: {e}");
            e
        })?;
    info!(
        request = id,
        admin = admin.user_id,
        status = %record.status,
        "PC request decided"
    );
    Ok(Json(record))
}

/// `POST /api/inventory`
pub async fn create_inventory_item(
    State(state): State<Arc<ApiState>>,
    _admin: Admin,
    payload: Payload<InventoryBody>,
) -> Result<(StatusCode, Json<InventoryRecord>)> {
    let Json(body) = payload?;
    let tier: PcTier = body
        .pc_type
        .ok_or(FundingError::MissingField("pcType"))?
        .parse()?;

    let record =
        db::insert_inventory_item(&state.pool, tier, body.serial_number.as_deref()).await?;
    info!(id = record.id, tier = %tier, "inventory item added");
    Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /api/inventory`
pub async fn list_inventory(
    State(state): State<Arc<ApiState>>,
    _admin: Admin,
) -> Result<Json<Vec<InventoryRecord>>> {
    Ok(Json(db::list_inventory(&state.pool).await?))
}

/// `GET /api/admin/stats`
pub async fn overview_stats(
    State(state): State<Arc<ApiState>>,
    _admin: Admin,
) -> Result<Json<OverviewStats>> {
    let stats = db::overview_stats(&state.pool, state.yearly_target).await?;
    Ok(Json(stats))
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
