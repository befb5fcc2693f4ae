use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::error::CourierError;
use crate::geo::{PostalArea, Resolution, POSTAL_AREAS};
use crate::package::{
    DashboardStats, NewPackage, Package, PackageStatus, PackageUpdate, PriceQuote, QuoteRequest,
};

use super::state::AppState;

// ─── Error response ──────────────────────────────────────────────

#[derive(Serialize)]
struct ApiErrorBody {
    error: String,
    code: u16,
}

#[derive(Debug)]
pub(super) struct ApiError(StatusCode, String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.1,
            code: self.0.as_u16(),
        };
        (self.0, Json(body)).into_response()
    }
}

impl From<CourierError> for ApiError {
    fn from(e: CourierError) -> Self {
        let status = match &e {
            CourierError::PackageNotFound(_) => StatusCode::NOT_FOUND,
            CourierError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError(status, e.to_string())
    }
}

fn api_error(status: StatusCode, msg: impl Into<String>) -> ApiError {
    ApiError(status, msg.into())
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw)
        .map_err(|_| api_error(StatusCode::BAD_REQUEST, format!("Invalid package id '{}'", raw)))
}

// ─── GET /health ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ─── GET /api/areas ──────────────────────────────────────────────

pub async fn area_list() -> Json<&'static [PostalArea]> {
    Json(POSTAL_AREAS)
}

// ─── GET /api/resolve ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResolveQuery {
    pub address: Option<String>,
}

pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveQuery>,
) -> Json<Resolution> {
    let address = params.address.unwrap_or_default();
    let resolution = state.service.resolve(&address);
    tracing::info!("GET /api/resolve?address={} -> {}", address, resolution.matched);
    Json(resolution)
}

// ─── POST /api/quote ─────────────────────────────────────────────

pub async fn quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Json<PriceQuote> {
    let start = Instant::now();
    let quote = state.service.quote(&req);
    tracing::info!(
        "POST /api/quote {} -> {} -> {:.2} km, {:.2} ({:.1}ms)",
        req.pickup_address,
        req.delivery_address,
        quote.distance_km,
        quote.price,
        start.elapsed().as_secs_f64() * 1000.0,
    );
    Json(quote)
}

// ─── Packages ────────────────────────────────────────────────────

pub async fn create_package(
    State(state): State<Arc<AppState>>,
    Json(new): Json<NewPackage>,
) -> (StatusCode, Json<Package>) {
    let package = state.service.create_package(new);
    (StatusCode::CREATED, Json(package))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

pub async fn list_packages(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<Package>>, ApiError> {
    let status = params
        .status
        .as_deref()
        .map(str::parse::<PackageStatus>)
        .transpose()?;
    Ok(Json(state.service.list(status)))
}

pub async fn track_package(
    State(state): State<Arc<AppState>>,
    Path(tracking_id): Path<String>,
) -> Result<Json<Package>, ApiError> {
    state
        .service
        .track(&tracking_id)
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Package not found"))
}

pub async fn get_package(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Package>, ApiError> {
    let id = parse_id(&id)?;
    state
        .service
        .get(&id)
        .map(Json)
        .ok_or_else(|| CourierError::PackageNotFound(id.to_string()).into())
}

pub async fn update_package(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<PackageUpdate>,
) -> Result<Json<Package>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.update_details(&id, update)?))
}

#[derive(Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Package>, ApiError> {
    let id = parse_id(&id)?;
    let status: PackageStatus = body.status.parse()?;
    Ok(Json(state.service.update_status(&id, status)?))
}

#[derive(Deserialize)]
pub struct AssignBody {
    pub driver_id: String,
    #[serde(default = "default_driver_name")]
    pub driver_name: String,
}

fn default_driver_name() -> String {
    "Driver".to_string()
}

pub async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AssignBody>,
) -> Result<Json<Package>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.assign_driver(&id, &body.driver_id, &body.driver_name)?))
}

pub async fn delete_package(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Package>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.service.delete(&id)?))
}

// ─── GET /api/stats ──────────────────────────────────────────────

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<DashboardStats> {
    Json(state.service.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{GeoResolver, MatchKind};
    use crate::package::PackageService;
    use crate::pricing::PricingEngine;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            service: PackageService::new(GeoResolver::new(), PricingEngine::default(), Some(1)),
        })
    }

    fn booking() -> NewPackage {
        serde_json::from_value(serde_json::json!({
            "recipient_name": "Ciara",
            "recipient_address": "Eyre Square, Galway H91 E2K3",
            "pickup_address": "D02 AF30",
            "weight_kg": 3.0
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_quote_handler_with_overrides() {
        let req: QuoteRequest = serde_json::from_value(serde_json::json!({
            "pickup_address": "x",
            "delivery_address": "y",
            "pickup_coords": { "lat": 53.3498, "lon": -6.2603 },
            "delivery_coords": { "lat": 53.3498, "lon": -6.2603 }
        }))
        .unwrap();
        let Json(q) = quote(State(state()), Json(req)).await;
        assert_eq!(q, PriceQuote { distance_km: 0.0, price: 5.5 });
    }

    #[tokio::test]
    async fn test_resolve_handler() {
        let Json(res) = resolve(
            State(state()),
            Query(ResolveQuery { address: Some("Patrick St, Cork".into()) }),
        )
        .await;
        assert_eq!(res.matched, MatchKind::City("cork".into()));

        let Json(res) = resolve(State(state()), Query(ResolveQuery { address: None })).await;
        assert_eq!(res.matched, MatchKind::Empty);

        let Json(res) = resolve(
            State(state()),
            Query(ResolveQuery { address: Some("   ".into()) }),
        )
        .await;
        assert_eq!(res.matched, MatchKind::Empty);
    }

    #[tokio::test]
    async fn test_package_lifecycle() {
        let st = state();
        let (code, Json(pkg)) = create_package(State(st.clone()), Json(booking())).await;
        assert_eq!(code, StatusCode::CREATED);
        assert_eq!(pkg.weight_kg, 3.0);

        let Json(tracked) = track_package(State(st.clone()), Path(pkg.tracking_id.clone()))
            .await
            .unwrap();
        assert_eq!(tracked.id, pkg.id);

        let Json(by_id) = get_package(State(st.clone()), Path(pkg.id.to_string()))
            .await
            .unwrap();
        assert_eq!(by_id.tracking_id, pkg.tracking_id);

        let Json(assigned) = assign_driver(
            State(st.clone()),
            Path(pkg.id.to_string()),
            Json(AssignBody { driver_id: "drv-1".into(), driver_name: "Pat".into() }),
        )
        .await
        .unwrap();
        assert_eq!(assigned.status, PackageStatus::Assigned);

        let Json(done) = update_status(
            State(st.clone()),
            Path(pkg.id.to_string()),
            Json(StatusBody { status: "delivered".into() }),
        )
        .await
        .unwrap();
        assert_eq!(done.status, PackageStatus::Delivered);

        let Json(listed) = list_packages(
            State(st.clone()),
            Query(ListQuery { status: Some("delivered".into()) }),
        )
        .await
        .unwrap();
        assert_eq!(listed.len(), 1);

        let Json(stats) = stats(State(st.clone())).await;
        assert_eq!(stats.delivered, 1);

        delete_package(State(st.clone()), Path(pkg.id.to_string())).await.unwrap();
        let missing = track_package(State(st.clone()), Path(pkg.tracking_id)).await.unwrap_err();
        assert_eq!(missing.0, StatusCode::NOT_FOUND);
        let missing = get_package(State(st), Path(pkg.id.to_string())).await.unwrap_err();
        assert_eq!(missing.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let st = state();
        let bad_id = update_status(
            State(st.clone()),
            Path("not-a-uuid".into()),
            Json(StatusBody { status: "pending".into() }),
        )
        .await
        .unwrap_err();
        assert_eq!(bad_id.0, StatusCode::BAD_REQUEST);

        let (_, Json(pkg)) = create_package(State(st.clone()), Json(booking())).await;
        let bad_status = update_status(
            State(st.clone()),
            Path(pkg.id.to_string()),
            Json(StatusBody { status: "teleported".into() }),
        )
        .await
        .unwrap_err();
        assert_eq!(bad_status.0, StatusCode::BAD_REQUEST);

        let missing = delete_package(State(st), Path(Uuid::new_v4().to_string()))
            .await
            .unwrap_err();
        assert_eq!(missing.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_area_list() {
        let Json(list) = area_list().await;
        assert_eq!(list.first().unwrap().key, "dublin");
        assert_eq!(list.last().unwrap().key, "default");
    }
}
