//! HTTP handlers for the portfolio API

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use portfolio_engine::{
    dashboard_stats, decade_buckets, lease_stats, map_points, process_lease,
    sort_buildings, square_footage_breakdown, state_distribution,
};
use property_store::{enhanced_building, enhanced_leased_buildings};

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        source: state.source.describe(),
    })
}

fn invalid_query(rejection: QueryRejection) -> ApiError {
    ApiError::InvalidRequest(rejection.body_text())
}

/// List buildings, or their map points when `mapData=true`
pub async fn list_buildings(
    State(state): State<Arc<AppState>>,
    query: Result<Query<BuildingsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(invalid_query)?;
    let params = BuildingsParams::try_from(query)?;

    let buildings = state.source.buildings(params.filter.ownership).await?;
    let mut buildings = params.filter.apply(buildings);
    if let Some((key, order)) = params.sort {
        sort_buildings(&mut buildings, key, order);
    }

    if params.map_data {
        let mut points = map_points(&buildings);
        let total = points.len();
        if let Some(limit) = params.limit {
            points.truncate(limit);
        }
        return Ok(Json(MapResponse { points, total }).into_response());
    }

    let stats = params.include_stats.then(|| BuildingStats {
        summary: dashboard_stats(&buildings),
        decades: decade_buckets(&buildings),
        states: state_distribution(&buildings),
        square_footage: square_footage_breakdown(&buildings),
    });

    let total = buildings.len();
    if let Some(limit) = params.limit {
        buildings.truncate(limit);
    }

    tracing::info!("Listing {} of {} buildings", buildings.len(), total);

    Ok(Json(BuildingsResponse {
        buildings,
        total,
        stats,
    })
    .into_response())
}

/// One building with its reconciled leases
pub async fn get_building(
    State(state): State<Arc<AppState>>,
    Path(location_code): Path<String>,
) -> Result<Json<BuildingDetailResponse>, ApiError> {
    let enhanced = enhanced_building(state.source.as_ref(), &location_code, state.today())
        .await?
        .ok_or_else(|| ApiError::BuildingNotFound(location_code.clone()))?;

    Ok(Json(enhanced.into()))
}

/// List leases, raw or joined to their leased buildings
pub async fn list_leases(
    State(state): State<Arc<AppState>>,
    query: Result<Query<LeasesQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query.map_err(invalid_query)?;
    let params = LeasesParams::try_from(query)?;
    let today = state.today();
    let window = state.config.expiry_window;

    // Raw listings skip the join unless stats were requested
    let enhanced = if params.format == LeaseFormat::Enhanced || params.include_stats {
        Some(enhanced_leased_buildings(state.source.as_ref(), today).await?)
    } else {
        None
    };
    let stats = match (&enhanced, params.include_stats) {
        (Some(enhanced), true) => Some(lease_stats(enhanced, today, window)),
        _ => None,
    };

    match params.format {
        LeaseFormat::Raw => {
            let records = state.source.leases().await?;
            let mut leases: Vec<_> = records
                .iter()
                .map(|record| process_lease(record, today))
                .collect();
            let total = leases.len();
            if let Some(limit) = params.limit {
                leases.truncate(limit);
            }

            tracing::info!("Listing {} of {} raw leases", leases.len(), total);
            Ok(Json(RawLeasesResponse {
                leases,
                total,
                stats,
            })
            .into_response())
        }
        LeaseFormat::Enhanced => {
            let mut buildings = enhanced.unwrap_or_default();
            let total = buildings.len();
            if let Some(limit) = params.limit {
                buildings.truncate(limit);
            }

            tracing::info!("Listing {} of {} leased buildings", buildings.len(), total);
            Ok(Json(EnhancedLeasesResponse {
                buildings,
                total,
                stats,
            })
            .into_response())
        }
    }
}
