//! Query parameters and response bodies

use portfolio_engine::{BuildingFilter, SortKey, SortOrder};
use property_types::{
    Building, DashboardStats, DecadeBucket, EnhancedBuilding, LeaseStats, MapPoint,
    OwnershipFilter, PrimaryLease, ProcessedLease, SquareFootageSlice, StateBucket,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// `GET /api/buildings` parameters, kept as raw strings so bad values map
/// to a JSON 400 instead of the extractor's plain-text rejection
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingsQuery {
    #[serde(rename = "type")]
    pub building_type: Option<String>,
    pub include_stats: Option<String>,
    pub limit: Option<String>,
    pub map_data: Option<String>,
    pub state: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

/// Validated form of [`BuildingsQuery`]
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingsParams {
    pub filter: BuildingFilter,
    pub include_stats: bool,
    pub limit: Option<usize>,
    pub map_data: bool,
    pub sort: Option<(SortKey, SortOrder)>,
}

impl TryFrom<BuildingsQuery> for BuildingsParams {
    type Error = ApiError;

    fn try_from(query: BuildingsQuery) -> Result<Self, Self::Error> {
        let ownership: OwnershipFilter = query
            .building_type
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|_| {
                ApiError::InvalidRequest(
                    "type must be one of 'owned', 'leased' or 'all'".to_string(),
                )
            })?;

        let mut filter = BuildingFilter::new(ownership);
        if let Some(state) = query.state {
            filter = filter.with_state(state);
        }
        if let Some(search) = query.search {
            filter = filter.with_search(search);
        }

        let order = match blank_to_none(query.order.as_deref()) {
            Some(order) => order.parse::<SortOrder>()?,
            None => SortOrder::default(),
        };
        let sort = match blank_to_none(query.sort.as_deref()) {
            Some(key) => Some((key.parse::<SortKey>()?, order)),
            None => None,
        };

        Ok(Self {
            filter,
            include_stats: parse_flag("includeStats", query.include_stats.as_deref())?,
            limit: parse_limit(query.limit.as_deref())?,
            map_data: parse_flag("mapData", query.map_data.as_deref())?,
            sort,
        })
    }
}

/// `GET /api/leases` parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeasesQuery {
    pub include_stats: Option<String>,
    pub limit: Option<String>,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LeaseFormat {
    Raw,
    #[default]
    Enhanced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeasesParams {
    pub include_stats: bool,
    pub limit: Option<usize>,
    pub format: LeaseFormat,
}

impl TryFrom<LeasesQuery> for LeasesParams {
    type Error = ApiError;

    fn try_from(query: LeasesQuery) -> Result<Self, Self::Error> {
        let format = match blank_to_none(query.format.as_deref()) {
            None => LeaseFormat::default(),
            Some(f) if f.eq_ignore_ascii_case("enhanced") => LeaseFormat::Enhanced,
            Some(f) if f.eq_ignore_ascii_case("raw") => LeaseFormat::Raw,
            Some(other) => {
                return Err(ApiError::InvalidRequest(format!(
                    "format must be 'raw' or 'enhanced', got '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            include_stats: parse_flag("includeStats", query.include_stats.as_deref())?,
            limit: parse_limit(query.limit.as_deref())?,
            format,
        })
    }
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_flag(name: &str, value: Option<&str>) -> Result<bool, ApiError> {
    match blank_to_none(value) {
        None => Ok(false),
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(false),
        Some(v) => Err(ApiError::InvalidRequest(format!(
            "{} must be 'true' or 'false', got '{}'",
            name, v
        ))),
    }
}

fn parse_limit(value: Option<&str>) -> Result<Option<usize>, ApiError> {
    blank_to_none(value)
        .map(|v| {
            v.parse::<usize>().map_err(|_| {
                ApiError::InvalidRequest(format!(
                    "limit must be a non-negative integer, got '{}'",
                    v
                ))
            })
        })
        .transpose()
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub source: &'static str,
}

/// Chart data computed over a filtered building set
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingStats {
    pub summary: DashboardStats,
    pub decades: Vec<DecadeBucket>,
    pub states: Vec<StateBucket>,
    pub square_footage: Vec<SquareFootageSlice>,
}

#[derive(Debug, Serialize)]
pub struct BuildingsResponse {
    pub buildings: Vec<Building>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<BuildingStats>,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub points: Vec<MapPoint>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDetailResponse {
    pub building: Building,
    pub leases: Vec<ProcessedLease>,
    pub primary_lease: PrimaryLease,
}

impl From<EnhancedBuilding> for BuildingDetailResponse {
    fn from(enhanced: EnhancedBuilding) -> Self {
        Self {
            building: enhanced.building,
            leases: enhanced.leases,
            primary_lease: enhanced.primary_lease,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RawLeasesResponse {
    pub leases: Vec<ProcessedLease>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<LeaseStats>,
}

#[derive(Debug, Serialize)]
pub struct EnhancedLeasesResponse {
    pub buildings: Vec<EnhancedBuilding>,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<LeaseStats>,
}
