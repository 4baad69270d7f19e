//! Chart and summary shapes derived from building and lease sets

use serde::{Deserialize, Serialize};

use crate::building::Ownership;

/// Buildings constructed within one decade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecadeBucket {
    pub decade: i32,
    /// Display label, e.g. "1920s"
    pub label: String,
    pub count: usize,
    pub owned: usize,
    pub leased: usize,
}

/// Owned and leased counts for one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateBucket {
    pub state: String,
    pub owned: usize,
    pub leased: usize,
    pub total: usize,
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_buildings: usize,
    pub owned_buildings: usize,
    pub leased_buildings: usize,
    pub total_rentable_square_feet: f64,
    pub average_rentable_square_feet: f64,
    /// "name (year)" or "N/A"
    pub oldest_building: String,
    /// "name (year)" or "N/A"
    pub newest_building: String,
}

/// One slice of the utilized/available square footage chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SquareFootageSlice {
    pub label: String,
    pub square_feet: f64,
    pub percentage: f64,
}

/// Lease portfolio summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseStats {
    pub total_leases: usize,
    pub active: usize,
    pub expired: usize,
    pub upcoming: usize,
    pub expiring_soon: usize,
    /// Look-ahead window used for `expiring_soon`
    pub expiring_window_months: u32,
    pub average_duration_years: f64,
    pub coverage_percentage: f64,
}

/// Marker data for the map view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPoint {
    pub location_code: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub ownership: Ownership,
    pub latitude: f64,
    pub longitude: f64,
}
