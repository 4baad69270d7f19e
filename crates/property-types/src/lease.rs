//! Lease records and their reconciled forms

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::building::Building;

/// One lease agreement tied to a building through its location code.
///
/// Dates keep the raw text from the source; they are parsed during
/// reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseRecord {
    pub location_code: String,
    pub lease_number: String,
    pub name: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub effective_date: Option<String>,
    pub expiration_date: Option<String>,
    pub congressional_representative: String,
    pub rentable_square_feet: Option<f64>,
    pub available_square_feet: Option<f64>,
}

/// Lease status relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Active,
    Expired,
    Upcoming,
}

impl std::fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaseStatus::Active => write!(f, "active"),
            LeaseStatus::Expired => write!(f, "expired"),
            LeaseStatus::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// A lease record annotated with parsed dates, duration and status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedLease {
    #[serde(flatten)]
    pub record: LeaseRecord,
    pub effective_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
    /// Years between the two dates, one decimal; 0 when either is missing
    pub duration_years: f64,
    pub status: LeaseStatus,
}

/// The lease chosen to represent a building in summary views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryLease {
    Lease(ProcessedLease),
    /// Stand-in for buildings without any matched lease
    Placeholder { status: LeaseStatus },
}

impl PrimaryLease {
    pub fn placeholder() -> Self {
        PrimaryLease::Placeholder {
            status: LeaseStatus::Active,
        }
    }

    pub fn status(&self) -> LeaseStatus {
        match self {
            PrimaryLease::Lease(lease) => lease.status,
            PrimaryLease::Placeholder { status } => *status,
        }
    }

    pub fn lease(&self) -> Option<&ProcessedLease> {
        match self {
            PrimaryLease::Lease(lease) => Some(lease),
            PrimaryLease::Placeholder { .. } => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PrimaryLease::Placeholder { .. })
    }
}

/// A building decorated with its processed leases and primary lease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedBuilding {
    #[serde(flatten)]
    pub building: Building,
    pub leases: Vec<ProcessedLease>,
    pub primary_lease: PrimaryLease,
}

impl EnhancedBuilding {
    pub fn has_leases(&self) -> bool {
        !self.leases.is_empty()
    }
}

impl AsRef<Building> for EnhancedBuilding {
    fn as_ref(&self) -> &Building {
        &self.building
    }
}
