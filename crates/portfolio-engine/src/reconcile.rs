//! Lease reconciliation
//!
//! Matches buildings to their lease records by location code, annotates
//! each lease with parsed dates, duration and status, and selects one
//! primary lease per building.
//!
//! Primary selection is a total ordering over leases:
//! 1. active leases, latest effective date first
//! 2. upcoming leases, earliest effective date first
//! 3. expired leases, latest expiration date first
//!
//! Within a tier a missing date ranks below any present date, and the
//! longer duration breaks remaining ties. A lease without any dates is
//! active by definition, so a building whose leases carry no dates at all
//! gets the one with the greatest duration. Exact ties go to the lease that
//! appears first in the input.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use property_types::{
    Building, EnhancedBuilding, LeaseRecord, LeaseStatus, PrimaryLease, ProcessedLease,
};
use tracing::debug;

use crate::dates::parse_lease_date;
use crate::format::round_to_tenth;

const DAYS_PER_YEAR: f64 = 365.25;

/// Status of a lease on `today`; leases missing either date count as active
pub fn lease_status(
    effective_on: Option<NaiveDate>,
    expires_on: Option<NaiveDate>,
    today: NaiveDate,
) -> LeaseStatus {
    match (effective_on, expires_on) {
        (Some(effective), Some(_)) if today < effective => LeaseStatus::Upcoming,
        (Some(_), Some(expires)) if today > expires => LeaseStatus::Expired,
        _ => LeaseStatus::Active,
    }
}

/// Lease length in years, one decimal; 0 when either date is missing
pub fn duration_years(effective_on: Option<NaiveDate>, expires_on: Option<NaiveDate>) -> f64 {
    match (effective_on, expires_on) {
        (Some(effective), Some(expires)) => {
            let days = (expires - effective).num_days() as f64;
            round_to_tenth(days / DAYS_PER_YEAR)
        }
        _ => 0.0,
    }
}

pub fn process_lease(record: &LeaseRecord, today: NaiveDate) -> ProcessedLease {
    let effective_on = record.effective_date.as_deref().and_then(parse_lease_date);
    let expires_on = record.expiration_date.as_deref().and_then(parse_lease_date);

    ProcessedLease {
        record: record.clone(),
        effective_on,
        expires_on,
        duration_years: duration_years(effective_on, expires_on),
        status: lease_status(effective_on, expires_on, today),
    }
}

fn tier(status: LeaseStatus) -> u8 {
    match status {
        LeaseStatus::Active => 2,
        LeaseStatus::Upcoming => 1,
        LeaseStatus::Expired => 0,
    }
}

/// Later dates rank higher; a missing date ranks lowest
fn later_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    a.cmp(&b)
}

/// Earlier dates rank higher; a missing date ranks lowest
fn earlier_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

/// Preference between two leases for the primary slot; `Greater` means `a`
/// is preferred
pub fn compare_primary(a: &ProcessedLease, b: &ProcessedLease) -> Ordering {
    tier(a.status)
        .cmp(&tier(b.status))
        .then_with(|| match a.status {
            LeaseStatus::Active => later_first(a.effective_on, b.effective_on),
            LeaseStatus::Upcoming => earlier_first(a.effective_on, b.effective_on),
            LeaseStatus::Expired => later_first(a.expires_on, b.expires_on),
        })
        .then_with(|| a.duration_years.total_cmp(&b.duration_years))
}

/// Pick the primary lease, or the placeholder when there are none
pub fn select_primary(leases: &[ProcessedLease]) -> PrimaryLease {
    leases
        .iter()
        .enumerate()
        .max_by(|(i, a), (j, b)| compare_primary(a, b).then_with(|| j.cmp(i)))
        .map(|(_, lease)| PrimaryLease::Lease(lease.clone()))
        .unwrap_or_else(PrimaryLease::placeholder)
}

/// Reconcile one building with the lease records already matched to it
pub fn reconcile_building(
    building: &Building,
    records: &[&LeaseRecord],
    today: NaiveDate,
) -> EnhancedBuilding {
    let leases: Vec<ProcessedLease> = records
        .iter()
        .map(|record| process_lease(record, today))
        .collect();
    let primary_lease = select_primary(&leases);

    EnhancedBuilding {
        building: building.clone(),
        leases,
        primary_lease,
    }
}

fn group_by_location(leases: &[LeaseRecord]) -> HashMap<&str, Vec<&LeaseRecord>> {
    let mut groups: HashMap<&str, Vec<&LeaseRecord>> = HashMap::new();
    for lease in leases {
        groups
            .entry(lease.location_code.as_str())
            .or_default()
            .push(lease);
    }
    groups
}

/// Attach lease records to buildings by location code.
///
/// Output order follows `buildings`. Lease records whose location code
/// matches no building are ignored.
pub fn reconcile(
    buildings: &[Building],
    leases: &[LeaseRecord],
    today: NaiveDate,
) -> Vec<EnhancedBuilding> {
    let groups = group_by_location(leases);

    let enhanced: Vec<EnhancedBuilding> = buildings
        .iter()
        .map(|building| {
            let records = groups
                .get(building.location_code.as_str())
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            reconcile_building(building, records, today)
        })
        .collect();

    debug!(
        "Reconciled {} buildings against {} lease records ({} locations)",
        enhanced.len(),
        leases.len(),
        groups.len()
    );

    enhanced
}
