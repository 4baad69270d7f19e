//! Chart and summary aggregates over building and lease sets

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use property_types::{
    Building, DashboardStats, DecadeBucket, EnhancedBuilding, LeaseStats, LeaseStatus, Ownership,
    SquareFootageSlice, StateBucket,
};

use crate::dates::ExpiryWindow;
use crate::format::round_to_tenth;

/// Number of states kept by [`state_distribution`]
pub const TOP_STATE_COUNT: usize = 10;

const NOT_AVAILABLE: &str = "N/A";

/// Count buildings per construction decade, ascending.
///
/// Buildings without a known construction year are skipped.
pub fn decade_buckets<T: AsRef<Building>>(buildings: &[T]) -> Vec<DecadeBucket> {
    let mut decades: BTreeMap<i32, (usize, usize)> = BTreeMap::new();

    for building in buildings.iter().map(AsRef::as_ref) {
        let Some(year) = building.known_construction_year() else {
            continue;
        };
        let counts = decades.entry(year.div_euclid(10) * 10).or_default();
        match building.ownership {
            Ownership::Owned => counts.0 += 1,
            Ownership::Leased => counts.1 += 1,
        }
    }

    decades
        .into_iter()
        .map(|(decade, (owned, leased))| DecadeBucket {
            decade,
            label: format!("{}s", decade),
            count: owned + leased,
            owned,
            leased,
        })
        .collect()
}

/// Owned and leased counts for the ten states with the most buildings
pub fn state_distribution<T: AsRef<Building>>(buildings: &[T]) -> Vec<StateBucket> {
    let mut states: HashMap<&str, (usize, usize)> = HashMap::new();

    for building in buildings.iter().map(AsRef::as_ref) {
        let state = building.state.trim();
        if state.is_empty() {
            continue;
        }
        let counts = states.entry(state).or_default();
        match building.ownership {
            Ownership::Owned => counts.0 += 1,
            Ownership::Leased => counts.1 += 1,
        }
    }

    let mut buckets: Vec<StateBucket> = states
        .into_iter()
        .map(|(state, (owned, leased))| StateBucket {
            state: state.to_string(),
            owned,
            leased,
            total: owned + leased,
        })
        .collect();

    buckets.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.state.cmp(&b.state)));
    buckets.truncate(TOP_STATE_COUNT);
    buckets
}

fn name_with_year(building: &Building, year: i32) -> String {
    let name = if building.name.is_empty() {
        building.location_code.as_str()
    } else {
        building.name.as_str()
    };
    format!("{} ({})", name, year)
}

/// Headline numbers; names fall back to "N/A" when nothing qualifies
pub fn dashboard_stats<T: AsRef<Building>>(buildings: &[T]) -> DashboardStats {
    let total_buildings = buildings.len();
    let mut owned_buildings = 0;
    let mut total_rentable_square_feet = 0.0;
    let mut oldest: Option<(&Building, i32)> = None;
    let mut newest: Option<(&Building, i32)> = None;

    for building in buildings.iter().map(AsRef::as_ref) {
        if building.ownership == Ownership::Owned {
            owned_buildings += 1;
        }
        total_rentable_square_feet += building.rentable_square_feet.unwrap_or(0.0);

        if let Some(year) = building.known_construction_year() {
            if oldest.map_or(true, |(_, y)| year < y) {
                oldest = Some((building, year));
            }
            if newest.map_or(true, |(_, y)| year > y) {
                newest = Some((building, year));
            }
        }
    }

    let average_rentable_square_feet = if total_buildings == 0 {
        0.0
    } else {
        total_rentable_square_feet / total_buildings as f64
    };

    DashboardStats {
        total_buildings,
        owned_buildings,
        leased_buildings: total_buildings - owned_buildings,
        total_rentable_square_feet,
        average_rentable_square_feet,
        oldest_building: oldest
            .map(|(b, y)| name_with_year(b, y))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        newest_building: newest
            .map(|(b, y)| name_with_year(b, y))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round_to_tenth(part / whole * 100.0)
    } else {
        0.0
    }
}

/// Utilized (rentable minus available) versus available square footage
pub fn square_footage_breakdown<T: AsRef<Building>>(buildings: &[T]) -> Vec<SquareFootageSlice> {
    let mut utilized = 0.0;
    let mut available = 0.0;

    for building in buildings.iter().map(AsRef::as_ref) {
        let rentable = building.rentable_square_feet.unwrap_or(0.0);
        let vacant = building.available_square_feet.unwrap_or(0.0);
        utilized += (rentable - vacant).max(0.0);
        available += vacant.max(0.0);
    }

    let total = utilized + available;
    vec![
        SquareFootageSlice {
            label: "Utilized".to_string(),
            square_feet: utilized,
            percentage: percentage(utilized, total),
        },
        SquareFootageSlice {
            label: "Available".to_string(),
            square_feet: available,
            percentage: percentage(available, total),
        },
    ]
}

/// Status counts, expiring-soon count, average duration and coverage
pub fn lease_stats(
    buildings: &[EnhancedBuilding],
    today: NaiveDate,
    window: ExpiryWindow,
) -> LeaseStats {
    let mut stats = LeaseStats {
        total_leases: 0,
        active: 0,
        expired: 0,
        upcoming: 0,
        expiring_soon: 0,
        expiring_window_months: window.len_months(),
        average_duration_years: 0.0,
        coverage_percentage: 0.0,
    };
    let mut dated = 0usize;
    let mut duration_sum = 0.0;
    let mut covered = 0usize;

    for building in buildings {
        if building.has_leases() {
            covered += 1;
        }
        for lease in &building.leases {
            stats.total_leases += 1;
            match lease.status {
                LeaseStatus::Active => stats.active += 1,
                LeaseStatus::Expired => stats.expired += 1,
                LeaseStatus::Upcoming => stats.upcoming += 1,
            }
            if lease.status == LeaseStatus::Active
                && lease.expires_on.is_some_and(|d| window.contains(today, d))
            {
                stats.expiring_soon += 1;
            }
            if lease.effective_on.is_some() && lease.expires_on.is_some() {
                dated += 1;
                duration_sum += lease.duration_years;
            }
        }
    }

    if dated > 0 {
        stats.average_duration_years = round_to_tenth(duration_sum / dated as f64);
    }
    stats.coverage_percentage = percentage(covered as f64, buildings.len() as f64);
    stats
}
