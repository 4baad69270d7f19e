//! Table filtering, sorting and map projection

use std::cmp::Ordering;
use std::str::FromStr;

use property_types::{Building, MapPoint, OwnershipFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Unknown sort key '{0}'")]
    InvalidSortKey(String),

    #[error("Unknown sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),
}

/// Row filter for building tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildingFilter {
    pub ownership: OwnershipFilter,
    /// Two-letter state code, compared case-insensitively
    pub state: Option<String>,
    /// Case-insensitive substring over name, city, address and location code
    pub search: Option<String>,
}

impl BuildingFilter {
    pub fn new(ownership: OwnershipFilter) -> Self {
        Self {
            ownership,
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        let state = state.into();
        self.state = (!state.trim().is_empty()).then(|| state.trim().to_string());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        self.search = (!search.trim().is_empty()).then(|| search.trim().to_lowercase());
        self
    }

    pub fn matches(&self, building: &Building) -> bool {
        if !self.ownership.matches(building.ownership) {
            return false;
        }
        if let Some(state) = &self.state {
            if !building.state.eq_ignore_ascii_case(state) {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let haystacks = [
                &building.name,
                &building.city,
                &building.street_address,
                &building.location_code,
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&needle)) {
                return false;
            }
        }
        true
    }

    /// Keep only matching items, preserving order
    pub fn apply<T: AsRef<Building>>(&self, mut items: Vec<T>) -> Vec<T> {
        items.retain(|item| self.matches(item.as_ref()));
        items
    }
}

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Name,
    State,
    City,
    RentableSquareFeet,
    ConstructionYear,
}

impl FromStr for SortKey {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "state" => Ok(SortKey::State),
            "city" => Ok(SortKey::City),
            "rentable_square_feet" | "rentablesquarefeet" | "sqft" => {
                Ok(SortKey::RentableSquareFeet)
            }
            "construction_year" | "constructionyear" | "year" => Ok(SortKey::ConstructionYear),
            _ => Err(QueryError::InvalidSortKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryError::InvalidSortOrder(s.to_string())),
        }
    }
}

/// Compare optional values so that `None` sorts last in either order
fn compare_present<V: PartialOrd>(a: Option<V>, b: Option<V>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn text_key(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Stable sort; blank or missing values go last
pub fn sort_buildings<T: AsRef<Building>>(items: &mut [T], key: SortKey, order: SortOrder) {
    items.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        match key {
            SortKey::Name => compare_present(text_key(&a.name), text_key(&b.name), order),
            SortKey::State => compare_present(text_key(&a.state), text_key(&b.state), order),
            SortKey::City => compare_present(text_key(&a.city), text_key(&b.city), order),
            SortKey::RentableSquareFeet => {
                compare_present(a.rentable_square_feet, b.rentable_square_feet, order)
            }
            SortKey::ConstructionYear => compare_present(
                a.known_construction_year(),
                b.known_construction_year(),
                order,
            ),
        }
    });
}

/// Map markers for buildings that have both coordinates
pub fn map_points<T: AsRef<Building>>(items: &[T]) -> Vec<MapPoint> {
    items
        .iter()
        .map(AsRef::as_ref)
        .filter_map(|building| {
            let (latitude, longitude) = building.coordinates()?;
            Some(MapPoint {
                location_code: building.location_code.clone(),
                name: building.name.clone(),
                city: building.city.clone(),
                state: building.state.clone(),
                ownership: building.ownership,
                latitude,
                longitude,
            })
        })
        .collect()
}
