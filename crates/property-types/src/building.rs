//! Building records and the ownership flag

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether the government owns the building or leases it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ownership {
    Owned,
    Leased,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized ownership flag: {0:?}")]
pub struct ParseOwnershipError(pub String);

impl Ownership {
    /// Single-letter flag used in the inventory datasets (`F` or `L`)
    pub fn flag(&self) -> &'static str {
        match self {
            Ownership::Owned => "F",
            Ownership::Leased => "L",
        }
    }
}

impl FromStr for Ownership {
    type Err = ParseOwnershipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "F" | "O" | "OWNED" | "FEDERAL" => Ok(Ownership::Owned),
            "L" | "LEASED" => Ok(Ownership::Leased),
            _ => Err(ParseOwnershipError(s.to_string())),
        }
    }
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Owned => write!(f, "owned"),
            Ownership::Leased => write!(f, "leased"),
        }
    }
}

/// Ownership restriction applied when listing buildings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnershipFilter {
    #[default]
    All,
    Owned,
    Leased,
}

impl OwnershipFilter {
    pub fn matches(&self, ownership: Ownership) -> bool {
        match self {
            OwnershipFilter::All => true,
            OwnershipFilter::Owned => ownership == Ownership::Owned,
            OwnershipFilter::Leased => ownership == Ownership::Leased,
        }
    }

    /// The single ownership value this filter selects, if any
    pub fn ownership(&self) -> Option<Ownership> {
        match self {
            OwnershipFilter::All => None,
            OwnershipFilter::Owned => Some(Ownership::Owned),
            OwnershipFilter::Leased => Some(Ownership::Leased),
        }
    }
}

impl FromStr for OwnershipFilter {
    type Err = ParseOwnershipError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(OwnershipFilter::All),
            "owned" => Ok(OwnershipFilter::Owned),
            "leased" => Ok(OwnershipFilter::Leased),
            _ => Err(ParseOwnershipError(s.to_string())),
        }
    }
}

/// A government property record, owned or leased.
///
/// Numeric attributes are `None` when the source left them blank or
/// unparseable; string attributes default to the empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Building {
    /// Natural key shared with lease records
    pub location_code: String,
    pub name: String,
    pub installation_name: String,
    pub ownership: Ownership,
    pub gsa_region: Option<i64>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rentable_square_feet: Option<f64>,
    pub available_square_feet: Option<f64>,
    pub construction_year: Option<i32>,
    pub congressional_district: Option<i32>,
    pub congressional_representative: String,
    pub status: String,
    pub asset_type: String,
}

impl Building {
    /// Empty building carrying only its key and ownership
    pub fn new(location_code: impl Into<String>, ownership: Ownership) -> Self {
        Self {
            location_code: location_code.into(),
            name: String::new(),
            installation_name: String::new(),
            ownership,
            gsa_region: None,
            street_address: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            latitude: None,
            longitude: None,
            rentable_square_feet: None,
            available_square_feet: None,
            construction_year: None,
            congressional_district: None,
            congressional_representative: String::new(),
            status: String::new(),
            asset_type: String::new(),
        }
    }

    pub fn is_leased(&self) -> bool {
        self.ownership == Ownership::Leased
    }

    /// Construction year, treating zero and negative years as unknown
    pub fn known_construction_year(&self) -> Option<i32> {
        self.construction_year.filter(|year| *year > 0)
    }

    /// Both coordinates, when present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => Some((lat, lng)),
            _ => None,
        }
    }
}

impl AsRef<Building> for Building {
    fn as_ref(&self) -> &Building {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ownership_accepts_dataset_flags() {
        assert_eq!("F".parse::<Ownership>().unwrap(), Ownership::Owned);
        assert_eq!(" l ".parse::<Ownership>().unwrap(), Ownership::Leased);
        assert_eq!("Owned".parse::<Ownership>().unwrap(), Ownership::Owned);
        assert_eq!("LEASED".parse::<Ownership>().unwrap(), Ownership::Leased);
        assert!("X".parse::<Ownership>().is_err());
        assert!("".parse::<Ownership>().is_err());
    }

    #[test]
    fn test_ownership_filter_parses_query_values() {
        assert_eq!("".parse::<OwnershipFilter>().unwrap(), OwnershipFilter::All);
        assert_eq!("ALL".parse::<OwnershipFilter>().unwrap(), OwnershipFilter::All);
        assert_eq!(
            "owned".parse::<OwnershipFilter>().unwrap(),
            OwnershipFilter::Owned
        );
        assert!("rented".parse::<OwnershipFilter>().is_err());
    }

    #[test]
    fn test_ownership_filter_matches() {
        assert!(OwnershipFilter::All.matches(Ownership::Owned));
        assert!(OwnershipFilter::Leased.matches(Ownership::Leased));
        assert!(!OwnershipFilter::Leased.matches(Ownership::Owned));
    }

    #[test]
    fn test_zero_construction_year_is_unknown() {
        let mut building = Building::new("DC0001", Ownership::Owned);
        building.construction_year = Some(0);
        assert_eq!(building.known_construction_year(), None);
        building.construction_year = Some(1931);
        assert_eq!(building.known_construction_year(), Some(1931));
    }

    #[test]
    fn test_building_serializes_camel_case() {
        let mut building = Building::new("DC0001", Ownership::Leased);
        building.rentable_square_feet = Some(1200.0);
        let json = serde_json::to_value(&building).unwrap();
        assert_eq!(json["locationCode"], "DC0001");
        assert_eq!(json["ownership"], "leased");
        assert_eq!(json["rentableSquareFeet"], 1200.0);
        assert!(json["latitude"].is_null());
    }
}
