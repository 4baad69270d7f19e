//! Row to record mapping
//!
//! The datasets have shipped with two header conventions (`"Location Code"`
//! and `location_code`) plus a few renamed columns. Lookups go through
//! [`Row::get`], which compares normalized names, so each field only needs
//! its list of known aliases.

use property_types::{Building, LeaseRecord, Ownership};
use tracing::warn;

use crate::error::IngestError;
use crate::parser::{FieldValue, Row};

const LOCATION_CODE: &[&str] = &["location_code", "location"];
const NAME: &[&str] = &["real_property_asset_name", "building_name", "asset_name", "name"];
const INSTALLATION_NAME: &[&str] = &["installation_name"];
const OWNERSHIP: &[&str] = &["owned_or_leased", "owned_leased", "ownership"];
const GSA_REGION: &[&str] = &["gsa_region", "region"];
const STREET_ADDRESS: &[&str] = &["street_address", "address"];
const CITY: &[&str] = &["city"];
const STATE: &[&str] = &["state"];
const ZIP_CODE: &[&str] = &["zip_code", "zip"];
const LATITUDE: &[&str] = &["latitude", "lat"];
const LONGITUDE: &[&str] = &["longitude", "lng", "lon"];
const RENTABLE_SQFT: &[&str] = &[
    "building_rentable_square_feet",
    "rentable_square_feet",
    "rentable_sqft",
];
const AVAILABLE_SQFT: &[&str] = &["available_square_feet", "available_sqft"];
const CONSTRUCTION: &[&str] = &["construction_date", "construction_year", "year_built"];
const DISTRICT: &[&str] = &["congressional_district"];
const REPRESENTATIVE: &[&str] = &[
    "congressional_district_representative_name",
    "congressional_district_representative",
    "congressional_representative",
];
const STATUS: &[&str] = &["building_status", "status"];
const ASSET_TYPE: &[&str] = &["real_property_asset_type", "asset_type"];
const LEASE_NUMBER: &[&str] = &["lease_number", "lease_no"];
const EFFECTIVE_DATE: &[&str] = &["lease_effective_date", "effective_date"];
const EXPIRATION_DATE: &[&str] = &["lease_expiration_date", "expiration_date"];

/// Records produced from a batch of rows, with the count of rejected rows
#[derive(Debug, Clone)]
pub struct Transformed<T> {
    pub records: Vec<T>,
    pub skipped: usize,
}

/// Map one row to a building
pub fn building_from_row(row: &Row) -> Result<Building, IngestError> {
    let location_code = required(row, LOCATION_CODE, "location_code")?;
    let flag = required(row, OWNERSHIP, "owned_or_leased")?;
    let ownership: Ownership = flag.parse().map_err(|_| IngestError::InvalidOwnership {
        value: flag.clone(),
        line: row.line(),
    })?;

    let mut building = Building::new(location_code, ownership);
    building.name = text(row, NAME);
    building.installation_name = text(row, INSTALLATION_NAME);
    building.gsa_region = number(row, GSA_REGION).map(|n| n.round() as i64);
    building.street_address = text(row, STREET_ADDRESS);
    building.city = text(row, CITY);
    building.state = text(row, STATE).to_ascii_uppercase();
    building.zip_code = text(row, ZIP_CODE);
    building.latitude = number(row, LATITUDE);
    building.longitude = number(row, LONGITUDE);
    building.rentable_square_feet = number(row, RENTABLE_SQFT);
    building.available_square_feet = number(row, AVAILABLE_SQFT);
    building.construction_year = construction_year(row);
    building.congressional_district = number(row, DISTRICT).map(|n| n.round() as i32);
    building.congressional_representative = text(row, REPRESENTATIVE);
    building.status = text(row, STATUS);
    building.asset_type = text(row, ASSET_TYPE);
    Ok(building)
}

/// Map one row to a lease record
pub fn lease_from_row(row: &Row) -> Result<LeaseRecord, IngestError> {
    Ok(LeaseRecord {
        location_code: required(row, LOCATION_CODE, "location_code")?,
        lease_number: required(row, LEASE_NUMBER, "lease_number")?,
        name: text(row, NAME),
        street_address: text(row, STREET_ADDRESS),
        city: text(row, CITY),
        state: text(row, STATE).to_ascii_uppercase(),
        zip_code: text(row, ZIP_CODE),
        effective_date: optional_text(row, EFFECTIVE_DATE),
        expiration_date: optional_text(row, EXPIRATION_DATE),
        congressional_representative: text(row, REPRESENTATIVE),
        rentable_square_feet: number(row, RENTABLE_SQFT),
        available_square_feet: number(row, AVAILABLE_SQFT),
    })
}

/// Map rows to buildings, logging and counting rejected rows
pub fn buildings_from_rows(rows: &[Row]) -> Transformed<Building> {
    transform_all(rows, building_from_row, "building")
}

/// Map rows to lease records, logging and counting rejected rows
pub fn leases_from_rows(rows: &[Row]) -> Transformed<LeaseRecord> {
    transform_all(rows, lease_from_row, "lease")
}

fn transform_all<T>(
    rows: &[Row],
    map: impl Fn(&Row) -> Result<T, IngestError>,
    kind: &str,
) -> Transformed<T> {
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0;
    for row in rows {
        match map(row) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Skipping {} row: {}", kind, e);
                skipped += 1;
            }
        }
    }
    Transformed { records, skipped }
}

fn optional_text(row: &Row, names: &[&str]) -> Option<String> {
    row.first_of(names)
        .and_then(FieldValue::as_text)
        .filter(|s| !s.is_empty())
}

fn text(row: &Row, names: &[&str]) -> String {
    optional_text(row, names).unwrap_or_default()
}

fn required(row: &Row, names: &[&str], field: &'static str) -> Result<String, IngestError> {
    optional_text(row, names).ok_or(IngestError::MissingField {
        field,
        line: row.line(),
    })
}

fn number(row: &Row, names: &[&str]) -> Option<f64> {
    row.first_of(names).and_then(FieldValue::as_number)
}

/// Year from a bare number or from the first four-digit run of a date
fn construction_year(row: &Row) -> Option<i32> {
    let value = row.first_of(CONSTRUCTION)?;
    let year = match value.as_number() {
        Some(n) => n.trunc() as i32,
        None => {
            let raw = value.as_text()?;
            raw.split(|c: char| !c.is_ascii_digit())
                .find(|part| part.len() == 4)
                .and_then(|part| part.parse().ok())?
        }
    };
    (year > 0).then_some(year)
}
