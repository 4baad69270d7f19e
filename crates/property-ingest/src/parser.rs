//! Delimited-text parsing into header-keyed rows
//!
//! The first record is the header row. Each following record becomes a
//! [`Row`] whose values are coerced by header: whitelisted numeric columns
//! become numbers, everything else stays text with control characters
//! removed. Empty fields and `NA`/`N/A`/`NULL` sentinels become null.
//!
//! `construction_date` is numeric when it holds a bare year; a full date
//! there keeps its cleaned text so the year can still be read from it.
//!
//! A record whose field count does not match the header, or which is not
//! valid UTF-8, is skipped with a warning rather than failing the whole file.

use std::path::Path;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::error::IngestError;

/// Normalized header names whose values are parsed as numbers
pub const NUMERIC_FIELDS: &[&str] = &[
    "latitude",
    "longitude",
    "building_rentable_square_feet",
    "available_square_feet",
    "construction_date",
    "congressional_district",
    "gsa_region",
];

/// Numeric columns that keep their text when it is not a bare number
const TEXT_FALLBACK_FIELDS: &[&str] = &["construction_date"];

const NULL_SENTINELS: &[&str] = &["NA", "N/A", "NULL"];

/// A single parsed field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Null,
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Text form of the value; numbers print without a trailing `.0`
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(format!("{}", *n as i64))
            }
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Null => None,
        }
    }

    /// Numeric form of the value, parsing text when needed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => parse_number(s),
            FieldValue::Null => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Number(n) => serializer.serialize_f64(*n),
            FieldValue::Null => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Text,
    Numeric,
    NumericOrText,
}

impl ColumnKind {
    fn for_header(normalized: &str) -> Self {
        if TEXT_FALLBACK_FIELDS.contains(&normalized) {
            ColumnKind::NumericOrText
        } else if NUMERIC_FIELDS.contains(&normalized) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        }
    }
}

#[derive(Debug)]
struct Header {
    names: Vec<String>,
    normalized: Vec<String>,
}

/// One data record, keyed by the file's header row
#[derive(Debug, Clone)]
pub struct Row {
    header: Arc<Header>,
    values: Vec<FieldValue>,
    line: u64,
}

impl Row {
    /// Value of a column, looked up by its normalized name so that
    /// `"Location Code"` and `"location_code"` resolve to the same field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let wanted = normalize_header(name);
        self.header
            .normalized
            .iter()
            .position(|n| *n == wanted)
            .map(|idx| &self.values[idx])
    }

    /// First non-null value among several candidate column names
    pub fn first_of(&self, names: &[&str]) -> Option<&FieldValue> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.is_null())
    }

    pub fn headers(&self) -> &[String] {
        &self.header.names
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    /// (header, value) pairs in file order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.header
            .names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 1-based line of the record in its source
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Lowercase, collapse every run of non-alphanumerics into `_`, trim `_`
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for c in raw.trim_matches('\u{feff}').trim().chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Parse CSV text into rows
pub fn parse_csv(text: &str) -> Result<Vec<Row>, IngestError> {
    parse_csv_bytes(text.as_bytes())
}

/// Read and parse a CSV file
pub fn parse_csv_file(path: &Path) -> Result<Vec<Row>, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    parse_csv_bytes(&bytes)
}

/// Parse raw CSV bytes; records that are not valid UTF-8 are skipped
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<Vec<Row>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let raw_headers = reader.byte_headers()?.clone();
    let raw_headers = decode_fields(&raw_headers).ok_or(IngestError::HeaderEncoding)?;
    if raw_headers.is_empty() || raw_headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::MissingHeader);
    }

    let names: Vec<String> = raw_headers
        .iter()
        .map(|h| clean_text(h.trim_matches('\u{feff}')))
        .collect();
    let normalized: Vec<String> = names.iter().map(|h| normalize_header(h)).collect();
    let kinds: Vec<ColumnKind> = normalized
        .iter()
        .map(|h| ColumnKind::for_header(h))
        .collect();
    let header = Arc::new(Header { names, normalized });

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                warn!("Skipping unreadable CSV record at line {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != header.names.len() {
            warn!(
                "Skipping malformed CSV line {}: expected {} fields, found {}",
                line,
                header.names.len(),
                record.len()
            );
            skipped += 1;
            continue;
        }

        let Some(fields) = decode_fields(&record) else {
            warn!("Skipping CSV line {}: not valid UTF-8", line);
            skipped += 1;
            continue;
        };

        let values = fields
            .iter()
            .zip(kinds.iter())
            .map(|(raw, kind)| coerce(raw, *kind))
            .collect();

        rows.push(Row {
            header: Arc::clone(&header),
            values,
            line,
        });
    }

    debug!("Parsed {} CSV rows ({} skipped)", rows.len(), skipped);
    Ok(rows)
}

fn decode_fields(record: &csv::ByteRecord) -> Option<Vec<&str>> {
    record
        .iter()
        .map(|field| std::str::from_utf8(field).ok())
        .collect()
}

fn coerce(raw: &str, kind: ColumnKind) -> FieldValue {
    let text = clean_text(raw);
    if text.is_empty() || NULL_SENTINELS.iter().any(|s| text.eq_ignore_ascii_case(s)) {
        return FieldValue::Null;
    }
    match kind {
        ColumnKind::Text => FieldValue::Text(text),
        ColumnKind::Numeric => parse_number(&text).map_or(FieldValue::Null, FieldValue::Number),
        ColumnKind::NumericOrText => match parse_number(&text) {
            Some(n) => FieldValue::Number(n),
            None => FieldValue::Text(text),
        },
    }
}

/// Remove control characters; line breaks and tabs become one space
fn clean_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\n' | '\r' | '\t') {
            if !out.ends_with(' ') {
                out.push(' ');
            }
        } else if !c.is_control() {
            out.push(c);
        }
    }
    out.trim().to_string()
}

fn parse_number(text: &str) -> Option<f64> {
    let stripped: String = text
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    stripped.parse::<f64>().ok().filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_header_merges_naming_conventions() {
        assert_eq!(normalize_header("Location Code"), "location_code");
        assert_eq!(normalize_header("location_code"), "location_code");
        assert_eq!(
            normalize_header("\u{feff}Building Rentable Square Feet "),
            "building_rentable_square_feet"
        );
        assert_eq!(normalize_header("Owned/Leased"), "owned_leased");
        assert_eq!(normalize_header("__Zip  Code__"), "zip_code");
    }

    #[test]
    fn test_parses_quoted_fields_with_embedded_commas() {
        let text = "Location Code,Real Property Asset Name,City\n\
                    DC0001,\"Smith, John Federal Building\",Washington\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("Real Property Asset Name"),
            Some(&FieldValue::Text("Smith, John Federal Building".into()))
        );
        assert_eq!(
            rows[0].get("city"),
            Some(&FieldValue::Text("Washington".into()))
        );
    }

    #[test]
    fn test_coerces_only_whitelisted_numeric_fields() {
        let text = "Zip Code,Latitude,Building Rentable Square Feet,Construction Date\n\
                    02108,42.36,\"12,500\",1931\n";
        let rows = parse_csv(text).unwrap();
        let row = &rows[0];
        assert_eq!(row.get("zip_code"), Some(&FieldValue::Text("02108".into())));
        assert_eq!(row.get("latitude"), Some(&FieldValue::Number(42.36)));
        assert_eq!(
            row.get("building_rentable_square_feet"),
            Some(&FieldValue::Number(12500.0))
        );
        assert_eq!(row.get("Construction Date"), Some(&FieldValue::Number(1931.0)));
    }

    #[test]
    fn test_construction_date_keeps_date_text() {
        let text = "Construction Date,Latitude\n1965-01-01,north\n01/01/1965,1.5\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(
            rows[0].get("construction_date"),
            Some(&FieldValue::Text("1965-01-01".into()))
        );
        assert_eq!(rows[0].get("latitude"), Some(&FieldValue::Null));
        assert_eq!(
            rows[1].get("construction_date"),
            Some(&FieldValue::Text("01/01/1965".into()))
        );
    }

    #[test]
    fn test_skips_records_with_invalid_utf8() {
        let mut bytes = b"City,State\nAustin,TX\n".to_vec();
        bytes.extend_from_slice(b"Bad\xff\xfeCity,TX\n");
        bytes.extend_from_slice("Montréal,QC\n".as_bytes());

        let rows = parse_csv_bytes(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("city"), Some(&FieldValue::Text("Austin".into())));
        assert_eq!(rows[1].get("city"), Some(&FieldValue::Text("Montréal".into())));
        assert_eq!(rows[1].line(), 4);
    }

    #[test]
    fn test_invalid_utf8_header_is_an_error() {
        let rows = parse_csv_bytes(b"Ci\xfft\xffy,State\nAustin,TX\n");
        assert!(matches!(rows, Err(IngestError::HeaderEncoding)));
    }

    #[test]
    fn test_null_sentinels() {
        let text = "a,b,c,latitude\nNA,,n/a,abc\n";
        let rows = parse_csv(text).unwrap();
        assert!(rows[0].values().iter().all(FieldValue::is_null));
    }

    #[test]
    fn test_strips_control_characters() {
        let text = "name,notes\n\"Line\u{0007}One\",\"multi\r\nline\ttext\"\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows[0].get("name"), Some(&FieldValue::Text("LineOne".into())));
        assert_eq!(
            rows[0].get("notes"),
            Some(&FieldValue::Text("multi line text".into()))
        );
    }

    #[test]
    fn test_skips_malformed_lines() {
        let text = "a,b\n1,2\n3\n4,5,6\n7,8\n";
        let rows = parse_csv(text).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("a"), Some(&FieldValue::Text("1".into())));
        assert_eq!(rows[1].get("b"), Some(&FieldValue::Text("8".into())));
        assert_eq!(rows[1].line(), 5);
    }

    #[test]
    fn test_empty_input_has_no_header() {
        assert!(matches!(parse_csv(""), Err(IngestError::MissingHeader)));
    }

    #[test]
    fn test_header_only_input_has_no_rows() {
        let rows = parse_csv("Location Code,City\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_first_of_skips_null_aliases() {
        let text = "Real Property Asset Name,building_name\n,Annex\n";
        let rows = parse_csv(text).unwrap();
        let value = rows[0].first_of(&["real_property_asset_name", "building_name"]);
        assert_eq!(value, Some(&FieldValue::Text("Annex".into())));
    }

    #[test]
    fn test_row_serializes_as_map() {
        let rows = parse_csv("City,Latitude\nAustin,30.27\n").unwrap();
        let json = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(json, serde_json::json!({ "City": "Austin", "Latitude": 30.27 }));
    }

    fn quote(field: &str) -> String {
        format!("\"{}\"", field.replace('"', "\"\""))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Surviving rows always have one value per header and no control characters
        #[test]
        fn rows_match_header_width_and_are_clean(
            width in 1usize..6,
            cells in prop::collection::vec("[ -~\t\r\n\u{0001}\u{001b}\u{007f}]{0,12}", 0..40),
        ) {
            let headers: Vec<String> = (0..width).map(|i| format!("col{}", i)).collect();
            let mut text = headers.join(",");
            text.push('\n');
            for chunk in cells.chunks(width) {
                let line: Vec<String> = chunk.iter().map(|c| quote(c)).collect();
                text.push_str(&line.join(","));
                text.push('\n');
            }

            let rows = parse_csv(&text).unwrap();
            for row in &rows {
                prop_assert_eq!(row.len(), width);
                for value in row.values() {
                    if let FieldValue::Text(s) = value {
                        prop_assert!(!s.chars().any(char::is_control), "control char in {:?}", s);
                    }
                }
            }
        }
    }
}
