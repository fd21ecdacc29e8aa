//! SPARQL query construction and result parsing
//!
//! Queries select humans born inside a [`FetchSlice`] window whose sitelink
//! count reaches the slice's fame threshold. Sitelinks double as the fame
//! score. One person can span many result rows (one per occupation and
//! citizenship), so rows are grouped per item in first-seen order.

use crate::SourceError;
use lineage_domain::{FetchSlice, PersonRecord};
use serde::Deserialize;
use std::collections::HashMap;

const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";

/// Build the SPARQL query for one slice
pub fn build_query(slice: &FetchSlice, row_limit: usize) -> String {
    format!(
        r#"SELECT ?item ?itemLabel ?birth ?death ?sitelinks ?occupationLabel ?countryCode WHERE {{
  ?item wdt:P31 wd:Q5 ;
        wdt:P569 ?birth ;
        wikibase:sitelinks ?sitelinks .
  FILTER(YEAR(?birth) >= {start} && YEAR(?birth) <= {end})
  FILTER(?sitelinks >= {min_fame})
  OPTIONAL {{ ?item wdt:P570 ?death . }}
  OPTIONAL {{ ?item wdt:P106 ?occupation . }}
  OPTIONAL {{ ?item wdt:P27 ?country . ?country wdt:P297 ?countryCode . }}
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en" . }}
}}
ORDER BY DESC(?sitelinks)
LIMIT {row_limit}"#,
        start = slice.start_year,
        end = slice.end_year,
        min_fame = slice.min_fame,
        row_limit = row_limit,
    )
}

#[derive(Deserialize)]
struct SparqlResponse {
    results: SparqlResults,
}

#[derive(Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlTerm>>,
}

#[derive(Deserialize)]
struct SparqlTerm {
    value: String,
}

/// Parse a SPARQL JSON result set into person records
///
/// Rows without an item are ignored. Fields the endpoint leaves unbound stay
/// `None` so the merger decides what to reject.
pub fn parse_results(body: &str) -> Result<Vec<PersonRecord>, SourceError> {
    let response: SparqlResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::InvalidResponse(format!("Failed to parse result set: {}", e)))?;

    let mut records: Vec<PersonRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in &response.results.bindings {
        let Some(item) = row.get("item") else {
            continue;
        };
        let id = entity_id(&item.value).to_string();

        let position = *positions.entry(id.clone()).or_insert_with(|| {
            records.push(PersonRecord {
                id: Some(id.clone()),
                ..Default::default()
            });
            records.len() - 1
        });
        let record = &mut records[position];

        if record.name.is_none() {
            // The label service echoes the identifier when no English label exists
            record.name = text(row, "itemLabel").filter(|label| *label != id).map(str::to_string);
        }
        if record.birth_year.is_none() {
            record.birth_year = text(row, "birth").and_then(parse_year);
        }
        if record.death_year.is_none() {
            record.death_year = text(row, "death").and_then(parse_year);
        }
        if record.fame_score.is_none() {
            record.fame_score = text(row, "sitelinks").and_then(|s| s.parse().ok());
        }
        if record.region.is_none() {
            record.region = text(row, "countryCode").map(str::to_uppercase);
        }
        if let Some(label) = text(row, "occupationLabel") {
            if !record.occupations.iter().any(|known| known == label) {
                record.occupations.push(label.to_string());
            }
        }
    }

    Ok(records)
}

fn text<'a>(row: &'a HashMap<String, SparqlTerm>, var: &str) -> Option<&'a str> {
    row.get(var).map(|term| term.value.trim()).filter(|value| !value.is_empty())
}

fn entity_id(uri: &str) -> &str {
    uri.strip_prefix(ENTITY_PREFIX).unwrap_or(uri)
}

/// Year component of an `xsd:dateTime` literal such as `-0469-01-01T00:00:00Z`
pub(crate) fn parse_year(value: &str) -> Option<i64> {
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let digits = rest.split('-').next()?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i64 = digits.parse().ok()?;
    Some(if negative { -year } else { year })
}
