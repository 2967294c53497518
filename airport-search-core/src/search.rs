use crate::airport::AirportRecord;
use crate::format::value_of;

/// Upper bound on results returned to an autocomplete list.
pub const MAX_RESULTS: usize = 50;

/// Queries shorter than this never match anything.
pub const MIN_QUERY_CHARS: usize = 2;

/// Search airports by case-insensitive substring, ranked for display and
/// capped at [`MAX_RESULTS`].
pub fn search_airports(query: &str, airports: &[AirportRecord]) -> Vec<AirportRecord> {
    search_airports_with_limit(query, airports, MAX_RESULTS)
}

/// Same as [`search_airports`] with a smaller result cap. Limits above
/// [`MAX_RESULTS`] are clamped to it.
pub fn search_airports_with_limit(
    query: &str,
    airports: &[AirportRecord],
    limit: usize,
) -> Vec<AirportRecord> {
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }

    let term = query.to_lowercase();
    let mut matches: Vec<&AirportRecord> = airports
        .iter()
        .filter(|airport| matches_term(airport, &term))
        .collect();

    // sort_by_cached_key is stable, so equal keys keep dataset order
    matches.sort_by_cached_key(|airport| display_key(airport, &term));

    matches
        .into_iter()
        .take(limit.min(MAX_RESULTS))
        .cloned()
        .collect()
}

fn matches_term(airport: &AirportRecord, term: &str) -> bool {
    [
        &airport.name,
        &airport.municipality,
        &airport.iso_country,
        &airport.iata_code,
        &airport.ident,
    ]
    .iter()
    .any(|field| contains_ignore_case(field, term))
}

/// `term` must already be lowercase. ASCII fields are compared in place;
/// anything else goes through a full Unicode lowercase.
fn contains_ignore_case(field: &str, term: &str) -> bool {
    if field.is_ascii() && term.is_ascii() {
        let (field, term) = (field.as_bytes(), term.as_bytes());
        return term.is_empty()
            || field
                .windows(term.len())
                .any(|window| window.eq_ignore_ascii_case(term));
    }
    field.to_lowercase().contains(term)
}

/// Ranking: exact IATA hit, then IATA-bearing, then airport kind, then name.
fn display_key(airport: &AirportRecord, term: &str) -> (bool, bool, u8, String) {
    let exact = airport.iata_code.to_lowercase() == term;
    (
        !exact,
        !airport.has_iata_code(),
        airport.airport_kind().rank(),
        airport.name.to_lowercase(),
    )
}

/// Resolve a submitted form value back to its airport.
pub fn find_by_value<'a>(value: &str, airports: &'a [AirportRecord]) -> Option<&'a AirportRecord> {
    if value.is_empty() {
        return None;
    }
    airports.iter().find(|airport| value_of(airport) == value)
}

/// Airports on one continent (two-letter code, case-insensitive).
pub fn airports_by_continent<'a>(
    continent: &str,
    airports: &'a [AirportRecord],
) -> Vec<&'a AirportRecord> {
    airports
        .iter()
        .filter(|airport| airport.continent.eq_ignore_ascii_case(continent))
        .collect()
}
