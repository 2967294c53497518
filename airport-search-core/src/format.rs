use crate::airport::AirportRecord;

/// Single-line label for an airport: `IATA - Name, Municipality, CC`.
/// Absent parts are left out along with their separator.
pub fn format_airport_display(airport: &AirportRecord) -> String {
    let mut display = String::new();

    if !airport.iata_code.is_empty() {
        display.push_str(&airport.iata_code);
        display.push_str(" - ");
    }
    display.push_str(&airport.name);
    if !airport.municipality.is_empty() {
        display.push_str(", ");
        display.push_str(&airport.municipality);
    }
    if !airport.iso_country.is_empty() {
        display.push_str(", ");
        display.push_str(&airport.iso_country);
    }

    display
}

/// Form value for a selected airport: the first non-empty of IATA code,
/// ident and name. Not guaranteed to be an IATA code.
pub fn value_of(airport: &AirportRecord) -> &str {
    [&airport.iata_code, &airport.ident, &airport.name]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .map(String::as_str)
        .unwrap_or("")
}
