use crate::airport::AirportRecord;
use lazy_static::lazy_static;

// ident, name, elevation_ft, continent, iso_country, iso_region, municipality, iata_code, local_code
const ESSENTIAL_ROWS: &[[&str; 9]] = &[
    ["KJFK", "John F Kennedy International Airport", "13", "NA", "US", "US-NY", "New York", "JFK", "JFK"],
    ["KLAX", "Los Angeles International Airport", "125", "NA", "US", "US-CA", "Los Angeles", "LAX", "LAX"],
    ["EGLL", "London Heathrow Airport", "83", "EU", "GB", "GB-ENG", "London", "LHR", ""],
    ["LFPG", "Charles de Gaulle International Airport", "392", "EU", "FR", "FR-IDF", "Paris", "CDG", ""],
    ["EDDF", "Frankfurt am Main Airport", "364", "EU", "DE", "DE-HE", "Frankfurt am Main", "FRA", ""],
    ["RJTT", "Tokyo Haneda International Airport", "35", "AS", "JP", "JP-13", "Tokyo", "HND", ""],
    ["VHHH", "Hong Kong International Airport", "28", "AS", "HK", "HK-HCW", "Hong Kong", "HKG", ""],
    ["OMDB", "Dubai International Airport", "62", "AS", "AE", "AE-DU", "Dubai", "DXB", ""],
];

lazy_static! {
    /// Major international hubs, available without any network access.
    pub static ref ESSENTIAL_AIRPORTS: Vec<AirportRecord> = ESSENTIAL_ROWS
        .iter()
        .map(|[ident, name, elevation, continent, country, region, municipality, iata, local]| {
            AirportRecord {
                ident: ident.to_string(),
                kind: "large_airport".to_string(),
                name: name.to_string(),
                elevation_ft: elevation.to_string(),
                continent: continent.to_string(),
                iso_country: country.to_string(),
                iso_region: region.to_string(),
                municipality: municipality.to_string(),
                scheduled_service: "yes".to_string(),
                gps_code: ident.to_string(),
                iata_code: iata.to_string(),
                local_code: local.to_string(),
                ..Default::default()
            }
        })
        .collect();
}

pub fn essential_airports() -> Vec<AirportRecord> {
    ESSENTIAL_AIRPORTS.clone()
}
