pub mod airport;
pub mod booking;
pub mod cache;
pub mod config;
pub mod error;
pub mod essential;
pub mod format;
pub mod parser;
pub mod repository;
pub mod search;
pub mod source;

pub use airport::{AirportKind, AirportRecord};
pub use booking::{LogisticsBooking, TravelBooking};
pub use cache::{AirportCache, CacheEnvelope, CacheInfo};
pub use config::DatasetConfig;
pub use error::AirportError;
pub use essential::essential_airports;
pub use format::{format_airport_display, value_of};
pub use parser::parse_airports;
pub use repository::{AirportRepository, AirportSnapshot, DatasetOrigin, LoadStatus};
pub use search::{
    MAX_RESULTS, MIN_QUERY_CHARS, airports_by_continent, find_by_value, search_airports,
    search_airports_with_limit,
};
pub use source::{DatasetSource, HttpSource, decode_dataset};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_and_select() {
        // Full path a booking form takes: dataset text to submitted value
        let text = "ident,type,name,municipality,iso_country,iata_code\n\
                    HCMM,large_airport,Aden Adde International Airport,Mogadishu,SO,MGQ\n\
                    HCMH,medium_airport,Egal International Airport,Hargeisa,SO,HGA\n\
                    SO-0001,small_airport,Bush Strip,Mogadishu,SO,\n";
        let airports = parse_airports(text);
        assert_eq!(airports.len(), 2);

        let results = search_airports("mogadishu", &airports);
        assert_eq!(results.len(), 1);
        let selected = &results[0];
        assert_eq!(
            format_airport_display(selected),
            "MGQ - Aden Adde International Airport, Mogadishu, SO"
        );

        let booking = TravelBooking {
            origin: value_of(selected).to_string(),
            destination: "DXB".to_string(),
            customer_email: Some("guest@example.com".to_string()),
            ..Default::default()
        };
        let payload = booking.to_request_payload().unwrap();
        assert_eq!(payload["bookingData"]["origin"], "MGQ");
        assert_eq!(find_by_value("MGQ", &airports).map(|a| a.ident.as_str()), Some("HCMM"));
    }
}
