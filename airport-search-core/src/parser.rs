//! Delimited-text parsing for the airport dataset.
//!
//! The format is line oriented: the first non-empty line is the header, each
//! following line is one row. A double quote toggles "inside quoted field"
//! mode and is dropped from the output; commas inside a quoted field are data.

use crate::airport::AirportRecord;
use tracing::{debug, info};

/// Split one line into trimmed fields, honouring quoted commas.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                values.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    values.push(current.trim().to_string());

    values
}

/// Column positions of the fields an [`AirportRecord`] is built from.
///
/// Built once from the header so every row goes through the same typed
/// mapping. Columns the header does not name map to `None` and yield empty
/// text.
#[derive(Debug, Default)]
struct ColumnMap {
    ident: Option<usize>,
    kind: Option<usize>,
    name: Option<usize>,
    elevation_ft: Option<usize>,
    continent: Option<usize>,
    iso_country: Option<usize>,
    iso_region: Option<usize>,
    municipality: Option<usize>,
    scheduled_service: Option<usize>,
    gps_code: Option<usize>,
    iata_code: Option<usize>,
    local_code: Option<usize>,
    home_link: Option<usize>,
    wikipedia_link: Option<usize>,
    keywords: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> ColumnMap {
        let mut map = ColumnMap::default();
        for (index, header) in headers.iter().enumerate() {
            let slot = match header.as_str() {
                "ident" => &mut map.ident,
                "type" => &mut map.kind,
                "name" => &mut map.name,
                "elevation_ft" => &mut map.elevation_ft,
                "continent" => &mut map.continent,
                "iso_country" => &mut map.iso_country,
                "iso_region" => &mut map.iso_region,
                "municipality" => &mut map.municipality,
                "scheduled_service" => &mut map.scheduled_service,
                "gps_code" => &mut map.gps_code,
                "iata_code" => &mut map.iata_code,
                "local_code" => &mut map.local_code,
                "home_link" => &mut map.home_link,
                "wikipedia_link" => &mut map.wikipedia_link,
                "keywords" => &mut map.keywords,
                _ => continue,
            };
            // First occurrence wins for duplicated header names
            slot.get_or_insert(index);
        }
        map
    }

    fn field(values: &[String], index: Option<usize>) -> String {
        index
            .and_then(|i| values.get(i))
            .cloned()
            .unwrap_or_default()
    }

    /// Map a row to a record. Rows without an `ident` are rejected.
    fn record(&self, values: &[String]) -> Option<AirportRecord> {
        let ident = Self::field(values, self.ident);
        if ident.is_empty() {
            return None;
        }

        Some(AirportRecord {
            ident,
            kind: Self::field(values, self.kind),
            name: Self::field(values, self.name),
            elevation_ft: Self::field(values, self.elevation_ft),
            continent: Self::field(values, self.continent),
            iso_country: Self::field(values, self.iso_country),
            iso_region: Self::field(values, self.iso_region),
            municipality: Self::field(values, self.municipality),
            scheduled_service: Self::field(values, self.scheduled_service),
            gps_code: Self::field(values, self.gps_code),
            iata_code: Self::field(values, self.iata_code),
            local_code: Self::field(values, self.local_code),
            home_link: Self::field(values, self.home_link),
            wikipedia_link: Self::field(values, self.wikipedia_link),
            keywords: Self::field(values, self.keywords),
        })
    }
}

/// Parse dataset text into the retained airport records, in input order.
///
/// Blank lines are skipped. Rows with fewer values than headers, rows with no
/// `ident`, and rows failing [`AirportRecord::is_retained`] are dropped
/// silently.
pub fn parse_airports(text: &str) -> Vec<AirportRecord> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        debug!("Dataset text is empty, no header row");
        return Vec::new();
    };
    let headers = split_fields(header_line.trim_start_matches('\u{feff}'));
    let columns = ColumnMap::from_headers(&headers);

    let mut airports = Vec::new();
    let mut malformed = 0usize;
    let mut discarded = 0usize;

    for line in lines {
        let values = split_fields(line);
        if values.len() < headers.len() {
            malformed += 1;
            continue;
        }

        match columns.record(&values) {
            Some(record) if record.is_retained() => airports.push(record),
            _ => discarded += 1,
        }
    }

    info!(
        kept = airports.len(),
        discarded = discarded,
        malformed = malformed,
        "Parsed airport dataset"
    );

    airports
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ident,type,name,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,gps_code,iata_code,local_code,home_link,wikipedia_link,keywords";

    #[test]
    fn test_quoted_commas_stay_in_field() {
        let fields = split_fields(r#""A,B","C,D",large_airport"#);
        assert_eq!(fields, vec!["A,B", "C,D", "large_airport"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let fields = split_fields(" a , \" b \" ,c\r");
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_retention_and_order() {
        let text = format!(
            "{HEADER}\n\
             00A,heliport,Total Rf Heliport,11,NA,US,US-PA,Bensalem,no,00A,,00A,,,\n\
             KJFK,large_airport,John F Kennedy International Airport,13,NA,US,US-NY,New York,yes,KJFK,JFK,JFK,,,\n\
             EGKB,medium_airport,London Biggin Hill Airport,598,EU,GB,GB-ENG,London,no,EGKB,,,,,\n\
             XSML,small_airport,Tiny Strip,5,NA,US,US-TX,Nowhere,no,,,,,,\n\
             AYGA,small_airport,Goroka Airport,5282,OC,PG,PG-EHG,Goroka,yes,AYGA,GKA,,,,\n"
        );

        let airports = parse_airports(&text);
        let idents: Vec<&str> = airports.iter().map(|a| a.ident.as_str()).collect();
        assert_eq!(idents, vec!["KJFK", "EGKB", "AYGA"]);

        let jfk = &airports[0];
        assert_eq!(jfk.kind, "large_airport");
        assert_eq!(jfk.municipality, "New York");
        assert_eq!(jfk.iata_code, "JFK");
        assert_eq!(jfk.elevation_ft, "13");
    }

    #[test]
    fn test_malformed_and_blank_rows_are_skipped() {
        let text = format!(
            "{HEADER}\n\
             \n\
             KLAX,large_airport,Los Angeles\n\
             \n\
             KLAX,large_airport,Los Angeles International Airport,125,NA,US,US-CA,Los Angeles,yes,KLAX,LAX,LAX,,,\n"
        );

        let airports = parse_airports(&text);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].name, "Los Angeles International Airport");
    }

    #[test]
    fn test_quoted_header_and_quoted_values() {
        let text = "\"ident\",\"type\",\"name\",\"iata_code\"\r\n\
                    \"SBGR\",\"large_airport\",\"Guarulhos - Governador André Franco Montoro International Airport\",\"GRU\"\r\n\
                    \"X1\",\"closed\",\"Somewhere, Else\",\"\"\r\n";

        let airports = parse_airports(text);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].iata_code, "GRU");
        assert!(airports[0].municipality.is_empty());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let text = "ident,type,name,iata_code,coordinates\n\
                    RJTT,large_airport,Tokyo Haneda International Airport,HND,\"139.78, 35.55\"\n";

        let airports = parse_airports(text);
        assert_eq!(airports.len(), 1);
        assert_eq!(airports[0].name, "Tokyo Haneda International Airport");
    }

    #[test]
    fn test_rows_without_ident_are_rejected() {
        let text = "ident,type,name,iata_code\n,large_airport,Nameless,NLS\n";
        assert!(parse_airports(text).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_airports("").is_empty());
        assert!(parse_airports(HEADER).is_empty());
    }
}
