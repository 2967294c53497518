use serde::{Deserialize, Serialize};

/// One row of the airport reference dataset.
///
/// Every field is kept as the text found in the source; nothing is coerced
/// to numbers. Field names match the dataset header so the cache envelope
/// round-trips with the same JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirportRecord {
    pub ident: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub elevation_ft: String,
    pub continent: String,
    pub iso_country: String,
    pub iso_region: String,
    pub municipality: String,
    pub scheduled_service: String,
    pub gps_code: String,
    pub iata_code: String,
    pub local_code: String,
    pub home_link: String,
    pub wikipedia_link: String,
    pub keywords: String,
}

/// Airport classification as far as ranking cares about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AirportKind {
    Large,
    Medium,
    Small,
    Other,
}

impl AirportKind {
    pub fn from_type(kind: &str) -> AirportKind {
        match kind.to_lowercase().as_str() {
            "large_airport" => AirportKind::Large,
            "medium_airport" => AirportKind::Medium,
            "small_airport" => AirportKind::Small,
            _ => AirportKind::Other,
        }
    }

    /// Sort rank: large < medium < small < everything else.
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl AirportRecord {
    pub fn airport_kind(&self) -> AirportKind {
        AirportKind::from_type(&self.kind)
    }

    pub fn has_iata_code(&self) -> bool {
        !self.iata_code.is_empty()
    }

    /// Retention rule applied at parse time: keep anything with an IATA code,
    /// plus large and medium airports without one.
    pub fn is_retained(&self) -> bool {
        self.has_iata_code() || self.kind == "large_airport" || self.kind == "medium_airport"
    }
}
