use std::fmt;

#[derive(Debug)]
pub enum AirportError {
    Network(reqwest::Error),
    HttpStatus(u16),
    Timeout(std::time::Duration),
    Archive(zip::result::ZipError),
    MissingArchiveEntry(String),
    EmptyDataset,
    Json(serde_json::Error),
    Io(std::io::Error),
    Cache(String),
    Unavailable(String),
    InvalidBooking(String),
}

impl AirportError {
    /// Failures while acquiring the remote dataset. These are recovered by
    /// the repository when an essential fallback is configured.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            AirportError::Network(_)
                | AirportError::HttpStatus(_)
                | AirportError::Timeout(_)
                | AirportError::Archive(_)
                | AirportError::MissingArchiveEntry(_)
                | AirportError::EmptyDataset
        )
    }
}

impl fmt::Display for AirportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AirportError::Network(e) => write!(f, "Network error: {}", e),
            AirportError::HttpStatus(code) => write!(f, "HTTP error status: {}", code),
            AirportError::Timeout(after) => write!(f, "Dataset fetch timed out after {:?}", after),
            AirportError::Archive(e) => write!(f, "Archive error: {}", e),
            AirportError::MissingArchiveEntry(name) => {
                write!(f, "Archive does not contain '{}'", name)
            }
            AirportError::EmptyDataset => write!(f, "Dataset contained no usable airports"),
            AirportError::Json(e) => write!(f, "JSON parsing error: {}", e),
            AirportError::Io(e) => write!(f, "IO error: {}", e),
            AirportError::Cache(e) => write!(f, "Cache error: {}", e),
            AirportError::Unavailable(e) => write!(f, "Airport data unavailable: {}", e),
            AirportError::InvalidBooking(e) => write!(f, "Invalid booking: {}", e),
        }
    }
}

impl std::error::Error for AirportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AirportError::Network(e) => Some(e),
            AirportError::Archive(e) => Some(e),
            AirportError::Json(e) => Some(e),
            AirportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AirportError {
    fn from(err: reqwest::Error) -> Self {
        AirportError::Network(err)
    }
}

impl From<serde_json::Error> for AirportError {
    fn from(err: serde_json::Error) -> Self {
        AirportError::Json(err)
    }
}

impl From<std::io::Error> for AirportError {
    fn from(err: std::io::Error) -> Self {
        AirportError::Io(err)
    }
}

impl From<zip::result::ZipError> for AirportError {
    fn from(err: zip::result::ZipError) -> Self {
        AirportError::Archive(err)
    }
}
