use crate::error::AirportError;
use log::debug;
use std::future::Future;
use std::io::{Cursor, Read};
use zip::read::ZipArchive;
use zip::result::ZipError;

const USER_AGENT: &str = "airport-search-core/0.1";
const ACCEPT: &str = "text/csv, application/zip, */*";
const ZIP_SIGNATURE: &[u8] = b"PK\x03\x04";
const UTF8_BOM: &str = "\u{feff}";

/// Where the raw dataset bytes come from.
pub trait DatasetSource: Send + Sync + 'static {
    fn fetch(&self) -> impl Future<Output = Result<Vec<u8>, AirportError>> + Send;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// Fetches the dataset over HTTP(S). No authentication.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: &str) -> Result<Self, AirportError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(HttpSource {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DatasetSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<u8>, AirportError> {
        debug!("fetching airport dataset: {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("airport dataset request failed with status {}", status);
            return Err(AirportError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        debug!("received {} bytes from {}", bytes.len(), self.url);
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

pub fn is_zip_archive(bytes: &[u8]) -> bool {
    bytes.starts_with(ZIP_SIGNATURE)
}

/// Turn fetched bytes into dataset text.
///
/// ZIP archives must contain `entry_name`; anything else is taken as the
/// text itself. Invalid UTF-8 is replaced rather than rejected.
pub fn decode_dataset(bytes: &[u8], entry_name: &str) -> Result<String, AirportError> {
    let text = if is_zip_archive(bytes) {
        extract_archive_entry(bytes, entry_name)?
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    };

    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

fn extract_archive_entry(bytes: &[u8], entry_name: &str) -> Result<String, AirportError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => {
            return Err(AirportError::MissingArchiveEntry(entry_name.to_string()));
        }
        Err(e) => return Err(AirportError::Archive(e)),
    };

    let mut raw = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut raw)
        .map_err(|e| AirportError::Archive(ZipError::Io(e)))?;
    debug!("extracted {} bytes of '{}' from archive", raw.len(), entry_name);

    Ok(String::from_utf8_lossy(&raw).into_owned())
}
