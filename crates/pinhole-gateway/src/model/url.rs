use pinhole_core::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    #[serde(alias = "URL")]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UrlResponse {
    pub code: String,
    pub url: String,
    pub visit: u64,
    pub short_url: String,
}

impl UrlResponse {
    pub fn from_record(record: Record, base_url: &str) -> Self {
        Self {
            short_url: record.code.to_url(base_url),
            code: record.code.to_string(),
            url: record.url,
            visit: record.visit_count,
        }
    }
}
