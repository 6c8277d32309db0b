use crate::error::Result;
use crate::shortcode::ShortCode;
use serde::{Deserialize, Serialize};

/// A stored URL record.
///
/// This is also the on-disk shape of one durable log line:
/// `{"code":"ab3d7k","url":"http://example.com/path","visit":0}`.
/// A missing `visit` defaults to 0 and unknown fields are ignored. Logs
/// written with capitalized keys (`Code`, `URL`, `Visit`) are read too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// The short code, primary key of the store.
    #[serde(alias = "Code")]
    pub code: ShortCode,
    /// The URL that was shortened.
    #[serde(alias = "URL")]
    pub url: String,
    /// How many times the code has been resolved.
    #[serde(rename = "visit", alias = "Visit", default)]
    pub visit_count: u64,
}

impl Record {
    /// Creates a freshly stored record with no visits.
    pub fn new(code: ShortCode, url: impl Into<String>) -> Self {
        Self {
            code,
            url: url.into(),
            visit_count: 0,
        }
    }

    /// Returns a copy of this record with one more visit.
    pub fn visited(&self) -> Self {
        Self {
            visit_count: self.visit_count.saturating_add(1),
            ..self.clone()
        }
    }
}

/// A read-only view of a code store.
///
/// The gateway uses this for lookups and startup diagnostics.
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the record for a given short code.
    /// Returns `Err(NotFound)` if the code does not exist.
    fn get_by_code(&self, code: &ShortCode) -> Result<Record>;

    /// Number of codes currently tracked.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub trait Repository: ReadRepository {
    /// Generates a fresh code for `url`, persists the new record and
    /// returns it. Returns `Err(DuplicateCode)` if the generated code is
    /// already taken.
    fn store_url(&self, url: &str) -> Result<Record>;

    /// Adds one visit to the record for `code`.
    /// Returns `Err(NotFound)` if the code does not exist.
    fn increment(&self, code: &ShortCode) -> Result<()>;
}
