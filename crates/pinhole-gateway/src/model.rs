mod url;

pub use url::{CreateUrlRequest, UrlResponse};
