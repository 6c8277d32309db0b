mod health;
mod url;

pub use health::ping_handler;
pub use url::{create_url_handler, info_handler, redirect_handler};
