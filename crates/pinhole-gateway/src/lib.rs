//! HTTP gateway in front of the Pinhole code store.
//!
//! The gateway only parses requests, calls into a [`Repository`] and
//! formats responses. Store calls run on tokio's blocking pool because
//! they append to the log synchronously.
//!
//! [`Repository`]: pinhole_core::Repository

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use state::AppState;
