//! Core types and traits for the Pinhole URL shortener.
//!
//! This crate provides the types shared by the code generator, the
//! durable store and the HTTP gateway: the [`ShortCode`] key, the
//! [`Record`] it maps to, the [`StoreError`] taxonomy and the
//! repository traits the gateway calls into.

pub mod error;
pub mod repository;
pub mod shortcode;

pub use error::{Result, StoreError};
pub use repository::{ReadRepository, Record, Repository};
pub use shortcode::{ShortCode, ALPHABET, CODE_LENGTH};
