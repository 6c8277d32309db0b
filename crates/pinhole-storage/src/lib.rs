//! Durable, code-keyed URL store.
//!
//! [`FileStore`] keeps every record in memory and mirrors each mutation
//! into an append-only log of JSON lines. The log is replayed once when
//! the store is opened and only ever appended to afterwards.

pub mod file;
pub mod log;

pub use file::{CollisionPolicy, FileStore, Recovery, StoreSettings};
pub use log::{InvalidLine, LogSink, LogWriter, Replay};
pub use pinhole_core::{ReadRepository, Record, Repository, ShortCode, StoreError};
