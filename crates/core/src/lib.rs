//! Shared types for the tablink record client.
//!
//! The remote tabular database owns records and their field schema; this crate
//! only models what the client reads and writes: [`Record`]s, the
//! [`Attachment`] objects embedded in attachment fields, the
//! [`Formula`] used to filter list queries, and the [`TablinkConfig`] value
//! object handed to the client at startup.

pub mod attachment;
pub mod config;
pub mod error;
pub mod formula;
pub mod record;

pub use attachment::Attachment;
pub use config::{DEFAULT_PREFIX, TablinkConfig};
pub use error::{ConfigError, FormulaError};
pub use formula::Formula;
pub use record::{NAME_FIELD, Record, RecordPage};
