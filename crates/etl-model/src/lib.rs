//! Data model for the semicolon ETL pipeline.
//!
//! - **schema**: the ordered target columns and their declared types
//! - **value**: the typed cell a row slot holds as it moves through the chain
//! - **options**: delimiter and null sentinel used when splitting rows
//! - **error**: the shared error taxonomy

pub mod error;
pub mod options;
pub mod schema;
pub mod value;

pub use error::{EtlError, Result};
pub use options::{DEFAULT_FIELD_DELIMITER, DEFAULT_NULL_SENTINEL, ParseOptions};
pub use schema::{Column, ColumnType, Schema};
pub use value::{Factor, Value};
