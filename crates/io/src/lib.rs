//! # firn-io
//!
//! Read raw epoch series from Parquet and write derived series, aggregated
//! series and error profiles back to Parquet. Missing values are stored as
//! Parquet nulls, never as sentinels.

mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{FIXED_AMBIGUITY, RawEpochs, ReaderConfig, read_epochs};
pub use writer::{Compression, WriterConfig, write_aggregated, write_error_profile, write_series};
