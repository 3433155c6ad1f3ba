//! Input strategies.
//!
//! The pipeline itself only sees an iterator of decoded records. Each
//! strategy turns a concrete input (so far, a gzip file on disk) into a
//! header row plus that iterator.

pub mod gzip;
