//! Parsers for genomic file formats.

pub mod bed;
pub mod util;

pub use bed::{parse_bed, BedData, BedReader};
