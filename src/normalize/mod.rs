//! Row normalization - flatten payload pairs into schema columns
//!
//! Each raw record is merged with its derived date/time and payload pairs,
//! stripped of the payload and auxiliary columns, and projected onto the
//! discovered [`ColumnSchema`](crate::schema::ColumnSchema).

pub mod normalizer;
pub mod writer;

pub use normalizer::RowNormalizer;
pub use writer::{CsvRecordWriter, FileSink};
