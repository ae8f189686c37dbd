//! Wire models for server responses and documents.

mod db_info;
mod design_document;
mod document;
mod lenient;
mod results;
mod sequence;

pub use db_info::{DbInfo, DbProps, DbSizes, PartitionInfo};
pub use design_document::{ensure_design_prefix, DesignDocument, MapReduce, DESIGN_PREFIX};
pub use document::{Document, DocumentResponse};
pub use results::{
    IndexResponse, QueryResult, SearchResult, SearchResultRow, ViewResponse, ViewRow,
};
pub use sequence::Sequence;
