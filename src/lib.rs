//! Validation for gene set database files.
//!
//! A database is a collection of tab-separated files for one species: gene
//! name mappings, collection and set metadata, token files for free-text
//! search, and delta-encoded mappings between sets and genes. Most files
//! exist in both raw and gzip-compressed form together with a `*.ranges.gz`
//! oracle recording per-line byte lengths, and all of these copies must
//! agree exactly.
//!
//! The two entry points mirror how the files are produced:
//!
//! ```no_run
//! use geneset_verify::{discover_gene_types, validate_database, validate_genes};
//!
//! # fn main() -> geneset_verify::Result<()> {
//! let types = discover_gene_types("db/9606_")?;
//! let num_genes = validate_genes("db/9606_", &types)?;
//! validate_database("db/9606_", num_genes)?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod details;
pub mod error;
pub mod field;
pub mod genes;
pub mod indices;
pub mod ranges;
pub mod stream;
pub mod tokens;

pub use database::validate_database;
pub use error::{Result, ValidateError};
pub use genes::{discover_gene_types, validate_genes};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenient re-exports of the public API.
pub mod prelude {
    pub use crate::database::validate_database;
    pub use crate::details::{check_collection_details, check_set_details};
    pub use crate::error::{Result, ValidateError};
    pub use crate::field::{parse_integer_field, parse_string_field, FieldMode};
    pub use crate::genes::{check_genes, discover_gene_types, validate_genes};
    pub use crate::indices::{check_indices_raw_only, check_indices_with_gzip};
    pub use crate::ranges::{load_named_ranges, load_ranges, load_ranges_with_sizes};
    pub use crate::stream::{ByteCursor, ByteSource, GzipFileSource, RawFileSource};
    pub use crate::tokens::{check_tokens, tokenize, TokenMap};
}
