//! Gene identifier files and cross-type consistency.
//!
//! Each gene name type (symbol, Ensembl, Entrez and so on) lives in its own
//! gzip-compressed file with one gene per line and tab-separated aliases. A
//! line may be blank for a gene with no name of that type, but every file
//! must agree on the total number of genes.

use rustc_hash::FxHashSet;
use std::path::Path;

use crate::error::{line_ref, Result, ValidateError};
use crate::field::{parse_string_field, FieldMode};
use crate::stream::{ByteCursor, ByteSource};

/// Scan one gene name file and return its line count.
///
/// Names within a line must be non-empty and unique; blank lines are legal
/// and still counted.
pub fn check_genes(path: &str) -> Result<u64> {
    let mut src = ByteCursor::open_gzip(path)?;
    let mut line: u64 = 0;
    let mut seen: FxHashSet<Vec<u8>> = FxHashSet::default();

    while src.valid() {
        seen.clear();
        if src.get() == b'\n' {
            src.advance()?;
        } else {
            loop {
                let (name, terminated) =
                    parse_string_field(&mut src, FieldMode::Unknown, path, line)?;
                if name.is_empty() {
                    return Err(ValidateError::Invalid(format!(
                        "empty name detected in '{}' {}",
                        path,
                        line_ref(line)
                    )));
                }
                if seen.contains(&name) {
                    return Err(ValidateError::Invalid(format!(
                        "duplicated names detected in '{}' {}",
                        path,
                        line_ref(line)
                    )));
                }
                if terminated {
                    break;
                }
                seen.insert(name);
            }
        }

        if line == u64::MAX {
            return Err(ValidateError::Invalid(format!(
                "number of lines in '{}' should fit in a 64-bit unsigned integer",
                path
            )));
        }
        line += 1;
    }

    Ok(line)
}

/// Validate every gene name file under `prefix` and return the gene count
/// they agree on.
pub fn validate_genes(prefix: &str, types: &[String]) -> Result<u64> {
    if types.is_empty() {
        return Err(ValidateError::Invalid(
            "at least one gene name type should be present".to_string(),
        ));
    }

    let first = &types[0];
    let expected = check_genes(&format!("{}{}.tsv.gz", prefix, first))?;
    for kind in &types[1..] {
        let count = check_genes(&format!("{}{}.tsv.gz", prefix, kind))?;
        if count != expected {
            return Err(ValidateError::Invalid(format!(
                "inconsistent number of genes between types ({} for {}, {} for {})",
                expected, first, count, kind
            )));
        }
    }

    Ok(expected)
}

/// List the gene name types available under `prefix` by scanning its
/// directory for `<prefix><type>.tsv.gz` files.
pub fn discover_gene_types(prefix: &str) -> Result<Vec<String>> {
    let full = Path::new(prefix);
    let dir = match full.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = match full.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::new(),
    };

    let mut types = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(rest) = name.strip_prefix(&stem) {
            if let Some(kind) = rest.strip_suffix(".tsv.gz") {
                if !kind.is_empty() {
                    types.push(kind.to_string());
                }
            }
        }
    }

    types.sort();
    Ok(types)
}
