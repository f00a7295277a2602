//! Delta-encoded index lines: decoding, bound checks and gzip comparison.
//!
//! An index file stores one strictly-ascending integer sequence per line,
//! delta-encoded: the first value is absolute, every subsequent value is a
//! positive difference. An empty line is an empty sequence. Bound checks are
//! performed incrementally on the deltas so a hostile file can never push
//! the running value through a 64-bit wraparound.

use flate2::read::GzDecoder;
use std::fs::File;

use crate::details::{early_termination, exceeds_ranges, fewer_than_ranges, wrong_byte_count};
use crate::error::{line_ref, Result, ValidateError};
use crate::field::{parse_integer_field, FieldMode};
use crate::stream::{ByteCursor, ByteSource};

/// Validate an index file together with its gzip copy.
///
/// The raw and gzip streams are decoded in lock-step and their raw delta
/// sequences must match element for element. Used for `set2gene.tsv` and
/// `gene2set.tsv`, which exist in both forms.
pub fn check_indices_with_gzip<F>(
    path: &str,
    index_limit: u64,
    ranges: &[u64],
    extra: F,
) -> Result<()>
where
    F: FnMut(u64, &[u64]) -> Result<()>,
{
    let gzip = ByteCursor::open_gzip(format!("{}.gz", path))?;
    check_indices_inner(path, index_limit, ranges, Some(gzip), extra)
}

/// Validate an index file that has no gzip copy (the token files).
pub fn check_indices_raw_only<F>(
    path: &str,
    index_limit: u64,
    ranges: &[u64],
    extra: F,
) -> Result<()>
where
    F: FnMut(u64, &[u64]) -> Result<()>,
{
    check_indices_inner(path, index_limit, ranges, None, extra)
}

/// Read one delta line into `indices`. The cursor must sit on a non-newline
/// byte; on return it sits just past the line's newline.
fn read_delta_line<S: ByteSource>(
    src: &mut S,
    indices: &mut Vec<u64>,
    path: &str,
    line: u64,
) -> Result<()> {
    loop {
        let (value, terminated) = parse_integer_field(src, FieldMode::Unknown, path, line)?;
        indices.push(value);
        if terminated {
            return Ok(());
        }
    }
}

fn check_indices_inner<F>(
    path: &str,
    index_limit: u64,
    ranges: &[u64],
    mut gzip: Option<ByteCursor<GzDecoder<File>>>,
    mut extra: F,
) -> Result<()>
where
    F: FnMut(u64, &[u64]) -> Result<()>,
{
    let gz_path = format!("{}.gz", path);
    let mut raw = ByteCursor::open_raw(path)?;

    let num_ranges = ranges.len() as u64;
    let mut line: u64 = 0;
    let mut raw_indices: Vec<u64> = Vec::new();
    let mut gzip_indices: Vec<u64> = Vec::new();

    while raw.valid() {
        raw_indices.clear();
        let raw_pos = raw.position();

        if raw.get() != b'\n' {
            read_delta_line(&mut raw, &mut raw_indices, path, line)?;

            let mut cumulative = raw_indices[0];
            if cumulative >= index_limit {
                return Err(out_of_range(path, line));
            }
            for &delta in &raw_indices[1..] {
                if delta == 0 {
                    return Err(ValidateError::Invalid(format!(
                        "duplicate index in '{}' {}",
                        path,
                        line_ref(line)
                    )));
                }
                // Checked as a difference so `cumulative + delta` can never
                // wrap before the comparison.
                if delta >= index_limit - cumulative {
                    return Err(out_of_range(path, line));
                }
                cumulative += delta;
            }
        } else {
            raw.advance()?;
        }

        if line >= num_ranges {
            return Err(exceeds_ranges(path, line));
        }
        if raw.position() - raw_pos - 1 != ranges[line as usize] {
            return Err(wrong_byte_count(path, line));
        }

        if let Some(gz) = gzip.as_mut() {
            if !gz.valid() {
                return Err(early_termination(path));
            }

            gzip_indices.clear();
            if gz.get() != b'\n' {
                read_delta_line(gz, &mut gzip_indices, &gz_path, line)?;
            } else {
                gz.advance()?;
            }

            // Raw delta sequences are compared before cumulative conversion.
            if raw_indices != gzip_indices {
                return Err(ValidateError::Invalid(format!(
                    "different indices between '{}' and its Gzipped version {}",
                    path,
                    line_ref(line)
                )));
            }
        }

        for i in 1..raw_indices.len() {
            raw_indices[i] += raw_indices[i - 1];
        }
        extra(line, &raw_indices)?;

        line += 1;
    }

    if line != num_ranges {
        return Err(fewer_than_ranges(path, line));
    }
    Ok(())
}

fn out_of_range(path: &str, line: u64) -> ValidateError {
    ValidateError::Invalid(format!(
        "out-of-range index in '{}' {}",
        path,
        line_ref(line)
    ))
}
