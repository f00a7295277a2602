//! Lock-step comparison of a metadata file against its gzip copy.
//!
//! Each content file ships in both a raw and a gzip-compressed form, and the
//! two must be field-for-field identical. The gzip form additionally carries
//! one trailing integer per line (a set count or member count) which is
//! checked against the attached size recorded in the ranges oracle.

use crate::error::{line_ref, Result, ValidateError};
use crate::field::{parse_integer_field, parse_string_field, FieldMode};
use crate::stream::{ByteCursor, ByteSource};

pub(crate) fn exceeds_ranges(path: &str, line: u64) -> ValidateError {
    ValidateError::Invalid(format!(
        "number of lines in '{}' exceeds that expected from its '*.ranges.gz' file {}",
        path,
        line_ref(line)
    ))
}

pub(crate) fn wrong_byte_count(path: &str, line: u64) -> ValidateError {
    ValidateError::Invalid(format!(
        "number of bytes per line in '{}' is not the same as that expected from the '*.ranges.gz' file {}",
        path,
        line_ref(line)
    ))
}

pub(crate) fn early_termination(path: &str) -> ValidateError {
    ValidateError::Invalid(format!(
        "early termination of the Gzipped version of '{}'",
        path
    ))
}

pub(crate) fn fewer_than_ranges(path: &str, line: u64) -> ValidateError {
    ValidateError::Invalid(format!(
        "number of lines in '{}' is less than that expected from its '*.ranges.gz' file {}",
        path,
        line_ref(line)
    ))
}

fn different_field(field: &str, path: &str, line: u64) -> ValidateError {
    ValidateError::Invalid(format!(
        "different {} in '{}' compared to its Gzipped version {}",
        field,
        path,
        line_ref(line)
    ))
}

/// Validate `collections.tsv` against its gzip copy and ranges oracle.
///
/// Each line is `title\tdescription\tspecies\tmaintainer\tsource`; the gzip
/// copy carries a trailing set count that must match the attached size from
/// the ranges file.
pub fn check_collection_details(path: &str, ranges: &[u64], numbers: &[u64]) -> Result<()> {
    let gz_path = format!("{}.gz", path);
    let mut raw = ByteCursor::open_raw(path)?;
    let mut gzip = ByteCursor::open_gzip(&gz_path)?;

    let num_ranges = ranges.len() as u64;
    let mut line: u64 = 0;

    while raw.valid() {
        let raw_pos = raw.position();
        let (title, _) = parse_string_field(&mut raw, FieldMode::Middle, path, line)?;
        let (description, _) = parse_string_field(&mut raw, FieldMode::Middle, path, line)?;
        let (species, _) = parse_integer_field(&mut raw, FieldMode::Middle, path, line)?;
        let (maintainer, _) = parse_string_field(&mut raw, FieldMode::Middle, path, line)?;
        let (source, _) = parse_string_field(&mut raw, FieldMode::Last, path, line)?;

        if line >= num_ranges {
            return Err(exceeds_ranges(path, line));
        }
        if raw.position() - raw_pos - 1 != ranges[line as usize] {
            return Err(wrong_byte_count(path, line));
        }
        if !gzip.valid() {
            return Err(early_termination(path));
        }

        let (gz_title, _) = parse_string_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_title != title {
            return Err(different_field("title", path, line));
        }
        let (gz_description, _) = parse_string_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_description != description {
            return Err(different_field("description", path, line));
        }
        let (gz_species, _) = parse_integer_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_species != species {
            return Err(different_field("species", path, line));
        }
        let (gz_maintainer, _) = parse_string_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_maintainer != maintainer {
            return Err(different_field("maintainer", path, line));
        }
        let (gz_source, _) = parse_string_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_source != source {
            return Err(different_field("source", path, line));
        }
        let (gz_number, _) = parse_integer_field(&mut gzip, FieldMode::Last, &gz_path, line)?;
        if gz_number != numbers[line as usize] {
            return Err(ValidateError::Invalid(format!(
                "different number in '{}' compared to its '*.ranges.gz' file {}",
                gz_path,
                line_ref(line)
            )));
        }

        line += 1;
    }

    if line != num_ranges {
        return Err(fewer_than_ranges(path, line));
    }
    Ok(())
}

/// Validate `sets.tsv` against its gzip copy and ranges oracle.
///
/// Each line is `name\tdescription`; the gzip copy carries a trailing member
/// count checked against the attached size from the ranges file. The `extra`
/// hook receives every line's name and description so the caller can build
/// side structures (the token maps) in the same pass; it may raise its own
/// error but cannot otherwise change the outcome of the scan.
pub fn check_set_details<F>(path: &str, ranges: &[u64], sizes: &[u64], mut extra: F) -> Result<()>
where
    F: FnMut(u64, &[u8], &[u8]) -> Result<()>,
{
    let gz_path = format!("{}.gz", path);
    let mut raw = ByteCursor::open_raw(path)?;
    let mut gzip = ByteCursor::open_gzip(&gz_path)?;

    let num_ranges = ranges.len() as u64;
    let mut line: u64 = 0;

    while raw.valid() {
        let raw_pos = raw.position();
        let (name, _) = parse_string_field(&mut raw, FieldMode::Middle, path, line)?;
        let (description, _) = parse_string_field(&mut raw, FieldMode::Last, path, line)?;

        if line >= num_ranges {
            return Err(exceeds_ranges(path, line));
        }
        if raw.position() - raw_pos - 1 != ranges[line as usize] {
            return Err(wrong_byte_count(path, line));
        }
        if !gzip.valid() {
            return Err(early_termination(path));
        }

        let (gz_name, _) = parse_string_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_name != name {
            return Err(different_field("name", path, line));
        }
        let (gz_description, _) = parse_string_field(&mut gzip, FieldMode::Middle, &gz_path, line)?;
        if gz_description != description {
            return Err(different_field("description", path, line));
        }
        let (gz_size, _) = parse_integer_field(&mut gzip, FieldMode::Last, &gz_path, line)?;
        if gz_size != sizes[line as usize] {
            return Err(ValidateError::Invalid(format!(
                "different size in '{}' compared to its '*.ranges.gz' file {}",
                gz_path,
                line_ref(line)
            )));
        }

        extra(line, &name, &description)?;
        line += 1;
    }

    if line != num_ranges {
        return Err(fewer_than_ranges(path, line));
    }
    Ok(())
}
