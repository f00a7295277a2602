//! Loaders for the `*.ranges.gz` side-channel files.
//!
//! A ranges file records, for every logical line of its companion content
//! file, the exact byte length of that line (excluding the newline) and,
//! depending on the file, an attached size or the token text itself. The
//! loaded vectors act as oracles for the line-count and byte-length checks
//! performed by the content-file scans.

use crate::error::{Result, ValidateError};
use crate::field::{parse_integer_field, parse_string_field, FieldMode};
use crate::stream::{ByteCursor, ByteSource};

/// Reject byte-length vectors whose total line footprint (length plus one
/// newline byte per line) cannot be represented in a u64.
fn check_cumulative_bytes(bytes: &[u64], path: &str) -> Result<()> {
    let mut cumulative: u64 = 0;
    for &by in bytes {
        if by >= u64::MAX - cumulative {
            return Err(ValidateError::Invalid(format!(
                "cumulative sum of bytes in '{}' should fit in a 64-bit unsigned integer",
                path
            )));
        }
        cumulative += by + 1;
    }
    Ok(())
}

fn check_line_counter(line: u64, path: &str) -> Result<()> {
    if line == u64::MAX {
        return Err(ValidateError::Invalid(format!(
            "number of lines in '{}' should fit in a 64-bit unsigned integer",
            path
        )));
    }
    Ok(())
}

/// Load a ranges file with one byte length per line.
pub fn load_ranges(path: &str) -> Result<Vec<u64>> {
    let mut src = ByteCursor::open_gzip(path)?;
    let mut output = Vec::new();
    let mut line: u64 = 0;

    while src.valid() {
        let (number, _) = parse_integer_field(&mut src, FieldMode::Last, path, line)?;
        output.push(number);
        check_line_counter(line, path)?;
        line += 1;
    }

    check_cumulative_bytes(&output, path)?;
    Ok(output)
}

/// Load a ranges file with `byte_length\tattached_size` per line.
///
/// The attached size is the set count of a collection or the member count of
/// a set, depending on which file this is the oracle for.
pub fn load_ranges_with_sizes(path: &str) -> Result<(Vec<u64>, Vec<u64>)> {
    let mut src = ByteCursor::open_gzip(path)?;
    let mut output_bytes = Vec::new();
    let mut output_sizes = Vec::new();
    let mut line: u64 = 0;

    while src.valid() {
        let (byte_length, _) = parse_integer_field(&mut src, FieldMode::Middle, path, line)?;
        output_bytes.push(byte_length);

        let (size, _) = parse_integer_field(&mut src, FieldMode::Last, path, line)?;
        output_sizes.push(size);

        check_line_counter(line, path)?;
        line += 1;
    }

    check_cumulative_bytes(&output_bytes, path)?;
    Ok((output_bytes, output_sizes))
}

/// Load a ranges file with `name\tbyte_length` per line, as used by the
/// token files where the name is the token itself.
pub fn load_named_ranges(path: &str) -> Result<(Vec<Vec<u8>>, Vec<u64>)> {
    let mut src = ByteCursor::open_gzip(path)?;
    let mut output_names = Vec::new();
    let mut output_bytes = Vec::new();
    let mut line: u64 = 0;

    while src.valid() {
        let (name, _) = parse_string_field(&mut src, FieldMode::Middle, path, line)?;
        output_names.push(name);

        let (byte_length, _) = parse_integer_field(&mut src, FieldMode::Last, path, line)?;
        output_bytes.push(byte_length);

        check_line_counter(line, path)?;
        line += 1;
    }

    check_cumulative_bytes(&output_bytes, path)?;
    Ok((output_names, output_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_gz(content: &[u8]) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap();
        file
    }

    fn path_str(file: &NamedTempFile) -> String {
        file.path().to_str().unwrap().to_string()
    }

    #[test]
    fn test_load_ranges() {
        let file = write_gz(b"12\n0\n999\n");
        let loaded = load_ranges(&path_str(&file)).unwrap();
        assert_eq!(loaded, vec![12, 0, 999]);
    }

    #[test]
    fn test_load_ranges_empty_file() {
        let file = write_gz(b"");
        let loaded = load_ranges(&path_str(&file)).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_load_ranges_grammar_errors() {
        let file = write_gz(b"12\n01\n");
        let err = load_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("leading zero"));
        assert!(err.contains("(line 2)"));

        let file = write_gz(b"12x\n");
        let err = load_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("non-digit"));

        let file = write_gz(b"12\n34");
        let err = load_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("no terminating newline"));

        let file = write_gz(b"12\t34\n");
        let err = load_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("non-digit"));
    }

    #[test]
    fn test_load_ranges_cumulative_overflow() {
        // Each line also implicitly contributes its newline byte, so two
        // near-max lengths overflow the 64-bit cumulative sum.
        let content = format!("{}\n{}\n", u64::MAX - 1, u64::MAX - 1);
        let file = write_gz(content.as_bytes());
        let err = load_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("cumulative sum of bytes"));

        // A single maximal length already collides with its newline byte.
        let content = format!("{}\n", u64::MAX);
        let file = write_gz(content.as_bytes());
        let err = load_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("cumulative sum of bytes"));
    }

    #[test]
    fn test_load_ranges_with_sizes() {
        let file = write_gz(b"10\t3\n0\t0\n7\t12\n");
        let (bytes, sizes) = load_ranges_with_sizes(&path_str(&file)).unwrap();
        assert_eq!(bytes, vec![10, 0, 7]);
        assert_eq!(sizes, vec![3, 0, 12]);
    }

    #[test]
    fn test_load_ranges_with_sizes_missing_field() {
        let file = write_gz(b"10\n");
        let err = load_ranges_with_sizes(&path_str(&file))
            .unwrap_err()
            .to_string();
        // The newline is a stray byte inside the Middle field.
        assert!(err.contains("non-digit"));
    }

    #[test]
    fn test_load_named_ranges() {
        let file = write_gz(b"aaron\t10\nand\t4\n");
        let (names, bytes) = load_named_ranges(&path_str(&file)).unwrap();
        assert_eq!(names, vec![b"aaron".to_vec(), b"and".to_vec()]);
        assert_eq!(bytes, vec![10, 4]);
    }

    #[test]
    fn test_load_named_ranges_overflowing_bytes() {
        let content = format!("big\t{}\n", u64::MAX);
        let file = write_gz(content.as_bytes());
        let err = load_named_ranges(&path_str(&file)).unwrap_err().to_string();
        assert!(err.contains("cumulative sum of bytes"));
    }
}
