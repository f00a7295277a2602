//! Byte-by-byte field scanning with strict grammar enforcement.
//!
//! Every file in the database is a sequence of tab-delimited fields with
//! newline-terminated lines. Fields are parsed one byte at a time so the
//! caller can account for exact byte offsets; the grammar is deliberately
//! rigid (no leading zeros, no empty fields, no stray terminators) because
//! these files are machine-written and any deviation means corruption.

use crate::error::{Result, ValidateError};
use crate::stream::ByteSource;

/// Where a field sits within its line.
///
/// `Middle` fields must end on a tab and `Last` fields on a newline; a field
/// of `Unknown` position accepts either and reports which one it saw, which
/// is how variable-arity index lines are consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Middle,
    Last,
    Unknown,
}

impl FieldMode {
    #[inline]
    fn breaks_on_newline(self) -> bool {
        matches!(self, FieldMode::Last | FieldMode::Unknown)
    }

    #[inline]
    fn breaks_on_tab(self) -> bool {
        matches!(self, FieldMode::Middle | FieldMode::Unknown)
    }
}

/// Parse one non-negative integer field.
///
/// Returns the value and whether the field was terminated by a newline
/// (always false for `Middle`, always true for `Last`).
///
/// Grammar: digits only; `0` is only legal as a single digit; values must
/// fit in a u64, checked digit-by-digit before any accumulation can wrap.
pub fn parse_integer_field<S: ByteSource>(
    src: &mut S,
    mode: FieldMode,
    path: &str,
    line: u64,
) -> Result<(u64, bool)> {
    const THRESHOLD: u64 = u64::MAX / 10;
    const MAX_REMAINDER: u64 = u64::MAX % 10;

    let mut number: u64 = 0;
    let mut ndigits: u64 = 0;
    let mut has_leading_zero = false;
    let mut terminated = false;

    loop {
        if !src.valid() {
            return Err(ValidateError::parse(path, line, "no terminating newline"));
        }
        let c = src.get();
        let more = src.advance()?;

        if c == b'\n' && mode.breaks_on_newline() {
            terminated = true;
            break;
        }
        if c == b'\t' && mode.breaks_on_tab() {
            break;
        }

        if !c.is_ascii_digit() {
            return Err(ValidateError::parse(path, line, "non-digit character detected"));
        }
        if !more {
            return Err(ValidateError::parse(path, line, "no terminating newline"));
        }

        let digit = u64::from(c - b'0');
        if number > THRESHOLD || (number == THRESHOLD && digit > MAX_REMAINDER) {
            return Err(ValidateError::parse(
                path,
                line,
                "64-bit unsigned integer overflow",
            ));
        }

        has_leading_zero |= ndigits == 0 && digit == 0;
        number = number * 10 + digit;
        ndigits += 1;
    }

    if number == 0 {
        if ndigits > 1 {
            return Err(ValidateError::parse(path, line, "leading zero detected"));
        } else if ndigits == 0 {
            return Err(ValidateError::parse(path, line, "empty field detected"));
        }
    } else if has_leading_zero {
        return Err(ValidateError::parse(path, line, "leading zero detected"));
    }

    Ok((number, terminated))
}

/// Parse one free-text field.
///
/// Fields are byte strings: any byte is accepted except the terminators
/// themselves. Returns the bytes and whether the field was terminated by a
/// newline.
pub fn parse_string_field<S: ByteSource>(
    src: &mut S,
    mode: FieldMode,
    path: &str,
    line: u64,
) -> Result<(Vec<u8>, bool)> {
    let mut value = Vec::new();
    let mut terminated = false;

    loop {
        if !src.valid() {
            return Err(ValidateError::parse(path, line, "no terminating newline"));
        }
        let c = src.get();
        let more = src.advance()?;

        if c == b'\n' && mode.breaks_on_newline() {
            terminated = true;
            break;
        }
        if c == b'\t' && mode.breaks_on_tab() {
            break;
        }

        if c == b'\t' || c == b'\n' {
            return Err(ValidateError::parse(
                path,
                line,
                "string containing a newline or tab",
            ));
        }
        if !more {
            return Err(ValidateError::parse(path, line, "no terminating newline"));
        }

        value.push(c);
    }

    Ok((value, terminated))
}
