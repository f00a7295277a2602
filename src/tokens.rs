//! Full-text token extraction and token-file checks.
//!
//! Set names and descriptions are indexed for search by lower-casing them
//! and splitting on anything outside `[a-z0-9-]`. The persisted token files
//! must contain exactly the tokens recomputed here, sorted and unique.

use rustc_hash::FxHashMap;

use crate::error::{line_ref, Result, ValidateError};

/// Token text mapped to the ordered list of set lines it appears in.
pub type TokenMap = FxHashMap<String, Vec<u64>>;

#[inline]
pub(crate) fn invalid_token_byte(c: u8) -> bool {
    !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == b'-')
}

fn flush(latest: &mut String, index: u64, tokens_to_sets: &mut TokenMap) {
    if !latest.is_empty() {
        let list = tokens_to_sets.entry(std::mem::take(latest)).or_default();
        // The same line may produce a token several times in one text; only
        // the last entry is consulted, so recording is once per call.
        if list.last() != Some(&index) {
            list.push(index);
        }
    }
}

/// Split `text` into tokens and record `index` against each of them.
///
/// Characters are folded to ASCII lower case before the charset test, so an
/// uppercase letter continues a token rather than breaking it.
pub fn tokenize(index: u64, text: &[u8], tokens_to_sets: &mut TokenMap) {
    let mut latest = String::new();
    for &b in text {
        let c = b.to_ascii_lowercase();
        if invalid_token_byte(c) {
            flush(&mut latest, index, tokens_to_sets);
        } else {
            latest.push(c as char);
        }
    }
    flush(&mut latest, index, tokens_to_sets);
}

/// Check a persisted token list: entries must be non-empty, restricted to
/// `[a-z0-9-]`, and strictly lexicographically increasing.
pub fn check_tokens(tokens: &[Vec<u8>], path: &str) -> Result<()> {
    for (t, token) in tokens.iter().enumerate() {
        let line = t as u64;
        if token.is_empty() {
            return Err(ValidateError::Invalid(format!(
                "token should not be an empty string in '{}' {}",
                path,
                line_ref(line)
            )));
        }
        if token.iter().any(|&c| invalid_token_byte(c)) {
            return Err(ValidateError::Invalid(format!(
                "tokens should only contain lower-case alphabetical characters, digits or a dash in '{}' {}",
                path,
                line_ref(line)
            )));
        }
        if t > 0 && token[..] <= tokens[t - 1][..] {
            return Err(ValidateError::Invalid(format!(
                "tokens should be unique and lexicographically sorted in '{}' {}",
                path,
                line_ref(line)
            )));
        }
    }
    Ok(())
}
