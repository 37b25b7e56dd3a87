//! Interpretation of the lookup service's plaintext response body.
//!
//! The service answers with either a bare occurrence count for the queried
//! hash, or a listing of `HASH:COUNT` entries separated by newlines (commas are
//! accepted as well). Listing entries may carry a full hash or only its suffix.

use crate::error::Error;

/// Extracts the breach count for `hash` from a response body.
///
/// `hash` must already be normalized (uppercase hex). An empty body, or a
/// listing that contains no entry for `hash`, yields `0`.
pub fn parse_count(body: &str, hash: &str) -> Result<u64, Error> {
    let mut entries = body.split(['\n', ',']).map(str::trim).filter(|e| !e.is_empty()).peekable();

    let Some(first) = entries.peek().copied() else {
        return Ok(0);
    };

    if !first.contains(':') && first.bytes().all(|b| b.is_ascii_digit()) {
        entries.next();
        if entries.peek().is_none() {
            return parse_number(first);
        }
        return Err(Error::Parse {
            entry: first.to_string(),
            reason: "bare count followed by more entries",
        });
    }

    let mut found = None;
    for entry in entries {
        let (suffix, count) = parse_entry(entry)?;
        if found.is_none() && suffix_matches(hash, suffix) {
            found = Some(count);
        }
    }

    Ok(found.unwrap_or(0))
}

/// Splits one `HASH:COUNT` entry.
fn parse_entry(entry: &str) -> Result<(&str, u64), Error> {
    let Some((suffix, count)) = entry.split_once(':') else {
        return Err(Error::Parse { entry: entry.to_string(), reason: "missing ':' separator" });
    };

    let suffix = suffix.trim();
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Parse { entry: entry.to_string(), reason: "hash part is not hex" });
    }

    let count = count.trim();
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Parse { entry: entry.to_string(), reason: "count is not a number" });
    }

    Ok((suffix, parse_number(count)?))
}

fn parse_number(count: &str) -> Result<u64, Error> {
    count
        .parse()
        .map_err(|_| Error::Parse { entry: count.to_string(), reason: "count out of range" })
}

#[inline]
fn suffix_matches(hash: &str, suffix: &str) -> bool {
    let (hash, suffix) = (hash.as_bytes(), suffix.as_bytes());
    suffix.len() <= hash.len() && hash[hash.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}
