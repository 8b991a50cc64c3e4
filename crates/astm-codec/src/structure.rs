//! Component E: the generic recursion helpers used by `astm-derive`'s
//! generated `encode_node`/`decode_node` methods (spec §4.E).
//!
//! The struct-shaped logic (which fields are composite vs record vs
//! array, and in what order) is monomorphized per record type by the
//! derive macro; what is generic across every record type lives here:
//! depth bookkeeping, sequence-number inheritance, and the
//! attempt/terminate loop for arrays.

use astm_schema::{Delimiters, Error};

use crate::config::Config;
use crate::cursor::Cursor;

/// Guards recursion depth, matching `MaxDepthReached` (spec §4.E).
pub struct Depth {
    current: u32,
    max: u32,
}

impl Depth {
    pub fn new(max: u32) -> Depth {
        Depth { current: 0, max }
    }

    pub fn enter(&mut self) -> Result<(), Error> {
        if self.current >= self.max {
            tracing::warn!(max = self.max, "max recursion depth reached");
            return Err(Error::MaxDepthReached);
        }
        self.current += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

/// The sequence number a sibling at index `i` within a struct should use:
/// only the first field inherits the parent's sequence, every later
/// sibling resets to 1 (spec §4.E "Encode", confirmed against the
/// source's `BuildStruct`).
pub fn sibling_sequence(index: usize, inherited: u32) -> u32 {
    if index == 0 {
        inherited
    } else {
        1
    }
}

/// Decode a scalar required-or-optional record field: peek the next
/// line, hand it to `try_decode`, and only advance the cursor if the
/// record's name matched. `try_decode` returns `Ok(None)` for a
/// name-mismatch (peeking does not consume, so no rewind is needed) and
/// `Ok(Some(value))` on a match.
pub fn decode_scalar<T>(
    cursor: &mut Cursor,
    letter: char,
    required: bool,
    mut try_decode: impl FnMut(&str) -> Result<Option<T>, Error>,
) -> Result<Option<T>, Error> {
    let Some(line) = cursor.peek() else {
        if required {
            return Err(Error::RequiredRecordMissing(letter));
        }
        return Ok(None);
    };
    match try_decode(line)? {
        Some(value) => {
            cursor.advance();
            Ok(Some(value))
        }
        None => {
            if required {
                Err(Error::RequiredRecordMissing(letter))
            } else {
                Ok(None)
            }
        }
    }
}

/// Decode an array of records (or composite array heads): repeatedly
/// attempt with an incrementing 1-based sequence number until a
/// name-mismatch or depleted input terminates the array.
pub fn decode_array<T>(
    cursor: &mut Cursor,
    required: bool,
    letter: char,
    mut try_decode: impl FnMut(&str, u32) -> Result<Option<T>, Error>,
) -> Result<Vec<T>, Error> {
    let mut out = Vec::new();
    let mut seq = 1u32;
    loop {
        let Some(line) = cursor.peek() else { break };
        match try_decode(line, seq)? {
            Some(value) => {
                cursor.advance();
                out.push(value);
                seq += 1;
            }
            None => break,
        }
    }
    if required && out.is_empty() {
        return Err(Error::RequiredRecordMissing(letter));
    }
    Ok(out)
}

/// A container node in the message tree: a composite (groups further
/// annotated children, emits no line of its own) or the whole message
/// type. `astm-derive`'s `#[derive(Structure)]` implements this by
/// walking the struct's fields in declaration order, dispatching each
/// one to `decode_scalar`/`decode_array` (for record/record-array
/// fields, via `fragment::decode_record`) or recursing into nested
/// `Structure` impls (for composite fields), per spec §4.E.
pub trait Structure: Sized {
    /// The record-type letter a line must start with to possibly belong to
    /// this node: its first field's letter, or (if the first field is
    /// itself a composite) that field's own `leading_letter`. `None` means
    /// no single-line check is possible and a decode attempt must be made
    /// to find out (spec §4.E "Array of records" mismatch detection).
    fn leading_letter() -> Option<char>;

    fn encode_into(
        &self,
        seq: u32,
        delimiters: &Delimiters,
        cfg: &Config,
        depth: &mut Depth,
        out: &mut Vec<String>,
    ) -> Result<(), Error>;

    fn decode_from(
        cursor: &mut Cursor,
        seq: u32,
        delimiters: &mut Delimiters,
        cfg: &Config,
        depth: &mut Depth,
    ) -> Result<Self, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_rejects_overflow() {
        let mut d = Depth::new(1);
        d.enter().unwrap();
        assert_eq!(d.enter().unwrap_err(), Error::MaxDepthReached);
    }

    #[test]
    fn sibling_sequence_only_first_inherits() {
        assert_eq!(sibling_sequence(0, 7), 7);
        assert_eq!(sibling_sequence(1, 7), 1);
        assert_eq!(sibling_sequence(2, 7), 1);
    }

    #[test]
    fn decode_scalar_matches_and_advances() {
        let lines = vec!["F|1".to_string(), "L|1".to_string()];
        let mut c = Cursor::new(&lines);
        let value = decode_scalar(&mut c, 'F', true, |line| {
            if line.starts_with('F') {
                Ok(Some(line.to_string()))
            } else {
                Ok(None)
            }
        })
        .unwrap();
        assert_eq!(value, Some("F|1".to_string()));
        assert_eq!(c.peek(), Some("L|1"));
    }

    #[test]
    fn decode_scalar_optional_mismatch_does_not_advance() {
        let lines = vec!["L|1".to_string()];
        let mut c = Cursor::new(&lines);
        let value: Option<String> = decode_scalar(&mut c, 'F', false, |line| {
            if line.starts_with('F') {
                Ok(Some(line.to_string()))
            } else {
                Ok(None)
            }
        })
        .unwrap();
        assert_eq!(value, None);
        assert_eq!(c.peek(), Some("L|1"));
    }

    #[test]
    fn decode_scalar_required_mismatch_fails() {
        let lines = vec!["L|1".to_string()];
        let mut c = Cursor::new(&lines);
        let err = decode_scalar(&mut c, 'F', true, |line| {
            if line.starts_with('F') {
                Ok(Some(line.to_string()))
            } else {
                Ok(None)
            }
        })
        .unwrap_err();
        assert_eq!(err, Error::RequiredRecordMissing('F'));
    }

    #[test]
    fn decode_array_collects_until_mismatch() {
        let lines = vec!["R|1".to_string(), "R|2".to_string(), "L|1".to_string()];
        let mut c = Cursor::new(&lines);
        let values = decode_array(&mut c, false, 'R', |line, seq| {
            if line.starts_with('R') && line == format!("R|{seq}") {
                Ok(Some(line.to_string()))
            } else {
                Ok(None)
            }
        })
        .unwrap();
        assert_eq!(values, vec!["R|1".to_string(), "R|2".to_string()]);
        assert_eq!(c.peek(), Some("L|1"));
    }

    #[test]
    fn decode_array_required_empty_fails() {
        let lines = vec!["L|1".to_string()];
        let mut c = Cursor::new(&lines);
        let err = decode_array::<String>(&mut c, true, 'R', |_, _| Ok(None)).unwrap_err();
        assert_eq!(err, Error::RequiredRecordMissing('R'));
    }
}
