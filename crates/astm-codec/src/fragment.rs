//! The trait surface `astm-derive` generates impls against.
//!
//! `Fragment` covers anything whose annotated fields project onto a
//! sparse, position-keyed token map: a top-level record line, or a
//! substructure nested inside one field of such a line. The same
//! generated `encode_fields`/`decode_fields` pair serves both contexts;
//! the caller supplies the delimiter that separates sibling tokens
//! (field delimiter for a line, component delimiter for a substructure).
//!
//! `Record` is `Fragment` plus the record-type letter, for types that
//! additionally occupy a whole line of their own.

use std::collections::BTreeMap;

use astm_schema::{Delimiters, Error};

use crate::config::Config;
use crate::line::{decode_line, LineBuilder};

pub trait Fragment: Sized {
    /// Render this value's own annotated fields into a sparse map keyed
    /// by field (or component) position. `seq` is the sequence number the
    /// enclosing line is stamped with, threaded through so a `sequence`
    /// attribute field can render it (spec §4.A).
    fn encode_fields(&self, seq: u32, cfg: &Config, delimiters: &Delimiters) -> BTreeMap<u32, String>;

    /// Parse this value's own annotated fields out of a token slice
    /// already split by the appropriate delimiter. `delimiters` is still
    /// needed here for any array/component/substructure sub-fields that
    /// must split their own token further.
    fn decode_fields(tokens: &[&str], cfg: &Config, delimiters: &Delimiters) -> Result<Self, Error>;
}

pub trait Record: Fragment {
    const LETTER: char;
}

/// Encode one top-level line for `T`, seeding the field map with the
/// record-type letter and sequence number (or header delimiter
/// declaration, for `H`).
///
/// Fails with `ReservedFieldPosition` if any of `T`'s own annotated fields
/// addresses position 1 or 2 (spec §4.D "Encode one line") — those
/// positions are reserved for the record letter and sequence number at
/// this, the top level of a line. A substructure's own fields reuse the
/// same 1/2 addresses for unrelated components and are unaffected, since
/// they're rendered through `Fragment::encode_fields` directly rather than
/// through this function.
pub fn encode_record<T: Record>(value: &T, seq: u32, delimiters: &Delimiters, cfg: &Config) -> Result<String, Error> {
    let second_field = if T::LETTER == 'H' {
        delimiters.header_field2()
    } else {
        seq.to_string()
    };
    let fields = value.encode_fields(seq, cfg, delimiters);
    if let Some(&reserved) = fields.keys().find(|&&position| position == 1 || position == 2) {
        return Err(Error::ReservedFieldPosition(reserved));
    }
    let mut builder = LineBuilder::new(T::LETTER, second_field);
    builder.extend(fields);
    Ok(builder.finish(delimiters, cfg.notation))
}

/// Decode one top-level line into `T`. Returns `Ok(None)` on a
/// record-type-letter mismatch (spec §4.D step 3); the caller treats that
/// as a structure-level control signal, not an error.
pub fn decode_record<T: Record>(
    line: &str,
    expected_seq: u32,
    delimiters: &mut Delimiters,
    cfg: &Config,
) -> Result<Option<T>, Error> {
    let decoded = decode_line(
        line,
        T::LETTER as u8,
        expected_seq,
        delimiters,
        cfg.enforce_sequence_number_check,
    )?;
    if !decoded.name_matched {
        return Ok(None);
    }
    Ok(Some(T::decode_fields(&decoded.fields, cfg, delimiters)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bad;

    impl Fragment for Bad {
        fn encode_fields(&self, _seq: u32, _cfg: &Config, _delimiters: &Delimiters) -> BTreeMap<u32, String> {
            let mut m = BTreeMap::new();
            m.insert(1, "oops".to_string());
            m
        }

        fn decode_fields(_tokens: &[&str], _cfg: &Config, _delimiters: &Delimiters) -> Result<Self, Error> {
            Ok(Bad)
        }
    }

    impl Record for Bad {
        const LETTER: char = 'X';
    }

    #[test]
    fn encode_record_rejects_field_addressed_at_reserved_position() {
        let err = encode_record(&Bad, 1, &Delimiters::DEFAULT, &Config::default()).unwrap_err();
        assert_eq!(err, Error::ReservedFieldPosition(1));
    }
}
