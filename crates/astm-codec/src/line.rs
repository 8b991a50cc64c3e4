//! Component D: mapping one record value to one delimited line and back
//! (spec §4.D).
//!
//! This module holds the runtime half of the codec; `astm-derive` emits
//! `encode_fields`/`decode_fields` methods per record struct that call
//! into the helpers here. The same generated method serves both a
//! top-level line (split by the field delimiter) and a substructure
//! (split by the component delimiter) because both contexts hand this
//! module a plain token slice plus the delimiter that separates sibling
//! tokens within it.

use std::collections::BTreeMap;

use astm_schema::{Delimiters, Error};

use crate::config::{Notation, RoundingPolicy};

/// The tokens of one line, already split by the field delimiter, with
/// the record-type letter and sequence number peeled off.
pub struct DecodedLine<'a> {
    pub name_matched: bool,
    pub fields: Vec<&'a str>,
}

/// Split `line` on the field delimiter, check the record-type letter and
/// (optionally) the sequence number, and adopt header delimiters in
/// place when `letter == b'H'`.
pub fn decode_line<'a>(
    line: &'a str,
    letter: u8,
    expected_sequence: u32,
    delimiters: &mut Delimiters,
    enforce_sequence: bool,
) -> Result<DecodedLine<'a>, Error> {
    if line.is_empty() {
        return Err(Error::EmptyInput);
    }

    let bytes = line.as_bytes();
    if bytes[0] == b'H' {
        let adopted = Delimiters::from_header_bytes(bytes).ok_or(Error::HeaderTooShort)?;
        *delimiters = adopted;
    }

    let field_delim = delimiters.field as char;
    let fields: Vec<&str> = line.split(field_delim).collect();
    if fields.len() < 2 {
        return Err(Error::MandatoryFieldsMissing);
    }

    let name_matched = fields[0].as_bytes().first() == Some(&letter);
    if !name_matched {
        return Ok(DecodedLine { name_matched, fields });
    }

    if enforce_sequence && letter != b'H' {
        let found = fields[1];
        if found != expected_sequence.to_string() {
            return Err(Error::SequenceMismatch {
                expected: expected_sequence,
                found: found.to_string(),
            });
        }
    }

    Ok(DecodedLine { name_matched, fields })
}

/// Split a substructure token by the component delimiter; it plays the
/// role of a nested "line" whose field delimiter is the component
/// delimiter of the enclosing line.
pub fn split_substructure<'a>(token: &'a str, delimiters: &Delimiters) -> Vec<&'a str> {
    token.split(delimiters.component as char).collect()
}

/// Split an array field by the repeat delimiter.
pub fn split_array<'a>(token: &'a str, delimiters: &Delimiters) -> Vec<&'a str> {
    if token.is_empty() {
        return Vec::new();
    }
    token.split(delimiters.repeat as char).collect()
}

/// Fetch field `position` (1-based within the current token slice) or
/// `""` when the line is shorter than that position.
pub fn field_at<'a>(fields: &[&'a str], position: u32) -> &'a str {
    fields
        .get(position as usize - 1)
        .copied()
        .unwrap_or("")
}

/// Fetch component `position` out of a token already split by the
/// component delimiter.
pub fn component_at<'a>(components: &[&'a str], position: u32) -> &'a str {
    field_at(components, position)
}

/// Builds the sparse field map for one line and flattens it, mirroring
/// `BuildLine`/`constructResult` (spec §4.D steps 1, 3).
pub struct LineBuilder {
    fields: BTreeMap<u32, String>,
}

impl LineBuilder {
    pub fn new(letter: char, second_field: String) -> LineBuilder {
        let mut fields = BTreeMap::new();
        fields.insert(1, letter.to_string());
        fields.insert(2, second_field);
        LineBuilder { fields }
    }

    pub fn set_field(&mut self, position: u32, value: String) {
        self.fields.insert(position, value);
    }

    /// Merge a field map already produced by `Fragment::encode_fields`.
    pub fn extend(&mut self, fields: BTreeMap<u32, String>) {
        self.fields.extend(fields);
    }

    /// Set a component-addressed field: gathers into the same component
    /// map as sibling components sharing `position`, keyed by `component`.
    pub fn set_component(&mut self, position: u32, component: u32, value: String, delimiters: &Delimiters) {
        let mut components: BTreeMap<u32, String> = self
            .fields
            .get(&position)
            .map(|existing| decode_component_map(existing, delimiters))
            .unwrap_or_default();
        components.insert(component, value);
        self.fields.insert(position, encode_component_map(&components, delimiters));
    }

    pub fn finish(self, delimiters: &Delimiters, notation: Notation) -> String {
        let field_delim = delimiters.field as char;
        let max_key = self.fields.keys().last().copied().unwrap_or(1);
        match notation {
            Notation::Standard => (1..=max_key)
                .map(|k| self.fields.get(&k).cloned().unwrap_or_default())
                .collect::<Vec<_>>()
                .join(&field_delim.to_string()),
            Notation::Short => {
                let last_nonempty = self
                    .fields
                    .iter()
                    .filter(|(_, v)| !v.is_empty())
                    .map(|(k, _)| *k)
                    .max()
                    .unwrap_or(1);
                (1..=last_nonempty)
                    .map(|k| self.fields.get(&k).cloned().unwrap_or_default())
                    .collect::<Vec<_>>()
                    .join(&field_delim.to_string())
            }
        }
    }
}

/// Join a sparse component map, always in standard sub-notation (trailing
/// empty components are preserved regardless of the outer line's
/// notation, per spec §4.D step 3 and §9 open questions).
pub fn encode_component_map(components: &BTreeMap<u32, String>, delimiters: &Delimiters) -> String {
    let max_key = components.keys().last().copied().unwrap_or(0);
    let delim = (delimiters.component as char).to_string();
    (1..=max_key)
        .map(|k| components.get(&k).cloned().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(&delim)
}

fn decode_component_map(existing: &str, delimiters: &Delimiters) -> BTreeMap<u32, String> {
    existing
        .split(delimiters.component as char)
        .enumerate()
        .map(|(i, v)| (i as u32 + 1, v.to_string()))
        .collect()
}

/// Render a float per spec §4.D step 4: `length:N` controls precision and
/// rounding policy; absent `length` uses natural precision.
pub fn format_float(value: f64, length: Option<u32>, policy: RoundingPolicy) -> String {
    match length {
        None => {
            let mut s = format!("{value}");
            if s.ends_with(".0") {
                s.truncate(s.len() - 2);
            }
            s
        }
        Some(n) => match policy {
            RoundingPolicy::Round => format!("{value:.*}", n as usize),
            RoundingPolicy::Truncate => {
                let factor = 10f64.powi(n as i32);
                let truncated = (value * factor).trunc() / factor;
                format!("{truncated:.*}", n as usize)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_line_splits_and_matches_name() {
        let mut delims = Delimiters::DEFAULT;
        let decoded = decode_line("P|1||1010868845", b'P', 1, &mut delims, true).unwrap();
        assert!(decoded.name_matched);
        assert_eq!(decoded.fields[0], "P");
    }

    #[test]
    fn decode_line_adopts_header_delimiters() {
        let mut delims = Delimiters::DEFAULT;
        let decoded = decode_line("H|\\#&|||sender", b'H', 1, &mut delims, true).unwrap();
        assert!(decoded.name_matched);
        assert_eq!(delims.component, b'#');
    }

    #[test]
    fn decode_line_reports_mismatch_without_error() {
        let mut delims = Delimiters::DEFAULT;
        let decoded = decode_line("L|1", b'P', 1, &mut delims, true).unwrap();
        assert!(!decoded.name_matched);
    }

    #[test]
    fn decode_line_rejects_too_few_fields() {
        let mut delims = Delimiters::DEFAULT;
        let err = decode_line("P", b'P', 1, &mut delims, true).unwrap_err();
        assert_eq!(err, Error::MandatoryFieldsMissing);
    }

    #[test]
    fn decode_line_enforces_sequence() {
        let mut delims = Delimiters::DEFAULT;
        let err = decode_line("P|2", b'P', 1, &mut delims, true).unwrap_err();
        assert!(matches!(err, Error::SequenceMismatch { .. }));
    }

    #[test]
    fn line_builder_standard_notation_keeps_trailing_empties() {
        let mut b = LineBuilder::new('P', "1".to_string());
        b.set_field(3, "x".to_string());
        let line = b.finish(&Delimiters::DEFAULT, Notation::Standard);
        assert_eq!(line, "P|1|x");
    }

    #[test]
    fn line_builder_short_notation_trims_trailing_empty_fields() {
        let mut b = LineBuilder::new('M', "1".to_string());
        b.set_field(3, "REAGENT".to_string());
        b.set_field(4, "DILUENT\\LYSE".to_string());
        b.set_field(5, String::new());
        let line = b.finish(&Delimiters::DEFAULT, Notation::Short);
        assert_eq!(line, "M|1|REAGENT|DILUENT\\LYSE");
    }

    #[test]
    fn component_map_preserves_trailing_empty_components() {
        let mut map = BTreeMap::new();
        map.insert(1, "DILUENT".to_string());
        map.insert(2, String::new());
        let joined = encode_component_map(&map, &Delimiters::DEFAULT);
        assert_eq!(joined, "DILUENT^");
    }

    #[test]
    fn format_float_with_length_rounds() {
        assert_eq!(format_float(0.34567, Some(4), RoundingPolicy::Round), "0.3457");
    }

    #[test]
    fn format_float_with_length_truncates() {
        assert_eq!(format_float(0.34567, Some(4), RoundingPolicy::Truncate), "0.3456");
    }
}
