//! Component C: splitting a decoded text buffer into trimmed, non-empty
//! lines under mixed CR/LF conventions, and joining lines back for encode
//! (spec §4.C).

use astm_schema::Error;

use crate::config::LineSeparator;

/// Split `text` into lines, per spec §4.C.
///
/// When `separator` is `Some`, the split is literal. When `None` and
/// `auto_detect` is true, the CR/LF counting rules apply. `auto_detect =
/// false` with no separator is treated as LF, matching the default.
pub fn split_lines(text: &str, separator: Option<&str>, auto_detect: bool) -> Result<Vec<String>, Error> {
    if text.is_empty() {
        return Err(Error::EmptyInput);
    }

    if let Some(sep) = separator {
        return Ok(finish_lines(text.split(sep)));
    }

    if !auto_detect {
        return Ok(finish_lines(text.split('\n')));
    }

    let lf = text.matches('\n').count();
    let cr = text.matches('\r').count();
    let normalized = match (lf, cr) {
        (0, 0) => return Err(Error::InvalidLineBreak),
        (a, b) if a != b => return Err(Error::InvalidLineBreak),
        (0, _) => text.replace('\r', "\n"),
        _ => text.replace('\r', ""),
    };
    Ok(finish_lines(normalized.split('\n')))
}

fn finish_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .map(|l| l.trim_matches(' ').to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Join `lines` with `separator` for encode output, with no trailing
/// separator.
pub fn join_lines(lines: &[String], separator: &LineSeparator) -> String {
    lines.join(separator.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_fails() {
        assert_eq!(split_lines("", None, true).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn no_breaks_fails() {
        assert_eq!(split_lines("HELLO", None, true).unwrap_err(), Error::InvalidLineBreak);
    }

    #[test]
    fn mismatched_counts_fail() {
        let text = "a\nb\rc\n";
        assert_eq!(split_lines(text, None, true).unwrap_err(), Error::InvalidLineBreak);
    }

    #[test]
    fn lf_only_splits_on_lf() {
        let lines = split_lines("H|1\nL|1\n", None, true).unwrap();
        assert_eq!(lines, vec!["H|1", "L|1"]);
    }

    #[test]
    fn cr_only_translates_to_lf() {
        let lines = split_lines("H|1\rL|1\r", None, true).unwrap();
        assert_eq!(lines, vec!["H|1", "L|1"]);
    }

    #[test]
    fn crlf_pairs_are_stripped() {
        let lines = split_lines("H|1\r\nL|1\r\n", None, true).unwrap();
        assert_eq!(lines, vec!["H|1", "L|1"]);
    }

    #[test]
    fn drops_empty_lines_and_trims_spaces() {
        let lines = split_lines("H|1\n\n  L|1  \n", None, true).unwrap();
        assert_eq!(lines, vec!["H|1", "L|1"]);
    }

    #[test]
    fn join_uses_configured_separator_with_no_trailer() {
        let lines = vec!["H|1".to_string(), "L|1".to_string()];
        assert_eq!(join_lines(&lines, &LineSeparator::Lf), "H|1\nL|1");
    }
}
