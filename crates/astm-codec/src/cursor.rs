//! The decode cursor: an index into the shared line buffer, passed by
//! reference down the structure recursion (spec §9 "Cursor").
//!
//! Peek+commit is the shape used throughout: a node speculatively reads
//! the next line, and only advances the cursor once it knows the line
//! belongs to it. A composite array (spec §4.E "Array of records") tells
//! whether its next slot belongs to it by peeking the next line's leading
//! record letter against the composite's own leading letter
//! (`Structure::leading_letter`), so a single-line `peek()` is enough —
//! there is no need for multi-line speculative lookahead here.

pub struct Cursor<'a> {
    lines: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(lines: &'a [String]) -> Cursor<'a> {
        Cursor { lines, pos: 0 }
    }

    /// The next unconsumed line, or `None` if input is depleted.
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(|s| s.as_str())
    }

    pub fn advance(&mut self) {
        self.pos += 1;
    }

    /// Undo the last `advance`, used when a terminating name-mismatch must
    /// be visible to the enclosing scope (spec §4.E "Array of records").
    pub fn rewind(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn is_depleted(&self) -> bool {
        self.pos >= self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let c = Cursor::new(&lines);
        assert_eq!(c.peek(), Some("a"));
        assert_eq!(c.peek(), Some("a"));
    }

    #[test]
    fn advance_moves_forward() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let mut c = Cursor::new(&lines);
        c.advance();
        assert_eq!(c.peek(), Some("b"));
    }

    #[test]
    fn rewind_undoes_advance() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let mut c = Cursor::new(&lines);
        c.advance();
        c.rewind();
        assert_eq!(c.peek(), Some("a"));
    }

    #[test]
    fn depleted_after_last_line() {
        let lines = vec!["a".to_string()];
        let mut c = Cursor::new(&lines);
        c.advance();
        assert!(c.is_depleted());
        assert_eq!(c.peek(), None);
    }
}
