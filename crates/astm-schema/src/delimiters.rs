/// The four delimiter bytes declared in the second field of every header
/// line (field, repeat, component, escape), per spec §3 "Line".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub field: u8,
    pub repeat: u8,
    pub component: u8,
    pub escape: u8,
}

impl Delimiters {
    /// The default delimiter set (`|`, `\`, `^`, `&`), used until a header
    /// line overrides it on decode, or as encode configuration.
    pub const DEFAULT: Delimiters = Delimiters {
        field: b'|',
        repeat: b'\\',
        component: b'^',
        escape: b'&',
    };

    /// Build the three non-field delimiter bytes as they appear in field 2
    /// of the header line (`\^&` under defaults).
    pub fn header_field2(&self) -> String {
        let bytes = [self.repeat, self.component, self.escape];
        bytes.iter().map(|&b| b as char).collect()
    }

    /// Parse the delimiters declared positionally at bytes 1..=4 of a
    /// header line (`H|\^&...`).
    pub fn from_header_bytes(line: &[u8]) -> Option<Delimiters> {
        if line.len() < 5 {
            return None;
        }
        Some(Delimiters {
            field: line[1],
            repeat: line[2],
            component: line[3],
            escape: line[4],
        })
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Delimiters::DEFAULT
    }
}
