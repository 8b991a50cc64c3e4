use astm_schema::Delimiters;

/// The wire character set (spec §4.B, §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Ascii,
    Windows1250,
    Windows1251,
    Windows1252,
    Dos852,
    Dos855,
    Dos866,
    Iso8859_1,
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::Iso8859_1
    }
}

/// The line-ending convention used on encode, or enforced on decode when
/// auto-detection is disabled (spec §4.C, §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSeparator {
    Lf,
    Cr,
    CrLf,
    LfCr,
    Custom(String),
}

impl Default for LineSeparator {
    fn default() -> Self {
        LineSeparator::Lf
    }
}

impl LineSeparator {
    pub fn as_str(&self) -> &str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::Cr => "\r",
            LineSeparator::CrLf => "\r\n",
            LineSeparator::LfCr => "\n\r",
            LineSeparator::Custom(s) => s,
        }
    }
}

/// Whether trailing empty fields are stripped from an encoded line
/// (spec §4.D step 3, Glossary "Standard / short notation").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notation {
    Standard,
    Short,
}

impl Default for Notation {
    fn default() -> Self {
        Notation::Standard
    }
}

/// How a `length:N` float attribute rounds (spec §4.D step 4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundingPolicy {
    Round,
    Truncate,
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        RoundingPolicy::Round
    }
}

/// Every knob the codec reads, matching spec §6 "Configuration
/// (enumerated)" field for field.
#[derive(Debug, Clone)]
pub struct Config {
    pub encoding: Encoding,
    pub line_separator: LineSeparator,
    pub auto_detect_line_separator: bool,
    pub time_zone: chrono_tz::Tz,
    pub enforce_sequence_number_check: bool,
    pub notation: Notation,
    pub round_fixed_numbers: bool,
    pub default_decimal_precision: u32,
    pub delimiters: Delimiters,
    pub max_depth: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            encoding: Encoding::default(),
            line_separator: LineSeparator::default(),
            auto_detect_line_separator: true,
            time_zone: chrono_tz::Europe::Berlin,
            enforce_sequence_number_check: true,
            notation: Notation::default(),
            round_fixed_numbers: true,
            default_decimal_precision: 3,
            delimiters: Delimiters::DEFAULT,
            max_depth: astm_schema::MAX_DEPTH,
        }
    }
}
