use core::fmt;

/// Every failure mode the codec can produce.
///
/// `LineTypeMismatch` from the design notes is deliberately absent here: it
/// is control flow internal to the structure codec, surfaced as a bool
/// rather than an error (see `astm_codec::line::LineOutcome`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Input framing
    EmptyInput,
    InvalidLineBreak,
    HeaderTooShort,

    // Annotation
    MissingAnnotation,
    InvalidAnnotationSyntax(String),
    InvalidAttribute(String),
    IllegalComponentArray,
    IllegalComponentSubstructure,
    InvalidTargetType(String),

    // Line parsing
    MandatoryFieldsMissing,
    SequenceMismatch { expected: u32, found: String },
    RequiredFieldMissing { field: u32, component: Option<u32> },
    InputComponentsMissing { field: u32, component: u32 },
    ReservedFieldPosition(u32),
    UnsupportedType(String),
    DataParsingError(String),
    InvalidDateFormat(String),

    // Structure parsing
    MaxDepthReached,
    InputLinesDepleted,
    RequiredRecordMissing(char),

    // Encoding
    UnsupportedEncoding(String),
    TranscodeFailure(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input"),
            Error::InvalidLineBreak => write!(f, "invalid or ambiguous line break convention"),
            Error::HeaderTooShort => write!(f, "header line too short to carry delimiters"),

            Error::MissingAnnotation => write!(f, "astm annotation missing"),
            Error::InvalidAnnotationSyntax(s) => write!(f, "invalid astm annotation: {s}"),
            Error::InvalidAttribute(s) => write!(f, "invalid astm attribute: {s}"),
            Error::IllegalComponentArray => {
                write!(f, "a component address cannot be combined with an array field")
            }
            Error::IllegalComponentSubstructure => write!(
                f,
                "a component address cannot be combined with a substructure field"
            ),
            Error::InvalidTargetType(s) => write!(f, "unsupported target type: {s}"),

            Error::MandatoryFieldsMissing => write!(f, "fewer than two fields in line"),
            Error::SequenceMismatch { expected, found } => {
                write!(f, "sequence number mismatch: expected {expected}, found {found}")
            }
            Error::RequiredFieldMissing { field, component: None } => {
                write!(f, "required field {field} missing")
            }
            Error::RequiredFieldMissing { field, component: Some(c) } => {
                write!(f, "required field {field}.{c} missing")
            }
            Error::InputComponentsMissing { field, component } => write!(
                f,
                "field {field} has fewer than {component} components"
            ),
            Error::ReservedFieldPosition(p) => {
                write!(f, "field position {p} is reserved for record type / sequence number")
            }
            Error::UnsupportedType(s) => write!(f, "unsupported leaf type: {s}"),
            Error::DataParsingError(s) => write!(f, "could not parse field value: {s}"),
            Error::InvalidDateFormat(s) => write!(f, "invalid date/time format: {s}"),

            Error::MaxDepthReached => write!(f, "maximum structure depth reached"),
            Error::InputLinesDepleted => write!(f, "input lines depleted before structure was satisfied"),
            Error::RequiredRecordMissing(letter) => {
                write!(f, "required record type {letter} missing or out of sequence")
            }

            Error::UnsupportedEncoding(s) => write!(f, "unsupported encoding: {s}"),
            Error::TranscodeFailure(s) => write!(f, "transcoding failure: {s}"),
        }
    }
}

impl std::error::Error for Error {}
