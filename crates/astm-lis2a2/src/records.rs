//! Concrete LIS2-A2 record definitions: the leaf types most instruments
//! exchange, built on top of `astm-codec`'s runtime and `astm-derive`'s
//! compile-time field dispatch.

use chrono::{DateTime, Utc};

use astm_codec::fragment::Record;
use astm_derive::Fragment;
use astm_schema::{wire_scalar_enum, Error};

/// Administrative sex, a string-convertible leaf (spec §4.D step 2: "scalar
/// coercion preserves string-convertible user enum types") rather than a
/// free-form string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

wire_scalar_enum!(
    Sex,
    decode: |token: &str| match token {
        "M" => Ok(Sex::Male),
        "F" => Ok(Sex::Female),
        "U" => Ok(Sex::Unknown),
        _ => Err(Error::DataParsingError(token.to_string())),
    },
    encode: |value: &Sex| match value {
        Sex::Male => "M".to_string(),
        Sex::Female => "F".to_string(),
        Sex::Unknown => "U".to_string(),
    }
);

/// The componented name field carried by `Patient` and `Order` records:
/// `last^first^middle` under standard notation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Fragment)]
pub struct PersonName {
    #[astm("1")]
    pub last: Option<String>,
    #[astm("2")]
    pub first: Option<String>,
    #[astm("3")]
    pub middle: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Header {
    #[astm("5")]
    pub sender: Option<String>,
    #[astm("6")]
    pub address: Option<String>,
    #[astm("14,longdate")]
    pub date_time: Option<DateTime<Utc>>,
}

impl Record for Header {
    const LETTER: char = 'H';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Patient {
    #[astm("4")]
    pub practice_patient_id: Option<String>,
    #[astm("6")]
    pub name: PersonName,
    #[astm("8,longdate")]
    pub birth_date: Option<DateTime<Utc>>,
    #[astm("9,scalar")]
    pub sex: Option<Sex>,
}

impl Record for Patient {
    const LETTER: char = 'P';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Order {
    #[astm("3")]
    pub specimen_id: Option<String>,
    #[astm("5")]
    pub universal_test_id: Option<String>,
    #[astm("7,longdate")]
    pub requested_date_time: Option<DateTime<Utc>>,
    #[astm("16")]
    pub specimen_descriptor: Option<String>,
}

impl Record for Order {
    const LETTER: char = 'O';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct ObservationResult {
    #[astm("3")]
    pub universal_test_id: Option<String>,
    #[astm("4")]
    pub value: Option<String>,
    #[astm("5")]
    pub units: Option<String>,
    #[astm("7")]
    pub result_status: Option<String>,
    #[astm("13,longdate")]
    pub date_time: Option<DateTime<Utc>>,
}

impl Record for ObservationResult {
    const LETTER: char = 'R';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Comment {
    #[astm("4")]
    pub text: Option<String>,
}

impl Record for Comment {
    const LETTER: char = 'C';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Query {
    #[astm("4")]
    pub starting_range: Option<String>,
}

impl Record for Query {
    const LETTER: char = 'Q';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Manufacturer {
    #[astm("3")]
    pub reagent: Option<String>,
    #[astm("4")]
    pub diluents: Vec<String>,
}

impl Record for Manufacturer {
    const LETTER: char = 'M';
}

#[derive(Debug, Clone, Default, PartialEq, Fragment)]
pub struct Terminator {
    #[astm("3")]
    pub termination_code: Option<String>,
}

impl Record for Terminator {
    const LETTER: char = 'L';
}
