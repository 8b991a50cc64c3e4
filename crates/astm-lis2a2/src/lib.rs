//! A concrete LIS2-A2 schema built on `astm-codec` and `astm-derive`:
//! the record types instruments actually exchange, wired into a message
//! tree that `astm_codec::encode`/`astm_codec::decode` can drive.

pub mod message;
pub mod records;

pub use message::{Message, OrderGroup, PatientGroup};
pub use records::{Comment, Header, Manufacturer, Order, PersonName, Patient, Query, ObservationResult, Sex, Terminator};
