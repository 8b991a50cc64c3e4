//! The composite message tree: groups the leaf records from
//! [`crate::records`] into the shape a real LIS2-A2 conversation takes
//! (spec §4.E "Structure").

use astm_derive::Structure;

use crate::records::{Comment, Header, Order, Patient, Query, ObservationResult, Terminator};

/// One order and the results (and any comments) reported against it.
#[derive(Debug, Clone, Default, Structure)]
pub struct OrderGroup {
    #[astm("O,required")]
    pub order: Order,
    #[astm("R")]
    pub results: Vec<ObservationResult>,
    #[astm("C")]
    pub comments: Vec<Comment>,
}

/// One patient and every order placed for them.
#[derive(Debug, Clone, Default, Structure)]
pub struct PatientGroup {
    #[astm("P,required")]
    pub patient: Patient,
    #[astm("C")]
    pub comments: Vec<Comment>,
    pub orders: Vec<OrderGroup>,
}

/// A full conversation: one header, any number of patients (each with
/// their orders and results), an optional query, and one terminator.
#[derive(Debug, Clone, Default, Structure)]
pub struct Message {
    #[astm("H,required")]
    pub header: Header,
    pub patients: Vec<PatientGroup>,
    #[astm("Q")]
    pub queries: Vec<Query>,
    #[astm("L,required")]
    pub terminator: Terminator,
}
