//! Core data types for the lending marketplace

pub mod ids;
pub mod loan;
pub mod participant;
pub mod request;
