//! Record mapping
//!
//! Turns one input [`Row`](crate::domain::Row) into the ordered records
//! uploaded for it: the Patient first, then one Observation per catalog
//! entry in catalog order.

pub mod mapper;

pub use mapper::RecordMapper;
