//! Damage accumulation and the detachment pipeline.

pub mod contacts;
pub mod tearoff;

pub use contacts::ingest_contacts;
pub use tearoff::{process_tearoffs, tear_off, DetachmentReport, TearOff};
