//! Audits the fallcent.com crawler: extracts listings from captured or live
//! pages, loads the server snapshot, and reports category counts, discount
//! distributions and how well the two product sets agree.

pub mod classify;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod product;
pub mod report;
pub mod snapshot;

pub use error::{AuditError, Result};
