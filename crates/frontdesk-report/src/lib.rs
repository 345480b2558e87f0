//! frontdesk-report
//!
//! The report projection engine and the live aggregations built on the same
//! subscription driver (dashboard metrics, TV queue board).

pub mod board;
pub mod dashboard;
pub mod engine;
pub mod error;
mod join;
pub mod live;
pub mod projection;
pub mod request;
pub mod row;
pub mod window;
