//! Host-side extraction from fetched result pages.
//!
//! Transports only hand back HTML; every bit of interpretation happens
//! here on a parsed document.

pub mod result_table;

pub use result_table::{parse_result_page, ParsedResult, RESULT_CONTAINER_SELECTOR};
