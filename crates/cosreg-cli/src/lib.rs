//! Library half of the cosreg CLI: logging setup and run orchestration.

pub mod logging;
pub mod pipeline;
