pub mod aggregate;
pub mod assemble;
pub mod catalog;
pub mod columns;
pub mod config;
pub mod error;
pub mod filter;
pub mod io;
pub mod model;
pub mod numeric;
pub mod pipeline;

pub use error::{ReportError, Result};
