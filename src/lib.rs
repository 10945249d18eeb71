//! Core library for the qwtt-report command line application.
//!
//! The library turns four marketplace exports (inventory, business report,
//! product master, and the QWTT fulfillment order export) into two finished
//! reports. Column detection lives in [`qwtt::report::columns`], cell cleaning
//! in [`qwtt::report::numeric`], order filtering in [`qwtt::report::filter`],
//! grouping in [`qwtt::report::aggregate`], the joins in
//! [`qwtt::report::assemble`], and the orchestration plus result cache in
//! [`qwtt::report::pipeline`]. File adapters sit under [`qwtt::report::io`].

pub mod qwtt;

pub use qwtt::report::{
    Result, ReportError, aggregate, assemble, catalog, columns, config, error, filter, io, model,
    numeric, pipeline,
};
