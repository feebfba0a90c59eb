//! Fluent request builders
//!
//! Each builder accumulates configuration through chainable methods and
//! validates the whole request in one pass at `build()` time; `execute()`
//! is `build()` plus the network call plus enrichment. No I/O happens until
//! `execute()` is invoked, and a builder can execute any number of times -
//! every call reissues the request from its own payload snapshot.

pub mod access_list;
pub mod simulate;
pub mod trace;

pub use access_list::AccessListBuilder;
pub use simulate::SimulationBuilder;
pub use trace::{
    TraceBuilder, TraceCallBuilder, TraceCallManyBuilder, TraceTransactionBuilder,
};
