//! Library components of the `tabex` command line tool.

pub mod config;
pub mod logging;
pub mod pipeline;
