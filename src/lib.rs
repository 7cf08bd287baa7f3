//! gplay: Google Play Console Client
//!
//! Every command produces one result envelope (`data`, `error`, `meta`), an
//! optional field projection and a rendering in JSON, table, markdown or CSV,
//! plus a process exit code drawn from a closed error taxonomy.

pub mod classify;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod envelope;
pub mod error;
pub mod exit_code;
pub mod logging;
pub mod pagination;
pub mod projection;
pub mod render;
