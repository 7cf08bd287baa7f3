//! Configuration sources, lowest precedence first: global file, environment.

pub mod env;
pub mod global_file;
