//! Property-based tests for the output contract

mod exit_codes;
mod projection;
