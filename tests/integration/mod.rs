//! Integration tests for the gplay client

mod config_layering;
mod envelope_contract;
mod reviews_pagination;
mod test_utils;
