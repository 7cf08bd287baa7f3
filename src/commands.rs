//! Commands: thin glue between parsed arguments, the upstream client and the
//! result envelope. Each command validates its input locally first, then
//! talks to exactly one upstream service.

pub mod reviews;
pub mod vitals;

use crate::error::ApiError;

pub use reviews::{ReviewsGet, ReviewsList};
pub use vitals::{MetricSet, VitalsQuery};

/// Reject package names that cannot be valid Android application IDs.
pub fn validate_package(package: &str) -> Result<(), ApiError> {
    let package = package.trim();
    if package.is_empty() {
        return Err(ApiError::Validation("--package is required".to_string()));
    }
    let valid_chars = package
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    let valid_segments = package.split('.').count() >= 2
        && package.split('.').all(|segment| {
            segment
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
        });
    if !valid_chars || !valid_segments {
        return Err(ApiError::Validation(format!(
            "'{}' is not a valid package name (expected e.g. com.example.app)",
            package
        )));
    }
    Ok(())
}
