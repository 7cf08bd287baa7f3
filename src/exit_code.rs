//! Process exit codes. Scripts branch on these without parsing output.

use crate::error::{ClassifiedError, ErrorCode};

impl ErrorCode {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorCode::Success => 0,
            ErrorCode::GeneralError => 1,
            ErrorCode::AuthFailure => 2,
            ErrorCode::PermissionDenied => 3,
            ErrorCode::ValidationError => 4,
            ErrorCode::RateLimited => 5,
            ErrorCode::NetworkError => 6,
            ErrorCode::NotFound => 7,
            ErrorCode::Conflict => 8,
        }
    }
}

/// Exit code for a wire-format code name. Names outside the taxonomy map to
/// the general error code.
pub fn exit_code_for(code: &str) -> i32 {
    ErrorCode::parse(code)
        .unwrap_or(ErrorCode::GeneralError)
        .exit_code()
}

/// Exit code for an envelope's error slot.
pub fn exit_code_of(error: Option<&ClassifiedError>) -> i32 {
    error
        .map(ClassifiedError::code)
        .unwrap_or(ErrorCode::Success)
        .exit_code()
}
