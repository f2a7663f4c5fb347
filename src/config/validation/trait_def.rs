//! Validation trait definition

/// Validation trait for configuration structures
///
/// Errors are plain messages; callers wrap them into `GatewayError::Config`
/// with the name of the section that failed.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
