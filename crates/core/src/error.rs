use thiserror::Error;

/// Errors raised while validating core domain values.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}
