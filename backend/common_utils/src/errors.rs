//! Errors and error-handling aliases shared across crates

/// The shared result type, carrying an [`error_stack::Report`].
pub type CustomResult<T, E> = error_stack::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    #[error("Failed to serialize to {0} format")]
    EncodeError(&'static str),
    #[error("Could not convert i64 to decimal")]
    I64ToDecimalConversionFailure,
    #[error("Could not convert decimal to i64")]
    DecimalToI64ConversionFailure,
    #[error("Could not convert string to decimal: {error}")]
    StringToDecimalConversionFailure { error: String },
}

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Failed to generate message digest")]
    DigestGenerationFailed,
}
