use alloc::collections::TryReserveError;
use alloc::string::FromUtf8Error;
use thiserror::Error;

/// Everything that makes a printf template unrenderable.
///
/// In C most of these are undefined behaviour or a negative return from
/// `vsnprintf`; here they are reported instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing argument {index} for %{conversion}")]
    MissingArgument { index: usize, conversion: char },

    #[error("argument {index} is {found}, which %{conversion} can not print")]
    ArgumentMismatch {
        index: usize,
        conversion: char,
        found: &'static str,
    },

    #[error("unknown conversion %{conversion} at byte {offset}")]
    UnknownConversion { conversion: char, offset: usize },

    #[error("conversion %{conversion} at byte {offset} is not supported")]
    UnsupportedConversion { conversion: char, offset: usize },

    #[error("directive at byte {offset} ends before its conversion")]
    IncompleteDirective { offset: usize },

    #[error("formatted output would exceed {} bytes", crate::printf::MAX_OUTPUT_LEN)]
    Overflow,

    #[error("could not allocate the output buffer: {0}")]
    Alloc(#[from] TryReserveError),

    #[error("formatted output is not valid utf-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("could not allocate a pool buffer: {0}")]
    Alloc(#[from] TryReserveError),
}
