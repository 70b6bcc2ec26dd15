//! Error types for value inspection, comparison and duplication.
//!
//! # Structured Error Categories
//!
//! `MetaError` has one variant per concrete failure, each carrying the data
//! its message needs. Callers that only care about the broad class of a
//! failure match on [`MetaError::category`] instead of the variant, the same
//! way `std::io::Error` is matched through `ErrorKind`.

use std::fmt;

use thiserror::Error;

use crate::types::Kind;
use crate::value::Value;

/// Result of a fallible engine operation.
pub type MetaResult<T> = Result<T, MetaError>;

/// Broad class of a [`MetaError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An absent value was supplied where a typed value is required.
    UntypedNil,
    /// The value's kind cannot be deep-copied.
    NotDuplicatable,
    /// An operation received a value of the wrong shape or size.
    ShapeMismatch,
    /// Two compared elements differ.
    ElementMismatch,
    FieldNotFound,
    FieldNotWritable,
    FieldTypeMismatch,
}

/// Which operand of a binary operation an error refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("a"),
            Side::Right => f.write_str("b"),
        }
    }
}

/// Engine error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MetaError {
    #[error("untyped nil is unacceptable")]
    UntypedNil,

    #[error("kind {kind} is not duplicatable")]
    NotDuplicatable { kind: Kind },

    // Shape
    #[error("{side} is not array or slice, but {kind}")]
    NotSequence { side: Side, kind: Kind },
    #[error("a.len()={left} <=> b.len()={right}")]
    LengthMismatch { left: usize, right: usize },
    #[error("expected {expected}, got {got}")]
    UnexpectedKind { expected: Kind, got: Kind },
    #[error("cannot use value of type {got} as {expected}")]
    TypeMismatch { expected: String, got: String },
    #[error("{type_name} has {expected} fields, got {got}")]
    FieldCount {
        type_name: String,
        expected: usize,
        got: usize,
    },
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("unhashable map key type {type_name}")]
    UnhashableKey { type_name: String },
    #[error("nil {type_name} cannot be dereferenced")]
    NilDereference { type_name: String },
    #[error("cannot write into nil {type_name}")]
    NilWrite { type_name: String },

    // Elements
    #[error("a[{index}] != b[{index}]: {left} ({left_type}) <=> {right} ({right_type})")]
    ElementMismatch {
        index: usize,
        left: String,
        left_type: String,
        right: String,
        right_type: String,
    },
    #[error("a[{index}] ({value}) is not in b")]
    ItemNotFound { index: usize, value: String },

    // Fields
    #[error("no field '{name}'")]
    FieldNotFound { name: String },
    #[error("field '{name}' can not be set")]
    FieldNotWritable { name: String },
    #[error("field '{name}' requires type {expected}, but {got}")]
    FieldTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },
}

impl MetaError {
    /// The broad class this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            MetaError::UntypedNil => ErrorCategory::UntypedNil,
            MetaError::NotDuplicatable { .. } => ErrorCategory::NotDuplicatable,
            MetaError::NotSequence { .. }
            | MetaError::LengthMismatch { .. }
            | MetaError::UnexpectedKind { .. }
            | MetaError::TypeMismatch { .. }
            | MetaError::FieldCount { .. }
            | MetaError::IndexOutOfRange { .. }
            | MetaError::UnhashableKey { .. }
            | MetaError::NilDereference { .. }
            | MetaError::NilWrite { .. } => ErrorCategory::ShapeMismatch,
            MetaError::ElementMismatch { .. } | MetaError::ItemNotFound { .. } => {
                ErrorCategory::ElementMismatch
            }
            MetaError::FieldNotFound { .. } => ErrorCategory::FieldNotFound,
            MetaError::FieldNotWritable { .. } => ErrorCategory::FieldNotWritable,
            MetaError::FieldTypeMismatch { .. } => ErrorCategory::FieldTypeMismatch,
        }
    }

    pub fn is(&self, category: ErrorCategory) -> bool {
        self.category() == category
    }
}

// Factories

pub(crate) fn not_duplicatable(kind: Kind) -> MetaError {
    MetaError::NotDuplicatable { kind }
}

pub(crate) fn type_mismatch(expected: impl fmt::Display, value: &Value) -> MetaError {
    MetaError::TypeMismatch {
        expected: expected.to_string(),
        got: value.type_name(),
    }
}

pub(crate) fn element_mismatch(index: usize, left: &Value, right: &Value) -> MetaError {
    MetaError::ElementMismatch {
        index,
        left: left.to_string(),
        left_type: left.type_name(),
        right: right.to_string(),
        right_type: right.type_name(),
    }
}

pub(crate) fn item_not_found(index: usize, value: &Value) -> MetaError {
    MetaError::ItemNotFound {
        index,
        value: value.to_string(),
    }
}

pub(crate) fn field_not_found(name: &str) -> MetaError {
    MetaError::FieldNotFound {
        name: name.to_string(),
    }
}
