//! This module defines the error type shared by the whole library.
//!
//! Only structural problems are errors: a malformed header, a type mismatch
//! or an out-of-range argument. A query that simply finds nothing is not an
//! error and never ends up here.

use thiserror::Error;

use crate::axis::{Direction, MappingType};

/// The errors that can come out of parsing, writing or rewriting a header, or
/// out of accessing a matrix resource.
#[derive(Debug, Error)]
pub enum CiftiError {
  /// The header is structurally invalid.
  #[error("malformed CIFTI header: {0}")]
  MalformedHeader(String),
  /// An index argument is past the end of what it indexes.
  #[error("index {index} is out of range for {what} of length {length}")]
  IndexOutOfRange {
    /// What was being indexed.
    what: &'static str,
    /// The offending index.
    index: usize,
    /// The length of the indexed thing.
    length: usize
  },
  /// An operation expected one kind of mapping but found another.
  #[error("expected {expected} along {direction}, got {found}")]
  WrongMappingType {
    /// The direction of the axis.
    direction: Direction,
    /// A description of the accepted mapping types.
    expected: &'static str,
    /// The mapping type actually found.
    found: MappingType
  },
  /// A row buffer has the wrong width.
  #[error("row buffer has {found} elements, expected {expected}")]
  BufferSize {
    /// The width of a row.
    expected: usize,
    /// The size of the buffer passed in.
    found: usize
  },
  /// The XML text could not be read or written.
  #[error("XML error: {0}")]
  Xml(String),
  /// Some I/O went wrong.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error)
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, CiftiError>;

/// Shorthand to build a malformed-header error from anything printable.
pub(crate) fn malformed<S: Into<String>>(msg: S) -> CiftiError {
  return CiftiError::MalformedHeader(msg.into());
}
