//! This library implements the brainordinate-mapping layer of the CIFTI file
//! format: it reads the XML header of a CIFTI file into a validated model and
//! translates between matrix row/column indices and what they stand for,
//! be it surface vertices, volume voxels, time points, labels or scalars.
//!
//! The matrix data itself is kept behind the `MatrixResource` trait, so the
//! library never does file I/O on its own. Command-line tools built on top of
//! it live in sibling crates of the workspace.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod axis;
pub mod error;
pub mod labels;
pub mod matrix;
pub mod model;
pub mod mutator;
pub mod roi;
pub mod structure;
pub mod translator;
pub mod tree;
pub mod volume;
pub mod xml;

/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use crate::axis::*;
  pub use crate::error::{CiftiError, Result as CiftiResult};
  pub use crate::labels::*;
  pub use crate::matrix::*;
  pub use crate::model::*;
  pub use crate::roi::*;
  pub use crate::structure::*;
  pub use crate::translator::*;
  pub use crate::tree::Element;
  pub use crate::volume::*;
}

#[cfg(test)]
mod tests;
