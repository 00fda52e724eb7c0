//! Tests for the library, split by area.

mod fixtures;
mod roi;
mod translator;
mod xml;
