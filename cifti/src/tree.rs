//! This module implements the header tree: a plain, ordered element tree
//! that sits between the XML text and the header model. The XML codec only
//! ever produces and consumes these, and the model only ever reads and builds
//! these, so neither has to know about the other.

use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{malformed, Result};

/// A single element of the header tree.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Element {
  /// The tag name.
  pub name: String,
  /// The attributes, in document order.
  pub attributes: Vec<(String, String)>,
  /// The child elements, in document order.
  pub children: Vec<Element>,
  /// The concatenated character data directly inside this element.
  pub text: String
}

impl Element {
  /// Creates an empty element with a given tag name.
  pub fn new<S: Into<String>>(name: S) -> Self {
    return Self {
      name: name.into(),
      ..Default::default()
    };
  }

  /// Builder-style: adds an attribute.
  pub fn with_attr<K: Into<String>, V: ToString>(
    mut self,
    key: K,
    value: V
  ) -> Self {
    self.attributes.push((key.into(), value.to_string()));
    return self;
  }

  /// Builder-style: adds a child.
  pub fn with_child(mut self, child: Element) -> Self {
    self.children.push(child);
    return self;
  }

  /// Builder-style: sets the text.
  pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
    self.text = text.into();
    return self;
  }

  /// Gets an attribute by key.
  pub fn attr(&self, key: &str) -> Option<&str> {
    return self.attributes.iter()
      .find(|(k, _)| k == key)
      .map(|(_, v)| v.as_str());
  }

  /// Gets an attribute that must be present.
  pub fn required_attr(&self, key: &str) -> Result<&str> {
    return self.attr(key).ok_or_else(|| malformed(format!(
      "<{}> is missing attribute \"{}\"", self.name, key
    )));
  }

  /// Gets an attribute that must be present and parse into some type.
  pub fn parsed_attr<T: FromStr>(&self, key: &str) -> Result<T> {
    let raw = self.required_attr(key)?;
    return raw.trim().parse::<T>().map_err(|_| malformed(format!(
      "attribute \"{}\" of <{}> has bad value \"{}\"", key, self.name, raw
    )));
  }

  /// Gets an optional attribute that, if present, must parse into some type.
  pub fn optional_attr<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
    if self.attr(key).is_none() {
      return Ok(None);
    }
    return self.parsed_attr(key).map(Some);
  }

  /// Returns the first child with a given tag name.
  pub fn child(&self, name: &str) -> Option<&Element> {
    return self.children.iter().find(|c| c.name == name);
  }

  /// Returns every child with a given tag name, in order.
  pub fn children_named<'a>(
    &'a self,
    name: &'a str
  ) -> impl Iterator<Item = &'a Element> + 'a {
    return self.children.iter().filter(move |c| c.name == name);
  }

  /// Parses the text of this element as a whitespace-delimited list. Commas
  /// are accepted as delimiters too.
  pub fn text_list<T: FromStr>(&self) -> Result<Vec<T>> {
    return parse_list(&self.text, &self.name);
  }
}

/// Parses a whitespace- or comma-delimited list of values.
pub(crate) fn parse_list<T: FromStr>(s: &str, context: &str) -> Result<Vec<T>> {
  return s.split(|c: char| c.is_whitespace() || c == ',')
    .filter(|tok| !tok.is_empty())
    .map(|tok| tok.parse::<T>().map_err(|_| malformed(format!(
      "bad value \"{}\" in list inside <{}>", tok, context
    ))))
    .collect();
}

/// Formats values as a space-delimited list.
pub(crate) fn format_list<T: ToString>(values: &[T]) -> String {
  return values.iter().map(|v| v.to_string()).join(" ");
}
