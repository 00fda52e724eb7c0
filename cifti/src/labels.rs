//! This module implements label tables, which assign a name and a colour to
//! each integer key found in a label map.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{malformed, Result};
use crate::tree::Element;

/// A single label: a name plus an RGBA colour, components in `[0, 1]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Label {
  /// The label name.
  pub name: String,
  /// Red.
  pub red: f32,
  /// Green.
  pub green: f32,
  /// Blue.
  pub blue: f32,
  /// Alpha.
  pub alpha: f32
}

impl Label {
  /// Creates an opaque label.
  pub fn new<S: Into<String>>(name: S, rgb: [f32; 3]) -> Self {
    return Self {
      name: name.into(),
      red: rgb[0],
      green: rgb[1],
      blue: rgb[2],
      alpha: 1.0
    };
  }
}

/// A table of labels, keyed by the integer stored in the data.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LabelTable {
  /// The labels.
  labels: BTreeMap<i32, Label>
}

impl LabelTable {
  /// Creates an empty table.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Inserts a label, returning whatever was under that key before.
  pub fn insert(&mut self, key: i32, label: Label) -> Option<Label> {
    return self.labels.insert(key, label);
  }

  /// Gets the label for a key.
  pub fn label(&self, key: i32) -> Option<&Label> {
    return self.labels.get(&key);
  }

  /// Finds the key of the first label with a given name.
  pub fn key_for_name(&self, name: &str) -> Option<i32> {
    return self.labels.iter()
      .find(|(_, l)| l.name == name)
      .map(|(k, _)| *k);
  }

  /// Iterates over the labels in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&i32, &Label)> {
    return self.labels.iter();
  }

  /// Number of labels in the table.
  pub fn len(&self) -> usize {
    return self.labels.len();
  }

  /// Is the table empty?
  pub fn is_empty(&self) -> bool {
    return self.labels.is_empty();
  }

  /// Reads a `<LabelTable>` element.
  pub(crate) fn from_element(elem: &Element) -> Result<Self> {
    let mut table = Self::new();
    for lab in elem.children_named("Label") {
      let key: i32 = lab.parsed_attr("Key")?;
      let label = Label {
        name: lab.text.clone(),
        red: lab.parsed_attr("Red")?,
        green: lab.parsed_attr("Green")?,
        blue: lab.parsed_attr("Blue")?,
        alpha: lab.parsed_attr("Alpha")?
      };
      if table.insert(key, label).is_some() {
        return Err(malformed(format!("label key {} appears twice", key)));
      }
    }
    return Ok(table);
  }

  /// Writes a `<LabelTable>` element.
  pub(crate) fn to_element(&self) -> Element {
    let mut elem = Element::new("LabelTable");
    for (key, label) in self.labels.iter() {
      elem.children.push(
        Element::new("Label")
          .with_attr("Key", key)
          .with_attr("Red", label.red)
          .with_attr("Green", label.green)
          .with_attr("Blue", label.blue)
          .with_attr("Alpha", label.alpha)
          .with_text(label.name.as_str())
      );
    }
    return elem;
  }
}

impl FromIterator<(i32, Label)> for LabelTable {
  fn from_iter<I: IntoIterator<Item = (i32, Label)>>(iter: I) -> Self {
    return Self { labels: iter.into_iter().collect() };
  }
}
