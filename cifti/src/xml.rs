//! This module implements reading and writing header trees as XML text.

use std::fmt::Display;

use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{CiftiError, Result};
use crate::tree::Element;

/// Wraps a codec error.
fn xml_err<E: Display>(e: E) -> CiftiError {
  return CiftiError::Xml(e.to_string());
}

/// Turns a start tag into an element with no children yet.
fn open_element(start: &BytesStart) -> Result<Element> {
  let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
  let mut elem = Element::new(name);
  for attr in start.attributes() {
    let attr = attr.map_err(xml_err)?;
    let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
    let value = attr.unescape_value().map_err(xml_err)?.into_owned();
    elem.attributes.push((key, value));
  }
  return Ok(elem);
}

/// Hangs a finished element on its parent, or makes it the root.
fn attach(
  stack: &mut [Element],
  root: &mut Option<Element>,
  mut elem: Element
) -> Result<()> {
  // whitespace between child tags is just indentation
  if !elem.children.is_empty() && elem.text.trim().is_empty() {
    elem.text.clear();
  }
  if let Some(parent) = stack.last_mut() {
    parent.children.push(elem);
  } else if root.is_none() {
    *root = Some(elem);
  } else {
    return Err(CiftiError::Xml("more than one root element".to_string()));
  }
  return Ok(());
}

/// Parses XML text into a header tree, returning the root element.
pub fn parse_document(text: &str) -> Result<Element> {
  let mut reader = Reader::from_str(text);
  let mut stack: Vec<Element> = Vec::new();
  let mut root: Option<Element> = None;
  loop {
    match reader.read_event().map_err(xml_err)? {
      Event::Start(start) => stack.push(open_element(&start)?),
      Event::Empty(start) => {
        let elem = open_element(&start)?;
        attach(&mut stack, &mut root, elem)?;
      },
      Event::End(_) => {
        let elem = stack.pop()
          .ok_or_else(|| CiftiError::Xml("unbalanced end tag".to_string()))?;
        attach(&mut stack, &mut root, elem)?;
      },
      Event::Text(t) => {
        if let Some(top) = stack.last_mut() {
          top.text.push_str(&t.unescape().map_err(xml_err)?);
        }
      },
      Event::CData(c) => {
        if let Some(top) = stack.last_mut() {
          top.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
        }
      },
      Event::Eof => break,
      _ => {}
    }
  }
  if !stack.is_empty() {
    return Err(CiftiError::Xml(format!(
      "document ended inside <{}>", stack[stack.len() - 1].name
    )));
  }
  let root = root
    .ok_or_else(|| CiftiError::Xml("document has no root element".into()))?;
  debug!("Parsed XML document with root <{}>.", root.name);
  return Ok(root);
}

/// Writes one element and everything under it.
fn write_element(writer: &mut Writer<Vec<u8>>, elem: &Element) -> Result<()> {
  let mut start = BytesStart::new(elem.name.as_str());
  for (k, v) in elem.attributes.iter() {
    start.push_attribute((k.as_str(), v.as_str()));
  }
  if elem.children.is_empty() && elem.text.is_empty() {
    writer.write_event(Event::Empty(start)).map_err(xml_err)?;
    return Ok(());
  }
  writer.write_event(Event::Start(start)).map_err(xml_err)?;
  if !elem.text.is_empty() {
    writer.write_event(Event::Text(BytesText::new(&elem.text)))
      .map_err(xml_err)?;
  }
  for child in elem.children.iter() {
    write_element(writer, child)?;
  }
  writer.write_event(Event::End(BytesEnd::new(elem.name.as_str())))
    .map_err(xml_err)?;
  return Ok(());
}

/// Writes a header tree as indented XML text, with a declaration.
pub fn write_document(root: &Element) -> Result<String> {
  let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
  writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    .map_err(xml_err)?;
  write_element(&mut writer, root)?;
  return String::from_utf8(writer.into_inner()).map_err(xml_err);
}
