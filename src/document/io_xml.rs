//! XML/XHTML reader and writer for the document tree.
//!
//! Reading goes through `roxmltree`; writing is a plain escaping
//! serializer. Processing instructions and the DOCTYPE are not carried
//! over; elements, attributes, text and comments are.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::ParsingOptions;

use super::{Element, Node};
use crate::error::ImgfindError;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>";
const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Read an XML document from disk.
pub fn read_document(path: &Path) -> Result<Element, ImgfindError> {
    let xml = fs::read_to_string(path).map_err(ImgfindError::Io)?;
    parse_document(&xml, path)
}

/// Parse an XML document held in memory.
pub fn from_document_str(xml: &str) -> Result<Element, ImgfindError> {
    parse_document(xml, Path::new("<memory>"))
}

/// Parse XML from bytes. The input must be valid UTF-8.
pub fn from_document_slice(bytes: &[u8]) -> Result<Element, ImgfindError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| ImgfindError::DocumentParse {
        path: PathBuf::from("<memory>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    from_document_str(xml)
}

fn parse_document(xml: &str, path: &Path) -> Result<Element, ImgfindError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = roxmltree::Document::parse_with_options(xml, options).map_err(|source| {
        ImgfindError::DocumentParse {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    })?;

    Ok(convert_element(document.root_element()))
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qualified_name(node, tag.namespace(), tag.name()));

    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| {
            parent
                .namespaces()
                .map(|ns| (ns.name(), ns.uri()))
                .collect()
        })
        .unwrap_or_default();

    for ns in node.namespaces() {
        if ns.name() == Some("xml") || inherited.contains(&(ns.name(), ns.uri())) {
            continue;
        }
        let key = match ns.name() {
            Some(prefix) => format!("xmlns:{prefix}"),
            None => "xmlns".to_string(),
        };
        element.attributes.push((key, ns.uri().to_string()));
    }

    for attr in node.attributes() {
        element.attributes.push((
            qualified_name(node, attr.namespace(), attr.name()),
            attr.value().to_string(),
        ));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert_element(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(Node::Text(text.to_string()));
            }
        } else if child.is_comment() {
            if let Some(text) = child.text() {
                element.children.push(Node::Comment(text.to_string()));
            }
        }
    }

    element
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    let prefix = namespace.and_then(|uri| {
        if uri == XML_NAMESPACE {
            Some("xml")
        } else {
            node.lookup_prefix(uri)
        }
    });
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.to_string(),
    }
}

/// Serialize a document tree, with an XML declaration.
pub fn to_document_string(root: &Element) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    write_element(&mut xml, root);
    xml.push('\n');
    xml
}

/// Write a document tree to `path`.
pub fn write_document(path: &Path, root: &Element) -> Result<(), ImgfindError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(ImgfindError::Io)?;
    }
    fs::write(path, to_document_string(root)).map_err(ImgfindError::Io)
}

fn write_element(xml: &mut String, element: &Element) {
    write!(xml, "<{}", element.name).expect("write to string");
    for (name, value) in &element.attributes {
        write!(xml, " {}=\"{}\"", name, escape_attr(value)).expect("write to string");
    }

    if element.children.is_empty() {
        xml.push_str("/>");
        return;
    }

    xml.push('>');
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(xml, child),
            Node::Text(text) => xml.push_str(&escape_text(text)),
            Node::Comment(text) => write!(xml, "<!--{}-->", text).expect("write to string"),
        }
    }
    write!(xml, "</{}>", element.name).expect("write to string");
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
        .replace('\t', "&#9;")
}
