//! Owned markup tree.
//!
//! A deliberately small element tree: enough to load an XHTML/XML
//! document, let the resolver rewrite `<img>` attributes in place, and write
//! it back out. Attribute order is preserved; namespace declarations are
//! kept as ordinary `xmlns`/`xmlns:*` attributes.

pub mod io_xml;

use crate::resolve::ImageNode;

/// Tag name of the elements the walker hands to the resolver.
pub const IMAGE_TAG: &str = "img";

/// A node in the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its attributes (in source order) and children.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name (`prefix:local` when prefixed).
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set `name` to `value`, replacing an existing value in place or
    /// appending a new attribute.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Local part of the tag name.
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn is_image(&self) -> bool {
        self.local_name().eq_ignore_ascii_case(IMAGE_TAG)
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Call `f` on this element and every descendant element, in document
    /// (pre-)order. Stops at the first error.
    pub fn try_for_each_mut<E, F>(&mut self, f: &mut F) -> Result<(), E>
    where
        F: FnMut(&mut Element) -> Result<(), E>,
    {
        f(self)?;
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.try_for_each_mut(f)?;
            }
        }
        Ok(())
    }

    /// Call `f` on every image element in document order.
    pub fn try_for_each_image_mut<E, F>(&mut self, mut f: F) -> Result<(), E>
    where
        F: FnMut(&mut Element) -> Result<(), E>,
    {
        self.try_for_each_mut(&mut |element: &mut Element| {
            if element.is_image() {
                f(element)
            } else {
                Ok(())
            }
        })
    }

    /// All image elements in document order.
    pub fn images(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_images(self, &mut out);
        out
    }
}

fn collect_images<'a>(element: &'a Element, out: &mut Vec<&'a Element>) {
    if element.is_image() {
        out.push(element);
    }
    for child in element.child_elements() {
        collect_images(child, out);
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl ImageNode for Element {
    fn source(&self) -> Option<&str> {
        self.attr("src")
    }

    fn set_source(&mut self, source: &str) {
        self.set_attr("src", source);
    }

    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.set_attr("width", width.to_string());
        self.set_attr("height", height.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("html").with_child(
            Element::new("body")
                .with_child(Element::new("img").with_attr("src", "a"))
                .with_child(
                    Element::new("p")
                        .with_child("text")
                        .with_child(Element::new("img").with_attr("src", "b")),
                )
                .with_child(Element::new("img").with_attr("src", "c")),
        )
    }

    #[test]
    fn images_are_visited_in_document_order() {
        let mut root = sample();
        let mut seen = Vec::new();
        root.try_for_each_image_mut(|img| {
            seen.push(img.attr("src").unwrap_or_default().to_string());
            Ok::<(), ()>(())
        })
        .expect("walk");
        assert_eq!(seen, vec!["a", "b", "c"]);

        let listed: Vec<&str> = root
            .images()
            .iter()
            .filter_map(|img| img.attr("src"))
            .collect();
        assert_eq!(listed, vec!["a", "b", "c"]);
    }

    #[test]
    fn walk_stops_at_first_error() {
        let mut root = sample();
        let mut visited = 0;
        let result = root.try_for_each_image_mut(|img| {
            visited += 1;
            if img.attr("src") == Some("b") {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(visited, 2);
    }

    #[test]
    fn set_attr_replaces_in_place() {
        let mut img = Element::new("img")
            .with_attr("src", "x")
            .with_attr("alt", "y");
        img.set_attr("src", "z");
        img.set_attr("width", "5");
        assert_eq!(
            img.attributes,
            vec![
                ("src".to_string(), "z".to_string()),
                ("alt".to_string(), "y".to_string()),
                ("width".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn image_node_updates_src_and_dimensions() {
        let mut img = Element::new("img").with_attr("src", "star:w50");
        assert_eq!(img.source(), Some("star:w50"));
        img.set_source("star_.png");
        img.set_dimensions(50, 25);
        assert_eq!(img.attr("src"), Some("star_.png"));
        assert_eq!(img.attr("width"), Some("50"));
        assert_eq!(img.attr("height"), Some("25"));
    }

    #[test]
    fn prefixed_img_counts_as_image() {
        assert!(Element::new("h:img").is_image());
        assert!(Element::new("IMG").is_image());
        assert!(!Element::new("image").is_image());
    }
}
