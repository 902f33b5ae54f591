//! Rendering context contract and implementations.
//!
//! The manager only ever *writes* presentation state: one attribute carrying
//! the resolved mode and four custom properties carrying the palette. It
//! never reads them back, so a target is free to forward, record, or render
//! them however it likes.

use std::fmt::Write as _;

/// A sink for presentation state.
pub trait RenderTarget: Send {
    /// Sets an attribute on the document root (e.g. `data-theme`).
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Sets a CSS custom property on the document root (e.g. `--primary`).
    fn set_property(&mut self, name: &str, value: &str);
}

fn upsert(entries: &mut Vec<(String, String)>, name: &str, value: &str) {
    match entries.iter_mut().find(|(n, _)| n == name) {
        Some((_, v)) => *v = value.to_string(),
        None => entries.push((name.to_string(), value.to_string())),
    }
}

fn lookup<'a>(entries: &'a [(String, String)], name: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}

// === CssVariables ===

/// Collects the latest attribute and property values and renders them as CSS.
///
/// ```rust
/// use hueshift_theme::{CssVariables, RenderTarget};
///
/// let mut css = CssVariables::new();
/// css.set_attribute("data-theme", "dark");
/// css.set_property("--primary", "#10b981");
///
/// assert_eq!(
///     css.to_css(),
///     ":root[data-theme=\"dark\"] {\n  --primary: #10b981;\n}\n"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssVariables {
    attributes: Vec<(String, String)>,
    properties: Vec<(String, String)>,
}

impl CssVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)
    }

    pub fn property(&self, name: &str) -> Option<&str> {
        lookup(&self.properties, name)
    }

    /// Properties in first-written order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Renders a single `:root` rule, qualified by every attribute set.
    pub fn to_css(&self) -> String {
        let mut out = String::from(":root");
        for (name, value) in &self.attributes {
            let _ = write!(out, "[{}=\"{}\"]", name, value.replace('"', "\\\""));
        }
        out.push_str(" {\n");
        for (name, value) in &self.properties {
            let _ = writeln!(out, "  {}: {};", name, value);
        }
        out.push_str("}\n");
        out
    }
}

impl RenderTarget for CssVariables {
    fn set_attribute(&mut self, name: &str, value: &str) {
        upsert(&mut self.attributes, name, value);
    }

    fn set_property(&mut self, name: &str, value: &str) {
        upsert(&mut self.properties, name, value);
    }
}

// === RecordingTarget ===

/// One write made to a [`RecordingTarget`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCall {
    Attribute { name: String, value: String },
    Property { name: String, value: String },
}

/// Records every write in order, for tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    calls: Vec<RenderCall>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write, oldest first.
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// The most recent value written to attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            RenderCall::Attribute { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// The most recent value written to property `name`.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.calls.iter().rev().find_map(|call| match call {
            RenderCall::Property { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Forgets recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for RecordingTarget {
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.calls.push(RenderCall::Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn set_property(&mut self, name: &str, value: &str) {
        self.calls.push(RenderCall::Property {
            name: name.to_string(),
            value: value.to_string(),
        });
    }
}

impl<T: RenderTarget + ?Sized> RenderTarget for Box<T> {
    fn set_attribute(&mut self, name: &str, value: &str) {
        (**self).set_attribute(name, value)
    }

    fn set_property(&mut self, name: &str, value: &str) {
        (**self).set_property(name, value)
    }
}
