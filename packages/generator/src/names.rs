//! Qualified-name splitting.
//!
//! Turns `ns::(anonymous namespace)::Box<std::string>::get` into the scope
//! path `[ns, Box<std::string>]` and the leaf `get`. Separators inside
//! template argument lists or parentheses do not split.

use crate::config::{is_anonymous_marker, SCOPE_SEPARATOR};

/// A qualified name split into its scope path and leaf symbol name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    scope: Vec<String>,
    leaf: String,
}

impl QualifiedName {
    /// Split a qualified name.
    ///
    /// Anonymous-scope markers and empty components (from a leading `::`)
    /// are dropped from the scope path. A name without separator has an
    /// empty scope path.
    ///
    /// # Examples
    /// ```
    /// use cmg_generator::names::QualifiedName;
    ///
    /// let name = QualifiedName::parse("::a::(anonymous namespace)::f");
    /// assert_eq!(name.scope(), ["a"]);
    /// assert_eq!(name.leaf(), "f");
    /// ```
    #[must_use]
    pub fn parse(qualified_name: &str) -> Self {
        let mut components = split_components(qualified_name);
        let leaf = components.pop().unwrap_or_default().to_string();
        let scope = components
            .into_iter()
            .filter(|c| !c.is_empty() && !is_anonymous_marker(c))
            .map(str::to_string)
            .collect();
        Self { scope, leaf }
    }

    /// Enclosing scope components, outermost first.
    #[must_use]
    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Unqualified symbol name.
    #[must_use]
    pub fn leaf(&self) -> &str {
        &self.leaf
    }

    /// Whether the leaf names an entity that cannot be referenced.
    #[must_use]
    pub fn is_unnamed(&self) -> bool {
        self.leaf.is_empty() || is_anonymous_marker(&self.leaf)
    }

    /// Globally qualified reference, e.g. `::a::b::f`.
    #[must_use]
    pub fn reference(&self) -> String {
        let mut reference = String::new();
        for component in self.scope.iter().map(String::as_str).chain([self.leaf.as_str()]) {
            reference.push_str(SCOPE_SEPARATOR);
            reference.push_str(component);
        }
        reference
    }
}

/// Split on top-level separators, keeping every component.
fn split_components(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let sep = SCOPE_SEPARATOR.as_bytes();
    let mut components = Vec::new();
    let mut angle_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => paren_depth += 1,
            b')' => paren_depth = paren_depth.saturating_sub(1),
            b'<' if paren_depth == 0 => angle_depth += 1,
            b'>' if paren_depth == 0 => angle_depth = angle_depth.saturating_sub(1),
            _ => {}
        }
        if angle_depth == 0 && paren_depth == 0 && bytes[i..].starts_with(sep) {
            components.push(&name[start..i]);
            i += sep.len();
            start = i;
            continue;
        }
        i += 1;
    }
    components.push(&name[start..]);
    components
}
