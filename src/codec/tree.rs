// SPDX-License-Identifier: MIT OR Apache-2.0

//! An ordered associative tree standing in for the panel's XML document.
//!
//! The wire format cares about element order (it is XML without attributes,
//! rebuilt from a dict on the panel's side), so a `HashMap` would silently
//! scramble requests. [`Node`] keeps children in insertion order via a
//! `Vec<(String, Node)>`.

/// One node of the command tree: either a leaf scalar or an ordered list
/// of named children.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(String),
    Children(Vec<(String, Node)>),
}

impl Node {
    pub fn children() -> Self {
        Node::Children(Vec::new())
    }

    pub fn leaf(value: impl Into<String>) -> Self {
        Node::Leaf(value.into())
    }

    /// Append a named child, preserving insertion order. Panics if called
    /// on a leaf node — a programming error, not a runtime condition.
    pub fn push(&mut self, name: impl Into<String>, child: Node) {
        match self {
            Node::Children(kids) => kids.push((name.into(), child)),
            Node::Leaf(_) => unreachable!("push on a leaf node"),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        match self {
            Node::Children(kids) => kids.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            Node::Leaf(_) => None,
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(s) => Some(s),
            Node::Children(_) => None,
        }
    }

    /// Walk a `/`-separated path, mirroring the panel's own `_select`.
    /// Missing segments yield `None` rather than erroring — the panel
    /// omits optional elements freely.
    pub fn select(&self, path: &str) -> Option<&Node> {
        let mut cursor = self;
        for segment in path.trim_matches('/').split('/').filter(|s| !s.is_empty()) {
            cursor = cursor.get(segment)?;
        }
        Some(cursor)
    }
}

/// Build a single-branch tree rooted at `path`, with `leaf` hung off the
/// final path segment. Mirrors the panel's own `_create`.
///
/// `wrap_path("Root/Pair/Push", leaf)` produces `Root -> Pair -> Push -> leaf`.
pub fn wrap_path(path: &str, leaf: Node) -> Node {
    let segments: Vec<&str> = path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
    let mut node = leaf;
    for segment in segments.into_iter().rev() {
        let mut wrapper = Node::children();
        wrapper.push(segment, node);
        node = wrapper;
    }
    node
}
