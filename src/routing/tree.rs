//! Per-method route tree.
//!
//! # Structure
//! ```text
//! /                     (root)
//! ├── /users
//! │   ├── /users/new    GET handler
//! │   └── /users/:      GET handler, params {id: 1}
//! │       └── /users/:/posts
//! │           └── /users/:/posts/:   params {id: 1, postID: 3}
//! └── /files
//!     └── /files/       wildcard, params {*: 1}
//! ```
//!
//! # Design Decisions
//! - Nodes are keyed on structure: every parameter at one depth collapses
//!   into a single `:` child regardless of its name
//! - Each node carries the union of parameter indices from the root down,
//!   so dispatch only publishes a reference to one map
//! - Literal children win over the parameter child; a chosen literal is
//!   never abandoned for its parameter sibling
//! - A wildcard child catches whatever the rest of its parent's subtree
//!   could not match
//! - Constraints belong to the route, not to the shared `:` node: they live
//!   on the route's final node keyed by segment index, and are only checked
//!   when enforcement is enabled

use std::collections::HashMap;
use std::fmt;
use std::str::Split;

use crate::routing::error::RouteError;
use crate::routing::pattern::{Constraint, PatternSegment, PARAM_MARKER, WILDCARD};
use crate::routing::segments::{self, split_path, SEPARATOR};

/// Parameter name → segment index.
pub type ParamIndices = HashMap<String, usize>;

/// What a node matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The tree root, matched by `/`.
    Root,
    /// A segment with exactly this text.
    Literal(String),
    /// Any single segment.
    Param,
}

/// A node of the route tree.
#[derive(Debug)]
pub struct Node<H> {
    kind: NodeKind,
    key: String,
    children: Vec<Node<H>>,
    param: Option<Box<Node<H>>>,
    params: ParamIndices,
    constraints: Vec<(usize, Constraint)>,
    wildcard: bool,
    handler: Option<H>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self::root()
    }
}

impl<H> Node<H> {
    /// Create an empty tree.
    pub fn root() -> Self {
        Self::new(NodeKind::Root, SEPARATOR.to_string())
    }

    fn new(kind: NodeKind, key: String) -> Self {
        Self {
            kind,
            key,
            children: Vec::new(),
            param: None,
            params: ParamIndices::new(),
            constraints: Vec::new(),
            wildcard: false,
            handler: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Accumulated structural key, e.g. `/users/:/posts`.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// Parameter indices bound on the way to this node.
    pub fn params(&self) -> &ParamIndices {
        &self.params
    }

    /// Constraint of the route ending here on segment `index`.
    pub fn constraint(&self, index: usize) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|(i, _)| *i == index)
            .map(|(_, constraint)| constraint)
    }

    /// Returns true if this node captures trailing segments under `*`.
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Register `handler` for `path`.
    ///
    /// Returns the handler previously registered on the same node, if any.
    pub fn insert(&mut self, path: &str, handler: H) -> Result<Option<H>, RouteError> {
        if !path.starts_with(SEPARATOR) {
            return Err(RouteError::MissingLeadingSlash {
                path: path.to_owned(),
            });
        }
        if path.len() == 1 {
            return Ok(self.handler.replace(handler));
        }

        // Parse everything first so a bad segment leaves the tree untouched.
        let segments = split_path(path)
            .map(|segment| PatternSegment::parse(segment, path))
            .collect::<Result<Vec<_>, _>>()?;

        let last = segments.len() - 1;
        let mut key = String::with_capacity(path.len());
        let mut indices = ParamIndices::new();
        let mut constraints = Vec::new();
        let mut node = self;

        for (i, segment) in segments.into_iter().enumerate() {
            key.push(SEPARATOR);
            node = match segment {
                PatternSegment::Param { name, constraint } => {
                    if let Some(name) = name {
                        indices.insert(name.to_owned(), i);
                    }
                    if let Some(constraint) = constraint {
                        constraints.push((i, constraint));
                    }
                    key.push(PARAM_MARKER);
                    node.param_child_mut(&key)
                }
                PatternSegment::Literal(text) => {
                    key.push_str(text);
                    let wildcard = i == last && text.is_empty();
                    if wildcard {
                        indices.insert(WILDCARD.to_owned(), i);
                    }
                    let child = node.literal_child_mut(text, &key);
                    child.wildcard |= wildcard;
                    child
                }
            };
            node.merge_params(&indices);
        }

        node.constraints = constraints;
        Ok(node.handler.replace(handler))
    }

    /// Find the node serving `path`.
    ///
    /// Only nodes carrying a handler are returned. With `enforce_constraints`
    /// on, the route ending at the node must also accept every constrained
    /// segment of `path`.
    pub fn find(&self, path: &str, enforce_constraints: bool) -> Option<&Node<H>> {
        let rest = path.strip_prefix(SEPARATOR)?;
        if rest.is_empty() {
            return self.handler.as_ref().map(|_| self);
        }
        self.find_from(split_path(path), path, enforce_constraints)
    }

    fn find_from(
        &self,
        mut segments: Split<'_, char>,
        path: &str,
        enforce: bool,
    ) -> Option<&Node<H>> {
        let Some(segment) = segments.next() else {
            return self.serves(path, enforce).then_some(self);
        };

        self.literal_child(segment)
            .or(self.param.as_deref())
            .and_then(|child| child.find_from(segments, path, enforce))
            .or_else(|| self.wildcard_child(path, enforce))
    }

    fn serves(&self, path: &str, enforce: bool) -> bool {
        self.handler.is_some() && (!enforce || self.accepts(path))
    }

    fn accepts(&self, path: &str) -> bool {
        self.constraints
            .iter()
            .all(|(index, constraint)| constraint.is_match(segments::nth(path, *index)))
    }

    fn literal_child(&self, segment: &str) -> Option<&Node<H>> {
        self.children
            .iter()
            .find(|child| matches!(&child.kind, NodeKind::Literal(text) if text == segment))
    }

    fn wildcard_child(&self, path: &str, enforce: bool) -> Option<&Node<H>> {
        self.children
            .iter()
            .find(|child| child.wildcard && child.serves(path, enforce))
    }

    fn literal_child_mut(&mut self, text: &str, key: &str) -> &mut Node<H> {
        let pos = self
            .children
            .iter()
            .position(|child| matches!(&child.kind, NodeKind::Literal(t) if t == text));
        match pos {
            Some(pos) => &mut self.children[pos],
            None => {
                self.children
                    .push(Node::new(NodeKind::Literal(text.to_owned()), key.to_owned()));
                let pos = self.children.len() - 1;
                &mut self.children[pos]
            }
        }
    }

    fn param_child_mut(&mut self, key: &str) -> &mut Node<H> {
        self.param
            .get_or_insert_with(|| Box::new(Node::new(NodeKind::Param, key.to_owned())))
    }

    fn merge_params(&mut self, indices: &ParamIndices) {
        for (name, &index) in indices {
            self.params.insert(name.clone(), index);
        }
    }

    /// Writes one line per node below (and including a routed root).
    pub(crate) fn write_tree(&self, f: &mut fmt::Formatter<'_>, indent: &str) -> fmt::Result {
        if self.kind != NodeKind::Root || self.handler.is_some() {
            write!(f, "{indent}{}", self.key)?;
            for (_, constraint) in &self.constraints {
                write!(f, " {{{}}}", constraint.as_str())?;
            }
            if self.handler.is_some() {
                write!(f, " •")?;
            }
            writeln!(f)?;
        }
        for child in &self.children {
            child.write_tree(f, indent)?;
        }
        if let Some(param) = &self.param {
            param.write_tree(f, indent)?;
        }
        Ok(())
    }
}
