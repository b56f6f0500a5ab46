//! Route pattern segments.
//!
//! # Grammar
//! ```text
//! literal        users
//! parameter      :id
//! constrained    :id:[0-9]+
//! anonymous      ::[0-9]+      (value checked, never named)
//! ```
//! `:` alone and an empty expression after the separator (`:id:`, `::`)
//! are rejected.

use std::fmt;

use regex::Regex;

use crate::routing::error::RouteError;

/// Marks a parameter segment and separates its name from its expression.
pub const PARAM_MARKER: char = ':';

/// Synthetic parameter name bound by routes ending in `/`.
pub const WILDCARD: &str = "*";

/// A compiled regular-expression constraint on a parameter segment.
#[derive(Clone)]
pub struct Constraint {
    source: String,
    anchored: Regex,
}

impl Constraint {
    /// Compiles `source`, failing on invalid syntax.
    ///
    /// The expression is validated on its own before being wrapped, so a
    /// pattern like `a)(b` cannot become valid through the anchoring group.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source)?;
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_owned(),
            anchored,
        })
    }

    /// The expression as written in the route.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the whole segment matches the expression.
    pub fn is_match(&self, segment: &str) -> bool {
        self.anchored.is_match(segment)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constraint").field(&self.source).finish()
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// One segment of a registered route, classified.
#[derive(Debug, PartialEq)]
pub enum PatternSegment<'p> {
    Literal(&'p str),
    Param {
        name: Option<&'p str>,
        constraint: Option<Constraint>,
    },
}

impl<'p> PatternSegment<'p> {
    /// Parses a single segment of `path`.
    ///
    /// `path` is only used for error reporting.
    pub fn parse(segment: &'p str, path: &str) -> Result<Self, RouteError> {
        let Some(rest) = segment.strip_prefix(PARAM_MARKER) else {
            return Ok(PatternSegment::Literal(segment));
        };

        match rest.split_once(PARAM_MARKER) {
            None if rest.is_empty() => Err(RouteError::AnonymousParameter {
                path: path.to_owned(),
            }),
            None => Ok(PatternSegment::Param {
                name: Some(rest),
                constraint: None,
            }),
            Some((_, "")) => Err(RouteError::EmptyConstraint {
                path: path.to_owned(),
            }),
            Some((name, source)) => {
                let constraint =
                    Constraint::new(source).map_err(|source| RouteError::InvalidConstraint {
                        path: path.to_owned(),
                        source,
                    })?;
                Ok(PatternSegment::Param {
                    name: (!name.is_empty()).then_some(name),
                    constraint: Some(constraint),
                })
            }
        }
    }
}

/// Checks a whole route pattern without registering it.
pub fn validate_pattern(path: &str) -> Result<(), RouteError> {
    if !path.starts_with('/') {
        return Err(RouteError::MissingLeadingSlash {
            path: path.to_owned(),
        });
    }
    for segment in crate::routing::segments::split_path(path) {
        PatternSegment::parse(segment, path)?;
    }
    Ok(())
}
