//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (startup or config reload):
//!     (method, path, handler)
//!     → segments.rs (split path)
//!     → pattern.rs (literal / :param / :param:regex)
//!     → tree.rs (extend the method's tree)
//!
//! Dispatch (per request):
//!     Request (method, path)
//!     → router.rs (trailing-slash redirect, tree lookup)
//!     → tree.rs (structural match)
//!     → handler(request, params.rs side table) or not-found
//! ```
//!
//! # Design Decisions
//! - Trees are built before serving and never mutated afterwards
//! - No allocation on the match path; parameters resolve on first read
//! - Deterministic: same (method, path) always reaches the same handler

pub mod error;
pub mod params;
pub mod pattern;
pub mod router;
pub mod segments;
pub mod tree;

pub use error::RouteError;
pub use params::{parameter, Params};
pub use pattern::validate_pattern;
pub use router::{BoxHandler, Handler, Router};
