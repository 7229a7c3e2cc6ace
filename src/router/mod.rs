//! # Router Module
//!
//! Path matching and route resolution. Route templates in the MVC
//! convention (`{controller=Home}/{action=index}/{id?}`) are compiled into
//! regex-based matchers that recognize incoming request paths and extract
//! route values.
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Compilation**: At registration, templates are parsed into
//!    [`CompiledSegment`] lists and assembled into anchored regex patterns
//!    that can match and extract route values.
//!
//! 2. **Matching**: For each incoming path, the table tests its ignore
//!    patterns first, then every route's compiled pattern in registration
//!    order until one matches. First match wins; there is no best-match
//!    scoring.
//!
//! ## Example
//!
//! ```
//! use waypoint::router::{RouteDef, RouteTable};
//!
//! # fn main() -> Result<(), waypoint::RouteError> {
//! let mut table = RouteTable::new();
//! table.add(RouteDef::new(
//!     "default",
//!     "{controller=Home}/{action=index}/{id?}",
//! ))?;
//!
//! let matched = table.match_path("/Forum/Show/123").expect("route matches");
//! assert_eq!(matched.get("controller"), Some("forum"));
//! assert_eq!(matched.get("id"), Some("123"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Performance
//!
//! Matching is a short, bounded CPU operation: one compiled regex test per
//! candidate route, no I/O, no locking. The `regex` engine is
//! non-backtracking, so pathological templates cannot blow up match time.

mod core;
mod error;
mod template;

pub use self::core::{
    normalize_path, ParamVec, RouteDef, RouteMatch, RouteOutcome, RouteTable, MAX_INLINE_PARAMS,
};
pub use error::RouteError;
pub use template::{compile, CompiledSegment, CompiledTemplate, SegmentDefault};
