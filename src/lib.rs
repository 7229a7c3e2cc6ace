//! # Waypoint
//!
//! **Waypoint** is a URL route-template compiler and matcher in the MVC
//! convention: ordered route tables, `{name}` placeholders with defaults
//! and constraints, ignore routes for static assets, and lower-cased route
//! values extracted per request.
//!
//! ## Overview
//!
//! Routes are registered once at startup, either programmatically or from a
//! YAML/JSON routes file. Each template is compiled into an anchored
//! regular expression; incoming paths are tested against the ignore list
//! first, then against every route in registration order. The first match
//! wins - conflict resolution is deliberately positional, never a
//! "most specific" score.
//!
//! ## Route template syntax
//!
//! ```text
//! {name}            required segment, matches [^/]+ unless constrained
//! {name=default}    optional segment with inline default value
//! {name?}           optional segment, no substitution if absent
//! {*name}           catch-all, matches across '/' to the end of the path
//! ```
//!
//! Constraints are regex fragments supplied per segment name. An inline
//! `=value` default and a defaults-map entry for the same segment are
//! rejected at registration as ambiguous.
//!
//! ## Quick Start
//!
//! ```
//! use waypoint::{RouteDef, RouteTable};
//!
//! # fn main() -> Result<(), waypoint::RouteError> {
//! let mut table = RouteTable::new();
//! table.ignore("content/{*file}")?;
//! table.add(
//!     RouteDef::new("blog", "blog/{action}/{id?}")
//!         .with_default("controller", "Blog")
//!         .with_constraint("id", r"\d+"),
//! )?;
//! table.add(RouteDef::new(
//!     "default",
//!     "{controller=Home}/{action=index}/{id?}",
//! ))?;
//!
//! let matched = table.match_path("/Forum/Show/123").expect("route matches");
//! assert_eq!(matched.get("controller"), Some("forum"));
//! assert_eq!(matched.get("action"), Some("show"));
//! assert_eq!(matched.get("id"), Some("123"));
//!
//! // Defaults fill in what the path omits; {id?} never backfills.
//! let root = table.match_path("/").expect("default route matches");
//! assert_eq!(root.get("controller"), Some("home"));
//! assert_eq!(root.get("action"), Some("index"));
//! assert_eq!(root.get("id"), None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **[`router`]** - template compilation, the route table and matching
//! - **[`template_cache`]** - shared cache of compiled templates
//! - **[`config`]** - routes-file loading (YAML/JSON)
//! - **[`dispatcher`]** - controller/action handler registry
//! - **[`cli`]** - the `waypoint` inspection binary
//!
//! ## Concurrency
//!
//! Tables are read-mostly: build them before serving, then share them
//! freely - matching takes `&self` and performs no locking or I/O. The
//! optional [`TemplateCache`] is internally synchronized and its population
//! is idempotent.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod router;
pub mod template_cache;

pub use dispatcher::{ActionResult, DispatchResult, Dispatcher};
pub use router::{
    normalize_path, CompiledSegment, CompiledTemplate, ParamVec, RouteDef, RouteError, RouteMatch,
    RouteOutcome, RouteTable, SegmentDefault,
};
pub use template_cache::TemplateCache;
