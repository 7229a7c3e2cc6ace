//! Route table and matcher - hot path for request routing.

use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::error::RouteError;
use super::template::{compile, CompiledTemplate, SegmentDefault};
use crate::template_cache::TemplateCache;

/// Maximum number of route values before heap allocation.
/// MVC-style routes rarely carry more than controller/action/id plus a
/// handful of defaults.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated route-value storage for the hot path.
///
/// Names come from the compiled template and are shared `Arc<str>`; values
/// are per-request strings extracted from the URL.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Normalize a request path for matching.
///
/// Strips the query string and fragment, trims leading and trailing
/// slashes, and maps the front-controller script `index.php` to the root
/// path. Idempotent, so callers may pass either raw or pre-normalized
/// paths.
#[must_use]
pub fn normalize_path(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_matches('/');
    if trimmed.eq_ignore_ascii_case("index.php") {
        ""
    } else {
        trimmed
    }
}

/// A registered route definition.
///
/// Immutable once registered; the table owns it for the process lifetime
/// and hands out `Arc` references in matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDef {
    /// Unique identifier (case-insensitively unique per table)
    pub name: String,
    /// Template with `{name}` placeholders
    pub template: String,
    /// Explicit defaults, distinct from inline `=value` defaults
    pub defaults: HashMap<String, String>,
    /// Regex fragments restricting what a segment may match
    pub constraints: HashMap<String, String>,
}

impl RouteDef {
    /// A route with no explicit defaults or constraints.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            defaults: HashMap::new(),
            constraints: HashMap::new(),
        }
    }

    /// Add an explicit default for a route variable.
    #[must_use]
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    /// Restrict a segment to a regex fragment.
    #[must_use]
    pub fn with_constraint(mut self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.constraints.insert(key.into(), pattern.into());
        self
    }
}

/// Result of successfully matching a request path to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched route definition (shared with the table, never mutated)
    pub route: Arc<RouteDef>,
    /// Route values merged from captures, segment defaults and route-level
    /// defaults, in that precedence order; every value lower-cased
    pub values: ParamVec,
}

impl RouteMatch {
    /// Get a route value by name.
    ///
    /// Uses "first write wins" semantics: captures were merged before
    /// defaults, so a capture always shadows a default of the same name.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert values to a HashMap for map-based callers.
    /// Note: this allocates - use get() in hot paths instead.
    #[must_use]
    pub fn values_map(&self) -> HashMap<String, String> {
        self.values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Outcome of testing a path against the table.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// A registered route matched; carries the extracted values
    Matched(RouteMatch),
    /// The path hit the ignore list and must not be dispatched
    Ignored,
    /// Nothing matched. Not an error: the expected 404 signal
    NoMatch,
}

#[derive(Clone)]
struct CompiledRoute {
    def: Arc<RouteDef>,
    template: Arc<CompiledTemplate>,
    /// Defaults not claimed by any template segment, applied after captures
    extra_defaults: Vec<(Arc<str>, String)>,
}

#[derive(Clone)]
struct IgnoreRoute {
    template: String,
    compiled: Arc<CompiledTemplate>,
}

/// Ordered route table with a separate ignore list.
///
/// Routes are matched in registration order and the first match wins; there
/// is no best-match scoring. Registration happens at startup, after which
/// the table is read-only and safe to share across request-handling threads
/// without locking.
#[derive(Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
    ignores: Vec<IgnoreRoute>,
    case_insensitive: bool,
    cache: Option<TemplateCache>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// An empty table matching case-insensitively (the default policy).
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            ignores: Vec::new(),
            case_insensitive: true,
            cache: None,
        }
    }

    /// An empty table matching case-sensitively.
    #[must_use]
    pub fn new_case_sensitive() -> Self {
        Self {
            case_insensitive: false,
            ..Self::new()
        }
    }

    /// Share a compiled-template cache with this table.
    #[must_use]
    pub fn with_cache(mut self, cache: TemplateCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register a route at the end of the match-priority order.
    ///
    /// # Errors
    ///
    /// Empty name, empty template, a case-insensitive name collision, or
    /// any template compilation error. All are configuration mistakes and
    /// surface here, never at match time.
    pub fn add(&mut self, def: RouteDef) -> Result<(), RouteError> {
        if def.name.is_empty() {
            return Err(RouteError::EmptyName);
        }
        if def.template.is_empty() {
            return Err(RouteError::EmptyTemplate { name: def.name });
        }
        if self
            .routes
            .iter()
            .any(|r| r.def.name.eq_ignore_ascii_case(&def.name))
        {
            return Err(RouteError::DuplicateName { name: def.name });
        }

        let template = self.compile_def(&def.template, &def.defaults, &def.constraints)?;
        let extra_defaults = def
            .defaults
            .iter()
            .filter(|(key, _)| {
                !template
                    .segments
                    .iter()
                    .any(|s| s.name.as_ref() == key.as_str())
            })
            .map(|(key, value)| (Arc::from(key.as_str()), value.clone()))
            .collect();

        debug!(route = %def.name, template = %def.template, "route registered");
        self.routes.push(CompiledRoute {
            def: Arc::new(def),
            template,
            extra_defaults,
        });
        Ok(())
    }

    /// Register an ignore pattern, checked before every ordinary route.
    ///
    /// A request matching it is never dispatched; the embedding server is
    /// expected to let its static-file or pass-through layer handle it.
    pub fn ignore(&mut self, template: &str) -> Result<(), RouteError> {
        self.ignore_with(template, HashMap::new())
    }

    /// Register an ignore pattern with segment constraints.
    pub fn ignore_with(
        &mut self,
        template: &str,
        constraints: HashMap<String, String>,
    ) -> Result<(), RouteError> {
        if template.is_empty() {
            return Err(RouteError::EmptyTemplate {
                name: "<ignore>".to_string(),
            });
        }
        let compiled = self.compile_def(template, &HashMap::new(), &constraints)?;
        self.ignores.push(IgnoreRoute {
            template: template.to_string(),
            compiled,
        });
        Ok(())
    }

    /// Empty both the route list and the ignore list.
    pub fn clear(&mut self) {
        self.routes.clear();
        self.ignores.clear();
    }

    /// Test a path against the ignore list, then the routes in registration
    /// order. The first successful pattern ends the scan.
    #[must_use]
    pub fn recognize(&self, path: &str) -> RouteOutcome {
        let path = normalize_path(path);
        debug!(path, "route match attempt");

        for ignore in &self.ignores {
            if ignore.compiled.regex().is_match(path) {
                debug!(path, template = %ignore.template, "path matched an ignore route");
                return RouteOutcome::Ignored;
            }
        }

        for route in &self.routes {
            let Some(caps) = route.template.regex().captures(path) else {
                trace!(path, route = %route.def.name, "route did not match");
                continue;
            };

            let mut values = ParamVec::new();
            for seg in &route.template.segments {
                if let Some(capture) = caps.name(&seg.name) {
                    if !capture.as_str().is_empty() {
                        values.push((Arc::clone(&seg.name), capture.as_str().to_lowercase()));
                        continue;
                    }
                }
                if let SegmentDefault::Value(default) = &seg.default {
                    values.push((Arc::clone(&seg.name), default.to_lowercase()));
                }
            }
            for (key, value) in &route.extra_defaults {
                if !values.iter().any(|(k, _)| k == key) {
                    values.push((Arc::clone(key), value.to_lowercase()));
                }
            }

            debug!(path, route = %route.def.name, values = ?values, "route matched");
            return RouteOutcome::Matched(RouteMatch {
                route: Arc::clone(&route.def),
                values,
            });
        }

        debug!(path, "no route matched");
        RouteOutcome::NoMatch
    }

    /// Like [`recognize`](Self::recognize), collapsing ignore hits and
    /// misses to `None`.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        match self.recognize(path) {
            RouteOutcome::Matched(matched) => Some(matched),
            RouteOutcome::Ignored | RouteOutcome::NoMatch => None,
        }
    }

    /// Registered route definitions in match-priority order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDef> {
        self.routes.iter().map(|r| r.def.as_ref())
    }

    /// Number of registered routes (ignores not included).
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Number of registered ignore patterns.
    #[must_use]
    pub fn ignore_count(&self) -> usize {
        self.ignores.len()
    }

    /// Print the compiled table to stdout.
    ///
    /// Useful for debugging and verifying that routes are loaded correctly.
    pub fn dump(&self) {
        println!(
            "[routes] count={} ignores={}",
            self.routes.len(),
            self.ignores.len()
        );
        for ignore in &self.ignores {
            println!(
                "[ignore] {} => {}",
                ignore.template, ignore.compiled.pattern
            );
        }
        for route in &self.routes {
            println!(
                "[route] {} {} => {}",
                route.def.name, route.def.template, route.template.pattern
            );
        }
    }

    fn compile_def(
        &self,
        template: &str,
        defaults: &HashMap<String, String>,
        constraints: &HashMap<String, String>,
    ) -> Result<Arc<CompiledTemplate>, RouteError> {
        match &self.cache {
            Some(cache) => {
                cache.get_or_compile(template, defaults, constraints, self.case_insensitive)
            }
            None => Ok(Arc::new(compile(
                template,
                defaults,
                constraints,
                self.case_insensitive,
            )?)),
        }
    }
}
