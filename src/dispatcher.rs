//! Controller/action dispatch.
//!
//! The routing layer produces a value map; something has to turn
//! `controller=home, action=index` into running code. Handlers are
//! registered once at startup under their controller/action pair and
//! resolved by map lookup per request - no runtime class loading, no
//! reflection.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::router::{RouteMatch, RouteOutcome};

/// What an action produced.
///
/// `Redirect` is plain data interpreted by the embedding server loop;
/// termination never travels as an exception or early exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionResult {
    /// Rendered response body
    Content(String),
    /// Send the client elsewhere
    Redirect {
        location: String,
        permanent: bool,
    },
    /// The action declined the request
    NotFound,
}

/// Handler resolved from the registry per request.
pub type Handler = Arc<dyn Fn(&RouteMatch) -> ActionResult + Send + Sync>;

/// Outcome of dispatching a [`RouteOutcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// A handler ran and produced a result
    Handled(ActionResult),
    /// The path hit the ignore list; let the static-file layer serve it
    PassThrough,
    /// No matching route, or no handler registered for the matched one
    NotFound,
}

/// Registry mapping `controller.action` keys to handlers.
///
/// Built once at startup; cheap to clone and safe to share across
/// request-handling threads.
#[derive(Clone, Default)]
pub struct Dispatcher {
    handlers: HashMap<String, Handler>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a controller/action pair.
    ///
    /// Keys are lower-cased to line up with the lower-cased route values.
    pub fn register<F>(&mut self, controller: &str, action: &str, handler: F)
    where
        F: Fn(&RouteMatch) -> ActionResult + Send + Sync + 'static,
    {
        let key = format!("{}.{}", controller.to_lowercase(), action.to_lowercase());
        self.handlers.insert(key, Arc::new(handler));
    }

    /// Number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the handler selected by a route outcome.
    #[must_use]
    pub fn dispatch(&self, outcome: RouteOutcome) -> DispatchResult {
        let matched = match outcome {
            RouteOutcome::Matched(matched) => matched,
            RouteOutcome::Ignored => return DispatchResult::PassThrough,
            RouteOutcome::NoMatch => return DispatchResult::NotFound,
        };

        let (Some(controller), Some(action)) = (matched.get("controller"), matched.get("action"))
        else {
            warn!(
                route = %matched.route.name,
                "matched route carries no controller/action values"
            );
            return DispatchResult::NotFound;
        };

        let key = format!("{}.{}", controller, action);
        match self.handlers.get(&key) {
            Some(handler) => {
                debug!(route = %matched.route.name, key = %key, "dispatching");
                DispatchResult::Handled(handler(&matched))
            }
            None => {
                debug!(key = %key, "no handler registered");
                DispatchResult::NotFound
            }
        }
    }
}
