use std::fmt;

/// Route configuration error
///
/// Returned by `RouteTable::add`/`ignore` and by template compilation when a
/// route definition is malformed. These indicate a programming mistake in
/// route setup and surface at registration time, never while matching a
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// Route registered with an empty name
    EmptyName,
    /// Route registered with an empty template
    EmptyTemplate {
        /// Name of the offending route
        name: String,
    },
    /// Route name collides (case-insensitively) with an existing route
    DuplicateName {
        /// The colliding name
        name: String,
    },
    /// A segment carries both an inline `=value` default and an entry in the
    /// route's defaults map
    ///
    /// The two default channels are mutually exclusive per segment; an
    /// ambiguous specification is rejected rather than silently resolved.
    AmbiguousDefault {
        /// The segment name with two defaults
        segment: String,
    },
    /// A segment name that cannot be used as a capture group
    InvalidSegmentName {
        /// The rejected segment name
        segment: String,
    },
    /// The assembled pattern was rejected by the regex engine
    ///
    /// Usually caused by a malformed constraint fragment.
    InvalidPattern {
        /// The assembled whole-path pattern
        pattern: String,
        /// Error detail from the regex engine
        detail: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::EmptyName => {
                write!(f, "Route configuration error: route name must not be empty.")
            }
            RouteError::EmptyTemplate { name } => {
                write!(
                    f,
                    "Route configuration error: route '{}' has an empty template.",
                    name
                )
            }
            RouteError::DuplicateName { name } => {
                write!(
                    f,
                    "Route configuration error: a route named '{}' is already registered \
                    (names are compared case-insensitively).",
                    name
                )
            }
            RouteError::AmbiguousDefault { segment } => {
                write!(
                    f,
                    "Route configuration error: segment '{{{}}}' has both an inline default \
                    and an entry in the defaults map. Supply one or the other.",
                    segment
                )
            }
            RouteError::InvalidSegmentName { segment } => {
                write!(
                    f,
                    "Route configuration error: '{}' is not a valid segment name. \
                    Names must start with a letter or underscore and contain only \
                    letters, digits and underscores.",
                    segment
                )
            }
            RouteError::InvalidPattern { pattern, detail } => {
                write!(
                    f,
                    "Route configuration error: compiled pattern '{}' was rejected: {}",
                    pattern, detail
                )
            }
        }
    }
}

impl std::error::Error for RouteError {}
