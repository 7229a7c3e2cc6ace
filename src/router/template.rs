//! Route template compiler.
//!
//! Translates one route template string into an ordered list of
//! [`CompiledSegment`]s plus an assembled whole-path regular expression.
//!
//! A template mixes literal text with placeholders:
//!
//! ```text
//! {name}            required segment, matches [^/]+ unless constrained
//! {name=default}    optional segment with inline default value
//! {name?}           optional segment, no substitution if absent
//! {*name}           catch-all, matches across '/' to the end of the path
//! ```
//!
//! Compilation happens once per registered route. Placeholder parsing,
//! default resolution and constraint lookup all fail loudly here, at
//! registration time; matching a request later can only succeed or miss.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

use super::error::RouteError;

/// Segment names double as regex capture-group names, so they are held to
/// identifier shape.
static SEGMENT_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("segment name pattern is valid")
});

/// Default behavior of one template segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentDefault {
    /// No default; the path must supply a value.
    Required,
    /// Backfilled with this value when the path omits the segment.
    Value(String),
    /// `{name?}`: valid to omit, nothing is ever backfilled.
    Optional,
}

/// One compiled placeholder with the literal text anchored around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSegment {
    /// Variable name, shared with every match extracted from this template
    pub name: Arc<str>,
    /// Regex fragment for this placeholder (a named capture group)
    pub pattern: String,
    /// Default behavior when the path omits the segment
    pub default: SegmentDefault,
    /// Escaped literal text between the previous placeholder's boundary and
    /// this one
    pub before: String,
    /// Escaped literal text trailing this placeholder up to the boundary
    pub after: String,
    /// The trailing separator is not a literal `/`; no boundary is inserted
    pub glued: bool,
    /// Last segment of the template
    pub is_end: bool,
    /// Immediately precedes the trailing run of optional segments
    pub is_pre_end: bool,
    /// `{*name}`: matches across `/`
    pub catch_all: bool,
}

impl CompiledSegment {
    /// Whether the path may omit this segment.
    #[must_use]
    pub fn optional(&self) -> bool {
        !matches!(self.default, SegmentDefault::Required)
    }
}

/// A template compiled to segments and an anchored pattern.
///
/// Structurally identical for identical inputs, so instances are safe to
/// cache and share keyed by their inputs.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    /// Placeholders in template order
    pub segments: Vec<CompiledSegment>,
    /// The assembled `^...$` pattern source
    pub pattern: String,
    regex: Regex,
}

impl CompiledTemplate {
    /// The compiled whole-path expression.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

/// Compile a route template against its defaults and constraints maps.
///
/// # Errors
///
/// Configuration errors only: an ambiguous default (inline `=value` plus a
/// defaults-map entry for the same segment), a segment name unusable as a
/// capture group, or a constraint the regex engine rejects.
pub fn compile(
    template: &str,
    defaults: &HashMap<String, String>,
    constraints: &HashMap<String, String>,
    case_insensitive: bool,
) -> Result<CompiledTemplate, RouteError> {
    let mut segments: Vec<CompiledSegment> = Vec::new();
    // Raw literal text accumulated since the last kept placeholder.
    let mut pending = String::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let (literal, from_open) = rest.split_at(open);
        pending.push_str(literal);
        match from_open[1..].find('}') {
            Some(close) => {
                let token = &from_open[1..1 + close];
                rest = &from_open[close + 2..];
                push_segment(token, &mut segments, &mut pending, defaults, constraints, template)?;
            }
            None => {
                // A '{' with no closing brace is literal text.
                pending.push_str(from_open);
                rest = "";
            }
        }
    }
    pending.push_str(rest);

    // Tail literal stays attached to the last placeholder; the trailing
    // separator is appended during assembly.
    if !pending.is_empty() {
        if let Some(last) = segments.last_mut() {
            last.after = regex::escape(pending.as_str());
        }
    }

    let count = segments.len();
    if let Some(last) = segments.last_mut() {
        last.is_end = true;
    }
    // The segment just before the trailing run of optional segments may end
    // the path without any of the optional values following it.
    let mut run_start = count;
    while run_start > 0 && segments[run_start - 1].optional() {
        run_start -= 1;
    }
    if run_start > 0 && run_start < count {
        segments[run_start - 1].is_pre_end = true;
    }

    let mut pattern = String::with_capacity(template.len() + 16);
    pattern.push('^');
    if segments.is_empty() {
        pattern.push_str(&regex::escape(pending.as_str()));
        pattern.push_str("(/|)");
    } else {
        for seg in &segments {
            pattern.push_str(&seg.before);
            pattern.push_str(&seg.pattern);
            pattern.push_str(&seg.after);
            if !seg.glued {
                if seg.optional() || seg.is_end || seg.is_pre_end {
                    pattern.push_str("(/|)");
                } else {
                    pattern.push('/');
                }
            }
        }
    }
    pattern.push('$');

    let regex = RegexBuilder::new(&pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.clone(),
            detail: e.to_string(),
        })?;

    debug!(
        template,
        pattern = %pattern,
        segments = segments.len(),
        "compiled route template"
    );

    Ok(CompiledTemplate {
        segments,
        pattern,
        regex,
    })
}

/// Parse one placeholder token and append its segment, distributing the
/// accumulated literal text between it and its predecessor.
fn push_segment(
    token: &str,
    segments: &mut Vec<CompiledSegment>,
    pending: &mut String,
    defaults: &HashMap<String, String>,
    constraints: &HashMap<String, String>,
    template: &str,
) -> Result<(), RouteError> {
    let (name, inline_default) = match token.split_once('=') {
        Some((n, v)) => (n, Some(v.to_string())),
        None => (token, None),
    };
    let (name, optional_marker) = if inline_default.is_none() {
        match name.strip_suffix('?') {
            Some(n) => (n, true),
            None => (name, false),
        }
    } else {
        (name, false)
    };
    let (name, catch_all) = match name.strip_prefix('*') {
        Some(n) => (n, true),
        None => (name, false),
    };

    if !SEGMENT_NAME.is_match(name) {
        return Err(RouteError::InvalidSegmentName {
            segment: name.to_string(),
        });
    }

    if segments.iter().any(|s| s.name.as_ref() == name) {
        warn!(
            segment = name,
            template, "duplicate segment name in template; keeping the first occurrence"
        );
        // The duplicate contributes no capture. Its surrounding literal text
        // is kept and merges into the next segment's boundary text.
        return Ok(());
    }

    let default = match (inline_default, defaults.get(name)) {
        (Some(_), Some(_)) => {
            return Err(RouteError::AmbiguousDefault {
                segment: name.to_string(),
            });
        }
        (Some(v), None) => SegmentDefault::Value(v),
        (None, Some(v)) => SegmentDefault::Value(v.clone()),
        (None, None) if optional_marker => SegmentDefault::Optional,
        (None, None) => SegmentDefault::Required,
    };
    let optional = !matches!(default, SegmentDefault::Required);

    // Literal text since the previous placeholder. The first '/' is the
    // segment boundary: text left of it closes the previous segment, text
    // right of it opens this one. No '/' at all means the two placeholders
    // share a path segment and are glued together.
    let mut before = String::new();
    if segments.is_empty() {
        before = regex::escape(pending.as_str());
    } else if let Some(slash) = pending.find('/') {
        let (left, right) = pending.split_at(slash);
        if let Some(prev) = segments.last_mut() {
            prev.after = regex::escape(left);
        }
        before = regex::escape(&right[1..]);
    } else if !pending.is_empty() {
        if let Some(prev) = segments.last_mut() {
            prev.after = regex::escape(pending.as_str());
            prev.glued = true;
        }
    }
    pending.clear();

    let pattern = if catch_all {
        match constraints.get(name) {
            Some(constraint) => format!("(?P<{}>{})", name, constraint),
            None => format!("(?P<{}>.*)", name),
        }
    } else {
        match (constraints.get(name), optional) {
            (Some(constraint), true) => format!("(?P<{}>({})|)", name, constraint),
            (Some(constraint), false) => format!("(?P<{}>{})", name, constraint),
            (None, true) => format!("(?P<{}>[^/]*)", name),
            (None, false) => format!("(?P<{}>[^/]+)", name),
        }
    };

    segments.push(CompiledSegment {
        name: Arc::from(name),
        pattern,
        default,
        before,
        after: String::new(),
        glued: false,
        is_end: false,
        is_pre_end: false,
        catch_all,
    });
    Ok(())
}
