//! Lifecycle and request logging helpers.
//!
//! Thin wrappers around `tracing` macros so that every part of the crate
//! reports the same events with the same field names.

use crate::compiler::Strategy;
use std::time::Duration;

// =============================================================================
// Registration
// =============================================================================

/// Log route registration. Logged at Trace level.
///
/// # Example
///
/// ```rust,ignore
/// log_route_registered(0, "GET", "/users/{id:number}", Some("users.show"));
/// ```
pub fn log_route_registered(index: usize, method: &str, definition: &str, name: Option<&str>) {
    tracing::trace!(
        index = %index,
        method = %method,
        definition = %definition,
        name = name.unwrap_or("-"),
        "Route registered"
    );
}

/// Log a rejected route definition. Logged at Debug level.
pub fn log_route_rejected(method: &str, definition: &str, reason: &str) {
    tracing::debug!(
        method = %method,
        definition = %definition,
        reason = %reason,
        "Route rejected"
    );
}

// =============================================================================
// Compilation
// =============================================================================

/// Log router compilation. Logged at Debug level.
///
/// # Example
///
/// ```rust,ignore
/// log_router_compiled(Strategy::TreePattern, 12, start.elapsed());
/// ```
pub fn log_router_compiled(strategy: Strategy, route_count: usize, elapsed: Duration) {
    tracing::debug!(
        strategy = %strategy,
        route_count = %route_count,
        elapsed_us = %elapsed.as_micros(),
        "Router compiled"
    );
}

// =============================================================================
// Matching
// =============================================================================

pub(crate) fn log_request_matched(method: &str, path: &str, index: usize) {
    tracing::trace!(method = %method, path = %path, route = %index, "Request matched");
}

pub(crate) fn log_request_not_found(method: &str, path: &str) {
    tracing::trace!(method = %method, path = %path, "No route matches path");
}

pub(crate) fn log_method_not_allowed(method: &str, path: &str, allow: &str) {
    tracing::trace!(
        method = %method,
        path = %path,
        allow = %allow,
        "Method not allowed"
    );
}
