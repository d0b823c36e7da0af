//! Request classification.
//!
//! Decides which outgoing requests the proxy intercepts at all. Everything
//! else passes through untouched so non-idempotent calls and third-party
//! resources are never interfered with.

use shltr_core::{Method, Request};
use url::Url;

/// URLs ending in these extensions are treated as static assets even when
/// the declared destination is unhelpful.
fn has_static_extension(url: &Url) -> bool {
    let path = url.path();
    path.ends_with(".js") || path.ends_with(".css")
}

/// Whether the proxy should apply the network-first policy to this request.
///
/// Intercepts only same-origin GETs that are either a navigation or a
/// static asset (by destination type or file extension).
pub fn should_intercept(request: &Request, origin: &Url) -> bool {
    if request.method != Method::Get {
        return false;
    }
    if request.url.origin() != origin.origin() {
        return false;
    }

    request.is_navigation()
        || request.destination.is_static_asset()
        || has_static_extension(&request.url)
}
