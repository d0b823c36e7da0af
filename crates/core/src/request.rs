//! Read-only descriptions of outgoing page requests.
//!
//! A [`Request`] carries everything the proxy needs to classify traffic:
//! method, target URL, navigation-vs-subresource mode, and the destination
//! type the page declared for the resource.

use url::Url;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    /// Wire representation of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
        }
    }
}

/// Request mode, distinguishing top-level navigations from subresources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Loads a new top-level document.
    Navigate,
    SameOrigin,
    #[default]
    NoCors,
    Cors,
}

/// Declared destination type of the requested resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    Font,
    Manifest,
    #[default]
    Other,
}

impl Destination {
    /// Whether this destination counts as a cacheable static asset.
    pub fn is_static_asset(&self) -> bool {
        matches!(
            self,
            Self::Style | Self::Script | Self::Image | Self::Font | Self::Manifest
        )
    }
}

/// An intercepted outgoing request.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub mode: Mode,
    pub destination: Destination,
}

impl Request {
    /// Create a request with the given method and URL.
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url, mode: Mode::default(), destination: Destination::default() }
    }

    /// Convenience constructor for a plain GET subresource request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url)
    }

    /// Mark this request as a top-level navigation.
    pub fn navigate(mut self) -> Self {
        self.mode = Mode::Navigate;
        self.destination = Destination::Document;
        self
    }

    /// Set the request mode.
    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the destination type.
    pub fn destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Whether this request loads a new top-level document.
    pub fn is_navigation(&self) -> bool {
        self.mode == Mode::Navigate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
    }

    #[test]
    fn test_static_asset_destinations() {
        assert!(Destination::Style.is_static_asset());
        assert!(Destination::Script.is_static_asset());
        assert!(Destination::Image.is_static_asset());
        assert!(Destination::Font.is_static_asset());
        assert!(Destination::Manifest.is_static_asset());
        assert!(!Destination::Document.is_static_asset());
        assert!(!Destination::Other.is_static_asset());
    }

    #[test]
    fn test_navigate_sets_mode_and_destination() {
        let url = Url::parse("https://app.test/").unwrap();
        let req = Request::get(url).navigate();
        assert!(req.is_navigation());
        assert_eq!(req.destination, Destination::Document);
    }

    #[test]
    fn test_default_request_is_subresource() {
        let url = Url::parse("https://app.test/data.json").unwrap();
        let req = Request::get(url);
        assert!(!req.is_navigation());
        assert_eq!(req.destination, Destination::Other);
    }
}
