//! Navigation routes of the gallery.

use std::sync::LazyLock;

use regex::Regex;

use super::entities::PhotoId;

/// Path of the photo list, where the root redirects to.
pub const PHOTOS_PATH: &str = "/photos";

static DETAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/photos/([^/?#]+)/?$").expect("valid route regex"));

/// A resolved location in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Redirect to another path.
    Redirect(String),
    /// The accumulating photo grid.
    PhotoList,
    /// Detail view of a single photo.
    PhotoDetail(PhotoId),
    /// Anything that did not match.
    NotFound(String),
}

impl Route {
    /// Matches a path against the routing table.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        match path {
            "" | "/" => Self::Redirect(PHOTOS_PATH.to_string()),
            "/photos" | "/photos/" => Self::PhotoList,
            _ => DETAIL_RE
                .captures(path)
                .and_then(|caps| caps.get(1))
                .map_or_else(
                    || Self::NotFound(path.to_string()),
                    |id| Self::PhotoDetail(PhotoId::new(id.as_str())),
                ),
        }
    }

    /// Follows redirects until a renderable route is reached.
    #[must_use]
    pub fn resolve(path: &str) -> Self {
        let mut route = Self::parse(path);
        // The table has a single redirect, a small bound guards against cycles.
        for _ in 0..4 {
            match route {
                Self::Redirect(target) => route = Self::parse(&target),
                other => return other,
            }
        }
        route
    }

    /// Returns the canonical path of this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Redirect(target) => target.clone(),
            Self::PhotoList => PHOTOS_PATH.to_string(),
            Self::PhotoDetail(id) => format!("{PHOTOS_PATH}/{id}"),
            Self::NotFound(path) => path.clone(),
        }
    }

    /// Route of the home screen.
    #[must_use]
    pub fn home() -> Self {
        Self::resolve("/")
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}
