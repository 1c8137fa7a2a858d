//! Fragment routing
//!
//! This module translates between URL fragments and navigation targets:
//! - Route definitions with fragment encoding
//! - Pattern-based fragment parsing with Home as the fallback
//!
//! ```text
//! #                          -> Home
//! #main                      -> Home
//! #list                      -> Feed
//! #category/<id>             -> Category(<id>)
//! #item/<categoryId>/<itemId> -> Category(<categoryId>), open item <itemId>
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Route Parameters
// =============================================================================

/// Parameters captured from a fragment
pub type RouteParams = HashMap<String, String>;

// =============================================================================
// Route Definitions
// =============================================================================

/// Every navigable state of the site
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "route", content = "params")]
pub enum Route {
    /// Home view
    #[default]
    Home,
    /// Feed listing every category
    Feed,
    /// One category grid
    Category {
        /// Category identifier
        id: String,
    },
    /// A category with one of its items projected into the overlay
    Item {
        /// Owning category identifier
        category: String,
        /// Item key within the category
        item: String,
    },
}

impl Route {
    /// Fragment for this route, including the leading `#`
    pub fn to_fragment(&self) -> String {
        match self {
            Route::Home => "#main".to_string(),
            Route::Feed => "#list".to_string(),
            Route::Category { id } => format!("#category/{}", urlencoding::encode(id)),
            Route::Item { category, item } => format!(
                "#item/{}/{}",
                urlencoding::encode(category),
                urlencoding::encode(item)
            ),
        }
    }

    /// Logical page rendered for this route
    pub fn page(&self) -> Page {
        match self {
            Route::Home => Page::Home,
            Route::Feed => Page::Feed,
            Route::Category { .. } | Route::Item { .. } => Page::Category,
        }
    }

    /// Category the route shows, if any
    pub fn category(&self) -> Option<&str> {
        match self {
            Route::Category { id } => Some(id),
            Route::Item { category, .. } => Some(category),
            Route::Home | Route::Feed => None,
        }
    }
}

/// Logical page names used by views and menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    /// Home view
    Home,
    /// Feed view
    Feed,
    /// A category view
    Category,
}

/// Result of parsing a fragment
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedRoute {
    /// View to show
    pub route: Route,
    /// Item to open once the category grid has loaded
    pub pending_item: Option<String>,
}

impl ParsedRoute {
    fn view(route: Route) -> Self {
        Self { route, pending_item: None }
    }

    /// Logical page to show
    pub fn page(&self) -> Page {
        self.route.page()
    }

    /// Category to show, if any
    pub fn category(&self) -> Option<&str> {
        self.route.category()
    }

    /// The full route including the pending item
    pub fn full_route(&self) -> Route {
        match (&self.route, &self.pending_item) {
            (Route::Category { id }, Some(item)) => Route::Item {
                category: id.clone(),
                item: item.clone(),
            },
            (route, _) => route.clone(),
        }
    }
}

// =============================================================================
// Router
// =============================================================================

/// Fragment pattern
struct RoutePattern {
    /// Pattern segments
    segments: Vec<PatternSegment>,
    /// Whether trailing segments are rejected
    exact: bool,
    /// Route builder
    builder: fn(RouteParams) -> Option<ParsedRoute>,
}

/// Segment type in a pattern
#[derive(Debug, Clone)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

/// Fragment router
pub struct Router {
    patterns: Vec<RoutePattern>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router").field("patterns", &self.patterns.len()).finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Create a router with the site's routes
    pub fn new() -> Self {
        let mut router = Self { patterns: Vec::new() };

        router.add_route("", true, |_| Some(ParsedRoute::view(Route::Home)));
        router.add_route("main", true, |_| Some(ParsedRoute::view(Route::Home)));
        router.add_route("list", true, |_| Some(ParsedRoute::view(Route::Feed)));
        router.add_route("category/:id", false, |params| {
            Some(ParsedRoute::view(Route::Category {
                id: non_empty(params.get("id"))?,
            }))
        });
        router.add_route("item/:category/:item", false, |params| {
            Some(ParsedRoute {
                route: Route::Category {
                    id: non_empty(params.get("category"))?,
                },
                pending_item: non_empty(params.get("item")),
            })
        });

        router
    }

    fn add_route(&mut self, pattern: &str, exact: bool, builder: fn(RouteParams) -> Option<ParsedRoute>) {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    PatternSegment::Param(param.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        self.patterns.push(RoutePattern { segments, exact, builder });
    }

    /// Parse a fragment; unrecognized input degrades to Home
    pub fn parse(&self, fragment: &str) -> ParsedRoute {
        let body = fragment.strip_prefix('#').unwrap_or(fragment);
        let segments: Vec<&str> = if body.is_empty() { Vec::new() } else { body.split('/').collect() };

        for pattern in &self.patterns {
            if let Some(params) = Self::match_pattern(pattern, &segments) {
                if let Some(parsed) = (pattern.builder)(params) {
                    return parsed;
                }
            }
        }

        ParsedRoute::view(Route::Home)
    }

    /// Fragment for a route
    pub fn encode(&self, route: &Route) -> String {
        route.to_fragment()
    }

    fn match_pattern(pattern: &RoutePattern, path: &[&str]) -> Option<RouteParams> {
        if path.len() < pattern.segments.len() || (pattern.exact && path.len() != pattern.segments.len()) {
            return None;
        }

        let mut params = RouteParams::new();
        for (segment, actual) in pattern.segments.iter().zip(path.iter()) {
            match segment {
                PatternSegment::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                PatternSegment::Param(name) => {
                    params.insert(name.clone(), urlencoding::decode(actual).ok()?.into_owned());
                }
            }
        }

        Some(params)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str) -> Route {
        Route::Category { id: id.to_string() }
    }

    #[test]
    fn test_home_fragments() {
        let router = Router::new();
        for fragment in ["", "#", "#main"] {
            assert_eq!(router.parse(fragment).route, Route::Home, "fragment {fragment:?}");
        }
    }

    #[test]
    fn test_feed_fragment_is_exact() {
        let router = Router::new();
        assert_eq!(router.parse("#list").route, Route::Feed);
        assert_eq!(router.parse("#list/extra").route, Route::Home);
    }

    #[test]
    fn test_category_takes_first_segment() {
        let router = Router::new();
        assert_eq!(router.parse("#category/coding").route, category("coding"));
        assert_eq!(router.parse("#category/coding/ignored").route, category("coding"));
        assert_eq!(router.parse("#category/").route, Route::Home);
        assert_eq!(router.parse("#category").route, Route::Home);
    }

    #[test]
    fn test_item_deep_link() {
        let router = Router::new();
        let parsed = router.parse("#item/coding/42");
        assert_eq!(parsed.route, category("coding"));
        assert_eq!(parsed.pending_item.as_deref(), Some("42"));
        assert_eq!(parsed.page(), Page::Category);
    }

    #[test]
    fn test_item_needs_two_segments() {
        let router = Router::new();
        assert_eq!(router.parse("#item/coding").route, Route::Home);

        let parsed = router.parse("#item/coding/");
        assert_eq!(parsed.route, category("coding"));
        assert_eq!(parsed.pending_item, None);
    }

    #[test]
    fn test_unknown_fragments_fall_back_home() {
        let router = Router::new();
        for fragment in ["#nope", "#categoryfoo", "#main/x", "garbage"] {
            assert_eq!(router.parse(fragment), ParsedRoute::default(), "fragment {fragment:?}");
        }
    }

    #[test]
    fn test_round_trip() {
        let router = Router::new();
        let routes = [
            Route::Home,
            Route::Feed,
            category("coding"),
            Route::Item { category: "coding".to_string(), item: "42".to_string() },
        ];
        for route in routes {
            let fragment = router.encode(&route);
            assert_eq!(router.parse(&fragment).full_route(), route, "fragment {fragment}");
        }
    }

    #[test]
    fn test_ids_are_percent_encoded() {
        let route = category("web dev");
        assert_eq!(route.to_fragment(), "#category/web%20dev");
        assert_eq!(Router::new().parse("#category/web%20dev").route, route);
    }

    #[test]
    fn test_route_serialization() {
        let route = Route::Item { category: "coding".to_string(), item: "7".to_string() };
        let json = serde_json::to_string(&route).unwrap();
        let parsed: Route = serde_json::from_str(&json).unwrap();
        assert_eq!(route, parsed);
    }
}
