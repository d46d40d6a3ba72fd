//! Deep link router for dexterm screens
//!
//! ## Supported Routes
//!
//! - `dexterm://home` (or empty) - Catalog listing
//! - `dexterm://types` - Category listing
//! - `dexterm://types/<name>` - Creatures of one category
//! - `dexterm://favorites` - Favorites listing
//! - `dexterm://pokemon/<name>` - Single creature details
//!
//! The scheme is case-insensitive and may use one or several slashes. The
//! same paths are accepted as `#/types/Feu` and `/types/Feu`. Query strings
//! and fragments are ignored; path segments are percent-decoded.

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    match s.find(['?', '#']) {
        Some(i) => &s[..i],
        None => s,
    }
}

/// Extract path after dexterm:// scheme (case-insensitive, handles variants)
#[inline]
fn after_scheme(raw: &str) -> Option<&str> {
    let s = raw.trim();
    let rest = if let Some(pos) = s.find("://") {
        if !s[..pos].eq_ignore_ascii_case("dexterm") {
            return None;
        }
        &s[pos + 3..]
    } else {
        let (scheme, rest) = s.split_once(':')?;
        if !scheme.eq_ignore_ascii_case("dexterm") {
            return None;
        }
        rest
    };
    Some(rest.trim_start_matches('/'))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Types,
    TypeDetail { name: String },
    Favorites,
    Creature { name: String },
}

impl Route {
    /// Canonical link for this route.
    pub fn to_link(&self) -> String {
        match self {
            Route::Home => "dexterm://home".to_string(),
            Route::Types => "dexterm://types".to_string(),
            Route::TypeDetail { name } => format!("dexterm://types/{}", urlencoding::encode(name)),
            Route::Favorites => "dexterm://favorites".to_string(),
            Route::Creature { name } => format!("dexterm://pokemon/{}", urlencoding::encode(name)),
        }
    }
}

fn segment(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    let s = decoded.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Parse a route; `None` for unknown pages or missing names.
pub fn parse(raw: &str) -> Option<Route> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(Route::Home);
    }

    let path = if let Some(rest) = after_scheme(s) {
        rest
    } else if let Some(rest) = s.strip_prefix("#/") {
        rest
    } else if let Some(rest) = s.strip_prefix('/') {
        rest
    } else {
        s
    };
    let path = strip_query_frag(path);

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let page = segments.next().unwrap_or("").to_ascii_lowercase();
    match page.as_str() {
        "" | "home" => Some(Route::Home),
        "types" | "categories" => match segments.next() {
            None => Some(Route::Types),
            Some(name) => Some(Route::TypeDetail { name: segment(name)? }),
        },
        "favorites" | "favoris" => Some(Route::Favorites),
        "pokemon" | "creature" => Some(Route::Creature {
            name: segment(segments.next()?)?,
        }),
        _ => None,
    }
}
