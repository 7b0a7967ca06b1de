#![forbid(unsafe_code)]

//! Page routes and the navigation lifecycle.
//!
//! Every completed navigation produces a fresh [`RouteKey`]. Engines that
//! must start over on a new page (movement detectors, the header) bind to
//! the key signal rather than to the path, so navigating to the same path
//! twice still re-arms them.
//!
//! # State Machine
//!
//! ```text
//! Idle ──begin──▶ ChangeStart ──complete──▶ ChangeComplete
//!                    ▲    │                       │
//!                    └────┘ (begin again)         │
//!                    ▲                            │
//!                    └──────────begin─────────────┘
//! ```

use std::cell::RefCell;

use tracing::{debug, info};
use vitrine_core::{BatchScope, Signal};

use crate::header::HeaderStore;

/// A parsed page path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/gallery`
    Gallery,
    /// `/projects`
    Projects,
    /// `/projects/<slug>`; nested segments are kept joined.
    ProjectDetail(String),
    /// `/information`
    Information,
    /// Anything else, normalized.
    Other(String),
}

impl Route {
    /// Parse a path. Query strings, fragments and trailing slashes are
    /// ignored.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');
        match trimmed {
            "" => Self::Home,
            "gallery" => Self::Gallery,
            "projects" => Self::Projects,
            "information" => Self::Information,
            _ => match trimmed.strip_prefix("projects/") {
                Some(slug) if !slug.is_empty() => Self::ProjectDetail(slug.to_string()),
                _ => Self::Other(format!("/{trimmed}")),
            },
        }
    }

    /// Canonical path for this route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Gallery => "/gallery".into(),
            Self::Projects => "/projects".into(),
            Self::ProjectDetail(slug) => format!("/projects/{slug}"),
            Self::Information => "/information".into(),
            Self::Other(path) => path.clone(),
        }
    }

    /// Navigation label to highlight. Only the four top-level pages have
    /// one; detail pages and unknown paths highlight nothing.
    #[must_use]
    pub fn active_link(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Gallery => "Gallery",
            Self::Projects => "Projects",
            Self::Information => "Information",
            Self::ProjectDetail(_) | Self::Other(_) => "",
        }
    }
}

/// Identity of one page visit. Changes on every completed navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteKey {
    /// Route the visit landed on.
    pub route: Route,
    /// Completed navigations so far; bumps even on a same-route visit.
    pub generation: u64,
}

/// Where the router is in a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutePhase {
    /// No navigation has run yet.
    #[default]
    Idle,
    /// A navigation started; nothing has reset.
    ChangeStart,
    /// The last navigation finished and bumped the key.
    ChangeComplete,
}

/// Drives navigation and owns the reset key.
#[derive(Debug)]
pub struct Router {
    key: Signal<RouteKey>,
    phase: Signal<RoutePhase>,
    header: HeaderStore,
    pending: RefCell<Option<Route>>,
}

impl Router {
    /// Start on `path` with generation 0.
    #[must_use]
    pub fn new(path: &str, header: HeaderStore) -> Self {
        Self {
            key: Signal::new(RouteKey {
                route: Route::parse(path),
                generation: 0,
            }),
            phase: Signal::new(RoutePhase::Idle),
            header,
            pending: RefCell::new(None),
        }
    }

    /// Reset key: bind engines that restart per page visit to this.
    #[must_use]
    pub fn key(&self) -> &Signal<RouteKey> {
        &self.key
    }

    #[must_use]
    pub fn phase(&self) -> &Signal<RoutePhase> {
        &self.phase
    }

    #[must_use]
    pub fn current(&self) -> Route {
        self.key.with(|k| k.route.clone())
    }

    #[must_use]
    pub fn active_link(&self) -> &'static str {
        self.key.with(|k| k.route.active_link())
    }

    #[must_use]
    pub fn header(&self) -> &HeaderStore {
        &self.header
    }

    /// Route a navigation is heading to, if one is in flight.
    #[must_use]
    pub fn pending(&self) -> Option<Route> {
        self.pending.borrow().clone()
    }

    /// Begin navigating to `path`. A second call before completion
    /// retargets the navigation.
    pub fn begin_navigation(&self, path: &str) -> Route {
        let route = Route::parse(path);
        debug!(to = %route.path(), "route change start");
        *self.pending.borrow_mut() = Some(route.clone());
        self.phase.set(RoutePhase::ChangeStart);
        route
    }

    /// Finish the in-flight navigation: bump the key, reset the header.
    /// Returns the new key, or `None` when nothing was pending.
    pub fn complete_navigation(&self) -> Option<RouteKey> {
        let route = self.pending.borrow_mut().take()?;
        let generation = self.key.with(|k| k.generation) + 1;
        let key = RouteKey { route, generation };
        {
            let _batch = BatchScope::new();
            self.key.set(key.clone());
            self.header.reset_for_route();
            self.phase.set(RoutePhase::ChangeComplete);
        }
        info!(
            route = %key.route.path(),
            generation,
            "route change complete"
        );
        Some(key)
    }

    /// `begin_navigation` then `complete_navigation`.
    pub fn navigate(&self, path: &str) -> RouteKey {
        self.begin_navigation(path);
        // Just set above, so always present.
        self.complete_navigation().unwrap_or_else(|| self.key.get())
    }
}
