#![forbid(unsafe_code)]

//! Shared header display state.
//!
//! The site header shows the site identity by default. Any interactive
//! element (a hovered gallery card, a centered carousel slide) can *claim*
//! the header to show its own project text; when it loses focus it gives
//! the header back.
//!
//! # Invariants
//!
//! 1. Last claim wins. A new claim replaces the text immediately; there is
//!    no queue and no merging.
//! 2. Releasing a claim restores the site identity with `is_hovering =
//!    false`, but only if that claim is still the current owner. A claim
//!    superseded by a later one releases as a no-op.
//! 3. Dropping a [`HeaderClaim`] releases it, so an element that unmounts
//!    can never leave stale text behind.
//! 4. A route change resets the header unconditionally.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use tracing::debug;
use vitrine_core::{Breakpoint, Signal};

use crate::content::{Project, SiteSettings};

/// Text block shown in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderText {
    /// Large left-hand text: site name or client.
    pub logo: String,
    /// Line under the logo: tagline or project title.
    pub tagline: String,
    /// Project categories, comma-joined.
    pub kind: String,
    /// Release year; empty when hidden.
    pub year: String,
}

impl HeaderText {
    /// Site identity: name as the logo, tagline beneath it.
    #[must_use]
    pub fn identity(settings: &SiteSettings) -> Self {
        Self {
            logo: settings.site_name.clone(),
            tagline: settings.tagline.clone(),
            kind: String::new(),
            year: String::new(),
        }
    }

    /// Project text: client as the logo, title as the tagline. The year is
    /// dropped on handheld viewports where the header has no room for it.
    #[must_use]
    pub fn for_project(project: &Project, breakpoint: Breakpoint) -> Self {
        Self {
            logo: project.client.clone(),
            tagline: project.title.clone(),
            kind: project.kind_label(),
            year: if breakpoint.is_handheld() {
                String::new()
            } else {
                project.year.clone()
            },
        }
    }
}

/// Full header state as rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderState {
    /// What the header shows.
    pub text: HeaderText,
    /// A claim currently owns the header.
    pub is_hovering: bool,
    /// A project detail page is open.
    pub is_project_view: bool,
}

/// Identifies one claim on the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClaimId(u64);

struct Shared {
    state: Signal<HeaderState>,
    identity: HeaderText,
    next_claim: Cell<u64>,
    owner: Cell<Option<ClaimId>>,
}

impl Shared {
    fn restore(&self) {
        let identity = self.identity.clone();
        self.state.update(|s| {
            s.text = identity;
            s.is_hovering = false;
        });
    }

    fn release(&self, id: ClaimId) -> bool {
        if self.owner.get() != Some(id) {
            debug!(claim = id.0, "header release ignored, claim superseded");
            return false;
        }
        self.owner.set(None);
        self.restore();
        debug!(claim = id.0, "header released");
        true
    }
}

/// The single header store for a page tree. Cheap to clone; clones share
/// state.
#[derive(Clone)]
pub struct HeaderStore {
    shared: Rc<Shared>,
}

impl std::fmt::Debug for HeaderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderStore")
            .field("state", &self.shared.state.get())
            .field("owner", &self.shared.owner.get())
            .finish()
    }
}

impl HeaderStore {
    /// Create a store showing `identity`.
    #[must_use]
    pub fn new(identity: HeaderText) -> Self {
        let state = HeaderState {
            text: identity.clone(),
            is_hovering: false,
            is_project_view: false,
        };
        Self {
            shared: Rc::new(Shared {
                state: Signal::new(state),
                identity,
                next_claim: Cell::new(0),
                owner: Cell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &SiteSettings) -> Self {
        Self::new(HeaderText::identity(settings))
    }

    /// Reactive header state.
    #[must_use]
    pub fn state(&self) -> &Signal<HeaderState> {
        &self.shared.state
    }

    #[must_use]
    pub fn current(&self) -> HeaderState {
        self.shared.state.get()
    }

    #[must_use]
    pub fn identity(&self) -> &HeaderText {
        &self.shared.identity
    }

    /// Current owner, if any claim is live.
    #[must_use]
    pub fn owner(&self) -> Option<ClaimId> {
        self.shared.owner.get()
    }

    /// Show `text` and mark the header as hovered. Supersedes any earlier
    /// claim.
    #[must_use = "dropping the claim releases the header immediately"]
    pub fn claim(&self, text: HeaderText) -> HeaderClaim {
        let id = ClaimId(self.shared.next_claim.get());
        self.shared.next_claim.set(id.0 + 1);
        if let Some(prev) = self.shared.owner.replace(Some(id)) {
            debug!(claim = id.0, superseded = prev.0, "header claim supersedes");
        } else {
            debug!(claim = id.0, logo = %text.logo, "header claimed");
        }
        self.shared.state.update(|s| {
            s.text = text;
            s.is_hovering = true;
        });
        HeaderClaim {
            shared: Rc::downgrade(&self.shared),
            id,
            released: false,
        }
    }

    /// Toggle the project overlay flag. Independent of claims.
    pub fn set_project_view(&self, on: bool) {
        self.shared.state.update(|s| s.is_project_view = on);
    }

    /// Drop any owner and return to the site identity with no overlay.
    pub fn reset_for_route(&self) {
        self.shared.owner.set(None);
        let identity = self.shared.identity.clone();
        self.shared.state.set(HeaderState {
            text: identity,
            is_hovering: false,
            is_project_view: false,
        });
        debug!("header reset for route change");
    }
}

/// A live claim on the header. Releases on drop.
pub struct HeaderClaim {
    shared: Weak<Shared>,
    id: ClaimId,
    released: bool,
}

impl std::fmt::Debug for HeaderClaim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderClaim")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish()
    }
}

impl HeaderClaim {
    #[must_use]
    pub fn id(&self) -> ClaimId {
        self.id
    }

    /// Whether this claim still owns the header.
    #[must_use]
    pub fn is_current(&self) -> bool {
        !self.released
            && self
                .shared
                .upgrade()
                .is_some_and(|shared| shared.owner.get() == Some(self.id))
    }

    /// Replace the shown text while still owning the header. Returns
    /// `false` (and changes nothing) once superseded.
    pub fn retext(&self, text: HeaderText) -> bool {
        if !self.is_current() {
            return false;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.state.update(|s| s.text = text);
        }
        true
    }

    /// Give the header back. Returns whether the header was restored.
    pub fn release(mut self) -> bool {
        self.release_inner()
    }

    fn release_inner(&mut self) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        self.shared
            .upgrade()
            .is_some_and(|shared| shared.release(self.id))
    }
}

impl Drop for HeaderClaim {
    fn drop(&mut self) {
        self.release_inner();
    }
}
