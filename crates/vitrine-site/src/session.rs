#![forbid(unsafe_code)]

//! One running site: input, frames, header, router and the page-wide
//! engines, wired together from a [`MotionConfig`].
//!
//! A host feeds platform events to [`SiteSession::dispatch`] and calls
//! [`SiteSession::run_frame`] once per animation frame. Page components
//! ask the session for engines already tuned from the config
//! ([`carousel`](SiteSession::carousel), [`pointer_parallax`](SiteSession::pointer_parallax),
//! ...) and keep the returned bindings for as long as they are mounted.
//!
//! # Invariants
//!
//! 1. The movement detector re-arms on every completed navigation.
//! 2. A completed navigation resets the header and jumps the root scroll
//!    to the top without animating.
//! 3. Wheel input reaches the root scroller even while a programmatic
//!    glide is running, and cancels it.
//! 4. Native scroll offsets are adopted by the root scroller only while
//!    no glide is running.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, info_span};
use vitrine_core::{Clock, InputEvent, InputHub, Signal, Subscriptions, Viewport};
use vitrine_motion::{
    AutoScrollBinding, AutoScroller, CardCarousel, CarouselBinding, FrameHandle, FrameLoop, MovementBinding,
    MovementDetector, ParallaxBinding, ParallaxFollower, ProximityField, ScrollOptions,
    SmoothScroller,
};
use web_time::Instant;

use crate::config::MotionConfig;
use crate::content::Project;
use crate::header::{HeaderClaim, HeaderStore, HeaderText};
use crate::route::{RouteKey, Router};

/// A live site.
#[derive(Debug)]
pub struct SiteSession {
    config: MotionConfig,
    hub: InputHub,
    frames: FrameLoop,
    router: Router,
    movement: MovementBinding,
    scroller: Rc<RefCell<SmoothScroller>>,
    _subs: Subscriptions,
    _drive: FrameHandle,
}

impl SiteSession {
    /// Start on `path` at `viewport`. `clock` supplies re-arm times for
    /// the movement detector.
    pub fn new<C>(config: MotionConfig, path: &str, viewport: Viewport, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        let _span = info_span!("site_session", path).entered();
        let hub = InputHub::new(viewport);
        let frames = FrameLoop::new();
        let header = HeaderStore::from_settings(&config.to_site_settings());
        let router = Router::new(path, header);

        let movement = MovementDetector::new(config.to_movement_options(), clock.now()).bind(
            &hub,
            router.key(),
            &frames,
            clock,
        );

        let scroller = Rc::new(RefCell::new(SmoothScroller::new(hub.scroll().clone())));
        let drive = SmoothScroller::drive(&scroller, &frames);

        let mut subs = Subscriptions::new();
        let s = Rc::clone(&scroller);
        subs.add(hub.events().subscribe(move |timed| {
            let Some(timed) = timed else { return };
            let mut scroller = s.borrow_mut();
            match timed.event {
                InputEvent::Wheel { .. } => scroller.handle_event(&timed.event),
                // Native scroll reports echo our own glide; only adopt them
                // while idle.
                InputEvent::Scroll { .. } if !scroller.is_animating() => {
                    scroller.handle_event(&timed.event);
                }
                _ => {}
            }
        }));

        let s = Rc::clone(&scroller);
        subs.add(router.key().subscribe(move |_| {
            s.borrow_mut().scroll_to(0.0, ScrollOptions::immediate());
        }));

        debug!(
            breakpoint = %viewport.breakpoint(),
            "site session started"
        );

        Self {
            config,
            hub,
            frames,
            router,
            movement,
            scroller,
            _subs: subs,
            _drive: drive,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    #[must_use]
    pub fn hub(&self) -> &InputHub {
        &self.hub
    }

    #[must_use]
    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn header(&self) -> &HeaderStore {
        self.router.header()
    }

    #[must_use]
    pub fn movement(&self) -> &MovementBinding {
        &self.movement
    }

    /// Root scroll driver.
    #[must_use]
    pub fn scroller(&self) -> &Rc<RefCell<SmoothScroller>> {
        &self.scroller
    }

    pub fn dispatch(&self, event: InputEvent, now: Instant) {
        self.hub.dispatch(event, now);
    }

    /// Run one animation frame. Returns the number of callbacks run.
    pub fn run_frame(&self, now: Instant) -> usize {
        self.frames.run_frame(now)
    }

    /// Navigate to `path` in one step.
    pub fn navigate(&self, path: &str) -> RouteKey {
        self.router.navigate(path)
    }

    /// Show `project` in the header, sized for the current viewport.
    #[must_use = "dropping the claim releases the header immediately"]
    pub fn claim_project(&self, project: &Project) -> HeaderClaim {
        let text = HeaderText::for_project(project, self.hub.viewport().breakpoint());
        self.header().claim(text)
    }

    /// A gallery carousel sized for the current viewport.
    #[must_use]
    pub fn carousel(&self) -> CardCarousel {
        let viewport = self.hub.viewport();
        CardCarousel::new(
            self.config.to_carousel_sizing(viewport.breakpoint()),
            viewport.height(),
        )
    }

    /// The featured-project list used on handheld viewports.
    #[must_use]
    pub fn featured_carousel(&self) -> CardCarousel {
        CardCarousel::new(self.config.to_featured_sizing(), self.hub.viewport().height())
    }

    /// Glide `scroller` so the carousel's selected card sits mid-viewport.
    /// Fires once per selection; returns whether a glide started.
    pub fn center_carousel(&self, carousel: &CarouselBinding, scroller: &mut SmoothScroller) -> bool {
        let height = self.hub.viewport().height();
        // Take the target first: an instant scroll writes the sampler the
        // carousel itself listens to.
        let Some(target) = carousel.update(|c| c.take_centering_target(height)) else {
            return false;
        };
        debug!(target, "centering carousel selection");
        scroller.scroll_to(target, self.config.to_centering_scroll_options());
        true
    }

    /// A parallax layer following `driver`.
    #[must_use]
    pub fn parallax(&self, driver: Signal<Option<f64>>) -> ParallaxBinding {
        let viewport = self.hub.viewport();
        ParallaxFollower::new(self.config.to_parallax_options(), viewport.height()).bind(
            driver,
            viewport,
            &self.frames,
        )
    }

    /// A parallax layer following the pointer's vertical position.
    #[must_use]
    pub fn pointer_parallax(&self) -> ParallaxBinding {
        self.parallax(self.hub.pointer().signal().map(|s| s.y))
    }

    /// A proximity field over the live pointer.
    #[must_use]
    pub fn proximity_field(&self) -> ProximityField {
        ProximityField::attach(
            self.config.to_proximity_options(),
            self.hub.pointer(),
            &self.frames,
        )
    }

    /// Auto-scroll the root container, starting the delay at `now`.
    #[must_use]
    pub fn auto_scroll(&self, content_height: Signal<f64>, now: Instant) -> AutoScrollBinding {
        AutoScroller::new(self.config.to_auto_scroll_options(), now).bind(
            Rc::clone(&self.scroller),
            &self.hub,
            self.hub.viewport(),
            content_height,
            &self.frames,
        )
    }
}
