#![forbid(unsafe_code)]

//! Site: the portfolio front end's shared state and wiring.
//!
//! # Role in Vitrine
//! `vitrine-site` is the top layer. It owns what is shared across a whole
//! page tree: the header display state, the router and its reset key, the
//! content records read from the headless store, and the motion tuning
//! loaded from disk.
//!
//! # Primary responsibilities
//! - **HeaderStore**: last-writer-wins header claims with RAII release.
//! - **Router**: route parsing, nav labels, and a per-visit reset key.
//! - **Content**: serde records for projects, media and site settings.
//! - **Filters**: type/style and grading/year selection of listed projects.
//! - **MotionConfig**: every engine tunable as TOML/JSON data.
//! - **SiteSession**: input, frames, router and engines wired from config.
//! - **Telemetry**: `tracing-subscriber` installation for hosts.

pub mod config;
pub mod content;
pub mod filter;
pub mod header;
pub mod route;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, MotionConfig};
pub use content::{
    ColorTempFilter, ContentError, GalleryItem, MediaAsset, Project, SiteSettings,
    decode_projects, decode_site_settings, gallery_counts, year_span,
};
pub use filter::{Bounds, GalleryFilter, ProjectFilter};
pub use header::{ClaimId, HeaderClaim, HeaderState, HeaderStore, HeaderText};
pub use route::{Route, RouteKey, RoutePhase, Router};
pub use session::SiteSession;
pub use telemetry::{LogFormat, TelemetryError};
