#![forbid(unsafe_code)]

//! Motion tuning as data.
//!
//! Every tunable the engines take lives in one [`MotionConfig`] that loads
//! from TOML or JSON. Sections and fields are all optional; anything left
//! out keeps its default, and the defaults reproduce the site as shipped.
//!
//! ```toml
//! # vitrine.toml
//! [movement]
//! initial_delay_ms = 1500
//!
//! [carousel]
//! desktop_max = 55.0
//!
//! [site]
//! name = "Fairchild"
//! ```
//!
//! ```rust,ignore
//! let config = MotionConfig::load_toml_file("vitrine.toml")?;
//! let movement = MovementDetector::new(config.to_movement_options(), now);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use vitrine_core::Breakpoint;
use vitrine_motion::{
    AutoScrollOptions, CardSizing, DEFAULT_PARALLAX_STRENGTH, MovementOptions, ParallaxOptions,
    ProximityOptions, ScrollOptions, SizeRange, presets,
};

use crate::content::SiteSettings;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a motion configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ---------------------------------------------------------------------------
// Top-level MotionConfig
// ---------------------------------------------------------------------------

/// All motion and site-identity tunables.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    pub movement: MovementConfig,
    pub proximity: ProximityConfig,
    pub parallax: ParallaxConfig,
    pub carousel: CarouselConfig,
    pub scroll: ScrollConfig,
    pub auto_scroll: AutoScrollConfig,
    pub site: SiteConfig,
}

impl MotionConfig {
    /// Parse TOML without validating.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse JSON without validating.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse and validate TOML.
    pub fn load_toml_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str(s)?.validated()
    }

    /// Read, parse and validate a TOML file.
    pub fn load_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_toml_file(path)?.validated()?;
        info!(path = %path.display(), "loaded motion config");
        Ok(config)
    }

    /// Parse and validate JSON.
    pub fn load_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_json_str(s)?.validated()
    }

    /// Read, parse and validate a JSON file.
    pub fn load_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_file(path)?.validated()?;
        info!(path = %path.display(), "loaded motion config");
        Ok(config)
    }

    /// Pick the loader from the file extension (`.json`, otherwise TOML).
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::load_json_file(path),
            _ => Self::load_toml_file(path),
        }
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            for e in &errors {
                warn!(error = %e, "invalid motion config");
            }
            Err(ConfigError::Validation(errors))
        }
    }

    /// Check every parameter is in range.
    ///
    /// Returns a list of violations; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        // Movement
        if !(self.movement.threshold.is_finite() && self.movement.threshold >= 0.0) {
            errors.push(format!(
                "movement.threshold must be >= 0, got {}",
                self.movement.threshold
            ));
        }

        // Proximity
        let p = &self.proximity;
        if !(p.radius.is_finite() && p.radius > 0.0) {
            errors.push(format!("proximity.radius must be > 0, got {}", p.radius));
        }
        if !(p.min_scale.is_finite() && p.min_scale >= 0.0) {
            errors.push(format!("proximity.min_scale must be >= 0, got {}", p.min_scale));
        }
        if !(p.max_scale.is_finite() && p.max_scale >= p.min_scale) {
            errors.push(format!(
                "proximity.max_scale must be >= min_scale ({}), got {}",
                p.min_scale, p.max_scale
            ));
        }

        // Parallax
        if !self.parallax.strength.is_finite() {
            errors.push(format!(
                "parallax.strength must be finite, got {}",
                self.parallax.strength
            ));
        }
        if !(self.parallax.stiffness.is_finite() && self.parallax.stiffness > 0.0) {
            errors.push(format!(
                "parallax.stiffness must be > 0, got {}",
                self.parallax.stiffness
            ));
        }
        if !(self.parallax.damping.is_finite() && self.parallax.damping >= 0.0) {
            errors.push(format!(
                "parallax.damping must be >= 0, got {}",
                self.parallax.damping
            ));
        }
        if !(self.parallax.mass.is_finite() && self.parallax.mass > 0.0) {
            errors.push(format!("parallax.mass must be > 0, got {}", self.parallax.mass));
        }

        // Carousel
        let c = &self.carousel;
        for (name, min, max) in [
            ("desktop", c.desktop_min, c.desktop_max),
            ("handheld", c.handheld_min, c.handheld_max),
            ("featured", c.featured_min, c.featured_max),
        ] {
            if !(min.is_finite() && min > 0.0 && max.is_finite() && max >= min) {
                errors.push(format!(
                    "carousel.{name}_min/{name}_max must satisfy 0 < min <= max, got {min}/{max}"
                ));
            }
        }
        if !(c.scale_threshold.is_finite() && c.scale_threshold > 0.0) {
            errors.push(format!(
                "carousel.scale_threshold must be > 0, got {}",
                c.scale_threshold
            ));
        }
        if !(c.active_threshold.is_finite() && c.active_threshold >= 0.0) {
            errors.push(format!(
                "carousel.active_threshold must be >= 0, got {}",
                c.active_threshold
            ));
        }
        if !(0.0..=1.0).contains(&c.min_opacity) {
            errors.push(format!(
                "carousel.min_opacity must be in [0, 1], got {}",
                c.min_opacity
            ));
        }

        // Auto-scroll
        let a = &self.auto_scroll;
        if !(a.speed.is_finite() && a.speed >= 0.0) {
            errors.push(format!("auto_scroll.speed must be >= 0, got {}", a.speed));
        }
        if !(0.0..=1.0).contains(&a.hover_factor) {
            errors.push(format!(
                "auto_scroll.hover_factor must be in [0, 1], got {}",
                a.hover_factor
            ));
        }
        if a.initial_content_sets == 0 {
            errors.push("auto_scroll.initial_content_sets must be > 0".into());
        }
        if let Some(max) = a.max_content_sets
            && max < a.initial_content_sets
        {
            errors.push(format!(
                "auto_scroll.max_content_sets ({max}) must be >= initial_content_sets ({})",
                a.initial_content_sets
            ));
        }

        // Site
        if self.site.name.trim().is_empty() {
            errors.push("site.name must not be empty".into());
        }

        errors
    }

    #[must_use]
    pub fn to_movement_options(&self) -> MovementOptions {
        MovementOptions {
            initial_delay: Duration::from_millis(self.movement.initial_delay_ms),
            threshold: self.movement.threshold,
            sample_throttle: Duration::from_millis(self.movement.sample_throttle_ms),
        }
    }

    #[must_use]
    pub fn to_proximity_options(&self) -> ProximityOptions {
        ProximityOptions {
            max_scale: self.proximity.max_scale,
            min_scale: self.proximity.min_scale,
            radius: self.proximity.radius,
        }
    }

    #[must_use]
    pub fn to_parallax_options(&self) -> ParallaxOptions {
        ParallaxOptions {
            strength: self.parallax.strength,
            stiffness: self.parallax.stiffness,
            damping: self.parallax.damping,
            mass: self.parallax.mass,
        }
    }

    /// Gallery carousel sizing for `breakpoint`.
    #[must_use]
    pub fn to_carousel_sizing(&self, breakpoint: Breakpoint) -> CardSizing {
        let c = &self.carousel;
        let range = if breakpoint.is_handheld() {
            SizeRange {
                min: c.handheld_min,
                max: c.handheld_max,
            }
        } else {
            SizeRange {
                min: c.desktop_min,
                max: c.desktop_max,
            }
        };
        self.sizing(range)
    }

    /// Featured-project list sizing (handheld layout).
    #[must_use]
    pub fn to_featured_sizing(&self) -> CardSizing {
        self.sizing(SizeRange {
            min: self.carousel.featured_min,
            max: self.carousel.featured_max,
        })
    }

    fn sizing(&self, range: SizeRange) -> CardSizing {
        CardSizing {
            range,
            scale_threshold: self.carousel.scale_threshold,
            active_threshold: self.carousel.active_threshold,
            min_opacity: self.carousel.min_opacity,
        }
    }

    /// Glide used for general programmatic scrolls.
    #[must_use]
    pub fn to_scroll_options(&self) -> ScrollOptions {
        ScrollOptions::default().with_duration(Duration::from_millis(self.scroll.duration_ms))
    }

    /// Glide used to center the selected carousel card.
    #[must_use]
    pub fn to_centering_scroll_options(&self) -> ScrollOptions {
        ScrollOptions::default()
            .with_duration(Duration::from_millis(self.carousel.center_duration_ms))
    }

    #[must_use]
    pub fn to_auto_scroll_options(&self) -> AutoScrollOptions {
        let a = &self.auto_scroll;
        AutoScrollOptions {
            start_delay: Duration::from_millis(a.start_delay_ms),
            speed: a.speed,
            hover_factor: a.hover_factor,
            inactivity_desktop: Duration::from_millis(a.inactivity_desktop_ms),
            inactivity_handheld: Duration::from_millis(a.inactivity_handheld_ms),
            initial_content_sets: a.initial_content_sets,
            max_content_sets: a.max_content_sets,
        }
    }

    /// Site identity, as the header's default text.
    #[must_use]
    pub fn to_site_settings(&self) -> SiteSettings {
        SiteSettings {
            site_name: self.site.name.clone(),
            tagline: self.site.tagline.clone(),
            ..SiteSettings::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Sections (flat, serde-friendly)
// ---------------------------------------------------------------------------

/// Engagement detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Warm-up before input counts. Default: 2000.
    pub initial_delay_ms: u64,
    /// Pixels from baseline that count as movement. Default: 5.
    pub threshold: f64,
    /// Per-dimension sample spacing. Default: 100.
    pub sample_throttle_ms: u64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 2000,
            threshold: 5.0,
            sample_throttle_ms: 100,
        }
    }
}

/// Pointer-proximity emphasis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProximityConfig {
    /// Default: 1.0.
    pub max_scale: f64,
    /// Default: 0.5.
    pub min_scale: f64,
    /// Falloff distance in pixels. Default: 300.
    pub radius: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            max_scale: 1.0,
            min_scale: 0.5,
            radius: 300.0,
        }
    }
}

/// Parallax layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxConfig {
    /// Default: 1500.
    pub strength: f64,
    /// Default: 100.
    pub stiffness: f64,
    /// Default: 30.
    pub damping: f64,
    /// Default: 1.
    pub mass: f64,
}

impl Default for ParallaxConfig {
    fn default() -> Self {
        let spring = presets::follow();
        Self {
            strength: DEFAULT_PARALLAX_STRENGTH,
            stiffness: spring.stiffness(),
            damping: spring.damping(),
            mass: spring.mass(),
        }
    }
}

/// Card carousel widths (viewport-width units) and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Default: 30.
    pub desktop_min: f64,
    /// Default: 50.
    pub desktop_max: f64,
    /// Default: 50.
    pub handheld_min: f64,
    /// Default: 100.
    pub handheld_max: f64,
    /// Default: 40.
    pub featured_min: f64,
    /// Default: 100.
    pub featured_max: f64,
    /// Fraction of viewport height over which width falls. Default: 0.5.
    pub scale_threshold: f64,
    /// Fraction of viewport height within which a card is active. Default: 0.1.
    pub active_threshold: f64,
    /// Default: 1.0.
    pub min_opacity: f64,
    /// Centering glide. Default: 2000.
    pub center_duration_ms: u64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        let sizing = CardSizing::new(SizeRange::DESKTOP);
        Self {
            desktop_min: SizeRange::DESKTOP.min,
            desktop_max: SizeRange::DESKTOP.max,
            handheld_min: SizeRange::HANDHELD.min,
            handheld_max: SizeRange::HANDHELD.max,
            featured_min: SizeRange::FEATURED_HANDHELD.min,
            featured_max: SizeRange::FEATURED_HANDHELD.max,
            scale_threshold: sizing.scale_threshold,
            active_threshold: sizing.active_threshold,
            min_opacity: sizing.min_opacity,
            center_duration_ms: 2000,
        }
    }
}

/// Programmatic scrolling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Default: 1200.
    pub duration_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { duration_ms: 1200 }
    }
}

/// Hands-free scrolling on the information page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoScrollConfig {
    /// Default: 2000.
    pub start_delay_ms: u64,
    /// Pixels per frame. Default: 2.
    pub speed: f64,
    /// Default: 0.3.
    pub hover_factor: f64,
    /// Default: 3000.
    pub inactivity_desktop_ms: u64,
    /// Default: 5000.
    pub inactivity_handheld_ms: u64,
    /// Default: 2.
    pub initial_content_sets: usize,
    /// Default: unbounded.
    pub max_content_sets: Option<usize>,
}

impl Default for AutoScrollConfig {
    fn default() -> Self {
        Self {
            start_delay_ms: 2000,
            speed: 2.0,
            hover_factor: 0.3,
            inactivity_desktop_ms: 3000,
            inactivity_handheld_ms: 5000,
            initial_content_sets: 2,
            max_content_sets: None,
        }
    }
}

/// Site identity shown when nothing claims the header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Default: "Fairchild".
    pub name: String,
    /// Default: empty.
    pub tagline: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let settings = SiteSettings::default();
        Self {
            name: settings.site_name,
            tagline: settings.tagline,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_engine_defaults() {
        let config = MotionConfig::default();
        assert_eq!(config.to_movement_options(), MovementOptions::default());
        assert_eq!(config.to_proximity_options(), ProximityOptions::default());
        assert_eq!(config.to_parallax_options(), ParallaxOptions::default());
        assert_eq!(config.to_auto_scroll_options(), AutoScrollOptions::default());
        assert_eq!(
            config.to_carousel_sizing(Breakpoint::Desktop),
            CardSizing::new(SizeRange::DESKTOP)
        );
        assert_eq!(
            config.to_carousel_sizing(Breakpoint::Mobile),
            CardSizing::new(SizeRange::HANDHELD)
        );
        assert_eq!(
            config.to_featured_sizing(),
            CardSizing::new(SizeRange::FEATURED_HANDHELD)
        );
        assert_eq!(config.to_scroll_options().duration, Duration::from_millis(1200));
        assert_eq!(
            config.to_centering_scroll_options().duration,
            Duration::from_millis(2000)
        );
        assert_eq!(config.to_site_settings(), SiteSettings::default());
    }

    #[test]
    fn default_validates_clean() {
        assert!(MotionConfig::default().validate().is_empty());
    }

    #[test]
    fn partial_toml_preserves_defaults() {
        let config = MotionConfig::from_toml_str(
            r#"
            [movement]
            initial_delay_ms = 1500

            [carousel]
            desktop_max = 55.0
            "#,
        )
        .unwrap();
        assert_eq!(config.movement.initial_delay_ms, 1500);
        assert_eq!(config.movement.threshold, 5.0);
        assert_eq!(config.carousel.desktop_max, 55.0);
        assert_eq!(config.carousel.desktop_min, 30.0);
        assert_eq!(config.parallax, ParallaxConfig::default());
    }

    #[test]
    fn partial_json_preserves_defaults() {
        let config =
            MotionConfig::from_json_str(r#"{"auto_scroll": {"max_content_sets": 8}}"#).unwrap();
        assert_eq!(config.auto_scroll.max_content_sets, Some(8));
        assert_eq!(config.auto_scroll.speed, 2.0);
        assert_eq!(config.to_auto_scroll_options().max_content_sets, Some(8));
    }

    #[test]
    fn empty_input_is_default() {
        assert_eq!(MotionConfig::from_toml_str("").unwrap(), MotionConfig::default());
        assert_eq!(MotionConfig::from_json_str("{}").unwrap(), MotionConfig::default());
    }

    #[test]
    fn validate_catches_bad_radius() {
        let mut config = MotionConfig::default();
        config.proximity.radius = 0.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("proximity.radius"));
    }

    #[test]
    fn validate_catches_inverted_range() {
        let mut config = MotionConfig::default();
        config.carousel.handheld_min = 120.0;
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.contains("carousel.handheld_min")));
    }

    #[test]
    fn validate_catches_cap_below_initial() {
        let mut config = MotionConfig::default();
        config.auto_scroll.max_content_sets = Some(1);
        assert!(config.validate()[0].contains("max_content_sets"));
    }

    #[test]
    fn multiple_validation_errors_collected() {
        let mut config = MotionConfig::default();
        config.movement.threshold = -1.0;
        config.parallax.mass = 0.0;
        config.auto_scroll.hover_factor = 2.0;
        config.site.name = "  ".into();
        assert_eq!(config.validate().len(), 4);
    }

    #[test]
    fn load_rejects_invalid() {
        let err = MotionConfig::load_toml_str("[parallax]\nstiffness = -5.0\n").unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert!(errors[0].contains("parallax.stiffness"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn parse_errors_are_typed() {
        assert!(matches!(
            MotionConfig::from_toml_str("[movement\n"),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            MotionConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            MotionConfig::from_toml_str("[movement]\nthreshold = \"far\"\n"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn validation_error_display_joins() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
    }

    #[test]
    fn site_identity_flows_to_settings() {
        let config = MotionConfig::from_toml_str("[site]\nname = \"Studio\"\ntagline = \"Moving pictures\"\n")
            .unwrap();
        let settings = config.to_site_settings();
        assert_eq!(settings.site_name, "Studio");
        assert_eq!(settings.tagline, "Moving pictures");
    }
}
