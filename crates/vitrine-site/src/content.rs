#![forbid(unsafe_code)]

//! Read-only content records from the headless content store.
//!
//! The store answers queries with camelCase JSON. Records here mirror the
//! fields the front end actually reads; everything is defaulted so a sparse
//! or partially-filled document still decodes.
//!
//! # Failure Modes
//!
//! - Malformed JSON fails the whole decode with [`ContentError::Json`].
//! - Missing fields never fail: strings default to empty, lists to empty,
//!   media to `None`.
//! - The store has served `type` both as a single string and as a list,
//!   and `thumbnailColor` both as a hex string and as a `{hex}` object.
//!   Both shapes are accepted.
//! - Taxonomy lists (`type`, `styles`, `projectTypes`, `projectStyles`)
//!   hold plain strings or dereferenced `{name}` documents. Entries with
//!   no name (an unresolved reference) are dropped.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from decoding content documents.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to decode content JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ContentError>;

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

/// Resolved asset reference: an image URL, a video playback id, or both.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssetRef {
    pub url: Option<String>,
    pub playback_id: Option<String>,
    pub metadata: Option<AssetMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetMetadata {
    /// Low-quality inline placeholder (data URL).
    pub lqip: Option<String>,
}

/// An image or video field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaAsset {
    pub asset: Option<AssetRef>,
    pub alt: Option<String>,
}

impl MediaAsset {
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.asset.as_ref()?.url.as_deref()
    }

    #[must_use]
    pub fn playback_id(&self) -> Option<&str> {
        self.asset.as_ref()?.playback_id.as_deref()
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.asset.as_ref()?.metadata.as_ref()?.lqip.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// One still in a project's gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GalleryItem {
    pub image: Option<MediaAsset>,
    #[serde(deserialize_with = "deserialize_color")]
    pub thumbnail_color: Option<String>,
    pub color_temp_filter: Option<ColorTempFilter>,
    pub saturation_filter: Option<f64>,
}

/// Colour temperature grading of a still or project, in kelvin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColorTempFilter {
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

impl ColorTempFilter {
    /// Midpoint of the graded range. Needs both ends set and non-zero.
    #[must_use]
    pub fn midpoint(&self) -> Option<f64> {
        match (self.min_temp, self.max_temp) {
            (Some(min), Some(max)) if min != 0.0 && max != 0.0 => Some((min + max) / 2.0),
            _ => None,
        }
    }
}

/// A credit line on a project page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credit {
    pub role: String,
    pub title: String,
    pub link: Option<String>,
}

/// A portfolio entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub title: String,
    pub client: String,
    /// Project categories.
    #[serde(rename = "type", deserialize_with = "deserialize_one_or_many")]
    pub kinds: Vec<String>,
    #[serde(deserialize_with = "deserialize_one_or_many")]
    pub styles: Vec<String>,
    pub year: String,
    pub credits: Vec<Credit>,
    #[serde(deserialize_with = "deserialize_color")]
    pub thumbnail_color: Option<String>,
    pub video: Option<MediaAsset>,
    /// Still shown before (or instead of) the video.
    #[serde(alias = "fallbackImage")]
    pub image: Option<MediaAsset>,
    pub color_temp_filter: Option<ColorTempFilter>,
    pub saturation_filter: Option<f64>,
    pub gallery: Vec<GalleryItem>,
    #[serde(deserialize_with = "deserialize_slug")]
    pub slug: Option<String>,
}

impl Project {
    /// Categories joined for display, e.g. `"Film, Commercial"`.
    #[must_use]
    pub fn kind_label(&self) -> String {
        self.kinds.join(", ")
    }

    /// Release year as a number. Leading digits count, so `"2023 (re-cut)"`
    /// is 2023.
    #[must_use]
    pub fn year_number(&self) -> Option<i32> {
        let year = self.year.trim_start();
        let end = year.find(|c: char| !c.is_ascii_digit()).unwrap_or(year.len());
        year[..end].parse().ok()
    }
}

/// Earliest and latest release year across `projects`.
#[must_use]
pub fn year_span(projects: &[Project]) -> Option<(i32, i32)> {
    projects
        .iter()
        .filter_map(Project::year_number)
        .fold(None, |span, y| match span {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
}

/// Gallery lengths in order, the shape the carousel's flat indexing needs.
#[must_use]
pub fn gallery_counts(projects: &[Project]) -> Vec<usize> {
    projects.iter().map(|p| p.gallery.len()).collect()
}

/// Find a project by its URL slug.
#[must_use]
pub fn find_by_slug<'a>(projects: &'a [Project], slug: &str) -> Option<&'a Project> {
    projects.iter().find(|p| p.slug.as_deref() == Some(slug))
}

// ---------------------------------------------------------------------------
// Site settings
// ---------------------------------------------------------------------------

/// Site identity and taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(alias = "referenceTitle")]
    pub site_name: String,
    pub tagline: String,
    #[serde(deserialize_with = "deserialize_one_or_many")]
    pub project_types: Vec<String>,
    #[serde(deserialize_with = "deserialize_one_or_many")]
    pub project_styles: Vec<String>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Fairchild".into(),
            tagline: String::new(),
            project_types: Vec::new(),
            project_styles: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a project list query result.
pub fn decode_projects(json: &str) -> Result<Vec<Project>> {
    let projects: Vec<Project> = serde_json::from_str(json)?;
    debug!(count = projects.len(), "decoded projects");
    Ok(projects)
}

/// Decode the site settings document. A `null` document yields defaults.
pub fn decode_site_settings(json: &str) -> Result<SiteSettings> {
    let settings: Option<SiteSettings> = serde_json::from_str(json)?;
    Ok(settings.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Label {
    Plain(String),
    Named { name: Option<String> },
    Null(()),
}

impl Label {
    fn into_name(self) -> Option<String> {
        match self {
            Label::Plain(s) | Label::Named { name: Some(s) } if !s.is_empty() => Some(s),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Label),
    Many(Vec<Label>),
}

fn deserialize_one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(label) => label.into_name().into_iter().collect(),
        OneOrMany::Many(labels) => labels.into_iter().filter_map(Label::into_name).collect(),
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Object { hex: Option<String> },
    Null(()),
}

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ColorValue::deserialize(deserializer)? {
        ColorValue::Hex(s) => Some(s),
        ColorValue::Object { hex } => hex,
        ColorValue::Null(()) => None,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SlugValue {
    Plain(String),
    Object { current: Option<String> },
    Null(()),
}

fn deserialize_slug<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SlugValue::deserialize(deserializer)? {
        SlugValue::Plain(s) => Some(s),
        SlugValue::Object { current } => current,
        SlugValue::Null(()) => None,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
