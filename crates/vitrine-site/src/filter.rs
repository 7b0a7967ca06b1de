#![forbid(unsafe_code)]

//! Listing filters: which projects become carousel cards.
//!
//! Two filters exist, one per listing page:
//!
//! - [`ProjectFilter`] keeps projects tagged with any selected type and any
//!   selected style. An empty selection passes everything.
//! - [`GalleryFilter`] keeps projects whose grading and release year fall in
//!   the chosen ranges. A check applies only when the project carries that
//!   field, and a filter left at its defaults passes everything.
//!
//! A change in the filtered set changes the carousel's item count, so the
//! host re-arms media loading and relayouts after applying one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::Project;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bounds<T> {
    #[must_use]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Colour temperature slider range at rest, in kelvin.
pub const DEFAULT_COLOR_TEMP: Bounds<f64> = Bounds::new(2300.0, 7000.0);
/// Saturation slider range at rest, in percent.
pub const DEFAULT_SATURATION: Bounds<f64> = Bounds::new(0.0, 100.0);

// ---------------------------------------------------------------------------
// ProjectFilter
// ---------------------------------------------------------------------------

/// Type and style selection for the project list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectFilter {
    pub kinds: Vec<String>,
    pub styles: Vec<String>,
}

impl ProjectFilter {
    /// Whether any selection narrows the list.
    #[must_use]
    pub fn is_on(&self) -> bool {
        !self.kinds.is_empty() || !self.styles.is_empty()
    }

    /// Add `kind` to the selection, or remove it if already selected.
    pub fn toggle_kind(&mut self, kind: &str) {
        toggle(&mut self.kinds, kind);
    }

    /// Add `style` to the selection, or remove it if already selected.
    pub fn toggle_style(&mut self, style: &str) {
        toggle(&mut self.styles, style);
    }

    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        any_selected(&self.kinds, &project.kinds) && any_selected(&self.styles, &project.styles)
    }

    /// Projects that pass, in order.
    #[must_use]
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let kept: Vec<_> = projects.iter().filter(|p| self.matches(p)).collect();
        debug!(total = projects.len(), kept = kept.len(), on = self.is_on(), "project filter applied");
        kept
    }
}

fn any_selected(selected: &[String], tags: &[String]) -> bool {
    selected.is_empty() || tags.iter().any(|t| selected.contains(t))
}

fn toggle(selection: &mut Vec<String>, value: &str) {
    if let Some(i) = selection.iter().position(|s| s == value) {
        selection.remove(i);
    } else {
        selection.push(value.to_owned());
    }
}

// ---------------------------------------------------------------------------
// GalleryFilter
// ---------------------------------------------------------------------------

/// Grading and year ranges for the gallery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GalleryFilter {
    pub color_temp: Bounds<f64>,
    pub saturation: Bounds<f64>,
    pub years: Bounds<i32>,
    /// Full year span of the listing; the year slider's rest position.
    pub year_span: Bounds<i32>,
}

impl GalleryFilter {
    /// Filter at rest over a listing spanning `year_span`.
    #[must_use]
    pub fn new(year_span: Bounds<i32>) -> Self {
        Self {
            color_temp: DEFAULT_COLOR_TEMP,
            saturation: DEFAULT_SATURATION,
            years: year_span,
            year_span,
        }
    }

    /// Filter at rest over `projects`. A listing with no readable year
    /// spans the single year 0.
    #[must_use]
    pub fn for_projects(projects: &[Project]) -> Self {
        let (min, max) = crate::content::year_span(projects).unwrap_or((0, 0));
        Self::new(Bounds::new(min, max))
    }

    /// Whether any range differs from its rest position.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.color_temp != DEFAULT_COLOR_TEMP
            || self.saturation != DEFAULT_SATURATION
            || self.years != self.year_span
    }

    /// Back to rest.
    pub fn reset(&mut self) {
        *self = Self::new(self.year_span);
    }

    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        if !self.is_on() {
            return true;
        }
        if let Some(mid) = project.color_temp_filter.and_then(|c| c.midpoint())
            && !self.color_temp.contains(mid)
        {
            return false;
        }
        if let Some(sat) = project.saturation_filter
            && !self.saturation.contains(sat)
        {
            return false;
        }
        if let Some(year) = project.year_number()
            && !self.years.contains(year)
        {
            return false;
        }
        true
    }

    /// Projects that pass, in order.
    #[must_use]
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let kept: Vec<_> = projects.iter().filter(|p| self.matches(p)).collect();
        debug!(total = projects.len(), kept = kept.len(), on = self.is_on(), "gallery filter applied");
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ColorTempFilter, decode_projects};

    fn project(kinds: &[&str], styles: &[&str]) -> Project {
        Project {
            kinds: kinds.iter().map(|s| (*s).to_owned()).collect(),
            styles: styles.iter().map(|s| (*s).to_owned()).collect(),
            ..Project::default()
        }
    }

    #[test]
    fn empty_project_filter_passes_everything() {
        let filter = ProjectFilter::default();
        assert!(!filter.is_on());
        assert!(filter.matches(&project(&[], &[])));
    }

    #[test]
    fn project_filter_needs_any_type_and_any_style() {
        let projects = vec![
            project(&["Film"], &["Moody"]),
            project(&["Film", "Commercial"], &["Bright"]),
            project(&["Editorial"], &["Moody"]),
        ];
        let mut filter = ProjectFilter::default();
        filter.toggle_kind("Film");
        assert!(filter.is_on());
        assert_eq!(filter.apply(&projects).len(), 2);

        filter.toggle_style("Moody");
        let kept = filter.apply(&projects);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].kinds, vec!["Film"]);

        filter.toggle_kind("Film");
        filter.toggle_style("Moody");
        assert!(!filter.is_on());
        assert_eq!(filter.apply(&projects).len(), 3);
    }

    #[test]
    fn gallery_filter_at_rest_passes_everything() {
        let mut graded = project(&[], &[]);
        graded.color_temp_filter = Some(ColorTempFilter { min_temp: Some(9000.0), max_temp: Some(9500.0) });
        let filter = GalleryFilter::new(Bounds::new(2019, 2023));
        assert!(!filter.is_on());
        // Outside the slider's range, but the filter is off.
        assert!(filter.matches(&graded));
    }

    #[test]
    fn gallery_filter_checks_only_present_fields() {
        let projects = decode_projects(
            r#"[
                {"title": "Warm", "year": "2020", "colorTempFilter": {"minTemp": 2500, "maxTemp": 3500}, "saturationFilter": 60},
                {"title": "Cool", "year": "2022", "colorTempFilter": {"minTemp": 6000, "maxTemp": 7000}},
                {"title": "Ungraded", "year": "2023"},
                {"title": "Undated"}
            ]"#,
        )
        .unwrap();
        let mut filter = GalleryFilter::for_projects(&projects);
        assert_eq!(filter.year_span, Bounds::new(2020, 2023));

        filter.color_temp = Bounds::new(2300.0, 4000.0);
        let titles: Vec<_> = filter.apply(&projects).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Warm", "Ungraded", "Undated"]);

        filter.reset();
        filter.saturation = Bounds::new(0.0, 50.0);
        let titles: Vec<_> = filter.apply(&projects).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Cool", "Ungraded", "Undated"]);

        filter.reset();
        filter.years = Bounds::new(2021, 2023);
        let titles: Vec<_> = filter.apply(&projects).iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Cool", "Ungraded", "Undated"]);

        filter.reset();
        assert!(!filter.is_on());
        assert_eq!(filter.apply(&projects).len(), 4);
    }
}
