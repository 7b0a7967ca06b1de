//! End-to-end scenarios for the site layer.
//!
//! 1. `header` – claims from hovered and centered elements, released by
//!    unmounting.
//! 2. `navigation` – a completed route change resets the header and
//!    re-arms engagement detection.
//! 3. `config_files` – tuning loaded from disk drives the engines.
//! 4. `content` – decoded projects feed carousel indexing and header text.
//! 5. `filters` – narrowing the listing changes the carousel's card count.

use std::io::Write;
use std::time::Duration;

use vitrine_core::{Breakpoint, InputEvent, ManualClock, Viewport};
use vitrine_motion::selected_gallery_index;
use vitrine_site::{
    Bounds, ConfigError, GalleryFilter, HeaderStore, HeaderText, MotionConfig, ProjectFilter,
    Route, RoutePhase, Router, SiteSession, SiteSettings, decode_projects, gallery_counts,
};
use web_time::Instant;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

const PROJECTS: &str = r##"[
    {"title": "Night Swim", "client": "Aesop", "type": ["Film"], "year": "2023",
     "gallery": [{}, {}, {}], "slug": {"current": "night-swim"}},
    {"title": "Dust", "client": "Nike", "type": "Commercial", "year": "2021",
     "gallery": [{}, {}], "slug": {"current": "dust"}}
]"##;

mod header {
    use super::*;

    #[test]
    fn unmounting_the_claimant_restores_identity() {
        let store = HeaderStore::from_settings(&SiteSettings {
            site_name: "Fairchild".into(),
            tagline: "Moving pictures".into(),
            ..SiteSettings::default()
        });
        let card = store.claim(HeaderText {
            logo: "Aesop".into(),
            tagline: "Night Swim".into(),
            kind: "Film".into(),
            year: "2023".into(),
        });
        assert!(store.current().is_hovering);
        assert_eq!(store.current().text.logo, "Aesop");

        // The card unmounts without a hover-end.
        drop(card);
        let state = store.current();
        assert_eq!(state.text.logo, "Fairchild");
        assert_eq!(state.text.tagline, "Moving pictures");
        assert!(!state.is_hovering);
    }

    #[test]
    fn rapid_hover_handoff_never_clobbers_new_owner() {
        let store = HeaderStore::from_settings(&SiteSettings::default());
        let a = store.claim(HeaderText { logo: "A".into(), ..HeaderText::default() });
        let b = store.claim(HeaderText { logo: "B".into(), ..HeaderText::default() });
        // A's hover-end arrives after B's hover-start.
        drop(a);
        assert_eq!(store.current().text.logo, "B");
        assert!(store.current().is_hovering);
        drop(b);
        assert_eq!(store.current().text.logo, "Fairchild");
    }
}

mod navigation {
    use super::*;

    #[test]
    fn route_change_resets_header_and_rearms_movement() {
        let t0 = Instant::now();
        let clock = ManualClock::new(t0);
        let site = SiteSession::new(
            MotionConfig::default(),
            "/gallery",
            Viewport::new(1440.0, 900.0),
            clock.clone(),
        );

        site.dispatch(InputEvent::PointerMove { x: 10.0, y: 100.0 }, t0 + ms(2100));
        site.dispatch(InputEvent::PointerMove { x: 10.0, y: 140.0 }, t0 + ms(2300));
        assert!(site.movement().has_moved());
        let claim = site.header().claim(HeaderText { logo: "Aesop".into(), ..HeaderText::default() });
        site.header().set_project_view(true);

        clock.set(t0 + ms(4000));
        site.router().begin_navigation("/projects/night-swim");
        assert_eq!(site.router().phase().get(), RoutePhase::ChangeStart);
        // Nothing resets until the change completes.
        assert!(site.movement().has_moved());
        assert_eq!(site.header().current().text.logo, "Aesop");

        let key = site.router().complete_navigation().unwrap();
        assert_eq!(key.route, Route::ProjectDetail("night-swim".into()));
        assert_eq!(site.router().active_link(), "");
        let state = site.header().current();
        assert_eq!(state.text.logo, "Fairchild");
        assert!(!state.is_hovering && !state.is_project_view);
        let movement = site.movement().state().get();
        assert!(!movement.has_moved && !movement.warmup_complete);
        assert!(!claim.is_current());

        // Warm-up restarts from the navigation.
        site.run_frame(t0 + ms(5000));
        assert!(!site.movement().state().get().warmup_complete);
        site.run_frame(t0 + ms(6000));
        assert!(site.movement().state().get().warmup_complete);
    }

    #[test]
    fn router_key_drives_any_bound_store() {
        let header = HeaderStore::from_settings(&SiteSettings::default());
        let router = Router::new("/", header.clone());
        let _c = header.claim(HeaderText { logo: "X".into(), ..HeaderText::default() });
        router.navigate("/information");
        assert_eq!(header.current().text.logo, "Fairchild");
        assert_eq!(router.key().get().generation, 1);
    }
}

mod config_files {
    use super::*;

    #[test]
    fn toml_file_tunes_the_session() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[movement]\ninitial_delay_ms = 500\n\n[carousel]\ndesktop_max = 60.0\n\n[site]\nname = \"Studio\""
        )
        .unwrap();

        let config = MotionConfig::load_file(file.path()).unwrap();
        assert_eq!(config.movement.initial_delay_ms, 500);

        let t0 = Instant::now();
        let site = SiteSession::new(config, "/", Viewport::new(1440.0, 900.0), ManualClock::new(t0));
        assert_eq!(site.header().current().text.logo, "Studio");
        assert_eq!(site.carousel().sizing().range.max, 60.0);

        site.dispatch(InputEvent::Click { x: 0.0, y: 0.0 }, t0 + ms(600));
        assert!(site.movement().has_moved());
    }

    #[test]
    fn json_file_loads_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"auto_scroll": {{"speed": 3.5}}}}"#).unwrap();
        let config = MotionConfig::load_file(file.path()).unwrap();
        assert_eq!(config.to_auto_scroll_options().speed, 3.5);
    }

    #[test]
    fn invalid_file_is_rejected_with_every_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vitrine.toml");
        std::fs::write(&path, "[proximity]\nradius = -1.0\n\n[auto_scroll]\ninitial_content_sets = 0\n")
            .unwrap();
        match MotionConfig::load_toml_file(&path) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
        // The unvalidated reader still parses it.
        assert!(MotionConfig::from_toml_file(&path).is_ok());
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MotionConfig::load_toml_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

mod content {
    use super::*;

    #[test]
    fn project_gallery_selection_maps_to_flat_card() {
        let projects = decode_projects(PROJECTS).unwrap();
        let counts = gallery_counts(&projects);
        assert_eq!(counts, vec![3, 2]);
        // Second still of the second project: 3 + 1.
        assert_eq!(selected_gallery_index(&counts, 1, 1), Some(4));
        assert_eq!(selected_gallery_index(&counts, 1, 2), None);
    }

    #[test]
    fn project_header_text_per_breakpoint() {
        let projects = decode_projects(PROJECTS).unwrap();
        let desktop = HeaderText::for_project(&projects[1], Breakpoint::Laptop);
        assert_eq!(desktop.logo, "Nike");
        assert_eq!(desktop.kind, "Commercial");
        assert_eq!(desktop.year, "2021");
        assert!(HeaderText::for_project(&projects[1], Breakpoint::Mobile).year.is_empty());
    }
}

mod filters {
    use super::*;
    use vitrine_motion::StackSpec;

    const LISTING: &str = r##"[
        {"title": "Night Swim", "type": [{"name": "Film"}], "styles": [{"name": "Moody"}], "year": "2023",
         "colorTempFilter": {"minTemp": 2800, "maxTemp": 3600}, "gallery": [{}, {}]},
        {"title": "Dust", "type": [{"name": "Commercial"}], "styles": [{"name": "Bright"}], "year": "2021",
         "saturationFilter": 80, "gallery": [{}]},
        {"title": "Tide", "type": [{"name": "Film"}], "styles": [{"name": "Bright"}], "year": "2019",
         "gallery": [{}, {}, {}]}
    ]"##;

    #[test]
    fn project_filter_narrows_carousel_cards() {
        let projects = decode_projects(LISTING).unwrap();
        let site = SiteSession::new(
            MotionConfig::default(),
            "/projects",
            Viewport::new(1440.0, 900.0),
            ManualClock::new(Instant::now()),
        );
        let mut carousel = site.carousel();
        let stack = StackSpec::centered(900.0, 0.0, 24.0);
        assert!(carousel.relayout(projects.iter().map(|_| 300.0), &stack));
        assert_eq!(carousel.frames().len(), 3);

        let mut filter = ProjectFilter::default();
        filter.toggle_kind("Film");
        let shown = filter.apply(&projects);
        carousel.begin_loading(shown.len());
        assert!(carousel.relayout(shown.iter().map(|_| 300.0), &stack));
        assert_eq!(carousel.frames().len(), 2);
        assert_eq!(carousel.loads().loaded(), 0);
    }

    #[test]
    fn gallery_filter_drops_out_of_range_stills() {
        let projects = decode_projects(LISTING).unwrap();
        let mut filter = GalleryFilter::for_projects(&projects);
        assert_eq!(filter.year_span, Bounds::new(2019, 2023));
        assert!(!filter.is_on());

        filter.saturation = Bounds::new(0.0, 50.0);
        filter.years = Bounds::new(2020, 2023);
        let shown: Vec<_> = filter.apply(&projects).into_iter().cloned().collect();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].title, "Night Swim");
        assert_eq!(gallery_counts(&shown), vec![2]);
    }
}
