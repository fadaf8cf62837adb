// Integration tests (native) for the `portfolio-site` crate.
// These tests avoid wasm-specific functionality and exercise pure Rust logic so
// they can run under `cargo test` on the host.

use portfolio_site::config::{SiteConfig, StatsConfig};
use portfolio_site::loader::{self, LoaderState};
use portfolio_site::projects::{self, PROJECTS};
use portfolio_site::router::{self, HOME_PAGE, Scroll};
use portfolio_site::stats::{Action, KeyValueStore, MemoryStore, Stats};

#[test]
fn every_page_fragment_round_trips_to_its_page() {
    for page in ["page-home", "page-about", "page-projects", "page-resume", "page-contact"] {
        let route = router::parse_fragment(&format!("#{}", page));
        assert_eq!(route.page, page);
        assert_eq!(route.scroll, Scroll::Top);
    }
}

#[test]
fn anchors_live_on_the_home_page() {
    let route = router::parse_fragment("#skills");
    assert_eq!(route.page, HOME_PAGE);
    assert_eq!(route.scroll, Scroll::Anchor("skills".to_string()));
}

#[test]
fn loader_progress_clamped_for_any_elapsed_time() {
    let mut state = LoaderState::new(&SiteConfig::default().loader);
    let mut elapsed = -10_000.0;
    while elapsed < 20_000.0 {
        let p = state.tick(elapsed).progress;
        assert!((0.0..=100.0).contains(&p), "elapsed {} gave {}", elapsed, p);
        elapsed += 37.5;
    }
}

#[test]
fn loader_reaches_final_status_only_at_completion() {
    let mut state = LoaderState::new(&SiteConfig::default().loader);
    let mut last = None;
    for ms in (0..=5000).step_by(10) {
        let frame = state.tick(ms as f64);
        if let Some(m) = frame.new_message {
            last = Some(m);
        }
        if last == Some(loader::STATUS_MESSAGES[4]) {
            assert!(frame.complete);
        }
    }
    assert_eq!(last, Some("ACCESS GRANTED"));
}

#[test]
fn stats_log_never_exceeds_cap() {
    let local = MemoryStore::default();
    let session = MemoryStore::default();
    let stats = Stats::new(&local, &session, StatsConfig::default());
    for i in 0..75 {
        let action = if i % 3 == 0 { Action::Visit } else { Action::Download };
        let rec = stats.track(action, "2026-10-19T00:00:00.000Z").unwrap();
        assert!(rec.logs.len() <= 50);
    }
    let rec = stats.load();
    assert_eq!(rec.visits + rec.downloads, 75);
    assert_eq!(rec.logs.len(), 50);
}

#[test]
fn session_marker_gates_visits() {
    let local = MemoryStore::default();
    let session = MemoryStore::default();
    let stats = Stats::new(&local, &session, StatsConfig::default());
    for _ in 0..4 {
        stats.track_visit("2026-10-19T00:00:00.000Z").unwrap();
    }
    assert_eq!(stats.load().visits, 1);
    assert_eq!(session.get("visited_this_session").as_deref(), Some("true"));
}

#[test]
fn project_records_are_complete() {
    assert!(!PROJECTS.is_empty());
    for (id, rec) in PROJECTS {
        let found = projects::lookup(id).unwrap();
        assert_eq!(found, rec);
        for field in [rec.title, rec.subtitle, rec.description, rec.link] {
            assert!(!field.trim().is_empty(), "empty field in {}", id);
        }
        assert!(!rec.tech.is_empty(), "no tech listed for {}", id);
        assert!(rec.link.starts_with("https://"));
    }
}
