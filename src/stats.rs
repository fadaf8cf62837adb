//! Local visit/download counters.
//!
//! The record lives in local storage as JSON
//! `{"visits":n,"downloads":n,"logs":[{"action":..,"timestamp":..}]}`; a
//! session-storage marker limits visits to one per browser session.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Storage, Window};

use crate::config::StatsConfig;
use crate::dom;
use crate::error::{Result, SiteError};

const DOWNLOAD_SELECTOR: &str = "a[download], [data-track=\"download\"]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Visit,
    Download,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Visit => "visit",
            Action::Download => "download",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub action: String,
    pub timestamp: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    #[serde(default)]
    pub visits: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
}

impl StatsRecord {
    /// Bumps the counter for `action` and appends a log entry, keeping at most
    /// `max_logs` entries (oldest dropped first).
    pub fn record(&mut self, action: Action, timestamp: &str, max_logs: usize) {
        match action {
            Action::Visit => self.visits = self.visits.saturating_add(1),
            Action::Download => self.downloads = self.downloads.saturating_add(1),
        }
        self.logs.push(LogEntry {
            action: action.as_str().to_string(),
            timestamp: timestamp.to_string(),
        });
        if self.logs.len() > max_logs {
            let excess = self.logs.len() - max_logs;
            self.logs.drain(..excess);
        }
    }
}

/// String key/value storage; implemented by browser `Storage` and by an
/// in-memory map.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Option<String> {
        self.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        Ok(self.set_item(key, value)?)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

#[derive(Clone, Debug)]
pub struct Stats<L, S> {
    local: L,
    session: S,
    cfg: StatsConfig,
}

impl<L: KeyValueStore, S: KeyValueStore> Stats<L, S> {
    pub fn new(local: L, session: S, cfg: StatsConfig) -> Self {
        Self { local, session, cfg }
    }

    /// Stored record; missing or unreadable data yields a fresh one.
    pub fn load(&self) -> StatsRecord {
        self.local
            .get(&self.cfg.storage_key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.load())?)
    }

    pub fn track(&self, action: Action, timestamp: &str) -> Result<StatsRecord> {
        let mut record = self.load();
        record.record(action, timestamp, self.cfg.max_logs);
        self.local.set(&self.cfg.storage_key, &serde_json::to_string(&record)?)?;
        Ok(record)
    }

    /// Counts a visit unless this session already has. Returns whether it counted.
    pub fn track_visit(&self, timestamp: &str) -> Result<bool> {
        if self.session.get(&self.cfg.session_key).is_some() {
            return Ok(false);
        }
        self.track(Action::Visit, timestamp)?;
        self.session.set(&self.cfg.session_key, "true")?;
        Ok(true)
    }
}

pub type BrowserStats = Stats<Storage, Storage>;

pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn browser_stats(win: &Window, cfg: StatsConfig) -> Result<BrowserStats> {
    let local = win
        .local_storage()
        .ok()
        .flatten()
        .ok_or(SiteError::StorageUnavailable("local"))?;
    let session = win
        .session_storage()
        .ok()
        .flatten()
        .ok_or(SiteError::StorageUnavailable("session"))?;
    Ok(Stats::new(local, session, cfg))
}

pub fn install(doc: &Document, cfg: &StatsConfig) -> Result<()> {
    let stats = browser_stats(&dom::window()?, cfg.clone())?;

    match stats.track_visit(&now_timestamp()) {
        Ok(true) => log::info!("visit recorded"),
        Ok(false) => {}
        Err(err) => log::warn!("could not record visit: {}", err),
    }

    // Delegated so links added after start-up are counted too.
    dom::listen(doc, "click", move |evt| {
        let is_download = evt
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(DOWNLOAD_SELECTOR).ok().flatten())
            .is_some();
        if is_download {
            if let Err(err) = stats.track(Action::Download, &now_timestamp()) {
                log::warn!("could not record download: {}", err);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2026-10-19T12:00:00.000Z";

    type MemoryStats<'a> = Stats<&'a MemoryStore, &'a MemoryStore>;

    fn stats<'a>(local: &'a MemoryStore, session: &'a MemoryStore) -> MemoryStats<'a> {
        Stats::new(local, session, StatsConfig::default())
    }

    #[test]
    fn log_is_capped_oldest_first() {
        let mut rec = StatsRecord::default();
        for i in 0..120 {
            rec.record(Action::Download, &format!("t{}", i), 50);
            assert!(rec.logs.len() <= 50);
        }
        assert_eq!(rec.downloads, 120);
        assert_eq!(rec.logs.len(), 50);
        assert_eq!(rec.logs[0].timestamp, "t70");
        assert_eq!(rec.logs[49].timestamp, "t119");
    }

    #[test]
    fn visit_counts_once_per_session() {
        let local = MemoryStore::default();
        let session = MemoryStore::default();
        let s = stats(&local, &session);
        assert!(s.track_visit(TS).unwrap());
        for _ in 0..5 {
            assert!(!s.track_visit(TS).unwrap());
        }
        assert_eq!(s.load().visits, 1);

        // New session, same local storage.
        let fresh_session = MemoryStore::default();
        let s2 = stats(&local, &fresh_session);
        assert!(s2.track_visit(TS).unwrap());
        assert_eq!(s2.load().visits, 2);
    }

    #[test]
    fn persisted_json_shape() {
        let local = MemoryStore::default();
        let session = MemoryStore::default();
        stats(&local, &session).track(Action::Download, TS).unwrap();
        let raw = local.get("kalyan_stats").unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v["visits"], 0);
        assert_eq!(v["downloads"], 1);
        assert_eq!(v["logs"][0]["action"], "download");
        assert_eq!(v["logs"][0]["timestamp"], TS);
    }

    #[test]
    fn corrupt_record_starts_over() {
        let local = MemoryStore::default();
        local.set("kalyan_stats", "{not json").unwrap();
        let session = MemoryStore::default();
        let s = stats(&local, &session);
        assert_eq!(s.load(), StatsRecord::default());
        let rec = s.track(Action::Visit, TS).unwrap();
        assert_eq!(rec.visits, 1);
        assert_eq!(rec.logs.len(), 1);
    }

    #[test]
    fn partial_record_fills_defaults() {
        let local = MemoryStore::default();
        local.set("kalyan_stats", r#"{"visits":7}"#).unwrap();
        let session = MemoryStore::default();
        let rec = stats(&local, &session).load();
        assert_eq!(rec.visits, 7);
        assert_eq!(rec.downloads, 0);
        assert!(rec.logs.is_empty());
    }
}
