//! Performance markers
//!
//! Named start/end timing pairs for diagnostics. A registry is owned by the
//! component that times itself and lives as long as it does. Timings are
//! logged, never used for correctness.

use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// Registry of running markers
#[derive(Debug, Clone)]
pub struct MarkerRegistry {
    enabled: bool,
    running: IndexMap<String, Instant>,
}

impl MarkerRegistry {
    /// Create a registry; a disabled registry ignores every call
    #[inline]
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            running: IndexMap::new(),
        }
    }

    /// Whether markers are recorded
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start (or restart) a marker
    pub fn start(&mut self, name: impl Into<String>) {
        if self.enabled {
            self.running.insert(name.into(), Instant::now());
        }
    }

    /// Stop a marker and log its duration
    pub fn end(&mut self, name: &str) -> Option<Duration> {
        if !self.enabled {
            return None;
        }
        let Some(started) = self.running.shift_remove(name) else {
            tracing::warn!(marker = name, "marker ended without start");
            return None;
        };
        let elapsed = started.elapsed();
        tracing::debug!(
            marker = name,
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "marker finished"
        );
        Some(elapsed)
    }

    /// Whether a marker is running
    #[inline]
    #[must_use]
    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains_key(name)
    }

    /// Names of running markers, oldest first
    pub fn running(&self) -> impl Iterator<Item = &str> {
        self.running.keys().map(String::as_str)
    }

    /// Reset at mount
    pub fn mount(&mut self) {
        self.running.clear();
    }

    /// Drain at unmount, warning for every marker that never ended
    pub fn unmount(&mut self) -> Vec<String> {
        let unterminated: Vec<String> = self.running.drain(..).map(|(name, _)| name).collect();
        for name in &unterminated {
            tracing::warn!(marker = %name, "marker not ended before unmount");
        }
        unterminated
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new(true)
    }
}
