use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::Difficulty;
use crate::gesture::GestureParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Game
    pub difficulty: Difficulty,
    pub scenario: String,
    /// Scenarios in unlock order.
    pub scenario_order: Vec<String>,
    pub player: String,

    // Gesture
    pub swipe_threshold: f64,
    pub rotation_factor: f64,
    pub fade_distance: f64,
    pub animation_ms: u64,
    pub surface_width: f64,

    // Persistence
    pub listings_path: String,
    pub progress_path: String,
    pub journal_path: String,

    // Runtime
    pub log_json: bool,
}

/// Typed reads over a key lookup (the process env in production).
struct Vars<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Vars<F> {
    fn raw(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or_else(|| default.to_string())
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool> {
        let Some(v) = self.raw(key) else {
            return Ok(default);
        };
        match v.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow!("{key} is not a boolean: {v}")),
        }
    }

    fn parse<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.raw(key) {
            Some(v) => v.parse().map_err(|_| anyhow!("{key} has an invalid value: {v}")),
            None => Ok(default),
        }
    }

    fn positive(&self, key: &str, default: f64) -> Result<f64> {
        let v = self.parse(key, default)?;
        if !(v > 0.0) || !v.is_finite() {
            return Err(anyhow!("{key} must be positive, got {v}"));
        }
        Ok(v)
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let vars = Vars { lookup };

        // Game
        let difficulty = Difficulty::from_tag(&vars.string("SWIPE_DIFFICULTY", "A1"));
        let scenario = vars.string("SWIPE_SCENARIO", "accommodation");
        let scenario_order: Vec<String> = vars
            .string("SWIPE_SCENARIO_ORDER", &scenario)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let player = vars.string("SWIPE_PLAYER", "guest");

        // Gesture
        let swipe_threshold = vars.positive("SWIPE_THRESHOLD", 100.0)?;
        let rotation_factor = vars.parse("SWIPE_ROTATION_FACTOR", 0.1)?;
        let fade_distance = vars.positive("SWIPE_FADE_DISTANCE", 500.0)?;
        let surface_width = vars.positive("SWIPE_SURFACE_WIDTH", 400.0)?;
        let animation_ms = vars.parse::<u64>("SWIPE_ANIMATION_MS", 300)?;
        if animation_ms == 0 {
            return Err(anyhow!("SWIPE_ANIMATION_MS must be at least 1"));
        }

        // Persistence
        let listings_path = vars.string("SWIPE_LISTINGS_PATH", "./demos/listings.json");
        let progress_path = vars.string("SWIPE_PROGRESS_PATH", "./progress.json");
        let journal_path = vars.string("SWIPE_JOURNAL_PATH", "./sessions.md");

        let log_json = vars.flag("SWIPE_LOG_JSON", false)?;

        Ok(Self {
            difficulty,
            scenario,
            scenario_order,
            player,
            swipe_threshold,
            rotation_factor,
            fade_distance,
            animation_ms,
            surface_width,
            listings_path,
            progress_path,
            journal_path,
            log_json,
        })
    }

    pub fn gesture_params(&self) -> GestureParams {
        GestureParams {
            threshold: self.swipe_threshold,
            rotation_factor: self.rotation_factor,
            fade_distance: self.fade_distance,
        }
    }

    pub fn animation(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }
}
