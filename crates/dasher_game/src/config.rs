//! Gameplay tuning.
//!
//! Every constant the simulation uses lives in `GameConfig`. `Default` holds
//! the shipped values; an optional JSON file can override any subset of them
//! (missing fields keep their defaults, unknown fields are rejected so typos
//! do not silently fall back). The file is polled by mtime and a change
//! restarts the run with the new values.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Logical window size; also bounds the play field.
    pub window_width: u32,
    pub window_height: u32,
    pub target_fps: u32,

    /// Downward acceleration in units/s^2.
    pub gravity: f32,
    /// Vertical impulse added on jump (negative is up).
    pub jump_velocity: f32,

    /// Horizontal velocity shared by every obstacle and the finish line.
    pub obstacle_velocity: f32,
    /// Horizontal gap between consecutive obstacles at the start of a run.
    pub obstacle_spacing: f32,
    /// Hitbox inset applied to each side of an obstacle frame.
    pub obstacle_inset: f32,

    pub player_frame_time: f32,
    pub player_max_frame: u32,
    pub player_sheet_columns: u32,

    pub obstacle_frame_time: f32,
    pub obstacle_max_frame: u32,
    pub obstacle_sheet_columns: u32,
    pub obstacle_sheet_rows: u32,

    /// Scroll speed of background, midground and foreground, in units/s.
    pub layer_speeds: [f32; 3],
    /// Draw scale applied to every background layer texture.
    pub layer_scale: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 512,
            window_height: 380,
            target_fps: 60,
            gravity: 1000.0,
            jump_velocity: -600.0,
            obstacle_velocity: -200.0,
            obstacle_spacing: 300.0,
            obstacle_inset: 50.0,
            player_frame_time: 1.0 / 12.0,
            player_max_frame: 5,
            player_sheet_columns: 6,
            obstacle_frame_time: 1.0 / 16.0,
            obstacle_max_frame: 7,
            obstacle_sheet_columns: 8,
            obstacle_sheet_rows: 8,
            layer_speeds: [20.0, 40.0, 80.0],
            layer_scale: 2.0,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.window_width == 0 || self.window_height == 0 {
            return Err("Config validation failed: window_width/window_height must be > 0".into());
        }
        if self.target_fps == 0 {
            return Err("Config validation failed: target_fps must be > 0".into());
        }
        if !(self.gravity > 0.0) {
            return Err("Config validation failed: gravity must be > 0".into());
        }
        if !(self.jump_velocity < 0.0) {
            return Err("Config validation failed: jump_velocity must be < 0 (upward)".into());
        }
        if !(self.obstacle_velocity < 0.0) {
            return Err("Config validation failed: obstacle_velocity must be < 0 (leftward)".into());
        }
        if !(self.obstacle_spacing >= 0.0) || !(self.obstacle_inset >= 0.0) {
            return Err(
                "Config validation failed: obstacle_spacing and obstacle_inset must be >= 0".into(),
            );
        }
        if !(self.player_frame_time > 0.0) || !(self.obstacle_frame_time > 0.0) {
            return Err(
                "Config validation failed: player_frame_time and obstacle_frame_time must be > 0"
                    .into(),
            );
        }
        if self.player_max_frame >= self.player_sheet_columns {
            return Err(format!(
                "Config validation failed: player_max_frame {} must be < player_sheet_columns {}",
                self.player_max_frame, self.player_sheet_columns
            ));
        }
        if self.obstacle_max_frame >= self.obstacle_sheet_columns {
            return Err(format!(
                "Config validation failed: obstacle_max_frame {} must be < obstacle_sheet_columns {}",
                self.obstacle_max_frame, self.obstacle_sheet_columns
            ));
        }
        if self.obstacle_sheet_rows == 0 {
            return Err("Config validation failed: obstacle_sheet_rows must be > 0".into());
        }
        if self.layer_speeds.iter().any(|speed| !(*speed >= 0.0)) {
            return Err("Config validation failed: layer_speeds must all be >= 0".into());
        }
        if !(self.layer_scale > 0.0) {
            return Err("Config validation failed: layer_scale must be > 0".into());
        }
        Ok(())
    }

    /// Simulation step length in seconds.
    pub fn fixed_dt(&self) -> f32 {
        1.0 / self.target_fps as f32
    }
}

pub fn load_config_from_path(path: &Path) -> Result<GameConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;
    let config: GameConfig = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse config JSON {}: {e}", path.display()))?;
    config.validate()?;
    Ok(config)
}

/// Load the tuning file if it exists, otherwise the built-in defaults. A file
/// that exists but fails to load is reported and ignored.
pub fn load_config_or_default(path: &Path) -> GameConfig {
    if !path.exists() {
        log::info!(
            "No tuning file at '{}', using built-in defaults",
            path.display()
        );
        return GameConfig::default();
    }
    match load_config_from_path(path) {
        Ok(config) => {
            log::info!("Loaded tuning from '{}'", path.display());
            config
        }
        Err(err) => {
            log::error!("{err}. Using built-in defaults.");
            GameConfig::default()
        }
    }
}

/// Polls a file's modification time so edits can be picked up between frames.
pub struct ConfigWatcher {
    path: PathBuf,
    last_seen_modified: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: PathBuf) -> Self {
        let last_seen_modified = modified_time(&path);
        Self {
            path,
            last_seen_modified,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn should_reload(&mut self) -> bool {
        let current = modified_time(&self.path);
        match (self.last_seen_modified, current) {
            (Some(old), Some(now)) if now > old => {
                self.last_seen_modified = Some(now);
                true
            }
            (None, Some(now)) => {
                self.last_seen_modified = Some(now);
                true
            }
            _ => false,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok()?.modified().ok()
}
