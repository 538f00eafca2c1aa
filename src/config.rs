//! Map placement and physics stepping configuration.

use crate::error::MapError;
use anyhow::Context;
use macroquad::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// Physics stepping parameters, applied once per [`TileMap::draw`](crate::TileMap::draw).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Seconds advanced per frame.
    ///
    /// Default: `1/60`
    pub time_step: f32,

    /// Default: `6`
    pub velocity_iterations: u32,

    /// Default: `2`
    pub position_iterations: u32,

    /// Gravity in physics units per second squared, y pointing down.
    ///
    /// Default: `[0.0, 10.0]`
    pub gravity: [f32; 2],
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            velocity_iterations: 6,
            position_iterations: 2,
            gravity: [0.0, 10.0],
        }
    }
}

impl PhysicsConfig {
    pub fn gravity(&self) -> Vec2 {
        Vec2::from(self.gravity)
    }
}

/// Per-map settings. Everything is optional in JSON form.
///
/// ```
/// use macroquad_tilemap::TileMapConfig;
///
/// let cfg = TileMapConfig::from_json_str(r#"{ "zoom": 2.0, "physics": { "time_step": 0.02 } }"#)
///     .expect("valid config");
/// assert_eq!(cfg.zoom, 2.0);
/// assert_eq!(cfg.physics.velocity_iterations, 6);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TileMapConfig {
    /// Pixels per physics unit. `None` uses the map's tile height.
    pub ppm: Option<f32>,
    pub zoom: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub physics: PhysicsConfig,
}

impl Default for TileMapConfig {
    fn default() -> Self {
        Self {
            ppm: None,
            zoom: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            physics: PhysicsConfig::default(),
        }
    }
}

impl TileMapConfig {
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let cfg: Self = serde_json::from_str(json).map_err(|source| MapError::Json {
            path: "<inline>".into(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let p = path.as_ref();
        let txt = std::fs::read_to_string(p)
            .with_context(|| format!("Reading config file {}", p.display()))?;
        let cfg: Self = serde_json::from_str(&txt)
            .with_context(|| format!("Parsing config file {}", p.display()))?;
        cfg.validate()
            .with_context(|| format!("Validating config file {}", p.display()))?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        if let Some(ppm) = self.ppm {
            if ppm <= 0.0 || !ppm.is_finite() {
                return Err(MapError::InvalidConfig(format!("ppm must be positive, got {ppm}")));
            }
        }
        if self.zoom <= 0.0 || !self.zoom.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "zoom must be positive, got {}",
                self.zoom
            )));
        }
        if self.physics.time_step < 0.0 || !self.physics.time_step.is_finite() {
            return Err(MapError::InvalidConfig(format!(
                "time_step must not be negative, got {}",
                self.physics.time_step
            )));
        }
        Ok(())
    }
}
