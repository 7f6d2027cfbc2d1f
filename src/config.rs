//! Tunables for worlds, colliders and partitions, loadable from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fixed::Fixed;
use crate::geometry::Aabb;
use crate::types::{MASK_SIZE, QUERY_MAX_DISTANCE, STEP_SIZE, TILE_SIZE};

/// Tile map configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Tile edge length in world units.
    pub tile_size: Fixed,
    /// Distance a sweep advances per step.
    pub step_size: Fixed,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { tile_size: Fixed::from_int(TILE_SIZE), step_size: STEP_SIZE }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.tile_size.is_positive() {
            return Err(Error::NonPositiveTileSize(self.tile_size));
        }
        if !self.step_size.is_positive() {
            return Err(Error::NonPositiveStep(self.step_size));
        }
        Ok(())
    }
}

/// Per-body collider configuration.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderConfig {
    /// Probe thickness.
    pub mask_size: Fixed,
    /// Amount the side probes are shortened at the top.
    pub side_top_offset: Fixed,
    /// Amount the side probes are shortened at the bottom.
    pub side_bottom_offset: Fixed,
    /// Record the geometry behind every probe result.
    pub track_placements: bool,
    /// Distance used by the `*_default` floor helpers.
    pub query_max_distance: Fixed,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            mask_size: MASK_SIZE,
            side_top_offset: Fixed::ZERO,
            side_bottom_offset: Fixed::ZERO,
            track_placements: false,
            query_max_distance: QUERY_MAX_DISTANCE,
        }
    }
}

impl ColliderConfig {
    pub fn validate(&self) -> Result<()> {
        if self.mask_size.is_negative() {
            return Err(Error::NegativeMaskSize(self.mask_size));
        }
        Ok(())
    }
}

/// Partition region and grid resolution.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    pub left: Fixed,
    pub top: Fixed,
    pub width: Fixed,
    pub height: Fixed,
    pub rows: usize,
    pub cols: usize,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            left: Fixed::ZERO,
            top: Fixed::ZERO,
            width: Fixed::from_int(256),
            height: Fixed::from_int(256),
            rows: 16,
            cols: 16,
        }
    }
}

impl PartitionConfig {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.left, self.top, self.width, self.height)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::EmptyGrid { rows: self.rows, cols: self.cols });
        }
        if !self.width.is_positive() || !self.height.is_positive() {
            return Err(Error::DegenerateBounds { width: self.width, height: self.height });
        }
        Ok(())
    }
}

/// All settings of a collision setup, as stored in a TOML file.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub world: WorldConfig,
    pub collider: ColliderConfig,
    pub partition: PartitionConfig,
}

impl Settings {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(contents).map_err(|e| Error::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Serialize(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.collider.validate()?;
        self.partition.validate()
    }
}
