//! tilebonk: tile-world collision core (broad-phase grid + box probes, fixed-point)

pub mod fixed;
pub mod geometry;
pub mod types;
pub mod api;
pub mod narrowphase;
pub mod error;
pub mod config;
pub mod world;
pub mod partition;
pub mod collider;

pub use crate::fixed::Fixed;
pub use crate::geometry::{Aabb, LineSegment, Parallelogram, RightTriangle, Vector};
pub use crate::types::*;
pub use crate::api::*;
pub use crate::narrowphase::Narrowphase;
pub use crate::error::{Error, Result};
pub use crate::config::{ColliderConfig, PartitionConfig, Settings, WorldConfig};
pub use crate::world::{Tile, TileWorld};
pub use crate::partition::{Partition, QueryFilter, QueryShape};
pub use crate::collider::{BoxCollider, PlacementTracking, ProbePlacements};
