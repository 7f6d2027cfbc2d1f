use bitflags::bitflags;

use crate::fixed::Fixed;
use crate::geometry::{Aabb, RightTriangle, Vector};

/// Number of sub-pixel bits a sweep advances by per step.
pub const STEP_BIT_COUNT: u32 = 8;
/// Distance a sweep advances per step (1/256 px).
pub const STEP_SIZE: Fixed = Fixed::from_raw(1 << (crate::fixed::FRAC_BITS - STEP_BIT_COUNT));
/// Default probe thickness.
pub const MASK_SIZE: Fixed = STEP_SIZE;
/// Default bound for floor snaps and contact sweeps.
pub const QUERY_MAX_DISTANCE: Fixed = Fixed::ONE;
/// Edge length of a map tile in pixels.
pub const TILE_SIZE: i32 = 16;

bitflags! {
    /// What a probed region touches.
    ///
    /// Most call sites treat this as a true bitmask, but floor classification
    /// only ever yields one of `BLOCK`, `SLOPE` or `TOP_LADDER` on its own.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct CollisionFlags: u32 {
        const BLOCK = 1;
        const SLOPE = 2;
        const LADDER = 4;
        const TOP_LADDER = 8;
        const UNCLIMBABLE = 16;
        const WATER = 32;
        const WATER_SURFACE = 64;

        /// Bits that never act as walls or ceilings.
        const NON_SOLID = Self::LADDER.bits()
            | Self::TOP_LADDER.bits()
            | Self::WATER.bits()
            | Self::WATER_SURFACE.bits();
    }
}

impl CollisionFlags {
    pub const NONE: CollisionFlags = CollisionFlags::empty();

    /// Whether these flags stop a move heading in any of `direction`.
    ///
    /// `BLOCK` always stops; walls also stop on `UNCLIMBABLE`/`SLOPE`, and a
    /// fall also stops on `TOP_LADDER`/`SLOPE`.
    pub fn can_block(self, direction: Direction) -> bool {
        if self.is_empty() {
            return false;
        }
        if self.contains(CollisionFlags::BLOCK) {
            return true;
        }
        if direction.intersects(Direction::LEFTRIGHT)
            && self.intersects(CollisionFlags::UNCLIMBABLE | CollisionFlags::SLOPE)
        {
            return true;
        }
        direction.contains(Direction::DOWN)
            && self.intersects(CollisionFlags::TOP_LADDER | CollisionFlags::SLOPE)
    }

    /// Exactly one of the three floor states.
    pub fn is_primary_floor(self) -> bool {
        self == CollisionFlags::BLOCK || self == CollisionFlags::SLOPE || self == CollisionFlags::TOP_LADDER
    }
}

bitflags! {
    /// Set of movement directions, used as a per-axis blocking mask.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Direction: u8 {
        const LEFT = 1;
        const UP = 2;
        const RIGHT = 4;
        const DOWN = 8;
        const LEFTRIGHT = Self::LEFT.bits() | Self::RIGHT.bits();
        const UPDOWN = Self::UP.bits() | Self::DOWN.bits();
        const ALL = Self::LEFTRIGHT.bits() | Self::UPDOWN.bits();
    }
}

impl Direction {
    pub const NONE: Direction = Direction::empty();

    /// Directions a displacement points toward.
    pub fn of(v: Vector) -> Direction {
        let mut d = Direction::NONE;
        if v.x.is_negative() { d |= Direction::LEFT; }
        if v.x.is_positive() { d |= Direction::RIGHT; }
        if v.y.is_negative() { d |= Direction::UP; }
        if v.y.is_positive() { d |= Direction::DOWN; }
        d
    }
}

/// One piece of world geometry that contributed to a collision query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollisionPlacement {
    pub flag: CollisionFlags,
    /// Bounding box of the contributing tile.
    pub bounds: Aabb,
    /// Ramp triangle, for slope placements.
    pub slope: Option<RightTriangle>,
    pub row: usize,
    pub col: usize,
}

/// Floor classification beneath a body.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LandedState {
    pub flags: CollisionFlags,
    /// Contacted ramp; only set when `flags == SLOPE`.
    pub slope: Option<RightTriangle>,
}

impl LandedState {
    pub const NONE: LandedState = LandedState { flags: CollisionFlags::NONE, slope: None };

    pub fn of(flags: CollisionFlags) -> Self {
        Self { flags, slope: None }
    }

    pub fn sloped(slope: RightTriangle) -> Self {
        Self { flags: CollisionFlags::SLOPE, slope: Some(slope) }
    }
}

/// Which probe of a collider a query belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ProbeSide {
    Left,
    Up,
    Right,
    Down,
    /// The body box itself.
    Inner,
}

/// Snapshot of partition occupancy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub rows: usize,
    pub cols: usize,
    /// Cells currently holding at least one entry.
    pub cells_allocated: usize,
    /// Sum of cell lengths (an entity spanning k cells counts k times).
    pub entries: usize,
    pub max_cell_len: usize,
}
