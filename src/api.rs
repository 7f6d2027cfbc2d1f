use core::hash::Hash;

use crate::fixed::Fixed;
use crate::geometry::{Aabb, LineSegment, Parallelogram, RightTriangle, Vector};
use crate::types::*;

/// Collision oracle over static world geometry.
///
/// A [`BoxCollider`](crate::collider::BoxCollider) only ever reaches the
/// world through this trait. `placements`, when supplied, receives one
/// record per piece of geometry that contributed to the answer.
pub trait WorldOracle {
    /// Sub-pixel distance that sweeps and snaps advance per step.
    fn step_size(&self) -> Fixed;

    // --- Classification ----------------------------------------------------

    /// Union of the flags of all geometry overlapping `probe`, minus `ignore`.
    /// `precise` tests ramps against their triangle instead of the tile box.
    fn collision_flags(
        &self,
        probe: Aabb,
        placements: Option<&mut Vec<CollisionPlacement>>,
        ignore: CollisionFlags,
        precise: bool,
    ) -> CollisionFlags;

    /// Classify the floor directly beneath `body` as BLOCK, SLOPE, TOP_LADDER or NONE.
    fn landed_state(
        &self,
        body: Aabb,
        placements: Option<&mut Vec<CollisionPlacement>>,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> LandedState;

    // --- Movement ----------------------------------------------------------

    /// Sweep `probe` along `dir` and return it at the first blocking contact,
    /// or at the end of the sweep when nothing blocks.
    fn move_until_intersect(
        &self,
        probe: Aabb,
        dir: Vector,
        max_distance: Fixed,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> Aabb;

    /// Drop `body` onto the nearest floor within `max_distance`.
    /// Without a floor the body ends `max_distance` lower.
    fn move_contact_floor(&self, body: Aabb, max_distance: Fixed, mask_size: Fixed, ignore: CollisionFlags) -> Aabb;

    /// Lift a landed `body` until it rests on top of the floor.
    fn adjust_on_the_floor(&self, body: Aabb, max_distance: Fixed, mask_size: Fixed, ignore: CollisionFlags) -> Aabb;

    /// Like [`move_contact_floor`](Self::move_contact_floor) but `None` when no floor is reached.
    fn try_move_contact_floor(
        &self,
        body: Aabb,
        max_distance: Fixed,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> Option<Aabb>;

    /// Like [`try_move_contact_floor`](Self::try_move_contact_floor) but only succeeds on a ramp.
    fn try_move_contact_slope(
        &self,
        body: Aabb,
        max_distance: Fixed,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> Option<Aabb>;
}

/// An entity that can be indexed by a [`Partition`](crate::partition::Partition).
///
/// Implementors are usually light handles (ids carrying a copy of the last
/// indexed box); equality and hashing must identify the entity, not its box.
pub trait Indexed: Clone + Eq + Hash {
    /// Current box used for indexing and query tests.
    fn hitbox(&self) -> Aabb;

    /// Box the entity was indexed with on its previous update.
    fn last_hitbox(&self) -> Aabb;

    /// Dead entities are skipped by queries unless the filter allows them.
    fn alive(&self) -> bool {
        true
    }

    /// Entities pending removal are skipped like dead ones.
    fn marked_to_remove(&self) -> bool {
        false
    }
}

/// Exact fixed-point primitive tests.
pub trait NarrowphaseApi {
    /// Positive-area overlap; a zero extent behaves as a point on that axis.
    fn overlap_aabb_aabb(a: &Aabb, b: &Aabb) -> bool;
    /// Half-open containment.
    fn overlap_point_aabb(p: Vector, b: &Aabb) -> bool;
    fn segment_aabb(seg: &LineSegment, b: &Aabb) -> bool;
    fn triangle_aabb(tri: &RightTriangle, b: &Aabb) -> bool;
    fn triangle_point(tri: &RightTriangle, p: Vector) -> bool;
    fn parallelogram_aabb(para: &Parallelogram, b: &Aabb) -> bool;
    fn parallelogram_point(para: &Parallelogram, p: Vector) -> bool;
}
