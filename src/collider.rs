use log::debug;

use crate::api::WorldOracle;
use crate::config::ColliderConfig;
use crate::fixed::Fixed;
use crate::geometry::{Aabb, RightTriangle, Vector};
use crate::types::*;

/// Placement lists recorded by the last flag update, one per probe.
#[derive(Clone, Debug, Default)]
pub struct ProbePlacements {
    pub left: Vec<CollisionPlacement>,
    pub up: Vec<CollisionPlacement>,
    pub right: Vec<CollisionPlacement>,
    pub down: Vec<CollisionPlacement>,
    pub inner: Vec<CollisionPlacement>,
}

impl ProbePlacements {
    fn clear(&mut self) {
        self.left.clear();
        self.up.clear();
        self.right.clear();
        self.down.clear();
        self.inner.clear();
    }

    fn side(&self, side: ProbeSide) -> &Vec<CollisionPlacement> {
        match side {
            ProbeSide::Left => &self.left,
            ProbeSide::Up => &self.up,
            ProbeSide::Right => &self.right,
            ProbeSide::Down => &self.down,
            ProbeSide::Inner => &self.inner,
        }
    }

    fn side_mut(&mut self, side: ProbeSide) -> &mut Vec<CollisionPlacement> {
        match side {
            ProbeSide::Left => &mut self.left,
            ProbeSide::Up => &mut self.up,
            ProbeSide::Right => &mut self.right,
            ProbeSide::Down => &mut self.down,
            ProbeSide::Inner => &mut self.inner,
        }
    }
}

/// Whether a collider keeps the geometry behind its flags.
#[derive(Clone, Debug, Default)]
pub enum PlacementTracking {
    #[default]
    Disabled,
    Enabled(Box<ProbePlacements>),
}

fn sink(tracking: &mut PlacementTracking, side: ProbeSide) -> Option<&mut Vec<CollisionPlacement>> {
    match tracking {
        PlacementTracking::Enabled(p) => Some(p.side_mut(side)),
        PlacementTracking::Disabled => None,
    }
}

/// Never stops a contact sweep, whatever its direction.
const SWEEP_IGNORE: CollisionFlags = CollisionFlags::NON_SOLID;

/// Body box with four edge probes whose flags are kept current against a
/// [`WorldOracle`].
///
/// Every mutator re-derives the probes and re-queries the oracle before it
/// returns, so reads never see stale flags. Without an oracle all flags stay
/// `NONE` and moves are unobstructed.
#[derive(Clone, Debug)]
pub struct BoxCollider<'w, W: WorldOracle + ?Sized> {
    world: Option<&'w W>,
    cfg: ColliderConfig,
    body: Aabb,

    left: Aabb,
    up: Aabb,
    right: Aabb,
    down: Aabb,

    left_flags: CollisionFlags,
    up_flags: CollisionFlags,
    right_flags: CollisionFlags,
    down_flags: CollisionFlags,
    inner_flags: CollisionFlags,
    landed_slope: Option<RightTriangle>,

    tracking: PlacementTracking,
}

impl<'w, W: WorldOracle + ?Sized> BoxCollider<'w, W> {
    pub fn new(world: &'w W, body: Aabb, cfg: &ColliderConfig) -> Self {
        Self::build(Some(world), body, cfg)
    }

    /// Collider with no oracle, for pure geometric probing.
    pub fn detached(body: Aabb, cfg: &ColliderConfig) -> Self {
        Self::build(None, body, cfg)
    }

    fn build(world: Option<&'w W>, body: Aabb, cfg: &ColliderConfig) -> Self {
        let tracking = if cfg.track_placements {
            PlacementTracking::Enabled(Box::default())
        } else {
            PlacementTracking::Disabled
        };
        let mut c = Self {
            world,
            cfg: *cfg,
            body,
            left: Aabb::default(),
            up: Aabb::default(),
            right: Aabb::default(),
            down: Aabb::default(),
            left_flags: CollisionFlags::NONE,
            up_flags: CollisionFlags::NONE,
            right_flags: CollisionFlags::NONE,
            down_flags: CollisionFlags::NONE,
            inner_flags: CollisionFlags::NONE,
            landed_slope: None,
            tracking,
        };
        c.update_colliders();
        c
    }

    // --- Accessors -----------------------------------------------------------

    /// Oracle the boxes are tested against; `None` while detached.
    pub fn world(&self) -> Option<&'w W> { self.world }
    /// Settings the collider was built with, including later mask and offset changes.
    pub fn config(&self) -> &ColliderConfig { &self.cfg }
    /// Current body box in world units.
    pub fn body(&self) -> Aabb { self.body }
    /// Thickness of the side boxes beyond the body edge.
    pub fn mask_size(&self) -> Fixed { self.cfg.mask_size }
    /// Inset from the body top where the left and right boxes begin.
    pub fn side_top_offset(&self) -> Fixed { self.cfg.side_top_offset }
    /// Inset from the body bottom where the left and right boxes end.
    pub fn side_bottom_offset(&self) -> Fixed { self.cfg.side_bottom_offset }

    /// Box tested for `side`; `Inner` is the body itself.
    pub fn probe(&self, side: ProbeSide) -> Aabb {
        match side {
            ProbeSide::Left => self.left,
            ProbeSide::Up => self.up,
            ProbeSide::Right => self.right,
            ProbeSide::Down => self.down,
            ProbeSide::Inner => self.body,
        }
    }

    /// Flags found under the box of `side` at the last refresh.
    pub fn flags(&self, side: ProbeSide) -> CollisionFlags {
        match side {
            ProbeSide::Left => self.left_flags,
            ProbeSide::Up => self.up_flags,
            ProbeSide::Right => self.right_flags,
            ProbeSide::Down => self.down_flags,
            ProbeSide::Inner => self.inner_flags,
        }
    }

    /// Strip left of the body, already clipped by a downhill ramp.
    pub fn left_probe(&self) -> Aabb { self.left }
    /// Strip above the body.
    pub fn up_probe(&self) -> Aabb { self.up }
    /// Strip right of the body, already clipped by a downhill ramp.
    pub fn right_probe(&self) -> Aabb { self.right }
    /// Strip below the body.
    pub fn down_probe(&self) -> Aabb { self.down }

    /// Same as `flags(ProbeSide::Left)`.
    pub fn left_flags(&self) -> CollisionFlags { self.left_flags }
    /// Same as `flags(ProbeSide::Up)`.
    pub fn up_flags(&self) -> CollisionFlags { self.up_flags }
    /// Same as `flags(ProbeSide::Right)`.
    pub fn right_flags(&self) -> CollisionFlags { self.right_flags }
    /// Landed state under the body; equality with a single flag decides the `landed_*` predicates.
    pub fn down_flags(&self) -> CollisionFlags { self.down_flags }
    /// Flags overlapping the body itself.
    pub fn inner_flags(&self) -> CollisionFlags { self.inner_flags }

    /// Ramp under the body; set only while landed on a slope.
    pub fn landed_slope(&self) -> Option<RightTriangle> { self.landed_slope }

    /// Placement bookkeeping; `Disabled` unless `track_placements` was set.
    pub fn tracking(&self) -> &PlacementTracking { &self.tracking }

    /// Geometry behind the last flags of `side`; empty when tracking is off.
    pub fn placements(&self, side: ProbeSide) -> &[CollisionPlacement] {
        match &self.tracking {
            PlacementTracking::Enabled(p) => p.side(side),
            PlacementTracking::Disabled => &[],
        }
    }

    // --- Predicates ----------------------------------------------------------

    pub fn blocked_left(&self) -> bool { self.left_flags.contains(CollisionFlags::BLOCK) }
    pub fn blocked_up(&self) -> bool { self.up_flags.contains(CollisionFlags::BLOCK) }
    pub fn blocked_right(&self) -> bool { self.right_flags.contains(CollisionFlags::BLOCK) }

    /// Standing on exactly one of block, slope or top-of-ladder.
    pub fn landed(&self) -> bool { self.down_flags.is_primary_floor() }
    pub fn landed_on_block(&self) -> bool { self.down_flags == CollisionFlags::BLOCK }
    pub fn landed_on_slope(&self) -> bool { self.down_flags == CollisionFlags::SLOPE }
    pub fn landed_on_top_ladder(&self) -> bool { self.down_flags == CollisionFlags::TOP_LADDER }

    pub fn underwater(&self) -> bool { self.inner_flags.contains(CollisionFlags::WATER) }
    pub fn touching_water_surface(&self) -> bool { self.inner_flags.contains(CollisionFlags::WATER_SURFACE) }

    pub fn is_touching_left(&self, other: &Aabb) -> bool { self.left.overlaps(other) }
    pub fn is_touching_up(&self, other: &Aabb) -> bool { self.up.overlaps(other) }
    pub fn is_touching_right(&self, other: &Aabb) -> bool { self.right.overlaps(other) }
    pub fn is_touching_down(&self, other: &Aabb) -> bool { self.down.overlaps(other) }

    // --- Mutators ------------------------------------------------------------

    pub fn set_world(&mut self, world: Option<&'w W>) {
        self.world = world;
        self.update_colliders();
    }

    pub fn set_body(&mut self, body: Aabb) {
        self.body = body;
        self.update_colliders();
    }

    pub fn set_mask_size(&mut self, mask_size: Fixed) {
        self.cfg.mask_size = mask_size;
        self.update_colliders();
    }

    pub fn set_side_top_offset(&mut self, offset: Fixed) {
        self.cfg.side_top_offset = offset;
        self.update_colliders();
    }

    pub fn set_side_bottom_offset(&mut self, offset: Fixed) {
        self.cfg.side_bottom_offset = offset;
        self.update_colliders();
    }

    pub fn translate(&mut self, delta: Vector) {
        self.body = self.body + delta;
        self.update_colliders();
    }

    fn update_colliders(&mut self) {
        let b = self.body;
        let m = self.cfg.mask_size;
        let top = b.top() + self.cfg.side_top_offset;
        let side_h = b.height() - self.cfg.side_top_offset - self.cfg.side_bottom_offset;
        self.left = Aabb::new(b.left() - m, top, m, side_h);
        self.right = Aabb::new(b.right(), top, m, side_h);
        self.up = Aabb::new(b.left(), b.top() - m, b.width(), m);
        self.down = Aabb::new(b.left(), b.bottom(), b.width(), m);
        self.update_flags();
    }

    fn update_flags(&mut self) {
        if let PlacementTracking::Enabled(p) = &mut self.tracking {
            p.clear();
        }
        let Some(world) = self.world else {
            self.left_flags = CollisionFlags::NONE;
            self.up_flags = CollisionFlags::NONE;
            self.right_flags = CollisionFlags::NONE;
            self.down_flags = CollisionFlags::NONE;
            self.inner_flags = CollisionFlags::NONE;
            self.landed_slope = None;
            return;
        };
        let m = self.cfg.mask_size;
        let none = CollisionFlags::NONE;

        let landed = world.landed_state(self.body, sink(&mut self.tracking, ProbeSide::Down), m, none);
        self.down_flags = landed.flags;
        self.landed_slope = if landed.flags == CollisionFlags::SLOPE { landed.slope } else { None };

        // Keep the downhill side probe above the ramp.
        if let Some(slope) = self.landed_slope {
            if !slope.h_cathetus.is_zero() {
                let clip = slope.v_cathetus.mul_div(self.body.width() + m, slope.h_cathetus).abs();
                match slope.h_cathetus_sign() {
                    1 => self.right = self.right.clip_bottom(clip),
                    -1 => self.left = self.left.clip_bottom(clip),
                    _ => {}
                }
            }
        }

        self.up_flags = world.collision_flags(self.up, sink(&mut self.tracking, ProbeSide::Up), none, true);
        self.left_flags = world.collision_flags(self.left, sink(&mut self.tracking, ProbeSide::Left), none, true);
        self.right_flags = world.collision_flags(self.right, sink(&mut self.tracking, ProbeSide::Right), none, true);
        self.inner_flags = world.collision_flags(self.body, sink(&mut self.tracking, ProbeSide::Inner), none, true);
    }

    // --- Movement ------------------------------------------------------------

    /// Move toward `dir`, stopping at solid geometry on the axes `masks` allows.
    ///
    /// Each moving axis sweeps its leading probe along `dir`; the shorter of
    /// the two results is applied. Returns the applied delta.
    pub fn move_contact_solid(&mut self, dir: Vector, max_distance: Fixed, masks: Direction, ignore: CollisionFlags) -> Vector {
        let sweep = |probe: Aabb, side: Direction, extra: CollisionFlags| -> Vector {
            match self.world {
                Some(world) if masks.intersects(side) => {
                    let moved = world.move_until_intersect(probe, dir, max_distance, self.cfg.mask_size, ignore | extra);
                    moved.origin() - probe.origin()
                }
                _ => dir,
            }
        };

        let delta_x = if dir.x.is_positive() {
            sweep(self.right, Direction::RIGHT, SWEEP_IGNORE)
        } else if dir.x.is_negative() {
            sweep(self.left, Direction::LEFT, SWEEP_IGNORE)
        } else {
            dir
        };
        let delta_y = if dir.y.is_positive() {
            sweep(self.down, Direction::DOWN, SWEEP_IGNORE)
        } else if dir.y.is_negative() {
            sweep(self.up, Direction::UP, SWEEP_IGNORE)
        } else {
            delta_x
        };

        let delta = if delta_x.length_squared() < delta_y.length_squared() { delta_x } else { delta_y };
        self.translate(delta);
        delta
    }

    pub fn move_contact_solid_default(&mut self, dir: Vector) -> Vector {
        self.move_contact_solid(dir, self.cfg.query_max_distance, Direction::ALL, CollisionFlags::NONE)
    }

    /// Drop onto the nearest floor within `max_distance`, or fall the full
    /// distance when there is none.
    pub fn move_contact_floor(&mut self, max_distance: Fixed, ignore: CollisionFlags) {
        let Some(world) = self.world else { return };
        let body = world.move_contact_floor(self.body, max_distance, self.cfg.mask_size, ignore);
        self.set_body(body);
    }

    pub fn move_contact_floor_default(&mut self) {
        self.move_contact_floor(self.cfg.query_max_distance, CollisionFlags::NONE);
    }

    /// Snap onto a floor within `max_distance`; leaves the body untouched and
    /// returns false when no floor is in reach.
    pub fn try_move_contact_floor(&mut self, max_distance: Fixed, ignore: CollisionFlags) -> bool {
        let Some(world) = self.world else { return false };
        match world.try_move_contact_floor(self.body, max_distance, self.cfg.mask_size, ignore) {
            Some(body) => {
                self.set_body(body);
                true
            }
            None => false,
        }
    }

    pub fn try_move_contact_floor_default(&mut self) -> bool {
        self.try_move_contact_floor(self.cfg.query_max_distance, CollisionFlags::NONE)
    }

    /// [`try_move_contact_floor`](Self::try_move_contact_floor) restricted to ramps.
    pub fn try_move_contact_slope(&mut self, max_distance: Fixed, ignore: CollisionFlags) -> bool {
        let Some(world) = self.world else { return false };
        match world.try_move_contact_slope(self.body, max_distance, self.cfg.mask_size, ignore) {
            Some(body) => {
                self.set_body(body);
                true
            }
            None => false,
        }
    }

    pub fn try_move_contact_slope_default(&mut self) -> bool {
        self.try_move_contact_slope(self.cfg.query_max_distance, CollisionFlags::NONE)
    }

    /// Lift a body sunk into the floor back onto its surface.
    pub fn adjust_on_the_floor(&mut self, max_distance: Fixed, ignore: CollisionFlags) {
        let Some(world) = self.world else { return };
        let body = world.adjust_on_the_floor(self.body, max_distance, self.cfg.mask_size, ignore);
        self.set_body(body);
    }

    pub fn adjust_on_the_floor_default(&mut self) {
        self.adjust_on_the_floor(self.cfg.query_max_distance, CollisionFlags::NONE);
    }

    /// Center the body horizontally on the ladder it is standing on (top of
    /// ladder below) or holding (ladder above). Needs placement tracking.
    /// Returns whether a ladder was found.
    pub fn adjust_on_the_ladder(&mut self) -> bool {
        let (side, flag) = if self.landed_on_top_ladder() {
            (ProbeSide::Down, CollisionFlags::TOP_LADDER)
        } else {
            (ProbeSide::Up, CollisionFlags::LADDER)
        };
        let Some(tile) = self.placements(side).iter().find(|p| p.flag.contains(flag)).map(|p| p.bounds) else {
            return false;
        };
        let dx = tile.left() + (tile.width() - self.body.width()) / 2 - self.body.left();
        debug!("collider: centering on ladder at ({}, {}), dx={}", tile.left(), tile.top(), dx);
        self.translate(Vector::new(dx, Fixed::ZERO));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Oracle answering every query with fixed values.
    struct Scripted {
        flags: CollisionFlags,
        landed: LandedState,
    }

    impl Scripted {
        fn new(flags: CollisionFlags, landed: LandedState) -> Self {
            Self { flags, landed }
        }
    }

    impl WorldOracle for Scripted {
        fn step_size(&self) -> Fixed {
            STEP_SIZE
        }

        fn collision_flags(
            &self,
            probe: Aabb,
            placements: Option<&mut Vec<CollisionPlacement>>,
            ignore: CollisionFlags,
            _precise: bool,
        ) -> CollisionFlags {
            let flags = self.flags - ignore;
            if let Some(sink) = placements {
                if !flags.is_empty() {
                    sink.push(CollisionPlacement { flag: flags, bounds: probe, slope: None, row: 0, col: 0 });
                }
            }
            flags
        }

        fn landed_state(&self, _: Aabb, _: Option<&mut Vec<CollisionPlacement>>, _: Fixed, _: CollisionFlags) -> LandedState {
            self.landed
        }

        fn move_until_intersect(&self, probe: Aabb, dir: Vector, _: Fixed, _: Fixed, ignore: CollisionFlags) -> Aabb {
            if (self.flags - ignore).can_block(Direction::ALL) { probe } else { probe + dir }
        }

        fn move_contact_floor(&self, body: Aabb, _: Fixed, _: Fixed, _: CollisionFlags) -> Aabb {
            body
        }

        fn adjust_on_the_floor(&self, body: Aabb, _: Fixed, _: Fixed, _: CollisionFlags) -> Aabb {
            body
        }

        fn try_move_contact_floor(&self, _: Aabb, _: Fixed, _: Fixed, _: CollisionFlags) -> Option<Aabb> {
            None
        }

        fn try_move_contact_slope(&self, _: Aabb, _: Fixed, _: Fixed, _: CollisionFlags) -> Option<Aabb> {
            None
        }
    }

    fn cfg() -> ColliderConfig {
        ColliderConfig::default()
    }

    fn body() -> Aabb {
        Aabb::from_ints(32, 32, 16, 16)
    }

    #[test]
    fn test_probe_geometry() {
        let mut c = BoxCollider::<Scripted>::detached(body(), &ColliderConfig { mask_size: Fixed::ONE, ..cfg() });
        assert_eq!(c.left_probe(), Aabb::from_ints(31, 32, 1, 16));
        assert_eq!(c.right_probe(), Aabb::from_ints(48, 32, 1, 16));
        assert_eq!(c.up_probe(), Aabb::from_ints(32, 31, 16, 1));
        assert_eq!(c.down_probe(), Aabb::from_ints(32, 48, 16, 1));
        assert_eq!(c.probe(ProbeSide::Inner), body());

        c.set_side_top_offset(Fixed::from_int(2));
        c.set_side_bottom_offset(Fixed::from_int(4));
        assert_eq!(c.left_probe(), Aabb::from_ints(31, 34, 1, 10));
        assert_eq!(c.right_probe(), Aabb::from_ints(48, 34, 1, 10));
        assert_eq!(c.up_probe(), Aabb::from_ints(32, 31, 16, 1));
    }

    #[test]
    fn test_detached_collider_reports_nothing() {
        let mut c = BoxCollider::<Scripted>::detached(body(), &cfg());
        assert_eq!(c.down_flags(), CollisionFlags::NONE);
        assert!(!c.landed() && !c.blocked_left() && !c.underwater());
        let d = c.move_contact_solid(Vector::from_ints(3, -2), Fixed::ONE, Direction::ALL, CollisionFlags::NONE);
        assert_eq!(d, Vector::from_ints(3, -2));
        assert_eq!(c.body(), Aabb::from_ints(35, 30, 16, 16));
        assert!(!c.try_move_contact_floor_default());
        assert!(!c.adjust_on_the_ladder());
    }

    #[test]
    fn test_update_is_idempotent() {
        let tri = RightTriangle::new(Vector::from_ints(0, 48), Fixed::from_int(32), Fixed::from_int(-8));
        let w = Scripted::new(CollisionFlags::BLOCK, LandedState::sloped(tri));
        let mut c = BoxCollider::new(&w, body(), &cfg());
        let before = [c.left_probe(), c.up_probe(), c.right_probe(), c.down_probe()];
        let flags = [c.left_flags(), c.up_flags(), c.right_flags(), c.down_flags(), c.inner_flags()];
        c.set_body(body());
        assert_eq!([c.left_probe(), c.up_probe(), c.right_probe(), c.down_probe()], before);
        assert_eq!([c.left_flags(), c.up_flags(), c.right_flags(), c.down_flags(), c.inner_flags()], flags);
    }

    #[test]
    fn test_slope_clips_downhill_side() {
        let falling = RightTriangle::new(Vector::from_ints(0, 48), Fixed::from_int(32), Fixed::from_int(-8));
        let w = Scripted::new(CollisionFlags::NONE, LandedState::sloped(falling));
        let c = BoxCollider::new(&w, body(), &cfg());
        assert!(c.landed_on_slope());
        assert_eq!(c.landed_slope(), Some(falling));
        // 8 * (16 + mask) / 32
        let clip = Fixed::from_int(4) + Fixed::from_raw(STEP_SIZE.raw() / 4);
        assert_eq!(c.left_probe().height(), Fixed::from_int(16));
        assert_eq!(c.right_probe().height(), Fixed::from_int(16) - clip);

        let rising = RightTriangle::new(Vector::from_ints(32, 48), Fixed::from_int(-32), Fixed::from_int(-8));
        let w = Scripted::new(CollisionFlags::NONE, LandedState::sloped(rising));
        let c = BoxCollider::new(&w, body(), &cfg());
        assert_eq!(c.left_probe().height(), Fixed::from_int(16) - clip);
        assert_eq!(c.right_probe().height(), Fixed::from_int(16));
    }

    #[test]
    fn test_landed_requires_exact_floor_state() {
        let w = Scripted::new(CollisionFlags::NONE, LandedState::of(CollisionFlags::BLOCK | CollisionFlags::SLOPE));
        let c = BoxCollider::new(&w, body(), &cfg());
        assert!(!c.landed());
        assert!(!c.landed_on_block());
        assert!(!c.landed_on_slope());
        assert_eq!(c.landed_slope(), None);

        let w = Scripted::new(CollisionFlags::NONE, LandedState::of(CollisionFlags::TOP_LADDER));
        let c = BoxCollider::new(&w, body(), &cfg());
        assert!(c.landed() && c.landed_on_top_ladder() && !c.landed_on_block());
    }

    #[test]
    fn test_non_solid_bits_are_reported_not_blocking() {
        let w = Scripted::new(CollisionFlags::LADDER | CollisionFlags::WATER, LandedState::NONE);
        let mut c = BoxCollider::new(&w, body(), &cfg());
        assert!(!c.blocked_left() && !c.blocked_up() && !c.blocked_right());
        assert!(c.underwater());
        assert!(!c.touching_water_surface());
        assert!(c.up_flags().contains(CollisionFlags::LADDER));
        // Sweeps pass through them.
        let d = c.move_contact_solid(Vector::from_ints(1, 0), Fixed::ONE, Direction::ALL, CollisionFlags::NONE);
        assert_eq!(d, Vector::from_ints(1, 0));
    }

    #[test]
    fn test_move_contact_solid_masks_and_tie_break() {
        let w = Scripted::new(CollisionFlags::BLOCK, LandedState::NONE);
        let mut c = BoxCollider::new(&w, body(), &cfg());
        assert!(c.blocked_left() && c.blocked_right() && c.blocked_up());
        // Blocked on both axes.
        let d = c.move_contact_solid(Vector::from_ints(1, 1), Fixed::ONE, Direction::ALL, CollisionFlags::NONE);
        assert_eq!(d, Vector::ZERO);
        // Horizontal check masked off: x moves freely, y stays blocked, shorter wins.
        let d = c.move_contact_solid(Vector::from_ints(1, 1), Fixed::ONE, Direction::UPDOWN, CollisionFlags::NONE);
        assert_eq!(d, Vector::ZERO);
        // Only x moving and unmasked.
        let d = c.move_contact_solid(Vector::from_ints(2, 0), Fixed::ONE, Direction::UPDOWN, CollisionFlags::NONE);
        assert_eq!(d, Vector::from_ints(2, 0));
        // Caller ignore mask clears the block.
        let d = c.move_contact_solid(Vector::from_ints(0, -1), Fixed::ONE, Direction::ALL, CollisionFlags::BLOCK);
        assert_eq!(d, Vector::from_ints(0, -1));
        assert_eq!(c.body(), Aabb::from_ints(34, 31, 16, 16));
    }

    #[test]
    fn test_placements_follow_tracking() {
        let w = Scripted::new(CollisionFlags::LADDER, LandedState::NONE);
        let c = BoxCollider::new(&w, body(), &cfg());
        assert!(matches!(c.tracking(), PlacementTracking::Disabled));
        assert!(c.placements(ProbeSide::Up).is_empty());

        let c = BoxCollider::new(&w, body(), &ColliderConfig { track_placements: true, ..cfg() });
        assert_eq!(c.placements(ProbeSide::Up).len(), 1);
        assert_eq!(c.placements(ProbeSide::Inner).len(), 1);
        assert!(c.placements(ProbeSide::Down).is_empty());
    }

    #[test]
    fn test_touching_other_boxes() {
        let c = BoxCollider::<Scripted>::detached(body(), &cfg());
        let wall = Aabb::from_ints(48, 30, 8, 8);
        assert!(c.is_touching_right(&wall));
        assert!(!c.is_touching_left(&wall));
        assert!(c.is_touching_down(&Aabb::from_ints(40, 48, 4, 4)));
        assert!(!c.is_touching_up(&Aabb::from_ints(40, 48, 4, 4)));
    }
}
