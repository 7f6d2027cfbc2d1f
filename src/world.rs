use log::debug;

use crate::api::WorldOracle;
use crate::config::WorldConfig;
use crate::error::{Error, Result};
use crate::fixed::Fixed;
use crate::geometry::{Aabb, RightTriangle, Vector};
use crate::types::*;

/// Contents of one map tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
    /// Solid wall that cannot be wall-jumped.
    Unclimbable,
    Ladder,
    /// Topmost ladder tile; stands in as a floor when falling.
    TopLadder,
    Water,
    WaterSurface,
    /// Ramp whose surface sits `left`/`right` units below the tile top at
    /// its left/right edges.
    Slope { left: Fixed, right: Fixed },
}

impl Tile {
    pub fn flags(self) -> CollisionFlags {
        match self {
            Tile::Empty => CollisionFlags::NONE,
            Tile::Solid => CollisionFlags::BLOCK,
            Tile::Unclimbable => CollisionFlags::BLOCK | CollisionFlags::UNCLIMBABLE,
            Tile::Ladder => CollisionFlags::LADDER,
            Tile::TopLadder => CollisionFlags::TOP_LADDER,
            Tile::Water => CollisionFlags::WATER,
            Tile::WaterSurface => CollisionFlags::WATER_SURFACE,
            Tile::Slope { .. } => CollisionFlags::SLOPE,
        }
    }

    /// Layout character for a tile, with `\` falling and `/` rising to the right.
    pub fn from_char(ch: char, tile_size: Fixed) -> Option<Tile> {
        Some(match ch {
            '.' | ' ' => Tile::Empty,
            '#' => Tile::Solid,
            'U' => Tile::Unclimbable,
            'H' => Tile::Ladder,
            'T' => Tile::TopLadder,
            'w' => Tile::Water,
            '~' => Tile::WaterSurface,
            '\\' => Tile::Slope { left: Fixed::ZERO, right: tile_size },
            '/' => Tile::Slope { left: tile_size, right: Fixed::ZERO },
            _ => return None,
        })
    }
}

/// Ramp triangle for a slope tile whose top-left corner is at the origin.
pub fn slope_triangle(left: Fixed, right: Fixed, tile_size: Fixed) -> RightTriangle {
    if left < right {
        RightTriangle::new(Vector::new(Fixed::ZERO, right), tile_size, left - right)
    } else {
        RightTriangle::new(Vector::new(tile_size, left), -tile_size, right - left)
    }
}

/// Tile-grid world answering collision queries for colliders.
///
/// Tiles are square, laid out row-major from the origin. Anything outside
/// the grid is empty.
#[derive(Clone, Debug)]
pub struct TileWorld {
    cfg: WorldConfig,
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl TileWorld {
    pub fn new(cfg: WorldConfig, rows: usize, cols: usize) -> Result<Self> {
        cfg.validate()?;
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }
        let ts = cfg.tile_size.raw() as i64;
        let (right, bottom) = (ts.saturating_mul(cols as i64), ts.saturating_mul(rows as i64));
        if right > i32::MAX as i64 || bottom > i32::MAX as i64 {
            return Err(Error::ExtentOverflow { right, bottom });
        }
        Ok(Self { cfg, rows, cols, tiles: vec![Tile::Empty; rows * cols] })
    }

    /// Build a world from one string per tile row.
    pub fn from_layout(cfg: WorldConfig, layout: &[&str]) -> Result<Self> {
        let cols = layout.first().map_or(0, |r| r.chars().count());
        let mut world = Self::new(cfg, layout.len(), cols)?;
        for (row, line) in layout.iter().enumerate() {
            let len = line.chars().count();
            if len != cols {
                return Err(Error::RaggedLayout { row, len, expected: cols });
            }
            for (col, ch) in line.chars().enumerate() {
                let tile = Tile::from_char(ch, cfg.tile_size).ok_or(Error::UnknownTile { ch, row, col })?;
                world.tiles[row * cols + col] = tile;
            }
        }
        debug!("world: {}x{} tiles loaded", world.rows, world.cols);
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig { &self.cfg }
    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    pub fn bounds(&self) -> Aabb {
        let ts = self.cfg.tile_size;
        Aabb::new(Fixed::ZERO, Fixed::ZERO, ts * self.cols as i32, ts * self.rows as i32)
    }

    pub fn tile(&self, row: usize, col: usize) -> Tile {
        if row < self.rows && col < self.cols { self.tiles[row * self.cols + col] } else { Tile::Empty }
    }

    /// Returns false when the cell is outside the grid.
    pub fn set_tile(&mut self, row: usize, col: usize, tile: Tile) -> bool {
        if row >= self.rows || col >= self.cols {
            return false;
        }
        self.tiles[row * self.cols + col] = tile;
        true
    }

    /// Set every tile of a rectangle, clipped to the grid.
    pub fn fill(&mut self, row: usize, col: usize, rows: usize, cols: usize, tile: Tile) {
        for r in row..(row + rows).min(self.rows) {
            for c in col..(col + cols).min(self.cols) {
                self.tiles[r * self.cols + c] = tile;
            }
        }
    }

    pub fn tile_bounds(&self, row: usize, col: usize) -> Aabb {
        let ts = self.cfg.tile_size;
        Aabb::new(ts * col as i32, ts * row as i32, ts, ts)
    }

    fn slope_at(&self, row: usize, col: usize, left: Fixed, right: Fixed) -> RightTriangle {
        slope_triangle(left, right, self.cfg.tile_size).translate(self.tile_bounds(row, col).origin())
    }

    fn span(&self, lo: Fixed, hi: Fixed, n: usize) -> (usize, usize) {
        let ts = self.cfg.tile_size;
        let clamp = |v: i32| v.clamp(0, n as i32 - 1) as usize;
        (clamp(lo.div_floor(ts)), clamp(hi.div_floor(ts)))
    }

    /// Flags of every tile overlapping `probe`, plus the last ramp touched.
    fn scan(
        &self,
        probe: Aabb,
        mut placements: Option<&mut Vec<CollisionPlacement>>,
        ignore: CollisionFlags,
        precise: bool,
    ) -> (CollisionFlags, Option<RightTriangle>) {
        let mut flags = CollisionFlags::NONE;
        let mut slope = None;
        let (c0, c1) = self.span(probe.left(), probe.right(), self.cols);
        let (r0, r1) = self.span(probe.top(), probe.bottom(), self.rows);
        for row in r0..=r1 {
            for col in c0..=c1 {
                let tile = self.tile(row, col);
                let flag = tile.flags() - ignore;
                if flag.is_empty() { continue; }
                let bounds = self.tile_bounds(row, col);
                if !bounds.overlaps(&probe) { continue; }
                let triangle = match tile {
                    Tile::Slope { left, right } => {
                        let tri = self.slope_at(row, col, left, right);
                        if precise && !tri.intersects_box(&probe) { continue; }
                        slope = Some(tri);
                        Some(tri)
                    }
                    _ => None,
                };
                flags |= flag;
                if let Some(sink) = placements.as_deref_mut() {
                    sink.push(CollisionPlacement { flag, bounds, slope: triangle, row, col });
                }
            }
        }
        (flags, slope)
    }

    /// Step `body` down until `landed` accepts the floor state.
    /// `Err` carries the box at `max_distance` when it never does.
    fn descend(
        &self,
        body: Aabb,
        max_distance: Fixed,
        mask_size: Fixed,
        ignore: CollisionFlags,
        landed: impl Fn(CollisionFlags) -> bool,
    ) -> core::result::Result<Aabb, Aabb> {
        let mut travelled = Fixed::ZERO;
        loop {
            let b = body + Vector::new(Fixed::ZERO, travelled);
            if landed(self.landed_state(b, None, mask_size, ignore).flags) {
                return Ok(b);
            }
            if travelled >= max_distance {
                return Err(b);
            }
            travelled = (travelled + self.cfg.step_size).min(max_distance);
        }
    }
}

impl WorldOracle for TileWorld {
    fn step_size(&self) -> Fixed {
        self.cfg.step_size
    }

    fn collision_flags(
        &self,
        probe: Aabb,
        placements: Option<&mut Vec<CollisionPlacement>>,
        ignore: CollisionFlags,
        precise: bool,
    ) -> CollisionFlags {
        self.scan(probe, placements, ignore, precise).0
    }

    fn landed_state(
        &self,
        body: Aabb,
        placements: Option<&mut Vec<CollisionPlacement>>,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> LandedState {
        let strip = body.clip_top(body.height() - mask_size) + Vector::new(Fixed::ZERO, mask_size);
        let mut left_hits = placements.is_some().then(Vec::new);
        let mut right_hits = placements.is_some().then(Vec::new);
        let (lf, lt) = self.scan(strip.half_left(), left_hits.as_mut(), ignore, true);
        let (rf, rt) = self.scan(strip.half_right(), right_hits.as_mut(), ignore, true);

        let l_blocks = lf.can_block(Direction::ALL);
        let r_blocks = rf.can_block(Direction::ALL);
        let floor = CollisionFlags::BLOCK | CollisionFlags::TOP_LADDER;
        let primary = |f: CollisionFlags| if f.contains(CollisionFlags::BLOCK) { CollisionFlags::BLOCK } else { CollisionFlags::TOP_LADDER };

        // (state, keep left placements, keep right placements)
        let (state, keep_l, keep_r) = if !l_blocks && !r_blocks {
            (LandedState::NONE, false, false)
        } else {
            match (lf.contains(CollisionFlags::SLOPE), rf.contains(CollisionFlags::SLOPE)) {
                (false, false) => {
                    if !l_blocks && rf.intersects(floor) {
                        (LandedState::of(primary(rf)), false, true)
                    } else if lf.intersects(floor) && !r_blocks {
                        (LandedState::of(primary(lf)), true, false)
                    } else if lf.intersects(floor) && rf.intersects(floor) {
                        (LandedState::of(primary(lf)), true, true)
                    } else {
                        (LandedState::NONE, false, false)
                    }
                }
                (false, true) => {
                    if lf.contains(CollisionFlags::BLOCK) {
                        (LandedState::of(CollisionFlags::BLOCK), true, false)
                    } else if lf.contains(CollisionFlags::TOP_LADDER) {
                        (LandedState::of(CollisionFlags::TOP_LADDER), true, false)
                    } else {
                        match rt {
                            Some(tri) if tri.h_cathetus_sign() > 0 => (LandedState::sloped(tri), false, true),
                            _ => (LandedState::NONE, false, false),
                        }
                    }
                }
                (true, false) => {
                    if rf == CollisionFlags::BLOCK {
                        (LandedState::of(CollisionFlags::BLOCK), false, true)
                    } else if rf == CollisionFlags::TOP_LADDER {
                        (LandedState::of(CollisionFlags::TOP_LADDER), false, true)
                    } else {
                        match lt {
                            Some(tri) if tri.h_cathetus_sign() < 0 => (LandedState::sloped(tri), true, false),
                            _ => (LandedState::NONE, false, false),
                        }
                    }
                }
                (true, true) => match lt {
                    Some(tri) => (LandedState::sloped(tri), true, true),
                    None => (LandedState::NONE, false, false),
                },
            }
        };

        if let Some(sink) = placements {
            if keep_l { sink.extend(left_hits.into_iter().flatten()); }
            if keep_r { sink.extend(right_hits.into_iter().flatten()); }
        }
        state
    }

    fn move_until_intersect(
        &self,
        probe: Aabb,
        dir: Vector,
        max_distance: Fixed,
        _mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> Aabb {
        let major = dir.x.abs().max(dir.y.abs());
        let limit = major.min(max_distance);
        if !limit.is_positive() {
            return probe;
        }
        let at = |t: Fixed| probe + Vector::new(dir.x.mul_div(t, major), dir.y.mul_div(t, major));
        let mut travelled = Fixed::ZERO;
        while travelled < limit {
            let b = at(travelled);
            if self.collision_flags(b, None, ignore, true).can_block(Direction::ALL) {
                return b;
            }
            travelled = (travelled + self.cfg.step_size).min(limit);
        }
        at(limit)
    }

    fn move_contact_floor(&self, body: Aabb, max_distance: Fixed, mask_size: Fixed, ignore: CollisionFlags) -> Aabb {
        match self.descend(body, max_distance, mask_size, ignore, |f| f.can_block(Direction::ALL)) {
            Ok(b) | Err(b) => b,
        }
    }

    fn adjust_on_the_floor(&self, body: Aabb, max_distance: Fixed, mask_size: Fixed, ignore: CollisionFlags) -> Aabb {
        let landed = |b: Aabb| self.landed_state(b, None, mask_size, ignore).flags.can_block(Direction::ALL);
        if !landed(body) {
            return body;
        }
        let step = self.cfg.step_size;
        let mut b = body;
        let mut travelled = Fixed::ZERO;
        while travelled < max_distance {
            let up = (max_distance - travelled).min(step);
            let higher = b - Vector::new(Fixed::ZERO, up);
            if !landed(higher) { break; }
            b = higher;
            travelled += up;
        }
        b
    }

    fn try_move_contact_floor(
        &self,
        body: Aabb,
        max_distance: Fixed,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> Option<Aabb> {
        self.descend(body, max_distance, mask_size, ignore, |f| f.can_block(Direction::ALL)).ok()
    }

    fn try_move_contact_slope(
        &self,
        body: Aabb,
        max_distance: Fixed,
        mask_size: Fixed,
        ignore: CollisionFlags,
    ) -> Option<Aabb> {
        self.descend(body, max_distance, mask_size, ignore, |f| f.contains(CollisionFlags::SLOPE)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> WorldConfig {
        WorldConfig::default()
    }

    fn f(v: i32) -> Fixed {
        Fixed::from_int(v)
    }

    fn room() -> TileWorld {
        TileWorld::from_layout(cfg(), &[
            "#......#",
            "#..H...#",
            "#..T..w#",
            "########",
        ])
        .unwrap()
    }

    #[test]
    fn test_layout_parsing_and_errors() {
        let w = room();
        assert_eq!((w.rows(), w.cols()), (4, 8));
        assert_eq!(w.tile(3, 4), Tile::Solid);
        assert_eq!(w.tile(1, 3), Tile::Ladder);
        assert_eq!(w.tile(9, 9), Tile::Empty);
        assert_eq!(w.bounds(), Aabb::from_ints(0, 0, 128, 64));
        assert!(matches!(TileWorld::from_layout(cfg(), &["..", "."]), Err(Error::RaggedLayout { row: 1, .. })));
        assert!(matches!(TileWorld::from_layout(cfg(), &[".x"]), Err(Error::UnknownTile { ch: 'x', .. })));
        assert!(matches!(TileWorld::from_layout(cfg(), &[]), Err(Error::EmptyGrid { .. })));
        let bad = WorldConfig { step_size: Fixed::ZERO, ..cfg() };
        assert!(matches!(TileWorld::new(bad, 1, 1), Err(Error::NonPositiveStep(_))));
    }

    #[test]
    fn test_grid_wider_than_fixed_range_is_rejected() {
        assert!(matches!(TileWorld::new(cfg(), 1, 3000), Err(Error::ExtentOverflow { right: 3_145_728_000, .. })));
        assert!(matches!(TileWorld::new(cfg(), 3000, 1), Err(Error::ExtentOverflow { .. })));
        let w = TileWorld::new(cfg(), 1, 2047).unwrap();
        assert_eq!(w.bounds().right(), f(32752));
    }

    #[test]
    fn test_edit_tiles() {
        let mut w = TileWorld::new(cfg(), 4, 4).unwrap();
        assert!(w.set_tile(0, 0, Tile::Water));
        assert!(!w.set_tile(4, 0, Tile::Water));
        w.fill(2, 1, 5, 5, Tile::Solid);
        assert_eq!(w.tile(3, 3), Tile::Solid);
        assert_eq!(w.tile(1, 1), Tile::Empty);
    }

    #[test]
    fn test_collision_flags_and_placements() {
        let w = room();
        let probe = Aabb::from_ints(40, 40, 70, 16);
        let mut hits = Vec::new();
        let flags = w.collision_flags(probe, Some(&mut hits), CollisionFlags::NONE, true);
        assert_eq!(flags, CollisionFlags::BLOCK | CollisionFlags::TOP_LADDER | CollisionFlags::WATER);
        assert!(hits.iter().any(|p| p.flag == CollisionFlags::TOP_LADDER && (p.row, p.col) == (2, 3)));
        assert_eq!(hits.iter().filter(|p| p.flag == CollisionFlags::BLOCK).count(), 5);

        let solid_only = w.collision_flags(probe, None, CollisionFlags::NON_SOLID, true);
        assert_eq!(solid_only, CollisionFlags::BLOCK);
        // Touching the floor top without overlapping it.
        assert_eq!(w.collision_flags(Aabb::from_ints(16, 32, 16, 16), None, CollisionFlags::NONE, true), CollisionFlags::NONE);
        // Outside the map is empty.
        assert_eq!(w.collision_flags(Aabb::from_ints(500, 500, 8, 8), None, CollisionFlags::NONE, true), CollisionFlags::NONE);
    }

    #[test]
    fn test_slope_triangles_follow_tile_heights() {
        let ts = f(16);
        let falling = slope_triangle(Fixed::ZERO, ts, ts);
        assert_eq!(falling.h_cathetus_sign(), 1);
        assert_eq!(falling.wrapping_box(), Aabb::from_ints(0, 0, 16, 16));
        let rising = slope_triangle(ts, f(8), ts);
        assert_eq!(rising.h_cathetus_sign(), -1);
        assert_eq!(rising.wrapping_box(), Aabb::from_ints(0, 8, 16, 8));
    }

    #[test]
    fn test_precise_slope_check() {
        let w = TileWorld::from_layout(cfg(), &["\\"]).unwrap();
        // Upper-right corner is air above the ramp.
        let probe = Aabb::from_ints(12, 0, 4, 4);
        assert_eq!(w.collision_flags(probe, None, CollisionFlags::NONE, true), CollisionFlags::NONE);
        assert_eq!(w.collision_flags(probe, None, CollisionFlags::NONE, false), CollisionFlags::SLOPE);
        let mut hits = Vec::new();
        w.collision_flags(Aabb::from_ints(0, 12, 4, 4), Some(&mut hits), CollisionFlags::NONE, true);
        assert!(hits[0].slope.is_some());
    }

    #[test]
    fn test_landed_state_on_flat_floor() {
        let w = room();
        let mask = MASK_SIZE;
        let on_floor = Aabb::from_ints(16, 32, 16, 16);
        let mut hits = Vec::new();
        assert_eq!(w.landed_state(on_floor, Some(&mut hits), mask, CollisionFlags::NONE), LandedState::of(CollisionFlags::BLOCK));
        assert!(!hits.is_empty());
        assert_eq!(w.landed_state(on_floor - Vector::from_ints(0, 1), None, mask, CollisionFlags::NONE), LandedState::NONE);
        assert_eq!(w.landed_state(on_floor, None, mask, CollisionFlags::BLOCK), LandedState::NONE);
    }

    #[test]
    fn test_landed_state_on_top_ladder() {
        let w = room();
        // Standing on the top-ladder tile at row 2, col 3.
        let body = Aabb::from_ints(48, 16, 16, 16);
        let mut hits = Vec::new();
        let state = w.landed_state(body, Some(&mut hits), MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(state.flags, CollisionFlags::TOP_LADDER);
        assert!(hits.iter().all(|p| p.flag == CollisionFlags::TOP_LADDER));
    }

    #[test]
    fn test_landed_state_on_ramp() {
        let w = TileWorld::from_layout(cfg(), &["....", "..\\.", "####"]).unwrap();
        // Ramp surface runs from (32,16) to (48,32); a body centered on x = 40.
        let body = Aabb::from_ints(36, 8, 8, 16);
        let state = w.landed_state(body, None, MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(state.flags, CollisionFlags::SLOPE);
        assert_eq!(state.slope.map(|t| t.h_cathetus_sign()), Some(1));
        // Only the uphill half touches: not landed yet.
        let high = body - Vector::from_ints(0, 4);
        assert_eq!(w.landed_state(high, None, MASK_SIZE, CollisionFlags::NONE), LandedState::NONE);
        let snapped = w.try_move_contact_slope(high, f(8), MASK_SIZE, CollisionFlags::NONE).unwrap();
        assert_eq!(snapped, body);
    }

    #[test]
    fn test_floor_snaps() {
        let w = room();
        let body = Aabb::from_ints(16, 31, 16, 16);
        let landed = w.move_contact_floor(body, f(8), MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(landed.bottom(), f(48));
        assert_eq!(w.try_move_contact_floor(body, f(8), MASK_SIZE, CollisionFlags::NONE), Some(landed));

        let high = Aabb::from_ints(16, 20, 16, 16);
        assert_eq!(w.try_move_contact_floor(high, f(8), MASK_SIZE, CollisionFlags::NONE), None);
        assert_eq!(w.move_contact_floor(high, f(8), MASK_SIZE, CollisionFlags::NONE).top(), f(28));
        assert_eq!(w.try_move_contact_slope(body, f(8), MASK_SIZE, CollisionFlags::NONE), None);

        let sunk = Aabb::from_ints(16, 34, 16, 16);
        assert_eq!(w.adjust_on_the_floor(sunk, f(4), MASK_SIZE, CollisionFlags::NONE).top(), f(32));
        assert_eq!(w.adjust_on_the_floor(high, f(4), MASK_SIZE, CollisionFlags::NONE), high);
    }

    #[test]
    fn test_move_until_intersect() {
        let w = room();
        let probe = Aabb::new(f(106), f(16), STEP_SIZE, f(16));
        let hit = w.move_until_intersect(probe, Vector::from_ints(10, 0), f(16), MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(hit.left(), f(112));
        // Bounded by the direction length when nothing is hit.
        let free = w.move_until_intersect(probe, Vector::from_ints(-4, 0), f(16), MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(free.left(), f(102));
        // And by max_distance.
        let short = w.move_until_intersect(probe, Vector::from_ints(10, 0), f(2), MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(short.left(), f(108));
        // Diagonal moves stay on the line.
        let diag = w.move_until_intersect(probe, Vector::from_ints(-4, 2), f(16), MASK_SIZE, CollisionFlags::NONE);
        assert_eq!(diag.origin(), Vector::from_ints(102, 18));
    }
}
