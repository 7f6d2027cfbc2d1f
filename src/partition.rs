use glam::IVec2;
use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::api::Indexed;
use crate::config::PartitionConfig;
use crate::error::{Error, Result};
use crate::fixed::Fixed;
use crate::geometry::{Aabb, LineSegment, Parallelogram, Vector};
use crate::types::PartitionStats;

/// Shape accepted by [`Partition::query`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueryShape {
    Point(Vector),
    Box(Aabb),
    Segment(LineSegment),
    Parallelogram(Parallelogram),
}

impl QueryShape {
    /// Exact test of an entity's hitbox against the shape.
    pub fn hits(&self, hitbox: &Aabb) -> bool {
        match self {
            QueryShape::Point(p) => Aabb::from_origin(*p, Fixed::ZERO, Fixed::ZERO).overlaps(hitbox),
            QueryShape::Box(b) => b.overlaps(hitbox),
            QueryShape::Segment(s) => s.intersects_box(hitbox),
            QueryShape::Parallelogram(p) => p.intersects_box(hitbox),
        }
    }
}

/// Which indexed entities a query may report.
#[derive(Debug)]
pub struct QueryFilter<'a, T> {
    /// Single entity to skip, typically the one asking.
    pub exclude: Option<&'a T>,
    pub exclusions: Option<&'a FxHashSet<T>>,
    /// Skip entities that are dead or marked for removal.
    pub alive_only: bool,
}

impl<T> Clone for QueryFilter<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for QueryFilter<'_, T> {}

impl<T> Default for QueryFilter<'_, T> {
    fn default() -> Self {
        Self { exclude: None, exclusions: None, alive_only: true }
    }
}

impl<'a, T: Indexed> QueryFilter<'a, T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn excluding(mut self, item: &'a T) -> Self {
        self.exclude = Some(item);
        self
    }

    pub fn excluding_all(mut self, items: &'a FxHashSet<T>) -> Self {
        self.exclusions = Some(items);
        self
    }

    /// Also report dead entities and those marked for removal.
    pub fn include_dead(mut self) -> Self {
        self.alive_only = false;
        self
    }

    pub fn accepts(&self, item: &T) -> bool {
        if self.exclude.is_some_and(|e| e == item) { return false; }
        if self.exclusions.is_some_and(|s| s.contains(item)) { return false; }
        !self.alive_only || (item.alive() && !item.marked_to_remove())
    }
}

struct Cell<T> {
    bounds: Aabb,
    values: Vec<T>,
}

impl<T: Indexed> Cell<T> {
    /// Add `item`, or refresh the stored copy if it is already present.
    fn insert(&mut self, item: &T) {
        match self.values.iter_mut().find(|v| *v == item) {
            Some(slot) => *slot = item.clone(),
            None => self.values.push(item.clone()),
        }
    }

    fn remove(&mut self, item: &T) -> bool {
        match self.values.iter().position(|v| v == item) {
            Some(i) => {
                self.values.swap_remove(i);
                true
            }
            None => false,
        }
    }
}

/// Inclusive rectangle of cell coordinates (x = column, y = row).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct CellRange {
    min: IVec2,
    max: IVec2,
}

impl CellRange {
    fn union(self, other: CellRange) -> CellRange {
        CellRange { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    fn iter(self) -> impl Iterator<Item = (usize, usize)> {
        (self.min.y..=self.max.y)
            .flat_map(move |row| (self.min.x..=self.max.x).map(move |col| (col as usize, row as usize)))
    }
}

/// Uniform grid over a fixed region indexing entities by hitbox.
///
/// A cell is allocated only while at least one hitbox overlaps it. Cells are
/// a coarse filter: every query re-tests candidate hitboxes against the exact
/// shape. Coordinates outside the region clamp to the border cells.
pub struct Partition<T: Indexed> {
    bounds: Aabb,
    rows: usize,
    cols: usize,
    cells: Vec<Option<Cell<T>>>,
}

/// `floor(offset * n / extent)` on raw values.
fn axis_index(offset: Fixed, extent: Fixed, n: usize) -> i64 {
    let p = offset.raw() as i128 * n as i128;
    p.div_euclid(extent.raw() as i128) as i64
}

/// Offset of the first raw unit belonging to cell `c`: `ceil(c * extent / n)`.
fn axis_edge(c: usize, extent: Fixed, n: usize) -> Fixed {
    let p = c as i128 * extent.raw() as i128;
    let n = n as i128;
    Fixed::from_raw(((p + n - 1).div_euclid(n)) as i32)
}

impl<T: Indexed> Partition<T> {
    pub fn new(bounds: Aabb, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::EmptyGrid { rows, cols });
        }
        if bounds.is_degenerate() {
            return Err(Error::DegenerateBounds { width: bounds.width(), height: bounds.height() });
        }
        let right = bounds.left().raw() as i64 + bounds.width().raw() as i64;
        let bottom = bounds.top().raw() as i64 + bounds.height().raw() as i64;
        if right > i32::MAX as i64 || bottom > i32::MAX as i64 {
            return Err(Error::ExtentOverflow { right, bottom });
        }
        if (bounds.width().raw() as i64) < cols as i64 || (bounds.height().raw() as i64) < rows as i64 {
            return Err(Error::CellTooSmall { width: bounds.width() / cols as i32, height: bounds.height() / rows as i32 });
        }
        debug!("partition: {rows}x{cols} cells over {bounds:?}");
        let mut cells = Vec::with_capacity(rows * cols);
        cells.resize_with(rows * cols, || None);
        Ok(Self { bounds, rows, cols, cells })
    }

    pub fn from_config(cfg: &PartitionConfig) -> Result<Self> {
        cfg.validate()?;
        Self::new(cfg.bounds(), cfg.rows, cfg.cols)
    }

    pub fn bounds(&self) -> Aabb { self.bounds }
    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }

    /// Nominal cell size; border cells may differ by one raw unit.
    pub fn cell_size(&self) -> Vector {
        Vector::new(self.bounds.width() / self.cols as i32, self.bounds.height() / self.rows as i32)
    }

    /// Exact box of a cell; cells tile the region without gaps.
    pub fn cell_bounds(&self, col: usize, row: usize) -> Aabb {
        let (w, h) = (self.bounds.width(), self.bounds.height());
        let x0 = axis_edge(col, w, self.cols);
        let x1 = axis_edge(col + 1, w, self.cols);
        let y0 = axis_edge(row, h, self.rows);
        let y1 = axis_edge(row + 1, h, self.rows);
        Aabb::new(self.bounds.left() + x0, self.bounds.top() + y0, x1 - x0, y1 - y0)
    }

    #[inline]
    fn slot(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    fn col_of(&self, x: Fixed) -> i32 {
        let c = axis_index(x - self.bounds.left(), self.bounds.width(), self.cols);
        c.clamp(0, self.cols as i64 - 1) as i32
    }

    fn row_of(&self, y: Fixed) -> i32 {
        let r = axis_index(y - self.bounds.top(), self.bounds.height(), self.rows);
        r.clamp(0, self.rows as i64 - 1) as i32
    }

    /// Clamped cells whose region may overlap `area`.
    fn cell_range(&self, area: &Aabb) -> CellRange {
        CellRange {
            min: IVec2::new(self.col_of(area.left()), self.row_of(area.top())),
            max: IVec2::new(self.col_of(area.right()), self.row_of(area.bottom())),
        }
    }

    // --- Membership --------------------------------------------------------

    /// Index `item` in every cell its hitbox overlaps.
    pub fn insert(&mut self, item: &T) {
        let hitbox = item.hitbox();
        let mut indexed = 0usize;
        for (col, row) in self.cell_range(&hitbox).iter() {
            let cell_box = self.cell_bounds(col, row);
            if !cell_box.overlaps(&hitbox) { continue; }
            let slot = self.slot(col, row);
            self.cells[slot]
                .get_or_insert_with(|| {
                    trace!("partition: allocate cell ({col}, {row})");
                    Cell { bounds: cell_box, values: Vec::new() }
                })
                .insert(item);
            indexed += 1;
        }
        if indexed == 0 {
            debug!("partition: {hitbox:?} is outside {:?}, nothing indexed", self.bounds);
        }
    }

    /// Re-index `item` after its hitbox moved from `last_hitbox` to `hitbox`.
    ///
    /// Only cells in the union of the old and new ranges are touched. Unless
    /// `force` is set, an unchanged hitbox is a no-op.
    pub fn update(&mut self, item: &T, force: bool) {
        let last = item.last_hitbox();
        let hitbox = item.hitbox();
        if !force && last == hitbox {
            return;
        }
        let range = self.cell_range(&last).union(self.cell_range(&hitbox));
        for (col, row) in range.iter() {
            let slot = self.slot(col, row);
            let emptied = match self.cells[slot].as_mut() {
                Some(cell) => {
                    if cell.bounds.overlaps(&hitbox) {
                        cell.insert(item);
                    } else {
                        cell.remove(item);
                    }
                    cell.values.is_empty()
                }
                None => {
                    let cell_box = self.cell_bounds(col, row);
                    if cell_box.overlaps(&hitbox) {
                        trace!("partition: allocate cell ({col}, {row})");
                        let mut cell = Cell { bounds: cell_box, values: Vec::new() };
                        cell.insert(item);
                        self.cells[slot] = Some(cell);
                    }
                    false
                }
            };
            if emptied {
                trace!("partition: release cell ({col}, {row})");
                self.cells[slot] = None;
            }
        }
    }

    /// Drop `item` from the cells covered by its current hitbox.
    pub fn remove(&mut self, item: &T) {
        for (col, row) in self.cell_range(&item.hitbox()).iter() {
            let slot = self.slot(col, row);
            let emptied = match self.cells[slot].as_mut() {
                Some(cell) => cell.remove(item) && cell.values.is_empty(),
                None => false,
            };
            if emptied {
                trace!("partition: release cell ({col}, {row})");
                self.cells[slot] = None;
            }
        }
    }

    pub fn clear(&mut self) {
        debug!("partition: clear {} cells", self.occupied_cells());
        self.cells.iter_mut().for_each(|c| *c = None);
    }

    // --- Queries -----------------------------------------------------------

    /// Add every accepted entity whose hitbox intersects `shape` to `out`.
    /// Returns the size of `out` afterwards.
    pub fn query(&self, out: &mut FxHashSet<T>, shape: &QueryShape, filter: &QueryFilter<'_, T>) -> usize {
        match shape {
            QueryShape::Point(p) => {
                let (col, row) = (self.col_of(p.x) as usize, self.row_of(p.y) as usize);
                self.collect_cell(col, row, shape, filter, out);
            }
            QueryShape::Box(b) => {
                for (col, row) in self.cell_range(b).iter() {
                    self.collect_cell(col, row, shape, filter, out);
                }
            }
            QueryShape::Segment(seg) => self.collect_segment(seg, shape, filter, out),
            QueryShape::Parallelogram(para) => self.collect_parallelogram(para, shape, filter, out),
        }
        out.len()
    }

    pub fn query_point(&self, out: &mut FxHashSet<T>, p: Vector, filter: &QueryFilter<'_, T>) -> usize {
        self.query(out, &QueryShape::Point(p), filter)
    }

    pub fn query_box(&self, out: &mut FxHashSet<T>, area: Aabb, filter: &QueryFilter<'_, T>) -> usize {
        self.query(out, &QueryShape::Box(area), filter)
    }

    pub fn query_segment(&self, out: &mut FxHashSet<T>, seg: LineSegment, filter: &QueryFilter<'_, T>) -> usize {
        self.query(out, &QueryShape::Segment(seg), filter)
    }

    pub fn query_parallelogram(
        &self,
        out: &mut FxHashSet<T>,
        para: Parallelogram,
        filter: &QueryFilter<'_, T>,
    ) -> usize {
        self.query(out, &QueryShape::Parallelogram(para), filter)
    }

    fn collect_cell(&self, col: usize, row: usize, shape: &QueryShape, filter: &QueryFilter<'_, T>, out: &mut FxHashSet<T>) {
        let Some(cell) = &self.cells[self.slot(col, row)] else { return };
        for v in &cell.values {
            if out.contains(v) || !filter.accepts(v) { continue; }
            if shape.hits(&v.hitbox()) { out.insert(v.clone()); }
        }
    }

    /// Visit, column by column, the rows the segment crosses (one extra row on
    /// each side absorbs rounding), then test the segment itself.
    fn collect_segment(&self, seg: &LineSegment, shape: &QueryShape, filter: &QueryFilter<'_, T>, out: &mut FxHashSet<T>) {
        let extent = seg.bounding_box();
        let (c0, c1) = (self.col_of(extent.left()), self.col_of(extent.right()));
        let d = seg.vector();
        let y_at = |x: Fixed| seg.start.y + d.y.mul_div(x - seg.start.x, d.x);
        for col in c0..=c1 {
            let cell = self.cell_bounds(col as usize, 0);
            // Border columns reach past the region so clamped parts stay covered.
            let lo = if col == 0 { extent.left() } else { extent.left().max(cell.left()) };
            let hi = if col as usize == self.cols - 1 { extent.right() } else { extent.right().min(cell.right()) };
            let (ya, yb) = if d.x.is_zero() { (extent.top(), extent.bottom()) } else { (y_at(lo), y_at(hi)) };
            let r0 = (self.row_of(ya.min(yb)) - 1).max(0);
            let r1 = (self.row_of(ya.max(yb)) + 1).min(self.rows as i32 - 1);
            for row in r0..=r1 {
                self.collect_cell(col as usize, row as usize, shape, filter, out);
            }
        }
    }

    /// Step a tracing box along the sweep in cell-sized increments of its
    /// major axis; each box covers the sweep between two consecutive steps.
    fn collect_parallelogram(&self, para: &Parallelogram, shape: &QueryShape, filter: &QueryFilter<'_, T>, out: &mut FxHashSet<T>) {
        let d = para.direction;
        let cell = self.cell_size();
        let (major, step) = if d.x.abs() >= d.y.abs() { (d.x.abs(), cell.x) } else { (d.y.abs(), cell.y) };
        let height = Vector::new(Fixed::ZERO, para.height);
        if major.is_zero() {
            let trace_box = Aabb::from_corners(para.origin, para.origin + height);
            for (col, row) in self.cell_range(&trace_box).iter() {
                self.collect_cell(col, row, shape, filter, out);
            }
            return;
        }
        let at = |t: Fixed| para.origin + Vector::new(d.x.mul_div(t, major), d.y.mul_div(t, major));
        let mut travelled = Fixed::ZERO;
        while travelled < major {
            let next = (travelled + step).min(major);
            let (p0, p1) = (at(travelled), at(next));
            let trace_box = Aabb::from_corners(p0, p1).union(&Aabb::from_corners(p0 + height, p1 + height));
            for (col, row) in self.cell_range(&trace_box).iter() {
                self.collect_cell(col, row, shape, filter, out);
            }
            travelled = next;
        }
    }

    // --- Inspection --------------------------------------------------------

    /// Entries of a cell, or `None` when the cell is not allocated.
    pub fn cell(&self, col: usize, row: usize) -> Option<&[T]> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[self.slot(col, row)].as_ref().map(|c| c.values.as_slice())
    }

    pub fn cell_len(&self, col: usize, row: usize) -> Option<usize> {
        self.cell(col, row).map(<[T]>::len)
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn stats(&self) -> PartitionStats {
        let mut stats = PartitionStats { rows: self.rows, cols: self.cols, ..Default::default() };
        for cell in self.cells.iter().flatten() {
            stats.cells_allocated += 1;
            stats.entries += cell.values.len();
            stats.max_cell_len = stats.max_cell_len.max(cell.values.len());
        }
        stats
    }
}
