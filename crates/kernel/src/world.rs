use crate::error::WorldError;
use crate::heightmap::HeightMap;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Integer cell coordinate inside the occupancy grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl GridCoord {
    pub fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }
}

/// A record produced by every edit to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A cell was written. `was` is the occupancy before the write.
    CellChanged {
        cell: GridCoord,
        was: bool,
        now: bool,
    },
}

/// Flat per-instance translations, one per occupied cell.
///
/// `generation` increases on every rebuild so consumers holding a GPU copy
/// can tell whether theirs is current.
#[derive(Debug, Clone, PartialEq)]
pub struct OffsetCache {
    offsets: Vec<[f32; 3]>,
    generation: u64,
}

impl OffsetCache {
    pub fn offsets(&self) -> &[[f32; 3]] {
        &self.offsets
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Dense 3D occupancy grid of cubes with edge `2 * cube_size`.
///
/// Cells are stored `[z][x][y]`, matching the enumeration order of every
/// render path. Column `(x, z)` is placed at world
/// `((x - width/2) * 2s, y * 2s, (z - depth/2) * 2s)` where the half extents
/// are integer halves.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    width: usize,
    height: usize,
    depth: usize,
    cube_size: f32,
    cells: Vec<bool>,
    /// Displayed block count. Zero after an edit until the next render pass.
    block_count: usize,
    offset_cache: Option<OffsetCache>,
    next_generation: u64,
    event_log: Vec<WorldEvent>,
}

impl VoxelWorld {
    /// Upper bound on grid cells, one byte each.
    pub const MAX_CELLS: usize = 1 << 30;

    /// Build a world whose vertical extent is exactly the tallest column.
    pub fn new(heights: &HeightMap, cube_size: f32) -> Result<Self, WorldError> {
        Self::with_headroom(heights, cube_size, 0)
    }

    /// Build a world with `headroom` extra empty rows above the tallest column,
    /// so blocks can be stacked on top of it.
    pub fn with_headroom(
        heights: &HeightMap,
        cube_size: f32,
        headroom: usize,
    ) -> Result<Self, WorldError> {
        if !(cube_size.is_finite() && cube_size > 0.0) {
            return Err(WorldError::InvalidCubeSize(cube_size));
        }
        let width = heights.width();
        let depth = heights.depth();
        let too_large = || WorldError::GridTooLarge {
            width,
            depth,
            max_height: heights.max_height(),
            headroom,
        };
        let height = (heights.max_height() as usize)
            .checked_add(headroom)
            .ok_or_else(too_large)?;
        let total = width
            .checked_mul(depth)
            .and_then(|n| n.checked_mul(height))
            .filter(|&n| n <= Self::MAX_CELLS)
            .ok_or_else(too_large)?;

        let mut cells = vec![false; total];
        let mut block_count = 0;
        for (z, row) in heights.rows().iter().enumerate() {
            for (x, &h) in row.iter().enumerate() {
                let base = (z * width + x) * height;
                cells[base..base + h as usize].fill(true);
                block_count += h as usize;
            }
        }

        tracing::debug!(
            "built {width}x{height}x{depth} voxel world with {block_count} blocks"
        );

        Ok(Self {
            width,
            height,
            depth,
            cube_size,
            cells,
            block_count,
            offset_cache: None,
            next_generation: 1,
            event_log: Vec::new(),
        })
    }

    /// Cells along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells along y.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cells along z.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Half the edge length of one block.
    pub fn cube_size(&self) -> f32 {
        self.cube_size
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        (cell.x < self.width && cell.y < self.height && cell.z < self.depth)
            .then(|| (cell.z * self.width + cell.x) * self.height + cell.y)
    }

    fn out_of_bounds(&self, cell: GridCoord) -> WorldError {
        WorldError::OutOfBounds {
            cell,
            width: self.width,
            height: self.height,
            depth: self.depth,
        }
    }

    /// Occupancy of a cell, or `None` outside the grid.
    pub fn is_block(&self, cell: GridCoord) -> Option<bool> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// World-space centre of a cell.
    pub fn cell_translation(&self, cell: GridCoord) -> Vec3 {
        let step = 2.0 * self.cube_size;
        Vec3::new(
            (cell.x as f32 - (self.width / 2) as f32) * step,
            cell.y as f32 * step,
            (cell.z as f32 - (self.depth / 2) as f32) * step,
        )
    }

    /// Nearest grid cell to a world-space point.
    ///
    /// Each axis rounds half up and clamps at zero. There is no upper clamp:
    /// the result may lie outside the grid.
    pub fn point_to_grid(&self, point: Vec3) -> GridCoord {
        let step = 2.0 * self.cube_size;
        let snap = |v: f32| (v + 0.5).floor().max(0.0) as usize;
        GridCoord {
            x: snap(point.x / step + (self.width / 2) as f32),
            y: snap(point.y / step),
            z: snap(point.z / step + (self.depth / 2) as f32),
        }
    }

    /// Write one cell and return its previous occupancy.
    pub fn set_cell(&mut self, cell: GridCoord, is_block: bool) -> Result<bool, WorldError> {
        let i = self.index(cell).ok_or_else(|| self.out_of_bounds(cell))?;
        let was = std::mem::replace(&mut self.cells[i], is_block);
        self.event_log.push(WorldEvent::CellChanged {
            cell,
            was,
            now: is_block,
        });
        self.offset_cache = None;
        self.block_count = 0;
        Ok(was)
    }

    /// Set the occupancy of the cell nearest `point`.
    ///
    /// Invalidates the offset cache and zeroes the displayed block count until
    /// the next render pass recounts.
    ///
    /// Non-finite points are rejected rather than snapped into the grid.
    pub fn change_point(&mut self, point: Vec3, is_block: bool) -> Result<GridCoord, WorldError> {
        if !point.is_finite() {
            return Err(WorldError::NonFinitePoint(point.to_array()));
        }
        let cell = self.point_to_grid(point);
        self.set_cell(cell, is_block)?;
        Ok(cell)
    }

    /// Occupied cells in z, x, y order.
    pub fn occupied_cells(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let (w, h, d) = (self.width, self.height, self.depth);
        (0..d)
            .flat_map(move |z| (0..w).flat_map(move |x| (0..h).map(move |y| GridCoord { x, y, z })))
            .filter(move |&c| self.cells[(c.z * w + c.x) * h + c.y])
    }

    /// Per-block translations for the one-draw-per-block path.
    /// Recounts the displayed block count as a side effect.
    pub fn naive_translations(&mut self) -> Vec<Vec3> {
        let translations: Vec<Vec3> = self
            .occupied_cells()
            .map(|c| self.cell_translation(c))
            .collect();
        self.block_count = translations.len();
        translations
    }

    /// The instance offset cache, rebuilt first if an edit made it stale.
    pub fn instance_offsets(&mut self) -> &OffsetCache {
        let cache = match self.offset_cache.take() {
            Some(cache) => cache,
            None => self.rebuild_offsets(),
        };
        self.offset_cache.insert(cache)
    }

    fn rebuild_offsets(&mut self) -> OffsetCache {
        let offsets: Vec<[f32; 3]> = self
            .occupied_cells()
            .map(|c| self.cell_translation(c).to_array())
            .collect();
        self.block_count = offsets.len();
        let generation = self.next_generation;
        self.next_generation += 1;
        tracing::trace!("rebuilt offset cache gen {generation}: {} blocks", offsets.len());
        OffsetCache {
            offsets,
            generation,
        }
    }

    pub fn is_offset_cache_stale(&self) -> bool {
        self.offset_cache.is_none()
    }

    /// Block count as last computed by a render pass (zero right after an edit).
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Live number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Read-only access to the edit log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Drain and return the edit log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_world() -> VoxelWorld {
        VoxelWorld::new(&HeightMap::new(vec![vec![2]]).unwrap(), 1.0).unwrap()
    }

    fn small_world() -> VoxelWorld {
        let map = HeightMap::new(vec![vec![1, 0, 2], vec![0, 3, 1]]).unwrap();
        VoxelWorld::with_headroom(&map, 0.5, 1).unwrap()
    }

    #[test]
    fn single_column_scenario() {
        let mut w = column_world();
        assert_eq!((w.width(), w.height(), w.depth()), (1, 2, 1));
        assert_eq!(w.point_to_grid(Vec3::new(0.0, 1.0, 0.0)), GridCoord::new(0, 1, 0));
        assert_eq!(w.block_count(), 2);

        w.change_point(Vec3::ZERO, false).unwrap();
        assert_eq!(w.block_count(), 0);
        assert_eq!(w.instance_offsets().len(), 1);
        assert_eq!(w.block_count(), 1);
    }

    #[test]
    fn rejects_bad_cube_size() {
        let map = HeightMap::new(vec![vec![1]]).unwrap();
        assert!(VoxelWorld::new(&map, 0.0).is_err());
        assert!(VoxelWorld::new(&map, f32::NAN).is_err());
    }

    #[test]
    fn point_to_grid_clamps_negative_to_zero() {
        let w = small_world();
        let c = w.point_to_grid(Vec3::new(-100.0, -5.0, -100.0));
        assert_eq!(c, GridCoord::new(0, 0, 0));
    }

    #[test]
    fn point_to_grid_is_monotonic() {
        let w = small_world();
        let mut last = 0;
        for i in -40..40 {
            let x = i as f32 * 0.1;
            let gx = w.point_to_grid(Vec3::new(x, 0.0, 0.0)).x;
            assert!(gx >= last, "x={x} gave {gx} after {last}");
            last = gx;
        }
    }

    #[test]
    fn point_to_grid_inverts_cell_translation() {
        let w = small_world();
        for cell in w.occupied_cells().collect::<Vec<_>>() {
            assert_eq!(w.point_to_grid(w.cell_translation(cell)), cell);
        }
    }

    #[test]
    fn point_to_grid_has_no_upper_clamp() {
        let w = small_world();
        let c = w.point_to_grid(Vec3::new(50.0, 50.0, 50.0));
        assert!(w.is_block(c).is_none());
    }

    #[test]
    fn toggle_changes_count_by_one() {
        let mut w = small_world();
        let before = w.instance_offsets().len();
        assert_eq!(before, 7);

        // Stack on top of the 3-high column at x=1, z=1.
        let top = w.cell_translation(GridCoord::new(1, 3, 1));
        w.change_point(top, true).unwrap();
        assert_eq!(w.instance_offsets().len(), before + 1);

        w.change_point(top, false).unwrap();
        assert_eq!(w.instance_offsets().len(), before);
    }

    #[test]
    fn writing_same_state_keeps_count() {
        let mut w = small_world();
        let before = w.instance_offsets().len();
        let occupied = w.cell_translation(GridCoord::new(0, 0, 0));
        w.change_point(occupied, true).unwrap();
        assert!(w.is_offset_cache_stale());
        assert_eq!(w.instance_offsets().len(), before);
    }

    #[test]
    fn out_of_range_edit_is_an_error() {
        let mut w = small_world();
        let err = w.change_point(Vec3::new(0.0, 100.0, 0.0), true).unwrap_err();
        assert!(matches!(err, WorldError::OutOfBounds { .. }));
        assert!(w.events().is_empty());
    }

    #[test]
    fn non_finite_point_edits_nothing() {
        let mut w = small_world();
        let corner = GridCoord::new(0, 0, 0);
        for point in [Vec3::splat(f32::NAN), Vec3::new(0.0, f32::INFINITY, 0.0)] {
            let err = w.change_point(point, false).unwrap_err();
            assert!(matches!(err, WorldError::NonFinitePoint(_)));
        }
        assert_eq!(w.is_block(corner), Some(true));
        assert!(w.events().is_empty());
        assert_eq!(w.block_count(), 7);
    }

    #[test]
    fn oversized_grids_are_rejected() {
        let map = HeightMap::new(vec![vec![1]]).unwrap();
        let err = VoxelWorld::with_headroom(&map, 0.5, usize::MAX).unwrap_err();
        assert!(matches!(err, WorldError::GridTooLarge { .. }));

        let tall = HeightMap::new(vec![vec![u32::MAX, 0]]).unwrap();
        let err = VoxelWorld::new(&tall, 0.5).unwrap_err();
        assert!(matches!(err, WorldError::GridTooLarge { max_height: u32::MAX, .. }));
    }

    #[test]
    fn offsets_match_naive_order() {
        let mut w = small_world();
        w.set_cell(GridCoord::new(2, 2, 0), true).unwrap();
        w.set_cell(GridCoord::new(1, 0, 1), false).unwrap();
        let naive: Vec<[f32; 3]> = w.naive_translations().iter().map(|v| v.to_array()).collect();
        let fast = w.instance_offsets().offsets().to_vec();
        assert_eq!(naive, fast);
        assert_eq!(fast.len(), w.occupied_count());
    }

    #[test]
    fn enumeration_is_z_then_x_then_y() {
        let w = small_world();
        let cells: Vec<GridCoord> = w.occupied_cells().collect();
        assert_eq!(
            cells,
            vec![
                GridCoord::new(0, 0, 0),
                GridCoord::new(2, 0, 0),
                GridCoord::new(2, 1, 0),
                GridCoord::new(1, 0, 1),
                GridCoord::new(1, 1, 1),
                GridCoord::new(1, 2, 1),
                GridCoord::new(2, 0, 1),
            ]
        );
    }

    #[test]
    fn translations_are_centred_by_integer_half_extent() {
        let w = small_world();
        // width 3 -> half 1, depth 2 -> half 1, step 1.0
        assert_eq!(w.cell_translation(GridCoord::new(0, 0, 0)), Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(w.cell_translation(GridCoord::new(2, 1, 1)), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn cache_generation_advances_only_on_rebuild() {
        let mut w = small_world();
        let g1 = w.instance_offsets().generation();
        let g1_again = w.instance_offsets().generation();
        assert_eq!(g1, g1_again);

        w.set_cell(GridCoord::new(0, 0, 1), true).unwrap();
        let g2 = w.instance_offsets().generation();
        assert!(g2 > g1);
    }

    #[test]
    fn edits_are_logged() {
        let mut w = small_world();
        // The origin snaps to (1, 0, 1), the bottom of the 3-high column.
        let cell = w.change_point(Vec3::ZERO, false).unwrap();
        assert_eq!(cell, GridCoord::new(1, 0, 1));
        let events = w.drain_events();
        assert_eq!(
            events,
            vec![WorldEvent::CellChanged {
                cell,
                was: true,
                now: false
            }]
        );
        assert!(w.events().is_empty());
    }

    #[test]
    fn default_level_block_count_matches_height_sum() {
        let map = HeightMap::default_level(12);
        let w = VoxelWorld::with_headroom(&map, 0.5, 2).unwrap();
        assert_eq!(w.block_count() as u64, map.total_blocks());
        assert_eq!(w.occupied_count() as u64, map.total_blocks());
        assert_eq!(w.height(), 14);
    }
}
