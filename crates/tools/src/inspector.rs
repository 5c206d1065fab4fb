use glam::Vec3;
use std::fmt;
use virtworld_kernel::{GridCoord, VoxelWorld};

/// World inspector for developer tooling.
///
/// Read-only queries against a voxel world for the HUD and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary(world: &VoxelWorld) -> WorldSummary {
        WorldSummary {
            width: world.width(),
            height: world.height(),
            depth: world.depth(),
            cube_size: world.cube_size(),
            occupied: world.occupied_count(),
            block_count: world.block_count(),
            offsets_stale: world.is_offset_cache_stale(),
            logged_edits: world.events().len(),
        }
    }

    /// Occupancy and placement of one cell.
    pub fn inspect_cell(world: &VoxelWorld, cell: GridCoord) -> CellInfo {
        CellInfo {
            cell,
            occupied: world.is_block(cell),
            center: world.cell_translation(cell),
        }
    }

    /// The cell an edit at `point` would touch.
    pub fn probe(world: &VoxelWorld, point: Vec3) -> CellInfo {
        Self::inspect_cell(world, world.point_to_grid(point))
    }

    /// Highest occupied cell in column `(x, z)`.
    pub fn column_top(world: &VoxelWorld, x: usize, z: usize) -> Option<usize> {
        (0..world.height())
            .rev()
            .find(|&y| world.is_block(GridCoord::new(x, y, z)) == Some(true))
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldSummary {
    pub width: usize,
    pub height: usize,
    pub depth: usize,
    pub cube_size: f32,
    pub occupied: usize,
    pub block_count: usize,
    pub offsets_stale: bool,
    pub logged_edits: usize,
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: {}x{}x{} cube={} blocks={} displayed={} stale={} edits={}",
            self.width,
            self.height,
            self.depth,
            self.cube_size,
            self.occupied,
            self.block_count,
            self.offsets_stale,
            self.logged_edits
        )
    }
}

/// One grid cell as seen by the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct CellInfo {
    pub cell: GridCoord,
    /// `None` when the cell lies outside the grid.
    pub occupied: Option<bool>,
    pub center: Vec3,
}

impl fmt::Display for CellInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.occupied {
            Some(true) => "block",
            Some(false) => "empty",
            None => "outside",
        };
        write!(
            f,
            "cell ({}, {}, {}) {state} center=({:.2}, {:.2}, {:.2})",
            self.cell.x, self.cell.y, self.cell.z, self.center.x, self.center.y, self.center.z
        )
    }
}
