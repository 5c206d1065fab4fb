use crate::error::WorldError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Side length of the built-in level.
pub const DEFAULT_LEVEL_SIZE: usize = 32;

/// Column heights of the built-in level before the border walls are raised.
#[rustfmt::skip]
const DEFAULT_LEVEL: [[u32; DEFAULT_LEVEL_SIZE]; DEFAULT_LEVEL_SIZE] = [
    [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
    [4, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 4],
    [4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 2, 2, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 4],
    [4, 2, 0, 4, 2, 4, 2, 4, 2, 4, 2, 4, 2, 0, 2, 0, 0, 2, 0, 4, 0, 4, 4, 4, 4, 4, 4, 4, 4, 0, 2, 4],
    [4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 2, 0, 4, 0, 4, 0, 0, 0, 0, 0, 0, 4, 0, 2, 4],
    [4, 2, 0, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2, 0, 2, 2, 0, 2, 0, 4, 0, 4, 0, 4, 4, 4, 4, 0, 4, 0, 2, 4],
    [4, 2, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 2, 0, 2, 0, 4, 0, 4, 0, 4, 0, 0, 4, 0, 4, 0, 2, 4],
    [4, 2, 0, 3, 0, 3, 4, 3, 4, 3, 4, 0, 2, 0, 0, 1, 0, 2, 0, 4, 0, 4, 0, 0, 0, 0, 4, 0, 4, 0, 2, 4],
    [4, 2, 0, 3, 0, 3, 0, 0, 0, 0, 2, 0, 2, 0, 0, 2, 0, 1, 0, 4, 0, 4, 4, 4, 4, 4, 4, 0, 4, 0, 2, 4],
    [4, 2, 0, 2, 0, 3, 0, 1, 0, 0, 2, 0, 2, 0, 0, 1, 0, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 2, 4],
    [4, 2, 0, 1, 0, 3, 0, 0, 2, 0, 2, 0, 2, 0, 0, 2, 0, 1, 0, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 0, 2, 4],
    [4, 2, 0, 1, 0, 3, 0, 1, 0, 0, 2, 0, 1, 0, 0, 1, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 4],
    [4, 2, 0, 2, 0, 3, 0, 0, 2, 0, 2, 0, 1, 0, 0, 2, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 4],
    [4, 2, 0, 2, 0, 3, 0, 1, 0, 0, 2, 0, 1, 0, 0, 1, 0, 2, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 4],
    [4, 2, 0, 3, 0, 3, 0, 0, 2, 0, 2, 0, 1, 1, 1, 1, 0, 1, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 1, 2, 4],
    [4, 2, 0, 3, 0, 3, 0, 2, 0, 0, 2, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 3, 2, 1, 3, 0, 0, 0, 3, 1, 2, 4],
    [4, 2, 0, 3, 0, 3, 0, 0, 1, 0, 2, 2, 2, 2, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 1, 2, 4],
    [4, 2, 0, 3, 0, 3, 0, 1, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 3, 4, 3, 2, 1, 3, 0, 0, 0, 3, 1, 2, 4],
    [4, 2, 0, 4, 0, 2, 0, 0, 2, 0, 2, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 2, 1, 2, 4],
    [4, 2, 0, 4, 0, 2, 0, 1, 0, 2, 0, 1, 0, 1, 0, 4, 0, 4, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 2, 4],
    [4, 2, 0, 4, 0, 2, 0, 0, 2, 0, 2, 0, 2, 0, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 4],
    [4, 2, 0, 4, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 4, 4, 4, 4, 4, 4, 4, 4, 0, 2, 0, 2, 4],
    [4, 2, 0, 4, 0, 3, 3, 3, 3, 3, 3, 3, 3, 3, 2, 1, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 4, 0, 3, 0, 2, 4],
    [4, 2, 0, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 4, 0, 5, 5, 5, 5, 0, 4, 0, 5, 0, 2, 4],
    [4, 2, 0, 4, 4, 4, 4, 3, 3, 3, 3, 3, 3, 3, 0, 1, 0, 0, 0, 4, 0, 5, 8, 7, 5, 0, 4, 0, 7, 0, 2, 4],
    [4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 1, 0, 0, 0, 4, 0, 5, 9, 6, 5, 0, 4, 0, 9, 0, 2, 4],
    [4, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 0, 1, 1, 1, 1, 1, 0, 5, 5, 5, 5, 0, 4, 0, 7, 0, 2, 4],
    [4, 2, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 0, 3, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 5, 0, 2, 4],
    [4, 2, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 2, 1, 1, 1, 1, 1, 1, 4, 4, 4, 4, 4, 4, 4, 0, 3, 0, 2, 4],
    [4, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 4],
    [4, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 4],
    [4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
];

/// Rectangular grid of column heights, indexed `[z][x]`.
///
/// `heights[z][x]` is the number of stacked blocks at that column, starting
/// from grid row `y = 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u32>>", into = "Vec<Vec<u32>>")]
pub struct HeightMap {
    rows: Vec<Vec<u32>>,
}

impl HeightMap {
    /// Validate and wrap `rows`. Every row must have the same, non-zero length.
    pub fn new(rows: Vec<Vec<u32>>) -> Result<Self, WorldError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        if expected == 0 {
            return Err(WorldError::EmptyHeightMap);
        }
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(WorldError::RaggedHeightMap {
                row,
                expected,
                found: r.len(),
            });
        }
        Ok(Self { rows })
    }

    /// The built-in 32x32 maze with its outer ring raised to `wall_height`.
    pub fn default_level(wall_height: u32) -> Self {
        let mut rows: Vec<Vec<u32>> = DEFAULT_LEVEL.iter().map(|r| r.to_vec()).collect();
        let last = DEFAULT_LEVEL_SIZE - 1;
        for (z, row) in rows.iter_mut().enumerate() {
            if z == 0 || z == last {
                row.fill(wall_height);
            }
            row[0] = wall_height;
            row[last] = wall_height;
        }
        Self { rows }
    }

    /// Parse a JSON array of rows, e.g. `[[2, 1], [0, 3]]`.
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let rows: Vec<Vec<u32>> = serde_json::from_str(json)?;
        Self::new(rows)
    }

    /// Load a JSON level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WorldError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let map = Self::from_json_str(&data)?;
        tracing::debug!(
            "loaded {}x{} height map from {}",
            map.width(),
            map.depth(),
            path.as_ref().display()
        );
        Ok(map)
    }

    /// Number of columns along x.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    /// Number of rows along z.
    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn height_at(&self, x: usize, z: usize) -> Option<u32> {
        self.rows.get(z).and_then(|r| r.get(x)).copied()
    }

    pub fn max_height(&self) -> u32 {
        self.rows.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Sum of all column heights: the block count of a freshly built world.
    pub fn total_blocks(&self) -> u64 {
        self.rows.iter().flatten().map(|&h| h as u64).sum()
    }

    pub fn rows(&self) -> &[Vec<u32>] {
        &self.rows
    }
}

impl TryFrom<Vec<Vec<u32>>> for HeightMap {
    type Error = WorldError;

    fn try_from(rows: Vec<Vec<u32>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<HeightMap> for Vec<Vec<u32>> {
    fn from(map: HeightMap) -> Self {
        map.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            HeightMap::new(vec![]),
            Err(WorldError::EmptyHeightMap)
        ));
        assert!(matches!(
            HeightMap::new(vec![vec![]]),
            Err(WorldError::EmptyHeightMap)
        ));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = HeightMap::new(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(
            err,
            WorldError::RaggedHeightMap {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn default_level_has_raised_border() {
        let map = HeightMap::default_level(12);
        assert_eq!(map.width(), DEFAULT_LEVEL_SIZE);
        assert_eq!(map.depth(), DEFAULT_LEVEL_SIZE);
        for i in 0..DEFAULT_LEVEL_SIZE {
            assert_eq!(map.height_at(i, 0), Some(12));
            assert_eq!(map.height_at(i, 31), Some(12));
            assert_eq!(map.height_at(0, i), Some(12));
            assert_eq!(map.height_at(31, i), Some(12));
        }
        // Interior keeps its layout.
        assert_eq!(map.height_at(1, 1), Some(2));
        assert_eq!(map.height_at(22, 24), Some(8));
        assert_eq!(map.max_height(), 12);
    }

    #[test]
    fn height_at_out_of_range_is_none() {
        let map = HeightMap::new(vec![vec![1, 2]]).unwrap();
        assert_eq!(map.height_at(2, 0), None);
        assert_eq!(map.height_at(0, 1), None);
        assert_eq!(map.total_blocks(), 3);
    }

    #[test]
    fn parses_json_rows() {
        let map = HeightMap::from_json_str("[[2, 0], [1, 3]]").unwrap();
        assert_eq!(map.width(), 2);
        assert_eq!(map.depth(), 2);
        assert_eq!(map.height_at(1, 1), Some(3));
    }

    #[test]
    fn json_ragged_rows_fail() {
        assert!(HeightMap::from_json_str("[[2, 0], [1]]").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "[[4, 4, 4], [4, 0, 4]]").unwrap();
        let map = HeightMap::load(tmp.path()).unwrap();
        assert_eq!(map.width(), 3);
        assert_eq!(map.height_at(1, 1), Some(0));
    }

    #[test]
    fn serde_roundtrip_validates() {
        let map = HeightMap::new(vec![vec![1, 2], vec![3, 4]]).unwrap();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, "[[1,2],[3,4]]");
        let bad: Result<HeightMap, _> = serde_json::from_str("[[1],[2,3]]");
        assert!(bad.is_err());
    }
}
