//! Grid layout descriptors

use serde::Serialize;

use crate::error::{ConfigError, Result};

/// A grid arrangement of tiles
///
/// `total_tiles` is derived from `rows * cols` at construction and cannot be
/// set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutDescriptor {
    id: String,
    name: String,
    rows: u32,
    cols: u32,
    total_tiles: usize,
}

impl LayoutDescriptor {
    /// Create a layout, rejecting zero rows or columns
    pub fn new(id: impl Into<String>, name: impl Into<String>, rows: u32, cols: u32) -> Result<Self> {
        let id = id.into();
        if rows == 0 || cols == 0 {
            return Err(ConfigError::InvalidLayout { id, rows, cols });
        }

        Ok(Self {
            id,
            name: name.into(),
            rows,
            cols,
            total_tiles: rows as usize * cols as usize,
        })
    }

    fn square(n: u32) -> Self {
        Self {
            id: format!("{n}x{n}"),
            name: format!("{n} x {n} Grid"),
            rows: n,
            cols: n,
            total_tiles: (n * n) as usize,
        }
    }

    /// 2 x 2 grid
    pub fn grid_2x2() -> Self {
        Self::square(2)
    }

    /// 3 x 3 grid
    pub fn grid_3x3() -> Self {
        Self::square(3)
    }

    /// 4 x 4 grid
    pub fn grid_4x4() -> Self {
        Self::square(4)
    }

    /// The fixed layout catalog, smallest first
    pub fn catalog() -> Vec<Self> {
        vec![Self::grid_2x2(), Self::grid_3x3(), Self::grid_4x4()]
    }

    /// Look up a catalog layout by id
    pub fn by_id(id: &str) -> Option<Self> {
        Self::catalog().into_iter().find(|layout| layout.id == id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of tiles (`rows * cols`)
    pub fn total_tiles(&self) -> usize {
        self.total_tiles
    }
}

impl Default for LayoutDescriptor {
    fn default() -> Self {
        Self::grid_3x3()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_tiles() {
        for layout in LayoutDescriptor::catalog() {
            assert_eq!(
                layout.total_tiles(),
                (layout.rows() * layout.cols()) as usize
            );
        }
        assert_eq!(LayoutDescriptor::grid_2x2().total_tiles(), 4);
        assert_eq!(LayoutDescriptor::grid_3x3().total_tiles(), 9);
        assert_eq!(LayoutDescriptor::grid_4x4().total_tiles(), 16);
    }

    #[test]
    fn test_by_id() {
        let layout = LayoutDescriptor::by_id("4x4").unwrap();
        assert_eq!(layout.rows(), 4);
        assert_eq!(layout.name(), "4 x 4 Grid");
        assert!(LayoutDescriptor::by_id("5x5").is_none());
    }

    #[test]
    fn test_custom_layout() {
        let layout = LayoutDescriptor::new("wide", "Wide", 2, 3).unwrap();
        assert_eq!(layout.total_tiles(), 6);
        assert_eq!(layout.id(), "wide");
    }

    #[test]
    fn test_rejects_zero_dimension() {
        let result = LayoutDescriptor::new("bad", "Bad", 0, 3);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidLayout { rows: 0, cols: 3, .. })
        ));
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(LayoutDescriptor::grid_2x2()).unwrap();
        assert_eq!(json["totalTiles"], 4);
        assert_eq!(json["id"], "2x2");
    }
}
