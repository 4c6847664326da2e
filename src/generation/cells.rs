//! Turning refined polygons into cells

use glam::Vec2;

use crate::cell::Cell;
use crate::error::{MapError, Result};
use crate::geometry::point_in_polygon;

/// Cells built from refined polygons and the index of the start cell
#[derive(Debug, Clone)]
pub struct AssembledCells {
    pub cells: Vec<Cell>,
    pub start: usize,
    /// Site index each cell was built from, parallel to `cells`
    pub site_indices: Vec<usize>,
}

/// Build cells from per-site polygons, dropping degenerate ones
///
/// `polygons[i]` belongs to `sites[i]`; site 0 is the focal point. Polygons
/// with two or fewer vertices are skipped and the survivors get sequential
/// IDs. The start cell is the first cell containing the focal point, else
/// the cell grown from site 0, else the first cell.
///
/// # Errors
///
/// Returns `EmptyMap` when no polygon survives.
pub fn assemble_cells(polygons: Vec<Vec<Vec2>>, sites: &[Vec2]) -> Result<AssembledCells> {
    let mut cells = Vec::new();
    let mut site_indices = Vec::new();

    for (site_index, polygon) in polygons.into_iter().enumerate() {
        if polygon.len() <= 2 {
            continue;
        }
        let Some(&site) = sites.get(site_index) else {
            continue;
        };
        cells.push(Cell::new(cells.len(), site, polygon));
        site_indices.push(site_index);
    }

    if cells.is_empty() {
        return Err(MapError::EmptyMap);
    }

    let focal = sites[0];
    let start = cells
        .iter()
        .position(|c| point_in_polygon(focal, &c.polygon))
        .or_else(|| site_indices.iter().position(|&s| s == 0))
        .unwrap_or_else(|| {
            log::warn!("No cell near the focal point, starting from cell 0");
            0
        });
    cells[start].is_start = true;

    Ok(AssembledCells {
        cells,
        start,
        site_indices,
    })
}
