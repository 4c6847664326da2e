//! Tessellation of sites into boundary-clipped cells
//!
//! The pipeline only needs two operations from a tessellation backend:
//! compute a diagram over the sites, then clip one site's region against the
//! boundary. [`DiagramEngine`] captures exactly that, so any geometry library
//! can be plugged in.
//!
//! The bundled [`HullDiagramEngine`] gets the Delaunay triangulation from a
//! convex hull: lifting 2D points onto the paraboloid `z = x² + y²` turns the
//! lower hull into the Delaunay triangulation. Delaunay neighbors are exactly
//! the Voronoi neighbors, and a Voronoi cell is the intersection of the
//! half-planes "closer to me than to that neighbor".

use glam::Vec2;
use parry3d::math::Point;
use parry3d::transformation;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::geometry::{point_in_polygon, BoundaryShape};

/// Consecutive clip vertices closer than this are merged
const DUPLICATE_VERTEX_DISTANCE: f32 = 1e-6;

/// Hull vertices further than this from every lifted site are rejected
///
/// The hull round-trips points through its own normalization, so vertices
/// come back close to, but not always bit-identical with, the input.
const HULL_MATCH_DISTANCE: f32 = 1e-5;

/// Tessellation backend used by the map pipeline
pub trait DiagramEngine {
    /// Engine-specific diagram over a fixed site list
    type Diagram;

    /// Build the diagram for `sites`
    fn compute_diagram(&self, sites: &[Vec2]) -> Result<Self::Diagram>;

    /// Region of site `site_index` intersected with `boundary`
    ///
    /// Returns an empty polygon when the region misses the boundary or the
    /// index is out of range.
    fn clip(&self, diagram: &Self::Diagram, boundary: &BoundaryShape, site_index: usize) -> Vec<Vec2>;
}

/// Delaunay graph of a site list
///
/// Neighbor lists are sorted so clipping visits half-planes in a fixed order.
#[derive(Debug, Clone)]
pub struct DelaunayDiagram {
    sites: Vec<Vec2>,
    neighbors: Vec<Vec<usize>>,
}

impl DelaunayDiagram {
    #[inline]
    pub fn sites(&self) -> &[Vec2] {
        &self.sites
    }

    /// Candidate Voronoi neighbors of a site
    pub fn neighbors(&self, site_index: usize) -> &[usize] {
        self.neighbors
            .get(site_index)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }
}

/// Default engine: Delaunay via lifted convex hull, half-plane clipping
#[derive(Debug, Clone, Copy, Default)]
pub struct HullDiagramEngine;

impl DiagramEngine for HullDiagramEngine {
    type Diagram = DelaunayDiagram;

    fn compute_diagram(&self, sites: &[Vec2]) -> Result<DelaunayDiagram> {
        let neighbors = match delaunay_neighbors(sites) {
            Some(neighbors) => neighbors,
            None => {
                if sites.len() >= 4 {
                    log::warn!(sites = sites.len(); "Convex hull failed, clipping against all sites");
                }
                all_pairs(sites.len())
            }
        };

        Ok(DelaunayDiagram {
            sites: sites.to_vec(),
            neighbors,
        })
    }

    fn clip(&self, diagram: &DelaunayDiagram, boundary: &BoundaryShape, site_index: usize) -> Vec<Vec2> {
        let Some(&site) = diagram.sites.get(site_index) else {
            return Vec::new();
        };
        if boundary.is_degenerate() {
            return Vec::new();
        }

        let mut polygon = boundary.vertices().to_vec();
        for &other in diagram.neighbors(site_index) {
            polygon = clip_region(&polygon, site, diagram.sites[other]);
            if polygon.is_empty() {
                break;
            }
        }

        let polygon = remove_duplicate_vertices(polygon);
        if polygon.len() < 3 {
            Vec::new()
        } else {
            polygon
        }
    }
}

/// Neighbor lists from the lifted convex hull, `None` when the hull is unusable
///
/// Upper-hull edges are kept too: they only add half-planes that never cut
/// the cell, which is cheaper than classifying faces.
fn delaunay_neighbors(sites: &[Vec2]) -> Option<Vec<Vec<usize>>> {
    if sites.len() < 4 {
        return None;
    }

    // Normalize before lifting so z stays in a range f32 handles well
    let lifted = lift_to_paraboloid(sites);

    let (vertices, triangles) = match transformation::try_convex_hull(&lifted) {
        Ok(hull) => hull,
        Err(err) => {
            log::debug!(error:? = err; "Lifted convex hull failed");
            return None;
        }
    };
    if triangles.is_empty() {
        return None;
    }

    // Hull vertices may be reordered, map them back to site indices
    let site_of: Vec<usize> = vertices
        .iter()
        .map(|v| nearest_lifted(&lifted, v))
        .collect::<Option<Vec<_>>>()?;

    let mut neighbor_sets = vec![BTreeSet::new(); sites.len()];
    for triangle in &triangles {
        let [a, b, c] = triangle.map(|v| site_of[v as usize]);
        for (from, to) in [(a, b), (b, c), (c, a)] {
            if from != to {
                neighbor_sets[from].insert(to);
                neighbor_sets[to].insert(from);
            }
        }
    }

    // A site missing from the hull would get a boundary-sized cell
    if neighbor_sets.iter().any(|n| n.is_empty()) {
        return None;
    }

    Some(
        neighbor_sets
            .into_iter()
            .map(|set| set.into_iter().collect())
            .collect(),
    )
}

fn lift_to_paraboloid(sites: &[Vec2]) -> Vec<Point<f32>> {
    let (min, max) = sites
        .iter()
        .fold((Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)), |(min, max), &p| {
            (min.min(p), max.max(p))
        });
    let center = (min + max) * 0.5;
    let half_extent = ((max - min) * 0.5).max_element().max(f32::EPSILON);

    sites
        .iter()
        .map(|&p| {
            let q = (p - center) / half_extent;
            Point::new(q.x, q.y, q.length_squared())
        })
        .collect()
}

fn nearest_lifted(lifted: &[Point<f32>], vertex: &Point<f32>) -> Option<usize> {
    let (index, dist_sq) = lifted
        .iter()
        .map(|p| (p - vertex).norm_squared())
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))?;
    (dist_sq <= HULL_MATCH_DISTANCE * HULL_MATCH_DISTANCE).then_some(index)
}

/// Every site is a neighbor candidate of every other site
fn all_pairs(count: usize) -> Vec<Vec<usize>> {
    (0..count)
        .map(|i| (0..count).filter(|&j| j != i).collect())
        .collect()
}

/// Sutherland–Hodgman against the half-plane of points closer to `site`
/// than to `other`
///
/// Points on the bisector count as inside.
pub fn clip_to_bisector(polygon: &[Vec2], site: Vec2, other: Vec2) -> Vec<Vec2> {
    let normal = other - site;
    if normal.length_squared() == 0.0 {
        return polygon.to_vec();
    }
    let midpoint = (site + other) * 0.5;
    let side = |p: Vec2| (p - midpoint).dot(normal);

    let mut out = Vec::with_capacity(polygon.len() + 2);
    for i in 0..polygon.len() {
        let current = polygon[i];
        let next = polygon[(i + 1) % polygon.len()];
        let (d_current, d_next) = (side(current), side(next));

        if d_current <= 0.0 {
            out.push(current);
        }
        if (d_current <= 0.0) != (d_next <= 0.0) {
            let t = d_current / (d_current - d_next);
            out.push(current + (next - current) * t);
        }
    }
    out
}

/// Clip to the bisector half-plane of `site`, keeping the piece around it
///
/// A convex polygon crosses the bisector at most twice and goes through
/// [`clip_to_bisector`] unchanged. A concave boundary can fall apart into
/// several pieces there; they are separated along the bisector and only the
/// piece containing `site` is kept. Returns an empty polygon when no piece
/// contains the site.
pub fn clip_region(polygon: &[Vec2], site: Vec2, other: Vec2) -> Vec<Vec2> {
    let normal = other - site;
    let n = polygon.len();
    if normal.length_squared() == 0.0 || n < 3 {
        return clip_to_bisector(polygon, site, other);
    }
    let midpoint = (site + other) * 0.5;

    let inside: Vec<bool> = polygon
        .iter()
        .map(|&p| (p - midpoint).dot(normal) <= 0.0)
        .collect();
    let crossings = (0..n).filter(|&i| inside[i] != inside[(i + 1) % n]).count();
    if crossings <= 2 {
        return clip_to_bisector(polygon, site, other);
    }

    match split_by_bisector(polygon, midpoint, normal) {
        Some(pieces) => pieces
            .into_iter()
            .find(|piece| point_in_polygon(site, piece))
            .unwrap_or_default(),
        None => {
            log::debug!(crossings = crossings; "Could not pair bisector crossings, keeping joined clip");
            clip_to_bisector(polygon, site, other)
        }
    }
}

/// Point where the polygon outline crosses the bisector
struct Crossing {
    /// Index in the ring of vertices and crossings
    ring_index: usize,
    /// Coordinate along the bisector line
    along: f32,
    /// Outline moves from the outer to the inner side here
    entering: bool,
}

/// Inner-side pieces of `polygon`, each a simple polygon in input winding
///
/// The inner part of the bisector line is a set of intervals between
/// crossings sorted along the line. Every piece follows the outline from an
/// entering crossing to the next (exiting) crossing, then jumps along the
/// line to the other end of that interval. `None` if the crossings do not
/// pair up, which only happens when vertices sit exactly on the line.
fn split_by_bisector(polygon: &[Vec2], midpoint: Vec2, normal: Vec2) -> Option<Vec<Vec<Vec2>>> {
    let side = |p: Vec2| (p - midpoint).dot(normal);
    let direction = normal.perp();
    let n = polygon.len();

    let mut ring: Vec<Vec2> = Vec::with_capacity(n * 2);
    let mut crossing_at: Vec<Option<usize>> = Vec::with_capacity(n * 2);
    let mut crossings: Vec<Crossing> = Vec::new();
    for i in 0..n {
        let current = polygon[i];
        let next = polygon[(i + 1) % n];
        let (d_current, d_next) = (side(current), side(next));

        ring.push(current);
        crossing_at.push(None);
        if (d_current <= 0.0) != (d_next <= 0.0) {
            let t = d_current / (d_current - d_next);
            let point = current + (next - current) * t;
            crossing_at.push(Some(crossings.len()));
            crossings.push(Crossing {
                ring_index: ring.len(),
                along: (point - midpoint).dot(direction),
                entering: d_next <= 0.0,
            });
            ring.push(point);
        }
    }

    let mut order: Vec<usize> = (0..crossings.len()).collect();
    order.sort_by(|&a, &b| crossings[a].along.total_cmp(&crossings[b].along));
    let mut partner = vec![0; crossings.len()];
    for pair in order.chunks_exact(2) {
        partner[pair[0]] = pair[1];
        partner[pair[1]] = pair[0];
    }

    let mut used = vec![false; crossings.len()];
    let mut pieces = Vec::new();
    for start in 0..crossings.len() {
        if used[start] || !crossings[start].entering {
            continue;
        }

        let mut piece = Vec::new();
        let mut entry = start;
        loop {
            used[entry] = true;
            let mut k = crossings[entry].ring_index;
            piece.push(ring[k]);
            let exit = loop {
                k = (k + 1) % ring.len();
                piece.push(ring[k]);
                if let Some(c) = crossing_at[k] {
                    break c;
                }
            };
            if crossings[exit].entering {
                return None;
            }
            used[exit] = true;

            entry = partner[exit];
            if entry == start {
                break;
            }
            if used[entry] || !crossings[entry].entering {
                return None;
            }
        }
        pieces.push(piece);
    }
    Some(pieces)
}

fn remove_duplicate_vertices(mut polygon: Vec<Vec2>) -> Vec<Vec2> {
    let min_sq = DUPLICATE_VERTEX_DISTANCE * DUPLICATE_VERTEX_DISTANCE;
    polygon.dedup_by(|b, a| a.distance_squared(*b) < min_sq);
    while polygon.len() > 1 {
        let (first, last) = (polygon[0], polygon[polygon.len() - 1]);
        if first.distance_squared(last) < min_sq {
            polygon.pop();
        } else {
            break;
        }
    }
    polygon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::signed_area;
    use approx::assert_relative_eq;

    fn square() -> BoundaryShape {
        BoundaryShape::rectangle(Vec2::splat(-5.0), Vec2::splat(5.0))
    }

    fn grid_sites() -> Vec<Vec2> {
        let mut sites = Vec::new();
        for y in 0..4 {
            for x in 0..4 {
                // Slight offsets keep the points out of cocircular quads
                let jitter = Vec2::new((x * 7 + y * 3) as f32 * 0.01, (x * 2 + y * 5) as f32 * 0.01);
                sites.push(Vec2::new(-3.75 + 2.5 * x as f32, -3.75 + 2.5 * y as f32) + jitter);
            }
        }
        sites
    }

    #[test]
    fn test_clip_to_bisector_halves_square() {
        let boundary = square();
        let half = clip_to_bisector(boundary.vertices(), Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0));
        assert_relative_eq!(signed_area(&half).abs(), 50.0, epsilon = 1e-3);
        assert!(half.iter().all(|p| p.x <= 1e-5));
    }

    #[test]
    fn test_clip_to_bisector_noop_for_far_neighbor() {
        let boundary = square();
        let clipped = clip_to_bisector(boundary.vertices(), Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert_eq!(clipped.len(), 4);
    }

    #[test]
    fn test_single_site_gets_whole_boundary() {
        let engine = HullDiagramEngine;
        let diagram = engine.compute_diagram(&[Vec2::ZERO]).unwrap();
        let cell = engine.clip(&diagram, &square(), 0);
        assert_relative_eq!(signed_area(&cell).abs(), 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_cells_partition_boundary() {
        let engine = HullDiagramEngine;
        let sites = grid_sites();
        let diagram = engine.compute_diagram(&sites).unwrap();

        let total: f32 = (0..sites.len())
            .map(|i| signed_area(&engine.clip(&diagram, &square(), i)).abs())
            .sum();
        assert_relative_eq!(total, 100.0, epsilon = 1e-2);
    }

    #[test]
    fn test_cells_contain_their_site() {
        let engine = HullDiagramEngine;
        let sites = grid_sites();
        let diagram = engine.compute_diagram(&sites).unwrap();
        for (i, site) in sites.iter().enumerate() {
            let cell = engine.clip(&diagram, &square(), i);
            assert!(crate::geometry::point_in_polygon(*site, &cell), "site {} outside its cell", i);
        }
    }

    #[test]
    fn test_clipped_vertices_stay_in_boundary() {
        let engine = HullDiagramEngine;
        let sites = grid_sites();
        let diagram = engine.compute_diagram(&sites).unwrap();
        for i in 0..sites.len() {
            for v in engine.clip(&diagram, &square(), i) {
                assert!(v.x.abs() <= 5.0 + 1e-4 && v.y.abs() <= 5.0 + 1e-4, "{} outside", v);
            }
        }
    }

    #[test]
    fn test_delaunay_neighbors_symmetric() {
        let diagram = HullDiagramEngine.compute_diagram(&grid_sites()).unwrap();
        for i in 0..diagram.sites().len() {
            assert!(!diagram.neighbors(i).is_empty());
            for &j in diagram.neighbors(i) {
                assert_ne!(i, j);
                assert!(diagram.neighbors(j).contains(&i));
            }
        }
    }

    #[test]
    fn test_site_outside_boundary_gets_empty_cell() {
        let engine = HullDiagramEngine;
        let sites = [Vec2::new(50.0, 0.0), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)];
        let diagram = engine.compute_diagram(&sites).unwrap();
        assert!(engine.clip(&diagram, &square(), 0).is_empty());
        assert!(!engine.clip(&diagram, &square(), 1).is_empty());
    }

    #[test]
    fn test_degenerate_boundary_or_index() {
        let engine = HullDiagramEngine;
        let diagram = engine.compute_diagram(&[Vec2::ZERO, Vec2::ONE]).unwrap();
        let segment = BoundaryShape::new(vec![Vec2::ZERO, Vec2::ONE]);
        assert!(engine.clip(&diagram, &segment, 0).is_empty());
        assert!(engine.clip(&diagram, &square(), 5).is_empty());
    }

    /// U shape open at the top: arms x in [0,2] and [4,6], bar y in [0,1]
    fn u_shape() -> BoundaryShape {
        BoundaryShape::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 4.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(2.0, 4.0),
            Vec2::new(0.0, 4.0),
        ])
    }

    #[test]
    fn test_clip_region_keeps_piece_with_site() {
        // The bisector y = 2 cuts both arms; only the left arm top holds the site
        let site = Vec2::new(1.0, 3.5);
        let piece = clip_region(u_shape().vertices(), site, Vec2::new(1.0, 0.5));

        assert_eq!(piece.len(), 4);
        assert_relative_eq!(signed_area(&piece), 4.0, epsilon = 1e-4);
        assert!(piece.iter().all(|p| p.x <= 2.0 + 1e-5 && p.y >= 2.0 - 1e-5));
        assert!(crate::geometry::point_in_polygon(site, &piece));
    }

    #[test]
    fn test_clip_region_other_side() {
        let site = Vec2::new(1.0, 0.5);
        let piece = clip_region(u_shape().vertices(), site, Vec2::new(1.0, 3.5));
        // Bar plus the lower halves of both arms, still one piece
        assert_relative_eq!(signed_area(&piece), 6.0 + 2.0 + 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_clip_region_matches_plain_clip_when_convex() {
        let boundary = square();
        let (site, other) = (Vec2::new(-1.0, 0.5), Vec2::new(2.0, -0.5));
        assert_eq!(
            clip_region(boundary.vertices(), site, other),
            clip_to_bisector(boundary.vertices(), site, other)
        );
    }

    #[test]
    fn test_clip_region_site_outside_every_piece() {
        // Site in the notch between the arms
        let piece = clip_region(u_shape().vertices(), Vec2::new(3.0, 3.5), Vec2::new(3.0, 0.5));
        assert!(piece.is_empty());
    }

    #[test]
    fn test_concave_boundary_cells_are_single_pieces() {
        let engine = HullDiagramEngine;
        let sites = [
            Vec2::new(1.1, 3.4),
            Vec2::new(4.8, 3.6),
            Vec2::new(0.9, 0.4),
            Vec2::new(5.2, 0.6),
            Vec2::new(3.0, 0.5),
        ];
        let diagram = engine.compute_diagram(&sites).unwrap();

        let total: f32 = (0..sites.len())
            .map(|i| {
                let cell = engine.clip(&diagram, &u_shape(), i);
                assert!(crate::geometry::point_in_polygon(sites[i], &cell), "site {} outside its cell", i);
                signed_area(&cell)
            })
            .sum();
        // Pieces tile the U (area 20) without overlapping
        assert_relative_eq!(total, 20.0, epsilon = 1e-3);
    }

    #[test]
    fn test_remove_duplicate_vertices() {
        let polygon = vec![
            Vec2::ZERO,
            Vec2::ZERO,
            Vec2::X,
            Vec2::ONE,
            Vec2::ZERO,
        ];
        assert_eq!(remove_duplicate_vertices(polygon), vec![Vec2::ZERO, Vec2::X, Vec2::ONE]);
    }
}
