//! Terrain mesh builder.
//!
//! The mesh is a plane authored in XY (+Z up) so the renderer can lay it
//! flat with [`Placement::ground`]. Vertex `row * columns + col` sits at
//! `x = -size/2 + col * dx`, `y = size/2 - row * dy`.

use std::sync::Arc;

use foundation::math::Vec3;
use serde::Serialize;
use sources::grid::ElevationGrid;
use tracing::{debug, warn};

use crate::layer::{Layer, LayerId, Placement};
use crate::symbology::{Color, MaterialStyle};
use crate::telemetry::TerrainStats;

/// World-space edge length of the terrain plane.
pub const TERRAIN_SIZE: f64 = 20.0;
/// Segments per axis of the flat plane shown when there is no data.
pub const FALLBACK_SEGMENTS: usize = 32;
/// Meters per world unit of height.
pub const HEIGHT_SCALE: f64 = 100.0;
pub const NO_DATA_COLOR: Color = Color::rgb(0x4a, 0x5d, 0x23);
pub const TERRAIN_ORIGIN: Vec3 = Vec3::new(0.0, -2.0, 0.0);
/// Largest vertex count `build_mesh` will lay out for a grid.
pub const MAX_MESH_VERTICES: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerrainMesh {
    pub columns: usize,
    pub rows: usize,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    /// Triangle list.
    pub indices: Vec<u32>,
    pub placement: Placement,
    pub material: MaterialStyle,
}

impl TerrainMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertex(&self, row: usize, col: usize) -> Option<Vec3> {
        if col >= self.columns {
            return None;
        }
        self.positions.get(row * self.columns + col).copied()
    }

    pub fn color(&self) -> Color {
        self.material.color
    }
}

/// Colour band for the highest sample of a grid.
pub fn terrain_color(max_elevation: f64) -> Color {
    if max_elevation > 400.0 {
        Color::rgb(0x8b, 0x45, 0x13)
    } else if max_elevation > 200.0 {
        Color::rgb(0x4a, 0x5d, 0x23)
    } else if max_elevation > 100.0 {
        Color::rgb(0x6b, 0x8e, 0x23)
    } else {
        Color::rgb(0x22, 0x8b, 0x22)
    }
}

fn terrain_material(color: Color) -> MaterialStyle {
    MaterialStyle {
        double_sided: true,
        roughness: 0.8,
        metalness: 0.1,
        ..MaterialStyle::opaque(color)
    }
}

/// Builds the terrain mesh for `grid`.
///
/// An empty grid (or one too small to span a cell) gives the flat
/// fallback plane regardless of its declared dimensions. So does a grid
/// declaring more than [`MAX_MESH_VERTICES`] vertices.
pub fn build_mesh(grid: &ElevationGrid) -> TerrainMesh {
    let Some(max) = grid
        .max_elevation()
        .filter(|_| grid.width >= 2 && grid.height >= 2)
    else {
        return fallback_mesh();
    };
    let vertices = grid.width.checked_mul(grid.height);
    if vertices.is_none_or(|n| n > MAX_MESH_VERTICES) {
        warn!(
            "terrain grid {}x{} exceeds {MAX_MESH_VERTICES} vertices, showing flat plane",
            grid.width, grid.height
        );
        return fallback_mesh();
    }

    let (columns, rows) = (grid.width, grid.height);
    let mut positions = plane(columns, rows, TERRAIN_SIZE);

    // Source row r lands on mesh row rows-1-r.
    for r in 0..rows {
        for c in 0..columns {
            let Some(p) = grid.points.get(r * columns + c) else {
                continue;
            };
            positions[(rows - 1 - r) * columns + c].z = p.elevation / HEIGHT_SCALE;
        }
    }

    let indices = plane_indices(columns, rows);
    let normals = compute_vertex_normals(&positions, &indices);
    if let Some(stats) = TerrainStats::from_grid(grid) {
        debug!(
            "terrain mesh {columns}x{rows}: min {:.1}m max {:.1}m avg {:.1}m over {} points",
            stats.min, stats.max, stats.avg, stats.count
        );
    }

    TerrainMesh {
        columns,
        rows,
        positions,
        normals,
        indices,
        placement: Placement::ground(TERRAIN_ORIGIN),
        material: terrain_material(terrain_color(max)),
    }
}

fn fallback_mesh() -> TerrainMesh {
    let side = FALLBACK_SEGMENTS + 1;
    let positions = plane(side, side, TERRAIN_SIZE);
    let indices = plane_indices(side, side);
    TerrainMesh {
        columns: side,
        rows: side,
        normals: vec![Vec3::new(0.0, 0.0, 1.0); positions.len()],
        positions,
        indices,
        placement: Placement::ground(TERRAIN_ORIGIN),
        material: terrain_material(NO_DATA_COLOR),
    }
}

fn plane(columns: usize, rows: usize, size: f64) -> Vec<Vec3> {
    let half = size / 2.0;
    let dx = size / (columns - 1) as f64;
    let dy = size / (rows - 1) as f64;
    let mut positions = Vec::with_capacity(columns * rows);
    for row in 0..rows {
        let y = half - row as f64 * dy;
        for col in 0..columns {
            positions.push(Vec3::new(-half + col as f64 * dx, y, 0.0));
        }
    }
    positions
}

// Per cell: a=(r,c) b=(r+1,c) c=(r+1,c+1) d=(r,c+1); faces (a,b,d) (b,c,d).
fn plane_indices(columns: usize, rows: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity((columns - 1) * (rows - 1) * 6);
    for r in 0..rows - 1 {
        for c in 0..columns - 1 {
            let a = (r * columns + c) as u32;
            let b = a + columns as u32;
            let cc = b + 1;
            let d = a + 1;
            indices.extend_from_slice(&[a, b, d, b, cc, d]);
        }
    }
    indices
}

/// Area-weighted vertex normals; vertices with no usable faces get +Z.
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (Some(pa), Some(pb), Some(pc)) = (positions.get(a), positions.get(b), positions.get(c))
        else {
            continue;
        };
        let n = (*pb - *pa).cross(*pc - *pa);
        acc[a] = acc[a] + n;
        acc[b] = acc[b] + n;
        acc[c] = acc[c] + n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::new(0.0, 0.0, 1.0)))
        .collect()
}

/// Terrain layer; rebuilds its mesh only when handed a different grid.
#[derive(Debug)]
pub struct TerrainLayer {
    id: LayerId,
    pub wireframe: bool,
    cached: Option<(Arc<ElevationGrid>, Arc<TerrainMesh>)>,
    fallback: Option<Arc<TerrainMesh>>,
    builds: usize,
}

impl TerrainLayer {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            wireframe: false,
            cached: None,
            fallback: None,
            builds: 0,
        }
    }

    pub fn mesh(&mut self, grid: &Arc<ElevationGrid>) -> Arc<TerrainMesh> {
        if let Some((cached_grid, mesh)) = &self.cached
            && Arc::ptr_eq(cached_grid, grid)
            && mesh.material.wireframe == self.wireframe
        {
            return Arc::clone(mesh);
        }

        let mut mesh = build_mesh(grid);
        mesh.material.wireframe = self.wireframe;
        let mesh = Arc::new(mesh);
        self.cached = Some((Arc::clone(grid), Arc::clone(&mesh)));
        self.builds += 1;
        mesh
    }

    /// The flat no-data plane, built once.
    pub fn fallback(&mut self) -> Arc<TerrainMesh> {
        if let Some(mesh) = &self.fallback
            && mesh.material.wireframe == self.wireframe
        {
            return Arc::clone(mesh);
        }

        let mut mesh = fallback_mesh();
        mesh.material.wireframe = self.wireframe;
        let mesh = Arc::new(mesh);
        self.fallback = Some(Arc::clone(&mesh));
        self.builds += 1;
        mesh
    }

    /// Number of mesh builds so far.
    pub fn builds(&self) -> usize {
        self.builds
    }
}

impl Layer for TerrainLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> &'static str {
        "terrain"
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FALLBACK_SEGMENTS, MAX_MESH_VERTICES, NO_DATA_COLOR, TerrainLayer, build_mesh,
        compute_vertex_normals, terrain_color,
    };
    use crate::symbology::Color;
    use foundation::extent::GeoExtent;
    use foundation::math::Vec3;
    use foundation::point::ElevationPoint;
    use sources::grid::ElevationGrid;
    use std::num::NonZeroU32;
    use std::sync::Arc;

    fn grid(resolution: u32, elevation: impl Fn(usize) -> f64, count: usize) -> ElevationGrid {
        let mut g = ElevationGrid::empty(
            GeoExtent::new(0.0, 0.0, 1.0, 1.0),
            NonZeroU32::new(resolution).unwrap(),
        );
        g.points = (0..count)
            .map(|i| ElevationPoint::new(i as f64, 0.0, elevation(i)))
            .collect();
        g
    }

    #[test]
    fn empty_grid_gives_fallback_plane() {
        for r in [1, 4, 20] {
            let mesh = build_mesh(&grid(r, |_| 0.0, 0));
            assert_eq!(mesh.columns, FALLBACK_SEGMENTS + 1);
            assert_eq!(mesh.vertex_count(), 33 * 33);
            assert_eq!(mesh.triangle_count(), 32 * 32 * 2);
            assert_eq!(mesh.color(), NO_DATA_COLOR);
            assert!(mesh.positions.iter().all(|p| p.z == 0.0));
        }
    }

    #[test]
    fn oversized_grid_falls_back_to_plane() {
        // 1025 x 1025 declared, only the capped 100 points present.
        let mesh = build_mesh(&grid(1024, |i| i as f64 * 10.0, 100));
        assert_eq!(mesh.vertex_count(), 33 * 33);
        assert_eq!(mesh.color(), NO_DATA_COLOR);

        let mesh = build_mesh(&grid(u32::MAX, |_| 500.0, 100));
        assert_eq!(mesh.vertex_count(), 33 * 33);
    }

    #[test]
    fn largest_allowed_grid_keeps_indices_in_range() {
        // 1024 x 1024 = MAX_MESH_VERTICES.
        let mesh = build_mesh(&grid(1023, |_| 50.0, 100));
        assert_eq!(mesh.vertex_count(), MAX_MESH_VERTICES);
        let top = mesh.indices.iter().copied().max().unwrap() as usize;
        assert_eq!(top, MAX_MESH_VERTICES - 1);
    }

    #[test]
    fn rows_are_flipped_and_scaled() {
        let g = grid(2, |i| 100.0 * i as f64, 9);
        let mesh = build_mesh(&g);
        assert_eq!((mesh.columns, mesh.rows), (3, 3));
        for r in 0..3 {
            for c in 0..3 {
                let v = mesh.vertex(2 - r, c).unwrap();
                assert_eq!(v.z, g.points[r * 3 + c].elevation / 100.0);
            }
        }
        assert_eq!(mesh.vertex(0, 0).unwrap(), Vec3::new(-10.0, 10.0, 6.0));
        assert_eq!(mesh.vertex(2, 2).unwrap(), Vec3::new(10.0, -10.0, 2.0));
    }

    #[test]
    fn truncated_grid_leaves_missing_vertices_flat() {
        let g = grid(9, |_| 250.0, 40);
        let mesh = build_mesh(&g);
        assert_eq!(mesh.vertex_count(), 100);
        // Source index 40 is row 4, col 0 -> mesh row 5.
        assert_eq!(mesh.vertex(5, 0).unwrap().z, 0.0);
        assert_eq!(mesh.vertex(9, 0).unwrap().z, 2.5);
    }

    #[test]
    fn colour_bands_use_strict_bounds() {
        assert_eq!(terrain_color(450.0), Color::rgb(0x8b, 0x45, 0x13));
        assert_eq!(terrain_color(250.0), Color::rgb(0x4a, 0x5d, 0x23));
        assert_eq!(terrain_color(150.0), Color::rgb(0x6b, 0x8e, 0x23));
        assert_eq!(terrain_color(50.0), Color::rgb(0x22, 0x8b, 0x22));
        assert_eq!(terrain_color(400.0), terrain_color(250.0));
        assert_eq!(terrain_color(100.0), terrain_color(0.0));
    }

    #[test]
    fn flat_plane_normals_point_up() {
        let mesh = build_mesh(&grid(3, |_| 50.0, 16));
        assert!(mesh.normals.iter().all(|n| *n == Vec3::new(0.0, 0.0, 1.0)));
        assert_eq!(mesh.material.roughness, 0.8);
        assert!(mesh.material.double_sided);
    }

    #[test]
    fn sloped_cell_tilts_normals() {
        let positions = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
        ];
        let normals = compute_vertex_normals(&positions, &[0, 2, 1, 2, 3, 1]);
        for n in normals {
            assert!((n.length() - 1.0).abs() < 1e-12);
            assert!(n.x < 0.0 && n.z > 0.0);
        }
        let lonely = compute_vertex_normals(&[Vec3::ZERO], &[]);
        assert_eq!(lonely, vec![Vec3::new(0.0, 0.0, 1.0)]);
    }

    #[test]
    fn layer_rebuilds_only_for_a_new_grid() {
        let mut layer = TerrainLayer::new(1);
        let a = Arc::new(grid(2, |_| 10.0, 9));
        let first = layer.mesh(&a);
        let again = layer.mesh(&Arc::clone(&a));
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(layer.builds(), 1);

        // Equal contents, different allocation.
        let b = Arc::new((*a).clone());
        layer.mesh(&b);
        assert_eq!(layer.builds(), 2);

        layer.wireframe = true;
        assert!(layer.mesh(&b).material.wireframe);
        assert_eq!(layer.builds(), 3);
    }

    #[test]
    fn fallback_is_built_once() {
        let mut layer = TerrainLayer::new(1);
        let a = layer.fallback();
        let b = layer.fallback();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.color(), NO_DATA_COLOR);
        assert_eq!(layer.builds(), 1);
    }
}
