//! Tessellated surface plane and the reference solid.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Vertex data (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Four corners in consistent winding: (s0,t0) (s1,t0) (s1,t1) (s0,t1)
pub type Quad = [Vertex; 4];

/// CPU-side indexed triangle mesh ready for upload
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Regular grid of quads over the flat surface rectangle.
///
/// Spans x ∈ [-2, 2], z ∈ [0, 4] at y = 0 with every normal pointing up.
/// Depends only on the tessellation counts, so iterating twice yields the
/// same quads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceGrid {
    pub quads_x: u32,
    pub quads_z: u32,
}

impl SurfaceGrid {
    pub const LEFT_X: f32 = -2.0;
    pub const RIGHT_X: f32 = 2.0;
    pub const NEAR_Z: f32 = 0.0;
    pub const FAR_Z: f32 = 4.0;
    pub const PLANE_Y: f32 = 0.0;

    pub fn new(quads_x: u32, quads_z: u32) -> Self {
        Self { quads_x, quads_z }
    }

    pub fn quad_count(&self) -> usize {
        self.quads_x as usize * self.quads_z as usize
    }

    /// Lazily generate every quad, X-major then Z
    pub fn quads(&self) -> impl Iterator<Item = Quad> + Clone {
        let grid = *self;
        (0..grid.quads_x).flat_map(move |i| (0..grid.quads_z).map(move |j| grid.quad(i, j)))
    }

    fn quad(&self, i: u32, j: u32) -> Quad {
        let s0 = i as f32 / self.quads_x as f32;
        let s1 = (i + 1) as f32 / self.quads_x as f32;
        let t0 = j as f32 / self.quads_z as f32;
        let t1 = (j + 1) as f32 / self.quads_z as f32;

        let x = |s: f32| s * (Self::RIGHT_X - Self::LEFT_X) + Self::LEFT_X;
        let z = |t: f32| t * (Self::FAR_Z - Self::NEAR_Z) + Self::NEAR_Z;
        let vertex = |s: f32, t: f32| Vertex {
            position: [x(s), Self::PLANE_Y, z(t)],
            normal: [0.0, 1.0, 0.0],
            uv: [s, t],
        };

        [vertex(s0, t0), vertex(s1, t0), vertex(s1, t1), vertex(s0, t1)]
    }

    /// Triangle mesh built from [`Self::quads`], two triangles per quad
    pub fn triangulate(&self) -> MeshData {
        let mut vertices = Vec::with_capacity(self.quad_count() * 4);
        let mut indices = Vec::with_capacity(self.quad_count() * 6);

        for quad in self.quads() {
            let base = vertices.len() as u32;
            vertices.extend_from_slice(&quad);
            indices.extend([0, 1, 2, 0, 2, 3].map(|corner| base + corner));
        }

        MeshData { vertices, indices }
    }
}

/// Unit UV sphere centred on the origin, drawn in place of the surface
pub fn reference_solid(stacks: u32, slices: u32) -> MeshData {
    let stacks = stacks.max(2);
    let slices = slices.max(3);

    let mut vertices = Vec::with_capacity(((stacks + 1) * (slices + 1)) as usize);
    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let polar = v * PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let azimuth = u * TAU;
            let normal = [
                polar.sin() * azimuth.cos(),
                polar.cos(),
                polar.sin() * azimuth.sin(),
            ];
            vertices.push(Vertex {
                position: normal,
                normal,
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * (slices + 1) + slice;
            let b = a + slices + 1;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_count() {
        let grid = SurfaceGrid::new(7, 3);
        assert_eq!(grid.quads().count(), 21);
        assert_eq!(grid.quad_count(), 21);
    }

    #[test]
    fn test_generation_is_repeatable() {
        let grid = SurfaceGrid::new(12, 9);
        let first: Vec<Quad> = grid.quads().collect();
        let second: Vec<Quad> = grid.quads().collect();
        assert_eq!(first, second);
        assert_eq!(first, SurfaceGrid::new(12, 9).quads().collect::<Vec<_>>());
    }

    #[test]
    fn test_texture_coordinates_in_unit_square() {
        for quad in SurfaceGrid::new(16, 5).quads() {
            for vertex in quad {
                let [s, t] = vertex.uv;
                assert!((0.0..=1.0).contains(&s));
                assert!((0.0..=1.0).contains(&t));
            }
        }
    }

    #[test]
    fn test_grid_spans_surface_rectangle() {
        let quads: Vec<Quad> = SurfaceGrid::new(4, 4).quads().collect();

        let first = quads[0][0].position;
        assert_eq!(first, [-2.0, 0.0, 0.0]);

        let last = quads.last().unwrap()[2].position;
        assert_eq!(last, [2.0, 0.0, 4.0]);

        assert!(quads
            .iter()
            .flatten()
            .all(|v| v.position[1] == 0.0 && v.normal == [0.0, 1.0, 0.0]));
    }

    #[test]
    fn test_quad_winding_is_consistent() {
        for quad in SurfaceGrid::new(3, 3).quads() {
            assert_eq!(quad[0].uv[1], quad[1].uv[1]);
            assert!(quad[1].uv[0] > quad[0].uv[0]);
            assert_eq!(quad[1].uv[0], quad[2].uv[0]);
            assert!(quad[2].uv[1] > quad[1].uv[1]);
            assert_eq!(quad[3].uv, [quad[0].uv[0], quad[2].uv[1]]);
        }
    }

    #[test]
    fn test_triangulation_counts() {
        let grid = SurfaceGrid::new(8, 5);
        let mesh = grid.triangulate();
        assert_eq!(mesh.vertices.len(), 8 * 5 * 4);
        assert_eq!(mesh.indices.len(), 8 * 5 * 6);
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_triangulation_draws_generated_quads() {
        let grid = SurfaceGrid::new(6, 4);
        let mesh = grid.triangulate();
        let quads: Vec<Quad> = grid.quads().collect();

        let corners: Vec<Vertex> = quads.iter().flatten().copied().collect();
        assert_eq!(mesh.vertices, corners);

        assert_eq!(&mesh.indices[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&mesh.indices[6..12], &[4, 5, 6, 4, 6, 7]);
    }

    #[test]
    fn test_reference_solid_is_unit_sphere() {
        let mesh = reference_solid(8, 16);
        assert_eq!(mesh.indices.len(), 8 * 16 * 6);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-5);
        }
    }
}
