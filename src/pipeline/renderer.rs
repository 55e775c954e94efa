use crate::core::clipper::{ClipOutcome, FrustumClipper};
use crate::core::framebuffer::ScreenBuffer;
use crate::core::geometry::WorkingVertex;
use crate::core::math::transform::{TransformFactory, apply_perspective_division, ndc_to_screen};
use crate::core::pipeline::{FragmentShader, VertexShader, VertexShaderPayload};
use crate::core::rasterizer::{CullMode, Rasterizer, RenderOptions};
use crate::pipeline::shaders::basic::{BasicFragmentShader, BasicVertexShader};
use crate::scene::light::Light;
use crate::scene::mesh::Geometry;
use log::debug;
use nalgebra::Matrix4;
use std::ops::AddAssign;

/// Edges are scaled by this before the face-normal cross product so that
/// small, distant triangles do not lose the sign to rounding.
const CULL_EDGE_SCALE: f32 = 100.0;

/// Matrices for one draw: model per object, view and projection per camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub model: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
        }
    }
}

/// Everything `render_geometry` needs besides the target.
pub struct RenderPayload<'a> {
    pub geometry: &'a Geometry,
    pub vertex_shader: &'a dyn VertexShader,
    pub fragment_shader: &'a dyn FragmentShader,
    /// World-space lights; moved into view space once per call.
    pub lights: &'a [Light],
    pub transforms: &'a Transforms,
    pub options: &'a RenderOptions,
}

/// Per-draw triangle counters, reported at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub triangles: usize,
    pub culled: usize,
    pub clipped_away: usize,
    pub clipped: usize,
    pub rasterized: usize,
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.triangles += rhs.triangles;
        self.culled += rhs.culled;
        self.clipped_away += rhs.clipped_away;
        self.clipped += rhs.clipped;
        self.rasterized += rhs.rasterized;
    }
}

/// Drives one geometry from object space to fragments.
///
/// The working buffers are reused between calls but never carry data from
/// one call into the next.
#[derive(Debug, Default)]
pub struct Renderer {
    /// Mesh vertices first, then vertices created by clipping. Append-only
    /// within a call, so indices stay valid.
    vertices: Vec<WorkingVertex>,
    /// Triangles that survived culling and clipping.
    triangles: Vec<[usize; 3]>,
    /// Lights in view space.
    lights: Vec<Light>,
    clipper: FrustumClipper,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            lights: Vec::new(),
            clipper: FrustumClipper::new(),
        }
    }

    /// Renders one geometry into `screen`. Only the color and depth buffers
    /// are touched.
    pub fn render_geometry(&mut self, screen: &mut ScreenBuffer, payload: &RenderPayload) -> DrawStats {
        let mut stats = DrawStats {
            triangles: payload.geometry.mesh.triangle_count(),
            ..DrawStats::default()
        };

        self.reset(payload);
        self.shade_vertices(payload);
        self.assemble_triangles(&payload.geometry.mesh.indices, payload.options, &mut stats);
        self.finalize_vertices(screen.width as f32, screen.height as f32);

        let material = &payload.geometry.material;
        let fragment_shaders: [&dyn FragmentShader; 2] = [&BasicFragmentShader, payload.fragment_shader];
        let mut rasterizer = Rasterizer::new(
            screen,
            material,
            &self.lights,
            &fragment_shaders,
            payload.options,
        );
        for &[a, b, c] in &self.triangles {
            rasterizer.rasterize_triangle(&[self.vertices[a], self.vertices[b], self.vertices[c]]);
        }
        stats.rasterized = self.triangles.len();

        debug!(
            "Geometry drawn: {} triangles, {} culled, {} clipped away, {} clipped, {} rasterized",
            stats.triangles, stats.culled, stats.clipped_away, stats.clipped, stats.rasterized
        );
        stats
    }

    fn reset(&mut self, payload: &RenderPayload) {
        self.vertices.clear();
        self.triangles.clear();
        self.lights.clear();

        self.vertices
            .extend(payload.geometry.mesh.vertices.iter().map(WorkingVertex::from));
        self.lights.extend(
            payload
                .lights
                .iter()
                .map(|light| light.transformed(&payload.transforms.view)),
        );
    }

    /// Reference transform, then the user vertex shader, once per vertex.
    fn shade_vertices(&mut self, payload: &RenderPayload) {
        let transforms = payload.transforms;
        let model_view = transforms.view * transforms.model;
        let normal_matrix = TransformFactory::normal_matrix(&model_view);

        for vertex in &mut self.vertices {
            let mut vertex_payload = VertexShaderPayload {
                vertex,
                model: &transforms.model,
                view: &transforms.view,
                model_view: &model_view,
                projection: &transforms.projection,
                normal_matrix: &normal_matrix,
            };
            BasicVertexShader.shade(&mut vertex_payload);
            payload.vertex_shader.shade(&mut vertex_payload);
        }
    }

    /// Culls and clips every mesh triangle, filling `self.triangles`.
    fn assemble_triangles(&mut self, indices: &[u32], options: &RenderOptions, stats: &mut DrawStats) {
        let mesh_vertex_count = self.vertices.len();

        for chunk in indices.chunks_exact(3) {
            let tri = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];
            if tri.iter().any(|&i| i >= mesh_vertex_count) {
                stats.clipped_away += 1;
                continue;
            }
            if self.is_culled(tri, options.culling) {
                stats.culled += 1;
                continue;
            }

            let triangle = tri.map(|i| self.vertices[i]);
            match self.clipper.clip_triangle(&triangle) {
                ClipOutcome::Inside => {
                    for i in tri {
                        self.vertices[i].enabled = true;
                    }
                    self.triangles.push(tri);
                }
                ClipOutcome::Culled => stats.clipped_away += 1,
                ClipOutcome::Clipped(polygon) => {
                    let base = self.vertices.len();
                    let count = polygon.len();
                    self.vertices.extend(polygon.into_iter().map(|mut v| {
                        v.enabled = true;
                        v
                    }));
                    for i in 1..count - 1 {
                        self.triangles.push([base, base + i, base + i + 1]);
                    }
                    stats.clipped += 1;
                }
            }
        }
    }

    /// Face orientation from view-space positions against the to-camera
    /// vector. Counter-clockwise on screen is front-facing.
    fn is_culled(&self, tri: [usize; 3], mode: CullMode) -> bool {
        if mode == CullMode::None {
            return false;
        }

        let p0 = self.vertices[tri[0]].varying.view_pos;
        let p1 = self.vertices[tri[1]].varying.view_pos;
        let p2 = self.vertices[tri[2]].varying.view_pos;
        let normal = ((p1 - p0) * CULL_EDGE_SCALE).cross(&((p2 - p0) * CULL_EDGE_SCALE));
        let facing = normal.dot(&(-p0));

        match mode {
            CullMode::Back => facing > 0.0,
            CullMode::Front => facing < 0.0,
            CullMode::None => false,
        }
    }

    /// Perspective divide and viewport transform for vertices that will be
    /// rasterized.
    fn finalize_vertices(&mut self, width: f32, height: f32) {
        for vertex in self.vertices.iter_mut().filter(|v| v.enabled) {
            vertex.ndc_pos = apply_perspective_division(&vertex.clip_pos);
            vertex.screen_pos = ndc_to_screen(&vertex.ndc_pos, width, height);
        }
    }
}
