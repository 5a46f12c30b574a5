//! Core rendering functions
//! Framebuffer, depth buffer and the per-frame compositor

use super::coords::{rotate, Axis, CoordsCounter, PixelCoords, Resolution, ScreenCoords};
use super::line::Line;
use super::math::{Mat3, Vec3, Vec4};
use super::triangle::{Fragment, Rasterizer};
use super::types::{Color, Mesh, RenderSettings, Rgb, Vertex};

/// Value the depth buffer is reset to at the start of every frame
pub const FAR_DEPTH: f32 = 1.0;

/// Half-width of the focus marker, in screen units
const FOCUS_MARKER_SIZE: f32 = 0.04;

/// Output buffer for software rendering, B,G,R,A bytes per pixel, row-major
pub struct Framebuffer {
    pub pixels: Vec<u8>,
    resolution: Resolution,
}

impl Framebuffer {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            pixels: vec![0; resolution.pixel_count() * 4],
            resolution,
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn width(&self) -> u32 {
        self.resolution.width()
    }

    pub fn height(&self) -> u32 {
        self.resolution.height()
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bgra();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    /// Write one pixel. Panics if `p` lies outside the buffer.
    pub fn set_pixel(&mut self, p: PixelCoords, color: Color) {
        let idx = self.resolution.index(p) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_bgra());
    }

    pub fn pixel(&self, p: PixelCoords) -> Color {
        let idx = self.resolution.index(p) * 4;
        let px = &self.pixels[idx..idx + 4];
        Color::from_bgra([px[0], px[1], px[2], px[3]])
    }

    /// Raw bytes in framebuffer-device order
    pub fn as_bgra(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy with red and blue swapped, for textures and image files
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len());
        for px in self.pixels.chunks_exact(4) {
            out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
        }
        out
    }

    /// Draw a DDA line between two pixels (both inclusive)
    pub fn draw_line(&mut self, start: PixelCoords, end: PixelCoords, color: Color) {
        for p in Line::new(start, end) {
            self.set_pixel(p, color);
        }
    }
}

/// Per-pixel nearest depth, frame-scoped
pub struct DepthBuffer {
    values: Vec<f32>,
    resolution: Resolution,
}

impl DepthBuffer {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            values: vec![FAR_DEPTH; resolution.pixel_count()],
            resolution,
        }
    }

    pub fn reset(&mut self) {
        self.values.fill(FAR_DEPTH);
    }

    pub fn get(&self, p: PixelCoords) -> f32 {
        self.values[self.resolution.index(p)]
    }

    /// Record `depth` at `p` unless something closer is already there or the
    /// fragment lies in front of the near plane.
    pub fn test_and_set(&mut self, p: PixelCoords, depth: f32) -> bool {
        if self.get(p) < depth || depth < -1.0 {
            return false;
        }
        self.values[self.resolution.index(p)] = depth;
        true
    }
}

/// Camera-space to clip-space projection with a linear depth remap
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    distance: f32,
    aspect: f32,
    c1: f32,
    c2: f32,
}

impl Projection {
    pub fn new(resolution: Resolution, distance: f32, near: f32, far: f32) -> Self {
        debug_assert!(0.0 < near && near < far);
        Self {
            distance,
            aspect: resolution.aspect(),
            c1: (far + near) / (far - near),
            c2: 2.0 * far * near / (far - near),
        }
    }

    /// Camera-space point (looking down -z) to clip space.
    ///
    /// After the divide, depth runs from -1 at `near` to 1 at `far`.
    pub fn project(&self, r: Vec3) -> Vec4 {
        Vec4::new(
            -self.distance * r.x / self.aspect,
            self.distance * r.y,
            self.c1 * r.z + self.c2,
            r.z,
        )
    }
}

/// Camera state: position plus an orthonormal world-to-camera rotation
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub rotation: Mat3,
}

impl Camera {
    pub fn new(position: Vec3, rotation: Mat3) -> Self {
        Self { position, rotation }
    }

    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        // The camera looks down its -z axis, so z points back at the viewer
        let back = position - target;
        Self::new(position, Mat3::rotate(back, up))
    }

    /// World-space point to camera space
    pub fn view(&self, p: Vec3) -> Vec3 {
        self.rotation * (p - self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::UP)
    }
}

/// Model-to-world transform: optional spin about a principal axis, then an offset
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelTransform {
    pub offset: Vec3,
    pub spin: Option<(Axis, f32)>,
}

impl ModelTransform {
    pub fn point(&self, p: Vec3) -> Vec3 {
        self.direction(p) + self.offset
    }

    /// Directions (normals) only rotate
    pub fn direction(&self, d: Vec3) -> Vec3 {
        match self.spin {
            Some((axis, angle)) => rotate(d, angle, axis),
            None => d,
        }
    }
}

/// Counters for one rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub triangles: usize,
    pub fragments: usize,
    pub written: usize,
}

/// Per-frame drawing loop: depth test, normal interpolation, shading, write
pub struct Compositor {
    rasterizer: Rasterizer,
    coords: CoordsCounter,
    projection: Projection,
    depth: DepthBuffer,
    fragments: Vec<Fragment>,
    light_dir: Vec3,
    settings: RenderSettings,
}

impl Compositor {
    pub fn new(resolution: Resolution, settings: RenderSettings) -> Self {
        let coords = CoordsCounter::with_fov(resolution, settings.fov);
        let projection = Projection::new(resolution, coords.distance(), settings.near, settings.far);
        Self {
            rasterizer: Rasterizer::new(resolution),
            coords,
            projection,
            depth: DepthBuffer::new(resolution),
            fragments: Vec::new(),
            light_dir: settings.light_dir.normalize(),
            settings,
        }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn set_wireframe(&mut self, on: bool) {
        self.settings.wireframe = on;
    }

    /// Start a new frame: everything is infinitely far again
    pub fn begin_frame(&mut self) {
        self.depth.reset();
    }

    /// Render a whole mesh into `fb`. Call `begin_frame` first.
    pub fn render_mesh(
        &mut self,
        fb: &mut Framebuffer,
        mesh: &Mesh,
        camera: &Camera,
        model: &ModelTransform,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        for tri in mesh.triangles() {
            let (fragments, written) = self.draw_triangle(fb, &tri, camera, model);
            stats.triangles += 1;
            stats.fragments += fragments;
            stats.written += written;
        }

        if self.settings.wireframe {
            self.draw_wireframe(fb, mesh, camera, model, self.settings.wire_color);
        }

        stats
    }

    /// Project, rasterize and shade one triangle.
    /// Returns (fragments produced, pixels written).
    pub fn draw_triangle(
        &mut self,
        fb: &mut Framebuffer,
        vs: &[Vertex; 3],
        camera: &Camera,
        model: &ModelTransform,
    ) -> (usize, usize) {
        let world = vs.map(|v| Vertex {
            pos: model.point(v.pos),
            normal: model.direction(v.normal),
            ..v
        });
        let clip = world.map(|v| self.projection.project(camera.view(v.pos)));
        self.composite(fb, &clip, &world, &camera.rotation)
    }

    /// Rasterize a clip-space triangle and shade the surviving fragments.
    ///
    /// `vertices` are blended per fragment; the blended normal is brought into
    /// camera space with `rotation` before lighting.
    pub fn composite(
        &mut self,
        fb: &mut Framebuffer,
        clip: &[Vec4; 3],
        vertices: &[Vertex; 3],
        rotation: &Mat3,
    ) -> (usize, usize) {
        self.fragments.clear();
        let produced = self.rasterizer.rasterize(clip, &mut self.fragments);

        let mut written = 0;
        for frag in &self.fragments {
            let p = frag.pixel();
            if !self.depth.test_and_set(p, frag.depth) {
                continue;
            }

            let normal = Vertex::mix(vertices, frag.weights()).normal;
            let color = shade(
                *rotation * normal,
                self.light_dir,
                self.settings.ambient,
                self.settings.material,
                self.settings.alpha,
            );
            fb.set_pixel(p, color);
            written += 1;
        }

        (produced, written)
    }

    /// Outline every triangle of `mesh` with DDA lines.
    ///
    /// Edges touching a vertex behind the camera or outside the screen are skipped.
    pub fn draw_wireframe(
        &self,
        fb: &mut Framebuffer,
        mesh: &Mesh,
        camera: &Camera,
        model: &ModelTransform,
        color: Color,
    ) {
        for tri in mesh.triangles() {
            let pixels = tri.map(|v| {
                let clip = self.projection.project(camera.view(model.point(v.pos)));
                self.clip_to_pixel(clip)
            });

            for i in 0..3 {
                if let (Some(a), Some(b)) = (pixels[i], pixels[(i + 1) % 3]) {
                    fb.draw_line(a, b, color);
                }
            }
        }
    }

    /// Screen-aligned cross on the view axis, `focus` units in front of the camera
    pub fn draw_focus_marker(&self, fb: &mut Framebuffer, focus: f32, color: Color) {
        if focus <= 0.0 {
            return;
        }
        let arm = FOCUS_MARKER_SIZE * focus / self.coords.distance();
        let center = Vec3::new(0.0, 0.0, -focus);
        let (dx, dy) = (Vec3::new(arm, 0.0, 0.0), Vec3::new(0.0, arm, 0.0));
        draw_world_line(fb, &self.coords, center - dx, center + dx, color);
        draw_world_line(fb, &self.coords, center - dy, center + dy, color);
    }

    fn clip_to_pixel(&self, clip: Vec4) -> Option<PixelCoords> {
        // In front of the camera means negative camera-space z
        if clip.w >= 0.0 {
            return None;
        }
        let ndc = clip.to_ndc();
        if ndc.x.abs() > 1.0 || ndc.y.abs() > 1.0 {
            return None;
        }
        Some(self.coords.screen_to_pixel(ScreenCoords::new(ndc.x, ndc.y)))
    }
}

/// Lambert term against a unit light direction, never negative
pub fn shade(normal: Vec3, light_dir: Vec3, ambient: f32, material: Rgb, alpha: u8) -> Color {
    let diffuse = normal.dot(light_dir).max(0.0);
    let intensity = ambient + (1.0 - ambient) * diffuse;
    Color::from_unit(material.shade(intensity), alpha)
}

/// Project both camera-space endpoints with `coords` and draw the segment.
///
/// Both endpoints must be in front of the camera and project inside the screen.
pub fn draw_world_line(fb: &mut Framebuffer, coords: &CoordsCounter, a: Vec3, b: Vec3, color: Color) {
    let start = coords.world_to_pixel(a);
    let end = coords.world_to_pixel(b);
    fb.draw_line(start, end, color);
}
