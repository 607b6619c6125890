//! Wireframe projector - rotating solids rasterized as line segments
//!
//! Runs once per frame: fades the foreground for motion trails, rotates the
//! shape about two axes with frame-derived angles, pushes it into view depth,
//! projects through a fixed perspective matrix, nudges the result along a
//! Lissajous path, and draws every triangle edge with Bresenham lines. All
//! plotting goes through clamped layer addressing, so off-screen geometry
//! degrades to edge smears instead of faulting.

use crate::geometry::{GeometryBank, Shape, Triangle};
use crate::layer::Layer;
use crate::{VIDEO_H, VIDEO_W};

/// Row-vector 4x4 matrix, as the projection pipeline multiplies them.
pub type Mat4 = [[f32; 4]; 4];

/// Z-rotation flavor. `Warped` shears the Z rotation with a half-rate sine,
/// which makes the gem tumble instead of spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spin {
    Regular,
    Warped,
}

const NEAR_CLIP: f32 = 1.0;
const FAR_CLIP: f32 = 100.0;
const FOV_RAD: f32 = 1.0;
/// View depth the rotated shape is pushed to before projection.
const VIEW_DEPTH: f32 = 3.0;

/// Transform a point by a matrix with a guarded homogeneous divide.
fn transform(v: [f32; 3], m: &Mat4) -> [f32; 3] {
    let x = v[0] * m[0][0] + v[1] * m[1][0] + v[2] * m[2][0] + m[3][0];
    let y = v[0] * m[0][1] + v[1] * m[1][1] + v[2] * m[2][1] + m[3][1];
    let z = v[0] * m[0][2] + v[1] * m[1][2] + v[2] * m[2][2] + m[3][2];
    let w = v[0] * m[0][3] + v[1] * m[1][3] + v[2] * m[2][3] + m[3][3];
    if w != 0.0 {
        [x / w, y / w, z / w]
    } else {
        [x, y, z]
    }
}

fn projection() -> Mat4 {
    let aspect = VIDEO_H as f32 / VIDEO_W as f32;
    [
        [aspect * FOV_RAD, 0.0, 0.0, 0.0],
        [0.0, FOV_RAD, 0.0, 0.0],
        [0.0, 0.0, FAR_CLIP / (FAR_CLIP - NEAR_CLIP), 1.0],
        [0.0, 0.0, (-FAR_CLIP * NEAR_CLIP) / (FAR_CLIP - NEAR_CLIP), 0.0],
    ]
}

/// Rotation pair for a frame: Z first, then X, angles `frame / 8` and half
/// of it.
pub(crate) fn rotations(frame: u32, spin: Spin) -> (Mat4, Mat4) {
    let theta = frame as f32 / 8.0;
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_h, cos_h) = (theta * 0.5).sin_cos();

    let mut rot_z: Mat4 = [[0.0; 4]; 4];
    rot_z[0][0] = cos_t;
    rot_z[0][1] = match spin {
        Spin::Regular => sin_t,
        Spin::Warped => -sin_h,
    };
    rot_z[1][0] = -sin_t;
    rot_z[1][1] = cos_t;
    rot_z[2][2] = 1.0;
    rot_z[3][3] = 1.0;

    let mut rot_x: Mat4 = [[0.0; 4]; 4];
    rot_x[0][0] = 1.0;
    rot_x[1][1] = cos_h;
    rot_x[1][2] = sin_h;
    rot_x[2][1] = -sin_h;
    rot_x[2][2] = cos_h;
    rot_x[3][3] = 1.0;

    (rot_z, rot_x)
}

/// Screen-space corners for one triangle under the frame's transforms.
pub(crate) fn screen_points(
    tri: &Triangle,
    rot_z: &Mat4,
    rot_x: &Mat4,
    proj: &Mat4,
    move_x: f32,
    move_y: f32,
) -> [[i32; 2]; 3] {
    let mut points = [[0i32; 2]; 3];
    for (corner, vertex) in tri.iter().enumerate() {
        let rotated = transform(transform(*vertex, rot_z), rot_x);
        let placed = [rotated[0], rotated[1], rotated[2] + VIEW_DEPTH];
        let projected = transform(placed, proj);
        let sx = (projected[0] + 1.0) * (VIDEO_W / 2) as f32 + move_x;
        let sy = (projected[1] + 1.0) * (VIDEO_H / 2) as f32 + move_y;
        points[corner] = [sx as i32, sy as i32];
    }
    points
}

/// Fade trails and draw the shape for this frame.
pub fn render(
    fg: &mut Layer,
    geometry: &GeometryBank,
    shape: Shape,
    spin: Spin,
    frame: u32,
    shade: u8,
) {
    fg.dim_half();

    let theta = frame as f32 / 8.0;
    let (rot_z, rot_x) = rotations(frame, spin);
    let proj = projection();

    // Screen-space drift keeps the solid wandering around the frame.
    let move_x = theta.sin() * 35.0;
    let move_y = (theta * 1.4).cos() * 20.0;

    for tri in geometry.triangles(shape) {
        let points = screen_points(tri, &rot_z, &rot_x, &proj, move_x, move_y);
        triangle(fg, shade, points);
    }
}

/// Rasterize a triangle as its three edges.
pub fn triangle(fg: &mut Layer, shade: u8, points: [[i32; 2]; 3]) {
    line(fg, shade, points[0], points[1]);
    line(fg, shade, points[1], points[2]);
    line(fg, shade, points[2], points[0]);
}

/// Bresenham line with symmetric error accumulation.
pub fn line(fg: &mut Layer, shade: u8, from: [i32; 2], to: [i32; 2]) {
    let [mut x0, mut y0] = from;
    let [x1, y1] = to;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        fg.set(y0, x0, shade);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_triangle_projects_to_one_point() {
        // All corners at the model center under zero rotation collapse to a
        // single screen point rather than erroring out.
        let tri: Triangle = [[0.0; 3]; 3];
        let (rot_z, rot_x) = rotations(0, Spin::Regular);
        let points = screen_points(&tri, &rot_z, &rot_x, &projection(), 0.0, 0.0);
        assert_eq!(points[0], points[1]);
        assert_eq!(points[1], points[2]);
        assert_eq!(points[0], [(VIDEO_W / 2) as i32, (VIDEO_H / 2) as i32]);
    }

    #[test]
    fn test_degenerate_triangle_rasterizes_as_point() {
        let mut fg = Layer::new();
        triangle(&mut fg, 210, [[40, 30], [40, 30], [40, 30]]);
        let lit = (0..Layer::LEN).filter(|&i| fg.at(i) != 0).count();
        assert_eq!(lit, 1);
        assert_eq!(fg.get(30, 40), 210);
    }

    #[test]
    fn test_line_endpoints_and_connectivity() {
        let mut fg = Layer::new();
        line(&mut fg, 255, [2, 2], [12, 7]);
        assert_eq!(fg.get(2, 2), 255);
        assert_eq!(fg.get(7, 12), 255);
        // A rasterized segment lights one pixel per major-axis step.
        let lit = (0..Layer::LEN).filter(|&i| fg.at(i) != 0).count();
        assert_eq!(lit, 11);
    }

    #[test]
    fn test_offscreen_line_is_clamped() {
        let mut fg = Layer::new();
        line(&mut fg, 100, [-30, -10], [200, 140]);
        // Nothing to assert beyond "no panic" and some pixels landing on
        // the clamped border path.
        let lit = (0..Layer::LEN).filter(|&i| fg.at(i) != 0).count();
        assert!(lit > 0);
    }

    #[test]
    fn test_render_fades_previous_frame() {
        let mut fg = Layer::new();
        let bank = GeometryBank::new();
        fg.set(60, 80, 200);
        render(&mut fg, &bank, Shape::Cube, Spin::Regular, 0, 210);
        // The stale pixel was halved before the new frame drew over the top.
        let value = fg.get(60, 80);
        assert!(value == 100 || value == 210);
    }
}
