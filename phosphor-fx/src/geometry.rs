//! Geometry bank - write-once vertex sets for the wireframe shapes

use std::f32::consts::PI;

/// Three corners, each (x, y, z) in model space.
pub type Triangle = [[f32; 3]; 3];

/// Shape selector for the wireframe projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Gem,
}

/// Unit cube as 12 triangles, two per face.
pub const CUBE: [Triangle; 12] = [
    [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    [[0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    [[1.0, 0.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    [[1.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
    [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0]],
    [[0.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    [[1.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]],
    [[1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
];

/// Holds the shapes that need startup computation. The cube is const data;
/// the gem (a pentagonal bi-pyramid) is derived from a regular pentagon once
/// and read-only afterwards.
pub struct GeometryBank {
    gem: [Triangle; 10],
}

impl GeometryBank {
    pub fn new() -> Self {
        let step = 2.0 * PI / 5.0;
        let mut gem = [[[0.0f32; 3]; 3]; 10];

        for point in 0..5 {
            let (a_sin, a_cos) = (point as f32 * step).sin_cos();
            let (b_sin, b_cos) = (((point + 1) % 5) as f32 * step).sin_cos();

            // One fan triangle to each apex per pentagon edge.
            gem[point] = [[a_sin, a_cos, 0.0], [b_sin, b_cos, 0.0], [0.0, 0.0, 1.0]];
            gem[point + 5] = [[a_sin, a_cos, 0.0], [b_sin, b_cos, 0.0], [0.0, 0.0, -1.0]];
        }

        tracing::debug!("geometry bank built");
        Self { gem }
    }

    /// Triangle list for a shape.
    pub fn triangles(&self, shape: Shape) -> &[Triangle] {
        match shape {
            Shape::Cube => &CUBE,
            Shape::Gem => &self.gem,
        }
    }
}

impl Default for GeometryBank {
    fn default() -> Self {
        Self::new()
    }
}
