//! Fixed cube model and helpers for transforming it as a whole
use nalgebra::{Matrix4, Point3};

use crate::transform::{apply_matrix, Transform};

pub const CUBE_VERTEX_COUNT: usize = 8;

/// Eight corners of the cube spanning [-1, 1] on every axis.
///
/// Order: front face (z = +1) counter-clockwise from top-left, then the back
/// face (z = -1) starting at its top-left corner. Vertex ids index this array.
pub fn cube_vertices() -> [Point3<f32>; CUBE_VERTEX_COUNT] {
    [
        Point3::new(-1.0, 1.0, 1.0),
        Point3::new(-1.0, -1.0, 1.0),
        Point3::new(1.0, -1.0, 1.0),
        Point3::new(1.0, 1.0, 1.0),
        Point3::new(-1.0, 1.0, -1.0),
        Point3::new(1.0, 1.0, -1.0),
        Point3::new(1.0, -1.0, -1.0),
        Point3::new(-1.0, -1.0, -1.0),
    ]
}

pub fn apply_matrix_to_cube(
    vertices: &[Point3<f32>; CUBE_VERTEX_COUNT],
    matrix: &Matrix4<f32>,
) -> [Point3<f32>; CUBE_VERTEX_COUNT] {
    vertices.map(|v| apply_matrix(&v, matrix))
}

/// Transform each vertex independently (scale, rotate, translate)
pub fn transform_cube(
    vertices: &[Point3<f32>; CUBE_VERTEX_COUNT],
    transform: &Transform,
) -> [Point3<f32>; CUBE_VERTEX_COUNT] {
    vertices.map(|v| transform.apply(&v))
}

/// World-space cube: the model vertices placed by `transform`
pub fn cube_world(transform: &Transform) -> [Point3<f32>; CUBE_VERTEX_COUNT] {
    transform_cube(&cube_vertices(), transform)
}
