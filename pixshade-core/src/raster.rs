//! Point rasterization: which pixel cell a projected point covers
use nalgebra::{Point3, Vector2};

use crate::geometry::CUBE_VERTEX_COUNT;

/// True when `screen` lies in the closed unit cell containing `pixel`.
///
/// The cell is `[floor(x), floor(x) + 1] x [floor(y), floor(y) + 1]`; both
/// edges are inclusive, so a coordinate on a shared edge belongs to two cells.
pub fn point_in_pixel(screen: &Vector2<f32>, pixel: &Vector2<f32>) -> bool {
    let x_min = pixel.x.floor();
    let y_min = pixel.y.floor();
    let x_max = x_min + 1.0;
    let y_max = y_min + 1.0;

    screen.x >= x_min && screen.x <= x_max && screen.y >= y_min && screen.y <= y_max
}

/// True when any projected vertex's pixel cell contains `screen`
pub fn cube_visible_at(screen: &Vector2<f32>, projected: &[Point3<f32>; CUBE_VERTEX_COUNT]) -> bool {
    projected
        .iter()
        .any(|v| point_in_pixel(screen, &Vector2::new(v.x, v.y)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_inside_cell() {
        assert!(point_in_pixel(&Vector2::new(3.5, 2.5), &Vector2::new(3.0, 2.0)));
        assert!(point_in_pixel(&Vector2::new(3.5, 2.5), &Vector2::new(3.9, 2.1)));
    }

    #[test]
    fn test_cell_edges_are_inclusive() {
        let pixel = Vector2::new(3.0, 2.0);
        assert!(point_in_pixel(&Vector2::new(4.0, 2.0), &pixel));
        assert!(point_in_pixel(&Vector2::new(3.0, 3.0), &pixel));
        assert!(!point_in_pixel(&Vector2::new(4.01, 2.5), &pixel));
        assert!(!point_in_pixel(&Vector2::new(3.5, 1.99), &pixel));
    }

    #[test]
    fn test_negative_pixel_floors_down() {
        assert!(point_in_pixel(&Vector2::new(-1.5, -0.5), &Vector2::new(-1.2, -0.2)));
        assert!(!point_in_pixel(&Vector2::new(-0.5, -0.5), &Vector2::new(-1.2, -0.2)));
    }

    #[test]
    fn test_cube_visible_at_any_vertex() {
        let mut projected = [Point3::new(-50.0, -50.0, 0.0); 8];
        projected[6] = Point3::new(10.2, 20.7, 0.3);
        assert!(cube_visible_at(&Vector2::new(10.5, 20.5), &projected));
        assert!(!cube_visible_at(&Vector2::new(12.5, 20.5), &projected));
    }
}
