//! Camera, projection and viewport matrices, and the world-to-screen pipeline
use approx::relative_eq;
use nalgebra::{Matrix4, Point3, Vector2, Vector3};
use std::f32::consts::PI;

use crate::error::{Error, Result};
use crate::transform::apply_matrix;

/// Minimum |W| accepted by the perspective divide
const MIN_CLIP_W: f32 = 1e-6;

/// What happens to the clip-space W component between projection and viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomogeneousDivide {
    /// Drop W without dividing, exactly like [`apply_matrix`]
    #[default]
    Discard,
    /// Divide clip coordinates by W before the viewport transform
    Perspective,
}

/// Right-handed look-at matrix.
///
/// Rows are the camera right, up and back axes; the translation moves
/// `origin` to the camera-space origin.
pub fn view(origin: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Result<Matrix4<f32>> {
    if !(origin.iter().chain(target.iter()).chain(up.iter())).all(|c| c.is_finite()) {
        return Err(Error::invalid("view parameters must be finite"));
    }
    let direction = target - origin;
    if direction.norm() <= f32::EPSILON {
        return Err(Error::invalid("view origin and target coincide"));
    }
    if up.norm() <= f32::EPSILON {
        return Err(Error::invalid("view up vector has zero length"));
    }
    if direction.normalize().cross(&up.normalize()).norm() <= 1e-6 {
        return Err(Error::invalid("view up vector is parallel to the view direction"));
    }

    Ok(Matrix4::look_at_rh(origin, target, up))
}

/// Perspective projection matrix (OpenGL clip conventions, field of view in radians)
pub fn perspective_projection(
    fov: f32,
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
) -> Result<Matrix4<f32>> {
    if !(fov.is_finite() && fov > 0.0 && fov < PI) {
        return Err(Error::invalid(format!(
            "field of view {} rad is outside (0, pi)",
            fov
        )));
    }
    if !(aspect_ratio.is_finite() && aspect_ratio > f32::EPSILON) {
        return Err(Error::invalid(format!(
            "aspect ratio {} must be positive",
            aspect_ratio
        )));
    }
    if !(z_near.is_finite() && z_far.is_finite()) {
        return Err(Error::invalid("clip planes must be finite"));
    }
    // new_perspective asserts the planes differ by a relative tolerance too
    if relative_eq!(z_far, z_near) {
        return Err(Error::invalid(format!(
            "near and far planes coincide at {}",
            z_near
        )));
    }

    Ok(Matrix4::new_perspective(aspect_ratio, fov, z_near, z_far))
}

/// Map normalized device coordinates to pixels, offset by `origin`
#[rustfmt::skip]
pub fn viewport(origin: &Vector2<f32>, width: f32, height: f32, near: f32, far: f32) -> Matrix4<f32> {
    let half_width = width / 2.0;
    let half_height = height / 2.0;

    Matrix4::new(
        half_width, 0.0, 0.0, origin.x + half_width,
        0.0, half_height, 0.0, origin.y + half_height,
        0.0, 0.0, (far - near) / 2.0, (near + far) / 2.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Map a world-space point to pixel coordinates.
///
/// Applies `view`, `projection` and `viewport` in that order, each through
/// [`apply_matrix`], so W is dropped after every stage. The caller is
/// responsible for passing the matrices in the right order.
pub fn world_to_screen(
    point: &Point3<f32>,
    view: &Matrix4<f32>,
    projection: &Matrix4<f32>,
    viewport: &Matrix4<f32>,
) -> Vector2<f32> {
    let eye = apply_matrix(point, view);
    let clip = apply_matrix(&eye, projection);
    let screen = apply_matrix(&clip, viewport);
    Vector2::new(screen.x, screen.y)
}

/// Camera configuration for projecting a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Camera 180 units in front of the origin, looking at it with a 80 degree field of view
    pub fn new(width: f32, height: f32) -> Result<Self> {
        let camera = Self {
            position: Point3::new(0.0, 0.0, -180.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: 80.0,
            aspect: width / height,
            near: 0.1,
            far: 600.0,
        };
        camera.validate()?;
        Ok(camera)
    }

    pub fn looking_at(mut self, position: Point3<f32>, target: Point3<f32>) -> Self {
        self.position = position;
        self.target = target;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees;
        self
    }

    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn fov_radians(&self) -> f32 {
        self.fov.to_radians()
    }

    /// Check that both matrices can be built from this camera
    pub fn validate(&self) -> Result<()> {
        self.view_matrix()?;
        self.projection_matrix()?;
        Ok(())
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Result<Matrix4<f32>> {
        view(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Result<Matrix4<f32>> {
        perspective_projection(self.fov_radians(), self.aspect, self.near, self.far)
    }
}

/// View, projection and viewport matrices applied as one unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipeline {
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub viewport: Matrix4<f32>,
    pub divide: HomogeneousDivide,
}

impl Pipeline {
    pub fn new(view: Matrix4<f32>, projection: Matrix4<f32>, viewport: Matrix4<f32>) -> Self {
        Self {
            view,
            projection,
            viewport,
            divide: HomogeneousDivide::Discard,
        }
    }

    /// Pipeline for `camera` rendering into a `resolution`-sized target with depth range [0, 1]
    pub fn from_camera(camera: &Camera, resolution: &Vector2<f32>) -> Result<Self> {
        if !(resolution.x > 0.0 && resolution.y > 0.0) {
            return Err(Error::invalid(format!(
                "resolution {}x{} must be positive",
                resolution.x, resolution.y
            )));
        }
        Ok(Self::new(
            camera.view_matrix()?,
            camera.projection_matrix()?,
            viewport(&Vector2::zeros(), resolution.x, resolution.y, 0.0, 1.0),
        ))
    }

    pub fn with_divide(mut self, divide: HomogeneousDivide) -> Self {
        self.divide = divide;
        self
    }

    /// `viewport * projection * view`
    pub fn composed(&self) -> Matrix4<f32> {
        self.viewport * self.projection * self.view
    }

    /// Project a world-space point to pixel coordinates.
    ///
    /// Returns `None` only with [`HomogeneousDivide::Perspective`] when the
    /// point has (almost) zero clip-space W.
    pub fn project(&self, point: &Point3<f32>) -> Option<Vector2<f32>> {
        match self.divide {
            HomogeneousDivide::Discard => Some(world_to_screen(
                point,
                &self.view,
                &self.projection,
                &self.viewport,
            )),
            HomogeneousDivide::Perspective => {
                let eye = apply_matrix(point, &self.view);
                let clip = self.projection * eye.to_homogeneous();
                if clip.w.abs() < MIN_CLIP_W {
                    return None;
                }
                let ndc = Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w);
                let screen = apply_matrix(&ndc, &self.viewport);
                Some(Vector2::new(screen.x, screen.y))
            }
        }
    }
}
