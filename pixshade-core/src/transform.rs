//! 3D transformation matrices and the scale/rotate/translate composite
use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};

use crate::error::{Error, Result};

/// Create a translation matrix: identity with the last column set to `t`
pub fn translation(t: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(t)
}

/// Create a diagonal scale matrix
pub fn scaling(s: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_nonuniform_scaling(s)
}

/// Create a rotation matrix of `angle` radians about `axis`.
///
/// The axis is normalized before use. A zero-length or non-finite axis is
/// rejected with [`Error::InvalidArgument`].
pub fn rotation(axis: &Vector3<f32>, angle: f32) -> Result<Matrix4<f32>> {
    Ok(AxisAngle::new(*axis, angle)?.matrix())
}

/// Multiply `m` by the homogeneous point `(x, y, z, 1)` and keep `(x, y, z)`.
///
/// W is discarded and no perspective divide happens. That is exact for affine
/// matrices (translation, rotation, scaling, view, viewport) but only an
/// approximation after a perspective projection, where the clip coordinates
/// would normally be divided by W. Callers that want the divide use
/// [`crate::projection::Pipeline`] with [`crate::projection::HomogeneousDivide::Perspective`].
pub fn apply_matrix(point: &Point3<f32>, m: &Matrix4<f32>) -> Point3<f32> {
    let v = m * point.to_homogeneous();
    Point3::new(v.x, v.y, v.z)
}

/// Apply scale, then rotation, then translation to `point`
pub fn transform(
    point: &Point3<f32>,
    scale: &Vector3<f32>,
    rotation: &AxisAngle,
    translate: &Vector3<f32>,
) -> Point3<f32> {
    let scaled = apply_matrix(point, &scaling(scale));
    let rotated = apply_matrix(&scaled, &rotation.matrix());
    apply_matrix(&rotated, &translation(translate))
}

/// Rotation about a unit axis (angle in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisAngle {
    axis: Unit<Vector3<f32>>,
    pub angle: f32,
}

impl AxisAngle {
    pub fn new(axis: Vector3<f32>, angle: f32) -> Result<Self> {
        if !axis.iter().all(|c| c.is_finite()) {
            return Err(Error::invalid(format!("rotation axis {:?} is not finite", axis)));
        }
        if !angle.is_finite() {
            return Err(Error::invalid(format!("rotation angle {} is not finite", angle)));
        }
        let axis = Unit::try_new(axis, f32::EPSILON)
            .ok_or_else(|| Error::invalid("rotation axis has zero length"))?;
        Ok(Self { axis, angle })
    }

    /// Zero rotation about +Y
    pub fn identity() -> Self {
        Self {
            axis: Vector3::y_axis(),
            angle: 0.0,
        }
    }

    pub fn axis(&self) -> Vector3<f32> {
        self.axis.into_inner()
    }

    /// Same axis, different angle
    pub fn with_angle(self, angle: f32) -> Self {
        Self { angle, ..self }
    }

    /// Rotate by a delta amount (in radians)
    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Rotation3::from_axis_angle(&self.axis, self.angle).to_homogeneous()
    }
}

impl Default for AxisAngle {
    fn default() -> Self {
        Self::identity()
    }
}

/// Model transform applied in the fixed order scale, rotate, translate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale: Vector3<f32>,
    pub rotation: AxisAngle,
    pub translation: Vector3<f32>,
}

impl Transform {
    pub fn new(scale: Vector3<f32>, rotation: AxisAngle, translation: Vector3<f32>) -> Self {
        Self {
            scale,
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::repeat(1.0), AxisAngle::identity(), Vector3::zeros())
    }

    /// Transform a point with three sequential matrix applications
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        transform(point, &self.scale, &self.rotation, &self.translation)
    }

    /// The composed `T * R * S` matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        translation(&self.translation) * self.rotation.matrix() * scaling(&self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
