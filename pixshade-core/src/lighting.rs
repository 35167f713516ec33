//! 2D light falloff, circle occluders and ray-cast shadows
use nalgebra::Vector2;

use crate::scene::Color;

/// Quartic ease-in/ease-out on [0, 1]
pub fn ease_in_out_quart(t: f32) -> f32 {
    if t < 0.5 {
        8.0 * t.powi(4)
    } else {
        1.0 - 8.0 * (t - 1.0).powi(4)
    }
}

/// Triangle wave over a loop of `duration` seconds: 0 at the loop start and
/// end, 1 at the midpoint.
pub fn loop_cursor(time: f32, duration: f32) -> f32 {
    let half = duration / 2.0;
    let t = time.rem_euclid(duration);
    let rising = if t < half { t } else { duration - t };
    2.0 * rising / duration
}

/// Point light with a hot core and an ambient halo.
///
/// Inside `radius` the light adds a glow that grows towards the centre plus a
/// flat ambient term of `intensity / 10`. Outside, only the ambient term
/// remains, divided by `(distance / radius) ^ falloff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSpot {
    pub center: Vector2<f32>,
    pub intensity: f32,
    pub power: f32,
    pub radius: f32,
    pub color: Color,
    pub falloff: f32,
}

impl LightSpot {
    pub fn shade(&self, frag: &Vector2<f32>) -> Color {
        let p = self.power / self.radius;
        let distance = (frag - self.center).norm();
        let ratio = distance / self.radius;
        // Floored so the exact centre stays finite
        let r = ratio.clamp(f32::EPSILON, 1.0);
        let glow = (1.0 - r) / r * p;

        let base = self.intensity / 10.0;
        let ambient = if distance < self.radius {
            base
        } else {
            base / ratio.powf(self.falloff)
        };

        self.color * glow + self.color * ambient
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vector2<f32>,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vector2<f32>, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, point: &Vector2<f32>) -> bool {
        (point - self.center).norm() <= self.radius
    }

    /// Whether the segment `from -> to` touches the circle boundary
    pub fn blocks(&self, from: &Vector2<f32>, to: &Vector2<f32>) -> bool {
        let ray = from - to;
        let to_center = self.center - from;

        let a = ray.dot(&ray);
        let b = (to_center * 2.0).dot(&ray);
        let c = to_center.dot(&to_center) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return false;
        }
        let root = discriminant.sqrt();
        let t1 = (-b - root) / (2.0 * a);
        let t2 = (-b + root) / (2.0 * a);

        // NaN (frag on top of the light) falls through both ranges
        (0.0..=1.0).contains(&t1) || (0.0..=1.0).contains(&t2)
    }
}

/// Darken `color` when `occluder` sits between `light` and `frag`.
///
/// The shadow fades with the distance travelled past the occluder, scaled by
/// the light's reach `light_radius`.
pub fn shadow(
    frag: &Vector2<f32>,
    light: &Vector2<f32>,
    occluder: &Circle,
    color: Color,
    light_radius: f32,
) -> Color {
    if !occluder.blocks(light, frag) {
        return color;
    }

    let distance = (frag - light).norm();
    let to_occluder = (light - occluder.center).norm();
    let past = distance - to_occluder;
    let attenuation = past / distance;
    let reach = light_radius - to_occluder;

    // min(max(x, 0), att): an inverted range must not panic like f32::clamp
    let fade = (attenuation * (past / reach))
        .powi(2)
        .max(0.0)
        .min(attenuation);

    color * (fade * attenuation.powi(2))
}
