//! Per-pixel programs: each scene maps a fragment coordinate to a colour
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::geometry::cube_world;
use crate::lighting::{ease_in_out_quart, loop_cursor, shadow, Circle, LightSpot};
use crate::projection::{Camera, HomogeneousDivide, Pipeline};
use crate::raster::{cube_visible_at, point_in_pixel};
use crate::transform::{AxisAngle, Transform};

/// RGBA colour, unclamped until it is written to an output buffer
pub type Color = Vector4<f32>;

/// Seconds for one full brighten/dim cycle of the lighting scenes
pub const DEFAULT_LOOP_DURATION: f32 = 25.0;

/// A program evaluated once per pixel.
///
/// `frag` is the pixel-space coordinate with the origin at the bottom-left,
/// `resolution` the target size in pixels and `time` the elapsed seconds.
pub trait Shader: Send + Sync {
    fn render_pixel(&self, frag: &Vector2<f32>, resolution: &Vector2<f32>, time: f32) -> Color;
}

/// Two pulsing lights over a dark background
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlowScene {
    pub loop_duration: f32,
}

impl Default for GlowScene {
    fn default() -> Self {
        Self {
            loop_duration: DEFAULT_LOOP_DURATION,
        }
    }
}

impl Shader for GlowScene {
    fn render_pixel(&self, frag: &Vector2<f32>, resolution: &Vector2<f32>, time: f32) -> Color {
        let pulse = ease_in_out_quart(loop_cursor(time, self.loop_duration));

        let warm = LightSpot {
            center: resolution / 4.0,
            intensity: 1.4 * pulse,
            power: 12.0 * pulse,
            radius: 600.0,
            color: Color::new(1.0, 0.2, 0.0, 1.0),
            falloff: 3.0,
        };
        let cool = LightSpot {
            center: resolution / 2.0,
            intensity: 2.4 * pulse,
            power: 15.0 * pulse,
            radius: 750.0,
            color: Color::new(0.1, 0.4, 1.0, 1.0),
            falloff: 3.0,
        };

        warm.shade(frag) + cool.shade(frag)
    }
}

/// A static light plus a moving light whose glow is shadowed by a grey disc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowScene {
    pub loop_duration: f32,
    pub light_reach: f32,
}

impl ShadowScene {
    /// Position of the moving light; it drifts diagonally up and to the right
    pub fn light_position(time: f32) -> Vector2<f32> {
        Vector2::new(35.0 * time - 1.0, 17.0 * time)
    }

    pub fn occluder(resolution: &Vector2<f32>) -> Circle {
        Circle::new(resolution / 2.0 + Vector2::repeat(30.0), 20.0)
    }
}

impl Default for ShadowScene {
    fn default() -> Self {
        Self {
            loop_duration: DEFAULT_LOOP_DURATION,
            light_reach: 320.0,
        }
    }
}

impl Shader for ShadowScene {
    fn render_pixel(&self, frag: &Vector2<f32>, resolution: &Vector2<f32>, time: f32) -> Color {
        let occluder = Self::occluder(resolution);
        if occluder.contains(frag) {
            return Color::repeat(0.5);
        }

        let pulse = 0.2 + ease_in_out_quart(loop_cursor(time, self.loop_duration)) / 2.0;

        let fixed = LightSpot {
            center: resolution / 4.0,
            intensity: pulse,
            power: 35.0 * pulse,
            radius: 85.0,
            color: Color::new(1.0, 0.2, 0.1, 1.0),
            falloff: 8.0,
        };

        let light = Self::light_position(time);
        let moving = LightSpot {
            center: light,
            intensity: 1.2 * pulse,
            power: 24.0 * pulse,
            radius: self.light_reach,
            color: Color::new(0.1, 0.4, 1.0, 1.0),
            falloff: 8.0,
        };

        fixed.shade(frag) + shadow(frag, &light, &occluder, moving.shade(frag), self.light_reach)
    }
}

/// Projects marker points (and optionally a spinning cube) through the camera pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionScene {
    pub divide: HomogeneousDivide,
    /// Placement of the cube; `None` draws only the markers
    pub cube: Option<Transform>,
    /// Cube spin in radians per second about its rotation axis
    pub spin: f32,
}

impl ProjectionScene {
    pub const ORIGIN_COLOR: Color = Vector4::new(0.0, 1.0, 0.0, 1.0);
    pub const MARKER_COLOR: Color = Vector4::new(1.0, 0.0, 0.0, 1.0);
    pub const CUBE_COLOR: Color = Vector4::new(1.0, 1.0, 1.0, 1.0);

    pub fn marker() -> Point3<f32> {
        Point3::new(2.0, 2.0, 2.0)
    }

    /// Half-unit cube at the origin, tilted about (1, 1, 0)
    pub fn default_cube() -> Transform {
        let axis = AxisAngle::new(Vector3::new(1.0, 1.0, 0.0), 0.0).unwrap_or_default();
        Transform::new(Vector3::repeat(0.5), axis, Vector3::zeros())
    }

    fn pipeline(&self, resolution: &Vector2<f32>) -> Result<Pipeline> {
        let camera = Camera::new(resolution.x, resolution.y)?;
        Ok(Pipeline::from_camera(&camera, resolution)?.with_divide(self.divide))
    }
}

impl Default for ProjectionScene {
    fn default() -> Self {
        Self {
            divide: HomogeneousDivide::Discard,
            cube: Some(Self::default_cube()),
            spin: 0.5,
        }
    }
}

impl Shader for ProjectionScene {
    fn render_pixel(&self, frag: &Vector2<f32>, resolution: &Vector2<f32>, time: f32) -> Color {
        // A degenerate target has nothing to draw
        let Ok(pipeline) = self.pipeline(resolution) else {
            return Color::zeros();
        };

        let hits = |point: &Point3<f32>| {
            pipeline
                .project(point)
                .is_some_and(|screen| point_in_pixel(frag, &screen))
        };

        if hits(&Self::marker()) {
            return Self::MARKER_COLOR;
        }
        if hits(&Point3::origin()) {
            return Self::ORIGIN_COLOR;
        }

        if let Some(placement) = self.cube {
            let mut placement = placement;
            placement.rotation.rotate(self.spin * time);
            let projected = cube_world(&placement).map(|v| match pipeline.project(&v) {
                Some(screen) => Point3::new(screen.x, screen.y, 0.0),
                // NaN never compares inside a pixel cell
                None => Point3::new(f32::NAN, f32::NAN, 0.0),
            });
            if cube_visible_at(frag, &projected) {
                return Self::CUBE_COLOR;
            }
        }

        Color::zeros()
    }
}

/// The built-in scenes, selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    Glow,
    Shadow,
    Projection,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::Glow, SceneKind::Shadow, SceneKind::Projection];

    pub fn name(&self) -> &'static str {
        match self {
            SceneKind::Glow => "glow",
            SceneKind::Shadow => "shadow",
            SceneKind::Projection => "projection",
        }
    }

    /// The scene with its default parameters
    pub fn build(&self) -> Box<dyn Shader> {
        match self {
            SceneKind::Glow => Box::new(GlowScene::default()),
            SceneKind::Shadow => Box::new(ShadowScene::default()),
            SceneKind::Projection => Box::new(ProjectionScene::default()),
        }
    }

    /// Next scene in [`SceneKind::ALL`], wrapping around
    pub fn next(&self) -> SceneKind {
        let index = Self::ALL.iter().position(|k| k == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "glow" | "light" => Ok(SceneKind::Glow),
            "shadow" | "raycast" => Ok(SceneKind::Shadow),
            "projection" | "cube" => Ok(SceneKind::Projection),
            other => Err(Error::invalid(format!(
                "unknown scene '{}' (expected glow, shadow or projection)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution() -> Vector2<f32> {
        Vector2::new(800.0, 600.0)
    }

    #[test]
    fn test_glow_is_dark_at_loop_start() {
        let scene = GlowScene::default();
        let c = scene.render_pixel(&Vector2::new(200.5, 150.5), &resolution(), 0.0);
        assert_eq!(c, Color::zeros());
    }

    #[test]
    fn test_glow_peaks_mid_loop() {
        let scene = GlowScene::default();
        let frag = Vector2::new(410.5, 300.5);
        let dim = scene.render_pixel(&frag, &resolution(), 3.0);
        let bright = scene.render_pixel(&frag, &resolution(), 12.5);
        assert!(bright.z > dim.z);
        // Blue light sits at the centre, so blue dominates there
        assert!(bright.z > bright.x);
    }

    #[test]
    fn test_shadow_scene_draws_grey_occluder() {
        let scene = ShadowScene::default();
        let center = Vector2::new(430.0, 330.0);
        assert_eq!(scene.render_pixel(&center, &resolution(), 4.0), Color::repeat(0.5));
    }

    #[test]
    fn test_shadow_scene_darkens_behind_occluder() {
        let scene = ShadowScene::default();
        let res = resolution();
        let time = 10.0;
        let light = ShadowScene::light_position(time);
        let occluder = ShadowScene::occluder(&res);
        let dir = (occluder.center - light).normalize();
        // Same distance from the light, one directly behind the disc, one beside it
        let behind = light + dir * ((occluder.center - light).norm() + 40.0);
        let side = light + Vector2::new(-dir.y, dir.x) * ((occluder.center - light).norm() + 40.0);
        let shaded = scene.render_pixel(&behind, &res, time);
        let open = scene.render_pixel(&side, &res, time);
        assert!(shaded.z < open.z);
    }

    #[test]
    fn test_projection_scene_marks_origin() {
        let scene = ProjectionScene {
            cube: None,
            ..ProjectionScene::default()
        };
        let c = scene.render_pixel(&Vector2::new(400.5, 300.5), &resolution(), 0.0);
        assert_eq!(c, ProjectionScene::ORIGIN_COLOR);
        let empty = scene.render_pixel(&Vector2::new(100.5, 100.5), &resolution(), 0.0);
        assert_eq!(empty, Color::zeros());
    }

    #[test]
    fn test_projection_scene_divide_moves_marker_on_screen() {
        let res = resolution();
        let scene = ProjectionScene {
            divide: HomogeneousDivide::Perspective,
            cube: None,
            spin: 0.0,
        };
        let camera = Camera::new(res.x, res.y).unwrap();
        let pipeline = Pipeline::from_camera(&camera, &res)
            .unwrap()
            .with_divide(HomogeneousDivide::Perspective);
        let screen = pipeline.project(&ProjectionScene::marker()).unwrap();
        let frag = Vector2::new(screen.x.floor() + 0.5, screen.y.floor() + 0.5);
        assert_eq!(scene.render_pixel(&frag, &res, 0.0), ProjectionScene::MARKER_COLOR);
    }

    #[test]
    fn test_projection_scene_draws_cube_vertex() {
        let res = resolution();
        let scene = ProjectionScene {
            spin: 0.0,
            ..ProjectionScene::default()
        };
        let pipeline = scene.pipeline(&res).unwrap();
        let vertex = cube_world(&ProjectionScene::default_cube())[3];
        let screen = pipeline.project(&vertex).unwrap();
        let frag = Vector2::new(screen.x.floor() + 0.5, screen.y.floor() + 0.5);
        assert_eq!(scene.render_pixel(&frag, &res, 0.0), ProjectionScene::CUBE_COLOR);
    }

    #[test]
    fn test_projection_scene_survives_zero_resolution() {
        let scene = ProjectionScene::default();
        let c = scene.render_pixel(&Vector2::new(0.5, 0.5), &Vector2::zeros(), 1.0);
        assert_eq!(c, Color::zeros());
    }

    #[test]
    fn test_scene_kind_parsing() {
        assert_eq!("glow".parse::<SceneKind>().unwrap(), SceneKind::Glow);
        assert_eq!(" Shadow ".parse::<SceneKind>().unwrap(), SceneKind::Shadow);
        assert_eq!("cube".parse::<SceneKind>().unwrap(), SceneKind::Projection);
        assert!(matches!(
            "plasma".parse::<SceneKind>(),
            Err(Error::InvalidArgument(_))
        ));
        for kind in SceneKind::ALL {
            assert_eq!(kind.to_string().parse::<SceneKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_scene_kind_cycles() {
        assert_eq!(SceneKind::Glow.next(), SceneKind::Shadow);
        assert_eq!(SceneKind::Projection.next(), SceneKind::Glow);
    }
}
