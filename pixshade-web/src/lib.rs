//! pixshade Web - WASM host that paints scenes on an HTML canvas
//!
//! Each call to `render` evaluates the scene once per canvas pixel and
//! uploads the result with `putImageData`.
//!
//! Diagnostics go through the `log` facade. This crate installs no logger;
//! the embedding page registers one (e.g. a console logger) to see them.

use nalgebra::Vector2;
use pixshade_core::{Frame, SceneKind, Shader};
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Render `shader` into a `width` x `height` RGBA buffer, one sample per pixel
pub fn render_pixels(
    shader: &dyn Shader,
    width: u32,
    height: u32,
    time: f32,
) -> pixshade_core::Result<Vec<u8>> {
    let resolution = Vector2::new(width as f32, height as f32);
    let frame = Frame::render(shader, width as usize, height as usize, &resolution, time)?;
    Ok(frame.to_rgba8())
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub struct WebRenderer {
    scene: SceneKind,
    shader: Box<dyn Shader>,
    width: u32,
    height: u32,
    context: Option<CanvasRenderingContext2d>,
}

#[wasm_bindgen]
impl WebRenderer {
    #[wasm_bindgen(constructor)]
    pub fn new(scene: &str, width: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let scene: SceneKind = scene.parse().map_err(js_error)?;
        Ok(WebRenderer {
            scene,
            shader: scene.build(),
            width,
            height,
            context: None,
        })
    }

    /// Bind to the canvas with id `canvas_id` and size it to the renderer
    pub fn attach(&mut self, canvas_id: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| js_error("no document available"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| js_error(format!("no element with id '{}'", canvas_id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_width(self.width);
        canvas.set_height(self.height);

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| js_error("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        log::debug!("attached to canvas '{}' ({}x{})", canvas_id, self.width, self.height);
        self.context = Some(context);
        Ok(())
    }

    /// Render a frame at `time` seconds onto the attached canvas
    pub fn render(&self, time: f32) -> Result<(), JsValue> {
        let context = self
            .context
            .as_ref()
            .ok_or_else(|| js_error("renderer is not attached to a canvas"))?;
        let pixels = self.pixels(time)?;
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(&pixels[..]),
            self.width,
            self.height,
        )?;
        context.put_image_data(&image, 0.0, 0.0)
    }

    /// RGBA bytes of a frame at `time`, row 0 at the top
    pub fn pixels(&self, time: f32) -> Result<Vec<u8>, JsValue> {
        render_pixels(self.shader.as_ref(), self.width, self.height, time).map_err(js_error)
    }

    pub fn set_scene(&mut self, name: &str) -> Result<(), JsValue> {
        let scene: SceneKind = name.parse().map_err(js_error)?;
        self.scene = scene;
        self.shader = scene.build();
        Ok(())
    }

    pub fn scene(&self) -> String {
        self.scene.to_string()
    }

    /// Change the output size; an attached canvas is resized on the next `attach`
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
