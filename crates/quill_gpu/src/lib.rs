//! Quill GPU Binding
//!
//! Draws text laid out by `quill_text` with wgpu.
//!
//! A [`TextRenderer`] owns the text pipeline. Each font's atlas is uploaded
//! once with [`TextRenderer::upload_font`], and every [`TextRenderer::draw`]
//! call renders one string with a single draw call, blending over whatever
//! the target already holds.
//!
//! [`HeadlessTarget`] and [`create_headless_device`] render without a window,
//! which is what the CLI and the tests use.

pub mod headless;
pub mod renderer;
pub mod shaders;


pub use headless::{create_headless_device, request_headless_device, HeadlessTarget, HEADLESS_FORMAT};
pub use renderer::{
    vertex_layout, GpuFont, RendererError, TextRenderer, TextRendererConfig, TextUniforms,
};
pub use shaders::TEXT_SHADER;
