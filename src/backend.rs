//! GPU-facing collaborators: texture loading and textured-quad drawing.
//!
//! The map core only ever sees [`TextureId`] handles. [`MacroquadBackend`]
//! owns the real textures; [`HeadlessTextures`] and [`QuadRecorder`] stand in
//! when there is no window (tools, tests).

use macroquad::prelude::*;
use std::path::PathBuf;
use tracing::warn;

/// Handle to a texture owned by a [`TextureLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

pub trait TextureLoader {
    /// Loads `<base>.<extension>`. `None` leaves the tileset untextured.
    fn load_texture(&mut self, base: &str, extension: &str) -> Option<TextureId>;
}

/// One tile draw, in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileQuad {
    pub texture: TextureId,
    /// Top-left corner
    pub position: Vec2,
    pub scale: f32,
    /// Atlas source rectangle; `None` samples the whole texture
    pub sub_rect: Option<Rect>,
    pub flip_x: bool,
    pub flip_y: bool,
    pub opacity: f32,
}

pub trait DrawTarget {
    fn draw_textured_quad(&mut self, quad: &TileQuad);
}

/// Loads textures from disk and draws them with macroquad. Needs a live GL context.
pub struct MacroquadBackend {
    root: PathBuf,
    textures: Vec<Texture2D>,
}

impl MacroquadBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            textures: Vec::new(),
        }
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture2D> {
        self.textures.get(id.0 as usize)
    }
}

impl TextureLoader for MacroquadBackend {
    fn load_texture(&mut self, base: &str, extension: &str) -> Option<TextureId> {
        let path = self.root.join(format!("{base}.{extension}"));
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Reading texture {}: {e}", path.display());
                return None;
            }
        };
        let image = match Image::from_file_with_format(&bytes, None) {
            Ok(image) => image,
            Err(e) => {
                warn!("Decoding texture {}: {e}", path.display());
                return None;
            }
        };
        let tex = Texture2D::from_image(&image);
        tex.set_filter(FilterMode::Nearest);

        let id = TextureId(self.textures.len() as u32);
        self.textures.push(tex);
        Some(id)
    }
}

impl DrawTarget for MacroquadBackend {
    fn draw_textured_quad(&mut self, quad: &TileQuad) {
        let Some(tex) = self.texture(quad.texture) else {
            return;
        };
        let size = quad
            .sub_rect
            .map(|r| r.size())
            .unwrap_or_else(|| tex.size());

        draw_texture_ex(
            tex,
            quad.position.x,
            quad.position.y,
            Color::new(1.0, 1.0, 1.0, quad.opacity),
            DrawTextureParams {
                dest_size: Some(size * quad.scale),
                source: quad.sub_rect,
                flip_x: quad.flip_x,
                flip_y: quad.flip_y,
                ..Default::default()
            },
        );
    }
}

/// Hands out texture ids without touching the GPU.
#[derive(Debug, Default)]
pub struct HeadlessTextures {
    /// `base.extension` of every load, in order; index == id
    pub loaded: Vec<String>,
}

impl TextureLoader for HeadlessTextures {
    fn load_texture(&mut self, base: &str, extension: &str) -> Option<TextureId> {
        let id = TextureId(self.loaded.len() as u32);
        self.loaded.push(format!("{base}.{extension}"));
        Some(id)
    }
}

/// Collects every quad instead of drawing it.
#[derive(Debug, Default)]
pub struct QuadRecorder {
    pub quads: Vec<TileQuad>,
}

impl DrawTarget for QuadRecorder {
    fn draw_textured_quad(&mut self, quad: &TileQuad) {
        self.quads.push(*quad);
    }
}
