//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of
//! a GPU texture, and [`DecodedImage`] for the CPU half of loading one.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glow::HasContext;
use image::DynamicImage;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("unsupported channel count {0}, expected 1 to 4")]
    UnsupportedChannels(u32),
    #[error("pixel data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("GL object creation failed: {0}")]
    Gl(String),
}

/// GPU pixel format chosen from the channel count of the source data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Red,
    Rg,
    Rgb,
    Rgba,
}

impl TextureFormat {
    pub fn from_channels(channels: u32) -> Result<Self, TextureError> {
        match channels {
            1 => Ok(Self::Red),
            2 => Ok(Self::Rg),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(TextureError::UnsupportedChannels(n)),
        }
    }

    /// Picks the format for `channels` and checks that `len` bytes cover a
    /// `width` x `height` image.
    pub fn for_pixels(width: u32, height: u32, channels: u32, len: usize) -> Result<Self, TextureError> {
        let format = Self::from_channels(channels)?;
        let expected = width as usize * height as usize * channels as usize;
        if len != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: len,
            });
        }
        Ok(format)
    }

    pub fn channels(self) -> u32 {
        match self {
            Self::Red => 1,
            Self::Rg => 2,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Client-side pixel format passed to `glTexImage2D`.
    pub fn gl_format(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::Rg => glow::RG,
            Self::Rgb => glow::RGB,
            Self::Rgba => glow::RGBA,
        }
    }

    /// Sized internal format with 8 bits per channel.
    pub fn gl_internal_format(self) -> u32 {
        match self {
            Self::Red => glow::R8,
            Self::Rg => glow::RG8,
            Self::Rgb => glow::RGB8,
            Self::Rgba => glow::RGBA8,
        }
    }
}

/// Image pixels decoded on the CPU, rows ordered bottom to top.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Decodes the image at `path` and flips it to match GL's V axis.
    pub fn open(path: &Path) -> Result<Self, TextureError> {
        let image = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_dynamic(image.flipv()))
    }

    /// Keeps the image's channel count, narrowing to 8 bits per channel.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, pixels) = match image.color().channel_count() {
            1 => (1, image.into_luma8().into_raw()),
            2 => (2, image.into_luma_alpha8().into_raw()),
            3 => (3, image.into_rgb8().into_raw()),
            _ => (4, image.into_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// An opaque RGB checkerboard, `size` pixels square with `cell`-pixel squares.
    pub fn checkerboard(size: u32, cell: u32, light: [u8; 3], dark: [u8; 3]) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 3);
        for y in 0..size {
            for x in 0..size {
                let color = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
                pixels.extend_from_slice(&color);
            }
        }
        Self {
            width: size,
            height: size,
            channels: 3,
            pixels,
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: Option<glow::Texture>,
    width: u32,
    height: u32,
    channels: u32,
}

impl Texture {
    /// Uploads tightly packed 8-bit pixels with 1 to 4 channels.
    pub fn from_pixels(
        gl: &Arc<glow::Context>,
        width: u32,
        height: u32,
        channels: u32,
        pixels: &[u8],
    ) -> Result<Self, TextureError> {
        let format = TextureFormat::for_pixels(width, height, channels, pixels.len())?;
        unsafe {
            let texture = gl.create_texture().map_err(TextureError::Gl)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.gl_internal_format() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: Some(texture),
                width,
                height,
                channels,
            })
        }
    }

    pub fn from_image(gl: &Arc<glow::Context>, image: &DecodedImage) -> Result<Self, TextureError> {
        Self::from_pixels(gl, image.width, image.height, image.channels, &image.pixels)
    }

    /// Decodes the image at `path` and uploads it.
    pub fn load(gl: &Arc<glow::Context>, path: &Path) -> Result<Self, TextureError> {
        let image = DecodedImage::open(path)?;
        log::info!(
            "Loaded {:?}: {}x{}, {} channel(s)",
            path,
            image.width,
            image.height,
            image.channels
        );
        Self::from_image(gl, &image)
    }

    /// Releases the GPU texture and zeroes the handle and metadata.
    /// Freeing twice is a no-op.
    pub fn free(&mut self) {
        if let Some(id) = self.id.take() {
            unsafe {
                self.gl.delete_texture(id);
            }
        }
        self.width = 0;
        self.height = 0;
        self.channels = 0;
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, self.id);
        }
    }

    pub fn handle(&self) -> Option<glow::Texture> {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.id.is_some()
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.free();
    }
}
