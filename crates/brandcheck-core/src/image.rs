//! Borrowed and owned pixel buffers.
//!
//! Every analyzer works on canonical **RGB** (red-first) pixels. Buffers that
//! arrive blue-first are described with [`ChannelOrder::Bgr`] and converted
//! once at the boundary via [`RgbImageView::to_canonical_rgb`].

use serde::{Deserialize, Serialize};

use crate::Rgb;

/// Order of the three interleaved channels in a raw pixel buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    /// Red first (`image`, PIL, browsers). Canonical.
    #[default]
    Rgb,
    /// Blue first (OpenCV-style capture pipelines).
    Bgr,
}

/// Errors raised when a pixel buffer does not describe a usable image.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has zero size (width={width}, height={height})")]
    Empty { width: usize, height: usize },

    #[error("invalid pixel buffer length (expected {expected} bytes, got {got})")]
    BufferLength { expected: usize, got: usize },

    #[error("image dimensions overflow (width={width}, height={height})")]
    Overflow { width: usize, height: usize },
}

/// Borrowed view over a row-major, 3-channel, 8-bit image.
#[derive(Clone, Copy, Debug)]
pub struct RgbImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h*3
    pub order: ChannelOrder,
}

impl<'a> RgbImageView<'a> {
    pub fn new(width: usize, height: usize, data: &'a [u8], order: ChannelOrder) -> Self {
        Self {
            width,
            height,
            data,
            order,
        }
    }

    /// Check that the view is non-empty and the buffer length matches `w*h*3`.
    pub fn validate(&self) -> Result<(), ImageError> {
        if self.width == 0 || self.height == 0 {
            return Err(ImageError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(3))
            .ok_or(ImageError::Overflow {
                width: self.width,
                height: self.height,
            })?;
        if self.data.len() != expected {
            return Err(ImageError::BufferLength {
                expected,
                got: self.data.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Copy the view into an owned image in canonical RGB order.
    pub fn to_canonical_rgb(&self) -> Result<RgbImage, ImageError> {
        self.validate()?;
        let data = match self.order {
            ChannelOrder::Rgb => self.data.to_vec(),
            ChannelOrder::Bgr => self
                .data
                .chunks_exact(3)
                .flat_map(|px| [px[2], px[1], px[0]])
                .collect(),
        };
        Ok(RgbImage {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Owned image, always in canonical RGB order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl RgbImage {
    /// Build an image from a raw RGB buffer.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        RgbImageView::new(width, height, &data, ChannelOrder::Rgb).validate()?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image of the given size filled with one color.
    pub fn filled(width: usize, height: usize, color: Rgb) -> Self {
        let data = std::iter::repeat(color.to_array())
            .take(width * height)
            .flatten()
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    pub fn view(&self) -> RgbImageView<'_> {
        RgbImageView::new(self.width, self.height, &self.data, ChannelOrder::Rgb)
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let i = (y * self.width + x) * 3;
        Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let i = (y * self.width + x) * 3;
        self.data[i..i + 3].copy_from_slice(&color.to_array());
    }

    /// Iterate pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.data
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
    }

    /// Single-channel intensity using the ITU-R BT.601 luma weights.
    pub fn to_gray(&self) -> GrayImage {
        let data = self
            .data
            .chunks_exact(3)
            .map(|px| {
                let y = 299 * px[0] as u32 + 587 * px[1] as u32 + 114 * px[2] as u32;
                ((y + 500) / 1000) as u8
            })
            .collect();
        GrayImage {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct GrayImageView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8], // row-major, len = w*h
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn view(&self) -> GrayImageView<'_> {
        GrayImageView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }
}

impl GrayImageView<'_> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }
}
