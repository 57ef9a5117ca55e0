// Copyright 2025 Dustin McAfee
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lossless codec for the QOI ("Quite OK Image") format.
//!
//! QOI stores raw 8-bit RGB(A) pixel data using per-pixel delta prediction,
//! a 64-slot recent-color cache, and run-length compression for repeated
//! pixels. Encoding and decoding are bit-exact inverses: for any valid pixel
//! buffer, `decode(encode(buffer)) == buffer`.
//!
//! # Byte stream layout (big-endian)
//!
//! ```text
//! offset  size  field
//! 0       4     magic "qoif"
//! 4       4     width  (u32 BE, > 0)
//! 8       4     height (u32 BE, > 0)
//! 12      1     channels (3 = RGB, 4 = RGBA)
//! 13      1     colorspace (0 = sRGB, 1 = linear; opaque to the codec)
//! 14      ...   chunk stream
//! end-8   8     end marker 00 00 00 00 00 00 00 01
//! ```
//!
//! # Chunk types
//!
//! Each chunk is self-delimiting, identified by its leading tag bits:
//!
//! | Chunk | Tag        | Size    | Payload                                    |
//! |-------|------------|---------|--------------------------------------------|
//! | INDEX | `00nnnnnn` | 1 byte  | 6-bit color cache slot                     |
//! | DIFF  | `01rrggbb` | 1 byte  | 3x2-bit channel deltas, bias +2            |
//! | LUMA  | `10gggggg` | 2 bytes | 6-bit dg bias 32; 4+4 bit dr-dg/db-dg bias 8 |
//! | RUN   | `11nnnnnn` | 1 byte  | run length - 1, max 62                     |
//! | RGB   | `11111110` | 4 bytes | raw r, g, b                                |
//! | RGBA  | `11111111` | 5 bytes | raw r, g, b, a                             |
//!
//! The 8-bit RGB/RGBA tags are checked before the 2-bit RUN tag, so run
//! lengths 63 and 64 cannot be represented (hence the cap at 62).
//!
//! # Example
//!
//! ```
//! use qoi_codec::{decode, encode, Channels, COLORSPACE_SRGB};
//!
//! let pixels = vec![10, 10, 10, 11, 11, 11]; // 2x1 RGB
//! let stream = encode(&pixels, 2, 1, Channels::Rgb, COLORSPACE_SRGB).unwrap();
//! let image = decode(&stream).unwrap();
//! assert_eq!(image.pixels, pixels);
//! assert_eq!((image.width, image.height), (2, 1));
//! ```

pub mod decode;
pub mod encode;
pub mod error;
pub mod pixel;

pub use decode::{decode, DecodedImage};
pub use encode::encode;
pub use error::{DecodeError, EncodeError};
pub use pixel::Pixel;

use bytes::{BufMut, BytesMut};

use crate::error::DecodeError as Error;

/// Magic bytes identifying a QOI stream.
pub const QOI_MAGIC: [u8; 4] = *b"qoif";

/// Size of the fixed stream header in bytes.
pub const HEADER_SIZE: usize = 14;

/// Fixed end-of-stream marker appended after the last chunk.
pub const QOI_PADDING: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

/// Upper bound on `width * height`. The worst case is 5 bytes per pixel,
/// so this keeps any well-formed stream safely under 2 GB.
pub const MAX_PIXELS: u64 = 400_000_000;

/// Number of slots in the recent-color cache.
pub const CACHE_SIZE: usize = 64;

// Chunk tag constants. OP_RGB/OP_RGBA occupy the top of the RUN tag range
// and must be matched before the two-bit tags.
pub const OP_INDEX: u8 = 0x00;
pub const OP_DIFF: u8 = 0x40;
pub const OP_LUMA: u8 = 0x80;
pub const OP_RUN: u8 = 0xC0;
pub const OP_RGB: u8 = 0xFE;
pub const OP_RGBA: u8 = 0xFF;
/// Mask selecting the two tag bits of a chunk byte.
pub const TAG_MASK: u8 = 0xC0;

/// Colorspace byte: sRGB with linear alpha.
pub const COLORSPACE_SRGB: u8 = 0;
/// Colorspace byte: all channels linear.
pub const COLORSPACE_LINEAR: u8 = 1;

/// Number of 8-bit channels per pixel.
///
/// The codec only branches on this to decide whether an alpha byte is
/// present in the raw buffer; 3-channel images carry an implicit alpha
/// of 255 for every pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    /// Bytes per pixel in the raw buffer.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        self as usize
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            3 => Some(Channels::Rgb),
            4 => Some(Channels::Rgba),
            _ => None,
        }
    }
}

/// Parsed QOI stream header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    /// Opaque passthrough value; the codec never interprets it.
    pub colorspace: u8,
}

impl Header {
    /// Serializes the header into `buf` in wire order.
    pub fn write_to(&self, buf: &mut BytesMut) {
        buf.put_slice(&QOI_MAGIC);
        buf.put_u32(self.width);
        buf.put_u32(self.height);
        buf.put_u8(self.channels as u8);
        buf.put_u8(self.colorspace);
    }

    /// Parses and validates the fixed 14-byte header at the start of `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is shorter than the header, the magic
    /// bytes are wrong, a dimension is zero, the pixel count exceeds
    /// [`MAX_PIXELS`], or the channel count is not 3 or 4.
    pub fn parse(data: &[u8]) -> Result<Self, Error> {
        if data.len() < HEADER_SIZE {
            return Err(Error::TruncatedStream { offset: data.len() });
        }
        if data[0..4] != QOI_MAGIC {
            return Err(Error::BadMagic([data[0], data[1], data[2], data[3]]));
        }
        let width = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        let height = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
        if width == 0 || height == 0 || u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(Error::InvalidDimensions { width, height });
        }
        let channels =
            Channels::from_u8(data[12]).ok_or(Error::InvalidChannelCount(data[12]))?;
        Ok(Header {
            width,
            height,
            channels,
            colorspace: data[13],
        })
    }
}
