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

//! QOI decoder.
//!
//! Walks the chunk stream one tag byte at a time, replicating the
//! encoder's previous-pixel and recent-color cache state, and writes
//! decoded pixels into the output buffer in row-major order until it is
//! exactly full. Every read is bounds-checked against the end of the
//! chunk region (the stream minus the 8-byte end marker); a read past it
//! is a truncation error, never an out-of-range access.

use crate::error::DecodeError;
use crate::pixel::{ColorCache, Pixel};
use crate::{
    Channels, Header, HEADER_SIZE, OP_DIFF, OP_INDEX, OP_LUMA, OP_RGB, OP_RGBA, OP_RUN,
    QOI_PADDING, TAG_MASK,
};

/// A decoded image: the raw pixel buffer plus the shape recovered from the
/// stream header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Tightly packed, row-major channel bytes
    /// (`width * height * channels` of them).
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    /// The header's colorspace byte, passed through verbatim.
    pub colorspace: u8,
}

/// Decodes a QOI byte stream into a raw pixel buffer.
///
/// # Errors
///
/// Fails eagerly with the specific violated condition: bad magic, invalid
/// dimensions or channel count, a stream truncated mid-header or mid-chunk,
/// a run chunk overflowing the declared pixel count, or a missing end
/// marker. No pixel buffer is returned on any failure.
pub fn decode(data: &[u8]) -> Result<DecodedImage, DecodeError> {
    if data.len() < HEADER_SIZE + QOI_PADDING.len() {
        return Err(DecodeError::TruncatedStream { offset: data.len() });
    }
    let header = Header::parse(data)?;
    let bpp = header.channels.bytes_per_pixel();
    let pixel_count = header.width as usize * header.height as usize;
    let mut pixels = vec![0u8; pixel_count * bpp];

    // Chunks may not extend into the end marker.
    let chunks_end = data.len() - QOI_PADDING.len();
    let mut pos = HEADER_SIZE;
    let mut cache = ColorCache::new();
    let mut px = Pixel::OPAQUE_BLACK;
    let mut written = 0;

    while written < pixel_count {
        let b1 = read_bytes::<1>(data, &mut pos, chunks_end)?[0];

        if b1 == OP_RGB {
            let [r, g, b] = read_bytes::<3>(data, &mut pos, chunks_end)?;
            px.r = r;
            px.g = g;
            px.b = b;
        } else if b1 == OP_RGBA {
            let [r, g, b, a] = read_bytes::<4>(data, &mut pos, chunks_end)?;
            px = Pixel { r, g, b, a };
        } else {
            match b1 & TAG_MASK {
                OP_INDEX => {
                    // The slot's stored value verbatim, no recompute.
                    px = cache.get(usize::from(b1 & 0x3F));
                }
                OP_DIFF => {
                    px.r = px.r.wrapping_add((b1 >> 4) & 0x03).wrapping_sub(2);
                    px.g = px.g.wrapping_add((b1 >> 2) & 0x03).wrapping_sub(2);
                    px.b = px.b.wrapping_add(b1 & 0x03).wrapping_sub(2);
                }
                OP_LUMA => {
                    let [b2] = read_bytes::<1>(data, &mut pos, chunks_end)?;
                    let dg = (b1 & 0x3F).wrapping_sub(32);
                    px.r = px
                        .r
                        .wrapping_add(dg)
                        .wrapping_add((b2 >> 4) & 0x0F)
                        .wrapping_sub(8);
                    px.g = px.g.wrapping_add(dg);
                    px.b = px.b.wrapping_add(dg).wrapping_add(b2 & 0x0F).wrapping_sub(8);
                }
                OP_RUN => {
                    // The tag's 6 bits are run length - 1; the final repeat
                    // is written by the common tail below.
                    let extra = usize::from(b1 & 0x3F);
                    if written + extra >= pixel_count {
                        return Err(DecodeError::OversizedRun { offset: pos - 1 });
                    }
                    for _ in 0..extra {
                        put_pixel(&mut pixels, written, bpp, px);
                        written += 1;
                    }
                }
                _ => unreachable!("two-bit tag mask covers all values"),
            }
        }

        // Cache and previous-pixel state advance once per chunk, with the
        // chunk's (representative) pixel.
        cache.put(px);
        put_pixel(&mut pixels, written, bpp, px);
        written += 1;
    }

    if data[chunks_end..] != QOI_PADDING {
        return Err(DecodeError::BadFooter);
    }

    #[cfg(feature = "debug-logging")]
    log::debug!(
        "QOI: decoded {} bytes into {}x{} ({} bpp)",
        data.len(),
        header.width,
        header.height,
        bpp
    );

    Ok(DecodedImage {
        pixels,
        width: header.width,
        height: header.height,
        channels: header.channels,
        colorspace: header.colorspace,
    })
}

/// Reads `N` bytes at `*pos`, advancing the cursor. Reads crossing `end`
/// surface as a truncation error at the offending offset.
#[inline]
fn read_bytes<const N: usize>(
    data: &[u8],
    pos: &mut usize,
    end: usize,
) -> Result<[u8; N], DecodeError> {
    if *pos + N > end {
        return Err(DecodeError::TruncatedStream { offset: *pos });
    }
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(&data[*pos..*pos + N]);
    *pos += N;
    Ok(bytes)
}

/// Writes one pixel's channel bytes at pixel position `index`. The alpha
/// byte is only materialized for 4-channel images.
#[inline]
fn put_pixel(out: &mut [u8], index: usize, bpp: usize, px: Pixel) {
    let at = index * bpp;
    out[at] = px.r;
    out[at + 1] = px.g;
    out[at + 2] = px.b;
    if bpp == 4 {
        out[at + 3] = px.a;
    }
}
