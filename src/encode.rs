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

//! QOI encoder.
//!
//! A single left-to-right pass over the pixel buffer, maintaining the
//! previous pixel, the current run length, and the recent-color cache.
//! For each pixel the smallest applicable chunk wins:
//!
//! 1. **RUN** — pixel equals the previous one; runs are flushed at length
//!    62 or at the last pixel of the image.
//! 2. **INDEX** — the cache slot the pixel hashes to already holds it.
//! 3. **DIFF** — alpha unchanged and all channel deltas in [-2, 1].
//! 4. **LUMA** — alpha unchanged, green delta in [-32, 31] and the
//!    red/blue deltas within [-8, 7] of it.
//! 5. **RGB** / **RGBA** — raw channel bytes, depending on whether alpha
//!    changed.
//!
//! The priority order is part of the format: DIFF is checked before LUMA
//! and LUMA before the raw chunks purely because each is strictly smaller.

use bytes::{BufMut, BytesMut};

use crate::error::EncodeError;
use crate::pixel::{ColorCache, Pixel};
use crate::{
    Channels, Header, HEADER_SIZE, MAX_PIXELS, OP_DIFF, OP_INDEX, OP_LUMA, OP_RGB, OP_RGBA,
    OP_RUN, QOI_PADDING,
};

/// Encodes a raw, tightly packed, row-major pixel buffer into a QOI byte
/// stream.
///
/// The buffer length must be exactly `width * height * channels`; 3-channel
/// buffers carry no alpha bytes and every pixel is treated as fully opaque.
/// The colorspace byte is stored in the header verbatim and never
/// interpreted.
///
/// # Errors
///
/// Returns an error if a dimension is zero, the pixel count exceeds
/// [`MAX_PIXELS`], or the buffer length does not match the declared shape.
/// No partial output is produced.
pub fn encode(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: Channels,
    colorspace: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 || u64::from(width) * u64::from(height) > MAX_PIXELS {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let bpp = channels.bytes_per_pixel();
    let pixel_count = width as usize * height as usize;
    let expected = pixel_count * bpp;
    if pixels.len() != expected {
        return Err(EncodeError::BufferSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }

    // Worst case is one tag byte per pixel on top of the raw channels.
    let mut out = BytesMut::with_capacity(HEADER_SIZE + expected + pixel_count + QOI_PADDING.len());
    Header {
        width,
        height,
        channels,
        colorspace,
    }
    .write_to(&mut out);

    let mut cache = ColorCache::new();
    let mut prev = Pixel::OPAQUE_BLACK;
    let mut run: u8 = 0;
    let last = pixel_count - 1;

    for (i, raw) in pixels.chunks_exact(bpp).enumerate() {
        let px = Pixel {
            r: raw[0],
            g: raw[1],
            b: raw[2],
            a: if channels == Channels::Rgba {
                raw[3]
            } else {
                255
            },
        };

        if px == prev {
            run += 1;
            if run == 62 || i == last {
                out.put_u8(OP_RUN | (run - 1));
                run = 0;
            }
            // Run continuations never touch the cache.
            continue;
        }

        if run > 0 {
            out.put_u8(OP_RUN | (run - 1));
            run = 0;
        }

        if cache.contains(px) {
            out.put_u8(OP_INDEX | px.cache_index() as u8);
        } else {
            cache.put(px);
            encode_diff_chunk(&mut out, prev, px);
        }

        prev = px;
    }

    out.put_slice(&QOI_PADDING);

    #[cfg(feature = "debug-logging")]
    log::debug!(
        "QOI: encoded {}x{} ({} bpp) {} -> {} bytes",
        width,
        height,
        bpp,
        expected,
        out.len()
    );

    Ok(out.to_vec())
}

/// Emits the smallest chunk representing `px` relative to `prev`:
/// DIFF, then LUMA, then raw RGB, or raw RGBA when alpha changed.
fn encode_diff_chunk(out: &mut BytesMut, prev: Pixel, px: Pixel) {
    if px.a != prev.a {
        out.put_u8(OP_RGBA);
        out.put_u8(px.r);
        out.put_u8(px.g);
        out.put_u8(px.b);
        out.put_u8(px.a);
        return;
    }

    let dr = i32::from(px.r) - i32::from(prev.r);
    let dg = i32::from(px.g) - i32::from(prev.g);
    let db = i32::from(px.b) - i32::from(prev.b);

    if (-2..=1).contains(&dr) && (-2..=1).contains(&dg) && (-2..=1).contains(&db) {
        out.put_u8(OP_DIFF | ((dr + 2) as u8) << 4 | ((dg + 2) as u8) << 2 | (db + 2) as u8);
        return;
    }

    let dr_dg = dr - dg;
    let db_dg = db - dg;
    if (-32..=31).contains(&dg) && (-8..=7).contains(&dr_dg) && (-8..=7).contains(&db_dg) {
        out.put_u8(OP_LUMA | (dg + 32) as u8);
        out.put_u8(((dr_dg + 8) as u8) << 4 | (db_dg + 8) as u8);
        return;
    }

    out.put_u8(OP_RGB);
    out.put_u8(px.r);
    out.put_u8(px.g);
    out.put_u8(px.b);
}
