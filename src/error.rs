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

//! Codec error types.
//!
//! Every failure is detected eagerly and surfaced as a distinct variant;
//! the codec never returns a partial or silently corrupt result.

use thiserror::Error;

/// Errors raised while encoding a raw pixel buffer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// A dimension is zero, or `width * height` exceeds the pixel-count guard.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The input buffer length does not match `width * height * channels`.
    #[error("pixel buffer size mismatch: got {actual} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}

/// Errors raised while decoding a QOI byte stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// The first four bytes are not the `qoif` magic.
    #[error("bad magic bytes {0:?}")]
    BadMagic([u8; 4]),

    /// A declared dimension is zero, or the declared pixel count exceeds
    /// the pixel-count guard.
    #[error("invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// The declared channel count is not 3 (RGB) or 4 (RGBA).
    #[error("invalid channel count: {0}")]
    InvalidChannelCount(u8),

    /// The stream ended while parsing the header, a chunk, or the footer.
    #[error("truncated stream at byte offset {offset}")]
    TruncatedStream { offset: usize },

    /// A run chunk claims more pixels than remain in the image.
    #[error("run chunk at byte offset {offset} overflows the pixel buffer")]
    OversizedRun { offset: usize },

    /// The trailing 8 bytes do not match the end-of-stream marker.
    #[error("bad end-of-stream marker")]
    BadFooter,
}
