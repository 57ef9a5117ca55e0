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

//! Pixel value type and the recent-color cache shared by encoder and decoder.
//!
//! Round-trip correctness depends on both sides maintaining structurally
//! identical cache state: same initial contents, same hash, same update
//! points. Collisions are intentional and silently overwrite; the cache is
//! a flat 64-slot array, not a hash map.

use crate::CACHE_SIZE;

/// An exact 4-channel color value. 3-channel images carry an implicit
/// alpha of 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    /// Initial value of the previous-pixel state and of every cache slot.
    pub const OPAQUE_BLACK: Pixel = Pixel {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Cache slot for this pixel: `(3r + 5g + 7b + 11a) mod 64`.
    ///
    /// Accumulated in a wider integer, so the byte weights cannot overflow.
    #[inline]
    pub fn cache_index(&self) -> usize {
        (usize::from(self.r) * 3
            + usize::from(self.g) * 5
            + usize::from(self.b) * 7
            + usize::from(self.a) * 11)
            % CACHE_SIZE
    }
}

/// The 64-slot recent-color cache, indexed by [`Pixel::cache_index`].
///
/// Later writes to a slot overwrite earlier ones; at any point the contents
/// are a deterministic function of the pixel sequence processed so far.
#[derive(Debug, Clone)]
pub struct ColorCache([Pixel; CACHE_SIZE]);

impl ColorCache {
    pub fn new() -> Self {
        ColorCache([Pixel::OPAQUE_BLACK; CACHE_SIZE])
    }

    /// Stores `pixel` in its slot, replacing whatever was there.
    #[inline]
    pub fn put(&mut self, pixel: Pixel) -> usize {
        let index = pixel.cache_index();
        self.0[index] = pixel;
        index
    }

    /// The value stored at `slot`. Slots are always populated; unseen slots
    /// hold the opaque-black initial value.
    #[inline]
    pub fn get(&self, slot: usize) -> Pixel {
        self.0[slot]
    }

    /// True if the slot this pixel hashes to already holds exactly this
    /// pixel. A colliding slot holding a different color returns false.
    #[inline]
    pub fn contains(&self, pixel: Pixel) -> bool {
        self.0[pixel.cache_index()] == pixel
    }
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new()
    }
}
