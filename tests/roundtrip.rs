// Round-trip and corrupt-stream tests for the QOI codec.
//
// Fixtures are generated in code (no randomness, no files) so the tests are
// identical on every platform. The quadrant pattern mixes gradients, a solid
// area, and a checkerboard to exercise every chunk type: gradients hit DIFF
// and LUMA, the solid area hits RUN, the checkerboard hits INDEX.

use qoi_codec::{
    decode, encode, Channels, DecodeError, HEADER_SIZE, OP_RGB, QOI_PADDING, TAG_MASK,
};

/// 64x64 test pattern with 4 quadrants:
/// - Top-left: red horizontal gradient
/// - Top-right: green vertical gradient
/// - Bottom-left: solid blue
/// - Bottom-right: black/white checkerboard
fn quadrants_64x64(channels: Channels) -> Vec<u8> {
    let bpp = channels.bytes_per_pixel();
    let mut pixels = Vec::with_capacity(64 * 64 * bpp);
    for y in 0..64u32 {
        for x in 0..64u32 {
            let (r, g, b) = if x < 32 && y < 32 {
                ((x * 8) as u8, 0, 0)
            } else if x >= 32 && y < 32 {
                (0, (y * 8) as u8, 0)
            } else if x < 32 {
                (0, 0, 200)
            } else if (x + y) % 2 == 0 {
                (255, 255, 255)
            } else {
                (0, 0, 0)
            };
            pixels.extend_from_slice(&[r, g, b]);
            if channels == Channels::Rgba {
                pixels.push(255);
            }
        }
    }
    pixels
}

/// 100x75 gradient with a varying alpha channel; non-64-aligned dimensions.
fn gradient_100x75_rgba() -> Vec<u8> {
    let mut pixels = Vec::with_capacity(100 * 75 * 4);
    for y in 0..75u32 {
        for x in 0..100u32 {
            let r = ((x * 255) / 100) as u8;
            let g = ((y * 255) / 75) as u8;
            let a = if x % 7 == 0 { 128 } else { 255 };
            pixels.extend_from_slice(&[r, g, 128, a]);
        }
    }
    pixels
}

/// Deterministic noise that defeats every prediction, forcing raw chunks.
fn noise(len: usize) -> Vec<u8> {
    let mut state = 0x2545F491u32;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

fn assert_roundtrip(pixels: &[u8], width: u32, height: u32, channels: Channels, colorspace: u8) {
    let stream = encode(pixels, width, height, channels, colorspace).unwrap();
    let image = decode(&stream).unwrap();
    assert_eq!(image.pixels, pixels, "pixel buffer did not round-trip");
    assert_eq!(image.width, width);
    assert_eq!(image.height, height);
    assert_eq!(image.channels, channels);
    assert_eq!(image.colorspace, colorspace);
}

#[test]
fn roundtrip_quadrants_64x64_rgb() {
    assert_roundtrip(&quadrants_64x64(Channels::Rgb), 64, 64, Channels::Rgb, 0);
}

#[test]
fn roundtrip_quadrants_64x64_rgba() {
    assert_roundtrip(&quadrants_64x64(Channels::Rgba), 64, 64, Channels::Rgba, 1);
}

#[test]
fn roundtrip_gradient_100x75_rgba() {
    assert_roundtrip(&gradient_100x75_rgba(), 100, 75, Channels::Rgba, 0);
}

#[test]
fn roundtrip_noise_rgb() {
    assert_roundtrip(&noise(33 * 17 * 3), 33, 17, Channels::Rgb, 0);
}

#[test]
fn roundtrip_noise_rgba() {
    assert_roundtrip(&noise(33 * 17 * 4), 33, 17, Channels::Rgba, 0);
}

#[test]
fn roundtrip_single_pixel() {
    assert_roundtrip(&[1, 2, 3], 1, 1, Channels::Rgb, 0);
    assert_roundtrip(&[1, 2, 3, 4], 1, 1, Channels::Rgba, 1);
}

#[test]
fn roundtrip_channel_wraparound() {
    // 255 -> 0 transitions on every channel; deltas of +-255 must fall
    // through to raw chunks and still round-trip exactly.
    let pixels = vec![
        255, 255, 255, //
        0, 0, 0, //
        255, 0, 255, //
        0, 255, 0,
    ];
    assert_roundtrip(&pixels, 4, 1, Channels::Rgb, 0);
}

#[test]
fn decode_is_deterministic() {
    let stream = encode(&quadrants_64x64(Channels::Rgba), 64, 64, Channels::Rgba, 0).unwrap();
    let first = decode(&stream).unwrap();
    let second = decode(&stream).unwrap();
    assert_eq!(first, second);
}

#[test]
fn known_answer_2x1_diff() {
    // (10,10,10) then (11,11,11): a LUMA seed chunk and a one-byte DIFF.
    let stream = encode(&[10, 10, 10, 11, 11, 11], 2, 1, Channels::Rgb, 0).unwrap();
    let mut expected = b"qoif".to_vec();
    expected.extend_from_slice(&2u32.to_be_bytes());
    expected.extend_from_slice(&1u32.to_be_bytes());
    expected.extend_from_slice(&[3, 0]);
    expected.extend_from_slice(&[0xAA, 0x88, 0x7F]);
    expected.extend_from_slice(&QOI_PADDING);
    assert_eq!(stream, expected);

    let image = decode(&stream).unwrap();
    assert_eq!(image.pixels, vec![10, 10, 10, 11, 11, 11]);
}

#[test]
fn solid_color_run_chunks_cover_image() {
    // 150 identical opaque black pixels: the stream is nothing but RUN
    // chunks whose length fields sum to the pixel count, ceil(150/62) of
    // them.
    let n = 150usize;
    let pixels = vec![0u8; n * 3];
    let stream = encode(&pixels, n as u32, 1, Channels::Rgb, 0).unwrap();
    let chunks = &stream[HEADER_SIZE..stream.len() - QOI_PADDING.len()];

    let mut total = 0usize;
    for &b in chunks {
        assert_eq!(b & TAG_MASK, 0xC0, "expected only RUN chunks");
        assert!(b < OP_RGB, "run length field must stay below 62");
        total += usize::from(b & 0x3F) + 1;
    }
    assert_eq!(chunks.len(), n.div_ceil(62));
    assert_eq!(total, n);

    assert_eq!(decode(&stream).unwrap().pixels, pixels);
}

#[test]
fn truncated_stream_never_yields_pixels() {
    let stream = encode(&quadrants_64x64(Channels::Rgb), 64, 64, Channels::Rgb, 0).unwrap();
    // Cut the stream at several points before the footer; every cut must
    // fail as a truncation or footer error, never a short buffer.
    for cut in [1, 5, QOI_PADDING.len(), stream.len() / 2] {
        let short = &stream[..stream.len() - cut];
        match decode(short) {
            Err(DecodeError::TruncatedStream { .. }) | Err(DecodeError::BadFooter) => {}
            other => panic!("expected truncation failure, got {other:?}"),
        }
    }
}

#[test]
fn corrupted_magic_fails() {
    let mut stream = encode(&[1, 2, 3], 1, 1, Channels::Rgb, 0).unwrap();
    stream[0] = b'x';
    assert!(matches!(decode(&stream), Err(DecodeError::BadMagic(_))));
}

#[test]
fn zero_dimension_header_fails_before_allocation() {
    let mut stream = encode(&[1, 2, 3], 1, 1, Channels::Rgb, 0).unwrap();
    stream[4..8].copy_from_slice(&0u32.to_be_bytes());
    assert_eq!(
        decode(&stream),
        Err(DecodeError::InvalidDimensions {
            width: 0,
            height: 1
        })
    );
}
