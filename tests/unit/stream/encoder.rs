use image::{Rgb, RgbImage};

use super::*;
use crate::{
    foundation::core::CanvasSize,
    wire::batch::{DATAGRAM_LEN, decode_datagram},
};

fn collect(encoder: &mut FrameEncoder, frame: &Frame) -> Vec<Vec<u8>> {
    let mut out = Vec::new();
    let n = encoder
        .encode_frame(frame, |d| {
            out.push(d.to_vec());
            Ok(())
        })
        .unwrap();
    assert_eq!(n, out.len());
    out
}

#[test]
fn square64_frame_is_sixteen_datagrams() {
    let topo = PanelTopology::standard(CanvasSize::Square64, 0x01).unwrap();
    let mut enc = FrameEncoder::new(&topo);
    let dgrams = collect(&mut enc, &Frame::black(CanvasSize::Square64));

    assert_eq!(dgrams.len(), 16);
    for (i, d) in dgrams.iter().enumerate() {
        assert_eq!(d.len(), DATAGRAM_LEN);
        assert_eq!(d[0], 0x01);
        assert_eq!(d[1], 0x00);
        let decoded = decode_datagram(d).unwrap();
        assert_eq!(decoded.pixels[0].row, 4 * i as u32);
        assert_eq!(decoded.pixels[0].col, 0);
    }
    // Black pixel at (0, 0) is an all-zero word.
    assert_eq!(&dgrams[0][2..6], &[0, 0, 0, 0]);
}

#[test]
fn square128_frame_walks_segments_in_order() {
    let mut img = RgbImage::new(128, 128);
    // Mark the first pixel of every segment with a distinct colour.
    img.put_pixel(0, 0, Rgb([4, 0, 0]));
    img.put_pixel(64, 0, Rgb([8, 0, 0]));
    img.put_pixel(0, 64, Rgb([12, 0, 0]));
    img.put_pixel(64, 64, Rgb([16, 0, 0]));
    let frame = Frame::new(CanvasSize::Square128, img).unwrap();

    let topo = PanelTopology::standard(CanvasSize::Square128, 0x01).unwrap();
    let mut enc = FrameEncoder::new(&topo);
    let dgrams = collect(&mut enc, &frame);

    assert_eq!(dgrams.len(), 64);
    let selects: Vec<u8> = dgrams.iter().map(|d| d[0]).collect();
    for (seg, chunk) in selects.chunks(16).enumerate() {
        assert!(chunk.iter().all(|&s| s == 1 << seg));
    }
    for seg in 0..4 {
        let first = decode_datagram(&dgrams[seg * 16]).unwrap();
        assert_eq!(first.pixels[0].row, 0);
        assert_eq!(first.pixels[0].col, 0);
        assert_eq!(first.pixels[0].red, (seg as u8 + 1));
    }
}

#[test]
fn mismatched_canvas_is_rejected() {
    let topo = PanelTopology::standard(CanvasSize::Square64, 0x01).unwrap();
    let mut enc = FrameEncoder::new(&topo);
    let err = enc
        .encode_frame(&Frame::black(CanvasSize::Square128), |_| Ok(()))
        .unwrap_err();
    assert!(matches!(err, WyrmError::InvalidFrame(_)));
}

#[test]
fn emit_errors_abort_the_frame() {
    let topo = PanelTopology::standard(CanvasSize::Square64, 0x01).unwrap();
    let mut enc = FrameEncoder::new(&topo);
    let mut calls = 0;
    let err = enc
        .encode_frame(&Frame::black(CanvasSize::Square64), |_| {
            calls += 1;
            Err(WyrmError::encode_overflow("stop"))
        })
        .unwrap_err();
    assert!(matches!(err, WyrmError::EncodeOverflow(_)));
    assert_eq!(calls, 1);
}
