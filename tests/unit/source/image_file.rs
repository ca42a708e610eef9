use std::path::PathBuf;

use image::{Delay, Frame, Rgba, RgbaImage, codecs::gif::GifEncoder};

use super::*;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit_sources").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_gif(path: &Path, colors: &[[u8; 4]], delay_ms: u32) {
    let file = File::create(path).unwrap();
    let mut enc = GifEncoder::new(file);
    let frames = colors.iter().map(|c| {
        Frame::from_parts(
            RgbaImage::from_pixel(4, 2, Rgba(*c)),
            0,
            0,
            Delay::from_numer_denom_ms(delay_ms, 1),
        )
    });
    enc.encode_frames(frames).unwrap();
}

#[test]
fn gif_frames_loop_forever_with_their_delays() {
    let dir = scratch_dir("gif_loop");
    let path = dir.join("two.gif");
    write_gif(&path, &[[255, 0, 0, 255], [0, 0, 255, 255]], 100);

    let mut src = AnimatedImageSource::open(&path).unwrap();
    assert_eq!(src.len(), 2);

    // Palette quantization may shift channels slightly.
    let reds: Vec<bool> = (0..5)
        .map(|_| {
            let f = src.next_frame().unwrap();
            assert_eq!(f.delay, Some(Duration::from_millis(100)));
            f.image.to_rgb8().get_pixel(0, 0).0[0] > 128
        })
        .collect();
    assert_eq!(reds, vec![true, false, true, false, true]);
}

#[test]
fn non_gif_opens_as_single_frame_animation() {
    let dir = scratch_dir("png_still");
    let path = dir.join("still.png");
    RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 255]))
        .save(&path)
        .unwrap();

    let mut src = AnimatedImageSource::open(&path).unwrap();
    assert_eq!(src.len(), 1);
    let f = src.next_frame().unwrap();
    assert_eq!(f.delay, None);
    assert_eq!(f.image.to_rgb8().get_pixel(2, 2).0, [1, 2, 3]);
}

#[test]
fn still_image_never_exhausts() {
    let mut src = StillImageSource::from_image(DynamicImage::new_rgb8(2, 2));
    for _ in 0..10 {
        assert!(src.next_frame().is_ok());
    }
    assert_eq!(src.native_interval(), None);
    assert!(src.is_still());
    assert!(!AnimatedImageSource::from_frames(vec![SourceFrame::new(src.image.clone())])
        .unwrap()
        .is_still());
}

#[test]
fn missing_file_is_a_source_error() {
    let err = StillImageSource::open(Path::new("target/does/not/exist.png")).unwrap_err();
    assert!(matches!(err, WyrmError::Source(_)));
    assert!(AnimatedImageSource::open(Path::new("target/does/not/exist.gif")).is_err());
}

#[test]
fn empty_animation_is_rejected() {
    assert!(AnimatedImageSource::from_frames(Vec::new()).is_err());
}
