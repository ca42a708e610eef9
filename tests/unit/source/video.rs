use super::*;

#[test]
fn ff_ratio_parses_rational_and_integer_rates() {
    assert_eq!(parse_ff_ratio("30000/1001"), Fps::new(30000, 1001).ok());
    assert_eq!(parse_ff_ratio("25"), Fps::new(25, 1).ok());
    assert_eq!(parse_ff_ratio("0/0"), None);
    assert_eq!(parse_ff_ratio("24/0"), None);
    assert_eq!(parse_ff_ratio("abc"), None);
}

#[test]
fn read_full_stops_at_eof() {
    let data = [1u8, 2, 3];
    let mut reader = &data[..];
    let mut buf = [0u8; 5];
    assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], &data);

    let mut reader = &data[..];
    let mut buf = [0u8; 2];
    assert_eq!(read_full(&mut reader, &mut buf).unwrap(), 2);
}

#[cfg(not(feature = "media-ffmpeg"))]
#[test]
fn probing_requires_the_media_feature() {
    assert!(matches!(
        probe_video(Path::new("clip.mp4")),
        Err(WyrmError::Source(_))
    ));
}
