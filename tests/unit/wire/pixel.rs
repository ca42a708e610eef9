use super::*;

#[test]
fn address_round_trips_for_every_panel_coordinate() {
    for row in 0..64 {
        for col in 0..64 {
            let addr = encode_address(row, col);
            assert!(addr < 4096);
            assert_eq!(decode_address(addr), (row, col));
        }
    }
}

#[test]
fn channels_quantize_to_top_six_bits_in_brg_slots() {
    for v in 0..=255u8 {
        let p = decode_pixel(encode_pixel(0, 0, [v, 0, 0]));
        assert_eq!((p.red, p.green, p.blue), (v >> 2, 0, 0));

        let p = decode_pixel(encode_pixel(0, 0, [0, v, 0]));
        assert_eq!((p.red, p.green, p.blue), (0, v >> 2, 0));

        let p = decode_pixel(encode_pixel(0, 0, [0, 0, v]));
        assert_eq!((p.red, p.green, p.blue), (0, 0, v >> 2));
    }
}

#[test]
fn mixed_colour_keeps_channels_independent() {
    let p = decode_pixel(encode_pixel(63, 63, [0x12, 0xAB, 0xFF]));
    assert_eq!(p.row, 63);
    assert_eq!(p.col, 63);
    assert_eq!(p.red, 0x12 >> 2);
    assert_eq!(p.green, 0xAB >> 2);
    assert_eq!(p.blue, 0xFF >> 2);
}

#[test]
fn black_origin_pixel_is_zero() {
    assert_eq!(encode_pixel(0, 0, [0, 0, 0]), 0x0000_0000);
}

#[test]
fn red_pixel_matches_receiver_layout() {
    // addr (1 << 6) | 2 = 66; red 0xFC lands in bits 6..11.
    let word = encode_pixel(1, 2, [255, 0, 0]);
    assert_eq!(word, (66 << 18) | (0xFC << 4));
    assert_eq!(word, 0x0108_0FC0);
    assert_eq!(word.to_be_bytes(), [0x01, 0x08, 0x0F, 0xC0]);

    let p = decode_pixel(word);
    assert_eq!((p.row, p.col, p.red, p.green, p.blue), (1, 2, 63, 0, 0));
}

#[test]
fn white_fills_every_colour_bit() {
    assert_eq!(encode_pixel(0, 0, [255, 255, 255]), 0x0003_FFFF);
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "outside 64x64 panel")]
fn out_of_panel_coordinate_asserts_in_debug() {
    let _ = encode_address(64, 0);
}

#[cfg(not(debug_assertions))]
#[test]
fn out_of_panel_coordinate_wraps_in_release() {
    assert_eq!(encode_address(65, 130), encode_address(1, 2));
}
