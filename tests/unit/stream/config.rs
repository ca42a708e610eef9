use std::path::PathBuf;

use super::*;

#[test]
fn defaults_match_receiver_factory_settings() {
    let cfg = StreamConfig::default();
    cfg.validate().unwrap();
    assert_eq!(
        cfg.target_addr(),
        "192.168.10.30:1234".parse::<SocketAddr>().unwrap()
    );
    assert_eq!(cfg.topology().unwrap().masks(), &[0x01]);
    assert_eq!(cfg.frame_time().unwrap(), None);
    assert_eq!(cfg.datagram_delay(), None);
}

#[test]
fn partial_json_fills_in_defaults() {
    let cfg: StreamConfig = serde_json::from_str(
        r#"{ "target": "192.168.1.90", "canvas": 128, "datagram_delay_us": 500, "filter": "triangle" }"#,
    )
    .unwrap();
    assert_eq!(cfg.port, 1234);
    assert_eq!(cfg.canvas, CanvasSize::Square128);
    assert_eq!(cfg.filter, ResizeFilter::Triangle);
    assert_eq!(cfg.datagram_delay(), Some(RECEIVER_DATAGRAM_DELAY));
    assert_eq!(cfg.topology().unwrap().masks(), &[1, 2, 4, 8]);
}

#[test]
fn unknown_keys_are_rejected() {
    assert!(serde_json::from_str::<StreamConfig>(r#"{ "tagret": "1.2.3.4" }"#).is_err());
}

#[test]
fn validation_catches_bad_values() {
    let bad_port = StreamConfig {
        port: 0,
        ..StreamConfig::default()
    };
    assert!(bad_port.validate().is_err());

    let bad_time = StreamConfig {
        frame_time_sec: Some(-0.5),
        ..StreamConfig::default()
    };
    assert!(bad_time.validate().is_err());

    let bad_select = StreamConfig {
        panel_select: 0,
        ..StreamConfig::default()
    };
    assert!(bad_select.validate().is_err());

    let shared_line = StreamConfig {
        canvas: CanvasSize::Square128,
        connectors: Some(vec![4, 3, 7, 8]),
        ..StreamConfig::default()
    };
    let err = shared_line.validate().unwrap_err();
    assert!(err.to_string().contains("share select line"));
}

#[test]
fn config_file_round_trips_through_json() {
    let dir = PathBuf::from("target").join("unit_config");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("wall.json");

    let cfg = StreamConfig {
        canvas: CanvasSize::Square128,
        connectors: Some(vec![1, 2, 3, 4]),
        frame_time_sec: Some(0.04),
        ..StreamConfig::default()
    };
    std::fs::write(&path, serde_json::to_string_pretty(&cfg).unwrap()).unwrap();

    let back = StreamConfig::from_json_file(&path).unwrap();
    assert_eq!(back, cfg);
    assert_eq!(back.frame_time().unwrap(), Some(Duration::from_millis(40)));
    assert_eq!(back.topology().unwrap().masks(), &[0x08, 0x04, 0x02, 0x01]);
}

#[test]
fn missing_config_file_reports_path() {
    let err = StreamConfig::from_json_file(Path::new("target/nope/wall.json")).unwrap_err();
    assert!(format!("{err:#}").contains("wall.json"));
}
