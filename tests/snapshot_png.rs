use bevy::prelude::*;
use metaballs::rendering::snapshot::{render_snapshot, save_png};
use metaballs::{Ball, MetaballsConfig, Session};

#[test]
fn snapshot_writes_session_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("frame.png");
    let cfg = MetaballsConfig {
        seed: Some(11),
        ..Default::default()
    };
    let session = render_snapshot(&cfg, UVec2::new(96, 64), 30, &out).unwrap();

    let img = image::open(&out).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (96, 64));
    assert_eq!(img.as_raw().as_slice(), session.pixels());
}

#[test]
fn same_seed_same_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = MetaballsConfig {
        seed: Some(4),
        ..Default::default()
    };
    let a = render_snapshot(&cfg, UVec2::new(40, 40), 12, &dir.path().join("a.png")).unwrap();
    let b = render_snapshot(&cfg, UVec2::new(40, 40), 12, &dir.path().join("b.png")).unwrap();
    assert_eq!(a.pixels(), b.pixels());
}

#[test]
fn empty_surface_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = MetaballsConfig::default();
    let s = Session::with_balls(&cfg, UVec2::new(0, 10), vec![Ball::new(Vec2::ZERO, 5.0, Vec2::ZERO)])
        .unwrap();
    assert!(save_png(&s, &dir.path().join("x.png")).is_err());
}
