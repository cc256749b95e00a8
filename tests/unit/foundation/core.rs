use super::*;

#[test]
fn depth_masks_and_lanes() {
    assert_eq!(BitDepth::One.mask(), 1);
    assert_eq!(BitDepth::Two.mask(), 3);
    assert_eq!(BitDepth::Four.mask(), 15);
    assert_eq!(BitDepth::Eight.mask(), 255);

    assert_eq!(BitDepth::Four.lane(0), (0, 0));
    assert_eq!(BitDepth::Four.lane(1), (0, 4));
    assert_eq!(BitDepth::Four.lane(5), (2, 4));
    assert_eq!(BitDepth::One.lane(13), (1, 5));
    assert_eq!(BitDepth::Two.lane(7), (1, 6));
    assert_eq!(BitDepth::Eight.lane(9), (9, 0));
}

#[test]
fn splat_fills_every_lane() {
    assert_eq!(BitDepth::One.splat(1), 0xff);
    assert_eq!(BitDepth::One.splat(2), 0x00);
    assert_eq!(BitDepth::Two.splat(2), 0xaa);
    assert_eq!(BitDepth::Four.splat(9), 0x99);
    assert_eq!(BitDepth::Four.splat(0x1c), 0xcc);
    assert_eq!(BitDepth::Eight.splat(0x5a), 0x5a);
}

#[test]
fn row_bytes_round_up() {
    assert_eq!(BitDepth::One.row_bytes(1), 1);
    assert_eq!(BitDepth::One.row_bytes(9), 2);
    assert_eq!(BitDepth::Two.row_bytes(5), 2);
    assert_eq!(BitDepth::Four.row_bytes(7), 4);
    assert_eq!(BitDepth::Four.row_bytes(160), 80);
    assert_eq!(BitDepth::Eight.row_bytes(3), 3);
}

#[test]
fn depth_parses_and_rejects() {
    assert_eq!("4".parse::<BitDepth>().unwrap(), BitDepth::Four);
    assert_eq!(BitDepth::try_from(2).unwrap(), BitDepth::Two);
    assert!(BitDepth::try_from(3).is_err());
    assert!("x".parse::<BitDepth>().is_err());

    let json = serde_json::to_string(&BitDepth::Four).unwrap();
    assert_eq!(json, "4");
    assert!(serde_json::from_str::<BitDepth>("16").is_err());
}

#[test]
fn clip_handles_negative_and_oversized() {
    let c = Rect::new(150, 120, 40, 40).clip(160, 128).unwrap();
    assert_eq!(c, ClipRect { x0: 150, y0: 120, x1: 160, y1: 128 });
    assert_eq!((c.width(), c.height()), (10, 8));

    let c = Rect::new(-5, 3, 7, 13).clip(160, 128).unwrap();
    assert_eq!(c, ClipRect { x0: 0, y0: 3, x1: 2, y1: 16 });

    assert!(Rect::new(-7, 0, 7, 5).clip(10, 10).is_none());
    assert!(Rect::new(10, 0, 7, 5).clip(10, 10).is_none());
    assert!(Rect::new(0, 0, -1, 5).clip(10, 10).is_none());
    assert!(Rect::new(0, 0, 3, 0).clip(10, 10).is_none());
    assert!(Rect::new(i32::MAX, 0, i32::MAX, 1).clip(10, 10).is_none());
}
