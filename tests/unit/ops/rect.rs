use super::*;
use crate::foundation::core::BitDepth;

fn numbered(w: u32, h: u32, depth: BitDepth) -> Image {
    let mut img = Image::new(w, h, depth).unwrap();
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            img.set_pixel(x, y, (x * 3 + y * 5 + 1) as u8);
        }
    }
    img
}

fn pixels(img: &Image) -> Vec<Vec<u8>> {
    (0..img.height() as i32)
        .map(|y| {
            (0..img.width() as i32)
                .map(|x| img.get_pixel(x, y).unwrap())
                .collect()
        })
        .collect()
}

#[test]
fn fill_sets_every_pixel_and_keeps_padding_zero() {
    let mut img = Image::new(5, 3, BitDepth::Four).unwrap();
    fill(&mut img, 0x1b);
    assert!(pixels(&img).iter().flatten().all(|&v| v == 0xb));
    assert_eq!(img.row(0), &[0xbb, 0xbb, 0x0b]);
}

#[test]
fn fill_rect_clips_to_bottom_right_corner() {
    let mut img = Image::new(160, 128, BitDepth::Four).unwrap();
    fill_rect(&mut img, 150, 120, 40, 40, 9);
    for y in 0..128 {
        for x in 0..160 {
            let inside = x >= 150 && y >= 120;
            assert_eq!(img.get_pixel(x, y), Some(if inside { 9 } else { 0 }), "({x},{y})");
        }
    }
}

#[test]
fn fill_rect_negative_and_empty() {
    let mut img = Image::new(10, 4, BitDepth::One).unwrap();
    fill_rect(&mut img, -3, -1, 5, 2, 1);
    assert_eq!(pixels(&img)[0], vec![1, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert!(pixels(&img)[1].iter().all(|&v| v == 0));

    let before = img.clone();
    fill_rect(&mut img, 2, 2, -4, 3, 1);
    fill_rect(&mut img, 2, 2, 3, 0, 1);
    fill_rect(&mut img, 10, 0, 3, 3, 1);
    fill_rect(&mut img, i32::MIN, i32::MIN, i32::MAX, i32::MAX, 1);
    assert_eq!(img, before);
}

#[test]
fn flips_mirror_and_are_involutions() {
    for depth in BitDepth::ALL {
        let orig = numbered(7, 5, depth);
        let mut img = orig.clone();
        flip_x(&mut img);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(img.get_pixel(x, y), orig.get_pixel(6 - x, y));
            }
        }
        flip_x(&mut img);
        assert_eq!(img, orig);

        flip_y(&mut img);
        for y in 0..5 {
            for x in 0..7 {
                assert_eq!(img.get_pixel(x, y), orig.get_pixel(x, 4 - y));
            }
        }
        flip_y(&mut img);
        assert_eq!(img, orig);
    }
}

#[test]
fn scroll_moves_without_wrapping() {
    let orig = numbered(9, 4, BitDepth::Four);
    let mut img = orig.clone();
    scroll(&mut img, 3, 1);
    for y in 0..4 {
        for x in 0..9 {
            let expected = if x >= 3 && y >= 1 {
                orig.get_pixel(x - 3, y - 1).unwrap()
            } else {
                0
            };
            assert_eq!(img.get_pixel(x, y), Some(expected), "({x},{y})");
        }
    }

    let mut img = orig.clone();
    scroll(&mut img, -2, -3);
    for y in 0..4 {
        for x in 0..9 {
            let expected = orig.get_pixel(x + 2, y + 3).unwrap_or(0);
            assert_eq!(img.get_pixel(x, y), Some(expected), "({x},{y})");
        }
    }
}

#[test]
fn scroll_byte_aligned_clears_padding() {
    let orig = numbered(5, 2, BitDepth::Four);
    let mut img = orig.clone();
    scroll(&mut img, 2, 0);
    assert_eq!(pixels(&img)[0][..2], [0, 0]);
    assert_eq!(pixels(&img)[0][2..], pixels(&orig)[0][..3]);
    assert_eq!(img.row(0)[2] & 0xf0, 0);
}

#[test]
fn scroll_past_size_clears() {
    let mut img = numbered(4, 4, BitDepth::Two);
    scroll(&mut img, 0, 4);
    assert!(img.data().iter().all(|&b| b == 0));

    let mut img = numbered(4, 4, BitDepth::Two);
    scroll(&mut img, i32::MIN, 0);
    assert!(img.data().iter().all(|&b| b == 0));
}

#[test]
fn doubling_replicates_blocks() {
    let src = numbered(3, 2, BitDepth::Two);
    let dx = doubled_x(&src).unwrap();
    assert_eq!((dx.width(), dx.height()), (6, 2));
    let dy = doubled_y(&src).unwrap();
    assert_eq!((dy.width(), dy.height()), (3, 4));
    let d = doubled(&src).unwrap();
    assert_eq!((d.width(), d.height()), (6, 4));
    for y in 0..4 {
        for x in 0..6 {
            let v = src.get_pixel(x / 2, y / 2);
            assert_eq!(d.get_pixel(x, y), v);
            if y < 2 {
                assert_eq!(dx.get_pixel(x, y), src.get_pixel(x / 2, y));
            }
            if x < 3 {
                assert_eq!(dy.get_pixel(x, y), src.get_pixel(x, y / 2));
            }
        }
    }
    assert_eq!(src, numbered(3, 2, BitDepth::Two));
}

#[test]
fn replace_only_touches_matches() {
    let mut img = numbered(6, 3, BitDepth::Four);
    let orig = img.clone();
    replace(&mut img, 6, 0x1f);
    for y in 0..3 {
        for x in 0..6 {
            let o = orig.get_pixel(x, y).unwrap();
            let expected = if o == 6 { 0xf } else { o };
            assert_eq!(img.get_pixel(x, y), Some(expected));
        }
    }
}

#[test]
fn draw_line_straight_and_diagonal() {
    let mut img = Image::new(6, 6, BitDepth::Four).unwrap();
    draw_line(&mut img, 4, 1, -2, 1, 3);
    assert_eq!(pixels(&img)[1], vec![3, 3, 3, 3, 3, 0]);

    let mut img = Image::new(6, 6, BitDepth::Four).unwrap();
    draw_line(&mut img, 0, 0, 5, 5, 7);
    for i in 0..6 {
        assert_eq!(img.get_pixel(i, i), Some(7));
    }
    assert_eq!(pixels(&img).iter().flatten().filter(|&&v| v != 0).count(), 6);

    let mut img = Image::new(6, 6, BitDepth::One).unwrap();
    draw_line(&mut img, i32::MIN, 2, i32::MAX, 2, 1);
    assert_eq!(pixels(&img)[2], vec![1; 6]);

    let mut img = Image::new(6, 6, BitDepth::One).unwrap();
    draw_line(&mut img, 10, 10, 20, 30, 1);
    assert!(img.data().iter().all(|&b| b == 0));
}

fn lit(img: &Image) -> Vec<(i32, i32)> {
    let mut out = Vec::new();
    for y in 0..img.height() as i32 {
        for x in 0..img.width() as i32 {
            if img.get_pixel(x, y) != Some(0) {
                out.push((x, y));
            }
        }
    }
    out
}

#[test]
fn draw_line_from_far_off_image() {
    let mut img = Image::new(8, 8, BitDepth::One).unwrap();
    draw_line(&mut img, -1_000_000_000, -999_999_990, 4, 5, 1);
    assert_eq!(lit(&img), vec![(0, 1), (1, 2), (2, 3), (3, 4), (4, 5)]);

    let mut img = Image::new(6, 6, BitDepth::Two).unwrap();
    draw_line(&mut img, i32::MIN, i32::MIN, i32::MAX, i32::MAX, 2);
    assert_eq!(lit(&img), (0..6).map(|i| (i, i)).collect::<Vec<_>>());

    let mut img = Image::new(6, 6, BitDepth::Four).unwrap();
    draw_line(&mut img, 0, i32::MIN, 3, i32::MAX, 5);
    assert_eq!(lit(&img), (0..6).map(|y| (2, y)).collect::<Vec<_>>());

    let mut img = Image::new(8, 8, BitDepth::Eight).unwrap();
    draw_line(&mut img, 5, -1000, 2, 3000, 9);
    assert_eq!(lit(&img), (0..8).map(|y| (4, y)).collect::<Vec<_>>());
}

#[test]
fn draw_line_matches_stepwise_bresenham() {
    use crate::check::golden::golden_draw_line;
    use crate::check::harness::Rng;

    let mut rng = Rng::new(21);
    for _ in 0..2000 {
        let w = rng.range(1, 13) as u32;
        let h = rng.range(1, 13) as u32;
        let p: Vec<i32> = (0..4).map(|_| rng.range(-40, 50)).collect();
        let mut a = Image::new(w, h, BitDepth::Two).unwrap();
        let mut b = a.clone();
        draw_line(&mut a, p[0], p[1], p[2], p[3], 3);
        golden_draw_line(&mut b, p[0], p[1], p[2], p[3], 3);
        assert_eq!(a, b, "{w}x{h} line {p:?}");
    }
}
