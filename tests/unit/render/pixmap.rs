use super::*;

fn surface(w: u32, h: u32) -> (PixmapDevice, PixmapSurface) {
    let mut dev = PixmapDevice::new(w, h).unwrap();
    let s = dev.acquire().unwrap();
    (dev, s)
}

#[test]
fn clear_fills_every_pixel_opaque() {
    let (_dev, mut s) = surface(4, 3);
    s.clear(Rgb8::new(10, 20, 30)).unwrap();
    let frame = s.snapshot().unwrap();
    assert_eq!(frame.width, 4);
    assert_eq!(frame.height, 3);
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &[10, 20, 30, 255]);
    }
}

#[test]
fn horizontal_line_covers_its_row_only() {
    let (_dev, mut s) = surface(12, 12);
    s.clear(Rgb8::BLACK).unwrap();
    s.draw_line(Point::new(2.0, 5.0), Point::new(8.0, 5.0), Rgb8::WHITE)
        .unwrap();
    let frame = s.snapshot().unwrap();
    for x in 3..8 {
        assert_eq!(frame.pixel(x, 5), Some([255, 255, 255, 255]));
        assert_eq!(frame.pixel(x, 4), Some([0, 0, 0, 255]));
        assert_eq!(frame.pixel(x, 7), Some([0, 0, 0, 255]));
    }
    // Endpoints get partial coverage.
    let [r, _, _, _] = frame.pixel(2, 5).unwrap();
    assert!(r > 0 && r < 255);
}

#[test]
fn steep_and_reversed_lines_are_drawn() {
    let (_dev, mut s) = surface(12, 12);
    s.clear(Rgb8::BLACK).unwrap();
    s.draw_line(Point::new(6.0, 10.0), Point::new(6.0, 1.0), Rgb8::new(0, 255, 0))
        .unwrap();
    let frame = s.snapshot().unwrap();
    for y in 2..10 {
        assert_eq!(frame.pixel(6, y), Some([0, 255, 0, 255]));
    }
}

#[test]
fn out_of_bounds_segments_are_clipped() {
    let (_dev, mut s) = surface(8, 8);
    s.clear(Rgb8::BLACK).unwrap();
    s.draw_line(Point::new(-50.0, -3.0), Point::new(80.0, 90.0), Rgb8::WHITE)
        .unwrap();
    s.draw_line(Point::new(100.0, 100.0), Point::new(200.0, 200.0), Rgb8::WHITE)
        .unwrap();
}

#[test]
fn non_finite_segment_is_a_render_error() {
    let (_dev, mut s) = surface(8, 8);
    let err = s
        .draw_line(Point::new(f64::NAN, 0.0), Point::new(1.0, 1.0), Rgb8::WHITE)
        .unwrap_err();
    assert!(matches!(err, SpiroError::Render(_)));
}

#[test]
fn reacquire_resets_canvas_at_new_size() {
    let (mut dev, mut s) = surface(8, 8);
    s.clear(Rgb8::WHITE).unwrap();
    drop(s);
    dev.set_size(16, 4);
    let s = dev.acquire().unwrap();
    assert_eq!(dev.acquisitions(), 2);
    assert_eq!(s.bounds(), Rect::new(0.0, 0.0, 16.0, 4.0));
    let frame = dev.canvas().frame().unwrap();
    assert_eq!((frame.width, frame.height), (16, 4));
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn empty_device_is_rejected() {
    assert!(PixmapDevice::new(0, 10).is_err());
    let mut dev = PixmapDevice::new(4, 4).unwrap();
    dev.set_size(0, 4);
    assert!(matches!(dev.acquire(), Err(SpiroError::Device(_))));
}
