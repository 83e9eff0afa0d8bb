/*
 *  tests/pipeline.rs
 *
 *  End-to-end runs of both modes against the recording panel
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 */

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use image::{GrayImage, Luma};
use inkslate::display::drivers::mock::MockDriver;
use inkslate::display::drivers::snapshot::{SnapshotDriver, LATEST_FRAME};
use inkslate::display::{pack, unpack, DisplaySink};
use inkslate::runner::{run_text_session, show_image, with_display, RenderOptions};
use inkslate::session::Termination;
use inkslate::text::{MonoFontShaper, TextLayout};
use inkslate::{MonoBitmap, RenderError, INK, PAPER};

/// White page with a thick black frame, so cropping would be visible.
fn framed_photo(path: &Path, w: u32, h: u32, border: u32) {
    let img = GrayImage::from_fn(w, h, |x, y| {
        let edge = x < border || y < border || x >= w - border || y >= h - border;
        Luma([if edge { 0 } else { 255 }])
    });
    img.save(path).unwrap();
}

fn text_layout() -> TextLayout {
    TextLayout { width: 400, height: 300, margin_x: 10, margin_y: 10, line_spacing: 20 }
}

#[test]
fn test_round_trip_on_panel_sized_bitmap() {
    let bmp = MonoBitmap::from_fn(400, 300, |x, y| {
        if (x ^ y) % 7 == 0 || x == 399 { INK } else { PAPER }
    });
    let buf = pack(&bmp);
    assert_eq!(buf.len(), 50 * 300);
    assert_eq!(unpack(&buf), bmp);
}

#[test]
fn test_round_trip_with_partial_bytes() {
    let bmp = MonoBitmap::from_fn(250, 122, |x, y| if (x + 3 * y) % 11 < 4 { INK } else { PAPER });
    let buf = pack(&bmp);
    assert_eq!(buf.bytes_per_row(), 32);
    assert_eq!(unpack(&buf), bmp);
}

#[test]
fn test_rotated_jpeg_fills_panel_without_cropping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("page.jpg");
    framed_photo(&path, 800, 600, 40);

    let mut panel = MockDriver::new(400, 300);
    panel.init().unwrap();
    let options = RenderOptions::new(false, 90, 128).unwrap();
    show_image(&mut panel, &path, &options).unwrap();

    let frame = panel.last_frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (400, 300));

    // portrait 225x300 pasted at x = 87
    assert_eq!(frame.get(80, 150), Some(PAPER));
    assert_eq!(frame.get(92, 150), Some(INK));
    assert_eq!(frame.get(87 + 225 - 6, 150), Some(INK));
    assert_eq!(frame.get(320, 150), Some(PAPER));
    assert_eq!(frame.get(200, 5), Some(INK));
    assert_eq!(frame.get(200, 294), Some(INK));
    assert_eq!(frame.get(200, 150), Some(PAPER));
}

#[test]
fn test_dithered_image_is_strictly_binary_and_full_size() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ramp.png");
    GrayImage::from_fn(64, 48, |x, _| Luma([(x * 4) as u8])).save(&path).unwrap();

    let mut panel = MockDriver::new(400, 300);
    panel.init().unwrap();
    show_image(&mut panel, &path, &RenderOptions::default()).unwrap();

    let frame = panel.last_frame().unwrap();
    assert_eq!((frame.width(), frame.height()), (400, 300));
    // unscaled ramp sits at (168, 126); dark end inked, outside untouched
    assert_eq!(frame.get(168, 150), Some(INK));
    assert_eq!(frame.get(100, 150), Some(PAPER));
    assert!(frame.ink_count() > 0);
}

#[test]
fn test_missing_image_still_puts_panel_to_sleep() {
    let panel = MockDriver::new(400, 300);
    let state = panel.state();
    let result = with_display(panel, |p| {
        show_image(p, Path::new("/no/such/photo.jpg"), &RenderOptions::default())
    });

    assert!(matches!(result, Err(RenderError::ImageLoad { .. })));
    let s = state.lock().unwrap();
    assert_eq!(s.display_count, 0);
    assert_eq!(s.sleep_count, 1);
}

#[test]
fn test_twenty_lines_leave_last_fourteen_visible() {
    let mut panel = MockDriver::new(400, 300);
    panel.init().unwrap();
    let shaper = MonoFontShaper::default();
    let input: String = (1..=20).map(|i| format!("entry {i:02}\n")).collect();

    let summary = run_text_session(
        &mut panel,
        &shaper,
        text_layout(),
        Duration::ZERO,
        Cursor::new(input),
        Vec::new(),
    )
    .unwrap();
    assert_eq!(summary.refreshes, 20);

    // compare against a direct render of entries 07..=20
    let expected_lines: Vec<String> = (7..=20).map(|i| format!("entry {i:02}")).collect();
    let expected = inkslate::text::compose(
        expected_lines.iter().map(String::as_str),
        &text_layout(),
        &shaper,
    );
    assert_eq!(panel.last_frame().unwrap(), expected);
    // row band below line 14 stays clean
    assert!(!expected.has_ink_in_rows(290, 300));
}

#[test]
fn test_empty_line_ends_session_after_last_refresh() {
    let panel = MockDriver::new(400, 300);
    let state = panel.state();
    let shaper = MonoFontShaper::default();
    let mut prompts = Vec::new();

    let summary = with_display(panel, |p| {
        run_text_session(
            p,
            &shaper,
            text_layout(),
            Duration::ZERO,
            Cursor::new("hello\nworld\n\nnever rendered\n"),
            &mut prompts,
        )
    })
    .unwrap();

    assert_eq!(summary.reason, Termination::EmptyLine);
    let s = state.lock().unwrap();
    assert_eq!(s.display_count, 2);
    assert_eq!(s.sleep_count, 1);
    assert!(String::from_utf8(prompts).unwrap().contains("> "));
}

#[test]
fn test_snapshot_frames_pin_white_and_black() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = SnapshotDriver::new(400, 300, dir.path());
    panel.init().unwrap();

    let mut bmp = MonoBitmap::new(400, 300);
    bmp.set(0, 0, INK);
    let buf = panel.to_buffer(&bmp).unwrap();
    // first byte: ink at MSB, seven paper bits
    assert_eq!(buf.as_bytes()[0], 0b0111_1111);
    assert_eq!(buf.as_bytes()[1], 0xFF);
    panel.display(&buf).unwrap();

    let png = image::open(dir.path().join(LATEST_FRAME)).unwrap().to_luma8();
    assert_eq!(png.get_pixel(0, 0).0, [0]);
    assert_eq!(png.get_pixel(1, 0).0, [255]);
}
