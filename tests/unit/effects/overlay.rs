use super::*;

fn black(w: u32, h: u32) -> Frame {
    Frame::from_rgb8(w, h, vec![0; (w * h * 3) as usize]).unwrap()
}

#[test]
fn bubble_is_red_and_rises() {
    let src = black(50, 50);
    let early = red_bubble(&src, 0.0);
    // Center starts at y = 40.
    let px = early.pixel(25, 40);
    assert!(px[0] > px[1] && px[0] > px[2]);
    assert_eq!(early.pixel(25, 10), [0, 0, 0]);

    let late = red_bubble(&src, 0.9);
    assert!(late.pixel(25, 13)[0] > 0);
    assert!(late.pixel(25, 13)[0] > early.pixel(25, 40)[0]);
}

#[test]
fn border_touches_edges_only() {
    let src = black(40, 40);
    let out = highlight_border(&src, 0.0);
    assert_ne!(out.pixel(0, 0), [0, 0, 0]);
    assert_ne!(out.pixel(39, 20), [0, 0, 0]);
    assert_eq!(out.pixel(20, 20), [0, 0, 0]);
}

#[test]
fn border_has_minimum_thickness_on_small_frames() {
    let src = black(4, 4);
    let out = highlight_border(&src, 0.75);
    assert_ne!(out.pixel(0, 2), [0, 0, 0]);
}

#[test]
fn shimmer_band_travels_diagonally() {
    let src = black(40, 40);
    let start = shimmer(&src, 0.0);
    assert!(start.data.iter().all(|&v| v == 0));

    let mid = shimmer(&src, 0.5);
    assert!(mid.pixel(20, 20)[0] > 0);
    assert_eq!(mid.pixel(0, 0), [0, 0, 0]);
}

#[test]
fn bubble_at_half_progress_is_centered_with_radius_twelve() {
    let out = red_bubble(&black(100, 100), 0.5);
    // Opacity 0.5 over black halves the bubble color.
    assert_eq!(out.pixel(50, 50), [110, 10, 30]);
    assert_eq!(out.pixel(61, 50), [110, 10, 30]);
    assert_eq!(out.pixel(63, 50), [0, 0, 0]);
    assert_eq!(out.pixel(50, 39), [110, 10, 30]);
    assert_eq!(out.pixel(50, 37), [0, 0, 0]);
}

#[test]
fn border_is_two_pixels_at_first_peak() {
    // 40 * 0.05 * (0.5 + 0.5 * sin(pi / 2)) = 2.
    let out = highlight_border(&black(40, 40), 0.125);
    let gold = [204, 172, 0];
    assert_eq!(out.pixel(0, 20), gold);
    assert_eq!(out.pixel(1, 20), gold);
    assert_eq!(out.pixel(2, 20), [0, 0, 0]);
    assert_eq!(out.pixel(37, 20), [0, 0, 0]);
    assert_eq!(out.pixel(38, 20), gold);
    assert_eq!(out.pixel(20, 1), gold);
    assert_eq!(out.pixel(20, 2), [0, 0, 0]);
}

#[test]
fn shimmer_peaks_at_band_center() {
    // Band center sits on x + y = 100 at half progress; half width is 8.
    let out = shimmer(&black(100, 100), 0.5);
    assert_eq!(out.pixel(50, 50), [89, 89, 89]);
    assert_eq!(out.pixel(54, 50), [45, 45, 45]);
    assert_eq!(out.pixel(40, 50), [0, 0, 0]);
}
