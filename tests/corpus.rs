//! Test corpus: filter and equalization properties over synthetic images.

use zenraster::rgb::RGB8;
use zenraster::*;

fn checkerboard_gray(w: usize, h: usize) -> Bitmap {
    let mut pixels = vec![0u8; w * h];
    for y in 0..h {
        for x in 0..w {
            pixels[y * w + x] = if (x + y) % 2 == 0 { 200 } else { 10 };
        }
    }
    Bitmap::from_pixels(PixelBuffer::from_gray(w, h, pixels).unwrap())
}

fn noise_bytes(len: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

fn noise_gray(w: usize, h: usize, seed: u32) -> Bitmap {
    Bitmap::from_pixels(PixelBuffer::from_gray(w, h, noise_bytes(w * h, seed)).unwrap())
}

fn noise_rgb(w: usize, h: usize, seed: u32) -> Bitmap {
    let pixels = noise_bytes(w * h * 3, seed)
        .chunks_exact(3)
        .map(|c| RGB8::new(c[0], c[1], c[2]))
        .collect();
    Bitmap::from_pixels(PixelBuffer::from_rgb(w, h, pixels).unwrap())
}

fn flat_gray(w: usize, h: usize, v: u8) -> Bitmap {
    Bitmap::from_pixels(PixelBuffer::from_gray(w, h, vec![v; w * h]).unwrap())
}

fn flat_rgb(w: usize, h: usize, px: RGB8) -> Bitmap {
    Bitmap::from_pixels(PixelBuffer::from_rgb(w, h, vec![px; w * h]).unwrap())
}

fn gray_samples(bitmap: &Bitmap) -> Vec<u8> {
    bitmap.pixels().as_gray().unwrap().buf().to_vec()
}

fn rgb_samples(bitmap: &Bitmap) -> Vec<RGB8> {
    bitmap.pixels().as_rgb().unwrap().buf().to_vec()
}

// ── Point operations ─────────────────────────────────────────────────

#[test]
fn negative_is_self_inverse() {
    for original in [noise_gray(9, 7, 1), noise_rgb(5, 6, 2), checkerboard_gray(4, 4)] {
        let mut image = original.clone();
        image.negative();
        assert_ne!(image.pixels(), original.pixels());
        image.negative();
        assert_eq!(image.pixels(), original.pixels());
    }
}

#[test]
fn negative_inverts_each_channel() {
    let mut image = flat_rgb(2, 2, RGB8::new(0, 100, 255));
    image.negative();
    assert!(rgb_samples(&image).iter().all(|&p| p == RGB8::new(255, 155, 0)));
}

#[test]
fn brightness_clamps() {
    let original = noise_gray(16, 16, 3);
    for delta in [-300, -255, -17, 0, 1, 90, 255, 1000] {
        let mut image = original.clone();
        image.brightness(delta);
        for (&before, &after) in gray_samples(&original).iter().zip(&gray_samples(&image)) {
            assert_eq!(i32::from(after), (i32::from(before) + delta).clamp(0, 255));
        }
    }

    let mut white = flat_rgb(3, 3, RGB8::new(255, 255, 255));
    white.brightness(-255);
    assert!(rgb_samples(&white).iter().all(|&p| p == RGB8::new(0, 0, 0)));

    let mut black = flat_gray(3, 3, 0);
    black.brightness(255);
    assert!(gray_samples(&black).iter().all(|&v| v == 255));
}

#[test]
fn threshold_is_idempotent() {
    let original = noise_gray(12, 10, 4);
    for t in [0u8, 1, 64, 127, 128, 254, 255] {
        let mut once = original.clone();
        once.threshold(t).unwrap();
        assert!(gray_samples(&once).iter().all(|&v| v == 0 || v == 255));

        let mut twice = once.clone();
        twice.threshold(t).unwrap();
        assert_eq!(twice.pixels(), once.pixels(), "threshold {t}");
    }
}

#[test]
fn threshold_boundary_is_inclusive() {
    let mut image =
        Bitmap::from_pixels(PixelBuffer::from_gray(3, 1, vec![99, 100, 101]).unwrap());
    image.threshold(100).unwrap();
    assert_eq!(gray_samples(&image), vec![0, 255, 255]);
}

#[test]
fn depth_specific_operations_reject_the_other_depth() {
    let mut rgb = noise_rgb(3, 3, 5);
    let before = rgb.clone();
    let err = rgb.threshold(128).unwrap_err();
    assert!(matches!(err, BitmapError::DepthMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(rgb, before);

    let mut gray = noise_gray(3, 3, 6);
    let before = gray.clone();
    assert!(matches!(
        gray.grayscale(),
        Err(BitmapError::DepthMismatch { .. })
    ));
    assert_eq!(gray, before);
}

#[test]
fn grayscale_uses_truncated_mean() {
    let pixels = vec![RGB8::new(255, 0, 0), RGB8::new(10, 20, 31), RGB8::new(1, 1, 2)];
    let mut image = Bitmap::from_pixels(PixelBuffer::from_rgb(3, 1, pixels).unwrap());
    image.grayscale().unwrap();
    assert_eq!(
        rgb_samples(&image),
        vec![RGB8::new(85, 85, 85), RGB8::new(20, 20, 20), RGB8::new(1, 1, 1)]
    );
}

// ── Convolution ──────────────────────────────────────────────────────

#[test]
fn convolution_preserves_dimensions() {
    let kernels = [
        Kernel::new(1, vec![2.0]).unwrap(),
        Kernel::box_blur(),
        Kernel::new(5, vec![1.0 / 25.0; 25]).unwrap(),
        Kernel::new(7, vec![0.0; 49]).unwrap(),
    ];
    for (w, h) in [(1, 1), (2, 3), (7, 5), (16, 9)] {
        for kernel in &kernels {
            for mut image in [noise_gray(w, h, 7), noise_rgb(w, h, 8)] {
                image.apply_filter(kernel).unwrap();
                assert_eq!((image.width(), image.height()), (w, h));
            }
        }
    }
}

#[test]
fn box_blur_keeps_flat_gray() {
    let mut image = flat_rgb(3, 3, RGB8::new(127, 127, 127));
    image.box_blur().unwrap();
    assert!(rgb_samples(&image).iter().all(|&p| p == RGB8::new(127, 127, 127)));

    let mut image = flat_gray(6, 4, 127);
    image.box_blur().unwrap();
    assert!(gray_samples(&image).iter().all(|&v| v == 127));
}

#[test]
fn normalized_filters_keep_flat_images_at_borders() {
    for filter in [Filter::BoxBlur, Filter::GaussianBlur, Filter::Sharpen] {
        let mut image = flat_gray(5, 5, 180);
        image.filter(filter).unwrap();
        assert!(
            gray_samples(&image).iter().all(|&v| v == 180),
            "{} darkened a flat image",
            filter.name()
        );
    }
}

#[test]
fn outline_of_flat_image_is_black() {
    let mut image = flat_rgb(4, 4, RGB8::new(90, 160, 230));
    image.outline().unwrap();
    assert!(rgb_samples(&image).iter().all(|&p| p == RGB8::new(0, 0, 0)));
}

#[test]
fn emboss_of_flat_image_keeps_value() {
    // Emboss weights sum to 1
    let mut image = flat_gray(4, 3, 77);
    image.emboss().unwrap();
    assert!(gray_samples(&image).iter().all(|&v| v == 77));
}

#[test]
fn sharpen_amplifies_a_single_bright_pixel() {
    let mut pixels = vec![50u8; 9];
    pixels[4] = 100;
    let mut image = Bitmap::from_pixels(PixelBuffer::from_gray(3, 3, pixels).unwrap());
    image.sharpen().unwrap();
    let out = gray_samples(&image);
    // center: 5*100 - 4*50
    assert_eq!(out[4], 255);
    // edge neighbor (0,1): 5*50 - 100 - 50 (clamped left) - 50 - 50
    assert_eq!(out[3], 0);
    // corner only sees clamped copies of itself and edge neighbors
    assert_eq!(out[0], 50);
}

#[test]
fn emboss_orientation_uses_row_zero_as_top() {
    // Bright top row: the center sees it through the (-2, -1, 0) kernel row.
    let mut pixels = vec![0u8; 9];
    pixels[..3].fill(100);
    let mut image = Bitmap::from_pixels(PixelBuffer::from_gray(3, 3, pixels).unwrap());
    image.emboss().unwrap();
    assert_eq!(gray_samples(&image)[4], 0);

    // Bright bottom row: seen through the (0, 1, 2) kernel row.
    let mut pixels = vec![0u8; 9];
    pixels[6..].fill(100);
    let mut image = Bitmap::from_pixels(PixelBuffer::from_gray(3, 3, pixels).unwrap());
    image.emboss().unwrap();
    assert_eq!(gray_samples(&image)[4], 255);
}

#[test]
fn every_named_filter_has_a_3x3_kernel() {
    for filter in Filter::ALL {
        let kernel = filter.kernel();
        assert_eq!(kernel.side(), 3);
        assert_eq!(kernel.weights().len(), 9);
        assert!(!filter.name().is_empty());
    }
    let sum: f32 = Kernel::gaussian_blur().weights().iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
}

#[test]
fn even_kernel_is_an_invalid_parameter() {
    let err = Kernel::new(4, vec![0.0; 16]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
}

#[test]
fn filtering_does_not_read_partially_filtered_pixels() {
    // A left-shift kernel: out(x) = in(x + 1). In-place evaluation would
    // smear the first value across the row.
    let mut image = Bitmap::from_pixels(PixelBuffer::from_gray(4, 1, vec![1, 2, 3, 4]).unwrap());
    let shift = Kernel::from_rows([[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 0.0]]).unwrap();
    image.apply_filter(&shift).unwrap();
    assert_eq!(gray_samples(&image), vec![2, 3, 4, 4]);
}

// ── Equalization ─────────────────────────────────────────────────────

#[test]
fn single_value_image_equalizes_without_fault() {
    let mut image = flat_gray(2, 2, 10);
    image.equalize();
    assert_eq!(gray_samples(&image), vec![0, 0, 0, 0]);

    let mut image = flat_gray(3, 3, 0);
    image.equalize();
    assert!(gray_samples(&image).iter().all(|&v| v == 0));

    let mut image = flat_rgb(3, 2, RGB8::new(40, 40, 40));
    image.equalize();
    assert!(rgb_samples(&image).iter().all(|&p| p == RGB8::new(0, 0, 0)));
}

#[test]
fn equalization_stretches_to_full_range() {
    let pixels: Vec<u8> = (0..64u8).map(|i| 100 + i / 2).collect();
    let mut image = Bitmap::from_pixels(PixelBuffer::from_gray(8, 8, pixels).unwrap());
    image.equalize();
    let out = gray_samples(&image);
    assert_eq!(out.iter().copied().min(), Some(0));
    assert_eq!(out.iter().copied().max(), Some(255));
    assert!(out.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn gray_rgb_equalizes_like_gray8() {
    let levels = noise_bytes(10 * 6, 9);
    let mut gray = Bitmap::from_pixels(PixelBuffer::from_gray(10, 6, levels.clone()).unwrap());
    let mut rgb = Bitmap::from_pixels(
        PixelBuffer::from_rgb(10, 6, levels.iter().map(|&v| RGB8::new(v, v, v)).collect())
            .unwrap(),
    );
    gray.equalize();
    rgb.equalize();
    let expected: Vec<RGB8> = gray_samples(&gray)
        .into_iter()
        .map(|v| RGB8::new(v, v, v))
        .collect();
    assert_eq!(rgb_samples(&rgb), expected);
}

#[test]
fn rgb_equalization_preserves_hue_ordering() {
    // Dark reds and dark blues: equalizing luma must brighten them without
    // turning reds blue or blues red.
    let mut pixels = Vec::new();
    for i in 0..8u8 {
        pixels.push(RGB8::new(40 + i * 4, 10, 10));
        pixels.push(RGB8::new(10, 10, 40 + i * 4));
    }
    let mut image = Bitmap::from_pixels(PixelBuffer::from_rgb(4, 4, pixels.clone()).unwrap());
    image.equalize();
    for (before, after) in pixels.iter().zip(rgb_samples(&image)) {
        if before.r > before.b {
            assert!(after.r >= after.b, "{before:?} -> {after:?}");
        } else {
            assert!(after.b >= after.r, "{before:?} -> {after:?}");
        }
    }
}

#[test]
fn luma_histogram_counts_every_pixel() {
    let image = noise_rgb(11, 13, 10);
    let hist = Histogram::compute(image.pixels(), Channel::Luma);
    assert_eq!(hist.total(), 11 * 13);
    let cdf = hist.cdf();
    assert_eq!(cdf.get(255), 11 * 13);
    assert!(cdf.values().windows(2).all(|w| w[0] <= w[1]));
}
