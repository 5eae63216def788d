#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::*;

fuzz_target!(|data: &[u8]| {
    // Every operation on a decodable image must keep its geometry and never panic
    let limits = Limits {
        max_pixels: Some(1 << 16),
        ..Default::default()
    };
    let Ok(mut image) = decode_bmp_with_limits(data, &limits) else {
        return;
    };
    let (w, h, depth) = (image.width(), image.height(), image.depth());

    for filter in Filter::ALL {
        image.filter(filter).expect("named filter failed");
    }
    image.negative();
    image.brightness(i32::from(data[data.len() / 2]) - 128);
    let _ = image.threshold(data[0]);
    let _ = image.grayscale();
    image.equalize();

    assert_eq!((image.width(), image.height(), image.depth()), (w, h, depth));
});
