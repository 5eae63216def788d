#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and full decode must never panic
    let _ = zenraster::ImageInfo::from_bytes(data);

    let limits = zenraster::Limits {
        max_pixels: Some(1 << 22),
        ..Default::default()
    };
    let _ = zenraster::decode_bmp_with_limits(data, &limits);
});
