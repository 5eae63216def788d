#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn header(width: i32, height: i32, bits: u16, palette_len: u32, data_len: u32) -> Vec<u8> {
    let data_offset = 54 + palette_len * 4;
    let mut bmp = vec![0u8; 54];
    bmp[0] = b'B';
    bmp[1] = b'M';
    bmp[2..6].copy_from_slice(&(data_offset + data_len).to_le_bytes()); // file size
    bmp[10..14].copy_from_slice(&data_offset.to_le_bytes()); // data offset
    bmp[14..18].copy_from_slice(&40u32.to_le_bytes()); // DIB header size
    bmp[18..22].copy_from_slice(&width.to_le_bytes());
    bmp[22..26].copy_from_slice(&height.to_le_bytes());
    bmp[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    bmp[28..30].copy_from_slice(&bits.to_le_bytes());
    bmp[34..38].copy_from_slice(&data_len.to_le_bytes()); // image size
    bmp
}

fn main() {
    use std::fs;
    for dir in ["fuzz/corpus/fuzz_decode", "fuzz/corpus/fuzz_roundtrip", "fuzz/corpus/fuzz_filters"] {
        fs::create_dir_all(dir).unwrap();

        // 24-bit 1x1: 3 bytes BGR + 1 padding
        let mut bmp = header(1, 1, 24, 0, 4);
        bmp.extend_from_slice(&[0xff, 0x00, 0x00, 0x00]);
        fs::write(format!("{dir}/bmp24_1x1.bmp"), bmp).unwrap();

        // 24-bit 3x2 top-down: 9 bytes + 3 padding per row
        let mut bmp = header(3, -2, 24, 0, 24);
        for i in 0..24u8 {
            bmp.push(i.wrapping_mul(37));
        }
        fs::write(format!("{dir}/bmp24_3x2_topdown.bmp"), bmp).unwrap();

        // 8-bit 4x4 with a gray palette
        let mut bmp = header(4, 4, 8, 256, 16);
        for i in 0..=255u8 {
            bmp.extend_from_slice(&[i, i, i, 0]);
        }
        bmp.extend((0..16u8).map(|i| i * 16));
        fs::write(format!("{dir}/bmp8_4x4.bmp"), bmp).unwrap();

        // 8-bit 2x2 with a 2-entry palette and zero image size
        let mut bmp = header(2, 2, 8, 2, 0);
        bmp[46..50].copy_from_slice(&2u32.to_le_bytes()); // colors used
        bmp.extend_from_slice(&[0, 0, 0, 0, 255, 255, 255, 0]);
        bmp.extend_from_slice(&[0, 1, 0, 0, 1, 0, 0, 0]);
        fs::write(format!("{dir}/bmp8_2x2_short_palette.bmp"), bmp).unwrap();

        // Truncated/malformed seeds for edge coverage
        fs::write(format!("{dir}/empty.bin"), b"").unwrap();
        fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();
        fs::write(format!("{dir}/header_only.bin"), header(16, 16, 24, 0, 0)).unwrap();
        fs::write(format!("{dir}/rle8.bin"), {
            let mut bmp = header(1, 1, 8, 0, 4);
            bmp[30..34].copy_from_slice(&1u32.to_le_bytes()); // compression
            bmp
        })
        .unwrap();
    }

    println!("Generated seed corpus in fuzz/corpus/");
}
