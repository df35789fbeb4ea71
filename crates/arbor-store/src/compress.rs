//! zlib framing for stored objects.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

/// Default zlib level used when none is configured.
pub const DEFAULT_LEVEL: u32 = 6;

/// Compress `data` with zlib at `level` (0-9, clamped).
pub fn compress(data: &[u8], level: u32) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    encoder.finish()
}

/// Inverse of [`compress`].
pub fn decompress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_preserves_bytes() {
        let data: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();
        for level in [0, 1, DEFAULT_LEVEL, 9] {
            let packed = compress(&data, level).unwrap();
            assert_eq!(decompress(&packed).unwrap(), data);
        }
    }

    #[test]
    fn roundtrip_empty() {
        let packed = compress(b"", DEFAULT_LEVEL).unwrap();
        assert!(decompress(&packed).unwrap().is_empty());
    }

    #[test]
    fn repetitive_data_shrinks() {
        let data = vec![b'a'; 10_000];
        assert!(compress(&data, DEFAULT_LEVEL).unwrap().len() < data.len() / 10);
    }

    #[test]
    fn garbage_fails_to_decompress() {
        assert!(decompress(b"definitely not zlib").is_err());
    }

    #[test]
    fn out_of_range_level_is_clamped() {
        let packed = compress(b"clamp me", 42).unwrap();
        assert_eq!(decompress(&packed).unwrap(), b"clamp me");
    }
}
