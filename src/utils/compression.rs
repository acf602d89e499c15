use crate::config::MAX_INFLATED_SIZE;
use crate::error::{Result, TokenError};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Compresses data into a zlib stream (RFC 1950 header, deflate body, adler32)
///
/// # Errors
/// Returns `TokenError::CompressionFailure` if the encoder fails
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), Compression::default());
    encoder
        .write_all(data)
        .map_err(|_| TokenError::CompressionFailure)?;
    encoder.finish().map_err(|_| TokenError::CompressionFailure)
}

/// Decompresses a zlib stream
///
/// Enforces a maximum output size limit to prevent decompression bombs.
///
/// # Errors
/// Returns `TokenError::DecompressionFailure` if:
/// - The stream is not valid zlib
/// - Output size exceeds MAX_INFLATED_SIZE
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut reader = ZlibDecoder::new(data);
    let mut out = Vec::new();

    // Read in chunks to enforce size limit
    let mut buffer = [0u8; 8192];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break, // EOF
            Ok(n) => {
                out.extend_from_slice(&buffer[..n]);
                if out.len() > MAX_INFLATED_SIZE {
                    return Err(TokenError::DecompressionFailure);
                }
            }
            Err(_) => return Err(TokenError::DecompressionFailure),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_zlib_roundtrip() {
        let original = b"Hello, World! This is a test of zlib compression.";
        let compressed = deflate(original).unwrap();
        let decompressed = inflate(&compressed).unwrap();
        assert_eq!(original.as_slice(), decompressed.as_slice());
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_zlib_header() {
        // CMF byte 0x78: deflate with a 32K window
        let compressed = deflate(b"abc").unwrap();
        assert_eq!(compressed[0], 0x78);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_inflates_stream_from_reference_zlib() {
        // zlib.compress(b"hello") from the reference C zlib
        let stream = hex::decode("789ccb48cdc9c90700062c0215").unwrap();
        assert_eq!(inflate(&stream).unwrap(), b"hello");
    }

    #[test]
    fn test_malformed_stream_rejected() {
        let result = inflate(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(matches!(result, Err(TokenError::DecompressionFailure)));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_size_limit_enforcement() {
        let bomb = deflate(&vec![0u8; MAX_INFLATED_SIZE + 1]).unwrap();
        assert!(bomb.len() < 16 * 1024);
        assert!(matches!(
            inflate(&bomb),
            Err(TokenError::DecompressionFailure)
        ));
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_empty_input_roundtrip() {
        let compressed = deflate(&[]).unwrap();
        assert!(inflate(&compressed).unwrap().is_empty());
    }
}
