//! IDX binary parsing for the MNIST image/label files.
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic number, big-endian)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic number, big-endian)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```

use crate::math::matrix::Matrix;
use std::fs;

pub const IMAGE_MAGIC: u32 = 0x0000_0803;
pub const LABEL_MAGIC: u32 = 0x0000_0801;

const IMAGE_HEADER_LEN: usize = 16;
const LABEL_HEADER_LEN: usize = 8;

/// Parses an IDX3 image byte buffer into an N × (rows·cols) matrix, one
/// sample per row, pixel values as raw f64 in [0, 255].
///
/// Pixels are deliberately left unscaled; the whitening step normalizes each
/// sample row to zero mean and unit variance afterwards.
pub fn parse_images(bytes: &[u8]) -> Result<Matrix, String> {
    if bytes.len() < IMAGE_HEADER_LEN {
        return Err(format!(
            "IDX image data too short: expected at least {} header bytes, got {}.",
            IMAGE_HEADER_LEN,
            bytes.len()
        ));
    }

    let magic = read_be_u32(bytes, 0);
    if magic != IMAGE_MAGIC {
        return Err(format!(
            "IDX image data: magic number mismatch (expected {:#010x}, got {:#010x}).",
            IMAGE_MAGIC, magic
        ));
    }

    let n_items = read_be_u32(bytes, 4) as usize;
    let rows = read_be_u32(bytes, 8) as usize;
    let cols = read_be_u32(bytes, 12) as usize;

    let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
        format!(
            "IDX image data: rows * cols overflows usize (rows={}, cols={}).",
            rows, cols
        )
    })?;
    let payload_len = n_items.checked_mul(n_pixels).ok_or_else(|| {
        format!(
            "IDX image data: n_items * n_pixels overflows usize (n_items={}, n_pixels={}).",
            n_items, n_pixels
        )
    })?;

    if bytes.len() < IMAGE_HEADER_LEN + payload_len {
        return Err(format!(
            "IDX image data too short: header declares {} items of {}×{} pixels \
             ({} data bytes needed after header), but buffer is only {} bytes total.",
            n_items,
            rows,
            cols,
            payload_len,
            bytes.len()
        ));
    }

    let pixel_data = &bytes[IMAGE_HEADER_LEN..IMAGE_HEADER_LEN + payload_len];
    let data: Vec<Vec<f64>> = if n_pixels == 0 {
        vec![Vec::new(); n_items]
    } else {
        pixel_data
            .chunks_exact(n_pixels)
            .map(|chunk| chunk.iter().map(|&px| px as f64).collect())
            .collect()
    };

    Ok(Matrix {
        rows: n_items,
        cols: n_pixels,
        data,
    })
}

/// Parses an IDX1 label byte buffer into a vector of class indices.
pub fn parse_labels(bytes: &[u8]) -> Result<Vec<u8>, String> {
    if bytes.len() < LABEL_HEADER_LEN {
        return Err(format!(
            "IDX label data too short: expected at least {} header bytes, got {}.",
            LABEL_HEADER_LEN,
            bytes.len()
        ));
    }

    let magic = read_be_u32(bytes, 0);
    if magic != LABEL_MAGIC {
        return Err(format!(
            "IDX label data: magic number mismatch (expected {:#010x}, got {:#010x}).",
            LABEL_MAGIC, magic
        ));
    }

    let n_items = read_be_u32(bytes, 4) as usize;

    if bytes.len() < LABEL_HEADER_LEN + n_items {
        return Err(format!(
            "IDX label data too short: header declares {} labels but buffer is only {} bytes \
             (need at least {}).",
            n_items,
            bytes.len(),
            LABEL_HEADER_LEN + n_items
        ));
    }

    Ok(bytes[LABEL_HEADER_LEN..LABEL_HEADER_LEN + n_items].to_vec())
}

/// Reads and parses an IDX3 image file. A missing or malformed file is an
/// explicit error, never an empty matrix.
pub fn load_images(path: &str) -> Result<Matrix, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("cannot open image file '{}': {}", path, e))?;
    parse_images(&bytes).map_err(|e| format!("{}: {}", path, e))
}

/// Reads and parses an IDX1 label file.
pub fn load_labels(path: &str) -> Result<Vec<u8>, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("cannot open label file '{}': {}", path, e))?;
    parse_labels(&bytes).map_err(|e| format!("{}: {}", path, e))
}

fn read_be_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
