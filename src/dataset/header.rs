//! BigANN flat binary header
//!
//! The flat format carries a single 8-byte header: point count and vector
//! dimension, both little-endian u32. Everything after byte 8 is raw vector
//! data whose element width is determined by the file extension.

use std::path::Path;

use crate::utils::{DatasetError, Result};

/// Header length in bytes
pub const FLAT_HEADER_LEN: u64 = 8;

/// Element encoding of a flat binary vector file, derived from extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// `.u8bin`: one unsigned byte per value, widened to f32 on decode
    U8,
    /// `.fbin`: little-endian IEEE-754 f32 per value
    F32,
}

impl ElementKind {
    /// Bytes occupied by one vector component
    pub fn bytes_per_value(&self) -> usize {
        match self {
            ElementKind::U8 => 1,
            ElementKind::F32 => 4,
        }
    }

    /// Determine the element kind from a file path's extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        match extension {
            "u8bin" => Ok(ElementKind::U8),
            "fbin" => Ok(ElementKind::F32),
            other => Err(DatasetError::InvalidExtension {
                extension: other.to_string(),
            }),
        }
    }
}

/// Parsed flat binary header
#[derive(Debug, Clone, Copy)]
pub struct FlatHeader {
    /// Number of vectors in the file
    pub points: u32,
    /// Vector dimension
    pub dim: u32,
}

impl FlatHeader {
    /// Decode the 8-byte header
    pub fn parse(bytes: [u8; 8]) -> Self {
        let points = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let dim = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Self { points, dim }
    }

    /// Expected byte length of the data section for the given element kind
    pub fn data_len(&self, kind: ElementKind) -> u64 {
        self.points as u64 * self.dim as u64 * kind.bytes_per_value() as u64
    }

    /// Validate the file length against the declared point count and dimension
    pub fn validate_file_len(&self, kind: ElementKind, file_len: u64) -> Result<()> {
        let expected = FLAT_HEADER_LEN + self.data_len(kind);
        if file_len != expected {
            return Err(DatasetError::SizeMismatch {
                actual: file_len,
                expected,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn parse_little_endian_header() {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&1000u32.to_le_bytes());
        bytes[4..].copy_from_slice(&128u32.to_le_bytes());
        let header = FlatHeader::parse(bytes);
        assert_eq!(header.points, 1000);
        assert_eq!(header.dim, 128);
    }

    #[test]
    fn element_kind_from_extension() {
        assert_eq!(
            ElementKind::from_path(&PathBuf::from("base.u8bin")).unwrap(),
            ElementKind::U8
        );
        assert_eq!(
            ElementKind::from_path(&PathBuf::from("query.fbin")).unwrap(),
            ElementKind::F32
        );
        assert!(matches!(
            ElementKind::from_path(&PathBuf::from("data.ivecs")),
            Err(DatasetError::InvalidExtension { .. })
        ));
        assert!(ElementKind::from_path(&PathBuf::from("noext")).is_err());
    }

    #[test]
    fn file_len_validation() {
        let header = FlatHeader { points: 10, dim: 4 };
        // f32: 8 + 10 * 4 * 4 = 168
        assert!(header.validate_file_len(ElementKind::F32, 168).is_ok());
        assert!(matches!(
            header.validate_file_len(ElementKind::F32, 167),
            Err(DatasetError::SizeMismatch {
                actual: 167,
                expected: 168
            })
        ));
        // u8: 8 + 10 * 4 = 48
        assert!(header.validate_file_len(ElementKind::U8, 48).is_ok());
    }
}
