//! BigANN flat binary vector reader
//!
//! Streaming reader for the Big ANN Benchmarks flat vector dumps
//! (<https://big-ann-benchmarks.com>): an 8-byte count/dimension header
//! followed by row-major raw values. `.u8bin` files hold one unsigned byte
//! per component, `.fbin` files hold little-endian f32. Vectors are decoded
//! row by row from a buffered stream, so only the requested chunk is ever
//! resident.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::header::{ElementKind, FlatHeader, FLAT_HEADER_LEN};
use super::reader::{clamp_end, VectorChunk, VectorReader};
use crate::utils::{DatasetError, Result};

/// Open-file state, populated on first access
struct OpenState {
    file: BufReader<File>,
    header: FlatHeader,
    kind: ElementKind,
}

/// Flat binary vector dataset reader
pub struct BigAnnDataset {
    path: PathBuf,
    cursor: usize,
    state: Option<OpenState>,
}

impl BigAnnDataset {
    /// Create a reader over a flat binary vector file
    ///
    /// The file is not touched here; header parsing and validation happen
    /// on first `read`, `seek` or `size` call.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DatasetError::Config(
                "dataset path cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            cursor: 0,
            state: None,
        })
    }

    /// Vector dimension (forces lazy initialization)
    pub fn dim(&mut self) -> Result<usize> {
        Ok(self.ensure_open()?.header.dim as usize)
    }

    fn ensure_open(&mut self) -> Result<&mut OpenState> {
        if self.state.is_none() {
            self.state = Some(self.open()?);
        }
        Ok(self.state.as_mut().unwrap())
    }

    fn open(&self) -> Result<OpenState> {
        let kind = ElementKind::from_path(&self.path)?;

        let file = File::open(&self.path).map_err(DatasetError::OpenFailed)?;
        let file_len = file.metadata().map_err(DatasetError::OpenFailed)?.len();
        if file_len < FLAT_HEADER_LEN {
            return Err(DatasetError::FileTooSmall {
                size: file_len,
                minimum: FLAT_HEADER_LEN,
            });
        }

        let mut file = BufReader::new(file);
        let mut raw = [0u8; FLAT_HEADER_LEN as usize];
        file.read_exact(&mut raw)?;

        let header = FlatHeader::parse(raw);
        header.validate_file_len(kind, file_len)?;

        Ok(OpenState { file, header, kind })
    }

    /// Decode `rows` vectors from the current stream position
    fn decode_rows(state: &mut OpenState, rows: usize) -> Result<VectorChunk> {
        let dim = state.header.dim as usize;
        let row_bytes = dim * state.kind.bytes_per_value();

        let mut raw = vec![0u8; rows * row_bytes];
        state.file.read_exact(&mut raw)?;

        let mut values = Vec::with_capacity(rows * dim);
        match state.kind {
            ElementKind::U8 => values.extend(raw.iter().map(|&b| b as f32)),
            ElementKind::F32 => values.extend(
                raw.chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]])),
            ),
        }
        VectorChunk::new(values, dim)
    }
}

impl VectorReader for BigAnnDataset {
    fn read(&mut self, chunk_size: usize) -> Result<Option<VectorChunk>> {
        let cursor = self.cursor;
        let state = self.ensure_open()?;
        let size = state.header.points as usize;
        if cursor >= size {
            return Ok(None);
        }

        let end = clamp_end(cursor, chunk_size, size);
        let chunk = Self::decode_rows(state, end - cursor)?;
        self.cursor = end;
        Ok(Some(chunk))
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        let state = self.ensure_open()?;
        let size = state.header.points as usize;
        if offset >= size {
            return Err(DatasetError::OffsetOutOfRange { offset, size });
        }

        let row_bytes = state.header.dim as u64 * state.kind.bytes_per_value() as u64;
        let byte_offset = FLAT_HEADER_LEN + row_bytes * offset as u64;
        state.file.seek(SeekFrom::Start(byte_offset))?;
        self.cursor = offset;
        Ok(())
    }

    fn size(&mut self) -> Result<usize> {
        Ok(self.ensure_open()?.header.points as usize)
    }

    fn reset(&mut self) -> Result<()> {
        // Header metadata survives a reset; only the stream rewinds.
        if let Some(state) = self.state.as_mut() {
            state.file.seek(SeekFrom::Start(FLAT_HEADER_LEN))?;
        }
        self.cursor = 0;
        Ok(())
    }
}
