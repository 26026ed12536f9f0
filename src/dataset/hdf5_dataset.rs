//! HDF5 vector dataset reader
//!
//! Reads one named 2-D dataset out of an ann-benchmarks style HDF5 file
//! (<https://github.com/erikbern/ann-benchmarks#data-sets>). The field is
//! selected by [`Context`]: the index corpus lives under "train", queries
//! under "test" and ground-truth ids under "neighbors". HDF5 supports
//! arbitrary-range random access natively, so `read` is a plain contiguous
//! row slice and `seek` is purely logical.
//!
//! Compiled behind the `hdf5` cargo feature, which links the system HDF5
//! library.

use std::path::{Path, PathBuf};

use ndarray::s;

use super::context::Context;
use super::reader::{clamp_end, VectorChunk, VectorReader};
use crate::utils::{DatasetError, Result};

/// Open-file state, populated on first access
struct OpenState {
    _file: hdf5::File,
    data: hdf5::Dataset,
    rows: usize,
    dim: usize,
}

/// HDF5-backed vector dataset reader
pub struct Hdf5Dataset {
    path: PathBuf,
    context: Context,
    cursor: usize,
    state: Option<OpenState>,
}

impl Hdf5Dataset {
    /// Create a reader over one context field of an HDF5 file
    ///
    /// The file is opened on first `read`, `seek` or `size` call.
    pub fn new<P: AsRef<Path>>(path: P, context: Context) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DatasetError::Config(
                "dataset path cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            context,
            cursor: 0,
            state: None,
        })
    }

    /// Vector dimension of the selected field (forces lazy initialization)
    pub fn dim(&mut self) -> Result<usize> {
        Ok(self.ensure_open()?.dim)
    }

    fn ensure_open(&mut self) -> Result<&mut OpenState> {
        if self.state.is_none() {
            self.state = Some(self.open()?);
        }
        Ok(self.state.as_mut().unwrap())
    }

    fn open(&self) -> Result<OpenState> {
        let file = hdf5::File::open(&self.path)?;
        let data = file.dataset(self.context.field_name())?;

        let shape = data.shape();
        if shape.len() != 2 {
            return Err(DatasetError::Format(format!(
                "field {} has {} dimensions, expected 2",
                self.context.field_name(),
                shape.len()
            )));
        }

        Ok(OpenState {
            _file: file,
            data,
            rows: shape[0],
            dim: shape[1],
        })
    }
}

impl VectorReader for Hdf5Dataset {
    fn read(&mut self, chunk_size: usize) -> Result<Option<VectorChunk>> {
        let cursor = self.cursor;
        let state = self.ensure_open()?;
        if cursor >= state.rows {
            return Ok(None);
        }

        let end = clamp_end(cursor, chunk_size, state.rows);
        let dim = state.dim;
        let slice = state.data.read_slice_2d::<f32, _>(s![cursor..end, ..])?;
        self.cursor = end;
        Ok(Some(VectorChunk::new(slice.into_raw_vec(), dim)?))
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        let size = self.ensure_open()?.rows;
        if offset >= size {
            return Err(DatasetError::OffsetOutOfRange { offset, size });
        }
        self.cursor = offset;
        Ok(())
    }

    fn size(&mut self) -> Result<usize> {
        Ok(self.ensure_open()?.rows)
    }

    fn reset(&mut self) -> Result<()> {
        // Slicing needs no stream state; rewinding the cursor suffices.
        self.cursor = 0;
        Ok(())
    }
}
