//! Shared reader contract for vector datasets
//!
//! Every dataset format implements the same position-aware, chunked access
//! interface: read up to N vectors from the current cursor, seek to an
//! absolute row, query the total row count, and rewind. Underlying files
//! are opened lazily on first access, which is why all operations take
//! `&mut self` and return `Result`.

use crate::utils::{DatasetError, Result};

/// One chunk of fixed-dimension vectors, row-major
///
/// Values are stored flat (`rows * dim` f32 values) to avoid per-row
/// allocations; `row(i)` returns a borrowed slice into the chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorChunk {
    values: Vec<f32>,
    dim: usize,
}

impl VectorChunk {
    /// Build a chunk from flat row-major values
    ///
    /// `values.len()` must be a multiple of `dim`.
    pub fn new(values: Vec<f32>, dim: usize) -> Result<Self> {
        if dim == 0 || values.len() % dim != 0 {
            return Err(DatasetError::Format(format!(
                "chunk of {} values is not a whole number of dimension-{} rows",
                values.len(),
                dim
            )));
        }
        Ok(Self { values, dim })
    }

    /// Number of vectors in this chunk
    #[inline]
    pub fn rows(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Vector dimension
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get vector at row index
    #[inline]
    pub fn row(&self, idx: usize) -> &[f32] {
        let start = idx * self.dim;
        &self.values[start..start + self.dim]
    }

    /// Iterate over vectors in order
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.dim)
    }

    /// Flat row-major values
    #[inline]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Consume the chunk, returning the flat values
    pub fn into_values(self) -> Vec<f32> {
        self.values
    }
}

/// Position-aware chunked reader over one vector dataset file
///
/// Implementations open the underlying file on first `read`, `seek` or
/// `size` call, not at construction. A reader is a single-threaded state
/// machine; wrap it in external synchronization if it must be shared.
pub trait VectorReader {
    /// Read up to `chunk_size` vectors starting at the cursor
    ///
    /// Advances the cursor by the number of vectors actually read. Returns
    /// `Ok(None)` once the cursor has reached the end of the dataset; a
    /// short chunk is only ever returned at true end-of-data. Structural
    /// failures (decode errors, IO errors) surface as `Err`.
    fn read(&mut self, chunk_size: usize) -> Result<Option<VectorChunk>>;

    /// Move the cursor to an absolute row offset
    ///
    /// Fails with [`DatasetError::OffsetOutOfRange`] unless
    /// `offset < size()`.
    fn seek(&mut self, offset: usize) -> Result<()>;

    /// Total number of vectors in the dataset
    fn size(&mut self) -> Result<usize>;

    /// Rewind the reader to the beginning
    ///
    /// All readers return the cursor to row 0. The parquet reader
    /// additionally discards its open file and batch iterator so the next
    /// access reinitializes from scratch; see the format-specific docs.
    fn reset(&mut self) -> Result<()>;
}

/// Bounds-checked end offset for a read request: `min(cursor + chunk, size)`
#[inline]
pub(crate) fn clamp_end(cursor: usize, chunk_size: usize, size: usize) -> usize {
    cursor.saturating_add(chunk_size).min(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_rows_and_slicing() {
        let chunk = VectorChunk::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3).unwrap();
        assert_eq!(chunk.rows(), 2);
        assert_eq!(chunk.dim(), 3);
        assert_eq!(chunk.row(0), &[1.0, 2.0, 3.0]);
        assert_eq!(chunk.row(1), &[4.0, 5.0, 6.0]);

        let rows: Vec<&[f32]> = chunk.iter_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn chunk_rejects_ragged_values() {
        assert!(VectorChunk::new(vec![1.0, 2.0, 3.0], 2).is_err());
        assert!(VectorChunk::new(vec![1.0], 0).is_err());
    }

    #[test]
    fn clamp_end_saturates() {
        assert_eq!(clamp_end(0, 10, 5), 5);
        assert_eq!(clamp_end(3, 10, 5), 5);
        assert_eq!(clamp_end(3, 1, 5), 4);
        assert_eq!(clamp_end(usize::MAX, 10, 5), 5);
    }
}
