//! Parquet vector dataset reader
//!
//! Reads one named column of vector values from a parquet file, delivered
//! by the arrow reader as fixed-size record batches and reassembled into
//! arbitrary contiguous row ranges by [`BatchStitcher`]. The total row
//! count comes from the parquet footer metadata, so `size()` never scans
//! data pages.
//!
//! Supported column shapes are `FixedSizeList` and `List` of `Float32` (or
//! `Float64`, narrowed on decode).

use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, FixedSizeListArray, Float32Array, Float64Array, ListArray};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ProjectionMask;

use super::reader::{clamp_end, VectorChunk, VectorReader};
use super::stitch::{BatchRows, BatchStitcher};
use crate::utils::{DatasetError, Result};

/// Rows per batch pulled from the arrow reader
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Open-file state, discarded entirely on `reset`
struct OpenState {
    total_rows: usize,
    stitcher: BatchStitcher<ColumnBatches>,
}

/// Parquet-backed vector dataset reader
pub struct ParquetDataset {
    path: PathBuf,
    column: String,
    batch_size: usize,
    cursor: usize,
    state: Option<OpenState>,
}

impl ParquetDataset {
    /// Create a reader over one vector column of a parquet file
    ///
    /// The file is opened on first access, not here.
    pub fn new<P: AsRef<Path>>(path: P, column: &str) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(DatasetError::Config(
                "dataset path cannot be empty".to_string(),
            ));
        }
        if column.is_empty() {
            return Err(DatasetError::Config(
                "dataset column name cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            path: path.to_path_buf(),
            column: column.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            cursor: 0,
            state: None,
        })
    }

    /// Override the underlying batch size (rows per pulled batch)
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    fn ensure_open(&mut self) -> Result<&mut OpenState> {
        if self.state.is_none() {
            self.state = Some(self.open()?);
        }
        Ok(self.state.as_mut().unwrap())
    }

    fn open(&self) -> Result<OpenState> {
        let file = File::open(&self.path).map_err(DatasetError::OpenFailed)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

        let total_rows = builder.metadata().file_metadata().num_rows().max(0) as usize;
        if builder.schema().field_with_name(&self.column).is_err() {
            return Err(DatasetError::MissingColumn(self.column.clone()));
        }

        let mask = ProjectionMask::columns(builder.parquet_schema(), [self.column.as_str()]);
        let reader = builder
            .with_projection(mask)
            .with_batch_size(self.batch_size)
            .build()?;

        Ok(OpenState {
            total_rows,
            stitcher: BatchStitcher::new(ColumnBatches {
                reader,
                column: self.column.clone(),
            }),
        })
    }

    #[cfg(test)]
    fn window(&self) -> Option<(usize, usize, bool)> {
        self.state
            .as_ref()
            .map(|s| (s.stitcher.window().0, s.stitcher.window().1, s.stitcher.has_leftover()))
    }
}

impl VectorReader for ParquetDataset {
    fn read(&mut self, chunk_size: usize) -> Result<Option<VectorChunk>> {
        let cursor = self.cursor;
        let state = self.ensure_open()?;
        if cursor >= state.total_rows {
            return Ok(None);
        }

        let end = clamp_end(cursor, chunk_size, state.total_rows);
        let values = state.stitcher.extract(cursor, end, state.total_rows)?;
        let dim = state
            .stitcher
            .dim()
            .ok_or_else(|| DatasetError::Format("no batches decoded".to_string()))?;
        self.cursor = end;
        Ok(Some(VectorChunk::new(values, dim)?))
    }

    fn seek(&mut self, offset: usize) -> Result<()> {
        let size = self.size()?;
        if offset >= size {
            return Err(DatasetError::OffsetOutOfRange { offset, size });
        }
        // Logical reposition only; the stitcher skips forward on the next
        // read. Ranges behind the current window fail fast there.
        self.cursor = offset;
        Ok(())
    }

    fn size(&mut self) -> Result<usize> {
        Ok(self.ensure_open()?.total_rows)
    }

    fn reset(&mut self) -> Result<()> {
        // The batch iterator cannot rewind; drop the whole open state so
        // the next access reopens the file from the beginning.
        self.state = None;
        self.cursor = 0;
        Ok(())
    }
}

/// Iterator adapter: record batches -> decoded vector rows of one column
struct ColumnBatches {
    reader: ParquetRecordBatchReader,
    column: String,
}

impl Iterator for ColumnBatches {
    type Item = Result<BatchRows>;

    fn next(&mut self) -> Option<Self::Item> {
        let batch = match self.reader.next()? {
            Ok(batch) => batch,
            Err(e) => return Some(Err(e.into())),
        };
        Some(decode_column(&batch, &self.column))
    }
}

fn decode_column(batch: &RecordBatch, column: &str) -> Result<BatchRows> {
    let col = batch
        .column_by_name(column)
        .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))?;

    if let Some(list) = col.as_any().downcast_ref::<FixedSizeListArray>() {
        let dim = list.value_length() as usize;
        let values = decode_values(list.values().as_ref(), column)?;
        return Ok(BatchRows { values, dim });
    }

    if let Some(list) = col.as_any().downcast_ref::<ListArray>() {
        return decode_list(list, column);
    }

    Err(DatasetError::UnsupportedColumnType {
        column: column.to_string(),
        expected: "FixedSizeList or List of Float32/Float64".to_string(),
        got: format!("{:?}", col.data_type()),
    })
}

/// Decode a variable-offset list column, enforcing uniform row width
fn decode_list(list: &ListArray, column: &str) -> Result<BatchRows> {
    let rows = list.len();
    let mut dim = None;
    let mut values = Vec::new();
    for i in 0..rows {
        let row = list.value(i);
        let row_dim = row.len();
        match dim {
            None => dim = Some(row_dim),
            Some(d) if d != row_dim => {
                return Err(DatasetError::Format(format!(
                    "column {column} row {i} has {row_dim} values, expected {d}"
                )))
            }
            _ => {}
        }
        values.extend(decode_values(row.as_ref(), column)?);
    }
    Ok(BatchRows {
        values,
        dim: dim.unwrap_or(0),
    })
}

fn decode_values(array: &dyn Array, column: &str) -> Result<Vec<f32>> {
    if let Some(arr) = array.as_any().downcast_ref::<Float32Array>() {
        return Ok(arr.iter().map(|v| v.unwrap_or(f32::NAN)).collect());
    }
    if let Some(arr) = array.as_any().downcast_ref::<Float64Array>() {
        return Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN) as f32).collect());
    }
    Err(DatasetError::UnsupportedColumnType {
        column: column.to_string(),
        expected: "Float32 or Float64".to_string(),
        got: format!("{:?}", array.data_type()),
    })
}
