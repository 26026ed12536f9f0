//! Windowed batch stitching
//!
//! A parquet file is only ever delivered as fixed-size row batches, so an
//! arbitrary contiguous row range has to be reassembled from one or more
//! batches. The stitcher tracks the row window `[window_start, window_end)`
//! covered by the most recently pulled batch and carries a partially
//! consumed batch across calls, so no row is fetched twice and at most one
//! batch is held in memory beyond the accumulated output.
//!
//! Callers are expected to issue monotonically increasing, contiguous
//! ranges. Forward gaps are handled by discarding batches; a range that
//! ends before the current window cannot be served (the batch iterator does
//! not rewind) and fails fast.

use crate::utils::{DatasetError, Result};

/// One decoded batch of fixed-dimension rows, flat row-major values
#[derive(Debug, Clone)]
pub(crate) struct BatchRows {
    pub values: Vec<f32>,
    pub dim: usize,
}

impl BatchRows {
    pub fn rows(&self) -> usize {
        self.values.len() / self.dim
    }
}

/// Reassembles contiguous row ranges from a fixed-size batch iterator
pub(crate) struct BatchStitcher<I> {
    iter: I,
    leftover: Option<BatchRows>,
    window_start: usize,
    window_end: usize,
    dim: Option<usize>,
}

impl<I> BatchStitcher<I>
where
    I: Iterator<Item = Result<BatchRows>>,
{
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            leftover: None,
            window_start: 0,
            window_end: 0,
            dim: None,
        }
    }

    /// Dimension observed on the first batch, if any batch was pulled yet
    pub fn dim(&self) -> Option<usize> {
        self.dim
    }

    /// Extract the flat values for rows `[start, end)`
    ///
    /// `declared` is the dataset's declared total row count, reported when
    /// the iterator runs dry before the range is filled.
    pub fn extract(&mut self, mut start: usize, end: usize, declared: usize) -> Result<Vec<f32>> {
        let mut out = Vec::new();
        loop {
            let batch = match self.leftover.take() {
                // A carried-over batch re-enters without moving the window.
                Some(batch) => batch,
                None => match self.iter.next() {
                    Some(batch) => {
                        let batch = batch?;
                        self.check_dim(&batch)?;
                        self.window_start = self.window_end;
                        self.window_end = self.window_start + batch.rows();
                        batch
                    }
                    None => {
                        return Err(DatasetError::BatchesExhausted {
                            delivered: self.window_end,
                            declared,
                        })
                    }
                },
            };

            // Batch lies entirely before the target range: drop it. The
            // leftover slot stays empty, so the next turn always pulls a
            // fresh batch and the loop advances.
            if start > self.window_end {
                continue;
            }

            if start < self.window_start {
                start = self.window_start;
                if end <= start {
                    // The whole range is behind the window; the iterator
                    // cannot rewind to serve it.
                    return Err(DatasetError::OffsetOutOfRange {
                        offset: end,
                        size: start,
                    });
                }
            }

            let dim = batch.dim;
            let begin = (start - self.window_start) * dim;
            if end <= self.window_end {
                let stop = (end - self.window_start) * dim;
                out.extend_from_slice(&batch.values[begin..stop]);
                // Remainder beyond `end` is still unread; keep the batch.
                self.leftover = Some(batch);
                break;
            }

            out.extend_from_slice(&batch.values[begin..]);
            start = self.window_end;
        }
        Ok(out)
    }

    fn check_dim(&mut self, batch: &BatchRows) -> Result<()> {
        match self.dim {
            None => {
                self.dim = Some(batch.dim);
                Ok(())
            }
            Some(dim) if dim == batch.dim => Ok(()),
            Some(dim) => Err(DatasetError::Format(format!(
                "batch dimension changed from {} to {}",
                dim, batch.dim
            ))),
        }
    }

    #[cfg(test)]
    pub fn window(&self) -> (usize, usize) {
        (self.window_start, self.window_end)
    }

    #[cfg(test)]
    pub fn has_leftover(&self) -> bool {
        self.leftover.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Batches of the given sizes; row r holds [r, r, ...] so values
    /// identify their source row. Counts how many batches were pulled.
    fn batches(
        sizes: &[usize],
        dim: usize,
    ) -> (
        impl Iterator<Item = Result<BatchRows>>,
        Rc<Cell<usize>>,
    ) {
        let pulls = Rc::new(Cell::new(0));
        let counter = pulls.clone();
        let mut next_row = 0usize;
        let sizes: Vec<usize> = sizes.to_vec();
        let iter = sizes.into_iter().map(move |rows| {
            counter.set(counter.get() + 1);
            let mut values = Vec::with_capacity(rows * dim);
            for r in next_row..next_row + rows {
                values.extend(std::iter::repeat(r as f32).take(dim));
            }
            next_row += rows;
            Ok(BatchRows { values, dim })
        });
        (iter, pulls)
    }

    fn rows_of(values: &[f32], dim: usize) -> Vec<f32> {
        values.iter().step_by(dim).copied().collect()
    }

    #[test]
    fn range_spanning_batch_boundary() {
        let (iter, pulls) = batches(&[500, 500, 300], 2);
        let mut stitcher = BatchStitcher::new(iter);

        let values = stitcher.extract(450, 950, 1300).unwrap();
        assert_eq!(values.len(), 500 * 2);

        let rows = rows_of(&values, 2);
        assert_eq!(rows[0], 450.0);
        assert_eq!(rows[499], 949.0);

        // Batch 1 was consumed, batch 2 is held as leftover for [950, 1000):
        // exactly two pulls, window covering the second batch.
        assert_eq!(pulls.get(), 2);
        assert_eq!(stitcher.window(), (500, 1000));
        assert!(stitcher.has_leftover());

        // The next contiguous range drains the leftover without re-fetching.
        let tail = stitcher.extract(950, 1000, 1300).unwrap();
        assert_eq!(rows_of(&tail, 2), (950..1000).map(|r| r as f32).collect::<Vec<_>>());
        assert_eq!(pulls.get(), 2);
    }

    #[test]
    fn contiguous_ranges_cover_everything_once() {
        let (iter, pulls) = batches(&[5, 5, 3], 3);
        let mut stitcher = BatchStitcher::new(iter);

        let mut all = Vec::new();
        for (start, end) in [(0, 4), (4, 8), (8, 13)] {
            all.extend(stitcher.extract(start, end, 13).unwrap());
        }
        assert_eq!(rows_of(&all, 3), (0..13).map(|r| r as f32).collect::<Vec<_>>());
        assert_eq!(pulls.get(), 3);
    }

    #[test]
    fn forward_gap_discards_batches() {
        let (iter, pulls) = batches(&[500, 500, 300], 1);
        let mut stitcher = BatchStitcher::new(iter);

        // Jump straight into the third batch.
        let values = stitcher.extract(1200, 1290, 1300).unwrap();
        assert_eq!(values[0], 1200.0);
        assert_eq!(values.len(), 90);
        assert_eq!(pulls.get(), 3);
        assert!(stitcher.has_leftover());
    }

    #[test]
    fn forward_gap_with_leftover_terminates() {
        let (iter, _pulls) = batches(&[500, 500, 300], 1);
        let mut stitcher = BatchStitcher::new(iter);

        // Leave batch 1 partially consumed, then skip far ahead.
        stitcher.extract(0, 10, 1300).unwrap();
        assert!(stitcher.has_leftover());

        let values = stitcher.extract(1100, 1110, 1300).unwrap();
        assert_eq!(values[0], 1100.0);
    }

    #[test]
    fn exhausted_iterator_is_an_error() {
        let (iter, _pulls) = batches(&[500, 500], 1);
        let mut stitcher = BatchStitcher::new(iter);

        let err = stitcher.extract(900, 1100, 1300).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::BatchesExhausted {
                delivered: 1000,
                declared: 1300
            }
        ));
    }

    #[test]
    fn range_behind_window_fails_fast() {
        let (iter, _pulls) = batches(&[500, 500], 1);
        let mut stitcher = BatchStitcher::new(iter);

        stitcher.extract(600, 610, 1000).unwrap();
        // [100, 200) ended long before the current window [500, 1000).
        let err = stitcher.extract(100, 200, 1000).unwrap_err();
        assert!(matches!(err, DatasetError::OffsetOutOfRange { .. }));
    }

    #[test]
    fn start_behind_window_is_clamped() {
        let (iter, _pulls) = batches(&[500, 500], 1);
        let mut stitcher = BatchStitcher::new(iter);

        stitcher.extract(600, 610, 1000).unwrap();
        // Start is clamped up to the window start; rows [500, 700) come out
        // as [window_start, 700).
        let values = stitcher.extract(400, 700, 1000).unwrap();
        assert_eq!(values[0], 500.0);
        assert_eq!(values.len(), 200);
    }

    #[test]
    fn dimension_change_is_rejected() {
        let bad = vec![
            Ok(BatchRows {
                values: vec![0.0; 8],
                dim: 2,
            }),
            Ok(BatchRows {
                values: vec![0.0; 12],
                dim: 3,
            }),
        ];
        let mut stitcher = BatchStitcher::new(bad.into_iter());
        let err = stitcher.extract(0, 8, 8).unwrap_err();
        assert!(matches!(err, DatasetError::Format(_)));
    }
}
