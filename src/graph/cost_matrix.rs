//! Dense resharding cost matrix for one directed edge.

use crate::store::{Cost, StrategyIndex};

/// Row-major `rows x cols` table. Rows are source strategies, columns are
/// destination strategies.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Cost>,
}

impl CostMatrix {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(StrategyIndex, StrategyIndex) -> Cost) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                data.push(f(i, j));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize { self.rows }
    pub fn cols(&self) -> usize { self.cols }
    pub fn as_slice(&self) -> &[Cost] { &self.data }

    #[inline(always)]
    pub fn get(&self, src: StrategyIndex, dst: StrategyIndex) -> Option<Cost> {
        if src < self.rows && dst < self.cols {
            Some(self.data[src * self.cols + dst])
        } else {
            None
        }
    }

    pub fn row(&self, src: StrategyIndex) -> &[Cost] {
        &self.data[src * self.cols..(src + 1) * self.cols]
    }

    /// First column holding the row minimum.
    ///
    /// Infeasible entries never win against a finite one; a fully infeasible
    /// row resolves to column 0 so the merge map stays total.
    pub fn argmin_row(&self, src: StrategyIndex) -> Option<StrategyIndex> {
        if src >= self.rows || self.cols == 0 {
            return None;
        }
        let row = self.row(src);
        let mut best = 0;
        for (j, &cost) in row.iter().enumerate().skip(1) {
            if cost < row[best] {
                best = j;
            }
        }
        Some(best)
    }

    /// Element-wise `self += other`. Shapes must agree.
    pub fn accumulate(&mut self, other: &CostMatrix) -> bool {
        if self.rows != other.rows || self.cols != other.cols {
            return false;
        }
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += *b;
        }
        true
    }

    pub fn entries(&self) -> impl Iterator<Item = ((StrategyIndex, StrategyIndex), Cost)> + '_ {
        let cols = self.cols;
        self.data.iter().enumerate().map(move |(k, &c)| ((k / cols, k % cols), c))
    }
}
