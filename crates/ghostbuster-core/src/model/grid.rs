use super::cell::Cell;

/// Square board of `size × size` cells addressed row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub const fn cell_count(&self) -> usize {
        self.size * self.size
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < self.size && cell.col < self.size
    }

    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row * self.size + cell.col)
    }

    pub fn cell_at(&self, index: usize) -> Option<Cell> {
        (index < self.cell_count()).then(|| Cell::new(index / self.size, index % self.size))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| Cell::new(row, col)))
    }

    /// The up-to-eight cells at Chebyshev distance 1, clipped to the board.
    pub fn neighbors(&self, cell: Cell) -> Vec<Cell> {
        let mut result = Vec::with_capacity(8);
        let row_start = cell.row.saturating_sub(1);
        let col_start = cell.col.saturating_sub(1);
        let row_end = (cell.row + 1).min(self.size.saturating_sub(1));
        let col_end = (cell.col + 1).min(self.size.saturating_sub(1));
        for row in row_start..=row_end {
            for col in col_start..=col_end {
                let candidate = Cell::new(row, col);
                if candidate != cell {
                    result.push(candidate);
                }
            }
        }
        result
    }
}
