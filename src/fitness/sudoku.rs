//! Sudoku scoring.
//!
//! A candidate is a flat, row-major grid of 81 digits. Its fitness counts
//! constraint violations:
//!
//! ```text
//! row duplicates + column duplicates + box duplicates
//!     + 10 × (given cells whose digit was changed)
//! ```
//!
//! where a unit's duplicates are `9 - distinct digits in the unit`. A
//! solved grid scores 0.
//!
//! Candidates are evolved as a [`PermutationGenome`] over nine copies of
//! each digit, so every operator keeps the digit counts correct and only
//! placement is searched.

use crate::engine::FitnessFunction;
use crate::error::{EvolveError, EvolveResult};
use crate::genome::PermutationGenome;

/// Side length of the grid.
pub const DIM: usize = 9;

/// Side length of a box.
pub const BOX: usize = 3;

/// Number of cells.
pub const CELLS: usize = DIM * DIM;

/// Penalty per given cell whose digit was changed.
pub const GIVEN_PENALTY: u32 = 10;

/// Genome type used for sudoku candidates.
pub type SudokuGenome = PermutationGenome<u8, u32>;

/// A 9x9 puzzle template; `0` marks an unknown cell.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SudokuPuzzle {
    cells: Vec<u8>,
}

impl SudokuPuzzle {
    /// Creates a puzzle from nine rows of nine cells.
    ///
    /// # Errors
    /// `InvalidConfiguration` if a cell is greater than 9.
    pub fn from_rows(rows: [[u8; DIM]; DIM]) -> EvolveResult<Self> {
        let cells: Vec<u8> = rows.iter().flatten().copied().collect();
        Self::from_flat(&cells)
    }

    /// Creates a puzzle from a flat row-major sequence of 81 cells.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the length is not 81 or a cell is greater
    /// than 9.
    pub fn from_flat(cells: &[u8]) -> EvolveResult<Self> {
        check_len(cells)?;
        if let Some(pos) = cells.iter().position(|&c| c > 9) {
            return Err(EvolveError::config(format!(
                "cell {pos} holds {}, expected 0-9",
                cells[pos]
            )));
        }
        Ok(Self {
            cells: cells.to_vec(),
        })
    }

    /// Parses 81 characters of `1`-`9` for givens and `0` or `.` for
    /// unknowns. Whitespace is ignored.
    ///
    /// ```
    /// use u_evolve::fitness::sudoku::SudokuPuzzle;
    ///
    /// let text = "53..7.... 6..195... .98....6. 8...6...3 4..8.3..1 \
    ///             7...2...6 .6....28. ...419..5 ....8..79";
    /// let puzzle = SudokuPuzzle::parse(text).unwrap();
    /// assert_eq!(puzzle.givens(), 30);
    /// ```
    pub fn parse(text: &str) -> EvolveResult<Self> {
        let cells = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Ok(0),
                '0'..='9' => Ok(c as u8 - b'0'),
                other => Err(EvolveError::config(format!(
                    "unexpected character {other:?} in puzzle"
                ))),
            })
            .collect::<EvolveResult<Vec<u8>>>()?;
        Self::from_flat(&cells)
    }

    /// A classic puzzle with a unique solution.
    pub fn example() -> Self {
        Self {
            cells: EXAMPLE.to_vec(),
        }
    }

    /// The flat row-major cells, `0` for unknown.
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Number of given (non-zero) cells.
    pub fn givens(&self) -> usize {
        self.cells.iter().filter(|&&c| c != 0).count()
    }

    /// Scores a flat row-major grid of 81 digits. Lower is better.
    ///
    /// # Errors
    /// `InvalidConfiguration` if the grid does not have 81 cells.
    pub fn score(&self, grid: &[u8]) -> EvolveResult<u32> {
        check_len(grid)?;

        let rows: u32 = (0..DIM).map(|r| duplicates(grid, |i| r * DIM + i)).sum();
        let cols: u32 = (0..DIM).map(|c| duplicates(grid, |i| i * DIM + c)).sum();
        let boxes: u32 = (0..DIM)
            .map(|b| {
                let top = (b / BOX) * BOX;
                let left = (b % BOX) * BOX;
                duplicates(grid, |i| (top + i / BOX) * DIM + left + i % BOX)
            })
            .sum();

        let altered = self
            .cells
            .iter()
            .zip(grid)
            .filter(|&(&given, &cell)| given != 0 && given != cell)
            .count() as u32;

        Ok(rows + cols + boxes + GIVEN_PENALTY * altered)
    }

    /// Nine copies of each digit 1-9, the gene multiset of every candidate.
    pub fn seed_genes() -> Vec<u8> {
        (1..=DIM as u8)
            .flat_map(|d| std::iter::repeat(d).take(DIM))
            .collect()
    }

    /// Template genome over [`seed_genes`](Self::seed_genes).
    pub fn seed_genome() -> SudokuGenome {
        PermutationGenome::new(Self::seed_genes())
    }

    /// Fitness function scoring genomes against this puzzle.
    pub fn fitness(&self) -> SudokuFitness {
        SudokuFitness {
            puzzle: self.clone(),
        }
    }
}

/// [`FitnessFunction`] adapter for [`SudokuPuzzle::score`].
///
/// A candidate of the wrong length is reported as
/// [`EvolveError::Fitness`].
#[derive(Debug, Clone)]
pub struct SudokuFitness {
    puzzle: SudokuPuzzle,
}

impl FitnessFunction<SudokuGenome> for SudokuFitness {
    fn evaluate(&mut self, genome: &SudokuGenome) -> EvolveResult<u32> {
        self.puzzle.score(genome.genes()).map_err(|err| match err {
            EvolveError::InvalidConfiguration(msg) => EvolveError::fitness(msg),
            other => other,
        })
    }
}

fn check_len(cells: &[u8]) -> EvolveResult<()> {
    if cells.len() != CELLS {
        return Err(EvolveError::config(format!(
            "expected {CELLS} cells, got {}",
            cells.len()
        )));
    }
    Ok(())
}

/// `9 - distinct digits` over the unit whose i-th cell is `grid[cell(i)]`.
fn duplicates(grid: &[u8], cell: impl Fn(usize) -> usize) -> u32 {
    let mut seen = [false; 256];
    let mut distinct = 0u32;
    for i in 0..DIM {
        let digit = grid[cell(i)] as usize;
        if !seen[digit] {
            seen[digit] = true;
            distinct += 1;
        }
    }
    DIM as u32 - distinct
}

#[rustfmt::skip]
const EXAMPLE: [u8; CELLS] = [
    5, 3, 0, 0, 7, 0, 0, 0, 0,
    6, 0, 0, 1, 9, 5, 0, 0, 0,
    0, 9, 8, 0, 0, 0, 0, 6, 0,
    8, 0, 0, 0, 6, 0, 0, 0, 3,
    4, 0, 0, 8, 0, 3, 0, 0, 1,
    7, 0, 0, 0, 2, 0, 0, 0, 6,
    0, 6, 0, 0, 0, 0, 2, 8, 0,
    0, 0, 0, 4, 1, 9, 0, 0, 5,
    0, 0, 0, 0, 8, 0, 0, 7, 9,
];
