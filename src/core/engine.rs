// File: src/core/engine.rs
use crate::core::decompose::{decompose, sanitize, sanitize_keep_spaces, RawSequence};
use crate::core::tables::CostTables;
use crate::core::types::{Cell, JamoAlignment, SyllableMapping};
use crate::error::{Error, Result};
use crate::fuzzy::cost::{CostModel, Thresholds};
use crate::fuzzy::transition::TransitionCost;
use crate::fuzzy::window::WindowFinder;
use crate::mapping;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Accumulated alignment costs, `(n + 1) x (m + 1)`, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl CostMatrix {
    /// Origin 0, everything else unreachable.
    fn new(rows: usize, cols: usize) -> Self {
        let mut cells = vec![f64::INFINITY; rows * cols];
        cells[0] = 0.0;
        Self { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> Option<&[f64]> {
        let start = row.checked_mul(self.cols)?;
        self.cells.get(start..start + self.cols)
    }

    fn set(&mut self, (row, col): Cell, cost: f64) {
        self.cells[row * self.cols + col] = cost;
    }
}

/// Where each cell's best candidate came from. Border cells other than the
/// origin have no predecessor.
#[derive(Debug, Clone)]
struct Predecessors {
    cols: usize,
    cells: Vec<Option<Cell>>,
}

impl Predecessors {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            cells: vec![None; rows * cols],
        }
    }

    fn get(&self, (row, col): Cell) -> Option<Cell> {
        self.cells.get(row * self.cols + col).copied().flatten()
    }

    fn set(&mut self, (row, col): Cell, prev: Cell) {
        self.cells[row * self.cols + col] = Some(prev);
    }
}

/// Dynamic time warping over one reference sequence and one raw sequence.
pub struct AlignmentEngine<'a, 't> {
    reference: &'a [char],
    raw: &'a RawSequence,
    model: CostModel<'t>,
    multi_unit: bool,
}

impl<'a, 't> AlignmentEngine<'a, 't> {
    pub fn new(
        reference: &'a [char],
        raw: &'a RawSequence,
        model: CostModel<'t>,
        multi_unit: bool,
    ) -> Self {
        Self {
            reference,
            raw,
            model,
            multi_unit,
        }
    }

    /// Fills the matrix and returns it with the path from the origin to the
    /// far corner.
    pub fn run(&self) -> Result<(CostMatrix, Vec<Cell>)> {
        let (matrix, predecessors) = self.fill();
        let path = self.backtrace(&predecessors)?;
        Ok((matrix, path))
    }

    fn fill(&self) -> (CostMatrix, Predecessors) {
        let rows = self.reference.len() + 1;
        let cols = self.raw.len() + 1;
        let mut matrix = CostMatrix::new(rows, cols);
        let mut predecessors = Predecessors::new(rows, cols);

        let finder = WindowFinder::new(self.model);
        let transitions = TransitionCost::new(self.model, self.reference, self.raw.jamo());

        for i in 1..rows {
            for j in 1..cols {
                let ref_idx = i - 1;
                let raw_idx = j - 1;

                let (ref_window, raw_window) = if self.multi_unit {
                    self.raw.spaced_position(raw_idx).map_or((1, 1), |spaced_idx| {
                        finder.max_offset(self.reference, ref_idx, self.raw.spaced(), spaced_idx)
                    })
                } else {
                    (1, 1)
                };

                // Candidates are visited in reverse of ascending offset order
                // and only a strictly cheaper one replaces the current best,
                // so among equal costs the last ascending candidate wins.
                let mut best: Option<(f64, Cell)> = None;
                for ref_offset in (0..=ref_window).rev() {
                    for raw_offset in (0..=raw_window).rev() {
                        if ref_offset == 0 && raw_offset == 0 {
                            continue;
                        }
                        let (Some(prev_i), Some(prev_j)) =
                            (i.checked_sub(ref_offset), j.checked_sub(raw_offset))
                        else {
                            continue;
                        };
                        let step = if self.multi_unit {
                            transitions.transition_cost(ref_offset, ref_idx, raw_offset, raw_idx)
                        } else {
                            self.model
                                .cost(self.reference[ref_idx], self.raw.jamo()[raw_idx])
                        };
                        let accumulated = matrix.get(prev_i, prev_j).unwrap_or(f64::INFINITY) + step;
                        match best {
                            Some((cost, _)) if accumulated >= cost => {}
                            _ => best = Some((accumulated, (prev_i, prev_j))),
                        }
                    }
                }

                let (cost, prev) = best.unwrap_or((f64::INFINITY, (i - 1, j - 1)));
                matrix.set((i, j), cost);
                predecessors.set((i, j), prev);
            }
        }
        (matrix, predecessors)
    }

    fn backtrace(&self, predecessors: &Predecessors) -> Result<Vec<Cell>> {
        let mut current = (self.reference.len(), self.raw.len());
        let mut path = vec![current];

        while current != (0, 0) {
            let (row, col) = current;
            let Some(prev) = predecessors.get(current) else {
                return Err(self.path_error(current, "no predecessor".to_string()));
            };
            let (prev_row, prev_col) = prev;
            let progresses =
                prev_row <= row && prev_col <= col && (prev_row < row || prev_col < col);
            if !progresses {
                return Err(self.path_error(
                    current,
                    format!("step to ({prev_row}, {prev_col}) does not move toward the origin"),
                ));
            }
            path.push(prev);
            current = prev;
        }

        path.reverse();
        Ok(path)
    }

    fn path_error(&self, (row, col): Cell, reason: String) -> Error {
        Error::Path {
            row,
            col,
            reason,
            reference: self.reference.iter().collect(),
            raw: self.raw.jamo().iter().collect(),
        }
    }
}

/// Everything one alignment produces.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Sanitized reference text.
    pub reference: String,
    /// Sanitized raw text, spaces removed.
    pub raw: String,
    pub matrix: CostMatrix,
    pub path: Vec<Cell>,
    pub jamo_alignment: JamoAlignment,
    pub syllable_mapping: SyllableMapping,
}

impl Alignment {
    /// Accumulated cost at the far corner of the matrix.
    pub fn total_cost(&self) -> f64 {
        self.path
            .last()
            .and_then(|&(row, col)| self.matrix.get(row, col))
            .unwrap_or(f64::INFINITY)
    }

    /// True when some cell on the reported path is unreachable.
    pub fn crosses_infinite_cost(&self) -> bool {
        self.path
            .iter()
            .any(|&(row, col)| self.matrix.get(row, col).is_some_and(f64::is_infinite))
    }

    /// The syllable mapping with indices resolved to the syllables
    /// themselves.
    pub fn syllable_pairs(&self) -> Vec<(char, Vec<char>)> {
        let reference: Vec<char> = self.reference.chars().collect();
        let raw: Vec<char> = self.raw.chars().collect();
        self.syllable_mapping
            .iter()
            .filter_map(|(&ref_idx, raw_indices)| {
                let syllable = *reference.get(ref_idx)?;
                let targets = raw_indices.iter().filter_map(|&i| raw.get(i).copied()).collect();
                Some((syllable, targets))
            })
            .collect()
    }

    /// Serializable view used by the command-line tools and the C ABI.
    pub fn summary(&self) -> AlignmentSummary {
        let total = self.total_cost();
        AlignmentSummary {
            reference: self.reference.clone(),
            raw: self.raw.clone(),
            total_cost: total.is_finite().then_some(total),
            crosses_infinite_cost: self.crosses_infinite_cost(),
            path: self.path.clone(),
            jamo_alignment: self.jamo_alignment.clone(),
            syllable_mapping: self.syllable_mapping.clone(),
        }
    }
}

/// JSON shape of an [`Alignment`]. An unreachable total is `null`.
#[derive(Debug, Clone, Serialize)]
pub struct AlignmentSummary {
    pub reference: String,
    pub raw: String,
    pub total_cost: Option<f64>,
    pub crosses_infinite_cost: bool,
    pub path: Vec<Cell>,
    pub jamo_alignment: JamoAlignment,
    pub syllable_mapping: SyllableMapping,
}

/// Aligns a reference text with a raw text using `tables`.
///
/// Both texts are sanitized first; if either has no Hangul left the call
/// fails with [`Error::EmptyInput`] before any matrix is built.
pub fn align(
    tables: &CostTables,
    thresholds: Thresholds,
    reference: &str,
    raw: &str,
    multi_unit: bool,
) -> Result<Alignment> {
    let clean_reference = sanitize(reference);
    let clean_raw = sanitize(raw);
    if clean_reference.is_empty() || clean_raw.is_empty() {
        return Err(Error::EmptyInput {
            reference: reference.to_string(),
            raw: raw.to_string(),
        });
    }

    let reference_jamo = decompose(&clean_reference);
    let raw_sequence = RawSequence::from_spaced_text(&sanitize_keep_spaces(raw));
    debug!(
        reference_len = reference_jamo.len(),
        raw_len = raw_sequence.len(),
        multi_unit,
        "aligning"
    );

    let model = CostModel::new(tables, thresholds);
    let engine = AlignmentEngine::new(&reference_jamo, &raw_sequence, model, multi_unit);
    let (matrix, path) = engine.run()?;

    let raw_jamo = raw_sequence.jamo();
    let pairs = mapping::from_path(&path, &reference_jamo, raw_jamo)?;
    let jamo_alignment = mapping::normalize(&pairs, raw_jamo);
    let syllable_mapping =
        mapping::to_syllable_mapping(&jamo_alignment, &clean_reference, &clean_raw)?;

    let alignment = Alignment {
        reference: clean_reference,
        raw: clean_raw,
        matrix,
        path,
        jamo_alignment,
        syllable_mapping,
    };
    if alignment.crosses_infinite_cost() {
        warn!(
            reference = %alignment.reference,
            raw = %alignment.raw,
            "alignment path crosses an unreachable cell"
        );
    }
    debug!(total_cost = alignment.total_cost(), "aligned");
    Ok(alignment)
}

/// Reusable alignment entry point over shared tables. Cloning is cheap and
/// clones may be moved to other threads.
#[derive(Debug, Clone)]
pub struct Aligner {
    tables: Arc<CostTables>,
    thresholds: Thresholds,
    multi_unit: bool,
}

impl Aligner {
    pub fn new(tables: Arc<CostTables>) -> Self {
        Self {
            tables,
            thresholds: Thresholds::default(),
            multi_unit: true,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn with_multi_unit(mut self, multi_unit: bool) -> Self {
        self.multi_unit = multi_unit;
        self
    }

    pub fn tables(&self) -> &CostTables {
        &self.tables
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn multi_unit(&self) -> bool {
        self.multi_unit
    }

    pub fn align(&self, reference: &str, raw: &str) -> Result<Alignment> {
        align(&self.tables, self.thresholds, reference, raw, self.multi_unit)
    }
}
