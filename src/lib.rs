// src/lib.rs
//! Dynamic time warping alignment of Korean text at the jamo level.
//!
//! A reference text and a raw variant of it (misspelled, dialectal,
//! transcribed) are decomposed into jamo and aligned under a phonologically
//! informed cost model. The result pairs every raw jamo with a reference
//! jamo and maps reference syllables to raw syllables.
//!
//! ```no_run
//! use hangul_align::{Aligner, CostTables};
//! use std::sync::Arc;
//!
//! let aligner = Aligner::new(Arc::new(CostTables::uniform()));
//! let alignment = aligner.align("가", "가아아")?;
//! assert_eq!(alignment.syllable_mapping[&0], vec![0, 1, 2]);
//! # Ok::<(), hangul_align::Error>(())
//! ```

pub mod c_api;
pub mod config;
pub mod core;
pub mod error;
pub mod fuzzy;
pub mod mapping;
pub mod persistence;

pub use crate::config::AlignConfig;
pub use crate::core::engine::{align, Aligner, Alignment, AlignmentSummary, CostMatrix};
pub use crate::core::tables::CostTables;
pub use crate::core::types::{AlignedPair, Cell, IndexedJamo, JamoAlignment, JamoClass, SyllableMapping};
pub use crate::error::{Error, Result};
pub use crate::fuzzy::cost::Thresholds;
