//! Comparators: presence/absence over identifier sets and paired-value
//! statistics over abundances and distance matrices.

pub mod set;
pub mod stats;
pub mod abundance;
pub mod matrix;

pub use abundance::{
    compare_abundances, compare_color_abundances, compare_colored, AbundanceComparison, AbundanceDifference,
    ColorDifference, ColoredComparison, RecordCounts,
};
pub use matrix::{
    align_labels, compare_matrices, BiasAnalysis, BiasVerdict, LabelAlignment, MatrixCompareOptions,
    MatrixComparison, QualityRating, WorstCase,
};
pub use set::{compare_sets, SetComparison};
pub use stats::ErrorSummary;
