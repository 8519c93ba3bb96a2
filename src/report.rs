use serde::{Deserialize, Serialize};

/// Occurrences of a single counted construct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructCount {
    pub construct: String,
    pub count: u64,
}

/// Counts for one Halstead group (operators or operands) plus the group total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupCounts {
    /// Per-construct counts, in the group's canonical order.
    pub counts: Vec<ConstructCount>,
    /// Total occurrences across the group (N1 or N2).
    pub total: u64,
}

impl GroupCounts {
    /// Count recorded for a construct label, zero when the label is unknown.
    pub fn count_of(&self, label: &str) -> u64 {
        self.counts
            .iter()
            .find(|c| c.construct == label)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

/// Derived software-science metrics for the whole program.
///
/// A metric whose formula divides by zero (or takes log2 of zero) for the
/// observed counts is absent rather than NaN or infinite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramMetrics {
    /// η1: distinct operator constructs observed.
    pub distinct_operators: u64,
    /// η2: distinct operand constructs observed.
    pub distinct_operands: u64,
    /// η1 + η2.
    pub vocabulary: u64,
    /// N1 + N2.
    pub length: u64,
    /// η1·log2(η1) + η2·log2(η2).
    pub estimated_length: Option<f64>,
    /// length·log2(vocabulary).
    pub volume: Option<f64>,
    /// (η1 / 2)·(N2 / η2).
    pub difficulty: Option<f64>,
    /// difficulty·volume.
    pub effort: Option<f64>,
}

/// Metadata about the analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Diagnostic label for the input (file path or stream label), if any.
    pub label: Option<String>,
    pub lines_of_code: usize,
}

/// The full analysis report for a single source input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub operators: GroupCounts,
    pub operands: GroupCounts,
    pub program: ProgramMetrics,
    pub metadata: ReportMetadata,
}
