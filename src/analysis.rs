use std::sync::OnceLock;

use tracing::debug;
use tree_sitter::Parser;

use crate::construct::{Construct, Counts};
use crate::error::{Error, Result, UndefinedMetric};
use crate::report::{ConstructCount, GroupCounts, ProgramMetrics, Report, ReportMetadata};
use crate::visitor::CountingVisitor;

/// Outcome of a single derived-metric computation, cheap to cache.
pub type MetricResult = std::result::Result<f64, UndefinedMetric>;

/// One analysis run over a single Python source unit.
///
/// Parsing and the counting traversal happen in [`Analysis::from_source`];
/// the counts never change afterward, so each derived metric is computed at
/// most once and cached for the lifetime of the analysis.
pub struct Analysis {
    counts: Counts,
    label: Option<String>,
    lines_of_code: usize,
    distinct_operators: OnceLock<u64>,
    distinct_operands: OnceLock<u64>,
    total_operators: OnceLock<u64>,
    total_operands: OnceLock<u64>,
    estimated_length: OnceLock<MetricResult>,
    volume: OnceLock<MetricResult>,
    difficulty: OnceLock<MetricResult>,
    effort: OnceLock<MetricResult>,
}

impl Analysis {
    /// Parse `source` and run the counting traversal. The optional label is
    /// used only in diagnostics and report metadata.
    pub fn from_source(source: &str, label: Option<String>) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .expect("Python grammar should be compatible with the linked tree-sitter");

        let parse_failed = |label: &Option<String>| Error::Parse {
            label: label.clone().unwrap_or_else(|| "<input>".to_string()),
        };

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| parse_failed(&label))?;
        if tree.root_node().has_error() {
            return Err(parse_failed(&label));
        }

        let counts = CountingVisitor::new().count(tree.root_node());
        debug!(
            label = label.as_deref().unwrap_or("<input>"),
            operators = counts.total(&Construct::OPERATORS),
            operands = counts.total(&Construct::OPERANDS),
            "counted constructs"
        );

        Ok(Self {
            counts,
            label,
            lines_of_code: source.lines().count(),
            distinct_operators: OnceLock::new(),
            distinct_operands: OnceLock::new(),
            total_operators: OnceLock::new(),
            total_operands: OnceLock::new(),
            estimated_length: OnceLock::new(),
            volume: OnceLock::new(),
            difficulty: OnceLock::new(),
            effort: OnceLock::new(),
        })
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn count(&self, construct: Construct) -> u64 {
        self.counts.get(construct)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// η1: operator constructs observed at least once.
    pub fn distinct_operators(&self) -> u64 {
        *self
            .distinct_operators
            .get_or_init(|| self.counts.distinct(&Construct::OPERATORS))
    }

    /// η2: operand constructs observed at least once.
    pub fn distinct_operands(&self) -> u64 {
        *self
            .distinct_operands
            .get_or_init(|| self.counts.distinct(&Construct::OPERANDS))
    }

    /// N1: total operator occurrences.
    pub fn total_operators(&self) -> u64 {
        *self
            .total_operators
            .get_or_init(|| self.counts.total(&Construct::OPERATORS))
    }

    /// N2: total operand occurrences.
    pub fn total_operands(&self) -> u64 {
        *self
            .total_operands
            .get_or_init(|| self.counts.total(&Construct::OPERANDS))
    }

    /// Vocabulary: η1 + η2.
    pub fn vocabulary(&self) -> u64 {
        self.distinct_operators() + self.distinct_operands()
    }

    /// Length: N1 + N2.
    pub fn length(&self) -> u64 {
        self.total_operators() + self.total_operands()
    }

    /// Estimated length: η1·log2(η1) + η2·log2(η2). Undefined when either
    /// distinct count is zero.
    pub fn estimated_length(&self) -> MetricResult {
        *self.estimated_length.get_or_init(|| {
            let n1 = self.distinct_operators();
            let n2 = self.distinct_operands();
            if n1 == 0 || n2 == 0 {
                return Err(UndefinedMetric::new("estimated_length"));
            }
            let n1 = n1 as f64;
            let n2 = n2 as f64;
            Ok(n1 * n1.log2() + n2 * n2.log2())
        })
    }

    /// Volume: length·log2(vocabulary). Undefined when the vocabulary is zero.
    pub fn volume(&self) -> MetricResult {
        *self.volume.get_or_init(|| {
            let vocabulary = self.vocabulary();
            if vocabulary == 0 {
                return Err(UndefinedMetric::new("volume"));
            }
            Ok(self.length() as f64 * (vocabulary as f64).log2())
        })
    }

    /// Difficulty: (η1 / 2)·(N2 / η2). Undefined when η2 is zero.
    pub fn difficulty(&self) -> MetricResult {
        *self.difficulty.get_or_init(|| {
            let n2 = self.distinct_operands();
            if n2 == 0 {
                return Err(UndefinedMetric::new("difficulty"));
            }
            let n1 = self.distinct_operators() as f64;
            Ok(n1 / 2.0 * self.total_operands() as f64 / n2 as f64)
        })
    }

    /// Effort: difficulty·volume. Undefined when either factor is.
    pub fn effort(&self) -> MetricResult {
        *self.effort.get_or_init(|| {
            let difficulty = self
                .difficulty()
                .map_err(|_| UndefinedMetric::new("effort"))?;
            let volume = self.volume().map_err(|_| UndefinedMetric::new("effort"))?;
            Ok(difficulty * volume)
        })
    }

    /// Build the structured report for this analysis.
    pub fn report(&self) -> Report {
        Report {
            operators: self.group(&Construct::OPERATORS, self.total_operators()),
            operands: self.group(&Construct::OPERANDS, self.total_operands()),
            program: ProgramMetrics {
                distinct_operators: self.distinct_operators(),
                distinct_operands: self.distinct_operands(),
                vocabulary: self.vocabulary(),
                length: self.length(),
                estimated_length: self.estimated_length().ok(),
                volume: self.volume().ok(),
                difficulty: self.difficulty().ok(),
                effort: self.effort().ok(),
            },
            metadata: ReportMetadata {
                label: self.label.clone(),
                lines_of_code: self.lines_of_code,
            },
        }
    }

    fn group(&self, constructs: &[Construct], total: u64) -> GroupCounts {
        GroupCounts {
            counts: constructs
                .iter()
                .map(|&c| ConstructCount {
                    construct: c.label().to_string(),
                    count: self.counts.get(c),
                })
                .collect(),
            total,
        }
    }
}

impl std::fmt::Debug for Analysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analysis")
            .field("label", &self.label)
            .field("distinct_operators", &self.distinct_operators())
            .field("distinct_operands", &self.distinct_operands())
            .field("total_operators", &self.total_operators())
            .field("total_operands", &self.total_operands())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(source: &str) -> Analysis {
        Analysis::from_source(source, None).expect("source should parse")
    }

    #[test]
    fn base_counts_feed_derived_metrics() {
        let a = analysis("x = 1 + 2\n");
        // assignment + arithmetic operators; entity + two literals as operands.
        assert_eq!(a.total_operators(), 2);
        assert_eq!(a.total_operands(), 3);
        assert_eq!(a.distinct_operators(), 2);
        assert_eq!(a.distinct_operands(), 2);
        assert_eq!(a.vocabulary(), 4);
        assert_eq!(a.length(), 5);

        let volume = a.volume().unwrap();
        assert!((volume - 5.0 * 4.0_f64.log2()).abs() < 1e-9);

        // difficulty = (2/2) * (3/2)
        let difficulty = a.difficulty().unwrap();
        assert!((difficulty - 1.5).abs() < 1e-9);

        let effort = a.effort().unwrap();
        assert!((effort - difficulty * volume).abs() < 1e-9);
    }

    #[test]
    fn estimated_length_uses_distinct_counts() {
        let a = analysis("x = 1 + 2\n");
        let expected = 2.0 * 2.0_f64.log2() + 2.0 * 2.0_f64.log2();
        assert!((a.estimated_length().unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn empty_module_reports_undefined_metrics() {
        let a = analysis("");
        assert_eq!(a.total_operators(), 0);
        assert_eq!(a.total_operands(), 0);
        assert_eq!(a.vocabulary(), 0);

        assert_eq!(a.volume(), Err(UndefinedMetric::new("volume")));
        assert_eq!(a.difficulty(), Err(UndefinedMetric::new("difficulty")));
        assert_eq!(a.effort(), Err(UndefinedMetric::new("effort")));
        assert_eq!(
            a.estimated_length(),
            Err(UndefinedMetric::new("estimated_length"))
        );
    }

    #[test]
    fn metric_results_are_stable_across_calls() {
        let a = analysis("if x == 1:\n    y = f(2)\n");
        assert_eq!(a.volume(), a.volume());
        assert_eq!(a.difficulty(), a.difficulty());
        assert_eq!(a.effort(), a.effort());
    }

    #[test]
    fn invalid_python_is_a_parse_error() {
        let err = Analysis::from_source("def broken(:\n", Some("bad.py".into()))
            .expect_err("syntactically broken source should not parse");
        match err {
            Error::Parse { label } => assert_eq!(label, "bad.py"),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
