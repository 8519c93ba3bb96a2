/// A derived metric whose formula divides by zero (or takes log2 of zero)
/// for the observed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("metric `{metric}` is undefined for this source")]
pub struct UndefinedMetric {
    /// Name of the metric that could not be computed.
    pub metric: &'static str,
}

impl UndefinedMetric {
    pub fn new(metric: &'static str) -> Self {
        Self { metric }
    }
}

/// Errors that can abort an analysis run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("parse error in {label}: source is not valid Python")]
    Parse { label: String },

    #[error(transparent)]
    Metric(#[from] UndefinedMetric),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
