pub mod analysis;
pub mod construct;
pub mod error;
pub mod output;
pub mod report;
pub mod visitor;

use std::io::Read;
use std::path::Path;

pub use analysis::Analysis;
pub use construct::{Construct, Counts};
pub use error::{Error, Result, UndefinedMetric};
pub use report::Report;

/// Analyze a Python source string and return a report.
pub fn analyze(source: &str) -> Result<Report> {
    Ok(Analysis::from_source(source, None)?.report())
}

/// Analyze a file at the given path and return a report. The path becomes the
/// report's diagnostic label.
pub fn analyze_file(path: &Path) -> Result<Report> {
    let source = std::fs::read_to_string(path)?;
    Ok(Analysis::from_source(&source, Some(path.display().to_string()))?.report())
}

/// Read a byte stream to the end and analyze it. The stream is consumed fully
/// before parsing begins; the label is used only in diagnostics.
pub fn analyze_reader<R: Read>(mut reader: R, label: &str) -> Result<Report> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    Ok(Analysis::from_source(&source, Some(label.to_string()))?.report())
}
