use crate::report::Report;

/// Output format for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}

fn metric_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "undefined".to_string(),
    }
}

/// Format a report as JSON.
pub fn format_json(report: &Report) -> String {
    serde_json::to_string_pretty(report).expect("report should be serializable")
}

/// Format a report as plain text (no colors).
pub fn format_text(report: &Report) -> String {
    let mut out = String::new();

    if let Some(ref label) = report.metadata.label {
        out.push_str(&format!("File: {label}\n"));
    }
    out.push_str(&format!("Lines: {}\n", report.metadata.lines_of_code));

    out.push_str("\n[operators]\n");
    for entry in &report.operators.counts {
        out.push_str(&format!("{}: {}\n", entry.construct, entry.count));
    }
    out.push_str(&format!("N1: {}\n", report.operators.total));

    out.push_str("\n[operands]\n");
    for entry in &report.operands.counts {
        out.push_str(&format!("{}: {}\n", entry.construct, entry.count));
    }
    out.push_str(&format!("N2: {}\n", report.operands.total));

    out.push_str("\n[program]\n");
    let program = &report.program;
    out.push_str(&format!("distinct_operators: {}\n", program.distinct_operators));
    out.push_str(&format!("distinct_operands: {}\n", program.distinct_operands));
    out.push_str(&format!("vocabulary: {}\n", program.vocabulary));
    out.push_str(&format!("length: {}\n", program.length));
    out.push_str(&format!(
        "estimated_length: {}\n",
        metric_value(program.estimated_length)
    ));
    out.push_str(&format!("volume: {}\n", metric_value(program.volume)));
    out.push_str(&format!("difficulty: {}\n", metric_value(program.difficulty)));
    out.push_str(&format!("effort: {}\n", metric_value(program.effort)));

    out
}

/// Format a report with terminal colors.
#[cfg(feature = "cli")]
pub fn format_pretty(report: &Report) -> String {
    use colored::Colorize;

    let mut out = String::new();

    if let Some(ref label) = report.metadata.label {
        out.push_str(&format!("{} {label}\n", "File:".bold()));
    }
    out.push_str(&format!(
        "{} {}\n",
        "Lines:".dimmed(),
        report.metadata.lines_of_code
    ));

    for (title, group, total_name) in [
        ("operators", &report.operators, "N1"),
        ("operands", &report.operands, "N2"),
    ] {
        out.push_str(&format!("\n{}\n", format!("[{title}]").bold()));
        for entry in &group.counts {
            let count = if entry.count > 0 {
                entry.count.to_string().green()
            } else {
                entry.count.to_string().dimmed()
            };
            out.push_str(&format!("  {:<12} {}\n", entry.construct, count));
        }
        out.push_str(&format!(
            "  {:<12} {}\n",
            total_name,
            group.total.to_string().bold()
        ));
    }

    out.push_str(&format!("\n{}\n", "[program]".bold()));
    let program = &report.program;
    for (name, value) in [
        ("distinct_operators", program.distinct_operators.to_string()),
        ("distinct_operands", program.distinct_operands.to_string()),
        ("vocabulary", program.vocabulary.to_string()),
        ("length", program.length.to_string()),
    ] {
        out.push_str(&format!("  {name:<18} {value}\n"));
    }
    for (name, value) in [
        ("estimated_length", program.estimated_length),
        ("volume", program.volume),
        ("difficulty", program.difficulty),
        ("effort", program.effort),
    ] {
        let rendered = match value {
            Some(v) => format!("{v:.4}").cyan(),
            None => "undefined".yellow(),
        };
        out.push_str(&format!("  {name:<18} {rendered}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_report_marks_undefined_metrics() {
        let report = crate::analyze("").expect("empty source parses");
        let text = format_text(&report);
        assert!(text.contains("[program]"));
        assert!(text.contains("difficulty: undefined"));
        assert!(text.contains("volume: undefined"));
    }

    #[test]
    fn json_report_round_trips() {
        let report = crate::analyze("x = 1\n").expect("source parses");
        let json = format_json(&report);
        let parsed: crate::report::Report =
            serde_json::from_str(&json).expect("report JSON should deserialize");
        assert_eq!(parsed.operands.total, report.operands.total);
        assert_eq!(parsed.program.vocabulary, report.program.vocabulary);
    }
}
