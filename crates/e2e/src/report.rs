//! JSON and HTML result reports

use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::info;

use practice_qa_common::ReportConfig;

use crate::error::E2eResult;
use crate::runner::TestSuiteResult;

/// Files written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: Option<PathBuf>,
}

pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Write the report. Without `overwrite` every run gets its own
    /// timestamped file so earlier results are kept.
    pub fn write(&self, results: &TestSuiteResult) -> E2eResult<ReportPaths> {
        std::fs::create_dir_all(&self.config.dir)?;

        let stem = if self.config.overwrite {
            "results".to_string()
        } else {
            format!("results-{}", results.started_at.format("%Y%m%dT%H%M%S%3fZ"))
        };

        let json = self.config.dir.join(format!("{}.json", stem));
        std::fs::write(&json, serde_json::to_string_pretty(results)?)?;
        info!("Results written to: {}", json.display());

        let html = if self.config.html {
            let path = self.config.dir.join(format!("{}.html", stem));
            std::fs::write(&path, render_html(results))?;
            info!("HTML report written to: {}", path.display());
            Some(path)
        } else {
            None
        };

        Ok(ReportPaths { json, html })
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn render_html(results: &TestSuiteResult) -> String {
    let mut rows = String::new();
    for r in &results.results {
        let _ = writeln!(
            rows,
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{} ms</td><td>{}</td></tr>",
            if r.success { "pass" } else { "fail" },
            escape(&r.name),
            if r.success { "passed" } else { "failed" },
            r.steps,
            r.duration_ms,
            escape(r.error.as_deref().unwrap_or("")),
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>practice-qa results</title>
<style>
body {{ font-family: sans-serif; }}
table {{ border-collapse: collapse; }}
td, th {{ border: 1px solid #ccc; padding: 4px 8px; }}
tr.pass td:nth-child(2) {{ color: #2e7d32; }}
tr.fail td:nth-child(2) {{ color: #c62828; }}
</style>
</head>
<body>
<h1>practice-qa results</h1>
<p>Started {started} &middot; {passed} passed, {failed} failed, {skipped} skipped of {total} &middot; {duration} ms</p>
<table>
<tr><th>Scenario</th><th>Status</th><th>Steps</th><th>Duration</th><th>Error</th></tr>
{rows}</table>
</body>
</html>
"#,
        started = results.started_at.to_rfc3339(),
        passed = results.passed,
        failed = results.failed,
        skipped = results.skipped,
        total = results.total,
        duration = results.duration_ms,
        rows = rows,
    )
}
