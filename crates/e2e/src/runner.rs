//! Scenario runner: loads YAML scenarios, runs each in its own browser page,
//! and collects the results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info};

use practice_qa_common::SuiteConfig;

use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightDriver};
use crate::report::{ReportPaths, ReportWriter};
use crate::scenario::Scenario;
use crate::session::Session;

/// How a test ended when it did not pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Assertion,
    Timeout,
    Infrastructure,
}

/// Result of running a single scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: usize,
    pub failure: Option<FailureKind>,
    pub error: Option<String>,
    pub screenshot: Option<PathBuf>,
}

impl TestResult {
    fn passed(name: &str, steps: usize, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            success: true,
            duration_ms,
            steps,
            failure: None,
            error: None,
            screenshot: None,
        }
    }

    fn failed(name: &str, steps: usize, duration_ms: u64, err: &E2eError) -> Self {
        let failure = match err {
            E2eError::AssertionFailed { .. } | E2eError::Expectation(_) => FailureKind::Assertion,
            E2eError::Timeout { .. } | E2eError::RequestTimeout { .. } => FailureKind::Timeout,
            _ => FailureKind::Infrastructure,
        };
        Self {
            name: name.to_string(),
            success: false,
            duration_ms,
            steps,
            failure: Some(failure),
            error: Some(err.to_string()),
            screenshot: screenshot_of(err),
        }
    }
}

fn screenshot_of(err: &E2eError) -> Option<PathBuf> {
    match err {
        E2eError::AssertionFailed { screenshot, .. } | E2eError::Timeout { screenshot, .. } => {
            screenshot.clone()
        }
        _ => None,
    }
}

/// Result of running all scenarios
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub started_at: DateTime<Utc>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Main scenario runner
pub struct TestRunner {
    /// Suite configuration
    config: SuiteConfig,

    /// Playwright configuration derived from the suite
    playwright_config: PlaywrightConfig,

    /// Driver, created on first use
    driver: Option<PlaywrightDriver>,

    /// Scenario directory
    scenarios_dir: PathBuf,
}

impl TestRunner {
    pub fn new(config: SuiteConfig, scenarios_dir: impl Into<PathBuf>) -> Self {
        let playwright_config = PlaywrightConfig::from(&config);
        Self {
            config,
            playwright_config,
            driver: None,
            scenarios_dir: scenarios_dir.into(),
        }
    }

    /// Point the browser scripts at a specific `node_modules` directory
    pub fn with_node_modules(mut self, dir: impl Into<PathBuf>) -> Self {
        self.playwright_config.node_modules = Some(dir.into());
        self.driver = None;
        self
    }

    pub fn scenarios_dir(&self) -> &Path {
        &self.scenarios_dir
    }

    fn driver(&mut self) -> E2eResult<&PlaywrightDriver> {
        if self.driver.is_none() {
            self.driver = Some(PlaywrightDriver::new(self.playwright_config.clone())?);
        }
        self.driver
            .as_ref()
            .ok_or_else(|| E2eError::Playwright("driver unavailable".to_string()))
    }

    /// Run every scenario in the scenario directory
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        self.run_scenarios(&scenarios).await
    }

    /// Run scenarios carrying a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        let filtered: Vec<Scenario> = Scenario::filter_by_tag(&scenarios, tag)
            .into_iter()
            .cloned()
            .collect();
        self.run_scenarios(&filtered).await
    }

    /// Run one scenario by name
    pub async fn run_named(&mut self, name: &str) -> E2eResult<TestSuiteResult> {
        let scenarios = Scenario::load_all(&self.scenarios_dir)?;
        let scenario = scenarios
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::ScenarioParse(format!("Scenario not found: {}", name)))?;
        self.run_scenarios(std::slice::from_ref(&scenario)).await
    }

    /// Run scenarios one after another; a failure never stops the next one
    pub async fn run_scenarios(&mut self, scenarios: &[Scenario]) -> E2eResult<TestSuiteResult> {
        let started_at = Utc::now();
        let start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());

        // Fail fast when Playwright is missing rather than once per scenario
        self.driver()?;

        info!("Running {} scenario(s)...", scenarios.len());

        for scenario in scenarios {
            let result = self.run_scenario(scenario).await?;
            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let passed = results.iter().filter(|r| r.success).count();
        let failed = results.len() - passed;
        let duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Results: {} passed, {} failed, 0 skipped ({} ms)",
            passed, failed, duration_ms
        );

        Ok(TestSuiteResult {
            started_at,
            total: scenarios.len(),
            passed,
            failed,
            skipped: 0,
            duration_ms,
            results,
        })
    }

    /// Run a single scenario. Test failures land in the result; only
    /// infrastructure errors are returned as `Err`.
    pub async fn run_scenario(&mut self, scenario: &Scenario) -> E2eResult<TestResult> {
        debug!("Running scenario: {}", scenario.name);
        let start = Instant::now();

        let base = self.driver()?;
        let driver = match scenario.viewport {
            Some(viewport) => base.with_viewport(viewport),
            None => base.clone(),
        };

        let session = Session::from_scenario(scenario);
        let steps = session.steps().len();
        let outcome = session.run(&driver).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(_) => Ok(TestResult::passed(&scenario.name, steps, duration_ms)),
            // A script that crashed mid-run only fails this scenario
            Err(e) if e.is_test_failure() || matches!(e, E2eError::Playwright(_)) => {
                Ok(TestResult::failed(&scenario.name, steps, duration_ms, &e))
            }
            Err(e) => Err(e),
        }
    }

    /// Write results to the configured report directory
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<ReportPaths> {
        ReportWriter::new(self.config.report.clone()).write(results)
    }
}
