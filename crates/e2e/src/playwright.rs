//! Playwright browser automation
//!
//! A queue of [`TestStep`]s is rendered into one Node script that drives a
//! single page from the first step to the last. The script reports its outcome
//! as a JSON line on stdout, which is mapped back onto [`E2eError`].

use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use tokio::process::Command as TokioCommand;
use tracing::{debug, info, warn};

use practice_qa_common::{Browser, SuiteConfig, Viewport};

use crate::error::{E2eError, E2eResult};
use crate::scenario::{ElementChecks, TestStep};

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub viewport: Viewport,
    pub browser: Browser,
    pub headless: bool,
    pub command_timeout_ms: u64,
    pub screenshot_on_failure: bool,
    /// Directory holding the `playwright` and `@playwright/test` packages
    pub node_modules: Option<PathBuf>,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self::from(&SuiteConfig::default())
    }
}

impl From<&SuiteConfig> for PlaywrightConfig {
    fn from(config: &SuiteConfig) -> Self {
        if config.video {
            warn!("video recording is not supported by the Playwright driver; ignoring");
        }
        Self {
            base_url: config.base_url.clone(),
            screenshot_dir: config.screenshot_dir.clone(),
            viewport: config.viewport,
            browser: config.browser,
            headless: config.headless,
            command_timeout_ms: config.command_timeout_ms,
            screenshot_on_failure: config.screenshot_on_failure,
            node_modules: None,
        }
    }
}

/// What a successful run reports back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub steps: usize,
    pub duration_ms: u64,
}

/// Last line a generated script prints
#[derive(Debug, Deserialize)]
struct ScriptReport {
    success: bool,
    #[serde(default)]
    step: usize,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    screenshot: Option<PathBuf>,
}

/// Quote a string as a JavaScript literal
fn js(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn strip_ansi(s: &str) -> String {
    static ANSI: OnceLock<Regex> = OnceLock::new();
    ANSI.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ANSI pattern"))
        .replace_all(s, "")
        .into_owned()
}

/// File-name-safe form of a run name
fn slug(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() { "run".to_string() } else { slug }
}

impl PlaywrightConfig {
    /// Build the Playwright script for a set of steps
    pub fn build_script(&self, run_name: &str, steps: &[TestStep]) -> String {
        let mut script = String::new();

        // Header
        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit }} = require('playwright');
const {{ expect }} = require('@playwright/test');

(async () => {{
  const timeout = {timeout};
  const check = expect.configure({{ timeout }});
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }},
    baseURL: {base_url},
  }});
  const page = await context.newPage();
  page.setDefaultTimeout(timeout);
  page.setDefaultNavigationTimeout(timeout);
  let step = 0;

  try {{
"#,
            timeout = self.command_timeout_ms,
            browser = self.browser.as_str(),
            headless = self.headless,
            width = self.viewport.width,
            height = self.viewport.height,
            base_url = js(&self.base_url),
        ));

        for (i, step) in steps.iter().enumerate() {
            script.push_str(&format!("\n    // Step {}: {}\n", i + 1, step.describe()));
            script.push_str(&format!("    step = {};\n", i + 1));
            script.push_str(&self.step_to_js(step));
            script.push('\n');
        }

        // Footer
        script.push_str(
            r#"
    console.log(JSON.stringify({ success: true, step }));
  } catch (error) {
    let screenshot = null;
"#,
        );
        if self.screenshot_on_failure {
            let path = self
                .screenshot_dir
                .join(format!("{}-failure.png", slug(run_name)));
            script.push_str(&format!(
                r#"    try {{
      await page.screenshot({{ path: {path}, fullPage: true }});
      screenshot = {path};
    }} catch (_) {{}}
"#,
                path = js(&path.to_string_lossy()),
            ));
        }
        script.push_str(
            r#"    const kind = error.name === 'TimeoutError' ? 'timeout' : (error.matcherResult ? 'assertion' : 'error');
    console.log(JSON.stringify({ success: false, step, kind, message: String(error.message), screenshot }));
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &TestStep) -> String {
        match step {
            TestStep::Navigate { url, wait_for_selector } => {
                let wait = wait_for_selector
                    .as_ref()
                    .map(|s| format!("\n    await page.locator({}).waitFor({{ state: 'visible' }});", js(s)))
                    .unwrap_or_default();
                format!("    await page.goto({});{}", js(url), wait)
            }
            TestStep::Reload => "    await page.reload();".to_string(),
            TestStep::Click { selector } => {
                format!("    await page.locator({}).click();", js(selector))
            }
            TestStep::Clear { selector } => {
                format!("    await page.locator({}).clear();", js(selector))
            }
            TestStep::Type { selector, text } => {
                format!(
                    "    await page.locator({}).pressSequentially({});",
                    js(selector),
                    js(text)
                )
            }
            TestStep::Press { selector, key, times } => {
                let press = format!("await page.locator({}).press({});", js(selector), js(key));
                if *times == 1 {
                    format!("    {}", press)
                } else {
                    format!("    for (let n = 0; n < {}; n++) {{ {} }}", times, press)
                }
            }
            TestStep::Focus { selector } => {
                format!("    await page.locator({}).focus();", js(selector))
            }
            TestStep::SetValue { selector, value } => {
                format!(
                    "    await page.locator({}).evaluate((el, value) => {{ el.value = value; }}, {});",
                    js(selector),
                    js(value)
                )
            }
            TestStep::Wait { selector, timeout_ms, state } => {
                let wait_timeout = timeout_ms.unwrap_or(self.command_timeout_ms);
                format!(
                    "    await page.locator({}).waitFor({{ state: '{}', timeout: {} }});",
                    js(selector),
                    state.as_str(),
                    wait_timeout
                )
            }
            TestStep::Sleep { ms } => format!("    await page.waitForTimeout({});", ms),
            TestStep::Assert { selector, checks } => assertions_to_js(selector, checks),
            TestStep::AssertUrl { contains, not_contains } => {
                let mut lines = Vec::new();
                if let Some(c) = contains {
                    lines.push(format!(
                        "    await check.poll(() => page.url()).toContain({});",
                        js(c)
                    ));
                }
                if let Some(c) = not_contains {
                    lines.push(format!(
                        "    await check.poll(() => page.url()).not.toContain({});",
                        js(c)
                    ));
                }
                lines.join("\n")
            }
            TestStep::Screenshot { name, full_page } => {
                let path = self.screenshot_dir.join(format!("{}.png", slug(name)));
                format!(
                    "    await page.screenshot({{ path: {}, fullPage: {} }});",
                    js(&path.to_string_lossy()),
                    full_page
                )
            }
            TestStep::Log { message } => {
                format!("    console.error('[TEST] ' + {});", js(message))
            }
        }
    }
}

fn assertions_to_js(selector: &str, checks: &ElementChecks) -> String {
    let target = format!("check(page.locator({}))", js(selector));
    let mut assertions = Vec::new();

    if let Some(visible) = checks.visible {
        let matcher = if visible { "toBeVisible()" } else { "toBeHidden()" };
        assertions.push(format!("    await {}.{};", target, matcher));
    }
    if let Some(enabled) = checks.enabled {
        let matcher = if enabled { "toBeEnabled()" } else { "toBeDisabled()" };
        assertions.push(format!("    await {}.{};", target, matcher));
    }
    if let Some(focused) = checks.focused {
        let matcher = if focused { "toBeFocused()" } else { "not.toBeFocused()" };
        assertions.push(format!("    await {}.{};", target, matcher));
    }
    if let Some(text) = &checks.text {
        assertions.push(format!("    await {}.toHaveText({});", target, js(text)));
    }
    if let Some(text) = &checks.text_contains {
        assertions.push(format!("    await {}.toContainText({});", target, js(text)));
    }
    if let Some(value) = &checks.value {
        assertions.push(format!("    await {}.toHaveValue({});", target, js(value)));
    }
    if let Some(attr) = &checks.attribute {
        assertions.push(format!(
            "    await {}.toHaveAttribute({}, {});",
            target,
            js(&attr.name),
            js(&attr.value)
        ));
    }
    if let Some(property) = &checks.css {
        assertions.push(format!("    await {}.toHaveCSS({}, /.+/);", target, js(property)));
    }
    if let Some(count) = checks.count {
        assertions.push(format!("    await {}.toHaveCount({});", target, count));
    }

    assertions.join("\n")
}

/// Playwright browser handle
#[derive(Debug, Clone)]
pub struct PlaywrightDriver {
    config: PlaywrightConfig,
}

impl PlaywrightDriver {
    /// Create a new driver after checking that Playwright is installed
    pub fn new(mut config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        // Scripts run from a temp dir, so every path handed to them is absolute
        std::fs::create_dir_all(&config.screenshot_dir)?;
        config.screenshot_dir = config.screenshot_dir.canonicalize()?;

        if config.node_modules.is_none() {
            let local = Path::new("node_modules");
            if local.is_dir() {
                config.node_modules = Some(local.canonicalize()?);
            }
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &PlaywrightConfig {
        &self.config
    }

    /// Same driver with a different viewport
    pub fn with_viewport(&self, viewport: Viewport) -> Self {
        let mut config = self.config.clone();
        config.viewport = viewport;
        Self { config }
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Upper bound for a whole script: every step may use its full command timeout
    fn script_timeout(&self, steps: usize) -> Duration {
        Duration::from_millis(self.config.command_timeout_ms * (steps as u64 + 1))
            + Duration::from_secs(30)
    }

    /// Execute a queue of steps in one browser page
    pub async fn run(&self, run_name: &str, steps: &[TestStep]) -> E2eResult<RunOutcome> {
        let start = Instant::now();
        let script = self.config.build_script(run_name, steps);

        // Write script to temp file
        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join("run.js");
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script for '{}': {}", run_name, script_path.display());

        let mut cmd = TokioCommand::new("node");
        cmd.arg(&script_path)
            .current_dir(temp_dir.path())
            .kill_on_drop(true);
        if let Some(modules) = &self.config.node_modules {
            cmd.env("NODE_PATH", modules);
        }

        let output = match tokio::time::timeout(self.script_timeout(steps.len()), cmd.output()).await {
            Ok(output) => output?,
            Err(_) => {
                return Err(E2eError::Timeout {
                    step: 0,
                    name: run_name.to_string(),
                    message: "browser script did not finish".to_string(),
                    screenshot: None,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("Playwright stderr for '{}':\n{}", run_name, stderr.trim_end());
        }

        let report = stdout
            .lines()
            .rev()
            .find_map(|line| serde_json::from_str::<ScriptReport>(line.trim()).ok());

        let duration_ms = start.elapsed().as_millis() as u64;
        match report {
            Some(report) if report.success && output.status.success() => {
                info!("✓ {} ({} steps, {} ms)", run_name, steps.len(), duration_ms);
                Ok(RunOutcome {
                    steps: steps.len(),
                    duration_ms,
                })
            }
            Some(report) => Err(failure_from_report(report, steps)),
            None => Err(E2eError::Playwright(format!(
                "Script failed:\nstdout: {}\nstderr: {}",
                stdout, stderr
            ))),
        }
    }
}

fn failure_from_report(report: ScriptReport, steps: &[TestStep]) -> E2eError {
    let step = report.step;
    let name = step
        .checked_sub(1)
        .and_then(|i| steps.get(i))
        .map(TestStep::describe)
        .unwrap_or_else(|| "setup".to_string());
    let message = strip_ansi(report.message.as_deref().unwrap_or("unknown error"));
    let screenshot = report.screenshot;

    warn!("✗ step {} ({}) failed: {}", step, name, message);

    match report.kind.as_deref() {
        Some("timeout") => E2eError::Timeout { step, name, message, screenshot },
        Some("assertion") => E2eError::AssertionFailed { step, name, message, screenshot },
        _ => E2eError::Playwright(format!("step {} ({}): {}", step, name, message)),
    }
}
