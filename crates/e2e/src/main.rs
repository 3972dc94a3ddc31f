//! practice-qa scenario runner
//!
//! Runs the declarative YAML scenarios against the configured site and writes
//! a report. Exit code 0 when every scenario passed, 1 when any failed, 2 on
//! an infrastructure error.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use practice_qa_common::{Browser, SuiteConfig};
use practice_qa_e2e::runner::TestSuiteResult;
use practice_qa_e2e::TestRunner;

#[derive(Parser, Debug)]
#[command(name = "practice-qa")]
#[command(about = "Scenario runner for the practice login page")]
#[command(version)]
struct Args {
    /// Suite configuration file (TOML)
    #[arg(short, long, env = "PRACTICE_QA_CONFIG")]
    config: Option<PathBuf>,

    /// Path to scenario directory
    #[arg(short, long, default_value = "crates/e2e/scenarios")]
    scenarios: PathBuf,

    /// Run only scenarios carrying this tag
    #[arg(short, long)]
    tag: Option<String>,

    /// Run only the scenario with this name
    #[arg(short, long)]
    name: Option<String>,

    /// Override the site base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Browser to use (chromium, firefox, webkit)
    #[arg(long)]
    browser: Option<Browser>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Viewport width
    #[arg(long)]
    viewport_width: Option<u32>,

    /// Viewport height
    #[arg(long)]
    viewport_height: Option<u32>,

    /// Command timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Output directory for reports
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory containing the playwright node packages
    #[arg(long)]
    node_modules: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn suite_config(&self) -> anyhow::Result<SuiteConfig> {
        let mut config = match &self.config {
            Some(path) => SuiteConfig::from_file(path)?,
            None => SuiteConfig::default(),
        };

        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(browser) = self.browser {
            config.browser = browser;
        }
        if self.headed {
            config.headless = false;
        }
        if let Some(width) = self.viewport_width {
            config.viewport.width = width;
        }
        if let Some(height) = self.viewport_height {
            config.viewport.height = height;
        }
        if let Some(ms) = self.timeout_ms {
            config.command_timeout_ms = ms;
        }
        if let Some(dir) = &self.output {
            config.screenshot_dir = dir.join("screenshots");
            config.report.dir = dir.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(args).await {
        Ok(results) if results.success() => std::process::exit(0),
        Ok(_) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(2);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<TestSuiteResult> {
    let config = args.suite_config()?;
    info!(
        "practice-qa {} against {} ({})",
        practice_qa_common::VERSION,
        config.base_url,
        config.browser.as_str()
    );
    let mut runner = TestRunner::new(config, args.scenarios.clone());
    if let Some(dir) = &args.node_modules {
        runner = runner.with_node_modules(dir.clone());
    }

    let results = if let Some(name) = &args.name {
        runner.run_named(name).await?
    } else if let Some(tag) = &args.tag {
        runner.run_tagged(tag).await?
    } else {
        runner.run_all().await?
    };

    runner.write_results(&results)?;
    Ok(results)
}
