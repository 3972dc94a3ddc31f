//! Declarative test steps and YAML scenarios
//!
//! Every browser interaction in the suite is expressed as a [`TestStep`].
//! Page objects queue steps into a [`Session`](crate::session::Session);
//! YAML scenario files describe the same steps declaratively.

use serde::{Deserialize, Serialize};
use std::path::Path;

use practice_qa_common::Viewport;

use crate::error::{E2eError, E2eResult};

/// A complete scenario parsed from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique name for this scenario
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Tags for filtering
    #[serde(default)]
    pub tags: Vec<String>,

    /// Viewport override; the suite viewport is used when absent
    #[serde(default)]
    pub viewport: Option<Viewport>,

    /// Steps to execute in order
    pub steps: Vec<TestStep>,
}

/// A single step in a test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// Navigate to a URL (relative to base)
    Navigate {
        url: String,
        #[serde(default)]
        wait_for_selector: Option<String>,
    },

    /// Reload the current page
    Reload,

    /// Click an element
    Click { selector: String },

    /// Empty an input field
    Clear { selector: String },

    /// Type text key by key into an element
    Type { selector: String, text: String },

    /// Press a key on an element, optionally several times
    Press {
        selector: String,
        key: String,
        #[serde(default = "default_press_times")]
        times: u32,
    },

    /// Focus an element
    Focus { selector: String },

    /// Write an input's value directly, the way a paste would
    SetValue { selector: String, value: String },

    /// Wait for an element to reach a state
    Wait {
        selector: String,
        #[serde(default)]
        timeout_ms: Option<u64>,
        #[serde(default)]
        state: WaitState,
    },

    /// Wait for a fixed amount of time (use sparingly)
    Sleep { ms: u64 },

    /// Assert something about an element
    Assert {
        selector: String,
        #[serde(flatten)]
        checks: ElementChecks,
    },

    /// Assert something about the current URL
    AssertUrl {
        #[serde(default)]
        contains: Option<String>,
        #[serde(default)]
        not_contains: Option<String>,
    },

    /// Take a screenshot
    Screenshot {
        name: String,
        #[serde(default)]
        full_page: bool,
    },

    /// Log a message (for debugging)
    Log { message: String },
}

fn default_press_times() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitState {
    #[default]
    Visible,
    Hidden,
    Attached,
    Detached,
}

impl WaitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WaitState::Visible => "visible",
            WaitState::Hidden => "hidden",
            WaitState::Attached => "attached",
            WaitState::Detached => "detached",
        }
    }
}

/// Conditions checked on one element; unset fields are not checked
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementChecks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused: Option<bool>,
    /// Exact text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_contains: Option<String>,
    /// Current value of an input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<AttributeAssertion>,
    /// A CSS property that must have a computed value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeAssertion {
    pub name: String,
    pub value: String,
}

impl ElementChecks {
    pub fn is_empty(&self) -> bool {
        *self == ElementChecks::default()
    }
}

impl TestStep {
    /// Short label used in logs and failure messages
    pub fn describe(&self) -> String {
        match self {
            TestStep::Navigate { url, .. } => format!("navigate:{}", url),
            TestStep::Reload => "reload".to_string(),
            TestStep::Click { selector } => format!("click:{}", selector),
            TestStep::Clear { selector } => format!("clear:{}", selector),
            TestStep::Type { selector, .. } => format!("type:{}", selector),
            TestStep::Press { selector, key, times } => {
                format!("press:{}:{}x{}", selector, key, times)
            }
            TestStep::Focus { selector } => format!("focus:{}", selector),
            TestStep::SetValue { selector, .. } => format!("set_value:{}", selector),
            TestStep::Wait { selector, .. } => format!("wait:{}", selector),
            TestStep::Sleep { ms } => format!("sleep:{}ms", ms),
            TestStep::Assert { selector, .. } => format!("assert:{}", selector),
            TestStep::AssertUrl { .. } => "assert_url".to_string(),
            TestStep::Screenshot { name, .. } => format!("screenshot:{}", name),
            TestStep::Log { message } => {
                format!("log:{}", message.chars().take(30).collect::<String>())
            }
        }
    }
}

impl Scenario {
    /// Parse a scenario from YAML string
    pub fn from_yaml(yaml: &str) -> E2eResult<Self> {
        let scenario: Self = serde_yaml::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Parse a scenario from a YAML file
    pub fn from_file(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content).map_err(|e| {
            E2eError::ScenarioParse(format!("{}: {}", path.display(), e))
        })
    }

    /// Load all scenarios from a directory, ordered by file path
    pub fn load_all(dir: &Path) -> E2eResult<Vec<Self>> {
        let mut paths: Vec<_> = walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext == "yaml" || ext == "yml")
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .collect();
        paths.sort();

        paths.iter().map(|p| Self::from_file(p)).collect()
    }

    /// Filter scenarios by tag
    pub fn filter_by_tag<'a>(scenarios: &'a [Self], tag: &str) -> Vec<&'a Self> {
        scenarios
            .iter()
            .filter(|s| s.tags.iter().any(|t| t == tag))
            .collect()
    }

    fn validate(&self) -> E2eResult<()> {
        if self.name.trim().is_empty() {
            return Err(E2eError::ScenarioParse("scenario name is empty".to_string()));
        }
        if self.steps.is_empty() {
            return Err(E2eError::ScenarioParse(format!(
                "scenario '{}' has no steps",
                self.name
            )));
        }
        for step in &self.steps {
            match step {
                TestStep::Assert { selector, checks } if checks.is_empty() => {
                    return Err(E2eError::ScenarioParse(format!(
                        "scenario '{}': assert on '{}' checks nothing",
                        self.name, selector
                    )));
                }
                TestStep::AssertUrl {
                    contains: None,
                    not_contains: None,
                } => {
                    return Err(E2eError::ScenarioParse(format!(
                        "scenario '{}': assert_url checks nothing",
                        self.name
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
