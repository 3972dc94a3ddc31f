//! Per-test command queue
//!
//! A [`Session`] collects steps in the order a test issues them and runs them
//! as one browser script. Nothing touches the browser until [`Session::run`],
//! so a failing step stops the remaining steps and fails the test.

use tracing::debug;

use crate::error::E2eResult;
use crate::playwright::{PlaywrightDriver, RunOutcome};
use crate::scenario::{AttributeAssertion, ElementChecks, Scenario, TestStep};

/// Ordered steps for one test
#[derive(Debug, Clone, Default)]
pub struct Session {
    name: String,
    steps: Vec<TestStep>,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// A session holding the steps of a declarative scenario
    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            name: scenario.name.clone(),
            steps: scenario.steps.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[TestStep] {
        &self.steps
    }

    pub fn push(&mut self, step: TestStep) -> &mut Self {
        debug!("[{}] queue {}", self.name, step.describe());
        self.steps.push(step);
        self
    }

    /// Query an element; the selector is resolved again by every queued action
    pub fn get(&mut self, selector: impl Into<String>) -> Element<'_> {
        Element {
            session: self,
            selector: selector.into(),
        }
    }

    pub fn visit(&mut self, path: impl Into<String>) -> &mut Self {
        self.push(TestStep::Navigate {
            url: path.into(),
            wait_for_selector: None,
        })
    }

    pub fn reload(&mut self) -> &mut Self {
        self.push(TestStep::Reload)
    }

    pub fn url(&mut self) -> UrlQuery<'_> {
        UrlQuery { session: self }
    }

    pub fn screenshot(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(TestStep::Screenshot {
            name: name.into(),
            full_page: true,
        })
    }

    pub fn log(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(TestStep::Log {
            message: message.into(),
        })
    }

    /// Execute every queued step in a fresh browser page
    pub async fn run(self, driver: &PlaywrightDriver) -> E2eResult<RunOutcome> {
        driver.run(&self.name, &self.steps).await
    }
}

/// Handle on one selector; actions and assertions chain by value
pub struct Element<'s> {
    session: &'s mut Session,
    selector: String,
}

impl<'s> Element<'s> {
    pub fn selector(&self) -> &str {
        &self.selector
    }

    fn step(self, step: TestStep) -> Self {
        self.session.push(step);
        self
    }

    /// Assert an arbitrary set of checks in one step
    pub fn should(self, checks: ElementChecks) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::Assert { selector, checks })
    }

    pub fn type_text(self, text: impl Into<String>) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::Type {
            selector,
            text: text.into(),
        })
    }

    pub fn clear(self) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::Clear { selector })
    }

    pub fn click(self) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::Click { selector })
    }

    pub fn focus(self) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::Focus { selector })
    }

    pub fn press(self, key: impl Into<String>, times: u32) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::Press {
            selector,
            key: key.into(),
            times,
        })
    }

    /// Write the value directly, bypassing key events
    pub fn set_value(self, value: impl Into<String>) -> Self {
        let selector = self.selector.clone();
        self.step(TestStep::SetValue {
            selector,
            value: value.into(),
        })
    }

    pub fn should_be_visible(self) -> Self {
        self.should(ElementChecks {
            visible: Some(true),
            ..Default::default()
        })
    }

    pub fn should_be_enabled(self) -> Self {
        self.should(ElementChecks {
            enabled: Some(true),
            ..Default::default()
        })
    }

    pub fn should_have_focus(self) -> Self {
        self.should(ElementChecks {
            focused: Some(true),
            ..Default::default()
        })
    }

    pub fn should_have_value(self, value: impl Into<String>) -> Self {
        self.should(ElementChecks {
            value: Some(value.into()),
            ..Default::default()
        })
    }

    pub fn should_contain_text(self, text: impl Into<String>) -> Self {
        self.should(ElementChecks {
            text_contains: Some(text.into()),
            ..Default::default()
        })
    }

    pub fn should_have_attr(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.should(ElementChecks {
            attribute: Some(AttributeAssertion {
                name: name.into(),
                value: value.into(),
            }),
            ..Default::default()
        })
    }

    /// The computed style must define `property`
    pub fn should_have_css(self, property: impl Into<String>) -> Self {
        self.should(ElementChecks {
            css: Some(property.into()),
            ..Default::default()
        })
    }

    /// The element's current value, to be asserted on
    pub fn value(self) -> ValueQuery<'s> {
        ValueQuery { element: self }
    }
}

/// Deferred read of an input's value
pub struct ValueQuery<'s> {
    element: Element<'s>,
}

impl<'s> ValueQuery<'s> {
    pub fn should_equal(self, expected: impl Into<String>) -> Element<'s> {
        self.element.should_have_value(expected)
    }
}

/// Deferred read of the page URL
pub struct UrlQuery<'s> {
    session: &'s mut Session,
}

impl UrlQuery<'_> {
    pub fn should_include(self, fragment: impl Into<String>) {
        self.session.push(TestStep::AssertUrl {
            contains: Some(fragment.into()),
            not_contains: None,
        });
    }

    pub fn should_not_include(self, fragment: impl Into<String>) {
        self.session.push(TestStep::AssertUrl {
            contains: None,
            not_contains: Some(fragment.into()),
        });
    }
}
