//! Browser sessions for JavaScript-rendered assessor pages.
//!
//! A session is owned by exactly one parcel extraction. Callers must invoke
//! [`BrowserSession::close`] on every exit path; implementations also release
//! their OS resources on drop.

pub mod mock;
pub mod webdriver;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::ScraperResult;

pub use mock::MockBrowser;
pub use webdriver::ChromeDriverLauncher;

/// Structural element lookups used on rendered pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// `td` whose normalized text equals the label.
    LabelCell(String),
    /// Sibling `td` following the label cell.
    ValueAfterLabel(String),
    /// Links directly inside the cell following the label cell.
    LinksAfterLabel(String),
    /// First block in the body of the panel whose title contains the text.
    PanelBody(String),
}

impl Locator {
    pub fn to_xpath(&self) -> String {
        match self {
            Locator::LabelCell(label) => format!("//td[normalize-space()='{}']", label),
            Locator::ValueAfterLabel(label) => {
                format!("//td[normalize-space()='{}']/following-sibling::td", label)
            }
            Locator::LinksAfterLabel(label) => {
                format!("//td[normalize-space()='{}']/following-sibling::td/a", label)
            }
            Locator::PanelBody(title) => format!(
                "//div[contains(@class,'panel') and .//div[contains(@class,'panel-title') \
                 and contains(text(),'{}')]]//div[contains(@class,'panel-body')]/div",
                title
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::LabelCell(label) => write!(f, "cell '{}'", label),
            Locator::ValueAfterLabel(label) => write!(f, "value of '{}'", label),
            Locator::LinksAfterLabel(label) => write!(f, "links of '{}'", label),
            Locator::PanelBody(title) => write!(f, "panel '{}'", title),
        }
    }
}

#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(&mut self, url: &str) -> ScraperResult<()>;

    /// Polls until `locator` matches, returning the element's rendered text.
    ///
    /// Fails with `ScraperError::RenderTimeout` once `timeout` elapses.
    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> ScraperResult<String>;

    /// Texts of every element currently matching `locator`, without waiting.
    async fn find_all(&mut self, locator: &Locator) -> ScraperResult<Vec<String>>;

    /// Ends the session. Calling it more than once is a no-op.
    async fn close(&mut self) -> ScraperResult<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn open(&self) -> ScraperResult<Box<dyn BrowserSession>>;
}
