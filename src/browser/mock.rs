use async_trait::async_trait;
use scraper::Html;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::{BrowserLauncher, BrowserSession, Locator};
use crate::parser::html;
use crate::{ScraperError, ScraperResult};

/// Browser that serves fixed HTML snapshots per URL.
///
/// Waits resolve immediately: an element missing from the snapshot times out
/// without sleeping. Unknown URLs render as an empty page.
#[derive(Clone, Default)]
pub struct MockBrowser {
    pages: Arc<HashMap<String, String>>,
    unreachable: Arc<HashSet<String>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    fail_open: bool,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pages).insert(url.into(), body.into());
        self
    }

    /// Navigating to `url` fails with a browser error.
    pub fn with_failing_navigation(mut self, url: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.unreachable).insert(url.into());
        self
    }

    pub fn with_failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for MockBrowser {
    async fn open(&self) -> ScraperResult<Box<dyn BrowserSession>> {
        if self.fail_open {
            return Err(ScraperError::Browser("mock browser failed to start".to_string()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockSession {
            pages: Arc::clone(&self.pages),
            unreachable: Arc::clone(&self.unreachable),
            closed: Arc::clone(&self.closed),
            current: String::new(),
            is_closed: false,
        }))
    }
}

struct MockSession {
    pages: Arc<HashMap<String, String>>,
    unreachable: Arc<HashSet<String>>,
    closed: Arc<AtomicUsize>,
    current: String,
    is_closed: bool,
}

impl MockSession {
    fn ensure_open(&self) -> ScraperResult<()> {
        if self.is_closed {
            return Err(ScraperError::Browser("session already closed".to_string()));
        }
        Ok(())
    }
}

fn evaluate(body: &str, locator: &Locator) -> Vec<String> {
    let doc = Html::parse_document(body);
    match locator {
        Locator::LabelCell(label) => {
            if html::has_label_cell(&doc, label) {
                vec![label.clone()]
            } else {
                Vec::new()
            }
        }
        Locator::ValueAfterLabel(label) => html::value_cell_after_label(&doc, label)
            .map(html::normalized_text)
            .into_iter()
            .collect(),
        Locator::LinksAfterLabel(label) => html::links_after_label(&doc, label),
        Locator::PanelBody(title) => html::panel_body_text(&doc, title).into_iter().collect(),
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&mut self, url: &str) -> ScraperResult<()> {
        self.ensure_open()?;
        if self.unreachable.contains(url) {
            return Err(ScraperError::Browser(format!("navigation to {} failed", url)));
        }
        self.current = self.pages.get(url).cloned().unwrap_or_default();
        Ok(())
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> ScraperResult<String> {
        self.ensure_open()?;
        evaluate(&self.current, locator)
            .into_iter()
            .next()
            .ok_or_else(|| ScraperError::RenderTimeout {
                what: locator.to_string(),
                timeout,
            })
    }

    async fn find_all(&mut self, locator: &Locator) -> ScraperResult<Vec<String>> {
        self.ensure_open()?;
        Ok(evaluate(&self.current, locator))
    }

    async fn close(&mut self) -> ScraperResult<()> {
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
