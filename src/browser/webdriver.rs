use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use log::{debug, info, warn};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::{Child, Command};
use tokio::time::sleep;

use super::{BrowserLauncher, BrowserSession, Locator};
use crate::core::config::ScraperConfig;
use crate::{ScraperError, ScraperResult};

const CONNECT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Launches one chromedriver process per session and drives headless Chrome
/// through it.
///
/// Ports are fixed, so only one session may be open at a time.
#[derive(Debug, Clone)]
pub struct ChromeDriverLauncher {
    chromedriver_path: PathBuf,
    driver_port: u16,
    debugging_port: u16,
    startup_timeout: Duration,
}

impl ChromeDriverLauncher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            chromedriver_path: config.chromedriver_path.clone(),
            driver_port: config.driver_port,
            debugging_port: config.debugging_port,
            startup_timeout: config.driver_startup_timeout,
        }
    }

    fn chrome_args(&self) -> Vec<String> {
        vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            format!("--remote-debugging-port={}", self.debugging_port),
        ]
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": self.chrome_args(),
                "excludeSwitches": ["enable-logging"],
            }),
        );
        caps
    }

    fn spawn_driver(&self) -> ScraperResult<Child> {
        Command::new(&self.chromedriver_path)
            .arg(format!("--port={}", self.driver_port))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ScraperError::Browser(format!(
                    "failed to launch {}: {}",
                    self.chromedriver_path.display(),
                    e
                ))
            })
    }

    /// The driver takes a moment to listen; retry until the startup timeout.
    async fn connect(&self) -> ScraperResult<Client> {
        let webdriver_url = format!("http://localhost:{}", self.driver_port);
        let deadline = Instant::now() + self.startup_timeout;

        loop {
            let mut builder = ClientBuilder::native();
            builder.capabilities(self.capabilities());
            match builder.connect(&webdriver_url).await {
                Ok(client) => return Ok(client),
                Err(e) if Instant::now() >= deadline => {
                    return Err(ScraperError::Browser(format!(
                        "could not start a session at {}: {}",
                        webdriver_url, e
                    )));
                }
                Err(e) => {
                    debug!("WebDriver not ready at {}: {}", webdriver_url, e);
                    sleep(CONNECT_POLL_INTERVAL).await;
                }
            }
        }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeDriverLauncher {
    async fn open(&self) -> ScraperResult<Box<dyn BrowserSession>> {
        info!(
            "Launching {} on port {}",
            self.chromedriver_path.display(),
            self.driver_port
        );
        let mut driver = self.spawn_driver()?;

        match self.connect().await {
            Ok(client) => Ok(Box::new(WebDriverSession {
                client: Some(client),
                driver: Some(driver),
            })),
            Err(e) => {
                if let Err(kill_err) = driver.kill().await {
                    warn!("Failed to stop chromedriver: {}", kill_err);
                }
                Err(e)
            }
        }
    }
}

/// A live WebDriver session plus the driver process backing it.
///
/// The driver is spawned with kill-on-drop, so a session dropped without
/// `close` still takes its process down.
pub struct WebDriverSession {
    client: Option<Client>,
    driver: Option<Child>,
}

impl WebDriverSession {
    fn client(&self) -> ScraperResult<&Client> {
        self.client
            .as_ref()
            .ok_or_else(|| ScraperError::Browser("session already closed".to_string()))
    }
}

fn command_error(context: &str, err: CmdError) -> ScraperError {
    ScraperError::Browser(format!("{}: {}", context, err))
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&mut self, url: &str) -> ScraperResult<()> {
        debug!("Navigating to {}", url);
        self.client()?
            .goto(url)
            .await
            .map_err(|e| command_error(&format!("navigation to {} failed", url), e))
    }

    async fn wait_for(&mut self, locator: &Locator, timeout: Duration) -> ScraperResult<String> {
        let xpath = locator.to_xpath();
        let element = self
            .client()?
            .wait()
            .at_most(timeout)
            .for_element(fantoccini::Locator::XPath(&xpath))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => ScraperError::RenderTimeout {
                    what: locator.to_string(),
                    timeout,
                },
                other => command_error(&format!("waiting for {}", locator), other),
            })?;

        let text = element
            .text()
            .await
            .map_err(|e| command_error(&format!("reading {}", locator), e))?;
        Ok(text.trim().to_string())
    }

    async fn find_all(&mut self, locator: &Locator) -> ScraperResult<Vec<String>> {
        let xpath = locator.to_xpath();
        let elements = self
            .client()?
            .find_all(fantoccini::Locator::XPath(&xpath))
            .await
            .map_err(|e| command_error(&format!("finding {}", locator), e))?;

        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element
                .text()
                .await
                .map_err(|e| command_error(&format!("reading {}", locator), e))?;
            texts.push(text.trim().to_string());
        }
        Ok(texts)
    }

    async fn close(&mut self) -> ScraperResult<()> {
        let result = match self.client.take() {
            Some(client) => client
                .close()
                .await
                .map_err(|e| command_error("closing session", e)),
            None => Ok(()),
        };

        if let Some(mut driver) = self.driver.take() {
            if let Err(e) = driver.kill().await {
                warn!("Failed to stop chromedriver: {}", e);
            }
        }
        result
    }
}
