use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; ParcelScraper/1.0; +https://github.com/parcelscraper/parcelscraper)";

pub const KING_BASE_URL: &str = "https://blue.kingcounty.com";
pub const KITSAP_BASE_URL: &str = "https://psearch.kitsap.gov";
pub const PIERCE_BASE_URL: &str = "https://atip.piercecountywa.gov";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Wait applied to each individual rendered field.
    pub field_wait: Duration,
    /// Wait for the primary anchor of a rendered page.
    pub page_load_wait: Duration,
    pub chromedriver_path: PathBuf,
    pub driver_port: u16,
    pub debugging_port: u16,
    pub driver_startup_timeout: Duration,
    pub king_base_url: String,
    pub kitsap_base_url: String,
    pub pierce_base_url: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout: Duration::from_secs(15),
            field_wait: Duration::from_secs(10),
            page_load_wait: Duration::from_secs(15),
            chromedriver_path: PathBuf::from("chromedriver"),
            driver_port: 9515,
            debugging_port: 9222,
            driver_startup_timeout: Duration::from_secs(10),
            king_base_url: KING_BASE_URL.to_string(),
            kitsap_base_url: KITSAP_BASE_URL.to_string(),
            pierce_base_url: PIERCE_BASE_URL.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Defaults overridden by `CHROMEDRIVER_PATH` and the `*_BASE_URL` variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var("CHROMEDRIVER_PATH") {
            config.chromedriver_path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("KING_BASE_URL") {
            config.king_base_url = url;
        }
        if let Ok(url) = std::env::var("KITSAP_BASE_URL") {
            config.kitsap_base_url = url;
        }
        if let Ok(url) = std::env::var("PIERCE_BASE_URL") {
            config.pierce_base_url = url;
        }
        config
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_field_wait(mut self, wait: Duration) -> Self {
        self.field_wait = wait;
        self
    }

    pub fn with_page_load_wait(mut self, wait: Duration) -> Self {
        self.page_load_wait = wait;
        self
    }

    pub fn with_chromedriver_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromedriver_path = path.into();
        self
    }

    pub fn with_driver_port(mut self, port: u16) -> Self {
        self.driver_port = port;
        self
    }

    pub fn with_king_base_url(mut self, url: impl Into<String>) -> Self {
        self.king_base_url = url.into();
        self
    }

    pub fn with_kitsap_base_url(mut self, url: impl Into<String>) -> Self {
        self.kitsap_base_url = url.into();
        self
    }

    pub fn with_pierce_base_url(mut self, url: impl Into<String>) -> Self {
        self.pierce_base_url = url.into();
        self
    }
}
