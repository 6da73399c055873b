use crate::error::FetchError;
use crate::sources::HtmlSource;
use crate::utils;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::timeout;

/// WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Renders live site pages through a WebDriver browser session
///
/// The session is opened on the first fetch and reused afterwards. Fetches are
/// serialised over the single session.
pub struct WebDriverSource {
    site_url: String,
    webdriver_url: String,
    timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl WebDriverSource {
    pub fn new(site_url: &str, webdriver_url: &str, timeout: Duration) -> Self {
        Self {
            site_url: site_url.to_string(),
            webdriver_url: webdriver_url.to_string(),
            timeout,
            client: Mutex::new(None),
        }
    }

    /// End the browser session if one was opened
    pub async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }

    async fn connect(&self) -> Result<Client, FetchError> {
        match ClientBuilder::native().connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS
            .iter()
            .filter(|url| **url != self.webdriver_url)
        {
            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native().connect(url).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        Err(FetchError::WebDriver(format!(
            "no WebDriver server reachable at {} or fallbacks; set WEBDRIVER_URL",
            self.webdriver_url
        )))
    }

    async fn render(&self, client: &Client, url: &str) -> Result<Option<String>, FetchError> {
        let navigation = |e: fantoccini::error::CmdError| FetchError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        };

        client.goto(url).await.map_err(navigation)?;

        let title = client.title().await.map_err(navigation)?;
        if is_not_found_title(&title) {
            ::log::debug!("{} rendered a not-found page: {}", url, title);
            return Ok(None);
        }

        client.source().await.map(Some).map_err(navigation)
    }
}

/// Static hosts answer unknown paths with a 200 error page; its title gives it away
fn is_not_found_title(title: &str) -> bool {
    let title = title.to_ascii_lowercase();
    title.starts_with("404") || title.contains("page not found")
}

#[async_trait]
impl HtmlSource for WebDriverSource {
    async fn fetch(&self, path: &str) -> Result<Option<String>, FetchError> {
        let url = utils::page_url(&self.site_url, path);
        let mut guard = self.client.lock().await;

        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let Some(client) = guard.as_ref() else {
            return Err(FetchError::WebDriver("session unavailable".to_string()));
        };

        ::log::debug!("RENDER: {}", url);
        let result = match timeout(self.timeout, self.render(client, &url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(url.clone())),
        };

        // A lost session is dropped so the next fetch reconnects
        if let Err(FetchError::Navigation { reason, .. }) = &result {
            if reason.contains("Unable to find session") || reason.contains("invalid session") {
                ::log::warn!("Lost WebDriver session while rendering {}", url);
                *guard = None;
            }
        }

        result
    }

    fn name(&self) -> &str {
        "webdriver"
    }
}
