use log::{info, warn};
use thirtyfour::prelude::*;
use thirtyfour::ChromeCapabilities;

use crate::config;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to start browser session: {0}")]
    Setup(String),
}

/// Owns at most one live WebDriver session. Acquiring while a session exists
/// tears the old one down first; release is always safe to call.
pub struct SessionManager {
    webdriver_url: String,
    driver: Option<WebDriver>,
}

impl SessionManager {
    pub fn new(webdriver_url: &str) -> Self {
        SessionManager {
            webdriver_url: webdriver_url.to_string(),
            driver: None,
        }
    }

    /// Returns the current session, starting one if none is live.
    pub async fn ensure(&mut self) -> Result<&WebDriver, SessionError> {
        if self.driver.is_none() {
            self.acquire().await?;
        }
        Ok(self.driver.as_ref().expect("session just acquired"))
    }

    pub async fn acquire(&mut self) -> Result<&WebDriver, SessionError> {
        self.release().await;

        let caps = build_capabilities().map_err(|e| SessionError::Setup(e.to_string()))?;
        let driver = WebDriver::new(&self.webdriver_url, caps)
            .await
            .map_err(|e| SessionError::Setup(e.to_string()))?;

        driver
            .set_page_load_timeout(config::PAGE_LOAD_TIMEOUT)
            .await
            .map_err(|e| SessionError::Setup(e.to_string()))?;
        driver
            .set_implicit_wait_timeout(config::ELEMENT_TIMEOUT)
            .await
            .map_err(|e| SessionError::Setup(e.to_string()))?;

        // Hide the automation flag from scripts that check for it.
        if let Err(e) = driver
            .execute(
                "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})",
                Vec::new(),
            )
            .await
        {
            warn!("Could not spoof navigator.webdriver: {}", e);
        }

        info!("Browser session started via {}", self.webdriver_url);
        self.driver = Some(driver);
        Ok(self.driver.as_ref().expect("session just stored"))
    }

    pub async fn release(&mut self) {
        if let Some(driver) = self.driver.take() {
            if let Err(e) = driver.quit().await {
                warn!("Failed to quit browser session cleanly: {}", e);
            }
        }
    }
}

fn build_capabilities() -> WebDriverResult<ChromeCapabilities> {
    let mut caps = DesiredCapabilities::chrome();
    caps.set_headless()?;
    caps.set_no_sandbox()?;
    caps.set_disable_dev_shm_usage()?;
    caps.set_disable_gpu()?;
    caps.add_chrome_arg(&format!("--window-size={}", config::CHROME_WINDOW_SIZE))?;
    caps.add_chrome_arg("--disable-blink-features=AutomationControlled")?;
    caps.add_chrome_option("excludeSwitches", ["enable-automation"])?;
    caps.add_chrome_option("useAutomationExtension", false)?;
    caps.add_chrome_arg(&format!("user-agent={}", config::USER_AGENT))?;
    Ok(caps)
}

/// Element queries against third-party pages are best-effort: on timeout or
/// transport error this logs and returns an empty list instead of failing.
pub async fn find_all_guarded(driver: &WebDriver, by: By, what: &str) -> Vec<WebElement> {
    match driver.find_all(by).await {
        Ok(elements) => elements,
        Err(e) => {
            warn!("Element query for {} failed: {}", what, e);
            Vec::new()
        }
    }
}
