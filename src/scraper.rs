use async_trait::async_trait;

use crate::config;
use crate::discovery::{CandidateCompany, Discoverer};
use crate::extractor::ContactExtractor;
use crate::session::{SessionError, SessionManager};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// The browser session could not be started. The affected company is
    /// treated as having zero emails; the job keeps going.
    #[error("browser session setup failed: {0}")]
    SessionSetup(#[from] SessionError),
    /// The live session broke mid-extraction. Every following company would
    /// fail the same way, so the job aborts.
    #[error("{0}")]
    Fatal(String),
}

/// The per-job scraping pipeline: discovery plus page extraction. The job
/// orchestrator only talks to this trait, which keeps it testable without a
/// browser or network.
#[async_trait]
pub trait CompanyScraper: Send {
    async fn search_companies(&self, term: &str, max: usize) -> Vec<CandidateCompany>;
    async fn scrape_company_page(&mut self, company_url: &str) -> Result<Vec<String>, ScrapeError>;
    async fn scrape_reviews_for_emails(
        &mut self,
        company_url: &str,
    ) -> Result<Vec<String>, ScrapeError>;
    async fn cleanup(&mut self);
}

/// Builds one pipeline per job. Sessions are never shared across jobs.
pub trait ScraperFactory: Send + Sync {
    fn create(&self) -> Box<dyn CompanyScraper>;
}

pub struct PlatformScraper {
    discoverer: Discoverer,
    extractor: ContactExtractor,
    session: SessionManager,
}

impl PlatformScraper {
    pub fn new(base_url: &str, webdriver_url: &str) -> Self {
        PlatformScraper {
            discoverer: Discoverer::new(base_url),
            extractor: ContactExtractor::new(),
            session: SessionManager::new(webdriver_url),
        }
    }
}

#[async_trait]
impl CompanyScraper for PlatformScraper {
    async fn search_companies(&self, term: &str, max: usize) -> Vec<CandidateCompany> {
        self.discoverer.discover(term, max).await
    }

    async fn scrape_company_page(&mut self, company_url: &str) -> Result<Vec<String>, ScrapeError> {
        let driver = self.session.ensure().await?;
        self.extractor
            .collect_company_emails(driver, company_url)
            .await
            .map_err(|e| ScrapeError::Fatal(e.to_string()))
    }

    async fn scrape_reviews_for_emails(
        &mut self,
        company_url: &str,
    ) -> Result<Vec<String>, ScrapeError> {
        let driver = self.session.ensure().await?;
        self.extractor
            .collect_review_emails(driver, company_url, config::MAX_REVIEW_EMAILS)
            .await
            .map_err(|e| ScrapeError::Fatal(e.to_string()))
    }

    async fn cleanup(&mut self) {
        self.session.release().await;
    }
}

pub struct PlatformScraperFactory {
    base_url: String,
    webdriver_url: String,
}

impl PlatformScraperFactory {
    pub fn new(base_url: &str, webdriver_url: &str) -> Self {
        PlatformScraperFactory {
            base_url: base_url.to_string(),
            webdriver_url: webdriver_url.to_string(),
        }
    }
}

impl ScraperFactory for PlatformScraperFactory {
    fn create(&self) -> Box<dyn CompanyScraper> {
        Box::new(PlatformScraper::new(&self.base_url, &self.webdriver_url))
    }
}

/// Scripted pipeline used by orchestrator and route tests.
#[cfg(test)]
pub mod mock {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;
    use crate::session::SessionError;

    #[derive(Clone, Default)]
    pub struct MockScraperFactory {
        pub companies: Vec<CandidateCompany>,
        /// Emails returned per company URL; missing URLs yield no emails.
        pub emails: HashMap<String, Vec<String>>,
        pub review_emails: HashMap<String, Vec<String>>,
        pub fail_session: bool,
        pub fatal_error: Option<String>,
        /// Artificial latency per call, for cancellation/ordering tests.
        pub delay: Duration,
    }

    impl MockScraperFactory {
        pub fn with_companies(companies: Vec<(&str, &str, Vec<&str>)>) -> Self {
            let mut factory = MockScraperFactory::default();
            for (name, url, emails) in companies {
                factory.companies.push(CandidateCompany {
                    name: name.to_string(),
                    url: url.to_string(),
                    raw_name: name.to_string(),
                    search_term_used: "test".to_string(),
                });
                factory
                    .emails
                    .insert(url.to_string(), emails.into_iter().map(String::from).collect());
            }
            factory
        }
    }

    impl ScraperFactory for MockScraperFactory {
        fn create(&self) -> Box<dyn CompanyScraper> {
            Box::new(MockScraper {
                script: self.clone(),
            })
        }
    }

    pub struct MockScraper {
        script: MockScraperFactory,
    }

    #[async_trait]
    impl CompanyScraper for MockScraper {
        async fn search_companies(&self, _term: &str, max: usize) -> Vec<CandidateCompany> {
            tokio::time::sleep(self.script.delay).await;
            let mut companies = self.script.companies.clone();
            companies.truncate(max);
            companies
        }

        async fn scrape_company_page(
            &mut self,
            company_url: &str,
        ) -> Result<Vec<String>, ScrapeError> {
            tokio::time::sleep(self.script.delay).await;
            if let Some(msg) = &self.script.fatal_error {
                return Err(ScrapeError::Fatal(msg.clone()));
            }
            if self.script.fail_session {
                return Err(ScrapeError::SessionSetup(SessionError::Setup(
                    "no chromedriver".to_string(),
                )));
            }
            Ok(self
                .script
                .emails
                .get(company_url)
                .cloned()
                .unwrap_or_default())
        }

        async fn scrape_reviews_for_emails(
            &mut self,
            company_url: &str,
        ) -> Result<Vec<String>, ScrapeError> {
            Ok(self
                .script
                .review_emails
                .get(company_url)
                .cloned()
                .unwrap_or_default())
        }

        async fn cleanup(&mut self) {}
    }
}
