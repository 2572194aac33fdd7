use log::{info, warn};
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Serialize;

use crate::config;
use crate::normalizer::NameNormalizer;
use crate::query_expander::expand_search_terms;

/// A company discovered from a search-results page. Transient: lives only
/// until the job loop turns it into a result (or discards it).
#[derive(Debug, Clone, Serialize)]
pub struct CandidateCompany {
    pub name: String,
    pub url: String,
    pub raw_name: String,
    pub search_term_used: String,
}

pub struct Discoverer {
    client: Client,
    base_url: String,
    normalizer: NameNormalizer,
}

impl Discoverer {
    pub fn new(base_url: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .timeout(config::SEARCH_TIMEOUT)
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build search client");

        Discoverer {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            normalizer: NameNormalizer::new(),
        }
    }

    fn random_user_agent() -> &'static str {
        let uas = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
        ];
        let mut rng = rand::thread_rng();
        uas[rng.gen_range(0..uas.len())]
    }

    /// Searches the platform for companies matching `term`, trying each query
    /// variant in order until `max` companies are accumulated. One variant
    /// failing to fetch does not abort the remaining variants.
    pub async fn discover(&self, term: &str, max: usize) -> Vec<CandidateCompany> {
        let mut companies = Vec::new();
        if max == 0 {
            return companies;
        }

        for variant in expand_search_terms(term) {
            if companies.len() >= max {
                break;
            }

            let search_url = format!(
                "{}/search?query={}",
                self.base_url,
                urlencoding::encode(&variant)
            );

            let html = match self.fetch(&search_url).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Search fetch failed for '{}': {}", variant, e);
                    continue;
                }
            };

            self.collect_candidates(&html, &variant, max, &mut companies);
        }

        info!("Found {} companies for search term: {}", companies.len(), term);
        companies
    }

    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, Self::random_user_agent())
            .send()
            .await?
            .error_for_status()?;
        resp.text().await
    }

    /// Parses a search-results page for company detail links and appends the
    /// ones with a meaningful, not-yet-seen normalized name.
    fn collect_candidates(
        &self,
        html: &str,
        variant: &str,
        max: usize,
        companies: &mut Vec<CandidateCompany>,
    ) {
        let document = Html::parse_document(html);
        let selector = Selector::parse("a").unwrap();

        for element in document.select(&selector) {
            if companies.len() >= max {
                break;
            }

            let href = match element.value().attr("href") {
                Some(h) if h.contains("/review/") => h,
                _ => continue,
            };

            let raw_name = element.text().collect::<Vec<_>>().join(" ");
            let raw_name = raw_name.trim().to_string();
            let clean_name = self.normalizer.normalize(&raw_name);

            // Short leftovers are noise, not names.
            if clean_name.chars().count() < 3 {
                continue;
            }
            if companies.iter().any(|c| c.name == clean_name) {
                continue;
            }

            let url = if href.starts_with('/') {
                format!("{}{}", self.base_url, href)
            } else {
                href.to_string()
            };

            companies.push(CandidateCompany {
                name: clean_name,
                url,
                raw_name,
                search_term_used: variant.to_string(),
            });
        }
    }
}
