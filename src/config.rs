use std::time::Duration;

// Target platform
pub const BASE_URL: &str = "https://www.trustpilot.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

// Scraping behaviour
pub const DEFAULT_MAX_COMPANIES: usize = 10;
pub const MAX_EMAILS_PER_COMPANY: usize = 10;
pub const DELAY_BETWEEN_COMPANIES: Duration = Duration::from_millis(500);
pub const PAGE_SETTLE_DELAY: Duration = Duration::from_secs(1);
pub const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(15);
pub const ELEMENT_TIMEOUT: Duration = Duration::from_secs(5);

// Review-page companion scan
pub const MAX_REVIEW_EMAILS: usize = 50;
pub const REVIEW_SCROLL_ROUNDS: usize = 3;
pub const REVIEW_SCROLL_DELAY: Duration = Duration::from_secs(2);

// Chrome session
pub const CHROME_WINDOW_SIZE: &str = "1920,1080";

// Export
pub const EXPORT_FILENAME_PREFIX: &str = "company_emails";

pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(5000)
}

pub fn webdriver_url() -> String {
    std::env::var("WEBDRIVER_URL").unwrap_or_else(|_| "http://localhost:9515".to_string())
}

pub fn max_concurrent_jobs() -> usize {
    std::env::var("MAX_CONCURRENT_JOBS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(4)
}
