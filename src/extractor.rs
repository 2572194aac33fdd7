use std::collections::HashSet;

use log::{debug, warn};
use regex::Regex;
use scraper::{Html, Selector};
use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;

use crate::config;
use crate::session;

/// Consumer webmail domains excluded from company results.
pub const PERSONAL_EMAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "protonmail.com",
    "mail.com",
];

const CONTACT_TEXT_XPATH: &str = "//*[contains(text(), 'Contact') or contains(text(), 'contact') or contains(text(), 'Email') or contains(text(), 'email')]";
const CONTACT_ATTR_XPATH: &str = "//*[contains(@class, 'contact') or contains(@class, 'email') or contains(@placeholder, 'email')]";

pub struct ContactExtractor {
    email_regex: Regex,
}

impl ContactExtractor {
    pub fn new() -> Self {
        ContactExtractor {
            email_regex: Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").unwrap(),
        }
    }

    /// Scans `text` for email addresses. Results are lowercased and deduped
    /// preserving first-seen order; image filenames that match the pattern
    /// (logo@2x.png and friends) are discarded.
    pub fn extract_emails(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut emails = Vec::new();
        for m in self.email_regex.find_iter(text) {
            let email = m.as_str().to_lowercase();
            if email.ends_with(".png")
                || email.ends_with(".jpg")
                || email.ends_with(".jpeg")
                || email.ends_with(".gif")
                || email.ends_with(".webp")
            {
                continue;
            }
            if seen.insert(email.clone()) {
                emails.push(email);
            }
        }
        emails
    }

    pub fn is_personal_email(&self, email: &str) -> bool {
        let domain = email.rsplit('@').next().unwrap_or("").to_lowercase();
        PERSONAL_EMAIL_DOMAINS.contains(&domain.as_str())
    }

    /// Emails in `text` that do not belong to a personal webmail domain.
    pub fn company_emails_in(&self, text: &str) -> Vec<String> {
        self.extract_emails(text)
            .into_iter()
            .filter(|e| !self.is_personal_email(e))
            .collect()
    }

    /// Renders a company page and collects company contact emails from its
    /// contact affordances. Individual stale or unreadable elements are
    /// skipped; a navigation failure propagates to the caller.
    pub async fn collect_company_emails(
        &self,
        driver: &WebDriver,
        company_url: &str,
    ) -> Result<Vec<String>, WebDriverError> {
        driver.goto(company_url).await?;
        tokio::time::sleep(config::PAGE_SETTLE_DELAY).await;

        let mut seen = HashSet::new();
        let mut emails = Vec::new();

        // Pass 1: elements whose text mentions a contact/email affordance.
        // The address usually sits in the surrounding block, so read the
        // parent's text.
        let sections =
            session::find_all_guarded(driver, By::XPath(CONTACT_TEXT_XPATH), "contact sections")
                .await;
        for section in sections {
            let parent = match section.find(By::XPath("./..")).await {
                Ok(p) => p,
                Err(_) => continue, // stale element, skip
            };
            match parent.text().await {
                Ok(text) => {
                    for email in self.company_emails_in(&text) {
                        if seen.insert(email.clone()) {
                            emails.push(email);
                        }
                    }
                }
                Err(e) => debug!("Could not read contact section text: {}", e),
            }
        }

        // Pass 2: elements flagged by class or placeholder attributes.
        let forms =
            session::find_all_guarded(driver, By::XPath(CONTACT_ATTR_XPATH), "contact forms")
                .await;
        for form in forms {
            match form.text().await {
                Ok(text) => {
                    for email in self.company_emails_in(&text) {
                        if seen.insert(email.clone()) {
                            emails.push(email);
                        }
                    }
                }
                Err(e) => debug!("Could not read contact form text: {}", e),
            }
        }

        Ok(emails)
    }

    /// Best-effort companion scan: loads the review listing for a company and
    /// harvests any addresses mentioned in review bodies. No personal-domain
    /// filter here; bounded by `max` addresses.
    pub async fn collect_review_emails(
        &self,
        driver: &WebDriver,
        company_url: &str,
        max: usize,
    ) -> Result<Vec<String>, WebDriverError> {
        let reviews_url = company_url.replace("/review/", "/reviews/");
        driver.goto(&reviews_url).await?;
        tokio::time::sleep(config::PAGE_SETTLE_DELAY).await;

        for _ in 0..config::REVIEW_SCROLL_ROUNDS {
            if let Err(e) = driver
                .execute("window.scrollTo(0, document.body.scrollHeight);", Vec::new())
                .await
            {
                warn!("Scroll failed on {}: {}", reviews_url, e);
                break;
            }
            tokio::time::sleep(config::REVIEW_SCROLL_DELAY).await;
        }

        let source = driver.source().await?;
        Ok(self.review_emails_in_html(&source, max))
    }

    fn review_emails_in_html(&self, html: &str, max: usize) -> Vec<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("p, div, span").unwrap();

        let mut seen = HashSet::new();
        let mut emails = Vec::new();
        for element in document.select(&selector) {
            if emails.len() >= max {
                break;
            }
            let class_attr = element.value().attr("class").unwrap_or("").to_lowercase();
            let looks_like_review = ["review", "comment", "text", "content"]
                .iter()
                .any(|token| class_attr.contains(token));
            if !looks_like_review {
                continue;
            }

            let text = element.text().collect::<Vec<_>>().join(" ");
            for email in self.extract_emails(&text) {
                if emails.len() >= max {
                    break;
                }
                if seen.insert(email.clone()) {
                    emails.push(email);
                }
            }
        }
        emails
    }
}

impl Default for ContactExtractor {
    fn default() -> Self {
        Self::new()
    }
}
