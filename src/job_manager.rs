use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use log::{error, info, warn};
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::config;
use crate::scraper::{ScrapeError, ScraperFactory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Cancelled,
    Error,
}

impl JobState {
    fn is_terminal(self) -> bool {
        matches!(self, JobState::Completed | JobState::Cancelled | JobState::Error)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyResult {
    pub name: String,
    pub url: String,
    pub raw_name: String,
    pub company_emails: Vec<String>,
    pub total_emails: usize,
    pub sector: String,
    pub scraped_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobStatus {
    pub id: String,
    pub search_term: String,
    pub status: JobState,
    pub progress: u8,
    pub total_companies: usize,
    pub companies_found: usize,
    pub companies_processed: usize,
    pub emails_found: usize,
    pub results: Vec<CompanyResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResultsSummary {
    pub search_term: String,
    pub companies_found: usize,
    pub emails_found: usize,
    pub results: Vec<CompanyResult>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("search term is required")]
    InvalidInput,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum JobQueryError {
    #[error("job not found")]
    NotFound,
    #[error("job not completed yet")]
    NotReady,
}

type JobMap = Arc<Mutex<HashMap<String, JobStatus>>>;

/// Owns the job registry and runs each submitted job on its own tokio task.
/// Concurrent job execution is bounded by a semaphore; jobs past the bound
/// queue in `pending`. Each job's fields are written only by its own worker,
/// pollers get snapshot clones under the registry lock.
pub struct JobManager {
    jobs: JobMap,
    factory: Arc<dyn ScraperFactory>,
    limiter: Arc<Semaphore>,
    company_delay: Duration,
}

impl JobManager {
    pub fn new(factory: Arc<dyn ScraperFactory>, max_concurrent: usize) -> Self {
        JobManager {
            jobs: Arc::new(Mutex::new(HashMap::new())),
            factory,
            limiter: Arc::new(Semaphore::new(max_concurrent.max(1))),
            company_delay: config::DELAY_BETWEEN_COMPANIES,
        }
    }

    /// Overrides the inter-company throttle delay.
    pub fn with_company_delay(mut self, delay: Duration) -> Self {
        self.company_delay = delay;
        self
    }

    /// Validates the term, registers a pending job and schedules it. Returns
    /// the job id immediately.
    pub fn submit(
        &self,
        search_term: &str,
        max_companies: usize,
        scrape_all_emails: bool,
    ) -> Result<String, SubmitError> {
        let term = search_term.trim();
        if term.is_empty() {
            return Err(SubmitError::InvalidInput);
        }

        let job_id = {
            let mut jobs = self.jobs.lock().unwrap();
            let base = format!("search_{}", Local::now().timestamp_millis());
            let mut job_id = base.clone();
            let mut bump = 1;
            while jobs.contains_key(&job_id) {
                job_id = format!("{}_{}", base, bump);
                bump += 1;
            }

            jobs.insert(
                job_id.clone(),
                JobStatus {
                    id: job_id.clone(),
                    search_term: term.to_string(),
                    status: JobState::Pending,
                    progress: 0,
                    total_companies: 0,
                    companies_found: 0,
                    companies_processed: 0,
                    emails_found: 0,
                    results: Vec::new(),
                    error: None,
                    created_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                },
            );
            job_id
        };

        info!(
            "Starting search job {}: '{}' (max companies: {}, scrape all emails: {})",
            job_id, term, max_companies, scrape_all_emails
        );

        let jobs = self.jobs.clone();
        let factory = self.factory.clone();
        let limiter = self.limiter.clone();
        let delay = self.company_delay;
        let term = term.to_string();
        let id = job_id.clone();
        tokio::spawn(async move {
            run_job(
                id,
                jobs,
                factory,
                limiter,
                delay,
                term,
                max_companies,
                scrape_all_emails,
            )
            .await;
        });

        Ok(job_id)
    }

    /// Marks a job cancelled. The worker stops before starting the next
    /// company; partial results are retained. No-op on terminal jobs.
    pub fn cancel(&self, job_id: &str) -> Result<(), JobQueryError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs.get_mut(job_id).ok_or(JobQueryError::NotFound)?;
        if !job.status.is_terminal() {
            job.status = JobState::Cancelled;
            info!("Job {} cancelled", job_id);
        }
        Ok(())
    }

    pub fn get_progress(&self, job_id: &str) -> Result<JobStatus, JobQueryError> {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .cloned()
            .ok_or(JobQueryError::NotFound)
    }

    pub fn get_results(&self, job_id: &str) -> Result<ResultsSummary, JobQueryError> {
        let job = self.get_completed(job_id)?;
        Ok(ResultsSummary {
            search_term: job.search_term,
            companies_found: job.companies_found,
            emails_found: job.emails_found,
            results: job.results,
        })
    }

    /// Full snapshot of a completed job, for export.
    pub fn get_completed(&self, job_id: &str) -> Result<JobStatus, JobQueryError> {
        let job = self.get_progress(job_id)?;
        if job.status != JobState::Completed {
            return Err(JobQueryError::NotReady);
        }
        Ok(job)
    }
}

fn update_job(jobs: &JobMap, job_id: &str, apply: impl FnOnce(&mut JobStatus)) {
    if let Some(job) = jobs.lock().unwrap().get_mut(job_id) {
        apply(job);
    }
}

fn job_state(jobs: &JobMap, job_id: &str) -> Option<JobState> {
    jobs.lock().unwrap().get(job_id).map(|job| job.status)
}

#[allow(clippy::too_many_arguments)]
async fn run_job(
    job_id: String,
    jobs: JobMap,
    factory: Arc<dyn ScraperFactory>,
    limiter: Arc<Semaphore>,
    company_delay: Duration,
    search_term: String,
    max_companies: usize,
    scrape_all_emails: bool,
) {
    // Bounded admission: stay pending until a worker slot frees up.
    let _permit = match limiter.acquire_owned().await {
        Ok(permit) => permit,
        Err(_) => return,
    };
    if job_state(&jobs, &job_id) == Some(JobState::Cancelled) {
        return;
    }

    update_job(&jobs, &job_id, |job| job.status = JobState::Running);

    let mut scraper = factory.create();
    let max = if max_companies == 0 {
        config::DEFAULT_MAX_COMPANIES
    } else {
        max_companies
    };
    let companies = scraper.search_companies(&search_term, max).await;

    update_job(&jobs, &job_id, |job| {
        job.total_companies = companies.len();
        job.companies_found = companies.len();
    });

    if companies.is_empty() {
        update_job(&jobs, &job_id, |job| {
            if job.status == JobState::Running {
                job.status = JobState::Completed;
                job.progress = 100;
            }
        });
        scraper.cleanup().await;
        return;
    }

    let total = companies.len();
    for (i, company) in companies.iter().enumerate() {
        if job_state(&jobs, &job_id) == Some(JobState::Cancelled) {
            break;
        }

        update_job(&jobs, &job_id, |job| {
            job.companies_processed = i + 1;
            job.progress = ((i + 1) as f64 / total as f64 * 100.0).round() as u8;
        });

        info!(
            "Processing company {}/{}: {}",
            i + 1,
            total,
            company.name
        );

        let mut emails = match scraper.scrape_company_page(&company.url).await {
            Ok(emails) => emails,
            Err(ScrapeError::SessionSetup(e)) => {
                warn!("Skipping {}: {}", company.name, e);
                Vec::new()
            }
            Err(ScrapeError::Fatal(msg)) => {
                error!("Job {} failed at {}: {}", job_id, company.name, msg);
                update_job(&jobs, &job_id, |job| {
                    job.status = JobState::Error;
                    job.error = Some(msg);
                });
                scraper.cleanup().await;
                return;
            }
        };

        if scrape_all_emails {
            // Best-effort supplementary pass; failures here never abort the job.
            match scraper.scrape_reviews_for_emails(&company.url).await {
                Ok(extra) => {
                    for email in extra {
                        if !emails.contains(&email) {
                            emails.push(email);
                        }
                    }
                }
                Err(e) => warn!("Review scan failed for {}: {}", company.name, e),
            }
        } else {
            emails.truncate(config::MAX_EMAILS_PER_COMPANY);
        }

        if emails.is_empty() {
            info!("Skipping company {} - no emails found", company.name);
        } else {
            update_job(&jobs, &job_id, |job| {
                job.emails_found += emails.len();
                job.results.push(CompanyResult {
                    name: company.name.clone(),
                    url: company.url.clone(),
                    raw_name: company.raw_name.clone(),
                    total_emails: emails.len(),
                    company_emails: emails.clone(),
                    sector: search_term.clone(),
                    scraped_at: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
                });
            });
        }

        // Throttle against the remote host between companies.
        if i + 1 < total {
            tokio::time::sleep(company_delay).await;
        }
    }

    update_job(&jobs, &job_id, |job| {
        if job.status == JobState::Running {
            job.status = JobState::Completed;
            job.progress = 100;
        }
    });
    scraper.cleanup().await;
}
