pub mod config;
pub mod discovery;
pub mod export;
pub mod extractor;
pub mod job_manager;
pub mod logger;
pub mod normalizer;
pub mod query_expander;
pub mod scraper;
pub mod sectors;
pub mod server;
pub mod session;

// Exporting types for convenience
pub use discovery::{CandidateCompany, Discoverer};
pub use extractor::ContactExtractor;
pub use job_manager::{JobManager, JobState, JobStatus};
pub use normalizer::NameNormalizer;
pub use scraper::{CompanyScraper, PlatformScraper, PlatformScraperFactory, ScraperFactory};
pub use session::SessionManager;
