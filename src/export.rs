use chrono::Local;

use crate::config;
use crate::job_manager::JobStatus;

/// Tabular encoding of a completed job's results.
pub fn results_to_csv(job: &JobStatus) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "Company Name",
        "Company URL",
        "Company Contact Info",
        "Total Emails",
        "Sector",
        "Scraped At",
    ])?;

    for result in &job.results {
        writer.write_record([
            result.name.as_str(),
            result.url.as_str(),
            &result.company_emails.join("; "),
            &result.total_emails.to_string(),
            result.sector.as_str(),
            result.scraped_at.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(writer.into_inner().expect("in-memory writer already flushed"))
}

/// Structured encoding mirroring the full job snapshot.
pub fn job_to_json(job: &JobStatus) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(job)
}

/// Export filenames embed the job id and the export timestamp.
pub fn export_filename(job_id: &str, extension: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        config::EXPORT_FILENAME_PREFIX,
        job_id,
        Local::now().format("%Y%m%d_%H%M%S"),
        extension
    )
}
