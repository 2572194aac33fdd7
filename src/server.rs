use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse, Responder};
use serde::Deserialize;

use crate::config;
use crate::export;
use crate::job_manager::{JobManager, JobQueryError, SubmitError};
use crate::sectors;

pub struct AppState {
    pub job_manager: Arc<JobManager>,
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub search_term: String,
    #[serde(default = "default_max_companies")]
    pub max_companies: usize,
    #[serde(default)]
    pub scrape_all_emails: bool,
}

fn default_max_companies() -> usize {
    config::DEFAULT_MAX_COMPANIES
}

fn query_error_response(e: JobQueryError) -> HttpResponse {
    match e {
        JobQueryError::NotFound => {
            HttpResponse::NotFound().json(serde_json::json!({"error": "Job ID not found"}))
        }
        JobQueryError::NotReady => {
            HttpResponse::BadRequest().json(serde_json::json!({"error": "Job not completed yet"}))
        }
    }
}

#[get("/api/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "message": "Company email scraper is running"
    }))
}

#[post("/api/search")]
async fn start_search(body: web::Json<SearchRequest>, data: web::Data<AppState>) -> impl Responder {
    match data
        .job_manager
        .submit(&body.search_term, body.max_companies, body.scrape_all_emails)
    {
        Ok(job_id) => HttpResponse::Ok().json(serde_json::json!({
            "job_id": job_id,
            "message": "Search started successfully",
            "search_term": body.search_term.trim(),
        })),
        Err(SubmitError::InvalidInput) => HttpResponse::BadRequest()
            .json(serde_json::json!({"error": "Search term is required"})),
    }
}

#[get("/api/progress/{job_id}")]
async fn get_progress(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    match data.job_manager.get_progress(&path.into_inner()) {
        Ok(job) => HttpResponse::Ok().json(job),
        Err(e) => query_error_response(e),
    }
}

#[get("/api/results/{job_id}")]
async fn get_results(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    match data.job_manager.get_results(&path.into_inner()) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => query_error_response(e),
    }
}

#[post("/api/cancel/{job_id}")]
async fn cancel_search(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    match data.job_manager.cancel(&path.into_inner()) {
        Ok(()) => {
            HttpResponse::Ok().json(serde_json::json!({"message": "Search cancelled successfully"}))
        }
        Err(e) => query_error_response(e),
    }
}

#[get("/api/export/csv/{job_id}")]
async fn export_csv(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let job_id = path.into_inner();
    let job = match data.job_manager.get_completed(&job_id) {
        Ok(job) => job,
        Err(e) => return query_error_response(e),
    };

    match export::results_to_csv(&job) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/csv")
            .append_header((
                "Content-Disposition",
                format!(
                    "attachment; filename=\"{}\"",
                    export::export_filename(&job_id, "csv")
                ),
            ))
            .body(bytes),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": e.to_string()})),
    }
}

#[get("/api/export/json/{job_id}")]
async fn export_json(path: web::Path<String>, data: web::Data<AppState>) -> impl Responder {
    let job_id = path.into_inner();
    let job = match data.job_manager.get_completed(&job_id) {
        Ok(job) => job,
        Err(e) => return query_error_response(e),
    };

    match export::job_to_json(&job) {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("application/json")
            .append_header((
                "Content-Disposition",
                format!(
                    "attachment; filename=\"{}\"",
                    export::export_filename(&job_id, "json")
                ),
            ))
            .body(bytes),
        Err(e) => HttpResponse::InternalServerError()
            .json(serde_json::json!({"error": e.to_string()})),
    }
}

#[get("/api/sectors")]
async fn get_sectors() -> impl Responder {
    HttpResponse::Ok().json(sectors::sector_catalog())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(start_search)
        .service(get_progress)
        .service(get_results)
        .service(cancel_search)
        .service(export_csv)
        .service(export_json)
        .service(get_sectors);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::mock::MockScraperFactory;
    use actix_web::{test, App};
    use std::time::Duration;

    fn test_state(factory: MockScraperFactory) -> web::Data<AppState> {
        let job_manager = Arc::new(
            JobManager::new(Arc::new(factory), 2).with_company_delay(Duration::ZERO),
        );
        web::Data::new(AppState { job_manager })
    }

    fn diner_factory() -> MockScraperFactory {
        MockScraperFactory::with_companies(vec![(
            "Acme Diner",
            "https://t.example/review/acme",
            vec!["owner@acmediner.com"],
        )])
    }

    #[actix_web::test]
    async fn test_search_rejects_empty_term() {
        let app =
            test::init_service(App::new().app_data(test_state(diner_factory())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(serde_json::json!({"search_term": "   "}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_search_then_poll_until_completed() {
        let app =
            test::init_service(App::new().app_data(test_state(diner_factory())).configure(configure))
                .await;

        let req = test::TestRequest::post()
            .uri("/api/search")
            .set_json(serde_json::json!({"search_term": "restaurant", "max_companies": 5}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let job_id = body["job_id"].as_str().unwrap().to_string();

        let mut status = String::new();
        for _ in 0..200 {
            let req = test::TestRequest::get()
                .uri(&format!("/api/progress/{}", job_id))
                .to_request();
            let progress: serde_json::Value = test::call_and_read_body_json(&app, req).await;
            status = progress["status"].as_str().unwrap().to_string();
            if status != "pending" && status != "running" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(status, "completed");

        let req = test::TestRequest::get()
            .uri(&format!("/api/results/{}", job_id))
            .to_request();
        let results: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(results["emails_found"], 1);
        assert_eq!(results["results"][0]["name"], "Acme Diner");
    }

    #[actix_web::test]
    async fn test_unknown_job_returns_404() {
        let app =
            test::init_service(App::new().app_data(test_state(diner_factory())).configure(configure))
                .await;

        for uri in [
            "/api/progress/search_0",
            "/api/results/search_0",
            "/api/export/csv/search_0",
            "/api/export/json/search_0",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 404, "{}", uri);
        }

        let req = test::TestRequest::post()
            .uri("/api/cancel/search_0")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_sectors_catalog_served() {
        let app =
            test::init_service(App::new().app_data(test_state(diner_factory())).configure(configure))
                .await;

        let req = test::TestRequest::get().uri("/api/sectors").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["real_estate"]["name"], "Real Estate");
        assert!(body["custom"]["search_terms"].as_array().unwrap().is_empty());
    }
}
