use crate::config::{DataSettings, JSearchSettings, Settings};
use crate::core::{MatchError, Recommender};
use crate::models::{
    ErrorResponse, HealthResponse, Profile, ProfilesResponse, RecommendRequest,
    RecommendationsResponse, ScrapeJobsRequest, ScrapeJobsResponse, SendEmailResponse,
    SendTestEmailRequest,
};
use crate::services::{
    BatchJob, DataError, DataStore, EmailService, HttpMailTransport, JSearchClient, JSearchError,
    MailError, ModelStore,
};
use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub data: DataSettings,
    pub jsearch: JSearchSettings,
    pub recommender: Recommender,
    pub models: ModelStore,
    pub mailer: Arc<EmailService<HttpMailTransport>>,
}

impl AppState {
    pub fn from_settings(settings: &Settings) -> Result<Self, MailError> {
        let transport = HttpMailTransport::from_settings(&settings.mail)?;

        Ok(Self {
            data: settings.data.clone(),
            jsearch: settings.jsearch.clone(),
            recommender: settings.recommender(),
            models: ModelStore::new(settings.model_cache.capacity, settings.model_cache.ttl_secs),
            mailer: Arc::new(EmailService::new(transport, settings.mail.default_sender.clone())),
        })
    }

    /// Batch job sharing this state's model cache and mailer
    pub fn batch_job(&self) -> BatchJob<HttpMailTransport> {
        BatchJob {
            data: self.data.clone(),
            recommender: self.recommender.clone(),
            models: self.models.clone(),
            mailer: Arc::clone(&self.mailer),
        }
    }
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/profiles", web::get().to(list_profiles))
        .route("/recommendations/test", web::post().to(test_recommendations))
        .route("/recommendations", web::post().to(recommend_for_profile))
        .route("/email/test", web::post().to(send_test_email))
        .route("/jobs/scrape", web::post().to(scrape_jobs))
        .route("/batch/run", web::post().to(run_batch_now));
}

fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

fn match_error_response(err: &MatchError) -> HttpResponse {
    let status = match err {
        MatchError::ModelNotTrained => StatusCode::SERVICE_UNAVAILABLE,
        MatchError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    };
    error_response(status, "Matching failed", err.to_string())
}

fn data_error_response(err: &DataError) -> HttpResponse {
    let status = match err {
        DataError::InvalidProfile { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, "Failed to load data", err.to_string())
}

fn load_data(settings: &DataSettings) -> Result<DataStore, DataError> {
    let mut store = DataStore::new();
    store.load_profiles(&settings.profiles_file)?;
    store.load_jobs(&settings.jobs_file)?;
    Ok(store)
}

/// Train (or reuse) the batch model and recommend jobs for one profile
async fn recommendations_for(
    state: &AppState,
    store: &DataStore,
    profile: &Profile,
) -> Result<RecommendationsResponse, MatchError> {
    let model = state
        .models
        .get_or_train(&state.recommender, store.profiles(), store.jobs())
        .await;
    let recommendations = state.recommender.recommend(model.as_ref(), profile, store.jobs())?;
    Ok(RecommendationsResponse::new(profile.name.clone(), recommendations))
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// GET /api/v1/profiles
async fn list_profiles(state: web::Data<AppState>) -> impl Responder {
    let mut store = DataStore::new();
    match store.load_profiles(&state.data.profiles_file) {
        Ok(profiles) => HttpResponse::Ok().json(ProfilesResponse {
            success: true,
            profiles: profiles.to_vec(),
        }),
        Err(e) => {
            tracing::error!("Failed to load profiles: {}", e);
            data_error_response(&e)
        }
    }
}

/// Recommendations for the first stored profile
///
/// POST /api/v1/recommendations/test
async fn test_recommendations(state: web::Data<AppState>) -> impl Responder {
    let store = match load_data(&state.data) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load data: {}", e);
            return data_error_response(&e);
        }
    };

    let Some(profile) = store.profiles().first() else {
        return error_response(
            StatusCode::NOT_FOUND,
            "No profiles available",
            "No profile found".to_string(),
        );
    };

    tracing::info!("Computing test recommendations for {}", profile.name);

    match recommendations_for(&state, &store, profile).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!("Recommendation failed for {}: {}", profile.id, e);
            match_error_response(&e)
        }
    }
}

/// Recommendations for a stored profile
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// { "profile_id": "string" }
/// ```
async fn recommend_for_profile(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendations request: {:?}", errors);
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let store = match load_data(&state.data) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load data: {}", e);
            return data_error_response(&e);
        }
    };

    let Some(profile) = store.get_profile(&req.profile_id) else {
        return error_response(
            StatusCode::NOT_FOUND,
            "Profile not found",
            format!("No profile with id {}", req.profile_id),
        );
    };

    match recommendations_for(&state, &store, profile).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            tracing::error!("Recommendation failed for {}: {}", profile.id, e);
            match_error_response(&e)
        }
    }
}

/// Mail the first profile's recommendations to an arbitrary address
///
/// POST /api/v1/email/test
async fn send_test_email(
    state: web::Data<AppState>,
    req: web::Json<SendTestEmailRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let store = match load_data(&state.data) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to load data: {}", e);
            return data_error_response(&e);
        }
    };

    let Some(profile) = store.profiles().first() else {
        return error_response(
            StatusCode::NOT_FOUND,
            "No profiles available",
            "No profile found".to_string(),
        );
    };

    let response = match recommendations_for(&state, &store, profile).await {
        Ok(response) => response,
        Err(e) => return match_error_response(&e),
    };

    let sent = state
        .mailer
        .send_recommendations(&profile.name, &req.email, &response.recommendations)
        .await;

    let message = if sent {
        format!("Email sent to {}", req.email)
    } else if response.recommendations.is_empty() {
        "No recommendations to send".to_string()
    } else {
        format!("Failed to send email to {}", req.email)
    };

    HttpResponse::Ok().json(SendEmailResponse { success: sent, message })
}

/// Search the job API and replace the jobs file with the results
///
/// POST /api/v1/jobs/scrape
///
/// Request body:
/// ```json
/// { "queries": ["développeur python"], "location": "France", "pages": 1 }
/// ```
async fn scrape_jobs(
    state: web::Data<AppState>,
    req: web::Json<ScrapeJobsRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string());
    }

    let mut client = match JSearchClient::from_settings(&state.jsearch) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build job search client: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Job search failed",
                e.to_string(),
            );
        }
    };

    for query in &req.queries {
        if let Err(e) = client.search_jobs(query, &req.location, req.pages).await {
            let status = match e {
                JSearchError::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
                JSearchError::RequestError(_) => StatusCode::BAD_GATEWAY,
            };
            return error_response(status, "Job search failed", e.to_string());
        }
    }

    let saved = match client.save_to_json(&state.data.jobs_file) {
        Ok(saved) => saved,
        Err(e) => {
            tracing::error!("Failed to save scraped jobs: {}", e);
            return data_error_response(&e);
        }
    };

    HttpResponse::Ok().json(ScrapeJobsResponse {
        success: true,
        saved,
        errors: client.errors().to_vec(),
        top_companies: client.stats().top_companies,
    })
}

/// Run the daily batch immediately
///
/// POST /api/v1/batch/run
async fn run_batch_now(state: web::Data<AppState>) -> impl Responder {
    match state.batch_job().run().await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            tracing::error!("Batch run failed: {}", e);
            data_error_response(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_health_check() {
        let resp = health_check().await;
        let http_resp = resp.respond_to(&actix_web::test::TestRequest::default().to_http_request());
        assert_eq!(http_resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_model_not_trained_maps_to_503() {
        let resp = match_error_response(&MatchError::ModelNotTrained);
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.status_code, 503);
    }

    #[test]
    fn test_invalid_input_maps_to_400() {
        let resp = match_error_response(&MatchError::InvalidInput("empty".to_string()));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
