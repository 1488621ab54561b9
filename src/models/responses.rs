use serde::{Deserialize, Serialize};
use crate::models::domain::{Profile, Recommendation};

/// Recommendations computed for one profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub success: bool,
    pub profile_name: String,
    pub recommendations: Vec<Recommendation>,
    pub total: usize,
}

impl RecommendationsResponse {
    pub fn new(profile_name: String, recommendations: Vec<Recommendation>) -> Self {
        Self {
            success: true,
            profile_name,
            total: recommendations.len(),
            recommendations,
        }
    }
}

/// Stored profiles listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesResponse {
    pub success: bool,
    pub profiles: Vec<Profile>,
}

/// Outcome of a test email send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
}

/// Outcome of a job search scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJobsResponse {
    pub success: bool,
    pub saved: usize,
    pub errors: Vec<String>,
    pub top_companies: Vec<(String, usize)>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
