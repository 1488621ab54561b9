// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{BonusWeights, Job, Profile, Recommendation, DEFAULT_SALARY_MAX};
pub use requests::{RecommendRequest, ScrapeJobsRequest, SendTestEmailRequest};
pub use responses::{
    ErrorResponse, HealthResponse, ProfilesResponse, RecommendationsResponse, ScrapeJobsResponse,
    SendEmailResponse,
};
