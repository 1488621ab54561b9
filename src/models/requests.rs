use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request recommendations for a stored profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "profileId")]
    pub profile_id: String,
}

/// Request to send a test recommendation email
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendTestEmailRequest {
    #[validate(email)]
    #[serde(default)]
    pub email: String,
}

/// Request to scrape jobs from the job search API into the jobs file
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScrapeJobsRequest {
    #[validate(length(min = 1))]
    pub queries: Vec<String>,
    #[serde(default = "default_scrape_location")]
    pub location: String,
    #[validate(range(min = 1, max = 10))]
    #[serde(default = "default_scrape_pages")]
    pub pages: u32,
}

fn default_scrape_location() -> String {
    "France".to_string()
}

fn default_scrape_pages() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_request_validation() {
        let missing: SendTestEmailRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.validate().is_err());

        let ok = SendTestEmailRequest {
            email: "bob@example.org".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_recommend_request_accepts_camel_case() {
        let req: RecommendRequest = serde_json::from_str(r#"{"profileId": "p7"}"#).unwrap();
        assert_eq!(req.profile_id, "p7");
    }

    #[test]
    fn test_scrape_request_defaults_and_limits() {
        let req: ScrapeJobsRequest = serde_json::from_str(r#"{"queries": ["rust"]}"#).unwrap();
        assert_eq!(req.location, "France");
        assert_eq!(req.pages, 1);
        assert!(req.validate().is_ok());

        let empty: ScrapeJobsRequest = serde_json::from_str(r#"{"queries": []}"#).unwrap();
        assert!(empty.validate().is_err());

        let too_many: ScrapeJobsRequest =
            serde_json::from_str(r#"{"queries": ["rust"], "pages": 50}"#).unwrap();
        assert!(too_many.validate().is_err());
    }
}
