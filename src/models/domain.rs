use serde::{Deserialize, Serialize};
use validator::Validate;

/// Upper salary bound used when a profile or job leaves it unset
pub const DEFAULT_SALARY_MAX: f64 = 999_999.0;

/// Job seeker profile with search criteria
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[validate(email)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub desired_location: String,
    #[serde(default)]
    pub job_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_max: Option<f64>,
}

/// A bound of 0 counts as unset
fn salary_bound(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| *v != 0.0).unwrap_or(default)
}

impl Profile {
    /// Lower salary bound, defaulting to 0
    pub fn salary_floor(&self) -> f64 {
        salary_bound(self.salary_min, 0.0)
    }

    /// Upper salary bound; unset or 0 means 999999
    pub fn salary_ceiling(&self) -> f64 {
        salary_bound(self.salary_max, DEFAULT_SALARY_MAX)
    }
}

/// Job posting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Job {
    /// Published lower salary bound, 0 when unset
    pub fn salary_floor(&self) -> f64 {
        salary_bound(self.salary_min, 0.0)
    }

    /// Published upper salary bound; unset or 0 means 999999
    pub fn salary_ceiling(&self) -> f64 {
        salary_bound(self.salary_max, DEFAULT_SALARY_MAX)
    }

    /// Salary range as displayed to users, `N/A` for a missing bound
    pub fn salary_range(&self) -> String {
        format!(
            "{} - {}",
            format_salary(self.salary_min),
            format_salary(self.salary_max)
        )
    }
}

fn default_url() -> String {
    "#".to_string()
}

fn format_salary(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => "N/A".to_string(),
    }
}

/// Ranked job recommendation for a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub job_id: String,
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub salary_range: String,
    pub score: f64,
    pub url: String,
}

impl Recommendation {
    pub fn from_job(job: &Job, score: f64) -> Self {
        Self {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            salary_range: job.salary_range(),
            score,
            url: job.url.clone(),
        }
    }
}

/// Bonus amounts added on top of the text similarity
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct BonusWeights {
    pub location: f64,
    pub job_type: f64,
    pub salary: f64,
}

impl Default for BonusWeights {
    fn default() -> Self {
        Self {
            location: 0.15,
            job_type: 0.10,
            salary: 0.10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_defaults_from_sparse_json() {
        let job: Job = serde_json::from_str(r#"{"id": "j1", "title": "Dev"}"#).unwrap();
        assert_eq!(job.url, "#");
        assert!(job.required_skills.is_empty());
        assert_eq!(job.salary_range(), "N/A - N/A");
    }

    #[test]
    fn test_salary_range_formatting() {
        let job = Job {
            id: "j1".to_string(),
            salary_min: Some(35000.0),
            salary_max: Some(42500.5),
            ..Default::default()
        };
        assert_eq!(job.salary_range(), "35000 - 42500.5");
    }

    #[test]
    fn test_profile_salary_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"id": "p1"}"#).unwrap();
        assert_eq!(profile.salary_floor(), 0.0);
        assert_eq!(profile.salary_ceiling(), DEFAULT_SALARY_MAX);
    }

    #[test]
    fn test_zero_salary_bounds_count_as_unset() {
        let profile = Profile {
            id: "p1".to_string(),
            salary_min: Some(0.0),
            salary_max: Some(0.0),
            ..Default::default()
        };
        assert_eq!(profile.salary_floor(), 0.0);
        assert_eq!(profile.salary_ceiling(), DEFAULT_SALARY_MAX);

        let job = Job {
            id: "j1".to_string(),
            salary_min: Some(45000.0),
            salary_max: Some(0.0),
            ..Default::default()
        };
        assert_eq!(job.salary_floor(), 45000.0);
        assert_eq!(job.salary_ceiling(), DEFAULT_SALARY_MAX);
    }

    #[test]
    fn test_profile_email_validation() {
        let mut profile = Profile {
            id: "p1".to_string(),
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(profile.validate().is_err());

        profile.email = Some("alice@example.com".to_string());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_bonus_weights_partial_override() {
        let weights: BonusWeights = serde_json::from_str(r#"{"salary": 0.05}"#).unwrap();
        assert_eq!(weights.salary, 0.05);
        assert_eq!(weights.location, 0.15);
        assert_eq!(weights.job_type, 0.10);
    }
}
