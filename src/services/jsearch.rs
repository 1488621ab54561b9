use crate::config::JSearchSettings;
use crate::models::Job;
use crate::services::data::{write_json, DataError};
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Skills looked for in job descriptions
const TECH_SKILLS: &[&str] = &[
    "Python", "JavaScript", "Java", "C++", "C#", "PHP", "Ruby", "Go", "Rust",
    "React", "Vue", "Angular", "Node.js", "Django", "Flask", "Spring",
    "Machine Learning", "Deep Learning", "AI", "Data Analysis", "SQL",
    "Git", "Docker", "Kubernetes", "AWS", "Azure", "GCP",
    "HTML", "CSS", "REST API", "GraphQL", "MongoDB", "PostgreSQL",
];

const SOURCE_NAME: &str = "JSearch API";

/// Errors that can occur when talking to the job search API
#[derive(Debug, Error)]
pub enum JSearchError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API key is not configured")]
    MissingApiKey,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<RawJob>,
}

#[derive(Debug, Default, Deserialize)]
struct RawJob {
    job_id: Option<String>,
    job_title: Option<String>,
    employer_name: Option<String>,
    job_location: Option<String>,
    job_description: Option<String>,
    job_employment_type: Option<String>,
    job_salary_min: Option<f64>,
    job_salary_max: Option<f64>,
    job_posted_at_datetime_utc: Option<String>,
    job_apply_link: Option<String>,
}

/// Counts of scraped jobs per company and location
#[derive(Debug, Clone, Serialize)]
pub struct SearchStats {
    pub total_jobs: usize,
    pub errors: usize,
    pub top_companies: Vec<(String, usize)>,
    pub top_locations: Vec<(String, usize)>,
}

/// Scrape output; the `jobs` key makes it loadable by `DataStore::load_jobs`
#[derive(Debug, Serialize)]
struct ScrapedJobsFile<'a> {
    jobs: &'a [Job],
    total: usize,
    scraped_at: DateTime<Utc>,
    errors: &'a [String],
}

/// Client for the JSearch job search API
///
/// Collects jobs across successive searches; request failures are recorded
/// in [`JSearchClient::errors`] rather than aborting the search.
pub struct JSearchClient {
    base_url: String,
    api_key: String,
    api_host: String,
    client: Client,
    jobs: Vec<Job>,
    errors: Vec<String>,
}

impl JSearchClient {
    pub fn new(
        base_url: String,
        api_key: String,
        api_host: String,
        timeout: Duration,
    ) -> Result<Self, JSearchError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            api_host,
            client,
            jobs: Vec::new(),
            errors: Vec::new(),
        })
    }

    pub fn from_settings(settings: &JSearchSettings) -> Result<Self, JSearchError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone(),
            settings.api_host.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    /// Search `pages` pages of results for a query in a location
    pub async fn search_jobs(
        &mut self,
        query: &str,
        location: &str,
        pages: u32,
    ) -> Result<(), JSearchError> {
        if self.api_key.is_empty() {
            return Err(JSearchError::MissingApiKey);
        }

        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        tracing::info!("Searching jobs: {} - {}", query, location);

        for page in 1..=pages {
            let full_url = format!(
                "{}?query={}&location={}&page={}&num_pages=1",
                url,
                urlencoding::encode(query),
                urlencoding::encode(location),
                page
            );

            let response = self
                .client
                .get(&full_url)
                .header("x-rapidapi-key", &self.api_key)
                .header("x-rapidapi-host", &self.api_host)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    let error = if e.is_timeout() {
                        format!("Timeout while searching: {}", query)
                    } else {
                        format!("Search request failed: {}", e)
                    };
                    tracing::warn!("{}", error);
                    self.errors.push(error);
                    continue;
                }
            };

            match response.status() {
                StatusCode::OK => {}
                StatusCode::TOO_MANY_REQUESTS => {
                    tracing::warn!("Job search rate limit reached, stopping at page {}", page);
                    break;
                }
                status => {
                    let error = format!("Error {} for {}", status.as_u16(), query);
                    tracing::warn!("{}", error);
                    self.errors.push(error);
                    continue;
                }
            }

            let body: SearchResponse = match response.json().await {
                Ok(body) => body,
                Err(e) => {
                    let error = format!("Invalid search response for {}: {}", query, e);
                    tracing::warn!("{}", error);
                    self.errors.push(error);
                    continue;
                }
            };

            if body.data.is_empty() {
                tracing::info!("Page {}: no jobs found", page);
                break;
            }

            tracing::info!("Page {}: {} jobs found", page, body.data.len());
            self.jobs
                .extend(body.data.into_iter().map(|raw| parse_job(raw, query)));

            if page < pages {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }

        Ok(())
    }

    /// Every job collected so far, duplicates included
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Jobs deduplicated by id, first occurrence wins
    pub fn unique_jobs(&self) -> Vec<Job> {
        let mut seen = HashSet::new();
        self.jobs
            .iter()
            .filter(|job| seen.insert(job.id.as_str()))
            .cloned()
            .collect()
    }

    /// Write the deduplicated jobs with scrape metadata; returns how many were saved
    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> Result<usize, DataError> {
        let unique = self.unique_jobs();
        write_json(
            path.as_ref(),
            &ScrapedJobsFile {
                jobs: &unique,
                total: unique.len(),
                scraped_at: Utc::now(),
                errors: &self.errors,
            },
        )?;

        tracing::info!("Saved {} scraped jobs to {}", unique.len(), path.as_ref().display());
        if !self.errors.is_empty() {
            tracing::warn!("{} errors during scraping", self.errors.len());
        }
        Ok(unique.len())
    }

    pub fn stats(&self) -> SearchStats {
        let unique = self.unique_jobs();
        SearchStats {
            total_jobs: unique.len(),
            errors: self.errors.len(),
            top_companies: top_counts(unique.iter().map(|j| j.company.as_str()), 5),
            top_locations: top_counts(unique.iter().map(|j| j.location.as_str()), 5),
        }
    }
}

fn parse_job(raw: RawJob, search_query: &str) -> Job {
    let description = raw.job_description.unwrap_or_default();
    Job {
        id: raw.job_id.unwrap_or_default(),
        title: raw.job_title.unwrap_or_else(|| "N/A".to_string()),
        company: raw.employer_name.unwrap_or_else(|| "N/A".to_string()),
        location: raw.job_location.unwrap_or_else(|| "N/A".to_string()),
        required_skills: extract_skills(&description),
        description,
        job_type: raw.job_employment_type.unwrap_or_else(|| "CDI".to_string()),
        salary_min: raw.job_salary_min,
        salary_max: raw.job_salary_max,
        url: raw.job_apply_link.unwrap_or_else(|| "#".to_string()),
        posted_date: Some(
            raw.job_posted_at_datetime_utc
                .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        ),
        search_query: Some(search_query.to_string()),
        source: Some(SOURCE_NAME.to_string()),
    }
}

/// Known skills mentioned in a description (case-insensitive substring match)
pub fn extract_skills(description: &str) -> Vec<String> {
    let lower = description.to_lowercase();
    TECH_SKILLS
        .iter()
        .filter(|skill| lower.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

fn top_counts<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut sorted: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted.truncate(n);
    sorted
}
