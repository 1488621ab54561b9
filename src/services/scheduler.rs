use crate::config::{DataSettings, SchedulerSettings};
use crate::core::{Recommender, SimilarityModel};
use crate::models::{Job, Profile, Recommendation};
use crate::services::data::{export_recommendations, DataError, DataStore};
use crate::services::mailer::{EmailService, MailTransport};
use crate::services::model_store::ModelStore;
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid schedule time '{0}', expected HH:MM")]
    InvalidTime(String),
}

/// What happened to one profile during a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ProfileStatus {
    Sent,
    SendFailed,
    NoRecommendations,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOutcome {
    pub profile_id: String,
    pub name: String,
    pub recommendations: usize,
    #[serde(flatten)]
    pub status: ProfileStatus,
}

/// Summary of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub total_profiles: usize,
    pub total_jobs: usize,
    pub emails_sent: usize,
    pub outcomes: Vec<ProfileOutcome>,
    #[serde(skip)]
    pub recommendations: BTreeMap<String, Vec<Recommendation>>,
}

/// Recommend and email every profile against one trained model
///
/// A failure for one profile is recorded in its outcome and processing
/// continues with the next profile.
pub async fn run_batch<M, T>(
    profiles: &[Profile],
    jobs: &[Job],
    recommender: &Recommender,
    model: &M,
    mailer: &EmailService<T>,
) -> BatchReport
where
    M: SimilarityModel + ?Sized,
    T: MailTransport,
{
    let run_id = Uuid::new_v4();
    let started_at = Utc::now();
    tracing::info!("Batch {} started: {} profiles, {} jobs", run_id, profiles.len(), jobs.len());

    let mut outcomes = Vec::with_capacity(profiles.len());
    let mut all_recommendations = BTreeMap::new();

    for profile in profiles {
        let mut outcome = ProfileOutcome {
            profile_id: profile.id.clone(),
            name: profile.name.clone(),
            recommendations: 0,
            status: ProfileStatus::NoRecommendations,
        };

        let recommendations = match recommender.recommend(model, profile, jobs) {
            Ok(recs) => recs,
            Err(e) => {
                tracing::error!("Scoring failed for profile {}: {}", profile.id, e);
                outcome.status = ProfileStatus::Failed(e.to_string());
                outcomes.push(outcome);
                continue;
            }
        };
        outcome.recommendations = recommendations.len();

        if recommendations.is_empty() {
            tracing::warn!("No recommendations for {}", profile.name);
        } else {
            outcome.status = match profile.email.as_deref() {
                None | Some("") => {
                    tracing::error!("Profile {} has no email address", profile.id);
                    ProfileStatus::Failed("missing email address".to_string())
                }
                Some(email) => {
                    if mailer.send_recommendations(&profile.name, email, &recommendations).await {
                        ProfileStatus::Sent
                    } else {
                        ProfileStatus::SendFailed
                    }
                }
            };
        }

        all_recommendations.insert(profile.id.clone(), recommendations);
        outcomes.push(outcome);
    }

    let emails_sent = outcomes.iter().filter(|o| o.status == ProfileStatus::Sent).count();
    tracing::info!("Batch {} finished: {}/{} emails sent", run_id, emails_sent, profiles.len());

    BatchReport {
        run_id,
        started_at,
        total_profiles: profiles.len(),
        total_jobs: jobs.len(),
        emails_sent,
        outcomes,
        recommendations: all_recommendations,
    }
}

/// Everything the daily job needs: data files, pipeline, model cache, mailer
pub struct BatchJob<T: MailTransport> {
    pub data: DataSettings,
    pub recommender: Recommender,
    pub models: ModelStore,
    pub mailer: Arc<EmailService<T>>,
}

impl<T: MailTransport> BatchJob<T> {
    /// Load profiles and jobs from disk, train once, run the batch, export
    pub async fn run(&self) -> Result<BatchReport, DataError> {
        let mut store = DataStore::new();
        store.load_profiles(&self.data.profiles_file)?;
        store.load_jobs(&self.data.jobs_file)?;

        let model = self
            .models
            .get_or_train(&self.recommender, store.profiles(), store.jobs())
            .await;

        let report = run_batch(
            store.profiles(),
            store.jobs(),
            &self.recommender,
            model.as_ref(),
            &self.mailer,
        )
        .await;

        if let Err(e) = export_recommendations(&self.data.export_file, &report.recommendations) {
            tracing::warn!("Failed to export recommendations: {}", e);
        }

        Ok(report)
    }
}

/// Fires a [`BatchJob`] once a day at a fixed local time
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    at: NaiveTime,
}

impl Scheduler {
    pub fn new(at: NaiveTime) -> Self {
        Self { at }
    }

    pub fn from_settings(settings: &SchedulerSettings) -> Result<Self, SchedulerError> {
        Ok(Self::new(parse_time(&settings.time)?))
    }

    /// Next occurrence of the scheduled time strictly after `now`
    pub fn next_run_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let mut day = now.date_naive();

        loop {
            if let Some(candidate) = tz.from_local_datetime(&day.and_time(self.at)).earliest() {
                if candidate > *now {
                    return candidate;
                }
            }
            day = day.succ_opt().unwrap_or(day);
            if day == now.date_naive() {
                // Calendar overflow; fall back to a fixed delay
                return now.clone() + ChronoDuration::days(1);
            }
        }
    }

    /// Run the job forever on a tokio task
    pub fn spawn<T>(self, job: Arc<BatchJob<T>>) -> tokio::task::JoinHandle<()>
    where
        T: MailTransport + 'static,
    {
        tracing::info!("Scheduler started, daily job at {}", self.at.format("%H:%M"));

        tokio::spawn(async move {
            loop {
                let now = Local::now();
                let next = self.next_run_after(&now);
                let wait = (next - now).to_std().unwrap_or_default();
                tracing::debug!("Next batch at {}", next);
                tokio::time::sleep(wait).await;

                match job.run().await {
                    Ok(report) => tracing::info!(
                        "Daily job {} done: {} emails sent",
                        report.run_id,
                        report.emails_sent
                    ),
                    Err(e) => tracing::error!("Daily job failed: {}", e),
                }
            }
        })
    }
}

/// Parse an `HH:MM` time of day
pub fn parse_time(value: &str) -> Result<NaiveTime, SchedulerError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| SchedulerError::InvalidTime(value.to_string()))
}
