// Service exports
pub mod data;
pub mod jsearch;
pub mod mailer;
pub mod model_store;
pub mod scheduler;

pub use data::{export_recommendations, DataError, DataStore};
pub use jsearch::{JSearchClient, JSearchError, SearchStats};
pub use mailer::{EmailService, HttpMailTransport, MailError, MailMessage, MailTransport};
pub use model_store::{fingerprint, ModelStore};
pub use scheduler::{
    run_batch, BatchJob, BatchReport, ProfileOutcome, ProfileStatus, Scheduler, SchedulerError,
};
