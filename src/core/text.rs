use crate::core::stopwords::is_stop_word;
use crate::models::{Job, Profile};
use unicode_segmentation::UnicodeSegmentation;

/// Build the free-text blob describing a profile
///
/// Fields in order: keywords, skills, desired location, job types.
pub fn profile_text(profile: &Profile) -> String {
    [
        profile.keywords.as_str(),
        &profile.skills.join(" "),
        profile.desired_location.as_str(),
        &profile.job_types.join(" "),
    ]
    .join(" ")
}

/// Build the free-text blob describing a job posting
///
/// Fields in order: title, description, required skills, location, job type.
pub fn job_text(job: &Job) -> String {
    [
        job.title.as_str(),
        job.description.as_str(),
        &job.required_skills.join(" "),
        job.location.as_str(),
        job.job_type.as_str(),
    ]
    .join(" ")
}

/// Lowercase, split on word boundaries, keep alphanumeric non-stop-words
pub fn preprocess(text: &str) -> Vec<String> {
    text.to_lowercase()
        .unicode_words()
        .filter(|token| token.chars().all(char::is_alphanumeric))
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Tokenized documents for every profile and job of a batch
///
/// Documents without any token are left out of the corpus.
pub fn build_corpus(profiles: &[Profile], jobs: &[Job]) -> Vec<Vec<String>> {
    profiles
        .iter()
        .map(profile_text)
        .chain(jobs.iter().map(job_text))
        .map(|text| preprocess(&text))
        .filter(|tokens| !tokens.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_text_field_order() {
        let profile = Profile {
            id: "p1".to_string(),
            keywords: "data engineer".to_string(),
            skills: vec!["python".to_string(), "spark".to_string()],
            desired_location: "Lyon".to_string(),
            job_types: vec!["CDI".to_string(), "CDD".to_string()],
            ..Default::default()
        };
        assert_eq!(profile_text(&profile), "data engineer python spark Lyon CDI CDD");
    }

    #[test]
    fn test_job_text_missing_fields() {
        let job = Job {
            id: "j1".to_string(),
            title: "Analyst".to_string(),
            ..Default::default()
        };
        assert_eq!(job_text(&job), "Analyst    ");
    }

    #[test]
    fn test_preprocess_drops_stop_words_and_symbols() {
        let tokens = preprocess("Le Développeur Python, and the C++ wizard: node.js 3.5 ans!");
        // "c" is a French elision stop word, "node.js" and "3.5" are not alphanumeric
        assert_eq!(tokens, vec!["développeur", "python", "wizard", "ans"]);
    }

    #[test]
    fn test_build_corpus_skips_empty_documents() {
        let profiles = vec![Profile {
            id: "p1".to_string(),
            keywords: "the and of".to_string(),
            ..Default::default()
        }];
        let jobs = vec![Job {
            id: "j1".to_string(),
            title: "Rust engineer".to_string(),
            ..Default::default()
        }];
        let corpus = build_corpus(&profiles, &jobs);
        assert_eq!(corpus, vec![vec!["rust".to_string(), "engineer".to_string()]]);
    }
}
