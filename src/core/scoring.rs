use crate::models::{BonusWeights, Job, Profile};

/// Blend a text similarity with rule-based bonuses into a final score
///
/// Bonuses:
/// - desired location equals the job location (case-insensitive)
/// - the job's contract type is one the profile accepts
/// - salary ranges overlap, only when the job publishes a non-zero range
///
/// The result is clamped to `[0, 1]`.
pub fn blend_score(base: f64, profile: &Profile, job: &Job, bonuses: &BonusWeights) -> f64 {
    let mut score = base;

    if location_matches(profile, job) {
        score += bonuses.location;
    }

    if job_type_matches(profile, job) {
        score += bonuses.job_type;
    }

    if salary_overlaps(profile, job) {
        score += bonuses.salary;
    }

    score.clamp(0.0, 1.0)
}

#[inline]
fn location_matches(profile: &Profile, job: &Job) -> bool {
    profile.desired_location.to_lowercase() == job.location.to_lowercase()
}

#[inline]
fn job_type_matches(profile: &Profile, job: &Job) -> bool {
    profile.job_types.contains(&job.job_type)
}

/// Overlap test; a job without a minimum salary never earns the bonus
#[inline]
fn salary_overlaps(profile: &Profile, job: &Job) -> bool {
    let job_min = job.salary_floor();

    if job_min == 0.0 {
        return false;
    }

    job_min <= profile.salary_ceiling() && job.salary_ceiling() >= profile.salary_floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile() -> Profile {
        Profile {
            id: "p1".to_string(),
            name: "Test".to_string(),
            desired_location: "Paris".to_string(),
            job_types: vec!["CDI".to_string()],
            salary_min: Some(40000.0),
            salary_max: Some(55000.0),
            ..Default::default()
        }
    }

    fn create_test_job(location: &str, job_type: &str) -> Job {
        Job {
            id: "j1".to_string(),
            title: "Developer".to_string(),
            location: location.to_string(),
            job_type: job_type.to_string(),
            ..Default::default()
        }
    }

    fn score(base: f64, profile: &Profile, job: &Job) -> f64 {
        blend_score(base, profile, job, &BonusWeights::default())
    }

    #[test]
    fn test_no_bonus() {
        let score = score(0.4, &create_test_profile(), &create_test_job("Lyon", "CDD"));
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_location_bonus_case_insensitive() {
        let score = score(0.4, &create_test_profile(), &create_test_job("PARIS", "CDD"));
        assert!((score - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_job_type_bonus() {
        let score = score(0.4, &create_test_profile(), &create_test_job("Lyon", "CDI"));
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_salary_bonus_requires_job_minimum() {
        let profile = create_test_profile();
        let mut job = create_test_job("Lyon", "CDD");

        job.salary_max = Some(50000.0);
        assert!((score(0.4, &profile, &job) - 0.4).abs() < 1e-9);

        job.salary_min = Some(45000.0);
        assert!((score(0.4, &profile, &job) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_salary_bonus_requires_overlap() {
        let profile = create_test_profile();
        let mut job = create_test_job("Lyon", "CDD");
        job.salary_min = Some(60000.0);
        job.salary_max = Some(70000.0);

        assert!((score(0.4, &profile, &job) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_zero_job_salary_max_is_open_ended() {
        let profile = Profile {
            salary_max: Some(60000.0),
            ..create_test_profile()
        };
        let mut job = create_test_job("Lyon", "CDD");
        job.salary_min = Some(45000.0);
        job.salary_max = Some(0.0);

        assert!((score(0.4, &profile, &job) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_profile_salary_bounds_are_open_ended() {
        let profile = Profile {
            salary_min: Some(0.0),
            salary_max: Some(0.0),
            ..create_test_profile()
        };
        let mut job = create_test_job("Lyon", "CDD");
        job.salary_min = Some(45000.0);
        job.salary_max = Some(55000.0);

        assert!((score(0.4, &profile, &job) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_score_clamped_to_one() {
        let profile = create_test_profile();
        let mut job = create_test_job("paris", "CDI");
        job.salary_min = Some(45000.0);

        assert_eq!(score(0.95, &profile, &job), 1.0);
    }

    #[test]
    fn test_negative_similarity_clamped_to_zero() {
        let score = score(-0.8, &create_test_profile(), &create_test_job("Lyon", "CDD"));
        assert_eq!(score, 0.0);
    }
}
