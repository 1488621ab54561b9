// Criterion benchmarks for Job Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use job_match::core::{
    build_corpus, cosine_similarity, ModelKind, RankingConfig, Recommender, TfIdfModel,
    TrainingConfig, Word2Vec,
};
use job_match::models::{BonusWeights, Job, Profile, Recommendation};

const CITIES: [&str; 4] = ["Paris", "Lyon", "Marseille", "Lille"];
const STACKS: [&str; 5] = [
    "python django postgresql docker",
    "javascript react css html",
    "java spring kubernetes aws",
    "machine learning python sql pandas",
    "rust tokio linux networking",
];

fn create_job(id: usize) -> Job {
    let stack = STACKS[id % STACKS.len()];
    let city = CITIES[id % CITIES.len()];

    Job {
        id: id.to_string(),
        title: format!("Développeur {}", stack.split(' ').next().unwrap_or("python")),
        company: format!("Company {}", id % 17),
        location: city.to_string(),
        description: format!("Poste basé à {} autour de {}", city, stack),
        job_type: if id % 3 == 0 { "CDD" } else { "CDI" }.to_string(),
        salary_min: Some(35000.0 + (id % 10) as f64 * 2000.0),
        salary_max: Some(50000.0 + (id % 10) as f64 * 2000.0),
        ..Default::default()
    }
}

fn create_profile() -> Profile {
    Profile {
        id: "p1".to_string(),
        name: "Alice".to_string(),
        keywords: "développeur python backend".to_string(),
        skills: vec!["python".to_string(), "django".to_string(), "docker".to_string()],
        desired_location: "Paris".to_string(),
        job_types: vec!["CDI".to_string()],
        salary_min: Some(45000.0),
        salary_max: Some(60000.0),
        ..Default::default()
    }
}

fn small_recommender(kind: ModelKind) -> Recommender {
    Recommender::new(
        kind,
        TrainingConfig {
            dimensions: 50,
            min_count: 1,
            ..Default::default()
        },
        BonusWeights::default(),
        RankingConfig::default(),
    )
}

fn bench_cosine_similarity(c: &mut Criterion) {
    let a: Vec<f32> = (0..300).map(|i| (i as f32 * 0.01).sin()).collect();
    let b: Vec<f32> = (0..300).map(|i| (i as f32 * 0.02).cos()).collect();

    c.bench_function("cosine_similarity_300d", |bench| {
        bench.iter(|| cosine_similarity(black_box(&a), black_box(&b)));
    });
}

fn bench_rank(c: &mut Criterion) {
    let recommender = Recommender::default();
    let recommendations: Vec<Recommendation> = (0..1000)
        .map(|i| Recommendation::from_job(&create_job(i), ((i * 7919) % 1000) as f64 / 1000.0))
        .collect();

    c.bench_function("rank_1000_recommendations", |b| {
        b.iter(|| recommender.rank(black_box(recommendations.clone())));
    });
}

fn bench_training(c: &mut Criterion) {
    let profiles = vec![create_profile()];
    let mut group = c.benchmark_group("training");
    group.sample_size(10);

    for job_count in [50, 200].iter() {
        let jobs: Vec<Job> = (0..*job_count).map(create_job).collect();
        let corpus = build_corpus(&profiles, &jobs);
        let trainer = Word2Vec::new(TrainingConfig {
            dimensions: 50,
            min_count: 1,
            ..Default::default()
        });

        group.bench_with_input(BenchmarkId::new("word2vec", job_count), job_count, |b, _| {
            b.iter(|| trainer.train(black_box(&corpus)));
        });

        group.bench_with_input(BenchmarkId::new("tfidf", job_count), job_count, |b, _| {
            b.iter(|| TfIdfModel::fit(black_box(&corpus)));
        });
    }

    group.finish();
}

fn bench_recommend(c: &mut Criterion) {
    let profiles = vec![create_profile()];
    let mut group = c.benchmark_group("recommend");

    for kind in [ModelKind::Word2vec, ModelKind::Tfidf] {
        let recommender = small_recommender(kind);
        let jobs: Vec<Job> = (0..200).map(create_job).collect();
        let model = recommender.train(&profiles, &jobs);

        group.bench_function(BenchmarkId::new("200_jobs", format!("{:?}", kind)), |b| {
            b.iter(|| {
                recommender.recommend(black_box(&model), black_box(&profiles[0]), black_box(&jobs))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_cosine_similarity,
    bench_rank,
    bench_training,
    bench_recommend
);

criterion_main!(benches);
