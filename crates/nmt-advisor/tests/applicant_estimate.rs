use nmt_advisor::admissions::{analyze_chances, ChanceCategory, ProgramFilter, ProgramStatsImporter};
use nmt_advisor::artifacts::{
    standard_artifacts, ArtifactMode, ArtifactProvisioner, ArtifactStore, MirrorFetcher,
    ModelRegistry,
};
use nmt_advisor::scoring::{
    normalize, ApplicantFeatures, BlendSettings, FnPredictor, ScoreCalculator, ScoreRequest,
    Sex, Subject, SubjectDiagnostic, SCHOOL_SCALE, TARGET_SCALE,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "nmt-advisor-estimate-{}-{name}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("scratch dir");
    dir
}

fn write_model(dir: &Path, subject: Subject, intercept: f64) {
    let json = format!(
        r#"{{ "intercept": {intercept}, "age": 1.0, "region": {{ "lviv": 3.0 }} }}"#
    );
    std::fs::write(dir.join(subject.model_file()), json).expect("model written");
}

fn request(grades: &[(Subject, f64)]) -> ScoreRequest {
    ScoreRequest {
        features: ApplicantFeatures {
            exam_year: 2024,
            birth_year: 2007,
            sex: Sex::Male,
            region: "Львівська область".to_string(),
            settlement_type: "місто".to_string(),
            institution_type: "ліцей".to_string(),
        },
        grades: grades.iter().copied().collect(),
    }
}

fn approx(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[test]
fn estimates_from_models_on_disk() {
    let dir = scratch_dir("disk");
    write_model(&dir, Subject::Ukrainian, 140.0);
    write_model(&dir, Subject::Math, 130.0);
    write_model(&dir, Subject::History, 150.0);

    let store = ArtifactStore::new(&dir, ProgramStatsImporter::default());
    let registry = store.model_registry(&Subject::ordered());
    let estimate = ScoreCalculator::default().estimate(
        &registry,
        &request(&[
            (Subject::Ukrainian, 7.5),
            (Subject::Math, 10.0),
            (Subject::History, 12.0),
        ]),
    );

    assert!(estimate.diagnostics.is_empty());
    let ukrainian = estimate.subject(Subject::Ukrainian).expect("ukrainian scored");
    assert!(approx(ukrainian.model_score, 160.0), "140 + age 17 + lviv 3");
    assert!(
        approx(ukrainian.scenarios.individual, ukrainian.model_score),
        "average grade leaves the individual scenario unchanged"
    );

    let mean = estimate
        .subjects
        .iter()
        .map(|result| result.representative)
        .sum::<f64>()
        / 3.0;
    assert!(approx(estimate.applicant_score.expect("score"), mean));
}

#[test]
fn balance_weight_extremes_pick_one_source() {
    let mut models = ModelRegistry::new();
    models.insert(Subject::Math, Arc::new(FnPredictor::new(|_| Ok(163.0))));
    let grades = [(Subject::Math, 9.0)];

    let model_only = ScoreCalculator::new(BlendSettings::new(1.0, 1.0).expect("valid"))
        .estimate(&models, &request(&grades));
    let grade_only = ScoreCalculator::new(BlendSettings::new(0.0, 1.0).expect("valid"))
        .estimate(&models, &request(&grades));

    let model_math = model_only.subject(Subject::Math).expect("math");
    let grade_math = grade_only.subject(Subject::Math).expect("math");
    assert!(approx(model_math.scenarios.balanced, 163.0));
    assert!(approx(
        grade_math.scenarios.balanced,
        normalize(9.0, &SCHOOL_SCALE, &TARGET_SCALE)
    ));
}

#[test]
fn cautious_scenario_is_not_clamped() {
    let mut models = ModelRegistry::new();
    models.insert(Subject::History, Arc::new(FnPredictor::new(|_| Ok(250.0))));

    let calculator = ScoreCalculator::new(BlendSettings::new(0.5, 0.0).expect("valid"));
    let estimate = calculator.estimate(&models, &request(&[(Subject::History, 12.0)]));
    let history = estimate.subject(Subject::History).expect("history");

    assert!(approx(history.scenarios.cautious, 225.0));
    assert!(history.scenarios.balanced <= 200.0);
    assert!(history.scenarios.individual <= 200.0);
}

#[test]
fn missing_models_degrade_to_remaining_subjects() {
    let dir = scratch_dir("partial");
    write_model(&dir, Subject::Math, 130.0);

    let store = ArtifactStore::new(&dir, ProgramStatsImporter::default());
    let registry = store.model_registry(&Subject::ordered());
    let estimate = ScoreCalculator::default().estimate(
        &registry,
        &request(&[(Subject::Math, 10.0), (Subject::History, 10.0)]),
    );

    assert_eq!(estimate.subjects.len(), 1);
    assert_eq!(
        estimate.diagnostics,
        vec![SubjectDiagnostic::ModelUnavailable {
            subject: Subject::History
        }]
    );
    assert_eq!(
        estimate.diagnostics[0].summary(),
        "model unavailable for subject History of Ukraine"
    );
    let math = estimate.subject(Subject::Math).expect("math");
    assert_eq!(estimate.applicant_score, Some(math.representative));
}

#[test]
fn no_models_leave_chances_unscored() {
    let registry = ModelRegistry::new();
    let estimate =
        ScoreCalculator::default().estimate(&registry, &request(&[(Subject::Math, 10.0)]));
    assert_eq!(estimate.applicant_score, None);

    let catalog = ProgramStatsImporter::default()
        .import_reader(include_str!("fixtures/konkurs_sample.csv").as_bytes())
        .expect("sample parses")
        .into_catalog()
        .expect("catalog");
    let report = analyze_chances(
        estimate.applicant_score,
        &catalog,
        &ProgramFilter::default(),
        &[],
    );
    assert!(report
        .rows
        .iter()
        .all(|row| row.category == ChanceCategory::NoApplicantScore));
}

#[test]
fn production_mode_provisions_from_mirror_before_loading() {
    let base = scratch_dir("provision");
    let mirror = base.join("mirror");
    let models_dir = base.join("models");
    std::fs::create_dir_all(&mirror).expect("mirror dir");
    for subject in Subject::ordered() {
        write_model(&mirror, subject, 145.0);
    }
    std::fs::write(
        mirror.join("konkurs_NMT.csv"),
        include_str!("fixtures/konkurs_sample.csv"),
    )
    .expect("dataset in mirror");

    let programs_csv = base.join("data").join("konkurs_NMT.csv");
    let provisioner = ArtifactProvisioner::new(
        ArtifactMode::Production,
        Some(Box::new(MirrorFetcher::new(&mirror))),
    );
    let report = provisioner.provision(&standard_artifacts(&models_dir, &programs_csv));
    assert!(report.failed.is_empty(), "{:?}", report.failed);
    assert_eq!(report.fetched.len(), 4);

    let store = ArtifactStore::new(&models_dir, ProgramStatsImporter::default());
    let registry = store.model_registry(&Subject::ordered());
    assert_eq!(registry.available().count(), 3);

    let outcome = store.program_stats(&programs_csv).expect("dataset provisioned");
    assert_eq!(outcome.catalog().map(|catalog| catalog.len()), Some(4));
}
