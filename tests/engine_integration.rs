//! End-to-end scenarios over the engine facade with an in-memory evidence
//! store and a scripted web fetcher.

use async_trait::async_trait;
use chrono::Utc;
use mediatrust::{
    CaseContext, ConflictKind, EngineConfig, EvaluationOutcome, EvaluationWindow, EvidenceStore,
    Feedback,
    FeedbackId, FetchOutcome, Leaning, Mediator, MediatorId, MemoryEvidenceStore, NullFetcher,
    RiskLevel, ScrapedAffiliations, ScrapedConflict, ScrapedIdeology, TrustEngine,
    WebEvidenceFetcher,
};
use std::sync::Arc;

/// Fetcher that fails affiliations but reports scripted ideology evidence
struct IdeologyOnlyFetcher {
    score: f64,
    confidence: f64,
}

#[async_trait]
impl WebEvidenceFetcher for IdeologyOnlyFetcher {
    async fn fetch_affiliations(
        &self,
        _urls: &[String],
        _name: &str,
        _check_for: &[String],
    ) -> FetchOutcome<ScrapedAffiliations> {
        FetchOutcome::unavailable("scripted failure")
    }

    async fn fetch_ideology(&self, _urls: &[String], _name: &str) -> FetchOutcome<ScrapedIdeology> {
        FetchOutcome::Ok {
            data: ScrapedIdeology {
                leaning: Leaning::from_score(self.score),
                confidence: self.confidence,
                ideology_score: self.score,
                indicators: vec!["public statement".to_string()],
            },
        }
    }
}

/// Fetcher that reports one scraped conflict per requested party
struct ConflictReportingFetcher;

#[async_trait]
impl WebEvidenceFetcher for ConflictReportingFetcher {
    async fn fetch_affiliations(
        &self,
        _urls: &[String],
        _name: &str,
        check_for: &[String],
    ) -> FetchOutcome<ScrapedAffiliations> {
        FetchOutcome::Ok {
            data: ScrapedAffiliations {
                affiliations: vec!["Scraped Council".to_string()],
                potential_conflicts: check_for
                    .iter()
                    .map(|party| ScrapedConflict {
                        entity: "Scraped Council".to_string(),
                        party: party.clone(),
                        risk: RiskLevel::High,
                    })
                    .collect(),
            },
        }
    }

    async fn fetch_ideology(&self, _urls: &[String], _name: &str) -> FetchOutcome<ScrapedIdeology> {
        FetchOutcome::unavailable("not scripted")
    }
}

fn engine_with(
    store: Arc<MemoryEvidenceStore>,
    fetcher: Arc<dyn WebEvidenceFetcher>,
) -> TrustEngine {
    // First caller wins; later calls are no-ops under parallel test runs.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    TrustEngine::new(store, fetcher, EngineConfig::default())
}

fn reviewed(predicted: bool, actual: bool) -> Feedback {
    Feedback {
        id: FeedbackId::new(),
        model_type: "conflict_detector".to_string(),
        predicted_has_conflict: predicted,
        actual_has_conflict: actual,
        prediction_confidence: 0.85,
        case_type: "commercial".to_string(),
        reviewer_confidence: 0.9,
        reviewed_at: Utc::now(),
        used_for_retraining: false,
    }
}

#[tokio::test]
async fn acme_employment_scenario() {
    // Mediator currently employed at "Acme LLC", case parties = ["Acme LLC"]:
    // exactly one HIGH-risk employment finding and an overall HIGH verdict.
    let store = Arc::new(MemoryEvidenceStore::new());
    let mut mediator = Mediator::new("Jane Doe");
    mediator.current_employer = Some("Acme LLC".to_string());
    let id = mediator.id;
    store.insert_mediator(mediator).await;

    let engine = engine_with(store, Arc::new(NullFetcher));
    let verdict = engine
        .check_conflicts(id, &["Acme LLC".to_string()])
        .await
        .unwrap();

    assert!(verdict.has_conflict);
    assert_eq!(verdict.conflicts.len(), 1);
    assert_eq!(verdict.conflicts[0].kind, ConflictKind::Employment);
    assert_eq!(verdict.conflicts[0].risk, RiskLevel::High);
    assert_eq!(verdict.overall_risk, Some(RiskLevel::High));
    assert!(verdict.recommendation.contains("manual review"));
}

#[tokio::test]
async fn quick_check_skips_scraping() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let mut mediator = Mediator::new("Jane Doe");
    mediator.current_employer = Some("Acme LLC".to_string());
    let id = mediator.id;
    store.insert_mediator(mediator).await;

    // Would report scraped conflicts if the fetcher were consulted.
    let engine = engine_with(store, Arc::new(ConflictReportingFetcher));
    let check = engine
        .quick_check_conflicts(id, &["Acme LLC".to_string()])
        .await
        .unwrap();

    assert!(check.has_conflict);
    assert_eq!(check.conflict_count, 1);
    assert!(check.high_risk);
}

#[tokio::test]
async fn scraped_evidence_merges_but_never_exceeds_medium() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let mediator = Mediator::new("Jane Doe");
    let id = mediator.id;
    store.insert_mediator(mediator).await;

    let engine = engine_with(store, Arc::new(ConflictReportingFetcher));
    let verdict = engine
        .check_conflicts(id, &["Scraped Council".to_string()])
        .await
        .unwrap();

    assert!(verdict.has_conflict);
    assert_eq!(verdict.conflicts.len(), 1);
    assert_eq!(verdict.conflicts[0].kind, ConflictKind::ScrapedAffiliation);
    assert_eq!(verdict.conflicts[0].risk, RiskLevel::Medium);
    assert_eq!(verdict.overall_risk, Some(RiskLevel::Medium));
}

#[tokio::test]
async fn failing_scrape_yields_neutral_and_no_persist() {
    // No stored ideology score, zero bias indicators, failing scrape fetch:
    // neutral at confidence 0 and no score persisted.
    let store = Arc::new(MemoryEvidenceStore::new());
    let mediator = Mediator::new("Jane Doe");
    let id = mediator.id;
    store.insert_mediator(mediator).await;

    let engine = engine_with(store.clone(), Arc::new(NullFetcher));
    let result = engine.classify_ideology(id).await.unwrap();

    assert_eq!(result.leaning, Leaning::Neutral);
    assert_eq!(result.confidence, 0.0);

    let stored = store.find_mediator(id).await.unwrap().unwrap();
    assert!(stored.ideology_score.is_none());
}

#[tokio::test]
async fn classify_ideology_is_idempotent() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let mediator = Mediator::new("Jane Doe");
    let id = mediator.id;
    store.insert_mediator(mediator).await;

    let engine = engine_with(
        store,
        Arc::new(IdeologyOnlyFetcher {
            score: 8.0,
            confidence: 90.0,
        }),
    );

    let first = engine.classify_ideology(id).await.unwrap();
    let second = engine.classify_ideology(id).await.unwrap();
    assert!((first.ideology_score - second.ideology_score).abs() < 1e-9);
}

#[tokio::test]
async fn classify_text_matches_user_preference_without_persistence() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let engine = engine_with(store, Arc::new(NullFetcher));

    let result = engine.classify_text(
        "We need strong regulation, universal healthcare, and real climate action.",
    );
    assert_eq!(result.leaning, Leaning::Liberal);
    assert!(result.confidence > 0.0);
}

#[tokio::test]
async fn ranking_surfaces_top_and_mean() {
    let store = Arc::new(MemoryEvidenceStore::new());

    let mut strong = Mediator::new("Strong");
    strong.years_experience = 30.0;
    strong.rating = 4.8;
    strong.review_count = 60;
    strong.verified = true;
    strong.data_quality.completeness_pct = 95.0;
    strong.specializations = vec!["Commercial".to_string()];
    let strong_id = strong.id;

    let mut modest = Mediator::new("Modest");
    modest.years_experience = 3.0;
    modest.rating = 3.0;
    modest.review_count = 2;
    let modest_id = modest.id;

    store.insert_mediator(strong).await;
    store.insert_mediator(modest).await;
    store.set_profile_views(strong_id, 300).await;

    let engine = engine_with(store, Arc::new(NullFetcher));
    let case = CaseContext {
        practice_areas: vec!["commercial".to_string()],
        ..Default::default()
    };

    let report = engine.rank_mediators(&[modest_id, strong_id], &case).await;
    assert_eq!(report.ranked.len(), 2);
    assert_eq!(report.ranked[0].mediator_id, strong_id);
    assert_eq!(report.top.as_ref().unwrap().mediator_id, strong_id);

    let expected_mean = (report.ranked[0].total_score + report.ranked[1].total_score) / 2.0;
    assert!((report.average_score - expected_mean).abs() < 1e-9);
}

#[tokio::test]
async fn batch_conflicts_isolate_missing_mediators() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let mediator = Mediator::new("Jane Doe");
    let good_id = mediator.id;
    store.insert_mediator(mediator).await;

    let engine = engine_with(store, Arc::new(NullFetcher));
    let entries = engine
        .detect_batch_conflicts(&[good_id, MediatorId::new()], &["Acme".to_string()])
        .await;

    assert_eq!(entries.len(), 2);
    assert!(entries[0].error.is_none());
    assert!(entries[1].error.is_some());
}

#[tokio::test]
async fn evaluation_below_minimum_reports_insufficient_data() {
    // 40 samples against a minimum of 100.
    let store = Arc::new(MemoryEvidenceStore::new());
    let engine = engine_with(store.clone(), Arc::new(NullFetcher));

    engine
        .create_model_version("conflict_detector", "1.0.0", None)
        .await
        .unwrap();
    engine
        .activate_model_version("conflict_detector", "1.0.0")
        .await
        .unwrap();

    for _ in 0..40 {
        store.insert_feedback(reviewed(true, true)).await;
    }

    let outcome = engine
        .evaluate_model(
            "conflict_detector",
            None,
            EvaluationWindow::default(),
            Some(100),
        )
        .await
        .unwrap();

    assert!(!outcome.is_success());
    match outcome {
        EvaluationOutcome::Skipped {
            reason,
            samples_found,
        } => {
            assert_eq!(reason, "insufficient_data");
            assert_eq!(samples_found, 40);
        }
        _ => panic!("expected insufficient-data skip"),
    }
}

#[tokio::test]
async fn active_learning_loop_end_to_end() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let engine = engine_with(store.clone(), Arc::new(NullFetcher));

    engine
        .create_model_version("conflict_detector", "1.0.0", None)
        .await
        .unwrap();
    engine
        .activate_model_version("conflict_detector", "1.0.0")
        .await
        .unwrap();

    // Mostly correct predictions with a couple of misses.
    for _ in 0..110 {
        store.insert_feedback(reviewed(true, true)).await;
    }
    for _ in 0..8 {
        store.insert_feedback(reviewed(true, false)).await;
    }
    for _ in 0..6 {
        store.insert_feedback(reviewed(false, true)).await;
    }

    let outcome = engine
        .evaluate_model("conflict_detector", None, EvaluationWindow::default(), None)
        .await
        .unwrap();

    let report = match outcome {
        EvaluationOutcome::Completed(report) => report,
        _ => panic!("expected completion"),
    };
    assert_eq!(report.metrics.sample_count, 124);
    assert!(report.metrics.f1 > 0.9);
    assert!(report.meets_threshold);
    assert!(!report.retraining_recommended);

    // Promote a successor and confirm the single-active invariant.
    engine
        .create_model_version("conflict_detector", "1.1.0", Some("1.0.0"))
        .await
        .unwrap();
    engine
        .activate_model_version("conflict_detector", "1.1.0")
        .await
        .unwrap();
    let current = engine
        .current_model_version("conflict_detector")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.version, "1.1.0");

    // Training export consumes each record exactly once.
    let batch = engine.export_training_batch("conflict_detector").await.unwrap();
    assert_eq!(batch.len(), 124);
    let again = engine.export_training_batch("conflict_detector").await.unwrap();
    assert!(again.is_empty());
}

#[tokio::test]
async fn trend_compares_two_most_recent_evaluations() {
    let store = Arc::new(MemoryEvidenceStore::new());
    let engine = engine_with(store.clone(), Arc::new(NullFetcher));

    engine
        .create_model_version("conflict_detector", "1.0.0", None)
        .await
        .unwrap();
    engine
        .create_model_version("conflict_detector", "1.1.0", Some("1.0.0"))
        .await
        .unwrap();

    // Evaluate 1.0.0 on all-wrong feedback, then 1.1.0 on corrected data.
    for _ in 0..5 {
        store.insert_feedback(reviewed(true, false)).await;
    }
    engine
        .evaluate_model(
            "conflict_detector",
            Some("1.0.0"),
            EvaluationWindow::default(),
            Some(1),
        )
        .await
        .unwrap();

    for _ in 0..20 {
        store.insert_feedback(reviewed(true, true)).await;
    }
    engine
        .evaluate_model(
            "conflict_detector",
            Some("1.1.0"),
            EvaluationWindow::default(),
            Some(1),
        )
        .await
        .unwrap();

    let trend = engine.model_trend("conflict_detector").await.unwrap().unwrap();
    assert_eq!(trend.latest_version, "1.1.0");
    assert_eq!(trend.previous_version, "1.0.0");
    assert!(trend.latest_f1 > trend.previous_f1);
}
