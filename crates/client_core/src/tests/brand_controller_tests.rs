use super::*;
use crate::test_support::{verdetech_identity, StubIdentityService, VERDETECH_PLAN};
use shared::error::{ErrorCode, EMPTY_PLAN_MESSAGE, GENERATION_FAILED_MESSAGE};

fn controller(service: Arc<StubIdentityService>) -> BrandGenerationController {
    BrandGenerationController::new(Session::new(), service)
}

#[tokio::test]
async fn blank_plan_sets_validation_error_without_request() {
    let service = Arc::new(StubIdentityService::ok(verdetech_identity()));
    let brand = controller(service.clone());

    for plan in ["", "   ", "\n\t"] {
        let err = brand.submit(plan).await.expect_err("blank plan");
        assert_eq!(err, SubmitError::Validation(ValidationError));
    }

    assert_eq!(service.calls(), 0);
    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.phase, GenerationPhase::Idle);
    assert_eq!(
        snapshot.error,
        Some(UserFacingError::new(ErrorCode::Validation, EMPTY_PLAN_MESSAGE))
    );
}

#[tokio::test]
async fn blank_plan_keeps_ready_identity() {
    let service = Arc::new(StubIdentityService::ok(verdetech_identity()));
    let brand = controller(service.clone());
    brand.submit(VERDETECH_PLAN).await.expect("identity");

    brand.submit(" ").await.expect_err("blank plan");

    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.identity(), Some(&verdetech_identity()));
    assert_eq!(service.calls(), 1);
}

#[tokio::test]
async fn submit_passes_through_loading_to_ready() {
    let service = Arc::new(StubIdentityService::ok(verdetech_identity()));
    let brand = controller(service.clone());
    let mut events = brand.session().subscribe_events();

    let identity = brand.submit(VERDETECH_PLAN).await.expect("identity");
    assert_eq!(identity, verdetech_identity());

    assert_eq!(
        events.recv().await.expect("loading event"),
        SessionEvent::PhaseChanged(GenerationPhase::Loading)
    );
    assert_eq!(
        events.recv().await.expect("ready event"),
        SessionEvent::PhaseChanged(GenerationPhase::Ready(verdetech_identity()))
    );

    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.plan, VERDETECH_PLAN);
    assert_eq!(snapshot.phase, GenerationPhase::Ready(verdetech_identity()));
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn service_failure_moves_to_failed_and_clears_identity() {
    let service = Arc::new(StubIdentityService::failing("upstream 500"));
    let brand = controller(service.clone());
    let mut events = brand.session().subscribe_events();

    let err = brand.submit(VERDETECH_PLAN).await.expect_err("must fail");
    assert_eq!(err.to_string(), GENERATION_FAILED_MESSAGE);

    assert_eq!(
        events.recv().await.expect("loading event"),
        SessionEvent::PhaseChanged(GenerationPhase::Loading)
    );
    let snapshot = brand.session().snapshot().await;
    assert_eq!(
        snapshot.phase,
        GenerationPhase::Failed(GENERATION_FAILED_MESSAGE.to_string())
    );
    assert!(snapshot.identity().is_none());
    assert_eq!(snapshot.error.map(|e| e.code), Some(ErrorCode::Generation));
}

#[tokio::test]
async fn invalid_identity_from_service_is_a_generation_failure() {
    let mut identity = verdetech_identity();
    identity.brand_voice.truncate(1);
    let brand = controller(Arc::new(StubIdentityService::ok(identity)));

    let err = brand.submit(VERDETECH_PLAN).await.expect_err("must fail");
    assert!(matches!(err, SubmitError::Generation(_)));
    assert!(brand.session().snapshot().await.identity().is_none());
}

#[tokio::test]
async fn regeneration_after_failure_replaces_state() {
    let service = Arc::new(StubIdentityService::gated());
    let brand = Arc::new(controller(service.clone()));

    let fail = service.push_gate().await;
    fail.send(Err(GenerationError::new("timeout"))).expect("send");
    brand.submit(VERDETECH_PLAN).await.expect_err("first fails");

    let ok = service.push_gate().await;
    ok.send(Ok(verdetech_identity())).expect("send");
    brand.submit(VERDETECH_PLAN).await.expect("second succeeds");

    let snapshot = brand.session().snapshot().await;
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.identity(), Some(&verdetech_identity()));
}

#[tokio::test]
async fn submit_while_loading_is_rejected() {
    let service = Arc::new(StubIdentityService::gated());
    let gate = service.push_gate().await;
    let brand = Arc::new(controller(service.clone()));
    let mut events = brand.session().subscribe_events();

    let first = tokio::spawn({
        let brand = brand.clone();
        async move { brand.submit(VERDETECH_PLAN).await }
    });
    assert_eq!(
        events.recv().await.expect("loading"),
        SessionEvent::PhaseChanged(GenerationPhase::Loading)
    );

    let err = brand.submit("another plan").await.expect_err("re-entrant");
    assert_eq!(err, SubmitError::AlreadyInFlight);
    assert_eq!(service.calls(), 1);
    assert_eq!(brand.session().snapshot().await.plan, VERDETECH_PLAN);

    gate.send(Ok(verdetech_identity())).expect("send");
    first.await.expect("join").expect("identity");
}

#[tokio::test]
async fn blank_submit_while_loading_leaves_no_error_behind() {
    let service = Arc::new(StubIdentityService::gated());
    let gate = service.push_gate().await;
    let brand = Arc::new(controller(service.clone()));
    let mut events = brand.session().subscribe_events();

    let first = tokio::spawn({
        let brand = brand.clone();
        async move { brand.submit(VERDETECH_PLAN).await }
    });
    assert_eq!(
        events.recv().await.expect("loading"),
        SessionEvent::PhaseChanged(GenerationPhase::Loading)
    );

    let err = brand.submit("  ").await.expect_err("blank while loading");
    assert_eq!(err, SubmitError::AlreadyInFlight);
    assert!(brand.session().snapshot().await.error.is_none());

    gate.send(Ok(verdetech_identity())).expect("send");
    first.await.expect("join").expect("identity");

    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.identity(), Some(&verdetech_identity()));
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.progress_index(), crate::PROGRESS_STEPS.len());
}

#[tokio::test]
async fn reset_clears_everything_from_ready() {
    let brand = controller(Arc::new(StubIdentityService::ok(verdetech_identity())));
    brand.submit(VERDETECH_PLAN).await.expect("identity");

    brand.reset().await;

    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.phase, GenerationPhase::Idle);
    assert_eq!(snapshot.plan, "");
    assert!(snapshot.error.is_none());
    assert!(snapshot.logo_notice.is_none());
}

#[tokio::test]
async fn reset_clears_failed_and_validation_states() {
    let brand = controller(Arc::new(StubIdentityService::failing("down")));
    brand.submit(VERDETECH_PLAN).await.expect_err("fails");
    brand.reset().await;
    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.phase, GenerationPhase::Idle);
    assert!(snapshot.error.is_none());

    brand.submit("").await.expect_err("blank");
    brand.reset().await;
    assert!(brand.session().snapshot().await.error.is_none());
}

#[tokio::test]
async fn late_response_after_reset_is_discarded() {
    let service = Arc::new(StubIdentityService::gated());
    let gate = service.push_gate().await;
    let brand = Arc::new(controller(service.clone()));
    let mut events = brand.session().subscribe_events();

    let pending = tokio::spawn({
        let brand = brand.clone();
        async move { brand.submit(VERDETECH_PLAN).await }
    });
    assert_eq!(
        events.recv().await.expect("loading"),
        SessionEvent::PhaseChanged(GenerationPhase::Loading)
    );

    brand.reset().await;
    gate.send(Ok(verdetech_identity())).expect("send");

    let outcome = pending.await.expect("join");
    assert_eq!(outcome, Err(SubmitError::Superseded));

    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.phase, GenerationPhase::Idle);
    assert_eq!(snapshot.plan, "");
}

#[tokio::test]
async fn late_failure_after_reset_is_discarded() {
    let service = Arc::new(StubIdentityService::gated());
    let gate = service.push_gate().await;
    let brand = Arc::new(controller(service.clone()));
    let mut events = brand.session().subscribe_events();

    let pending = tokio::spawn({
        let brand = brand.clone();
        async move { brand.submit(VERDETECH_PLAN).await }
    });
    events.recv().await.expect("loading");

    brand.reset().await;
    gate.send(Err(GenerationError::new("late"))).expect("send");

    assert_eq!(pending.await.expect("join"), Err(SubmitError::Superseded));
    let snapshot = brand.session().snapshot().await;
    assert_eq!(snapshot.phase, GenerationPhase::Idle);
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn returned_concepts_start_not_started() {
    let mut identity = verdetech_identity();
    identity.logo_concepts[0].status = LogoStatus::Generating;
    let brand = controller(Arc::new(StubIdentityService::ok(identity)));

    let identity = brand.submit(VERDETECH_PLAN).await.expect("identity");
    assert!(identity
        .logo_concepts
        .iter()
        .all(|concept| concept.status == LogoStatus::NotStarted));
}
