use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::Submission;
use quiz_core::model::{ChapterId, OptionKey, Question, QuestionId};
use services::{ExplainError, Explainer, QuizMode};

use super::test_harness::{ViewKind, setup_view_harness, test_services};

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_renders_stats_and_chapters() {
    let services = test_services();
    let controller = services.session_controller().await;
    let mut harness = setup_view_harness(ViewKind::Home, services, controller);

    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Outline of Modern Chinese History"), "missing title in {html}");
    assert!(html.contains("/ 4"), "missing total in {html}");
    assert!(html.contains("The Opium Wars"), "missing chapter in {html}");
    assert!(html.contains("3 questions"), "missing count in {html}");
    assert!(html.contains("1 question"), "missing singular count in {html}");
    assert!(!html.contains("Review mistakes"), "unexpected review button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_smoke_offers_review_after_a_mistake() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");
    controller
        .submit(&QuestionId::new("c1-q1"), &Submission::from_keys(["B"]))
        .await
        .expect("submit");
    controller.abandon();

    let mut harness = setup_view_harness(ViewKind::Home, services, controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Review mistakes (1)"), "missing review button in {html}");
    assert!(html.contains("Current mistakes"), "missing mistakes tile in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_question() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");

    let mut harness = setup_view_harness(ViewKind::Quiz, services, controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("1/3"), "missing counter in {html}");
    assert!(
        html.contains("When did the First Opium War begin?"),
        "missing prompt in {html}"
    );
    assert!(html.contains("Single choice"), "missing badge in {html}");
    assert!(
        html.contains("Wrong answers are added to your mistakes list"),
        "missing hint in {html}"
    );
    assert!(!html.contains("Mistake review"), "unexpected review badge in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_review_shows_only_mistakes() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");
    controller.jump_to(1).expect("jump");
    controller
        .submit(&QuestionId::new("c1-q2"), &Submission::from_keys(["A"]))
        .await
        .expect("submit");
    controller.abandon();
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Review)
        .expect("start review");

    let mut harness = setup_view_harness(ViewKind::Quiz, services, controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("1/1"), "missing counter in {html}");
    assert!(
        html.contains("Which ports opened under the Treaty of Nanking?"),
        "missing prompt in {html}"
    );
    assert!(html.contains("Mistake review"), "missing review badge in {html}");
    assert!(html.contains("Submit answer"), "missing submit button in {html}");
    assert!(html.contains("Finish"), "missing finish label in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_empty_review_panel() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c2"), QuizMode::Review)
        .expect("start review");

    let mut harness = setup_view_harness(ViewKind::Quiz, services, controller);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Nothing to review"), "missing empty panel in {html}");
    assert!(html.contains("The Taiping Rebellion"), "missing chapter title in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_without_session() {
    let services = test_services();
    let controller = services.session_controller().await;

    let mut harness = setup_view_harness(ViewKind::Quiz, services, controller);
    harness.rebuild();
    harness.drive_async().await;
    let html = harness.render();
    assert!(html.contains("No quiz in progress."), "missing panel in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn single_choice_click_submits_and_persists() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");

    let mut harness = setup_view_harness(ViewKind::Quiz, services.clone(), controller);
    harness.rebuild();
    harness.card.pick().call(OptionKey::new("B"));
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Incorrect"), "missing verdict in {html}");
    assert!(html.contains("The correct answer is A"), "missing answer in {html}");

    let q1 = QuestionId::new("c1-q1");
    let state = &services.storage().quiz_state;
    assert_eq!(state.read_progress().await.get(&q1), Some(false));
    assert!(state.read_wrong().await.contains(&q1));
}

#[tokio::test(flavor = "current_thread")]
async fn multiple_choice_waits_for_the_submit_button() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");
    controller.jump_to(1).expect("jump to multiple choice");

    let mut harness = setup_view_harness(ViewKind::Quiz, services.clone(), controller);
    harness.rebuild();
    harness.card.pick().call(OptionKey::new("A"));
    harness.drive_async().await;

    let html = harness.render();
    assert!(!html.contains("Correct!"), "submitted too early: {html}");
    assert!(!html.contains("Incorrect"), "submitted too early: {html}");
    assert!(html.contains("Submit answer"), "missing submit button in {html}");
    let state = &services.storage().quiz_state;
    assert!(state.read_progress().await.is_empty());

    harness.card.pick().call(OptionKey::new("C"));
    harness.card.submit().call(());
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Correct!"), "missing verdict in {html}");
    assert_eq!(
        state.read_progress().await.get(&QuestionId::new("c1-q2")),
        Some(true)
    );
    assert!(state.read_wrong().await.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn fixed_review_answer_stays_on_screen_with_next() {
    let services = test_services();
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");
    controller
        .submit(&QuestionId::new("c1-q1"), &Submission::from_keys(["B"]))
        .await
        .expect("submit q1");
    controller.jump_to(2).expect("jump");
    controller
        .submit(&QuestionId::new("c1-q3"), &Submission::from_keys(["B"]))
        .await
        .expect("submit q3");
    controller.abandon();
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Review)
        .expect("start review");

    let mut harness = setup_view_harness(ViewKind::Quiz, services.clone(), controller);
    harness.rebuild();
    assert!(harness.render().contains("1/2"));

    harness.card.pick().call(OptionKey::new("A"));
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Correct!"), "missing verdict in {html}");
    assert!(html.contains("When did the First Opium War begin?"), "question left screen: {html}");
    assert!(html.contains("1/2"), "counter changed in {html}");
    assert!(html.contains("Next"), "missing next label in {html}");
    assert!(!html.contains("Finish"), "unexpected finish label in {html}");
    let wrong = services.storage().quiz_state.read_wrong().await;
    assert!(!wrong.contains(&QuestionId::new("c1-q1")));
    assert_eq!(wrong.len(), 1);
}

struct CannedExplainer;

#[async_trait]
impl Explainer for CannedExplainer {
    async fn explain(&self, question: &Question) -> Result<String, ExplainError> {
        Ok(format!("Canned note for {}", question.id()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn explain_button_shows_the_configured_explainer() {
    let services = test_services().with_explainer(Arc::new(CannedExplainer));
    let mut controller = services.session_controller().await;
    controller
        .select_chapter(&ChapterId::new("c1"), QuizMode::Practice)
        .expect("start practice");

    let mut harness = setup_view_harness(ViewKind::Quiz, services, controller);
    harness.rebuild();
    harness.card.pick().call(OptionKey::new("A"));
    harness.drive_async().await;
    assert!(harness.render().contains("AI explanation"));

    harness.card.explain().call(());
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Canned note for c1-q1"), "missing explanation in {html}");
}
