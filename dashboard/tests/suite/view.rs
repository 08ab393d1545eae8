use std::path::PathBuf;
use std::sync::Arc;

use esco_dashboard::cli::{ScoringSession, Selection, build_view};
use esco_dashboard::{Activity, DashboardConfig, ScoreState, load_activities, render_page};
use esco_scoring::{ChatClient, LmStudioClient, MatchScore};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn fixtures() -> (DashboardConfig, Vec<Activity>) {
    let config = DashboardConfig::load(&fixture("esco-dashboard.toml")).unwrap();
    let activities = load_activities(&fixture("activities.json")).unwrap();
    (config, activities)
}

async fn lm_studio(reply: &str) -> (MockServer, ScoringSession, DashboardConfig) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": reply}}]
        })))
        .mount(&server)
        .await;

    let (mut config, _) = fixtures();
    config.model.base_url = format!("{}/v1", server.uri());
    let client: Arc<dyn ChatClient> = Arc::new(LmStudioClient::new(&config.model).unwrap());
    (server, ScoringSession::new(client), config)
}

#[tokio::test]
async fn view_without_scoring() {
    let (config, activities) = fixtures();
    let view = build_view(&config, &activities, &Selection::default(), None)
        .await
        .unwrap();

    assert_eq!(view.score, ScoreState::Disabled);
    assert!(view.gauge.is_none());
    assert_eq!(view.goal, "Meet new people");
    assert_eq!(view.interests, "Pets, hiking");
    assert!(view.highlighted.contains(r#"<mark style="background:#fde68a">Walk</mark>"#));
    assert!(view.highlighted.contains(">shelter dogs</mark>"));

    let skills: Vec<(&str, u8, bool)> = view
        .skills
        .rows()
        .iter()
        .map(|r| (r.skill.as_str(), r.group, r.person_has))
        .collect();
    assert_eq!(
        skills,
        vec![
            ("show empathy", 0, true),
            ("work in teams", 0, true),
            ("apply hygiene standards", 1, false),
            ("maintain physical fitness", 4, false),
        ]
    );
}

#[tokio::test]
async fn view_with_overrides_and_escaping() {
    let (config, activities) = fixtures();
    let selection = Selection {
        activity: 1,
        person: 1,
        goal: None,
        interests: Some("Reading".to_string()),
    };
    let view = build_view(&config, &activities, &selection, None).await.unwrap();

    assert_eq!(view.goal, "Use my weekends well");
    assert_eq!(view.interests, "Reading");
    assert!(view.highlighted.contains(">books</mark>"));
    assert!(view.highlighted.contains(" &amp; games</mark>"));
    assert!(view.highlighted.ends_with("&lt;all ages&gt;."));
    assert!(view.skills.rows().iter().any(|r| r.skill == "attend to detail" && r.person_has));
}

#[tokio::test]
async fn view_rejects_out_of_range_selection() {
    let (config, activities) = fixtures();
    let activity = Selection {
        activity: 9,
        ..Default::default()
    };
    let err = build_view(&config, &activities, &activity, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Activity 9 out of range"));

    let person = Selection {
        person: 5,
        ..Default::default()
    };
    let err = build_view(&config, &activities, &person, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Person 5 out of range (2 configured)");
}

#[tokio::test]
async fn activity_without_annotations_renders_plain_text() {
    let (config, activities) = fixtures();
    let selection = Selection {
        activity: 2,
        ..Default::default()
    };
    let view = build_view(&config, &activities, &selection, None).await.unwrap();
    assert_eq!(
        view.highlighted,
        "Read stories to children at the community centre."
    );
    assert!(view.skills.is_empty());
}

#[tokio::test]
async fn view_with_model_score() {
    let reply = r###"```json
{"score": 0.72, "explanation": "## Fit\nGood with **animals**.", "explanation_short": "Good match (score: 0.72).", "recommend": true}
```"###;
    let (_server, mut session, config) = lm_studio(reply).await;
    let (_, activities) = fixtures();

    let view = build_view(&config, &activities, &Selection::default(), Some(&mut session))
        .await
        .unwrap();
    let ScoreState::Done(score) = &view.score else {
        panic!("expected a finished score, got {:?}", view.score);
    };
    assert_eq!(score.percent(), 72.0);
    assert!(score.recommend);

    let gauge = view.gauge.as_ref().unwrap();
    assert_eq!(gauge.value, 72.0);
    assert_eq!(gauge.start_value, 0.0);
    assert_eq!(gauge.title.as_deref(), Some("Person 1"));

    let page = render_page(&view);
    assert!(page.contains("Good match (score: 0.72)."));
    assert!(page.contains("<strong>animals</strong>"));
    assert!(page.contains("Plotly.newPlot"));
}

#[tokio::test]
async fn view_falls_back_when_model_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("no model loaded"))
        .mount(&server)
        .await;

    let (mut config, activities) = fixtures();
    config.model.base_url = format!("{}/v1", server.uri());
    let client: Arc<dyn ChatClient> = Arc::new(LmStudioClient::new(&config.model).unwrap());
    let mut session = ScoringSession::new(client);

    let view = build_view(&config, &activities, &Selection::default(), Some(&mut session))
        .await
        .unwrap();
    assert_eq!(view.score, ScoreState::Done(MatchScore::fallback()));
    assert!(render_page(&view).contains("Model call failed"));
}

#[tokio::test]
async fn second_render_animates_from_previous_score() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "{\"score\": 0.4}"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (mut config, activities) = fixtures();
    config.model.base_url = format!("{}/v1", server.uri());
    let client: Arc<dyn ChatClient> = Arc::new(LmStudioClient::new(&config.model).unwrap());
    let mut session = ScoringSession::new(client);
    let selection = Selection::default();

    let first = build_view(&config, &activities, &selection, Some(&mut session))
        .await
        .unwrap();
    let first_gauge = first.gauge.unwrap();
    assert_eq!(first_gauge.start_value, 0.0);
    assert_eq!(first_gauge.value, 40.0);

    let second = build_view(&config, &activities, &selection, Some(&mut session))
        .await
        .unwrap();
    let second_gauge = second.gauge.unwrap();
    assert_eq!(second_gauge.start_value, 40.0);
    assert_eq!(second_gauge.value, 40.0);
    assert_eq!(session.board().len(), 1);
}

#[tokio::test]
async fn changed_person_settings_rescore() {
    let (server, mut session, config) = lm_studio(r#"{"score": 0.5}"#).await;
    let (_, activities) = fixtures();

    let selection = Selection::default();
    build_view(&config, &activities, &selection, Some(&mut session))
        .await
        .unwrap();
    build_view(&config, &activities, &selection, Some(&mut session))
        .await
        .unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 1);

    let changed = Selection {
        goal: Some("Learn to cook".to_string()),
        ..Default::default()
    };
    let view = build_view(&config, &activities, &changed, Some(&mut session))
        .await
        .unwrap();
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
    assert_eq!(view.goal, "Learn to cook");

    let gauge = view.gauge.unwrap();
    assert_eq!(gauge.start_value, 50.0);
    assert_eq!(gauge.value, 50.0);
}
