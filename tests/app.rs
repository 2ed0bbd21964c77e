mod common;

use assert_matches::assert_matches;

use dog_fetch::app::{App, FetchStatus, ImageOutcome};
use dog_fetch::domain::FailurePolicy;
use dog_fetch::output::JsonOutput;

use common::{MockDogApi, RecordingSink, akita_shiba, breed};

#[tokio::test]
async fn requests_are_strictly_sequential() {
    let app = App::new(MockDogApi::default(), FailurePolicy::Continue);
    let selection = [breed("Akita"), breed("Shiba Inu")];

    app.fetch_all(&selection, &JsonOutput).await;

    assert_eq!(
        app.client().calls(),
        vec![
            "start https://dog.ceo/api/breed/akita/images/random",
            "end https://dog.ceo/api/breed/akita/images/random",
            "start https://dog.ceo/api/breed/shiba/inu/images/random",
            "end https://dog.ceo/api/breed/shiba/inu/images/random",
        ]
    );
}

#[tokio::test]
async fn all_images_fetched() {
    let app = App::new(MockDogApi::default(), FailurePolicy::Continue);
    let selection = [breed("Akita"), breed("Shiba Inu")];

    let result = app.fetch_all(&selection, &JsonOutput).await;

    assert_eq!(result.status, FetchStatus::Complete);
    assert_eq!(result.entries.len(), 2);
    assert_eq!(
        result.get(&breed("Shiba Inu")),
        Some(&ImageOutcome::Image {
            url: "https://images.dog.ceo/breeds/shiba-inu/1.jpg".to_string()
        })
    );
    assert_eq!(result.failures().count(), 0);
}

#[tokio::test]
async fn continue_policy_marks_failure_and_keeps_going() {
    let api = MockDogApi::default().failing("akita");
    let app = App::new(api, FailurePolicy::Continue);
    let selection = [breed("Akita"), breed("Shiba Inu")];

    let result = app.fetch_all(&selection, &JsonOutput).await;

    assert_eq!(result.status, FetchStatus::Partial);
    assert_eq!(result.entries.len(), 2);
    assert_matches!(
        result.get(&breed("Akita")),
        Some(ImageOutcome::Failed { reason }) if reason.contains("404")
    );
    assert_matches!(
        result.get(&breed("Shiba Inu")),
        Some(ImageOutcome::Image { .. })
    );
    assert_eq!(app.client().image_urls().len(), 2);
}

#[tokio::test]
async fn abort_policy_stops_at_first_failure() {
    let api = MockDogApi::default().failing("akita");
    let app = App::new(api, FailurePolicy::Abort);
    let selection = [breed("Akita"), breed("Shiba Inu")];

    let result = app.fetch_all(&selection, &JsonOutput).await;

    assert_eq!(result.status, FetchStatus::Aborted);
    assert_eq!(result.entries.len(), 1);
    assert_matches!(
        result.get(&breed("Akita")),
        Some(ImageOutcome::Failed { .. })
    );
    assert_eq!(result.get(&breed("Shiba Inu")), None);
    assert_eq!(
        app.client().image_urls(),
        vec!["https://dog.ceo/api/breed/akita/images/random"]
    );
}

#[tokio::test]
async fn abort_policy_keeps_images_fetched_before_failure() {
    let api = MockDogApi::default().failing("shiba/inu");
    let app = App::new(api, FailurePolicy::Abort);
    let selection = [breed("Akita"), breed("Shiba Inu"), breed("Whippet")];

    let result = app.fetch_all(&selection, &JsonOutput).await;

    assert_eq!(result.status, FetchStatus::Aborted);
    assert_matches!(result.get(&breed("Akita")), Some(ImageOutcome::Image { .. }));
    assert_matches!(
        result.get(&breed("Shiba Inu")),
        Some(ImageOutcome::Failed { .. })
    );
    assert_eq!(result.get(&breed("Whippet")), None);
}

#[tokio::test]
async fn abort_policy_failure_on_last_breed_is_partial() {
    let api = MockDogApi::default().failing("shiba/inu");
    let app = App::new(api, FailurePolicy::Abort);
    let selection = [breed("Akita"), breed("Shiba Inu")];

    let result = app.fetch_all(&selection, &JsonOutput).await;

    assert_eq!(result.status, FetchStatus::Partial);
    assert_eq!(result.entries.len(), 2);
    assert_matches!(result.get(&breed("Akita")), Some(ImageOutcome::Image { .. }));
    assert_matches!(
        result.get(&breed("Shiba Inu")),
        Some(ImageOutcome::Failed { .. })
    );
}

#[tokio::test]
async fn progress_events_follow_selection_order() {
    let app = App::new(MockDogApi::default(), FailurePolicy::Continue);
    let sink = RecordingSink::default();

    app.fetch_all(&[breed("Whippet"), breed("Akita")], &sink).await;

    let requests: Vec<String> = sink
        .messages()
        .into_iter()
        .filter(|message| message.starts_with("image.request"))
        .collect();
    assert_eq!(
        requests,
        vec!["image.request breed=Whippet", "image.request breed=Akita"]
    );
}

#[tokio::test]
async fn load_catalog_normalizes_taxonomy() {
    let app = App::new(
        MockDogApi::with_taxonomy(akita_shiba()),
        FailurePolicy::Continue,
    );
    let catalog = app.load_catalog(&JsonOutput).await;
    assert_eq!(catalog.breeds(), &[breed("Akita"), breed("Shiba Inu")]);
}

#[tokio::test]
async fn load_catalog_failure_yields_empty_catalog() {
    let app = App::new(MockDogApi::default(), FailurePolicy::Continue);
    let sink = RecordingSink::default();

    let catalog = app.load_catalog(&sink).await;

    assert!(catalog.is_empty());
    assert!(sink.messages().iter().any(|m| m.starts_with("taxonomy.error")));
}

#[tokio::test]
async fn fetch_result_serializes_with_markers() {
    let api = MockDogApi::default().failing("akita");
    let app = App::new(api, FailurePolicy::Continue);

    let result = app.fetch_all(&[breed("Akita")], &JsonOutput).await;
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["status"], "partial");
    assert_eq!(json["entries"][0]["breed"], "Akita");
    assert_eq!(json["entries"][0]["kind"], "failed");
    assert!(json["entries"][0]["reason"].is_string());
}
