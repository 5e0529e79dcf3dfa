use bible_study_core::scripture::{ChapterClient, RangeClient};
use bible_study_core::{
    FetchError, LanguageVariant, Passage, PassageFetcher, ProviderAttempt, ScriptureConfig,
    ScriptureSource, Verse,
};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chapter_body(verses: std::ops::RangeInclusive<u32>) -> serde_json::Value {
    let items: Vec<serde_json::Value> = verses
        .map(|verse| json!({ "pk": verse, "verse": verse, "text": format!("verse {verse}") }))
        .collect();
    json!(items)
}

async fn mount_chapter(
    server: &MockServer,
    translation: &str,
    book_id: u32,
    chapter: u32,
    body: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/get-chapter/{translation}/{book_id}/{chapter}/"
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> ScriptureConfig {
    ScriptureConfig::with_base_url(server.uri())
}

fn fetcher_for(server: &MockServer) -> PassageFetcher {
    PassageFetcher::from_config(&config_for(server)).unwrap()
}

fn refs(verses: &[Verse]) -> Vec<String> {
    verses.iter().map(|verse| verse.reference().to_string()).collect()
}

#[tokio::test]
async fn chapter_client_parses_and_cleans_verses() {
    let server = MockServer::start().await;
    mount_chapter(
        &server,
        "ESV",
        43,
        3,
        json!([
            { "verse": 1, "text": "Now there was a man <i>of the Pharisees</i>" },
            { "verse": 2, "text": "  This man came\n to Jesus by night " }
        ]),
    )
    .await;

    let client = ChapterClient::from_config(&config_for(&server)).unwrap();
    let verses = client.fetch_chapter("ESV", 43, 3).await.unwrap();

    assert_eq!(
        verses,
        vec![
            Verse::new(3, 1, "Now there was a man of the Pharisees"),
            Verse::new(3, 2, "This man came to Jesus by night"),
        ]
    );
}

#[tokio::test]
async fn chapter_client_reports_status_and_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-chapter/ESV/43/3/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-chapter/ESV/43/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let client = ChapterClient::from_config(&config_for(&server)).unwrap();

    let status = client.fetch_chapter("ESV", 43, 3).await.unwrap_err();
    assert!(matches!(status, FetchError::Status(500)), "got {status}");

    let malformed = client.fetch_chapter("ESV", 43, 4).await.unwrap_err();
    assert!(matches!(malformed, FetchError::Malformed(_)), "got {malformed}");
}

#[tokio::test]
async fn range_client_sends_translation_and_reads_verses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/John"))
        .and(query_param("translation", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reference": "John 3:16-17",
            "verses": [
                { "book_name": "John", "chapter": 3, "verse": 16, "text": "For God so loved\n" },
                { "book_name": "John", "chapter": 3, "verse": 17, "text": "For God didn't send\n" }
            ]
        })))
        .mount(&server)
        .await;

    let client = RangeClient::from_config(&config_for(&server)).unwrap();
    let verses = client.fetch_range("web", "John", "3:16-17").await.unwrap();

    assert_eq!(refs(&verses), vec!["3:16", "3:17"]);
    assert_eq!(verses[0].text, "For God so loved");
}

#[tokio::test]
async fn range_client_reads_missing_verses_key_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("translation", "web"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    let client = RangeClient::from_config(&config_for(&server)).unwrap();
    let verses = client.fetch_range("web", "John", "99").await.unwrap();
    assert!(verses.is_empty());
}

#[tokio::test]
async fn fetcher_trims_primary_chapter_to_requested_verses() {
    let server = MockServer::start().await;
    mount_chapter(&server, "ESV", 43, 3, chapter_body(1..=36)).await;

    let passage = Passage::new("John", 3, 3, Some(16), Some(18)).unwrap();
    let outcome = fetcher_for(&server)
        .fetch_with_report(&passage, LanguageVariant::English)
        .await;

    assert_eq!(refs(&outcome.verses), vec!["3:16", "3:17", "3:18"]);
    assert_eq!(outcome.served_by, Some(ProviderAttempt::new("bolls", "ESV")));
    assert_eq!(outcome.failed_attempts, 0);
}

#[tokio::test]
async fn fetcher_falls_back_to_secondary_translation() {
    let server = MockServer::start().await;
    // No ESV mock: the primary attempt gets a 404.
    mount_chapter(&server, "WEB", 43, 3, chapter_body(1..=36)).await;

    let passage = Passage::new("John", 3, 3, Some(16), Some(17)).unwrap();
    let outcome = fetcher_for(&server)
        .fetch_with_report(&passage, LanguageVariant::English)
        .await;

    assert_eq!(refs(&outcome.verses), vec!["3:16", "3:17"]);
    assert_eq!(outcome.served_by, Some(ProviderAttempt::new("bolls", "WEB")));
    assert_eq!(outcome.failed_attempts, 1);
}

#[tokio::test]
async fn fetcher_discards_partial_multi_chapter_attempt() {
    let server = MockServer::start().await;
    mount_chapter(&server, "ESV", 43, 3, chapter_body(1..=36)).await;
    mount_chapter(&server, "ESV", 43, 4, json!([])).await;
    mount_chapter(&server, "WEB", 43, 3, chapter_body(1..=36)).await;
    mount_chapter(&server, "WEB", 43, 4, chapter_body(1..=54)).await;

    let passage = Passage::new("John", 3, 4, Some(35), Some(2)).unwrap();
    let outcome = fetcher_for(&server)
        .fetch_with_report(&passage, LanguageVariant::English)
        .await;

    assert_eq!(refs(&outcome.verses), vec!["3:35", "3:36", "4:1", "4:2"]);
    assert_eq!(outcome.served_by, Some(ProviderAttempt::new("bolls", "WEB")));
}

#[tokio::test]
async fn chinese_passage_reaches_range_provider_after_chapter_failures() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/John"))
        .and(query_param("translation", "cuv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "verses": [
                { "chapter": 3, "verse": 16, "text": "<b>神爱世人</b>，" },
                { "chapter": 3, "verse": 17, "text": "因为神差他的儿子" }
            ]
        })))
        .mount(&server)
        .await;

    let passage = Passage::new("John", 3, 3, Some(16), Some(17)).unwrap();
    let outcome = fetcher_for(&server)
        .fetch_with_report(&passage, LanguageVariant::ChineseSimplified)
        .await;

    assert_eq!(refs(&outcome.verses), vec!["3:16", "3:17"]);
    assert_eq!(outcome.verses[0].text, "神爱世人，");
    assert_eq!(outcome.served_by, Some(ProviderAttempt::new("bible_api", "cuv")));
    assert_eq!(outcome.failed_attempts, 2);
}

#[tokio::test]
async fn fetcher_returns_empty_when_every_provider_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let passage = Passage::chapters("John", 3, 3).unwrap();
    let fetcher = fetcher_for(&server);
    let outcome = fetcher
        .fetch_with_report(&passage, LanguageVariant::English)
        .await;

    assert!(outcome.verses.is_empty());
    assert_eq!(outcome.served_by, None);
    assert_eq!(
        outcome.failed_attempts,
        fetcher.plan().attempts_for(LanguageVariant::English).len()
    );
    assert!(fetcher
        .fetch(&passage, LanguageVariant::ChineseTraditional)
        .await
        .is_empty());
}

#[tokio::test]
async fn fetcher_skips_attempt_missing_a_boundary_verse() {
    let server = MockServer::start().await;
    mount_chapter(&server, "ESV", 43, 3, chapter_body(17..=36)).await;
    mount_chapter(&server, "WEB", 43, 3, chapter_body(1..=36)).await;

    let passage = Passage::new("John", 3, 3, Some(16), Some(18)).unwrap();
    let outcome = fetcher_for(&server)
        .fetch_with_report(&passage, LanguageVariant::English)
        .await;

    assert_eq!(refs(&outcome.verses), vec!["3:16", "3:17", "3:18"]);
    assert_eq!(outcome.served_by, Some(ProviderAttempt::new("bolls", "WEB")));
    assert_eq!(outcome.failed_attempts, 1);
}
