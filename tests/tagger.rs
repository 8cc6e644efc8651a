use std::{
    collections::HashMap,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use bioedge::{
    config::Settings,
    tagger::{
        AnnotationCache, DenotationService, FetchOutcome, ServiceResponse, TagError, TmVarClient,
        TmVarTagger, MUTATION_CLASS,
    },
    Corpus,
};
use serde_json::json;
use tempfile::TempDir;

#[derive(Default)]
struct FakeService {
    responses: HashMap<String, String>,
    calls: AtomicUsize,
}

impl FakeService {
    fn with(mut self, id: &str, body: impl Into<String>) -> Self {
        self.responses.insert(id.to_string(), body.into());
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DenotationService for FakeService {
    async fn fetch(&self, id: &str) -> Result<ServiceResponse, TagError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match self.responses.get(id) {
            Some(body) => ServiceResponse::Body(body.clone()),
            None => ServiceResponse::NotFound,
        })
    }
}

struct DownService;

#[async_trait]
impl DenotationService for DownService {
    async fn fetch(&self, id: &str) -> Result<ServiceResponse, TagError> {
        Err(TagError::Status {
            id: id.to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        })
    }
}

fn braf() -> String {
    json!({
        "sourcedb": "PubMed",
        "sourceid": "111",
        "text": "BRAF V600E causes melanoma.",
        "denotations": [{ "obj": "Mutation", "span": { "begin": 5, "end": 10 } }]
    })
    .to_string()
}

fn catenin() -> String {
    json!({
        "text": "β-catenin p.R24H was seen.",
        "denotations": [{ "span": { "begin": 10, "end": 16 } }]
    })
    .to_string()
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join("cache.json")
}

#[tokio::test]
async fn builds_abstract_parts_from_denotations() {
    let dir = TempDir::new().unwrap();
    let service = FakeService::default().with("111", braf()).with("222", catenin());
    let mut tagger = TmVarTagger::new(service, AnnotationCache::load(cache_path(&dir)));
    let mut corpus = Corpus::new();

    let report = tagger.tag(&ids(&["111", "222"]), &mut corpus).await.unwrap();
    assert_eq!(report.fetched(), 2);
    assert_eq!(corpus.len(), 2);

    let part = &corpus.get("111").unwrap().parts["abstract"];
    assert_eq!(part.text, "BRAF V600E causes melanoma.");
    assert_eq!(part.annotations.len(), 1);
    assert_eq!(part.annotations[0].class_id, MUTATION_CLASS);
    assert_eq!(part.annotations[0].offset, 5);
    assert_eq!(part.annotations[0].text, "V600E");
    assert!(part.predicted_annotations.is_empty());

    let part = &corpus.get("222").unwrap().parts["abstract"];
    assert_eq!(part.annotations[0].text, "p.R24H");
}

#[tokio::test]
async fn reports_not_found_and_malformed_without_caching_them() {
    let dir = TempDir::new().unwrap();
    let service = FakeService::default()
        .with("111", braf())
        .with("bad", "<html>oops</html>")
        .with("partial", json!({ "text": "no denotations" }).to_string());
    let mut tagger = TmVarTagger::new(service, AnnotationCache::load(cache_path(&dir)));

    let report = tagger
        .fetch(&ids(&["111", "bad", "partial", "missing"]))
        .await
        .unwrap();
    assert_eq!(report.outcome("111"), Some(FetchOutcome::Fetched));
    assert_eq!(report.outcome("bad"), Some(FetchOutcome::Malformed));
    assert_eq!(report.outcome("partial"), Some(FetchOutcome::Malformed));
    assert_eq!(report.outcome("missing"), Some(FetchOutcome::NotFound));
    assert_eq!(report.malformed(), 2);
    assert_eq!(report.not_found(), 1);
    assert_eq!(report.requests(), 4);

    assert_eq!(tagger.cache().len(), 1);
    let mut corpus = Corpus::new();
    assert_eq!(tagger.merge_into(&ids(&["111", "bad", "missing"]), &mut corpus), 1);
    assert!(corpus.get("bad").is_none());
}

#[tokio::test]
async fn second_run_uses_cache_only() {
    let dir = TempDir::new().unwrap();
    let wanted = ids(&["111", "222"]);

    let first_service = FakeService::default().with("111", braf()).with("222", catenin());
    let mut first = TmVarTagger::new(first_service, AnnotationCache::load(cache_path(&dir)));
    let mut first_corpus = Corpus::new();
    first.tag(&wanted, &mut first_corpus).await.unwrap();
    assert_eq!(first.service().calls(), 2);

    let mut second = TmVarTagger::new(FakeService::default(), AnnotationCache::load(cache_path(&dir)));
    let mut second_corpus = Corpus::new();
    let report = second.tag(&wanted, &mut second_corpus).await.unwrap();

    assert_eq!(second.service().calls(), 0);
    assert_eq!(report.cached(), 2);
    assert_eq!(report.requests(), 0);
    assert_eq!(second_corpus, first_corpus);
}

#[tokio::test]
async fn transport_failure_aborts_batch_and_leaves_cache_untouched() {
    let dir = TempDir::new().unwrap();
    let mut tagger = TmVarTagger::new(DownService, AnnotationCache::load(cache_path(&dir)));
    let err = tagger.fetch(&ids(&["111"])).await.unwrap_err();
    assert!(matches!(err, TagError::Status { .. }));
    assert!(!cache_path(&dir).exists());
}

#[tokio::test]
async fn out_of_range_denotations_are_dropped() {
    let dir = TempDir::new().unwrap();
    let body = json!({
        "text": "short",
        "denotations": [{ "span": { "begin": 2, "end": 99 } }]
    })
    .to_string();
    let mut tagger =
        TmVarTagger::new(FakeService::default().with("1", body), AnnotationCache::load(cache_path(&dir)));
    let mut corpus = Corpus::new();
    tagger.tag(&ids(&["1"]), &mut corpus).await.unwrap();
    assert!(corpus.get("1").unwrap().parts["abstract"].annotations.is_empty());
}

#[test]
fn missing_or_corrupt_cache_is_empty() {
    let dir = TempDir::new().unwrap();
    assert!(AnnotationCache::load(cache_path(&dir)).is_empty());

    std::fs::write(cache_path(&dir), "{ not json").unwrap();
    assert!(AnnotationCache::load(cache_path(&dir)).is_empty());
}

#[test]
fn cache_round_trips_with_four_space_indent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested/cache.json");
    let mut cache = AnnotationCache::empty(&path);
    cache.insert("111", serde_json::from_str(&braf()).unwrap());
    cache.save().unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("{\n    \"111\": {"));

    let reloaded = AnnotationCache::load(&path);
    assert!(reloaded.contains("111"));
    assert_eq!(reloaded.get("111").unwrap()["text"], "BRAF V600E causes melanoma.");
}

#[test]
fn client_fills_url_template() {
    let settings = Settings {
        tmvar_url: "https://tmvar.test/Mutation/{id}/JSON/".into(),
        cache_path: "cache.json".into(),
        contact_email: "me@example.com".into(),
        data_dir: "./data".into(),
    };
    let client = TmVarClient::new(&settings).unwrap();
    assert_eq!(client.url_for("12345"), "https://tmvar.test/Mutation/12345/JSON/");
    assert_eq!(client.url_for("a b"), "https://tmvar.test/Mutation/a%20b/JSON/");
}

#[tokio::test]
async fn repeated_identifiers_are_handled_once() {
    let dir = TempDir::new().unwrap();
    let service = FakeService::default().with("111", braf());
    let mut tagger = TmVarTagger::new(service, AnnotationCache::load(cache_path(&dir)));
    let wanted = ids(&["111", "111", "gone", "gone"]);

    let report = tagger.fetch(&wanted).await.unwrap();
    assert_eq!(tagger.service().calls(), 2);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcome("111"), Some(FetchOutcome::Fetched));
    assert_eq!(report.outcome("gone"), Some(FetchOutcome::NotFound));
    assert_eq!(report.fetched(), 1);
    assert_eq!(report.cached(), 0);
    assert_eq!(report.requests(), 2);

    let mut corpus = Corpus::new();
    assert_eq!(tagger.merge_into(&wanted, &mut corpus), 1);
    assert_eq!(corpus.len(), 1);
}
