use anipe::config::settings::{GeminiSettings, SocialSettings};
use anipe::core::content::{ContentPackage, Niche};
use anipe::core::generator::GeminiClient;
use anipe::core::search::SimulatedSearch;
use anipe::core::social::SocialPoster;
use anipe::core::{launcher, strategy};
use anipe::domain::model::PostingStatus;
use anipe::{AnipeEngine, LocalStorage, ServiceContext};
use httpmock::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};
use std::io::Read;
use std::sync::Arc;
use tempfile::TempDir;

fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

fn local_storage(temp_dir: &TempDir) -> LocalStorage {
    LocalStorage::new(temp_dir.path().to_string_lossy().to_string())
}

#[tokio::test]
async fn test_end_to_end_workflow_with_mock_apis() {
    let server = MockServer::start();
    let gemini_path = "/v1beta/models/gemini-1.5-flash:generateContent";

    let opportunity_reply = json!({
        "niche_topic": "Automated compliance reporting for cryptocurrency tax accountants",
        "problem_statement": "Accountants lose days reconciling exchange exports",
        "target_audience": "Cryptocurrency tax accountants",
        "product_idea": "Compliance report templates",
        "keywords": ["crypto tax", "compliance"],
        "confidence_score": 0.9
    });
    let opportunity_mock = server.mock(|when, then| {
        when.method(POST)
            .path(gemini_path)
            .query_param("key", "AIzaSy-test-key")
            .body_contains("CRITICAL INSTRUCTIONS");
        then.status(200)
            .json_body(gemini_reply(&format!("```json\n{}\n```", opportunity_reply)));
    });

    let product_mock = server.mock(|when, then| {
        when.method(POST)
            .path(gemini_path)
            .body_contains("premium digital product");
        then.status(200).json_body(gemini_reply(
            "# Executive Summary\n\nReconcile every exchange export in minutes.",
        ));
    });

    let sales_copy = json!({
        "headline": "Close Crypto Tax Season Early",
        "subheadline": "Reports your clients trust",
        "benefits": ["Fewer reconciliation hours", "Audit-ready output"],
        "description": "A complete reporting kit.",
        "urgency": "Launch pricing ends Friday"
    });
    let sales_mock = server.mock(|when, then| {
        when.method(POST)
            .path(gemini_path)
            .body_contains("Generate compelling sales copy");
        then.status(200).json_body(gemini_reply(&sales_copy.to_string()));
    });

    let social_reply = json!({
        "twitter": "Crypto accountants: stop reconciling by hand #CryptoTax",
        "linkedin": "Tax season is shorter with the right reporting kit.",
        "facebook": "We built the report kit we always wanted 🚀"
    });
    let social_mock = server.mock(|when, then| {
        when.method(POST)
            .path(gemini_path)
            .body_contains("Create engaging social media content");
        then.status(200).json_body(gemini_reply(&social_reply.to_string()));
    });

    let twitter_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/2/tweets")
            .header("authorization", "Bearer twitter-token");
        then.status(201).json_body(json!({ "data": { "id": "1790" } }));
    });

    let linkedin_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v2/ugcPosts")
            .header("X-Restli-Protocol-Version", "2.0.0");
        then.status(201).header("x-linkedin-id", "urn:li:share:42");
    });

    let temp_dir = TempDir::new().unwrap();
    let gemini = GeminiSettings {
        api_key: Some("AIzaSy-test-key".to_string()),
        base_url: server.base_url(),
        ..GeminiSettings::default()
    };
    let social = SocialSettings {
        twitter_bearer_token: Some("twitter-token".to_string()),
        linkedin_access_token: Some("linkedin-token".to_string()),
        twitter_base_url: server.base_url(),
        linkedin_base_url: server.base_url(),
        ..SocialSettings::default()
    };
    let ctx = ServiceContext::new(
        Arc::new(local_storage(&temp_dir)),
        Arc::new(GeminiClient::new(&gemini).unwrap()),
        Arc::new(SimulatedSearch),
        Arc::new(SocialPoster::from_settings(&social)),
    );

    let report = AnipeEngine::new(ctx)
        .run(Some("Future of Work predictions".to_string()))
        .await
        .unwrap();

    opportunity_mock.assert();
    product_mock.assert();
    sales_mock.assert();
    social_mock.assert();
    twitter_mock.assert();
    linkedin_mock.assert();

    assert!(report.opportunity.ai_powered);
    assert_eq!(
        report.opportunity.niche_topic,
        "Automated compliance reporting for cryptocurrency tax accountants"
    );
    // Fields the model omitted keep their defaults
    assert!(!report.opportunity.revenue_potential.is_empty());

    let product_file = report.product_path.trim_start_matches("file://");
    let product = std::fs::read_to_string(product_file).unwrap();
    assert!(product.contains("Reconcile every exchange export"));

    let page = temp_dir.path().join("sales-pages").join(&report.sales_page);
    let html = std::fs::read_to_string(page).unwrap();
    assert!(html.contains("Close Crypto Tax Season Early"));
    assert!(html.contains("<li>Audit-ready output</li>"));

    let statuses: Vec<(String, PostingStatus, Option<String>)> = report
        .posting_results
        .iter()
        .map(|r| (r.platform.clone(), r.status, r.post_id.clone()))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("twitter".to_string(), PostingStatus::Success, Some("1790".to_string())),
            (
                "linkedin".to_string(),
                PostingStatus::Success,
                Some("urn:li:share:42".to_string())
            ),
            ("facebook".to_string(), PostingStatus::Logged, None),
        ]
    );

    let record_file = report.promotion_record.trim_start_matches("file://");
    let record: Value = serde_json::from_str(&std::fs::read_to_string(record_file).unwrap()).unwrap();
    assert_eq!(record["debug_info"], "Generated with Gemini AI");
    assert_eq!(record["sales_page_url"], report.sales_page_url.as_str());

    let results_file = report.results_path.as_deref().unwrap().trim_start_matches("file://");
    let stored: Value = serde_json::from_str(&std::fs::read_to_string(results_file).unwrap()).unwrap();
    assert_eq!(stored["sales_page"], report.sales_page.as_str());
}

#[tokio::test]
async fn test_workflow_falls_back_when_gemini_rejects_key() {
    let server = MockServer::start();
    let gemini_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-1.5-flash:generateContent");
        then.status(400).json_body(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        }));
    });

    let temp_dir = TempDir::new().unwrap();
    let gemini = GeminiSettings {
        api_key: Some("AIzaSy-revoked".to_string()),
        base_url: server.base_url(),
        ..GeminiSettings::default()
    };
    let ctx = ServiceContext::offline(Arc::new(local_storage(&temp_dir)))
        .with_generator(Arc::new(GeminiClient::new(&gemini).unwrap()));

    let report = AnipeEngine::new(ctx).run(None).await.unwrap();

    assert!(gemini_mock.hits() >= 4);
    assert!(!report.opportunity.ai_powered);
    assert!(report
        .opportunity
        .debug_error
        .as_deref()
        .unwrap()
        .contains("API key not valid."));
    assert!(report
        .posting_results
        .iter()
        .filter(|r| r.platform != "facebook")
        .all(|r| r.status == PostingStatus::Skipped));

    let record_file = report.promotion_record.trim_start_matches("file://");
    let record: Value = serde_json::from_str(&std::fs::read_to_string(record_file).unwrap()).unwrap();
    assert!(record["debug_info"]
        .as_str()
        .unwrap()
        .starts_with("Fallback content used - AI error:"));
}

#[tokio::test]
async fn test_content_package_bundle() {
    let temp_dir = TempDir::new().unwrap();
    let storage = local_storage(&temp_dir);
    let mut rng = StdRng::seed_from_u64(7);
    let now = chrono::Local::now().naive_local();

    let package = ContentPackage::generate(Niche::AiProductivity, &mut rng, now).unwrap();
    let written = package.export(&storage, true).await.unwrap();
    assert_eq!(written.len(), 4);

    let saved: Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join("content_package.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(saved["social_media"].as_array().unwrap().len(), 7);
    assert_eq!(saved["email_sequence"].as_array().unwrap().len(), 5);

    // Verify zip contents
    let zip_file = std::fs::File::open(temp_dir.path().join("content_package.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(zip_file).unwrap();
    assert_eq!(archive.len(), 3);
    let mut blog = String::new();
    archive
        .by_name("blog_post.md")
        .unwrap()
        .read_to_string(&mut blog)
        .unwrap();
    assert_eq!(blog, package.blog_post.content);
}

#[tokio::test]
async fn test_launch_and_strategy_write_files() {
    let temp_dir = TempDir::new().unwrap();
    let storage = local_storage(&temp_dir);

    let report = launcher::launch(&storage).await.unwrap();
    assert_eq!(report.files.len(), 9);
    let csv = std::fs::read_to_string(temp_dir.path().join("income_projections.csv")).unwrap();
    assert_eq!(csv.lines().count(), 6);
    assert!(temp_dir.path().join("master_action_plan.md").exists());

    let mut rng = StdRng::seed_from_u64(11);
    let plan = strategy::generate_complete_strategy(&mut rng);
    let uri = plan.save(&storage).await.unwrap();
    assert!(uri.ends_with(strategy::STRATEGY_FILE));

    let saved: Value = serde_json::from_str(
        &std::fs::read_to_string(temp_dir.path().join(strategy::STRATEGY_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(
        saved["income_potential"]["monthly_potential"]["realistic"],
        json!(9325)
    );
}
