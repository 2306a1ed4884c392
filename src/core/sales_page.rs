use crate::core::context::ServiceContext;
use crate::core::generator::generate_json;
use crate::core::now;
use crate::domain::model::{Opportunity, SalesCopy, SalesPageResult};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{AnipeError, Result};
use crate::utils::text::{truncate_chars, word_count};
use askama::Template;
use chrono::NaiveDateTime;
use serde::Deserialize;

const CONTENT_PREVIEW_CHARS: usize = 1000;
const HTML_PREVIEW_CHARS: usize = 500;
const MIN_PRICE: usize = 27;
const MAX_PRICE: usize = 97;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SalesPageRequest {
    #[serde(default)]
    pub opportunity: Opportunity,
    #[serde(default)]
    pub product_content: String,
}

impl SalesCopy {
    pub fn default_for(opportunity: &Opportunity) -> Self {
        Self {
            headline: format!(
                "Revolutionary {} Guide",
                opportunity.topic_or("Digital Product")
            ),
            subheadline: "Transform your approach with AI-generated insights".to_string(),
            benefits: vec![
                "Comprehensive analysis and recommendations".to_string(),
                "Data-driven insights you can't find elsewhere".to_string(),
                "Actionable strategies for immediate implementation".to_string(),
                "Expert-level knowledge distilled into practical steps".to_string(),
            ],
            description: "This comprehensive guide provides cutting-edge insights that would cost thousands from consulting firms.".to_string(),
            urgency: "Limited time offer - Get instant access today!".to_string(),
        }
    }
}

pub fn build_sales_copy_prompt(opportunity: &Opportunity, product_content: &str) -> String {
    format!(
        r#"
Generate compelling sales copy for a digital product based on this content:

PRODUCT TOPIC: {topic}
TARGET AUDIENCE: {audience}
PROBLEM STATEMENT: {problem}
KEYWORDS: {keywords}

PRODUCT CONTENT PREVIEW:
{preview}...

Generate sales copy in this JSON format:
{{
    "headline": "Compelling headline that grabs attention (max 60 chars)",
    "subheadline": "Supporting subheadline that explains the value (max 120 chars)",
    "benefits": [
        "Specific benefit 1 based on actual content",
        "Specific benefit 2 based on actual content",
        "Specific benefit 3 based on actual content",
        "Specific benefit 4 based on actual content"
    ],
    "description": "2-3 sentence description of what they'll get and why it's valuable",
    "urgency": "Urgency statement to encourage immediate action"
}}

Make it sound professional but exciting. Focus on the specific value this content provides.
"#,
        topic = opportunity.topic_or("Digital Product"),
        audience = opportunity.audience_or("Professionals"),
        problem = opportunity.problem_or("Industry challenges"),
        keywords = opportunity.keywords.join(", "),
        preview = truncate_chars(product_content, CONTENT_PREVIEW_CHARS),
    )
}

/// Model-written copy; a reply missing any of the five fields falls back to
/// [`SalesCopy::default_for`].
pub async fn generate_sales_copy(
    opportunity: &Opportunity,
    product_content: &str,
    generator: &dyn TextGenerator,
) -> SalesCopy {
    let prompt = build_sales_copy_prompt(opportunity, product_content);
    match generate_json::<SalesCopy>(generator, &prompt).await {
        Ok(copy) => {
            tracing::info!("AI sales copy generated successfully for: {}", copy.headline);
            copy
        }
        Err(AnipeError::GeneratorUnavailable) => {
            tracing::info!("No text generator configured, using default sales copy");
            SalesCopy::default_for(opportunity)
        }
        Err(e) => {
            tracing::warn!("AI sales copy generation failed: {}, using default copy", e);
            SalesCopy::default_for(opportunity)
        }
    }
}

/// 依內容長度與關鍵字數訂價，限制在 27 到 97 之間
pub fn price_for(product_content: &str, keyword_count: usize) -> usize {
    let raw = product_content.chars().count() / 100 + keyword_count * 3;
    raw.clamp(MIN_PRICE, MAX_PRICE)
}

pub fn page_filename(niche_topic: &str, now: NaiveDateTime) -> String {
    let clean_title = niche_topic.replace([' ', '/'], "_");
    format!(
        "{}_{}.html",
        truncate_chars(&clean_title, 50),
        now.format("%Y%m%d_%H%M%S")
    )
}

/// HTML 範本；`.html` 副檔名讓 askama 自動跳脫所有欄位
#[derive(Template)]
#[template(path = "sales_page.html")]
struct SalesPageTemplate<'a> {
    copy: &'a SalesCopy,
    meta_description: &'a str,
    keywords: &'a [String],
    target_audience: &'a str,
    focus_areas: String,
    price: usize,
    word_count: usize,
    generated_month: String,
    year: String,
}

pub fn render_html(
    copy: &SalesCopy,
    opportunity: &Opportunity,
    product_content: &str,
    price: usize,
    now: NaiveDateTime,
) -> Result<String> {
    let focus_areas = opportunity
        .keywords
        .iter()
        .take(5)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    let page = SalesPageTemplate {
        copy,
        meta_description: truncate_chars(&copy.description, 160),
        keywords: &opportunity.keywords,
        target_audience: opportunity.audience_or("Professional audience"),
        focus_areas,
        price,
        word_count: word_count(product_content),
        generated_month: now.format("%B %Y").to_string(),
        year: now.format("%Y").to_string(),
    };
    Ok(page.render()?)
}

#[derive(Clone)]
pub struct SalesPageService {
    ctx: ServiceContext,
}

impl SalesPageService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn generate(&self, request: SalesPageRequest) -> Result<SalesPageResult> {
        if request.product_content.trim().is_empty() {
            return Err(AnipeError::bad_request("No product content provided"));
        }

        let opportunity = &request.opportunity;
        let content = &request.product_content;
        let now = now();

        let copy = generate_sales_copy(opportunity, content, self.ctx.generator.as_ref()).await;
        let price = price_for(content, opportunity.keywords.len());
        let html = render_html(&copy, opportunity, content, price, now)?;
        let filename = page_filename(opportunity.topic_or("Digital Product"), now);

        // 上傳失敗不影響回應，只是沒有網址
        let blob_name = format!("sales-pages/{}", filename);
        let page_url = match self
            .ctx
            .storage
            .write_file(&blob_name, html.as_bytes(), "text/html")
            .await
        {
            Ok(()) => {
                let url = self
                    .ctx
                    .storage
                    .public_url(&blob_name)
                    .unwrap_or_else(|| self.ctx.storage.uri(&blob_name));
                tracing::info!("Sales page uploaded: {}", url);
                Some(url)
            }
            Err(e) => {
                tracing::error!("Sales page upload failed: {}", e);
                None
            }
        };

        let html_content = if html.chars().count() > HTML_PREVIEW_CHARS {
            format!("{}...", truncate_chars(&html, HTML_PREVIEW_CHARS))
        } else {
            html
        };

        Ok(SalesPageResult {
            status: "success".to_string(),
            filename,
            page_url,
            html_content,
            message: "Sales page generated successfully".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::tests::ScriptedGenerator;
    use crate::core::generator::DisabledGenerator;
    use crate::core::testing::MemoryStorage;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .unwrap()
            .and_hms_opt(9, 26, 53)
            .unwrap()
    }

    fn opportunity() -> Opportunity {
        Opportunity {
            niche_topic: "Patent analysis for solar startups".to_string(),
            target_audience: "Solar founders & CTOs".to_string(),
            keywords: vec!["patents", "solar", "series a", "ip", "due diligence", "funding"]
                .into_iter()
                .map(String::from)
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_price_is_clamped() {
        assert_eq!(price_for("short", 0), 27);
        assert_eq!(price_for(&"x".repeat(4000), 5), 55);
        assert_eq!(price_for(&"x".repeat(20_000), 10), 97);
    }

    #[test]
    fn test_page_filename() {
        let name = page_filename("Patent analysis / solar startups", fixed_now());
        assert_eq!(name, "Patent_analysis___solar_startups_20250314_092653.html");

        let long = page_filename(&"a".repeat(80), fixed_now());
        assert_eq!(long, format!("{}_20250314_092653.html", "a".repeat(50)));
    }

    #[test]
    fn test_render_html_escapes_and_fills_placeholders() {
        let opportunity = opportunity();
        let copy = SalesCopy::default_for(&opportunity);
        let html = render_html(&copy, &opportunity, "one two three", 42, fixed_now()).unwrap();

        assert!(html.contains("<h1>Revolutionary Patent analysis for solar startups Guide</h1>"));
        assert!(html.contains("$42</div>"));
        assert!(html.contains("Solar founders &amp; CTOs"));
        assert!(html.contains("<li>Data-driven insights you can"));
        assert!(!html.contains("can't find elsewhere"));
        assert!(html.contains("patents, solar, series a, ip, due diligence</p>"));
        assert!(html.contains("3 words of actionable content"));
        assert!(html.contains("March 2025"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_html_escapes_model_markup() {
        let opportunity = opportunity();
        let copy = SalesCopy {
            headline: "<script>alert(1)</script>".to_string(),
            benefits: vec!["<img src=x onerror=alert(1)>".to_string()],
            ..SalesCopy::default_for(&opportunity)
        };
        let html = render_html(&copy, &opportunity, "body", 42, fixed_now()).unwrap();

        assert!(html.contains("<h1>&lt;script&gt;alert(1)&lt;/script&gt;</h1>"));
        assert!(html.contains("<li>&lt;img src=x onerror=alert(1)&gt;</li>"));
        assert!(!html.contains("<script>alert"));
    }

    #[tokio::test]
    async fn test_incomplete_copy_falls_back_to_default() {
        let generator = ScriptedGenerator::replying(vec![r#"{"headline": "Only a headline"}"#]);
        let copy = generate_sales_copy(&opportunity(), "content", &generator).await;
        assert_eq!(copy, SalesCopy::default_for(&opportunity()));
    }

    #[tokio::test]
    async fn test_complete_copy_is_used() {
        let reply = r#"```json
{"headline": "Win Your Series A", "subheadline": "Patent clarity", "benefits": ["a", "b"], "description": "d", "urgency": "now"}
```"#;
        let generator = ScriptedGenerator::replying(vec![reply]);
        let copy = generate_sales_copy(&opportunity(), "content", &generator).await;
        assert_eq!(copy.headline, "Win Your Series A");
        assert_eq!(copy.benefits.len(), 2);

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("KEYWORDS: patents, solar"));
    }

    #[tokio::test]
    async fn test_unconfigured_generator_uses_default_copy() {
        let copy = generate_sales_copy(&opportunity(), "content", &DisabledGenerator).await;
        assert!(copy.headline.starts_with("Revolutionary"));
    }

    #[tokio::test]
    async fn test_generate_requires_content() {
        let service =
            SalesPageService::new(ServiceContext::offline(Arc::new(MemoryStorage::default())));
        let err = service
            .generate(SalesPageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.user_friendly_message(), "No product content provided");
    }

    #[tokio::test]
    async fn test_generate_uploads_page_and_truncates_preview() {
        let storage = Arc::new(MemoryStorage::default());
        let service = SalesPageService::new(ServiceContext::offline(storage.clone()));

        let result = service
            .generate(SalesPageRequest {
                opportunity: opportunity(),
                product_content: "# Executive Summary\n\nBody".to_string(),
            })
            .await
            .unwrap();

        let key = format!("sales-pages/{}", result.filename);
        assert_eq!(storage.content_type(&key).unwrap(), "text/html");
        assert_eq!(
            result.page_url.as_deref(),
            Some(format!("https://cdn.example.com/{}", key).as_str())
        );
        assert!(result.html_content.ends_with("..."));
        assert_eq!(result.html_content.chars().count(), 503);
    }

    #[tokio::test]
    async fn test_upload_failure_still_succeeds_without_url() {
        let service =
            SalesPageService::new(ServiceContext::offline(Arc::new(MemoryStorage::failing())));
        let result = service
            .generate(SalesPageRequest {
                opportunity: opportunity(),
                product_content: "content".to_string(),
            })
            .await
            .unwrap();
        assert!(result.page_url.is_none());
        assert_eq!(result.status, "success");
    }
}
