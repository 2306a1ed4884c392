use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

/// A hypothesized niche. Partial records (as posted to the product, sales-page
/// and social services) deserialize with empty defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Opportunity {
    pub niche_topic: String,
    pub problem_statement: String,
    pub target_audience: String,
    pub product_idea: String,
    pub keywords: Vec<String>,
    pub revenue_potential: String,
    pub market_validation: String,
    pub confidence_score: f64,
    pub ai_powered: bool,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_error: Option<String>,
    /// 模型回傳但未定義的欄位原樣保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Opportunity {
    pub fn topic_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty_or(&self.niche_topic, default)
    }

    pub fn audience_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty_or(&self.target_audience, default)
    }

    pub fn problem_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty_or(&self.problem_statement, default)
    }

    pub fn product_idea_or<'a>(&'a self, default: &'a str) -> &'a str {
        non_empty_or(&self.product_idea, default)
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentifiedOpportunity {
    pub status: String,
    pub message: String,
    pub opportunity: Opportunity,
    pub storage_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredResults {
    pub status: String,
    pub message: String,
    pub storage_path: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProduct {
    pub status: String,
    pub message: String,
    pub product_path: String,
    pub opportunity: Opportunity,
    #[serde(skip)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesCopy {
    pub headline: String,
    pub subheadline: String,
    pub benefits: Vec<String>,
    pub description: String,
    pub urgency: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SalesPageResult {
    pub status: String,
    pub filename: String,
    pub page_url: Option<String>,
    pub html_content: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SocialContent {
    pub twitter: String,
    pub linkedin: String,
    pub facebook: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingStatus {
    Success,
    Error,
    Skipped,
    Logged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostingResult {
    pub status: PostingStatus,
    pub platform: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl PostingResult {
    pub fn new(status: PostingStatus, platform: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            platform: platform.to_string(),
            post_id: None,
            message: message.into(),
            content: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromotionRecord {
    pub timestamp: String,
    pub product_data: Opportunity,
    pub sales_page_url: String,
    pub generated_content: SocialContent,
    pub posting_results: Vec<PostingResult>,
    pub debug_info: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromotionOutcome {
    pub status: String,
    pub message: String,
    pub generated_content: SocialContent,
    pub posting_results: Vec<PostingResult>,
    pub promotion_record: String,
}
