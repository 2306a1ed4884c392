use crate::core::context::ServiceContext;
use crate::core::{compact_timestamp, now};
use crate::domain::model::{GeneratedProduct, Opportunity};
use crate::domain::ports::{checked_key, TextGenerator};
use crate::utils::error::{AnipeError, Result};
use crate::utils::text::sanitize_topic;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRequest {
    /// Required key; may be `null` or `{}` when `storage_path` points at a stored opportunity.
    pub opportunity: Option<Value>,
    #[serde(default, alias = "gcs_path")]
    pub storage_path: Option<String>,
}

pub fn fallback_product_content(opportunity: &Opportunity) -> String {
    let product_idea = opportunity.product_idea_or("a detailed report");
    let problem_statement = opportunity.problem_or("a common problem");
    let target_audience = opportunity.audience_or("general audience");

    format!(
        r#"# Executive Summary

This is a simulated executive summary for the product idea: {product_idea}.

# Introduction to the Problem

The problem statement is: {problem_statement}.

# Detailed Analysis/Solution

This is a simulated detailed analysis/solution for the problem statement.

# Actionable Recommendations or Next Steps

These are simulated actionable recommendations or next steps for the target audience: {target_audience}.

# Conclusion

This is a simulated conclusion for the product idea.
"#
    )
}

pub fn build_product_prompt(opportunity: &Opportunity) -> String {
    format!(
        r#"
You are writing a premium digital product for a paying audience.

NICHE: {niche}
PRODUCT IDEA: {idea}
PROBLEM: {problem}
TARGET AUDIENCE: {audience}
KEYWORDS: {keywords}

Write the complete product as Markdown with these top-level sections:
# Executive Summary
# Introduction to the Problem
# Detailed Analysis/Solution
# Actionable Recommendations or Next Steps
# Conclusion

Be concrete and specific to the audience. Do not wrap the answer in code fences.
"#,
        niche = opportunity.topic_or("an unspecified niche"),
        idea = opportunity.product_idea_or("a detailed report"),
        problem = opportunity.problem_or("a common problem"),
        audience = opportunity.audience_or("general audience"),
        keywords = opportunity.keywords.join(", "),
    )
}

/// Long-form product text from the model, or the five-section fallback.
pub async fn generate_product_content(
    opportunity: &Opportunity,
    generator: &dyn TextGenerator,
) -> String {
    if !generator.is_configured() {
        tracing::info!("No text generator configured, using fallback product content");
        return fallback_product_content(opportunity);
    }

    match generator.generate(&build_product_prompt(opportunity)).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            tracing::warn!("Product generation returned empty text, using fallback");
            fallback_product_content(opportunity)
        }
        Err(e) => {
            tracing::warn!("Product generation failed: {}, using fallback", e);
            fallback_product_content(opportunity)
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[derive(Clone)]
pub struct ProductService {
    ctx: ServiceContext,
}

impl ProductService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    async fn resolve_opportunity(&self, request: ProductRequest) -> Result<Opportunity> {
        let raw = request
            .opportunity
            .ok_or_else(|| AnipeError::bad_request("No opportunity data provided"))?;

        if !is_blank(&raw) {
            return serde_json::from_value(raw).map_err(|e| {
                AnipeError::bad_request(format!("Invalid opportunity data: {}", e))
            });
        }

        let path = request
            .storage_path
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| AnipeError::bad_request("No opportunity data provided"))?;

        let key = self.ctx.storage.key_from_uri(&path);
        let key = checked_key(&key)
            .map_err(|_| AnipeError::bad_request(format!("Invalid storage path: {}", path)))?;
        tracing::info!("Loading opportunity from storage: {}", key);
        let data = self.ctx.storage.read_file(key).await.map_err(|e| {
            AnipeError::storage(format!("Failed to retrieve opportunity from storage: {}", e))
        })?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub async fn generate(&self, request: ProductRequest) -> Result<GeneratedProduct> {
        let opportunity = self.resolve_opportunity(request).await?;
        tracing::info!(
            "Generating product for niche: {}",
            opportunity.topic_or("N/A")
        );

        let content = generate_product_content(&opportunity, self.ctx.generator.as_ref()).await;

        let safe_topic = sanitize_topic(opportunity.topic_or("unspecified_niche"));
        let blob_name = format!("products/{}_{}.md", safe_topic, compact_timestamp(now()));
        self.ctx
            .storage
            .write_file(&blob_name, content.as_bytes(), "text/markdown")
            .await?;

        Ok(GeneratedProduct {
            status: "success".to_string(),
            message: "Product generated and saved.".to_string(),
            product_path: self.ctx.storage.uri(&blob_name),
            opportunity,
            content,
        })
    }
}
