use crate::config::settings::SocialSettings;
use crate::core::context::ServiceContext;
use crate::core::generator::generate_json;
use crate::core::{compact_timestamp, now};
use crate::domain::model::{
    Opportunity, PostingResult, PostingStatus, PromotionOutcome, PromotionRecord, SocialContent,
};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{AnipeError, Result};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromoteRequest {
    #[serde(default)]
    pub product_data: Opportunity,
    #[serde(default)]
    pub sales_page_url: Option<String>,
}

pub fn build_social_prompt(opportunity: &Opportunity, sales_page_url: &str) -> String {
    format!(
        r#"
Create engaging social media content to promote this AI-generated product:

Product Topic: {topic}
Target Audience: {audience}
Sales Page: {url}

Create 3 different promotional posts:

1. TWITTER POST (280 characters max):
- Hook with pain point or benefit
- Include trending hashtags
- Call to action
- Professional but engaging tone

2. LINKEDIN POST (longer form):
- Professional tone for business audience
- Focus on ROI and business value
- Include industry insights
- Call to action for the report

3. FACEBOOK POST (casual but valuable):
- More conversational tone
- Focus on transformation/results
- Include emojis appropriately
- Clear call to action

Format as JSON with keys: twitter, linkedin, facebook
Each should be ready to post directly.
Include relevant hashtags for each platform.
"#,
        topic = opportunity.topic_or("Business Intelligence"),
        audience = opportunity.audience_or("professionals"),
        url = sales_page_url,
    )
}

pub fn fallback_social_content(opportunity: &Opportunity, sales_page_url: &str) -> SocialContent {
    let topic = opportunity.topic_or("Business Intelligence");
    let audience = opportunity.audience_or("professionals");

    SocialContent {
        twitter: format!(
            "🚀 New AI Report: {topic} insights that could change everything! Get the data-driven strategies top companies use. Limited time access ⏰ {sales_page_url} #AI #Business #Strategy #DataDriven"
        ),
        linkedin: format!(
            "📊 Just released: Comprehensive {topic} analysis that reveals market insights typically reserved for enterprise consultants.\n\n\
             This AI-generated report provides:\n\
             ✅ Data-driven market analysis\n\
             ✅ Actionable strategic recommendations\n\
             ✅ Competitive intelligence insights\n\n\
             Perfect for {audience} looking to gain a competitive edge.\n\n\
             Access the full report: {sales_page_url}\n\n\
             #BusinessIntelligence #MarketAnalysis #Strategy #AI"
        ),
        facebook: format!(
            "🎯 Something exciting just dropped!\n\n\
             We've generated an in-depth {topic} report using advanced AI analysis. The insights are incredible and could seriously impact how {audience} approach their strategy.\n\n\
             💡 What's inside:\n\
             - Market trends you won't find elsewhere\n\
             - Actionable recommendations\n\
             - Professional-grade analysis\n\n\
             Check it out here: {sales_page_url}\n\n\
             Let me know what you think! 👇\n\n\
             #AI #BusinessStrategy #MarketInsights"
        ),
    }
}

/// Returns the posts plus a note on where they came from.
pub async fn generate_social_content(
    opportunity: &Opportunity,
    sales_page_url: &str,
    generator: &dyn TextGenerator,
) -> (SocialContent, String) {
    let prompt = build_social_prompt(opportunity, sales_page_url);
    match generate_json::<SocialContent>(generator, &prompt).await {
        Ok(content) => (content, "Generated with Gemini AI".to_string()),
        Err(e) => {
            tracing::warn!("AI generation failed: {}", e);
            (
                fallback_social_content(opportunity, sales_page_url),
                format!("Fallback content used - AI error: {}", e),
            )
        }
    }
}

/// Posts to the Twitter v2 and LinkedIn UGC APIs. Platforms without a token
/// are reported as skipped.
#[derive(Debug, Clone)]
pub struct SocialPoster {
    client: Client,
    twitter_token: Option<String>,
    linkedin_token: Option<String>,
    linkedin_author: String,
    twitter_base_url: String,
    linkedin_base_url: String,
}

impl SocialPoster {
    pub fn from_settings(settings: &SocialSettings) -> Self {
        Self {
            client: Client::new(),
            twitter_token: settings.twitter_bearer_token.clone(),
            linkedin_token: settings.linkedin_access_token.clone(),
            linkedin_author: settings.linkedin_author.clone(),
            twitter_base_url: settings.twitter_base_url.trim_end_matches('/').to_string(),
            linkedin_base_url: settings.linkedin_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn disabled() -> Self {
        Self::from_settings(&SocialSettings::default())
    }

    pub async fn post_to_twitter(&self, text: &str) -> PostingResult {
        let Some(token) = self.twitter_token.as_deref() else {
            return PostingResult::new(
                PostingStatus::Skipped,
                "twitter",
                "Twitter Bearer Token not configured",
            );
        };

        let url = format!("{}/2/tweets", self.twitter_base_url);
        let response = match self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "text": text }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return PostingResult::new(
                    PostingStatus::Error,
                    "twitter",
                    format!("Error posting to Twitter: {}", e),
                )
            }
        };

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return PostingResult::new(
                PostingStatus::Error,
                "twitter",
                format!("Twitter API error: {} - {}", status.as_u16(), body),
            );
        }

        let post_id = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v["data"]["id"].as_str().map(String::from));
        tracing::info!("Posted to Twitter: {:?}", post_id);

        PostingResult {
            post_id,
            ..PostingResult::new(
                PostingStatus::Success,
                "twitter",
                "Posted to Twitter successfully",
            )
        }
    }

    pub async fn post_to_linkedin(&self, text: &str) -> PostingResult {
        let Some(token) = self.linkedin_token.as_deref() else {
            return PostingResult::new(
                PostingStatus::Skipped,
                "linkedin",
                "LinkedIn Access Token not configured",
            );
        };

        let body = json!({
            "author": self.linkedin_author,
            "lifecycleState": "PUBLISHED",
            "specificContent": {
                "com.linkedin.ugc.ShareContent": {
                    "shareCommentary": { "text": text },
                    "shareMediaCategory": "NONE"
                }
            },
            "visibility": {
                "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC"
            }
        });

        let url = format!("{}/v2/ugcPosts", self.linkedin_base_url);
        let response = match self
            .client
            .post(&url)
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return PostingResult::new(
                    PostingStatus::Error,
                    "linkedin",
                    format!("Error posting to LinkedIn: {}", e),
                )
            }
        };

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return PostingResult::new(
                PostingStatus::Error,
                "linkedin",
                format!("LinkedIn API error: {} - {}", status.as_u16(), body),
            );
        }

        let post_id = response
            .headers()
            .get("x-linkedin-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        PostingResult {
            post_id,
            ..PostingResult::new(
                PostingStatus::Success,
                "linkedin",
                "Posted to LinkedIn successfully",
            )
        }
    }
}

#[derive(Clone)]
pub struct SocialService {
    ctx: ServiceContext,
}

impl SocialService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn promote(&self, request: PromoteRequest) -> Result<PromotionOutcome> {
        let sales_page_url = request
            .sales_page_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| AnipeError::bad_request("Sales page URL required"))?;
        let product = request.product_data;
        tracing::info!("Promoting product: {}", product.topic_or("Unknown"));

        let (content, debug_info) =
            generate_social_content(&product, &sales_page_url, self.ctx.generator.as_ref()).await;

        let mut results = Vec::new();
        if !content.twitter.is_empty() {
            results.push(self.ctx.poster.post_to_twitter(&content.twitter).await);
        }
        if !content.linkedin.is_empty() {
            results.push(self.ctx.poster.post_to_linkedin(&content.linkedin).await);
        }
        // Facebook 尚未串接，只記錄內容
        if !content.facebook.is_empty() {
            results.push(PostingResult {
                content: Some(content.facebook.clone()),
                ..PostingResult::new(
                    PostingStatus::Logged,
                    "facebook",
                    "Facebook content generated (posting not implemented yet)",
                )
            });
        }

        let now = now();
        let safe_niche = product
            .topic_or("unknown")
            .replace(' ', "_")
            .replace('/', "-");
        let record = PromotionRecord {
            timestamp: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            product_data: product,
            sales_page_url,
            generated_content: content.clone(),
            posting_results: results.clone(),
            debug_info,
        };

        let blob_name = format!("promotions/{}_{}.json", safe_niche, compact_timestamp(now));
        self.ctx
            .storage
            .write_file(
                &blob_name,
                &serde_json::to_vec_pretty(&record)?,
                "application/json",
            )
            .await?;

        Ok(PromotionOutcome {
            status: "success".to_string(),
            message: "Social media promotion completed".to_string(),
            generated_content: content,
            posting_results: results,
            promotion_record: self.ctx.storage.uri(&blob_name),
        })
    }
}
