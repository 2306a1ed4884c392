use crate::core::context::ServiceContext;
use crate::core::generator::generate_json;
use crate::core::search::pick_broad_query;
use crate::core::{compact_timestamp, now};
use crate::domain::model::{IdentifiedOpportunity, Opportunity, SearchResult, StoredResults};
use crate::domain::ports::TextGenerator;
use crate::utils::error::{AnipeError, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const SEARCH_RESULT_COUNT: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentifyRequest {
    #[serde(default)]
    pub query: Option<String>,
}

pub fn build_prompt(results: &[SearchResult]) -> Result<String> {
    let results_json = serde_json::to_string_pretty(results)?;
    Ok(format!(
        r#"
CRITICAL INSTRUCTIONS: You are an expert niche market researcher tasked with finding HIGHLY SPECIFIC, UNIQUE micro-opportunities that are NOT obvious or generic.

FORBIDDEN TOPICS (DO NOT suggest anything related to):
- Generic "communication" or "productivity"
- Basic "time management" or "organization"
- Broad "marketing" or "social media"
- Generic "wellness" or "fitness"
- Common "leadership" or "team building"
- Overused "AI tools" or "automation"

REQUIREMENTS FOR A VALID OPPORTUNITY:
1. Must be HYPER-SPECIFIC (not broad categories)
2. Must target a clear, defined audience with money to spend
3. Must solve a real, painful problem people pay to fix
4. Must be something that can generate $5K+ monthly revenue
5. Must be based on emerging trends or underserved segments
6. Must be actionable and not theoretical

Search Results to Analyze:
{results_json}

EXAMPLES of the specificity level required:
GOOD: "AI-powered inventory optimization for artisanal food producers selling at farmers markets"
GOOD: "Automated compliance reporting system for cryptocurrency tax accountants"
BAD: "Communication tools"
BAD: "Productivity software"

Based on the search results, identify ONE unique micro-niche that meets ALL requirements above.

Respond ONLY in valid JSON format:
{{
    "niche_topic": "Ultra-specific 8-12 word description targeting exact audience and use case",
    "problem_statement": "Specific pain point that costs this audience time/money/stress",
    "target_audience": "Precise demographic with purchasing power (job title, industry, situation)",
    "product_idea": "Concrete digital solution (report, tool, course, template) they'd pay $50-500 for",
    "keywords": ["specific", "niche", "terms", "not", "generic"],
    "revenue_potential": "Realistic monthly revenue estimate with reasoning",
    "market_validation": "Why this audience would actually pay for this solution",
    "confidence_score": 0.85
}}
"#
    ))
}

/// Fallback record. The `HHMM` suffix keeps fallbacks from different runs apart.
pub fn default_opportunity(now: NaiveDateTime) -> Opportunity {
    Opportunity {
        niche_topic: format!(
            "AI-powered patent analysis for renewable energy startups targeting Series A funding ({})",
            now.format("%H%M")
        ),
        problem_statement: "Renewable energy startups spend 40+ hours manually analyzing patent landscapes before investor meetings, often missing critical IP conflicts".to_string(),
        target_audience: "Renewable energy startup founders preparing for Series A funding rounds ($2M+ raises)".to_string(),
        product_idea: "Weekly AI-generated patent landscape reports with competitive analysis and IP risk assessment for specific renewable energy sectors".to_string(),
        keywords: ["patent analysis", "renewable energy", "IP due diligence", "startup funding", "Series A"]
            .iter()
            .map(|k| k.to_string())
            .collect(),
        revenue_potential: "$15,000/month from 30 startups paying $500/month for weekly reports".to_string(),
        market_validation: "Series A startups have budget for IP due diligence and investors require thorough patent analysis before funding decisions".to_string(),
        confidence_score: 0.85,
        ai_powered: false,
        status: "success".to_string(),
        debug_error: None,
        extra: Map::new(),
    }
}

/// Asks the model for a niche and merges its answer over the fallback record.
/// Any generator failure yields the fallback with `debug_error` set.
pub async fn identify_niche_opportunity(
    results: &[SearchResult],
    generator: &dyn TextGenerator,
    now: NaiveDateTime,
) -> Result<Opportunity> {
    if results.is_empty() {
        return Err(AnipeError::NoOpportunity {
            message: "No relevant search results found.".to_string(),
        });
    }

    let mut defaults = default_opportunity(now);

    match ask_model(results, generator, &defaults).await {
        Ok(opportunity) => {
            tracing::info!("AI generation successful: {}", opportunity.niche_topic);
            Ok(opportunity)
        }
        Err(e) => {
            let error_msg = format!("AI generation failed: {}", e);
            tracing::warn!("{}", error_msg);
            defaults.debug_error = Some(error_msg);
            Ok(defaults)
        }
    }
}

async fn ask_model(
    results: &[SearchResult],
    generator: &dyn TextGenerator,
    defaults: &Opportunity,
) -> Result<Opportunity> {
    let prompt = build_prompt(results)?;
    let reply: Map<String, Value> = generate_json(generator, &prompt).await?;

    // 模型的欄位優先，缺少的沿用預設值
    let mut merged = serde_json::to_value(defaults)?;
    if let Value::Object(fields) = &mut merged {
        fields.extend(reply);
    }

    let mut opportunity: Opportunity = serde_json::from_value(merged)?;
    opportunity.ai_powered = true;
    opportunity.status = "success".to_string();
    opportunity.debug_error = None;
    Ok(opportunity)
}

#[derive(Clone)]
pub struct OpportunityService {
    ctx: ServiceContext,
}

impl OpportunityService {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn identify_and_store(&self, query: Option<String>) -> Result<IdentifiedOpportunity> {
        let query = match query.filter(|q| !q.trim().is_empty()) {
            Some(query) => query,
            None => pick_broad_query(&mut rand::thread_rng()).to_string(),
        };

        let results = self.ctx.search.search(&query, SEARCH_RESULT_COUNT);
        let now = now();
        let opportunity =
            identify_niche_opportunity(&results, self.ctx.generator.as_ref(), now).await?;
        tracing::info!("Identified Niche Opportunity: {}", opportunity.niche_topic);

        let blob_name = format!("opportunities/opportunity_{}.json", compact_timestamp(now));
        let body = serde_json::to_vec_pretty(&opportunity)?;
        self.ctx
            .storage
            .write_file(&blob_name, &body, "application/json")
            .await?;

        Ok(IdentifiedOpportunity {
            status: "success".to_string(),
            message: "Opportunity identified and saved.".to_string(),
            opportunity,
            storage_path: self.ctx.storage.uri(&blob_name),
        })
    }

    /// Persists the combined results of a full run.
    pub async fn store_results(&self, data: &Value) -> Result<StoredResults> {
        let is_empty = match data {
            Value::Null => true,
            Value::Object(fields) => fields.is_empty(),
            _ => false,
        };
        if is_empty {
            return Err(AnipeError::bad_request("No data provided"));
        }

        let timestamp = compact_timestamp(now());
        let blob_name = format!("results/anipe_complete_{}.json", timestamp);
        let body = serde_json::to_vec_pretty(data)?;
        self.ctx
            .storage
            .write_file(&blob_name, &body, "application/json")
            .await?;
        tracing::info!("Successfully stored results: {}", blob_name);

        Ok(StoredResults {
            status: "success".to_string(),
            message: "Results stored successfully.".to_string(),
            storage_path: self.ctx.storage.uri(&blob_name),
            timestamp,
        })
    }
}
