use crate::core::context::ServiceContext;
use crate::core::opportunity::OpportunityService;
use crate::core::product::{ProductRequest, ProductService};
use crate::core::sales_page::{SalesPageRequest, SalesPageService};
use crate::core::social::{PromoteRequest, SocialService};
use crate::domain::model::{Opportunity, PostingResult};
use crate::utils::error::{AnipeError, Result};
use serde::Serialize;
use std::time::Instant;

/// Everything one end-to-end run produced.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowReport {
    pub opportunity: Opportunity,
    pub opportunity_path: String,
    pub product_path: String,
    pub sales_page: String,
    pub sales_page_url: String,
    pub promotion_record: String,
    pub posting_results: Vec<PostingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_path: Option<String>,
}

/// Runs opportunity → product → sales page → promotion, then stores the
/// combined report. The first failing stage aborts the run.
#[derive(Clone)]
pub struct AnipeEngine {
    opportunities: OpportunityService,
    products: ProductService,
    sales_pages: SalesPageService,
    social: SocialService,
}

impl AnipeEngine {
    pub fn new(ctx: ServiceContext) -> Self {
        Self {
            opportunities: OpportunityService::new(ctx.clone()),
            products: ProductService::new(ctx.clone()),
            sales_pages: SalesPageService::new(ctx.clone()),
            social: SocialService::new(ctx),
        }
    }

    pub async fn run(&self, query: Option<String>) -> Result<WorkflowReport> {
        let start = Instant::now();
        tracing::info!("Starting workflow");

        let identified = self.opportunities.identify_and_store(query).await?;
        tracing::info!("Step 1/4 done: {}", identified.storage_path);

        let product = self
            .products
            .generate(ProductRequest {
                opportunity: Some(serde_json::to_value(&identified.opportunity)?),
                storage_path: None,
            })
            .await?;
        tracing::info!("Step 2/4 done: {}", product.product_path);

        let page = self
            .sales_pages
            .generate(SalesPageRequest {
                opportunity: product.opportunity.clone(),
                product_content: product.content.clone(),
            })
            .await?;
        let sales_page_url = page.page_url.clone().ok_or_else(|| {
            AnipeError::storage(format!("Sales page {} was not uploaded", page.filename))
        })?;
        tracing::info!("Step 3/4 done: {}", sales_page_url);

        let promotion = self
            .social
            .promote(PromoteRequest {
                product_data: product.opportunity.clone(),
                sales_page_url: Some(sales_page_url.clone()),
            })
            .await?;
        tracing::info!("Step 4/4 done: {}", promotion.promotion_record);

        let mut report = WorkflowReport {
            opportunity: product.opportunity,
            opportunity_path: identified.storage_path,
            product_path: product.product_path,
            sales_page: page.filename,
            sales_page_url,
            promotion_record: promotion.promotion_record,
            posting_results: promotion.posting_results,
            results_path: None,
        };

        let stored = self
            .opportunities
            .store_results(&serde_json::to_value(&report)?)
            .await?;
        report.results_path = Some(stored.storage_path);

        tracing::info!("Workflow finished in {:?}", start.elapsed());
        Ok(report)
    }
}
