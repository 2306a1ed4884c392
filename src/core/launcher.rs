use crate::domain::ports::Storage;
use crate::utils::error::{AnipeError, Result};
use serde::{Deserialize, Serialize};

const GUIDES: [(&str, &str); 5] = [
    ("wordpress_setup.md", include_str!("../../templates/guides/wordpress_setup.md")),
    ("social_media_setup.md", include_str!("../../templates/guides/social_media_setup.md")),
    ("email_marketing_setup.md", include_str!("../../templates/guides/email_marketing_setup.md")),
    ("youtube_setup.md", include_str!("../../templates/guides/youtube_setup.md")),
    ("master_action_plan.md", include_str!("../../templates/guides/master_action_plan.md")),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateProgram {
    pub name: String,
    pub commission: String,
    pub average_payout: String,
    pub signup_url: String,
    pub why_promote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliateCategory {
    pub category: String,
    pub programs: Vec<AffiliateProgram>,
}

pub fn affiliate_programs() -> Vec<AffiliateCategory> {
    let program = |name: &str, commission: &str, payout: &str, url: &str, why: &str| {
        AffiliateProgram {
            name: name.to_string(),
            commission: commission.to_string(),
            average_payout: payout.to_string(),
            signup_url: url.to_string(),
            why_promote: why.to_string(),
        }
    };
    vec![
        AffiliateCategory {
            category: "High-Ticket Software".to_string(),
            programs: vec![
                program("ConvertKit", "30% recurring", "$50-200/month per referral", "convertkit.com/partners", "Email marketing tool everyone needs"),
                program("Teachable", "30% first month", "$30-150 per sale", "teachable.com/affiliates", "Course platform for digital products"),
                program("SEMrush", "$200 per sale + 40% recurring", "$200-500/month per referral", "semrush.com/partner", "Essential SEO tool for businesses"),
            ],
        },
        AffiliateCategory {
            category: "Financial Products".to_string(),
            programs: vec![
                program("Personal Capital", "$100-200 per qualified signup", "$100-200 per referral", "personalcapital.com/affiliates", "Free financial tracking tool"),
                program("Fundrise", "$50-100 per investment", "$50-100 per referral", "fundrise.com/affiliates", "Real estate investing platform"),
            ],
        },
        AffiliateCategory {
            category: "Online Courses".to_string(),
            programs: vec![
                program("Udemy", "15-50% per sale", "$10-50 per sale", "udemy.com/affiliate", "Huge course marketplace"),
                program("Skillshare", "$7 per trial + $10 per conversion", "$7-17 per referral", "skillshare.com/affiliates", "Popular creative learning platform"),
            ],
        },
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigitalProduct {
    pub product: String,
    pub price: String,
    pub creation_time: String,
    pub tools_needed: String,
    pub sales_potential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductTier {
    pub tier: String,
    pub products: Vec<DigitalProduct>,
}

pub fn digital_products() -> Vec<ProductTier> {
    let product = |name: &str, price: &str, time: &str, tools: &str, potential: &str| {
        DigitalProduct {
            product: name.to_string(),
            price: price.to_string(),
            creation_time: time.to_string(),
            tools_needed: tools.to_string(),
            sales_potential: potential.to_string(),
        }
    };
    vec![
        ProductTier {
            tier: "Quick Wins (Create This Week)".to_string(),
            products: vec![
                product("Passive Income Checklist", "$19", "2 hours", "Canva + PDF", "10-50 sales/month"),
                product("Income Tracker Template", "$27", "3 hours", "Google Sheets + Canva", "15-40 sales/month"),
            ],
        },
        ProductTier {
            tier: "Medium Effort (Create This Month)".to_string(),
            products: vec![
                product("Passive Income Email Course", "$97", "10 hours", "ConvertKit + Canva", "5-20 sales/month"),
                product("Complete Tool Kit Bundle", "$67", "8 hours", "Canva + Gumroad", "8-25 sales/month"),
            ],
        },
        ProductTier {
            tier: "High Value (Create Next Quarter)".to_string(),
            products: vec![
                product("Passive Income Mastery Course", "$297", "40 hours", "Teachable + Video recording", "3-15 sales/month"),
                product("1-on-1 Coaching", "$150/hour", "0 hours (just time)", "Calendly + Zoom", "5-20 hours/month"),
            ],
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProjection {
    pub month: u32,
    pub blog_income: u32,
    pub social_media: u32,
    pub email_list: u32,
    pub youtube: u32,
    pub digital_products: u32,
    pub total: u32,
    pub focus: String,
}

impl MonthProjection {
    pub fn channel_sum(&self) -> u32 {
        self.blog_income + self.social_media + self.email_list + self.youtube + self.digital_products
    }
}

pub fn income_projection() -> Vec<MonthProjection> {
    [
        (1, [0, 0, 0, 0, 0], "Setup and content creation"),
        (2, [50, 100, 200, 25, 150], "Audience building and first sales"),
        (3, [200, 300, 500, 100, 400], "Optimization and scaling"),
        (6, [500, 800, 1200, 400, 1100], "Automation and new products"),
        (12, [1000, 1500, 2500, 1200, 3800], "Scale and hire team"),
    ]
    .into_iter()
    .map(|(month, [blog, social, email, youtube, products], focus)| MonthProjection {
        month,
        blog_income: blog,
        social_media: social,
        email_list: email,
        youtube,
        digital_products: products,
        total: blog + social + email + youtube + products,
        focus: focus.to_string(),
    })
    .collect()
}

pub fn projections_to_csv(projections: &[MonthProjection]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in projections {
        writer.serialize(row)?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| AnipeError::IoError(e.into_error()))?;
    String::from_utf8(data).map_err(|e| AnipeError::storage(format!("invalid CSV output: {}", e)))
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchReport {
    pub files: Vec<String>,
    pub projections: Vec<MonthProjection>,
}

impl LaunchReport {
    pub fn summary(&self) -> String {
        let mut lines = vec!["🎯 YOUR INCOME PROJECTION".to_string(), "-".repeat(40)];
        lines.extend(self.projections.iter().map(|p| {
            format!("Month {}: ${}/month - {}", p.month, p.total, p.focus)
        }));
        lines.push(String::new());
        lines.push("📁 FILES CREATED".to_string());
        lines.push("-".repeat(40));
        lines.extend(self.files.iter().map(|f| format!("✅ {}", f)));
        lines.join("\n")
    }
}

/// Writes every setup guide, the monetization resources and the projections.
pub async fn launch(storage: &dyn Storage) -> Result<LaunchReport> {
    let mut files = Vec::new();

    tracing::info!("📝 Creating setup guides");
    for (name, guide) in GUIDES {
        storage.write_file(name, guide.as_bytes(), "text/markdown").await?;
        files.push(storage.uri(name));
    }

    tracing::info!("💰 Creating monetization resources");
    let json_files = [
        ("affiliate_programs.json", serde_json::to_vec_pretty(&affiliate_programs())?),
        ("digital_products.json", serde_json::to_vec_pretty(&digital_products())?),
    ];
    for (name, data) in json_files {
        storage.write_file(name, &data, "application/json").await?;
        files.push(storage.uri(name));
    }

    let projections = income_projection();
    storage
        .write_file(
            "income_projections.json",
            &serde_json::to_vec_pretty(&projections)?,
            "application/json",
        )
        .await?;
    files.push(storage.uri("income_projections.json"));

    let csv = projections_to_csv(&projections)?;
    storage
        .write_file("income_projections.csv", csv.as_bytes(), "text/csv")
        .await?;
    files.push(storage.uri("income_projections.csv"));

    tracing::info!("Launch kit written: {} files", files.len());
    Ok(LaunchReport { files, projections })
}
