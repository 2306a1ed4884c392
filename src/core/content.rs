//! Ready-to-publish content package: blog post, a week of social posts, a
//! welcome email sequence and a YouTube script for one of the built-in niches.

use crate::domain::ports::Storage;
use crate::utils::error::{AnipeError, Result};
use crate::utils::text::{title_case, word_count};
use askama::Template;
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::str::FromStr;
use zip::write::{FileOptions, ZipWriter};

const WELCOME_CTAS: [&str; 5] = [
    "Reply with your biggest challenge",
    "Download free starter kit",
    "Reply with which tool interests you most",
    "Download detailed system guide",
    "Join the mastery course",
];

const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Niche {
    AiProductivity,
    PassiveIncome,
    DigitalMarketing,
}

pub struct NicheProfile {
    pub keywords: [&'static str; 4],
    pub audience: &'static str,
    pub pain_points: [&'static str; 3],
}

impl Niche {
    pub const ALL: [Niche; 3] = [
        Niche::AiProductivity,
        Niche::PassiveIncome,
        Niche::DigitalMarketing,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Niche::AiProductivity => "AI_PRODUCTIVITY",
            Niche::PassiveIncome => "PASSIVE_INCOME",
            Niche::DigitalMarketing => "DIGITAL_MARKETING",
        }
    }

    /// "PASSIVE_INCOME" -> "Passive Income"
    pub fn display_name(&self) -> String {
        title_case(&self.key().replace('_', " "))
    }

    pub fn profile(&self) -> NicheProfile {
        match self {
            Niche::AiProductivity => NicheProfile {
                keywords: ["AI tools", "productivity", "automation", "efficiency"],
                audience: "professionals and entrepreneurs",
                pain_points: ["time management", "repetitive tasks", "workflow optimization"],
            },
            Niche::PassiveIncome => NicheProfile {
                keywords: ["passive income", "side hustle", "financial freedom", "online business"],
                audience: "people seeking financial independence",
                pain_points: ["lack of time", "limited income", "job insecurity"],
            },
            Niche::DigitalMarketing => NicheProfile {
                keywords: ["social media", "content marketing", "SEO", "online presence"],
                audience: "small business owners and marketers",
                pain_points: ["low engagement", "poor visibility", "competition"],
            },
        }
    }

    fn primary_keyword(&self) -> &'static str {
        self.profile().keywords[0]
    }

    fn terms(&self) -> NicheTerms {
        let profile = self.profile();
        NicheTerms {
            keyword: profile.keywords[0],
            keyword_title: title_case(profile.keywords[0]),
            pain_point: profile.pain_points[0],
            pain_point_title: title_case(profile.pain_points[0]),
        }
    }
}

/// Values the blog, video and email templates draw from.
struct NicheTerms {
    keyword: &'static str,
    keyword_title: String,
    pain_point: &'static str,
    pain_point_title: String,
}

#[derive(Template)]
#[template(path = "blog_post.md", escape = "none")]
struct BlogPostTemplate<'a> {
    title: &'a str,
    niche: &'a NicheTerms,
}

#[derive(Template)]
#[template(path = "youtube_script.md", escape = "none")]
struct YoutubeScriptTemplate<'a> {
    title: &'a str,
    niche: &'a NicheTerms,
}

// 五封歡迎信共用一個入口，依 number 選內文
#[derive(Template)]
#[template(path = "emails/welcome.txt", escape = "none")]
struct WelcomeEmailTemplate<'a> {
    number: u8,
    niche: &'a NicheTerms,
}

fn welcome_subject(number: u8, terms: &NicheTerms) -> String {
    match number {
        1 => format!("Welcome! Your {} journey starts now", terms.keyword_title),
        2 => format!("The {} mistake that cost me $10K", terms.keyword),
        3 => format!("My $5K/month {} toolkit (free access)", terms.keyword),
        4 => format!("My weekend {} system (copy this)", terms.keyword),
        _ => format!("My {} income breakdown (transparent numbers)", terms.keyword),
    }
}

impl FromStr for Niche {
    type Err = AnipeError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        Niche::ALL
            .into_iter()
            .find(|n| n.key() == normalized)
            .ok_or_else(|| AnipeError::InvalidConfigValueError {
                field: "niche".to_string(),
                value: s.to_string(),
                reason: "expected one of AI_PRODUCTIVITY, PASSIVE_INCOME, DIGITAL_MARKETING"
                    .to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub seo_keywords: Vec<String>,
    pub estimated_read_time: String,
    pub monetization_opportunities: Vec<String>,
    pub social_media_snippets: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostKind {
    Tip,
    Story,
    Question,
    Resource,
    Motivation,
    BehindScenes,
    Controversy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialPost {
    pub day: u32,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub content: String,
    pub hashtags: String,
    pub best_posting_times: Vec<String>,
    pub platforms: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    pub email_number: u8,
    pub subject: String,
    pub content: String,
    pub call_to_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeScript {
    pub title: String,
    pub script: String,
    pub estimated_length: String,
    pub key_moments: Vec<String>,
    pub monetization: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn generate_blog_post<R: Rng + ?Sized>(niche: Niche, rng: &mut R) -> Result<BlogPost> {
    let keyword = niche.primary_keyword();
    let kw_title = title_case(keyword);
    let titles = [
        format!("How I Made $5,000 This Month Using {} (Complete Guide)", kw_title),
        format!("The {} Strategy That Changed My Life", kw_title),
        format!("10 {} Mistakes Costing You Money", kw_title),
        format!("Why {} is the Future of Making Money Online", kw_title),
        format!("From Zero to $10K: My {} Journey", kw_title),
    ];
    let title = titles.choose(rng).cloned().unwrap_or_else(|| titles[0].clone());

    let content = BlogPostTemplate {
        title: &title,
        niche: &niche.terms(),
    }
    .render()?;
    let words = word_count(&content);

    Ok(BlogPost {
        word_count: words,
        seo_keywords: strings(&niche.profile().keywords),
        estimated_read_time: format!("{} minutes", words / WORDS_PER_MINUTE),
        monetization_opportunities: strings(&[
            "5 affiliate links embedded naturally",
            "Email list signup incentive",
            "Digital product mention",
            "Coaching service promotion",
        ]),
        social_media_snippets: vec![
            format!("Just published: {} - Link in bio!", title),
            format!("The {} mistake that cost me $10K (and how to avoid it)", keyword),
            format!("My exact {} system that generates $5K/month", keyword),
        ],
        title,
        content,
    })
}

pub fn generate_social_calendar<R: Rng + ?Sized>(
    niche: Niche,
    days: u32,
    rng: &mut R,
) -> Vec<SocialPost> {
    let keyword = niche.primary_keyword();
    let pain_point = niche.profile().pain_points[0];
    let templates = [
        (PostKind::Tip, format!("🔥 {} TIP: [Specific actionable advice]. What's your experience with this? #hashtags", keyword.to_uppercase())),
        (PostKind::Story, format!("Last year I was struggling with {}... Today I'm making $5K/month. Here's what changed: [Thread 1/5]", pain_point)),
        (PostKind::Question, format!("What's the biggest {} mistake you see people make? 🤔 (I'll share the top 3 in comments)", keyword)),
        (PostKind::Resource, format!("🛠️ My favorite {} tools that actually work: [List with links] Which one will you try first?", keyword)),
        (PostKind::Motivation, format!("Your {} journey doesn't have to be perfect. It just has to be consistent. 💪 Who needed to hear this?", keyword)),
        (PostKind::BehindScenes, format!("Behind the scenes of my {} process... [Share specific numbers/results] Questions below!", keyword)),
        (PostKind::Controversy, format!("Unpopular opinion: Most {} advice is wrong. Here's what actually works... Agree or disagree?", keyword)),
    ];
    let hashtags = format!(
        "#{} #makemoney #sidehustle #entrepreneur #passiveincome",
        keyword.replace(' ', "").to_lowercase()
    );

    (1..=days)
        .filter_map(|day| {
            let (kind, content) = templates.choose(rng)?;
            Some(SocialPost {
                day,
                kind: *kind,
                content: content.clone(),
                hashtags: hashtags.clone(),
                best_posting_times: strings(&["9:00 AM", "1:00 PM", "5:00 PM", "8:00 PM"]),
                platforms: strings(&["Twitter", "LinkedIn", "Instagram", "Facebook"]),
            })
        })
        .collect()
}

pub fn generate_email_sequence(niche: Niche) -> Result<Vec<Email>> {
    let terms = niche.terms();
    WELCOME_CTAS
        .iter()
        .zip(1u8..)
        .map(|(cta, number)| {
            Ok(Email {
                email_number: number,
                subject: welcome_subject(number, &terms),
                content: WelcomeEmailTemplate {
                    number,
                    niche: &terms,
                }
                .render()?,
                call_to_action: cta.to_string(),
            })
        })
        .collect()
}

pub fn generate_youtube_script<R: Rng + ?Sized>(niche: Niche, rng: &mut R) -> Result<YoutubeScript> {
    let kw_title = title_case(niche.primary_keyword());
    let titles = [
        format!("How I Make $5,000/Month with {} (Step by Step)", kw_title),
        format!("The {} Strategy Everyone Gets Wrong", kw_title),
        format!("I Tried {} for 30 Days - Here's What Happened", kw_title),
    ];
    let title = titles.choose(rng).cloned().unwrap_or_else(|| titles[0].clone());

    let script = YoutubeScriptTemplate {
        title: &title,
        niche: &niche.terms(),
    }
    .render()?;

    Ok(YoutubeScript {
        script,
        title,
        estimated_length: "9 minutes".to_string(),
        key_moments: strings(&[
            "Hook with income claim (0:00)",
            "Problem identification (0:45)",
            "Solution reveal with proof (1:30)",
            "Tool recommendations (4:00)",
            "Action plan (7:00)",
            "Strong CTA (8:00)",
        ]),
        monetization: strings(&[
            "Affiliate links in description",
            "Course promotion",
            "Free lead magnet",
            "YouTube ad revenue",
        ]),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPackage {
    pub blog_post: BlogPost,
    pub social_media: Vec<SocialPost>,
    pub email_sequence: Vec<Email>,
    pub youtube_script: YoutubeScript,
    pub generated_date: String,
}

impl ContentPackage {
    pub fn generate<R: Rng + ?Sized>(niche: Niche, rng: &mut R, now: NaiveDateTime) -> Result<Self> {
        tracing::info!("Generating content for: {}", niche.display_name());
        Ok(Self {
            blog_post: generate_blog_post(niche, rng)?,
            social_media: generate_social_calendar(niche, 7, rng),
            email_sequence: generate_email_sequence(niche)?,
            youtube_script: generate_youtube_script(niche, rng)?,
            generated_date: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        })
    }

    /// 寫出 JSON 與兩個單檔，`bundle` 時另外打包成 zip；回傳各檔 URI
    pub async fn export(&self, storage: &dyn Storage, bundle: bool) -> Result<Vec<String>> {
        let package_json = serde_json::to_string_pretty(self)?;
        let files = [
            ("content_package.json", package_json.as_str(), "application/json"),
            ("blog_post.md", self.blog_post.content.as_str(), "text/markdown"),
            ("youtube_script.txt", self.youtube_script.script.as_str(), "text/plain"),
        ];

        let mut written = Vec::new();
        for (name, data, content_type) in files {
            storage.write_file(name, data.as_bytes(), content_type).await?;
            written.push(storage.uri(name));
        }

        if bundle {
            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data, _) in files {
                    zip.start_file::<_, ()>(name, FileOptions::default())?;
                    zip.write_all(data.as_bytes())?;
                }
                let cursor = zip.finish()?;
                cursor.into_inner()
            };
            tracing::debug!("Writing content bundle ({} bytes)", zip_data.len());
            storage
                .write_file("content_package.zip", &zip_data, "application/zip")
                .await?;
            written.push(storage.uri("content_package.zip"));
        }

        Ok(written)
    }
}
