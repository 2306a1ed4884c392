use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::text::title_case;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub const STRATEGY_FILE: &str = "ai_income_strategy.json";

pub const CONTENT_TOPICS: [&str; 10] = [
    "AI and Technology",
    "Personal Finance",
    "Health & Wellness",
    "Productivity Hacks",
    "Digital Marketing",
    "Entrepreneurship",
    "Cryptocurrency",
    "Remote Work",
    "Self-Improvement",
    "Investment Tips",
];

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// 不重複抽樣，最多十個
pub fn generate_content_ideas<R: Rng + ?Sized>(topic: &str, count: usize, rng: &mut R) -> Vec<String> {
    let ideas = [
        format!("10 {topic} Tips That Will Change Your Life in 2024"),
        format!("The Ultimate {topic} Guide for Beginners"),
        format!("How I Made $10K Using {topic} (Step-by-Step)"),
        format!("{topic} Mistakes That Are Costing You Money"),
        format!("The Future of {topic}: What Experts Predict"),
        format!("5-Minute {topic} Hacks for Busy People"),
        format!("{topic} Tools That Pay for Themselves"),
        format!("Why Everyone is Wrong About {topic}"),
        format!("The {topic} Strategy That Generated $50K"),
        format!("{topic} Trends to Watch in 2024"),
    ];
    let amount = count.min(ideas.len());
    ideas.choose_multiple(rng, amount).cloned().collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogStructure {
    pub introduction: String,
    pub main_content: Vec<String>,
    pub conclusion: String,
    pub seo_keywords: String,
    pub word_count: String,
    pub monetization: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostTemplate {
    pub title: String,
    pub topic: String,
    pub structure: BlogStructure,
    pub ai_prompt: String,
}

pub fn create_blog_post_template(title: &str, topic: &str) -> BlogPostTemplate {
    let lower = topic.to_lowercase();
    BlogPostTemplate {
        title: title.to_string(),
        topic: topic.to_string(),
        structure: BlogStructure {
            introduction: "Hook + problem statement + solution preview".to_string(),
            main_content: strings(&[
                "Point 1 with actionable advice",
                "Point 2 with real examples",
                "Point 3 with tools/resources",
                "Point 4 with common mistakes",
                "Point 5 with advanced strategies",
            ]),
            conclusion: "Summary + call to action + affiliate links".to_string(),
            seo_keywords: format!("{lower}, make money with {lower}, {lower} tips"),
            word_count: "1500-2000 words".to_string(),
            monetization: strings(&[
                "Amazon affiliate links for recommended tools",
                "Course affiliate links",
                "Google AdSense placement",
                "Email list signup incentive",
            ]),
        },
        ai_prompt: format!(
            r#"Write a comprehensive blog post titled "{title}" about {topic}.

Requirements:
- 1500-2000 words
- Include actionable tips and real examples
- Add 3-5 affiliate product recommendations naturally
- Include email signup call-to-action
- SEO optimized with keywords: {lower}
- Engaging, conversational tone
- Include statistics and data where relevant

Structure:
1. Compelling introduction with a hook
2. 5 main points with detailed explanations
3. Actionable conclusion with next steps
4. Resource section with affiliate links
"#
        ),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoStructure {
    pub hook: String,
    pub introduction: String,
    pub main_content: String,
    pub call_to_action: String,
    pub outro: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoutubeTemplate {
    pub title: String,
    pub topic: String,
    pub duration: String,
    pub structure: VideoStructure,
    pub monetization: Vec<String>,
    pub ai_prompt: String,
}

pub fn create_youtube_script_template(title: &str, topic: &str) -> YoutubeTemplate {
    YoutubeTemplate {
        title: title.to_string(),
        topic: topic.to_string(),
        duration: "8-12 minutes".to_string(),
        structure: VideoStructure {
            hook: "First 15 seconds - compelling question/statement".to_string(),
            introduction: "30 seconds - what viewers will learn".to_string(),
            main_content: "6-8 minutes - core value".to_string(),
            call_to_action: "1 minute - subscribe, like, affiliate links".to_string(),
            outro: "30 seconds - next video preview".to_string(),
        },
        monetization: strings(&[
            "YouTube ad revenue",
            "Affiliate links in description",
            "Sponsored segments",
            "Course/product promotion",
        ]),
        ai_prompt: format!(
            r#"Create a YouTube video script for "{title}" about {topic}.

Requirements:
- 8-12 minute video (1200-1800 words)
- Engaging hook in first 15 seconds
- Include 2-3 affiliate product mentions
- Add timestamps for easy editing
- Include visual cues for editor
- Conversational, energetic tone
- Include call-to-action for likes/subscribes

Format:
[HOOK - 0:00-0:15]
[INTRO - 0:15-0:45]
[MAIN CONTENT - 0:45-8:00]
[CTA - 8:00-9:00]
[OUTRO - 9:00-9:30]
"#
        ),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPlan {
    pub day: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub template: String,
    pub hashtags: String,
    pub best_times: Vec<String>,
    pub platforms: Vec<String>,
}

const POST_FORMATS: [(&str, &str); 7] = [
    ("tip", "🔥 {{topic}} TIP: [Actionable advice] What's your experience with this? #hashtags"),
    ("question", "What's the biggest {{topic}} mistake you see people make? 🤔 (I'll share the top 3 in comments) #hashtags"),
    ("story", "Last year I was struggling with {{topic}}... Today I'm making $X/month. Here's what changed: [Thread 1/5] #hashtags"),
    ("resource", "🛠️ My favorite {{topic}} tools that actually work: [List with affiliate links] Which one will you try first? #hashtags"),
    ("motivation", "Your {{topic}} journey doesn't have to be perfect. It just has to be consistent. 💪 Who needed to hear this today? #hashtags"),
    ("behind_scenes", "Behind the scenes of my {{topic}} process... [Share process/results] Questions? Drop them below! #hashtags"),
    ("controversy", "Unpopular opinion: Most {{topic}} advice is wrong. Here's what actually works... [Contrarian take] Agree or disagree? #hashtags"),
];

pub fn generate_social_media_posts<R: Rng + ?Sized>(
    topic: &str,
    count: u32,
    rng: &mut R,
) -> Vec<PostPlan> {
    let hashtags = format!(
        "#{} #makemoney #sidehustle #entrepreneur #passiveincome",
        topic.to_lowercase().replace(' ', "")
    );
    (1..=count)
        .filter_map(|day| {
            let (kind, format) = POST_FORMATS.choose(rng)?;
            Some(PostPlan {
                day,
                kind: kind.to_string(),
                template: format.replace("{{topic}}", topic),
                hashtags: hashtags.clone(),
                best_times: strings(&["9:00 AM", "1:00 PM", "5:00 PM", "8:00 PM"]),
                platforms: strings(&["Twitter", "LinkedIn", "Instagram", "Facebook"]),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterStructure {
    pub personal_intro: String,
    pub main_content: String,
    pub resource_spotlight: String,
    pub community_highlight: String,
    pub call_to_action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterTemplate {
    pub subject_lines: Vec<String>,
    pub structure: NewsletterStructure,
    pub monetization: Vec<String>,
}

pub fn create_email_newsletter_template(topic: &str) -> NewsletterTemplate {
    NewsletterTemplate {
        subject_lines: vec![
            format!("The {topic} secret that made me $5K this month"),
            format!("Why your {topic} strategy isn't working (+ fix)"),
            format!("I tested 10 {topic} methods. Here's what worked."),
            format!("The {topic} mistake costing you thousands"),
            format!("My {topic} income report + exact strategies"),
        ],
        structure: NewsletterStructure {
            personal_intro: "Personal story or update (builds connection)".to_string(),
            main_content: "One valuable tip or strategy".to_string(),
            resource_spotlight: "Tool/course recommendation (affiliate)".to_string(),
            community_highlight: "Reader success story".to_string(),
            call_to_action: "Clear next step for readers".to_string(),
        },
        monetization: strings(&[
            "Affiliate product recommendations",
            "Premium newsletter upsell",
            "Course/coaching promotion",
            "Sponsored content",
        ]),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductIdea {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: String,
    pub contents: Vec<String>,
    pub effort: String,
}

pub fn create_digital_product_ideas(topic: &str) -> Vec<ProductIdea> {
    let idea = |name: String, kind: &str, price: &str, contents: &[&str], effort: &str| ProductIdea {
        name,
        kind: kind.to_string(),
        price: price.to_string(),
        contents: strings(contents),
        effort: effort.to_string(),
    };
    vec![
        idea(
            format!("The Complete {topic} Toolkit"),
            "Digital Bundle",
            "$47-$97",
            &["Checklist", "Templates", "Video tutorials", "Resource list"],
            "Low - mostly compilation and formatting",
        ),
        idea(
            format!("{topic} Mastery Course"),
            "Online Course",
            "$197-$497",
            &["Video lessons", "Workbooks", "Community access", "Live Q&As"],
            "Medium - requires video creation",
        ),
        idea(
            format!("30-Day {topic} Challenge"),
            "Challenge Program",
            "$27-$67",
            &["Daily emails", "Action steps", "Progress tracker", "Community"],
            "Low - email sequence + simple tracking",
        ),
        idea(
            format!("{topic} Templates Pack"),
            "Template Bundle",
            "$19-$39",
            &["Ready-to-use templates", "Customization guide", "Bonus resources"],
            "Very Low - create once, sell forever",
        ),
        idea(
            format!("1-on-1 {topic} Coaching"),
            "Service",
            "$100-$500/hour",
            &["Personal consultation", "Custom strategy", "Follow-up support"],
            "High value, limited time investment",
        ),
    ]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStream {
    pub name: String,
    pub low: u32,
    pub high: u32,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPotential {
    pub conservative: u32,
    pub optimistic: u32,
    pub realistic: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub month: u32,
    pub focus: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomePotential {
    pub monthly_potential: MonthlyPotential,
    pub breakdown: Vec<IncomeStream>,
    pub timeline: Vec<Milestone>,
}

const INCOME_STREAMS: [(&str, u32, u32, &str); 8] = [
    ("blog_ads", 200, 1000, "Google AdSense + direct ads"),
    ("blog_affiliate", 300, 2000, "Product recommendations"),
    ("youtube_ads", 150, 800, "YouTube Partner Program"),
    ("youtube_sponsors", 500, 3000, "Sponsored content"),
    ("social_affiliate", 200, 1500, "Social media affiliate sales"),
    ("newsletter", 100, 1000, "Newsletter monetization"),
    ("digital_products", 500, 5000, "Course and template sales"),
    ("coaching", 400, 2000, "1-on-1 consulting"),
];

pub fn calculate_income_potential() -> IncomePotential {
    let breakdown: Vec<IncomeStream> = INCOME_STREAMS
        .iter()
        .map(|(name, low, high, description)| IncomeStream {
            name: name.to_string(),
            low: *low,
            high: *high,
            description: description.to_string(),
        })
        .collect();

    let conservative: u32 = breakdown.iter().map(|s| s.low).sum();
    let optimistic: u32 = breakdown.iter().map(|s| s.high).sum();

    IncomePotential {
        monthly_potential: MonthlyPotential {
            conservative,
            optimistic,
            realistic: (conservative + optimistic) / 2,
        },
        breakdown,
        timeline: [
            (1, "Setup and initial content creation"),
            (2, "Content publishing and audience building"),
            (3, "First revenue streams activate"),
            (6, "Significant income generation"),
            (12, "Full automation and scaling"),
        ]
        .into_iter()
        .map(|(month, focus)| Milestone {
            month,
            focus: focus.to_string(),
        })
        .collect(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayPlan {
    pub day: String,
    pub tasks: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationSchedule {
    pub days: Vec<DayPlan>,
    pub time_investment: String,
}

pub fn create_automation_schedule() -> AutomationSchedule {
    let plan = |day: &str, tasks: &[(&str, &str)]| DayPlan {
        day: day.to_string(),
        tasks: tasks
            .iter()
            .map(|(slot, task)| (slot.to_string(), task.to_string()))
            .collect(),
    };
    AutomationSchedule {
        days: vec![
            plan("monday", &[
                ("morning", "Generate blog post ideas and outlines"),
                ("afternoon", "Create YouTube video scripts"),
                ("evening", "Schedule social media posts for the week"),
            ]),
            plan("tuesday", &[
                ("morning", "Write and publish blog post #1"),
                ("afternoon", "Record YouTube video #1"),
                ("evening", "Engage with social media audience"),
            ]),
            plan("wednesday", &[
                ("morning", "Create newsletter content"),
                ("afternoon", "Work on digital product development"),
                ("evening", "Analyze performance metrics"),
            ]),
            plan("thursday", &[
                ("morning", "Write and publish blog post #2"),
                ("afternoon", "Record YouTube video #2"),
                ("evening", "Update affiliate links and optimize"),
            ]),
            plan("friday", &[
                ("morning", "Write and publish blog post #3"),
                ("afternoon", "Send weekly newsletter"),
                ("evening", "Plan next week's content"),
            ]),
            plan("weekend", &[
                ("saturday", "Batch create social media content"),
                ("sunday", "Review analytics and optimize strategy"),
            ]),
        ],
        time_investment: "15-20 hours per week initially, 5-10 hours after automation"
            .to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCategory {
    pub category: String,
    pub tools: Vec<String>,
}

pub fn tools_needed() -> Vec<ToolCategory> {
    [
        ("content_creation", &["ChatGPT/Claude", "Canva", "Loom/OBS"][..]),
        ("publishing", &["WordPress", "YouTube Studio", "Buffer/Hootsuite"][..]),
        ("email_marketing", &["ConvertKit", "Mailchimp"][..]),
        ("analytics", &["Google Analytics", "YouTube Analytics"][..]),
        ("monetization", &["Amazon Associates", "ClickBank", "Gumroad"][..]),
    ]
    .into_iter()
    .map(|(category, tools)| ToolCategory {
        category: category.to_string(),
        tools: strings(tools),
    })
    .collect()
}

pub const SETUP_CHECKLIST: [&str; 10] = [
    "Choose your primary topic and niche",
    "Set up blog with WordPress + hosting",
    "Create YouTube channel with professional branding",
    "Set up social media accounts",
    "Join affiliate programs",
    "Install analytics tracking",
    "Create content templates",
    "Set up email marketing system",
    "Plan first month of content",
    "Start publishing consistently",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyOverview {
    pub primary_topic: String,
    pub target_audience: String,
    pub unique_angle: String,
    pub time_to_profit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCalendar {
    pub blog_posts: Vec<BlogPostTemplate>,
    pub youtube_videos: Vec<YoutubeTemplate>,
    pub social_posts: Vec<PostPlan>,
    pub newsletters: Vec<NewsletterTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStrategy {
    pub overview: StrategyOverview,
    pub content_calendar: ContentCalendar,
    pub digital_products: Vec<ProductIdea>,
    pub income_potential: IncomePotential,
    pub automation_schedule: AutomationSchedule,
    pub tools_needed: Vec<ToolCategory>,
    pub setup_checklist: Vec<String>,
}

pub fn generate_complete_strategy<R: Rng + ?Sized>(rng: &mut R) -> IncomeStrategy {
    let topic = CONTENT_TOPICS.choose(rng).copied().unwrap_or(CONTENT_TOPICS[0]);
    let lower = topic.to_lowercase();
    tracing::info!("Selected primary topic: {}", topic);

    let blog_posts = generate_content_ideas(topic, 5, rng)
        .iter()
        .map(|idea| create_blog_post_template(idea, topic))
        .collect();
    let youtube_videos = generate_content_ideas(topic, 3, rng)
        .iter()
        .map(|idea| create_youtube_script_template(idea, topic))
        .collect();

    IncomeStrategy {
        overview: StrategyOverview {
            primary_topic: topic.to_string(),
            target_audience: format!("People interested in {lower} and making money online"),
            unique_angle: format!("Practical, actionable {lower} advice with real income results"),
            time_to_profit: "2-3 months for first $1000/month".to_string(),
        },
        content_calendar: ContentCalendar {
            blog_posts,
            youtube_videos,
            social_posts: generate_social_media_posts(topic, 7, rng),
            newsletters: vec![create_email_newsletter_template(topic)],
        },
        digital_products: create_digital_product_ideas(topic),
        income_potential: calculate_income_potential(),
        automation_schedule: create_automation_schedule(),
        tools_needed: tools_needed(),
        setup_checklist: strings(&SETUP_CHECKLIST),
    }
}

/// `1234` -> `1,234`
fn thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

impl IncomeStrategy {
    /// Console report printed by the `strategy` command.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let potential = self.income_potential.monthly_potential;

        let _ = writeln!(out, "🚀 AI-POWERED INCOME GENERATOR");
        let _ = writeln!(out, "{}", "=".repeat(50));
        let _ = writeln!(out, "💡 Primary Topic: {}", self.overview.primary_topic);
        let _ = writeln!(out, "🎯 Target: {}", self.overview.target_audience);
        let _ = writeln!(out, "⏰ Time to $1K/month: {}\n", self.overview.time_to_profit);

        let _ = writeln!(out, "💰 INCOME POTENTIAL\n{}", "-".repeat(30));
        let _ = writeln!(out, "Conservative: ${}/month", thousands(potential.conservative));
        let _ = writeln!(out, "Realistic: ${}/month", thousands(potential.realistic));
        let _ = writeln!(out, "Optimistic: ${}/month\n", thousands(potential.optimistic));

        let _ = writeln!(out, "📅 WEEKLY SCHEDULE (After Setup)\n{}", "-".repeat(30));
        for day in &self.automation_schedule.days {
            let _ = writeln!(out, "{}:", title_case(&day.day));
            for (slot, task) in &day.tasks {
                let _ = writeln!(out, "  {}: {}", title_case(slot), task);
            }
        }
        let _ = writeln!(out, "\n⏱️ {}\n", self.automation_schedule.time_investment);

        let _ = writeln!(out, "🛠️ REQUIRED TOOLS\n{}", "-".repeat(30));
        for tools in &self.tools_needed {
            let _ = writeln!(
                out,
                "{}: {}",
                title_case(&tools.category.replace('_', " ")),
                tools.tools.join(", ")
            );
        }

        let _ = writeln!(out, "\n✅ SETUP CHECKLIST\n{}", "-".repeat(30));
        for (i, item) in self.setup_checklist.iter().enumerate() {
            let _ = writeln!(out, "{:2}. {}", i + 1, item);
        }
        out
    }

    pub async fn save(&self, storage: &dyn Storage) -> Result<String> {
        let data = serde_json::to_vec_pretty(self)?;
        storage
            .write_file(STRATEGY_FILE, &data, "application/json")
            .await?;
        Ok(storage.uri(STRATEGY_FILE))
    }
}
