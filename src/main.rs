use anipe::config::{build_context, build_storage};
use anipe::core::content::{ContentPackage, Niche};
use anipe::core::generator::{
    has_valid_key_format, required_api_key, GeminiClient, KEY_CHECK_PROMPT,
};
use anipe::core::opportunity::OpportunityService;
use anipe::core::{launcher, strategy, TextGenerator};
use anipe::utils::error::ErrorSeverity;
use anipe::utils::{logger, validation::Validate};
use anipe::{AnipeConfig, AnipeEngine, CliConfig, Command};
use clap::Parser;

async fn run(command: Command, config: AnipeConfig) -> anipe::Result<()> {
    match command {
        Command::Strategy => {
            let storage = build_storage(&config.storage).await?;
            let strategy = strategy::generate_complete_strategy(&mut rand::thread_rng());
            println!("{}", strategy.summary());
            let uri = strategy.save(storage.as_ref()).await?;
            println!("📄 Complete strategy saved to {}", uri);
        }
        Command::Content { niche, bundle } => {
            let niche: Niche = niche.parse()?;
            let storage = build_storage(&config.storage).await?;
            let now = chrono::Local::now().naive_local();
            let package = ContentPackage::generate(niche, &mut rand::thread_rng(), now)?;
            let blog = &package.blog_post;

            println!("📝 Content for: {}", niche.display_name());
            println!(
                "📰 Blog post: {} ({} words, {})",
                blog.title, blog.word_count, blog.estimated_read_time
            );
            for post in package.social_media.iter().take(3) {
                let preview: String = post.content.chars().take(60).collect();
                println!("📱 Day {} ({:?}): {}...", post.day, post.kind, preview);
            }
            for email in &package.email_sequence {
                println!("📧 Email {}: {}", email.email_number, email.subject);
            }
            let video = &package.youtube_script;
            println!("🎥 YouTube: {} ({})", video.title, video.estimated_length);

            for uri in package.export(storage.as_ref(), bundle).await? {
                println!("✅ {}", uri);
            }
        }
        Command::Launch => {
            let storage = build_storage(&config.storage).await?;
            let report = launcher::launch(storage.as_ref()).await?;
            println!("{}", report.summary());
        }
        Command::Identify { query } => {
            let ctx = build_context(&config).await?;
            let identified = OpportunityService::new(ctx).identify_and_store(query).await?;
            println!("{}", serde_json::to_string_pretty(&identified)?);
        }
        Command::Workflow { query } => {
            let ctx = build_context(&config).await?;
            let report = AnipeEngine::new(ctx).run(query).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::CheckKey => {
            let api_key = required_api_key(&config.gemini)?;
            if has_valid_key_format(api_key) {
                println!("API Key format check: ✅ Valid format");
            } else {
                println!("API Key format check: ❌ Invalid format");
            }

            let client = GeminiClient::new(&config.gemini)?;
            let reply = client.generate(KEY_CHECK_PROMPT).await?;
            println!("✅ API Test Success ({}): {}", client.model(), reply.trim());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting anipe CLI");
    if cli.verbose {
        tracing::debug!("CLI args: {:?}", cli);
    }

    // 載入並驗證配置
    let config = match cli.settings().and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.command, config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 依嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
