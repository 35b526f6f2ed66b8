use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::{load_settings, DEFAULT_SETTINGS_FILE},
    export::write_brand_kit,
    BrandStudio, GeminiClient, LogoError,
};
use futures::future::join_all;
use shared::protocol::brand_identity_schema;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sample plan offered to first-time users.
const EXAMPLE_PLAN: &str = "Business Name: VerdeTech
Industry: Sustainable Technology
Mission: To create innovative, eco-friendly consumer electronics that reduce electronic waste and promote a circular economy.
Target Audience: Environmentally conscious millennials and Gen Z, tech enthusiasts who value design and sustainability.
Key Products: Modular smartphones and laptops designed for easy repair and upgrades, solar-powered chargers, and accessories made from recycled materials.
Brand Values: Sustainability, Innovation, Transparency, Quality, and Community.";

#[derive(Parser, Debug)]
#[command(name = "blueprint", about = "AI-powered brand identity generator")]
struct Cli {
    /// Settings file; missing files fall back to defaults and environment.
    #[arg(long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a brand identity from a business plan and export the kit.
    Generate(GenerateArgs),
    /// Print the response schema sent with identity requests.
    Schema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Business plan text.
    #[arg(
        long,
        conflicts_with = "plan_file",
        required_unless_present_any = ["plan_file", "example"]
    )]
    plan: Option<String>,
    /// Read the business plan from a file.
    #[arg(long)]
    plan_file: Option<PathBuf>,
    /// Use the built-in sample business plan.
    #[arg(long, conflicts_with_all = ["plan", "plan_file"])]
    example: bool,
    /// Render the logo concept at this index (repeatable).
    #[arg(long = "logo")]
    logos: Vec<usize>,
    /// Render every logo concept.
    #[arg(long, conflicts_with = "logos")]
    all_logos: bool,
    /// Output directory for the guidelines and logo files.
    #[arg(long, default_value = "brand-kit")]
    out: PathBuf,
    /// Print the final session snapshot as JSON.
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries the results.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&brand_identity_schema())?);
        }
        Command::Generate(args) => {
            let settings = load_settings(&cli.config)?;
            let client = GeminiClient::new(&settings, settings.require_api_key()?)
                .context("failed to build generative API client")?;
            generate(BrandStudio::with_gemini(client), args).await?;
        }
    }

    Ok(())
}

async fn resolve_plan(
    plan: Option<String>,
    plan_file: Option<PathBuf>,
    example: bool,
) -> Result<String> {
    Ok(match (plan, plan_file) {
        (Some(plan), _) => plan,
        (None, Some(path)) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read plan from {}", path.display()))?,
        (None, None) if example => EXAMPLE_PLAN.to_string(),
        (None, None) => String::new(),
    })
}

async fn generate(studio: BrandStudio, args: GenerateArgs) -> Result<()> {
    let plan = resolve_plan(args.plan, args.plan_file, args.example).await?;

    println!("Building your blueprint...");
    let identity = studio.brand().submit(&plan).await?;
    println!("{}: {}", identity.brand_name, identity.tagline);

    let outcomes = if args.all_logos {
        studio.logos().generate_all().await?
    } else {
        let studio = &studio;
        let renders = args.logos.iter().map(|&index| async move {
            (index, studio.logos().generate_logo(index).await)
        });
        join_all(renders).await
    };
    for (index, outcome) in &outcomes {
        match outcome {
            Ok(_) => info!(index, "logo rendered"),
            Err(LogoError::ImageGeneration(err)) => {
                warn!(index, detail = %err.detail, "logo failed");
            }
            Err(err) => warn!(index, error = %err, "logo skipped"),
        }
    }

    let snapshot = studio.session().snapshot().await;
    if let Some(notice) = &snapshot.logo_notice {
        eprintln!("{}", notice.message);
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }

    let identity = snapshot
        .identity()
        .context("brand identity was cleared before export")?;
    for path in write_brand_kit(identity, &args.out).await? {
        println!("wrote {}", path.display());
    }
    Ok(())
}
