mod api;
mod catalog;
mod config;
mod workflow;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

use api::{ApiClient, Post};
use config::Config;
use workflow::CreateSession;

/// Headless CLI for generating AI images and sharing them with the community
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Override the API base URL (also: ARTSHARE_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an image from a prompt and share it with the community
    Create {
        /// Author name shown in the gallery (falls back to the config file)
        #[arg(short, long)]
        name: Option<String>,

        /// Prompt describing the image
        #[arg(short, long)]
        prompt: Option<String>,

        /// Replace the prompt with a surprise pick from the catalog
        #[arg(long)]
        surprise: bool,

        /// Generate only; do not publish to the gallery
        #[arg(long)]
        no_share: bool,
    },
    /// Browse the community showcase
    Gallery {
        /// Filter posts by author name or prompt text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Print a surprise prompt and exit
    Surprise,
    /// Show or update the saved CLI configuration
    Config {
        /// Set the default author name
        #[arg(long)]
        name: Option<String>,

        /// Set the saved API base URL
        #[arg(long)]
        set_api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    // Surprise and config need no network access
    match &args.command {
        Command::Surprise => {
            println!("{}", catalog::surprise_prompt(""));
            return Ok(());
        }
        Command::Config { name, set_api_url } => {
            return run_config(name.clone(), set_api_url.clone());
        }
        _ => {}
    }

    let config = Config::load_or_default();
    let base_url = args
        .api_url
        .clone()
        .unwrap_or_else(|| config.resolve_api_base_url());
    info!("Using gallery API at {}", base_url);

    let client = ApiClient::new(&base_url).map_err(anyhow::Error::msg)?;

    match args.command {
        Command::Create {
            name,
            prompt,
            surprise,
            no_share,
        } => run_create(&client, &config, name, prompt, surprise, no_share).await,
        Command::Gallery { search } => run_gallery(&client, search.as_deref()).await,
        Command::Surprise | Command::Config { .. } => unreachable!("handled above"),
    }
}

/// Show the saved configuration, applying any updates first.
fn run_config(name: Option<String>, set_api_url: Option<String>) -> Result<()> {
    let path = Config::default_config_path()?;
    let mut config = Config::load(&path)?;

    let changed = name.is_some() || set_api_url.is_some();
    if let Some(name) = name {
        config.author_name = Some(name);
    }
    if let Some(url) = set_api_url {
        config.api_base_url = url;
    }
    if changed {
        config.save(&path)?;
        println!("Configuration saved to {}", path.display());
    }

    println!("api_base_url: {}", config.api_base_url);
    println!(
        "author_name: {}",
        config.author_name.as_deref().unwrap_or("(not set)")
    );
    Ok(())
}

/// Drive one create session: draft, generate, then (optionally) publish.
async fn run_create(
    client: &ApiClient,
    config: &Config,
    name: Option<String>,
    prompt: Option<String>,
    surprise: bool,
    no_share: bool,
) -> Result<()> {
    let author = name
        .or_else(|| config.author_name.clone())
        .unwrap_or_default();
    if !no_share && author.trim().is_empty() {
        bail!("An author name is required to share (use --name or set it in the config file)");
    }

    let mut session = CreateSession::new();
    session.set_author_name(&author)?;
    if let Some(prompt) = &prompt {
        session.set_prompt(prompt)?;
    }
    if surprise {
        let picked = session.surprise_me()?.to_string();
        println!("Surprise prompt: {}", picked);
    }

    println!("Generating image for \"{}\"...", session.draft().prompt);
    session.generate(client).await?;
    let photo = session
        .draft()
        .photo
        .clone()
        .unwrap_or_default();
    println!("Image ready: {}", photo);

    if no_share {
        info!("Skipping publication (--no-share)");
        return Ok(());
    }

    // The surrounding shell returns to the showcase once the post lands.
    let navigate = Arc::new(AtomicBool::new(false));
    let signal = navigate.clone();
    session.on_published(Box::new(move |post| {
        info!(post_id = %post.id, "Returning to the community showcase");
        signal.store(true, Ordering::SeqCst);
    }));

    println!("Sharing with the community...");
    session.publish(client).await?;
    println!(
        "Shared! Post id: {}",
        session.published_id().unwrap_or("unknown")
    );

    if navigate.load(Ordering::SeqCst) {
        run_gallery(client, None).await?;
    }

    Ok(())
}

/// Render the community showcase, optionally filtered.
async fn run_gallery(client: &ApiClient, search: Option<&str>) -> Result<()> {
    let posts = client.list_posts().await.map_err(anyhow::Error::msg)?;

    let shown: Vec<&Post> = match search {
        Some(query) => {
            println!("Showing results for \"{}\"\n", query);
            filter_posts(&posts, query)
        }
        None => posts.iter().collect(),
    };

    if shown.is_empty() {
        if search.is_some() {
            println!("No search results found");
        } else {
            println!("No posts found");
        }
        return Ok(());
    }

    println!("--- The Community Showcase ---\n");
    for post in &shown {
        println!("{}: {}", post.name, post.prompt);
        println!("    {}", post.photo);
    }
    println!("\n{} post(s)", shown.len());

    Ok(())
}

/// Case-insensitive filter over author name and prompt text.
fn filter_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    let query = query.to_lowercase();
    posts
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query) || p.prompt.to_lowercase().contains(&query)
        })
        .collect()
}
