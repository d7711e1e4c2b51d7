//! changelogy - CLI entry point.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use changelogy::changelog::clean::DEFAULT_SUMMARY_LENGTH;
use changelogy::changelog::{build_summary, clean_changelog_text, write_changelog};
use changelogy::git::{MAX_COMMITS, read_local_commits};
use changelogy::github::{fetch_commits, parse_repository};
use changelogy::slug::unique_slug;
use changelogy::{
    ChangelogGenerator, GenerateRequest, GenerationConfig, GitHubConfig, GitHubError,
    generate_changelog,
};

/// Generate changelogs from commits with OpenAI, Anthropic, or keyword rules.
#[derive(Parser, Debug)]
#[command(name = "changelogy")]
#[command(about = "Generate release-ready changelogs from commits")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a changelog draft and print it as JSON
    Generate(GenerateArgs),
    /// List commits of a GitHub repository as JSON
    Commits {
        /// Repository as owner/repo or a GitHub URL
        repository: String,

        /// Branch to list (defaults to the repository's default branch)
        #[arg(long)]
        branch: Option<String>,

        /// Number of commits to fetch (1-100)
        #[arg(long, default_value_t = 30)]
        per_page: u8,
    },
    /// Print the URL slug for a project or version name
    Slug {
        text: String,

        /// Slugs already in use; a numeric suffix is added on collision
        #[arg(long)]
        taken: Vec<String>,

        /// Slug used when the text has no letters or digits
        #[arg(long, default_value = "project")]
        fallback: String,
    },
    /// Tidy edited changelog Markdown and print it
    Clean {
        /// Markdown file to clean (default: stdin)
        input: Option<PathBuf>,

        /// Print a short teaser instead of the full text
        #[arg(long)]
        summary: bool,

        /// Longest teaser, in characters
        #[arg(long, default_value_t = DEFAULT_SUMMARY_LENGTH, requires = "summary")]
        max_length: usize,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// JSON request file with commits, projectName, versionLabel (default: stdin)
    #[arg(long, conflicts_with_all = ["repo", "github"])]
    input: Option<PathBuf>,

    /// Read commits from a local git repository
    #[arg(long, conflicts_with = "github")]
    repo: Option<PathBuf>,

    /// Revision to start from in the local repository
    #[arg(long, requires = "repo", default_value = "HEAD")]
    rev: String,

    /// Read commits from GitHub (owner/repo or URL)
    #[arg(long)]
    github: Option<String>,

    /// Branch to read from GitHub
    #[arg(long, requires = "github")]
    branch: Option<String>,

    /// Project name (required with --repo or --github)
    #[arg(long)]
    project: Option<String>,

    /// Version label (required with --repo or --github)
    #[arg(long = "version-label")]
    version_label: Option<String>,

    /// Also prepend the changelog section to this Markdown file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("changelogy=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Commits {
            repository,
            branch,
            per_page,
        } => run_commits(&repository, branch.as_deref(), per_page).await,
        Command::Slug {
            text,
            taken,
            fallback,
        } => {
            let slug = unique_slug(&text, &fallback, |candidate| {
                taken.iter().any(|t| t == candidate)
            });
            println!("{}", slug);
            Ok(())
        }
        Command::Clean {
            input,
            summary,
            max_length,
        } => run_clean(input.as_deref(), summary.then_some(max_length)),
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let request = build_request(&args).await?;

    let config = GenerationConfig::from_env();
    if !config.has_any_provider() {
        warn!("No AI API key configured, using rule-based generation");
    }
    let generator =
        ChangelogGenerator::from_config(&config).context("Failed to set up AI providers")?;

    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling generation");
            watcher.cancel();
        }
    });

    let draft = generate_changelog(&request, &generator, &cancel)
        .await
        .context("Invalid generation request")?;

    if let Some(path) = &args.output {
        write_changelog(path, &draft.changelog)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote changelog section to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}

fn run_clean(input: Option<&std::path::Path>, summary: Option<usize>) -> Result<()> {
    let raw = read_input(input)?;
    let cleaned = clean_changelog_text(&raw);

    match summary {
        Some(max_length) => println!("{}", build_summary(&cleaned, max_length)),
        None => println!("{}", cleaned),
    }
    Ok(())
}

/// Read a file, or stdin when no path (or `-`) is given.
fn read_input(input: Option<&std::path::Path>) -> Result<String> {
    match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Assemble the request from a JSON document or from a commit source.
async fn build_request(args: &GenerateArgs) -> Result<GenerateRequest> {
    if args.repo.is_none() && args.github.is_none() {
        let raw = read_input(args.input.as_deref())?;

        let mut request: GenerateRequest =
            serde_json::from_str(&raw).context("Request is not valid JSON")?;
        if let Some(project) = &args.project {
            request.project_name = project.clone();
        }
        if let Some(version) = &args.version_label {
            request.version_label = version.clone();
        }
        return Ok(request);
    }

    let commits = match (&args.repo, &args.github) {
        (Some(path), _) => read_local_commits(path, Some(&args.rev), MAX_COMMITS)
            .with_context(|| format!("Failed to read commits from {}", path.display()))?,
        (None, Some(repository)) => {
            let (owner, repo) = parse_repository(repository)?;
            let token = GitHubConfig::from_env()
                .token
                .ok_or(GitHubError::AuthenticationFailed)?;
            fetch_commits(&token, &owner, &repo, args.branch.as_deref(), MAX_COMMITS as u8)
                .await
                .context("Failed to fetch commits from GitHub")?
                .commits
        }
        (None, None) => bail!("Provide --input, --repo, or --github"),
    };

    info!("Found {} commits", commits.len());

    Ok(GenerateRequest {
        commits,
        project_name: args.project.clone().unwrap_or_default(),
        version_label: args.version_label.clone().unwrap_or_default(),
    })
}

async fn run_commits(repository: &str, branch: Option<&str>, per_page: u8) -> Result<()> {
    let (owner, repo) = parse_repository(repository)?;
    let token = GitHubConfig::from_env()
        .token
        .ok_or(GitHubError::AuthenticationFailed)?;

    let listing = fetch_commits(&token, &owner, &repo, branch, per_page)
        .await
        .context("Failed to fetch commits from GitHub")?;

    println!("{}", serde_json::to_string_pretty(&listing)?);
    Ok(())
}
