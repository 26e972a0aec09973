//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::Section;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use interlink_core::{PipelineConfig, PipelineResult, ProgressReporter, rank, run_pipeline};
use interlink_shared::{
    AppConfig, HttpTransport, InterlinkError, TransportOptions, init_config, load_config,
    load_config_from,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// interlink — add relevant internal links to a blog post.
#[derive(Parser)]
#[command(
    name = "interlink",
    version,
    about = "Rank a site's pages against an article and weave links to the best matches into it.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.interlink/interlink.toml.
    #[arg(long, global = true, env = "INTERLINK_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Insert links to the most relevant sitemap pages into an article.
    Link {
        /// Sitemap or sitemap index URL.
        sitemap_url: String,

        /// URL of the article to add links to.
        article_url: String,

        /// Number of links to insert (defaults to config `num_links`).
        #[arg(short = 'n', long)]
        links: Option<usize>,

        /// Seed for reproducible link wording.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the resulting HTML to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Emit HTML and statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show how sitemap pages rank against an article, without editing it.
    Rank {
        /// Sitemap or sitemap index URL.
        sitemap_url: String,

        /// URL of the article to rank against.
        article_url: String,

        /// Show at most this many candidates.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Emit the ranking as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// clean for generated HTML.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "interlink=info",
        1 => "interlink=debug",
        _ => "interlink=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Link {
            sitemap_url,
            article_url,
            links,
            seed,
            out,
            json,
        } => {
            let opts = LinkOptions {
                links,
                seed,
                out: out.as_deref(),
                json,
            };
            cmd_link(config_path, &sitemap_url, &article_url, &opts).await
        }
        Command::Rank {
            sitemap_url,
            article_url,
            limit,
            json,
        } => cmd_rank(config_path, &sitemap_url, &article_url, limit, json).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => load_config_from(p)?,
        None => load_config()?,
    };
    Ok(config)
}

/// What to check when a run fails, by failure kind.
fn remediation(err: &InterlinkError) -> &'static str {
    match err.root() {
        InterlinkError::EmptyIndex { .. } => {
            "The sitemap listed no usable pages. Check that it is a valid sitemap and lists pages other than the article itself."
        }
        InterlinkError::Parse { .. } => {
            "Check that the sitemap URL points at valid sitemap XML, not an HTML page."
        }
        InterlinkError::NoParagraphs => {
            "The article's content area has no <p> paragraphs to place links after. Check the article URL."
        }
        InterlinkError::Validation { .. } | InterlinkError::Config { .. } => {
            "Check the command-line arguments and the config file (`interlink config show`)."
        }
        _ => {
            "Check that both URLs are correct and publicly reachable, and that the sitemap is valid XML."
        }
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

struct LinkOptions<'a> {
    links: Option<usize>,
    seed: Option<u64>,
    out: Option<&'a Path>,
    json: bool,
}

async fn cmd_link(
    config_path: Option<&Path>,
    sitemap_url: &str,
    article_url: &str,
    opts: &LinkOptions<'_>,
) -> Result<()> {
    let config = resolve_config(config_path)?;

    let mut pipeline = PipelineConfig::new(sitemap_url, article_url, &config);
    if let Some(n) = opts.links {
        pipeline.num_links = n;
    }
    pipeline.seed = opts.seed;

    info!(
        sitemap_url,
        article_url,
        num_links = pipeline.num_links,
        "linking article"
    );

    let transport = HttpTransport::new(&TransportOptions::from(&config))?;
    let reporter = CliProgress::new();

    let result = match run_pipeline(&transport, &pipeline, &reporter).await {
        Ok(result) => result,
        Err(e) => {
            let hint = remediation(&e);
            return Err(e).suggestion(hint);
        }
    };

    let output = if opts.json {
        serde_json::to_string_pretty(&result)?
    } else {
        result.html.clone()
    };

    match opts.out {
        Some(path) => std::fs::write(path, &output)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => println!("{output}"),
    }

    if !opts.json {
        print_summary(&result, opts.out);
    }

    Ok(())
}

fn print_summary(result: &PipelineResult, out: Option<&Path>) {
    eprintln!();
    eprintln!("  Links injected successfully!");
    eprintln!("  Links:      {}", result.links_injected);
    eprintln!("  Candidates: {}", result.candidates_analyzed);
    eprintln!("  Words:      {}", result.word_count);
    for (i, c) in result.selected.iter().take(result.links_injected).enumerate() {
        eprintln!("  {:>2}. {:.3}  {}", i + 1, c.score, c.url);
    }
    if let Some(path) = out {
        eprintln!("  Output:     {}", path.display());
    }
    eprintln!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    eprintln!();
}

async fn cmd_rank(
    config_path: Option<&Path>,
    sitemap_url: &str,
    article_url: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let config = resolve_config(config_path)?;
    let pipeline = PipelineConfig::new(sitemap_url, article_url, &config);
    let transport = HttpTransport::new(&TransportOptions::from(&config))?;
    let reporter = CliProgress::new();

    let ranking = match rank(&transport, &pipeline, &reporter).await {
        Ok(ranking) => ranking,
        Err(e) => {
            let hint = remediation(&e);
            return Err(e).suggestion(hint);
        }
    };
    reporter.finish();

    let shown = &ranking.ranked[..limit.unwrap_or(usize::MAX).min(ranking.ranked.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    println!();
    println!("  Article: {}", ranking.article.title);
    println!("  Words:   {}", ranking.article.word_count);
    println!();
    for (i, c) in shown.iter().enumerate() {
        println!("  {:>3}. {:.3}  {:<40}  {}", i + 1, c.score, c.title, c.url);
    }
    println!();
    println!(
        "  {} of {} candidates shown ({:.1}s)",
        shown.len(),
        ranking.ranked.len(),
        ranking.elapsed.as_secs_f64()
    );
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
            );
        }
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn candidates_found(&self, count: usize) {
        self.spinner.println(format!("  Found {count} candidate pages"));
    }

    fn done(&self, _result: &PipelineResult) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_link_command() {
        let cli = Cli::try_parse_from([
            "interlink",
            "link",
            "https://x.test/sitemap.xml",
            "https://x.test/blog/post",
            "-n",
            "3",
            "--seed",
            "9",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Link {
                sitemap_url,
                links,
                seed,
                json,
                ..
            } => {
                assert_eq!(sitemap_url, "https://x.test/sitemap.xml");
                assert_eq!(links, Some(3));
                assert_eq!(seed, Some(9));
                assert!(!json);
            }
            _ => panic!("expected link command"),
        }
    }

    #[test]
    fn remediation_follows_root_cause() {
        let wrapped = InterlinkError::article(
            "https://x.test/a",
            InterlinkError::status("https://x.test/a", 403),
        );
        assert!(remediation(&wrapped).contains("publicly reachable"));
        assert!(remediation(&InterlinkError::NoParagraphs).contains("<p>"));
        assert!(
            remediation(&InterlinkError::EmptyIndex {
                url: "https://x.test/sitemap.xml".into()
            })
            .contains("no usable pages")
        );
    }
}
