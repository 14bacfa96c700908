use std::{
    io::Read,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::fs;

use reelscript_core::{
    GenerationRequest, GenerationState, MAX_DURATION_MINUTES, MIN_DURATION_MINUTES, Provider,
    ProviderSelection, ScriptGenerator, ScriptSegment, ScriptSession, Settings,
    format_script_plain, format_script_readable, load_script, save_script,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Cloud,
    Local,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Cloud => Provider::Cloud,
            CliProvider::Local => Provider::Local,
        }
    }
}

#[derive(Parser)]
#[command(name = "reelscript")]
#[command(about = "Generate narration and B-roll video scripts with a cloud or local AI model")]
struct Cli {
    /// Video title
    #[arg(short, long, required_unless_present = "from_json")]
    title: Option<String>,

    /// High-level outline of the video
    #[arg(short, long, conflicts_with = "outline_file")]
    outline: Option<String>,

    /// Read the outline from a file ("-" reads stdin)
    #[arg(long)]
    outline_file: Option<PathBuf>,

    /// Target duration in minutes
    #[arg(
        short,
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(MIN_DURATION_MINUTES as i64..=MAX_DURATION_MINUTES as i64)
    )]
    duration: u32,

    /// AI provider for script generation
    #[arg(short, long, default_value = "cloud")]
    provider: CliProvider,

    /// Local server URL (defaults to the configured Ollama endpoint)
    #[arg(short, long)]
    url: Option<String>,

    /// Write the plain-text script to this file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write the script segments as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the plain-text export instead of the readable rendering
    #[arg(long)]
    plain: bool,

    /// Render a script saved with --json instead of generating one
    #[arg(long, conflicts_with_all = ["outline", "outline_file"])]
    from_json: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,reelscript_core=debug"
    } else {
        "warn"
    };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn read_outline(cli: &Cli) -> Result<String> {
    match (&cli.outline, &cli.outline_file) {
        (Some(outline), _) => Ok(outline.clone()),
        (None, Some(path)) if path == Path::new("-") => {
            let mut outline = String::new();
            std::io::stdin()
                .read_to_string(&mut outline)
                .context("failed to read outline from stdin")?;
            Ok(outline)
        }
        (None, Some(path)) => fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read outline from {}", path.display())),
        (None, None) => anyhow::bail!("an outline is required: pass --outline or --outline-file"),
    }
}

async fn export(cli: &Cli, script: &[ScriptSegment]) -> Result<()> {
    if let Some(path) = &cli.output {
        fs::write(path, format_script_plain(script)).await?;
        println!("{} {}", style("Saved:").dim(), style(path.display()).cyan());
    }
    if let Some(path) = &cli.json {
        save_script(script, path).await?;
        println!("{} {}", style("Saved:").dim(), style(path.display()).cyan());
    }
    Ok(())
}

fn print_script(cli: &Cli, script: &[ScriptSegment]) {
    println!("{}", style("─".repeat(60)).dim());
    if cli.plain {
        println!("{}", format_script_plain(script));
    } else {
        println!("{}", format_script_readable(cli.title.as_deref(), script));
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    println!(
        "\n{}  {}\n",
        style("reelscript").cyan().bold(),
        style("Video Script Writer").dim()
    );

    if let Some(path) = &cli.from_json {
        let script = load_script(path).await?;
        println!(
            "{} Loaded {} segments {}",
            style("✓").green().bold(),
            script.len(),
            style(format!("({})", path.display())).dim()
        );
        export(&cli, &script).await?;
        print_script(&cli, &script);
        return Ok(());
    }

    let settings = Settings::load().await?;
    tracing::debug!(?settings, "Loaded settings");
    let provider: Provider = cli.provider.into();

    // Validate inputs and configuration early
    let outline = read_outline(&cli).await?;
    let title = cli.title.clone().unwrap_or_default();
    let request = match GenerationRequest::new(title, outline, cli.duration) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(2);
        }
    };

    if provider == Provider::Cloud && settings.cloud.api_key().is_none() {
        eprintln!(
            "{} Cloud AI API key is not configured. Set GEMINI_API_KEY or use --provider local.",
            style("Error:").red().bold()
        );
        std::process::exit(1);
    }

    let selection = match provider {
        Provider::Cloud => ProviderSelection::cloud(),
        Provider::Local => {
            ProviderSelection::local(cli.url.clone().unwrap_or_else(|| settings.local.url.clone()))
        }
    };

    let target = match provider {
        Provider::Cloud => settings.cloud.model.clone(),
        Provider::Local => selection.endpoint().unwrap_or_default().to_string(),
    };

    let mut session = ScriptSession::new(ScriptGenerator::new(settings));

    let step_start = Instant::now();
    let spinner = create_spinner(&format!(
        "Writing a {}-minute script with {}...",
        request.duration_minutes(),
        provider.label()
    ));

    match session.generate(&request, &selection).await {
        GenerationState::Ready(script) => {
            spinner.finish_with_message(format!(
                "{} Script generated: {} segments ({}) {}",
                style("✓").green().bold(),
                script.len(),
                style(&target).dim(),
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            ));
            let script = script.clone();
            export(&cli, &script).await?;
            print_script(&cli, &script);
            Ok(())
        }
        GenerationState::Failed(message) => {
            spinner.finish_with_message(format!(
                "{} Generation failed {}",
                style("✗").red().bold(),
                style(format!("[{}]", format_duration(step_start.elapsed()))).dim()
            ));
            eprintln!("\n{} {}", style("Error:").red().bold(), message);
            std::process::exit(1);
        }
        GenerationState::Idle | GenerationState::InFlight => {
            anyhow::bail!("generation finished without a result")
        }
    }
}
