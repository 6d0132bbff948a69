use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use course_manifest::config::Settings;
use course_manifest::models::{Course, ValidationPolicy};
use course_manifest::{api, outline, Error, Loader};

#[derive(Parser)]
#[command(name = "course-manifest")]
#[command(about = "Validate and serve JSON course manifests")]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a manifest and its lesson files
    Validate {
        manifest: PathBuf,

        /// Directory lesson content paths are relative to
        #[arg(short, long)]
        base: Option<PathBuf>,

        /// strict, pedantic or advisory
        #[arg(short, long, value_parser = parse_policy)]
        policy: Option<ValidationPolicy>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the course outline with lesson content status
    Tree {
        manifest: PathBuf,

        #[arg(short, long)]
        base: Option<PathBuf>,
    },
    /// Parse a manifest and write it back out as JSON
    Export { manifest: PathBuf },
    /// Serve the course over a read-only HTTP API
    Serve {
        manifest: PathBuf,

        #[arg(short, long)]
        base: Option<PathBuf>,

        /// Port for HTTP API
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },
}

fn parse_policy(s: &str) -> Result<ValidationPolicy, String> {
    ValidationPolicy::from_str(s)
        .ok_or_else(|| format!("unknown policy {:?} (expected strict, pedantic or advisory)", s))
}

/// Initialize tracing on stderr so stdout stays clean for reports and exports.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "course_manifest=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn loader(settings: &Settings, base: Option<PathBuf>) -> Loader {
    let loader = Loader::from_settings(settings);
    match base {
        Some(dir) => loader.with_base_dir(dir),
        None => loader,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate {
            manifest,
            base,
            policy,
            json,
        } => {
            let policy = policy.unwrap_or(settings.policy);
            // Load in advisory mode so the full report is available, then judge it.
            let loaded = loader(&settings, base)
                .with_policy(ValidationPolicy::Advisory)
                .load(&manifest)?;
            let report = &loaded.report;

            if json {
                println!("{}", serde_json::to_string_pretty(report)?);
            } else {
                for issue in &report.issues {
                    println!("{:>7}: {}", issue.severity().as_str(), issue);
                }
                println!("{}: {}", manifest.display(), report.summary());
            }

            if report.rejected_by(policy) {
                return Err(Error::Validation {
                    report: report.clone(),
                }
                .into());
            }
        }
        Commands::Tree { manifest, base } => {
            let loaded = loader(&settings, base)
                .with_policy(ValidationPolicy::Advisory)
                .load(&manifest)?;
            print!("{}", outline::render_outline(&loaded));

            let blocked = loaded
                .content
                .iter()
                .filter(|c| !c.status.is_renderable())
                .count();
            if blocked > 0 {
                tracing::warn!("{} lesson(s) cannot be rendered", blocked);
            }

            let errors = loaded.report.errors().count();
            if errors > 0 {
                tracing::warn!(
                    "{} structural error(s); run `validate` for details",
                    errors
                );
            }
        }
        Commands::Export { manifest } => {
            let json = std::fs::read_to_string(&manifest)?;
            let course = Course::from_json(&json)?;
            println!("{}", course.to_json_pretty()?);
        }
        Commands::Serve {
            manifest,
            base,
            port,
        } => {
            let port = port.unwrap_or(settings.port);
            let loaded = loader(&settings, base).load(&manifest)?;
            for issue in &loaded.report.issues {
                tracing::warn!("{}", issue);
            }

            let app = api::create_router(loaded);

            let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
            tracing::info!("Serving course on http://127.0.0.1:{}/api/v1", port);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
