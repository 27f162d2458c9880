use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reglens_client::{ApiClient, DEFAULT_BASE_URL};
use reglens_core::ReviewContext;

mod display;
mod review;

#[derive(Parser)]
#[command(
    name = "reglens",
    version,
    about = "Compare regulation revisions and review generated compliance tasks"
)]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "REGLENS_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare two revisions of a regulation and show the detected changes.
    Analyze {
        /// Old revision file.
        old: PathBuf,
        /// New revision file.
        new: PathBuf,
        /// Continue into task generation and the review loop.
        #[arg(long)]
        review: bool,
    },
    /// Document repository operations.
    #[command(subcommand)]
    Docs(DocsCommand),
    /// Compliance task operations.
    #[command(subcommand)]
    Tasks(TasksCommand),
    /// Check backend liveness.
    Health,
}

#[derive(Subcommand)]
enum DocsCommand {
    /// Upload a document into the repository.
    Upload {
        file: PathBuf,
        /// Document title.
        #[arg(long)]
        title: String,
        /// Version or series label.
        #[arg(long)]
        version: String,
    },
    /// List stored documents.
    List,
    /// Show the stored analysis for a document.
    Analyze {
        filename: String,
        /// Continue into task generation and the review loop.
        #[arg(long)]
        review: bool,
    },
}

#[derive(Subcommand)]
enum TasksCommand {
    /// Show the current task list.
    List,
    /// Review pending tasks one at a time.
    Review {
        /// Name recorded on approvals.
        #[arg(long)]
        approved_by: Option<String>,
    },
    /// Download the sign-off report as PDF.
    Export {
        /// Report title passed to the backend.
        #[arg(long, default_value = review::DEFAULT_REPORT_NAME)]
        name: String,
        /// Output path. Defaults to a dated Compliance_Report filename.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("reglens v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let client = ApiClient::new(cli.api_url);

    match cli.command {
        Command::Analyze { old, new, review } => run_analyze(&client, &old, &new, review).await,
        Command::Docs(cmd) => run_docs(&client, cmd).await,
        Command::Tasks(cmd) => run_tasks(&client, cmd).await,
        Command::Health => {
            let health = client.check_health().await?;
            let status = if health.status.is_empty() {
                "up"
            } else {
                health.status.as_str()
            };
            println!("Backend is {status}");
            Ok(())
        }
    }
}

async fn run_analyze(
    client: &ApiClient,
    old: &Path,
    new: &Path,
    start_review: bool,
) -> anyhow::Result<()> {
    let analysis = client.analyze_files(old, new).await?;
    display::print_analysis(&analysis);

    if start_review {
        let ctx = ReviewContext::with_analysis(analysis);
        return review::run(client, &ctx, None).await;
    }
    if analysis.has_changes {
        println!("Run `reglens tasks review` to turn these changes into compliance tasks.");
    }
    Ok(())
}

async fn run_docs(client: &ApiClient, cmd: DocsCommand) -> anyhow::Result<()> {
    match cmd {
        DocsCommand::Upload {
            file,
            title,
            version,
        } => {
            client.upload_document(&file, &title, &version).await?;
            println!("Uploaded {} ({title}, {version})", file.display());
            Ok(())
        }
        DocsCommand::List => {
            let docs = client.list_documents().await?;
            display::print_document_list(&docs);
            Ok(())
        }
        DocsCommand::Analyze {
            filename,
            review: start_review,
        } => {
            let analysis = client.analyze_stored(&filename).await?;
            display::print_analysis(&analysis);
            if start_review {
                let ctx = ReviewContext::with_analysis(analysis);
                review::run(client, &ctx, None).await?;
            }
            Ok(())
        }
    }
}

async fn run_tasks(client: &ApiClient, cmd: TasksCommand) -> anyhow::Result<()> {
    match cmd {
        TasksCommand::List => {
            let board = client.get_tasks().await?;
            display::print_task_list(&board);
            Ok(())
        }
        TasksCommand::Review { approved_by } => {
            let ctx = ReviewContext::new();
            review::run(client, &ctx, approved_by.as_deref()).await
        }
        TasksCommand::Export { name, out } => review::export(client, &name, out).await,
    }
}
