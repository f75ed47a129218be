use anyhow::Result;
use clap::Parser;
use doc_formatter::app::App;
use doc_formatter::models::{Config, ErrorResponse, FormatRequest};
use doc_formatter::Error;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "doc-formatter")]
#[command(about = "Turn a document into paste-ready plain text following your instructions")]
struct CliArgs {
    /// Natural-language formatting instructions.
    #[arg(short, long)]
    instructions: Option<String>,

    /// Document to format: PDF, image, DOCX, or .txt.
    #[arg(short, long, value_name = "PATH", conflicts_with_all = ["text", "stdin"])]
    file: Option<PathBuf>,

    /// Declared MIME type of --file, instead of guessing from the extension.
    #[arg(long, value_name = "TYPE", requires = "file")]
    mime_type: Option<String>,

    /// Document text to format.
    #[arg(short, long, conflicts_with = "stdin")]
    text: Option<String>,

    /// Read the document text from standard input.
    #[arg(long)]
    stdin: bool,

    /// Write the result here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Print `{"formattedContent": ...}` or `{"error", "details"}` JSON.
    #[arg(long)]
    json: bool,

    /// Print the assembled request payload without calling the model.
    #[arg(long)]
    dry_run: bool,
}

async fn build_request(app: &App, args: &CliArgs) -> doc_formatter::Result<FormatRequest> {
    let text = if args.stdin {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        Some(buf)
    } else {
        args.text.clone()
    };

    let file = match &args.file {
        Some(path) => Some(app.load_file(path, args.mime_type.as_deref()).await?),
        None => None,
    };

    Ok(FormatRequest {
        instructions: args.instructions.clone(),
        text,
        file,
    })
}

fn write_output(path: Option<&Path>, content: &str) -> doc_formatter::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            info!("Wrote {} bytes to {}", content.len(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

async fn execute(app: &App, args: &CliArgs) -> doc_formatter::Result<()> {
    let request = build_request(app, args).await?;

    if app.is_dry_run() {
        let payload = app.preview(request).await?;
        return write_output(
            args.output.as_deref(),
            &serde_json::to_string_pretty(&payload)?,
        );
    }

    let response = app.format(request).await?;
    let rendered = if args.json {
        serde_json::to_string_pretty(&response)?
    } else {
        response.formatted_content
    };
    write_output(args.output.as_deref(), &rendered)
}

async fn run(args: &CliArgs) -> doc_formatter::Result<()> {
    let mut config = Config::from_env()?;
    config.dry_run |= args.dry_run;

    let app = App::new(&config)?;
    execute(&app, args).await
}

/// What to print on stdout for a failed run, if anything.
fn render_failure(err: &Error, json: bool) -> doc_formatter::Result<Option<String>> {
    if !json {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string_pretty(&ErrorResponse::from(err))?))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_formatter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    if let Err(e) = run(&args).await {
        error!("Formatting failed: {}", e);
        if let Some(body) = render_failure(&e, args.json)? {
            println!("{}", body);
        }
        std::process::exit(1);
    }
    Ok(())
}
