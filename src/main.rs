use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

use refeed::config::Config;
use refeed::feed::{CacheValidators, Fetcher, Transcoder};

/// Atomically write a file using the write-to-temp-then-rename pattern.
/// The destination is never left in a partial state.
fn atomic_write(dst: &Path, content: &[u8]) -> Result<()> {
    use std::time::{SystemTime, UNIX_EPOCH};
    let random_suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", random_suffix));

    let mut temp_file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true) // Fails if the file exists (prevents symlink race)
        .open(&temp_path)
        .with_context(|| {
            format!(
                "Failed to create temporary file '{}': check directory permissions or disk space",
                temp_path.display()
            )
        })?;

    temp_file.write_all(content).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to write to temporary file '{}': disk may be full",
            temp_path.display()
        )
    })?;

    temp_file.sync_all().with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to sync temporary file '{}' to disk",
            temp_path.display()
        )
    })?;

    drop(temp_file);

    // On Windows, rename fails if destination exists, so remove it first
    #[cfg(windows)]
    if dst.exists() {
        std::fs::remove_file(dst).with_context(|| {
            let _ = std::fs::remove_file(&temp_path);
            format!(
                "Failed to remove existing '{}' before atomic replace",
                dst.display()
            )
        })?;
    }

    std::fs::rename(&temp_path, dst).with_context(|| {
        let _ = std::fs::remove_file(&temp_path);
        format!(
            "Failed to rename '{}' to '{}': check permissions",
            temp_path.display(),
            dst.display()
        )
    })?;

    Ok(())
}

#[derive(Parser, Debug)]
#[command(
    name = "refeed",
    version,
    about = "Fetch an RSS/Atom feed and re-emit it as stylesheet-annotated Atom"
)]
struct Args {
    /// Feed URL to fetch
    url: String,

    /// ETag from a previous fetch (sent as If-None-Match)
    #[arg(long, value_name = "TOKEN", default_value = "")]
    etag: String,

    /// Last-Modified value from a previous fetch (sent as If-Modified-Since)
    #[arg(long, value_name = "DATE", default_value = "")]
    last_modified: String,

    /// TOML config file (missing file means defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the Atom document here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the document
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    let fetcher =
        Fetcher::new(config.fetch_settings()).context("Failed to build HTTP client")?;
    let validators = CacheValidators::new(args.last_modified, args.etag);

    let result = fetcher.fetch(&args.url, &validators).await;

    if let Some(etag) = &result.validators.etag {
        eprintln!("ETag: {}", etag);
    }
    if let Some(modified) = &result.validators.last_modified {
        eprintln!("Last-Modified: {}", modified);
    }

    if let Some(error) = result.error {
        anyhow::bail!(error);
    }

    if !result.updated {
        eprintln!("Feed not modified: {}", args.url);
        return Ok(());
    }

    let transcoder = Transcoder::new(config.stylesheet_href.as_str());
    let atom = transcoder
        .to_atom(&args.url, result.parsed_feed.as_ref())
        .ok_or_else(|| anyhow::anyhow!("Failed to convert {} to Atom", args.url))?;

    match &args.output {
        Some(path) => {
            atomic_write(path, atom.as_bytes())?;
            eprintln!("Wrote Atom feed to: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(atom.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .context("Failed to write to stdout")?;
        }
    }

    Ok(())
}
