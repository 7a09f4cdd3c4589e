mod cli;

use std::process::ExitCode;
use std::sync::PoisonError;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use clipgallery::config::LoaderConfig;
use clipgallery::gallery::{Gallery, Node};
use clipgallery::window::TimeWindow;
use clipgallery::{logging, ClipLoader};
use cli::{Cli, Commands, LoadArgs};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init(logging::DEFAULT_FILTER);
    let cli = Cli::parse();
    let mut cfg = LoaderConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Window { hours } => {
            let hours = hours.unwrap_or(cfg.lookback_hours);
            let w = TimeWindow::trailing_hours(Utc::now(), hours).with_context(|| format!("lookback of {hours} hours is out of range"))?;
            println!("start={}", w.start_param());
            println!("end={}", w.end_param());
            Ok(ExitCode::SUCCESS)
        }
        Commands::Fetch { load, json } => {
            let (gallery, ok) = load_gallery(&mut cfg, &load).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&gallery)?);
            } else {
                for node in gallery.children() {
                    match node {
                        Node::Thumbnail(t) => println!("thumbnail {:>3}  {}x{}  {}  -> {}", t.id, t.size.width, t.size.height, t.src, t.embed_url),
                        Node::Player(p) => println!("player    {:>3}  {}", p.id, p.src),
                    }
                }
            }
            Ok(exit_code(ok))
        }
        Commands::Html { load, out, expand } => {
            let (mut gallery, ok) = load_gallery(&mut cfg, &load).await?;
            if let Some(n) = expand {
                let id = gallery.children().get(n).map(Node::id).with_context(|| format!("no node at index {n}"))?;
                gallery.click(id)?;
            }
            let page = render_page(&gallery);
            match out {
                Some(path) => tokio::fs::write(&path, page).await.with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{page}"),
            }
            Ok(exit_code(ok))
        }
    }
}

async fn load_gallery(cfg: &mut LoaderConfig, args: &LoadArgs) -> Result<(Gallery, bool)> {
    args.apply(cfg);
    cfg.validate()?;
    let loader = ClipLoader::new(cfg.clone()).context("failed to build clip loader")?;
    let shared = loader.new_gallery();
    let report = loader.fetch_videos(&shared).await;
    tracing::debug!(?report, "load finished");
    let gallery = shared.lock().unwrap_or_else(PoisonError::into_inner).clone();
    Ok((gallery, report.success))
}

fn render_page(gallery: &Gallery) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Clips</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        gallery.to_html()
    )
}

fn exit_code(ok: bool) -> ExitCode { if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE } }
