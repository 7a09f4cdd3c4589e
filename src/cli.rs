use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use clipgallery::config::{FailurePolicy, LoaderConfig, ResponseShape};

/// Fetch recent clips and lay them out as a click-to-play gallery
#[derive(Parser, Debug)]
#[command(name = "clips")]
#[command(about = "Fetch recent stream clips and render them as a gallery", long_about = None)]
pub struct Cli {
    /// Loader config file (defaults to ./clipgallery.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load clips and print the resulting gallery nodes
    Fetch {
        #[command(flatten)]
        load: LoadArgs,
        /// Print the gallery as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load clips and write the gallery as an HTML page
    Html {
        #[command(flatten)]
        load: LoadArgs,
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Click the N-th node (0-based) before writing
        #[arg(long)]
        expand: Option<usize>,
    },
    /// Print the start/end query parameters for the current window
    Window {
        /// Lookback in hours
        #[arg(long)]
        hours: Option<i64>,
    },
}

#[derive(Args, Debug, Default)]
pub struct LoadArgs {
    /// Lookback in hours (168 = one week)
    #[arg(long)]
    pub hours: Option<i64>,
    /// Response shape the endpoint returns
    #[arg(long, value_enum)]
    pub shape: Option<ResponseShape>,
    /// Render nothing if any thumbnail fails to load
    #[arg(long)]
    pub abort_on_failure: bool,
    /// Override the clip endpoint
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Override the embed `parent` domain
    #[arg(long)]
    pub parent: Option<String>,
}

impl LoadArgs {
    pub fn apply(&self, cfg: &mut LoaderConfig) {
        if let Some(h) = self.hours { cfg.lookback_hours = h; }
        if let Some(s) = self.shape { cfg.shape = s; }
        if self.abort_on_failure { cfg.failure_policy = FailurePolicy::AbortAll; }
        if let Some(e) = &self.endpoint { cfg.endpoint = e.clone(); }
        if let Some(p) = &self.parent { cfg.parent_domain = p.clone(); }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_flags() {
        let cli = Cli::try_parse_from(["clips", "fetch", "--hours", "24", "--shape", "urls", "--abort-on-failure", "--json"]).unwrap();
        let Commands::Fetch { load, json } = cli.command else { panic!("expected fetch") };
        assert!(json);
        let mut cfg = LoaderConfig::default();
        load.apply(&mut cfg);
        assert_eq!(cfg.lookback_hours, 24);
        assert_eq!(cfg.shape, ResponseShape::ClipUrls);
        assert_eq!(cfg.failure_policy, FailurePolicy::AbortAll);
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["clips", "html", "--expand", "0", "--config", "site.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert!(matches!(cli.command, Commands::Html { expand: Some(0), .. }));
    }

    #[test]
    fn empty_args_leave_config_alone() {
        let mut cfg = LoaderConfig::default();
        LoadArgs::default().apply(&mut cfg);
        assert_eq!(cfg, LoaderConfig::default());
    }

    #[test]
    fn unknown_shape_is_rejected() {
        assert!(Cli::try_parse_from(["clips", "fetch", "--shape", "videos"]).is_err());
    }
}
