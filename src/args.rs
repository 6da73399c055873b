use clap::{Parser, Subcommand, ValueEnum};
use page_audit::Severity;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-audit")]
#[command(about = "Scores site pages for on-page SEO problems")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Site URL (overrides the configuration file)
    #[arg(long, global = true)]
    pub site_url: Option<String>,

    /// Built site directory to read pages from (overrides the configuration file)
    #[arg(long, global = true)]
    pub site_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a local HTML file without storing anything
    Evaluate {
        /// HTML file to score
        file: PathBuf,

        /// Site path the file is served at
        #[arg(long, default_value = "/")]
        path: String,
    },

    /// Fetch, score and store a page now
    Scan {
        /// Site path, e.g. /printer-rental/
        path: String,
    },

    /// Stored scan of a page, rescanned if stale
    Get {
        /// Site path, e.g. /printer-rental/
        path: String,

        /// Maximum age in seconds of a reusable stored scan
        #[arg(long, conflicts_with = "interactive")]
        max_age_secs: Option<u64>,

        /// Use the short interactive max age (one hour)
        #[arg(long)]
        interactive: bool,
    },

    /// Scan every listed page that has no fresh stored scan
    Bulk {
        /// Sitemap XML file listing the pages
        #[arg(long)]
        sitemap: Option<PathBuf>,

        /// Maximum number of pages to scan
        #[arg(short, long)]
        limit: Option<usize>,

        /// Additional site paths
        paths: Vec<String>,
    },

    /// Stored pages scoring below a threshold, worst first
    Issues {
        /// Only pages with an issue of this severity
        #[arg(short, long, value_enum)]
        severity: Option<SeverityArg>,

        /// Report pages scoring below this
        #[arg(short, long, default_value_t = 80)]
        threshold: u8,

        /// Maximum number of pages reported
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print site totals (pages, average score, issues per severity) instead
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeverityArg {
    Critical,
    Warning,
    Minor,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Critical => Severity::Critical,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Minor => Severity::Minor,
        }
    }
}
