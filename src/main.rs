use clap::Parser;
use page_audit::report::IssueQuery;
use page_audit::{AuditConfig, AuditError, Auditor, FetchError, INTERACTIVE_MAX_AGE};
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let auditor = match Auditor::new(config) {
        Ok(auditor) => auditor,
        Err(e) => {
            ::log::error!("Failed to start auditor: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start_time = std::time::Instant::now();
    let result = run(&auditor, args.command).await;
    auditor.shutdown().await;

    ::log::debug!(
        "Finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ::log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(args: &Args) -> Result<AuditConfig, AuditError> {
    let mut config = match &args.config {
        Some(path) => AuditConfig::read_file(path)?,
        None => {
            let mut config = AuditConfig::default();
            config.apply_env();
            config
        }
    };

    if let Some(site_url) = &args.site_url {
        config.site_url = site_url.clone();
    }
    if let Some(site_root) = &args.site_root {
        config.site_root = Some(site_root.clone());
    }
    config.validate()?;

    ::log::info!("Auditing {}", config.site_url);
    Ok(config)
}

async fn run(auditor: &Auditor, command: Command) -> Result<(), AuditError> {
    match command {
        Command::Evaluate { file, path } => {
            let html = read_input(&file)?;
            print_json(&auditor.evaluate(&html, &path))
        }
        Command::Scan { path } => print_json(&auditor.scan(&path).await?),
        Command::Get {
            path,
            max_age_secs,
            interactive,
        } => {
            let max_age = if interactive {
                Some(INTERACTIVE_MAX_AGE)
            } else {
                max_age_secs.map(Duration::from_secs)
            };
            match auditor.get(&path, max_age).await? {
                Some(cached) => print_json(&cached),
                None => Err(AuditError::NotFound(path)),
            }
        }
        Command::Bulk {
            sitemap,
            limit,
            paths,
        } => {
            let mut all_paths = Vec::new();
            if let Some(sitemap) = sitemap {
                let xml = read_input(&sitemap)?;
                all_paths.extend(page_audit::sitemap::parse_sitemap(
                    &xml,
                    &auditor.config().site_url,
                ));
            }
            all_paths.extend(paths);

            if all_paths.is_empty() {
                return Err(AuditError::Config(
                    "no pages to scan: pass --sitemap or paths".to_string(),
                ));
            }
            print_json(&auditor.bulk_scan(all_paths, limit).await?)
        }
        Command::Issues { summary: true, .. } => print_json(&auditor.summary().await?),
        Command::Issues {
            severity,
            threshold,
            limit,
            summary: false,
        } => {
            let query = IssueQuery {
                threshold,
                severity: severity.map(Into::into),
                limit,
            };
            let pages = auditor.issues(&query).await?;
            ::log::info!("{} pages need attention", pages.len());
            print_json(&pages)
        }
    }
}

fn read_input(file: &Path) -> Result<String, AuditError> {
    std::fs::read_to_string(file).map_err(|e| {
        ::log::error!("Could not read {}", file.display());
        AuditError::Fetch(FetchError::Io(e))
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AuditError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
