//! Sync, upload and download command implementations

use std::path::Path;

use colored::Colorize;
use mirror_core::ApplyReport;

use super::console_reconciler;
use crate::error::Result;

/// Make the bucket mirror the local directory.
pub async fn run_sync(config: &Path) -> Result<()> {
    let report = console_reconciler(config)?.sync().await?;
    print_summary(&report, "change");
    Ok(())
}

/// Upload every local file.
pub async fn run_upload(config: &Path) -> Result<()> {
    let report = console_reconciler(config)?.upload_dir().await?;
    print_summary(&report, "upload");
    Ok(())
}

/// Download every key in the bucket.
pub async fn run_download(config: &Path) -> Result<()> {
    let report = console_reconciler(config)?.download_dir().await?;
    print_summary(&report, "download");
    Ok(())
}

fn print_summary(report: &ApplyReport, noun: &str) {
    if report.is_empty() {
        println!("{} Nothing to do.", "OK".green().bold());
    } else {
        println!(
            "{} {} {noun}(s) applied.",
            "OK".green().bold(),
            report.len()
        );
    }
}
