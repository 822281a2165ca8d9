//! Diff command: preview what sync would change

use std::path::Path;

use colored::Colorize;
use mirror_core::{DiffSet, DiffStatus};

use super::{console_reconciler, load_config};
use crate::error::Result;

/// Print the actions a sync would take, without applying them.
pub async fn run_diff(config: &Path, json: bool) -> Result<()> {
    if json {
        let set = load_config(config)?.reconciler().diff().await?;
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }

    let set = console_reconciler(config)?.diff().await?;
    print_plan(&set);
    Ok(())
}

fn print_plan(set: &DiffSet) {
    if set.is_empty() {
        println!("{} Bucket is in sync.", "OK".green().bold());
        return;
    }

    for entry in set {
        let status = match entry.status {
            DiffStatus::Upload => "upload".green(),
            DiffStatus::Delete => "delete".red(),
        };
        println!("   {status} {} ({})", entry.path.cyan(), entry.reason);
    }
    println!();
    println!("Run {} to apply.", "mirror <CONFIG> sync".cyan());
}
