//! Console progress output

use colored::Colorize;
use mirror_core::{Event, Observer};

/// Prints one line per progress event to stdout.
#[derive(Debug, Default)]
pub struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn notify(&self, event: &Event<'_>) {
        if let Some(line) = render(event) {
            println!("{line}");
        }
    }
}

/// Console line for `event`, if it has one.
pub fn render(event: &Event<'_>) -> Option<String> {
    let line = match event {
        Event::ScanStarted(_) => return None,
        Event::Directory(index) => format!("{} {} files", "Directory:".bold(), index.len()),
        Event::Bucket(index) => format!("{} {} files", "Bucket:".bold(), index.len()),
        Event::Diff(set) => format!("{} {} files", "Differences:".bold(), set.len()),
        Event::Remove { path } => format!("{} {path}", "Removing".red()),
        Event::Upload {
            path,
            content_type,
            size,
        } => format!(
            "{} {path} {} {}kb",
            "Uploading".green(),
            content_type.dimmed(),
            kilobytes(*size)
        ),
        Event::Download { path } => format!("{} {path}", "Downloading".cyan()),
    };
    Some(line)
}

/// Size in kilobytes, rounded to the nearest whole number.
fn kilobytes(size: u64) -> u64 {
    size.saturating_add(512) / 1024
}
