//! Helpers shared by the mirror-core test suites

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use mirror_core::{Event, Observer, Side};

/// Observer recording every event as a compact line
#[derive(Default)]
pub struct EventLog {
    lines: Mutex<Vec<String>>,
}

impl EventLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Observer for EventLog {
    fn notify(&self, event: &Event<'_>) {
        let line = match event {
            Event::ScanStarted(Side::Local) => "scan local".to_string(),
            Event::ScanStarted(Side::Remote) => "scan remote".to_string(),
            Event::Directory(index) => format!("directory {}", index.len()),
            Event::Bucket(index) => format!("bucket {}", index.len()),
            Event::Diff(set) => format!("diff {}", set.len()),
            Event::Remove { path } => format!("remove {path}"),
            Event::Upload {
                path,
                content_type,
                size,
            } => format!("upload {path} {content_type} {size}"),
            Event::Download { path } => format!("download {path}"),
        };
        self.lines.lock().unwrap().push(line);
    }
}
