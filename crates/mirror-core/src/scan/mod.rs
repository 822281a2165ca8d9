//! Scanners producing a [`FileIndex`](crate::FileIndex) for each side

mod local;
mod remote;

pub use local::scan_local;
pub use remote::scan_remote;
