//! Impls - production implementations of the ports.
//!
//! The real posting API client lives outside this crate; `DryRunClient`
//! stands in for it in the CLI.

pub mod dry_run_client;
pub mod fs_media;
pub mod tokio_timer;

pub use self::dry_run_client::DryRunClient;
pub use self::fs_media::FsMediaStore;
pub use self::tokio_timer::TokioTimer;
