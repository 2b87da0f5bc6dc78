//! Git operations and repository context.

pub mod commit;
pub mod diff;
pub mod remote;
pub mod repository;

pub use commit::CommitSummary;
pub use diff::{FileChange, StagedChanges};
pub use remote::GitHubRepo;
pub use repository::GitRepository;

/// Number of hex characters to show in abbreviated commit hashes.
pub const SHORT_HASH_LEN: usize = 8;
