pub mod github;

use anyhow::Result;
use async_trait::async_trait;

use crate::model::card::Comment;

/// The remote issue tracker the migration writes to. The scheduler only
/// knows it is invoking a rate-constrained remote action; authentication
/// and transport live behind this trait.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Create an issue and return its number.
    async fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<u64>;
    /// Create a comment on an existing issue. The posted body is the
    /// comment's composed body.
    async fn create_comment(&self, issue_number: u64, comment: &Comment) -> Result<()>;
}
