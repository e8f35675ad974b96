use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::Tracker;
use crate::model::card::Comment;

const API_BASE: &str = "https://api.github.com";

pub struct GitHubTracker {
    owner: String,
    repository: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl GitHubTracker {
    pub fn new(owner: String, repository: String, username: String, password: String) -> Self {
        Self {
            owner,
            repository,
            username,
            password,
            client: reqwest::Client::new(),
        }
    }

    fn repo_url(&self, tail: &str) -> String {
        format!("{API_BASE}/repos/{}/{}/{tail}", self.owner, self.repository)
    }
}

#[derive(Deserialize)]
struct CreatedIssue {
    number: u64,
}

#[async_trait]
impl Tracker for GitHubTracker {
    async fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<u64> {
        let resp = self
            .client
            .post(self.repo_url("issues"))
            .basic_auth(&self.username, Some(&self.password))
            // GitHub rejects requests without a User-Agent.
            .header(reqwest::header::USER_AGENT, "trello2github")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&json!({ "title": title, "body": body, "labels": labels }))
            .send()
            .await
            .context("GitHub create-issue request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub create-issue returned {status}: {text}");
        }

        let issue: CreatedIssue = resp
            .json()
            .await
            .context("Failed to parse GitHub create-issue response")?;
        Ok(issue.number)
    }

    async fn create_comment(&self, issue_number: u64, comment: &Comment) -> Result<()> {
        let resp = self
            .client
            .post(self.repo_url(&format!("issues/{issue_number}/comments")))
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::USER_AGENT, "trello2github")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&json!({ "body": comment.composed_body() }))
            .send()
            .await
            .context("GitHub create-comment request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("GitHub create-comment returned {status}: {text}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_url_joins_owner_and_repository() {
        let tracker = GitHubTracker::new(
            "octo".into(),
            "widgets".into(),
            "user".into(),
            "secret".into(),
        );
        assert_eq!(
            tracker.repo_url("issues"),
            "https://api.github.com/repos/octo/widgets/issues"
        );
        assert_eq!(
            tracker.repo_url("issues/42/comments"),
            "https://api.github.com/repos/octo/widgets/issues/42/comments"
        );
    }
}
