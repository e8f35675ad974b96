//! Rate-limited, dependency-ordered upload scheduling.
//!
//! `plan` turns the sorted card model into absolute slot offsets against a
//! single pacing cursor, reserving one slot per remote call. `run` drives
//! those slots against a [`Tracker`]: every card gets its own task measured
//! from a shared start instant, so a slow response on one card never stalls
//! the others, but a card's comments are gated on its own issue-creation
//! response because the issue number is a hard data dependency.

use std::cmp;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::model::card::Card;
use crate::providers::Tracker;

#[derive(Debug, Error)]
pub enum UploadError {
    /// Terminal: without the issue, the card's comments cannot be created,
    /// and skipping silently would be undetectable data loss.
    #[error("Failed to create issue for card #{ordinal} ({title}): {source}")]
    IssueCreation {
        ordinal: i64,
        title: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("Upload task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Upload lifecycle of a single card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardState {
    Pending,
    IssueRequested,
    IssueCreated,
    CommentsInFlight,
    Done,
    Failed,
}

impl CardState {
    fn advance(&mut self, next: CardState, ordinal: i64) {
        debug!(ordinal, from = ?self, to = ?next, "card state");
        *self = next;
    }
}

/// A card with its precomputed call slots, relative to the run start.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledCard {
    pub card: Card,
    pub issue_offset: Duration,
    /// One slot per comment, in timestamp order.
    pub comment_offsets: Vec<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub entries: Vec<ScheduledCard>,
    pub delay: Duration,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug)]
pub struct CommentFailure {
    pub card_ordinal: i64,
    pub author_name: String,
    pub date: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub issues_created: usize,
    pub comments_created: usize,
    pub comment_failures: Vec<CommentFailure>,
}

/// Compute call slots for every card past the resume marker.
///
/// A single cursor paces the whole run: each card reserves one slot for its
/// issue plus one per comment, all `delay` apart. When `resume` is given,
/// cards at or below that ordinal are skipped and the cursor restarts at
/// zero, so a resumed run is slot-identical to a fresh run over the
/// remaining cards.
pub fn plan(cards: Vec<Card>, delay: Duration, resume: Option<i64>) -> Schedule {
    let mut entries = Vec::new();
    let mut cursor = Duration::ZERO;

    for card in cards {
        if let Some(marker) = resume {
            if card.ordinal <= marker {
                debug!(ordinal = card.ordinal, marker, "skipping already-migrated card");
                continue;
            }
        }
        let issue_offset = cursor;
        let comment_offsets = (1..=card.comments.len() as u32)
            .map(|k| issue_offset + delay * k)
            .collect();
        cursor += delay * (1 + card.comments.len() as u32);
        entries.push(ScheduledCard {
            card,
            issue_offset,
            comment_offsets,
        });
    }

    Schedule { entries, delay }
}

/// Drive the schedule against the tracker.
///
/// Issue-creation failure halts the whole run; comment failures are logged,
/// recorded in the report, and do not block siblings or other cards.
pub async fn run(
    schedule: Schedule,
    tracker: Arc<dyn Tracker>,
) -> Result<MigrationReport, UploadError> {
    let start = Instant::now();
    let delay = schedule.delay;
    let mut tasks = JoinSet::new();

    for entry in schedule.entries {
        let tracker = Arc::clone(&tracker);
        tasks.spawn(upload_card(entry, start, delay, tracker));
    }

    let mut report = MigrationReport::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(outcome)) => {
                report.issues_created += 1;
                report.comments_created += outcome.comments_created;
                report.comment_failures.extend(outcome.comment_failures);
            }
            Ok(Err(err)) => {
                tasks.abort_all();
                while tasks.join_next().await.is_some() {}
                return Err(err);
            }
            Err(join_err) if join_err.is_cancelled() => {}
            Err(join_err) => {
                tasks.abort_all();
                while tasks.join_next().await.is_some() {}
                return Err(UploadError::Task(join_err));
            }
        }
    }
    Ok(report)
}

#[derive(Debug, Default)]
struct CardOutcome {
    comments_created: usize,
    comment_failures: Vec<CommentFailure>,
}

async fn upload_card(
    entry: ScheduledCard,
    start: Instant,
    delay: Duration,
    tracker: Arc<dyn Tracker>,
) -> Result<CardOutcome, UploadError> {
    let ScheduledCard {
        card,
        issue_offset,
        comment_offsets,
    } = entry;
    let mut state = CardState::Pending;

    sleep_until(start + issue_offset).await;
    state.advance(CardState::IssueRequested, card.ordinal);
    let issue_requested_at = Instant::now();

    let issue_number = match tracker
        .create_issue(&card.title, &card.body, &card.labels)
        .await
    {
        Ok(number) => number,
        Err(source) => {
            state.advance(CardState::Failed, card.ordinal);
            return Err(UploadError::IssueCreation {
                ordinal: card.ordinal,
                title: card.title,
                source,
            });
        }
    };
    state.advance(CardState::IssueCreated, card.ordinal);
    info!(ordinal = card.ordinal, issue = issue_number, "issue created");

    let mut outcome = CardOutcome::default();
    if card.comments.is_empty() {
        state.advance(CardState::Done, card.ordinal);
        return Ok(outcome);
    }

    state.advance(CardState::CommentsInFlight, card.ordinal);
    let mut prev_call = issue_requested_at;
    for (comment, offset) in card.comments.iter().zip(comment_offsets) {
        // When the issue response arrives past the precomputed slot, the
        // slot is already in the past; re-space from the previous call so
        // the minimum delay between calls still holds.
        let due = cmp::max(start + offset, prev_call + delay);
        sleep_until(due).await;
        prev_call = Instant::now();
        match tracker.create_comment(issue_number, comment).await {
            Ok(()) => outcome.comments_created += 1,
            Err(err) => {
                warn!(
                    ordinal = card.ordinal,
                    author = %comment.author_name,
                    date = %comment.date,
                    error = %format!("{err:#}"),
                    "comment creation failed"
                );
                outcome.comment_failures.push(CommentFailure {
                    card_ordinal: card.ordinal,
                    author_name: comment.author_name.clone(),
                    date: comment.date.clone(),
                    error: format!("{err:#}"),
                });
            }
        }
    }

    state.advance(CardState::Done, card.ordinal);
    Ok(outcome)
}
