/// A work item reconstructed from the board export, mapped 1:1 to a
/// GitHub issue. Built once by the model builder and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Original card ID from the source system, used to correlate comments.
    pub source_id: String,
    pub title: String,
    pub body: String,
    /// Containing list's name first (if any), then attached label names.
    pub labels: Vec<String>,
    /// The source system's short display number; canonical upload order.
    pub ordinal: i64,
    /// Sorted ascending by epoch.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub author_name: String,
    /// Human-readable timestamp, reproduced verbatim in the issue comment.
    pub date: String,
    /// Epoch millis parsed from `date`; sort key within a card.
    pub epoch: i64,
    pub text: String,
}

impl Comment {
    /// The exact body posted to the tracker.
    pub fn composed_body(&self) -> String {
        format!("{} ({}):\n{}", self.author_name, self.date, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composed_body_format() {
        let comment = Comment {
            author_name: "Al".into(),
            date: "2021-01-01T00:00:00Z".into(),
            epoch: 1609459200000,
            text: "ack".into(),
        };
        assert_eq!(comment.composed_body(), "Al (2021-01-01T00:00:00Z):\nack");
    }

    #[test]
    fn composed_body_keeps_multiline_text() {
        let comment = Comment {
            author_name: "Bea".into(),
            date: "2021-02-03T04:05:06Z".into(),
            epoch: 0,
            text: "line one\nline two".into(),
        };
        assert_eq!(
            comment.composed_body(),
            "Bea (2021-02-03T04:05:06Z):\nline one\nline two"
        );
    }
}
