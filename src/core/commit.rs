//! Owned commit data handed from the traversal to the renderer.

use git2::{Commit, Oid, Signature, Time};

/// Length of the abbreviated id printed in oneline mode
pub const ONELINE_ABBREV: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub seconds: i64,
    pub offset_minutes: i32,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>, when: Time) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            seconds: when.seconds(),
            offset_minutes: when.offset_minutes(),
        }
    }

    fn from_signature(signature: &Signature<'_>) -> Self {
        Self::new(
            String::from_utf8_lossy(signature.name_bytes()),
            String::from_utf8_lossy(signature.email_bytes()),
            signature.when(),
        )
    }

    pub fn when(&self) -> Time {
        Time::new(self.seconds, self.offset_minutes)
    }
}

/// A commit as the renderer sees it. Lives for one iteration of the render loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: Oid,
    pub parent_ids: Vec<Oid>,
    pub tree_id: Oid,
    pub author: Identity,
    pub committer: Identity,
    /// Full message text
    pub message: String,
    /// First paragraph with line breaks folded into spaces
    pub summary: String,
}

impl CommitRecord {
    pub fn from_commit(commit: &Commit<'_>) -> Self {
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let summary = commit
            .summary_bytes()
            .map(|s| String::from_utf8_lossy(s).into_owned())
            .unwrap_or_default();
        Self {
            id: commit.id(),
            parent_ids: commit.parent_ids().collect(),
            tree_id: commit.tree_id(),
            author: Identity::from_signature(&commit.author()),
            committer: Identity::from_signature(&commit.committer()),
            message,
            summary,
        }
    }

    pub fn parent_count(&self) -> usize {
        self.parent_ids.len()
    }

    /// The id cut down to `len` hex digits
    pub fn abbreviated_id(&self, len: usize) -> String {
        let hex = self.id.to_string();
        hex[..len.min(hex.len())].to_string()
    }

    /// Message lines as shown in full mode. Trailing empty lines are dropped, but an empty
    /// message still shows as one blank line.
    pub fn message_lines(&self) -> Vec<&str> {
        if self.message.is_empty() {
            return vec![""];
        }
        let mut lines: Vec<&str> = self.message.split('\n').collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(message: &str) -> CommitRecord {
        let id = Oid::from_str("abc1234def5678abc1234def5678abc1234def56").unwrap();
        let who = Identity::new("Test User", "test@example.com", Time::new(0, 0));
        CommitRecord {
            id,
            parent_ids: Vec::new(),
            tree_id: Oid::zero(),
            author: who.clone(),
            committer: who,
            message: message.to_string(),
            summary: message.lines().next().unwrap_or("").to_string(),
        }
    }

    #[test]
    fn test_abbreviated_id() {
        let commit = record("Fix bug");
        assert_eq!(commit.abbreviated_id(ONELINE_ABBREV), "abc1234");
        assert_eq!(commit.abbreviated_id(100).len(), 40);
    }

    #[test]
    fn test_message_lines_drop_trailing_empties() {
        assert_eq!(record("Fix bug\n").message_lines(), vec!["Fix bug"]);
        assert_eq!(
            record("Subject\n\nBody line\n\n\n").message_lines(),
            vec!["Subject", "", "Body line"]
        );
    }

    #[test]
    fn test_empty_message_keeps_one_line() {
        assert_eq!(record("").message_lines(), vec![""]);
        assert!(record("\n\n").message_lines().is_empty());
    }
}
