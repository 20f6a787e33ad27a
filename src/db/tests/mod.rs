use super::{CommentRecord, IssueRecord};

mod migrations;

fn issue(number: i64) -> IssueRecord {
    IssueRecord {
        number,
        id: 1000 + number,
        title: format!("Issue {}", number),
        body: Some(format!("Body of issue {}", number)),
        state: "open".to_string(),
        author: Some("octocat".to_string()),
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-02T00:00:00Z".to_string(),
        comment_count: 0,
        fetched_at: 1_700_000_000,
    }
}

fn comment(id: i64, issue_number: i64) -> CommentRecord {
    CommentRecord {
        id,
        issue_number,
        author: Some("hubot".to_string()),
        body: Some(format!("Comment {}", id)),
        created_at: "2024-01-03T00:00:00Z".to_string(),
    }
}
