//! Machine-authored entry exclusion.

use super::types::{Author, CommentNode, CommentUser, SimplifiedComment};
use crate::pull_request::PullRequestRef;

/// GraphQL `__typename` of app/bot actors.
pub const BOT_AUTHOR_TYPE: &str = "Bot";

/// Whether an entry by `author` should be retained. A missing author
/// (deleted account) is kept.
pub fn should_retain(author: Option<&Author>) -> bool {
    author.map_or(true, |a| a.kind != BOT_AUTHOR_TYPE)
}

/// Filter bot-authored nodes and normalize the survivors, preserving order.
pub fn simplify_comments<'a>(
    nodes: impl IntoIterator<Item = &'a CommentNode>,
    pr: &PullRequestRef,
) -> Vec<SimplifiedComment> {
    let issue_url = pr.issue_url();
    nodes
        .into_iter()
        .filter(|node| should_retain(node.author.as_ref()))
        .map(|node| {
            let author = node.author.clone().unwrap_or_else(Author::ghost);
            SimplifiedComment {
                id: node.id.clone(),
                body: node.body.clone(),
                org: pr.owner.clone(),
                repo: pr.repo.clone(),
                issue_url: issue_url.clone(),
                user: CommentUser {
                    login: author.login,
                    kind: author.kind,
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, login: &str, kind: &str) -> CommentNode {
        CommentNode {
            id: id.to_string(),
            body: format!("body of {id}"),
            author: Some(Author::new(login, kind)),
        }
    }

    #[test]
    fn test_should_retain() {
        assert!(should_retain(Some(&Author::new("alice", "User"))));
        assert!(should_retain(Some(&Author::new("acme-org", "Organization"))));
        assert!(!should_retain(Some(&Author::new("dependabot", "Bot"))));
        assert!(should_retain(None));
    }

    #[test]
    fn test_type_match_is_exact() {
        // Login names that merely look like bots are kept.
        assert!(should_retain(Some(&Author::new("ci-bot", "User"))));
        assert!(should_retain(Some(&Author::new("x", "bot"))));
    }

    #[test]
    fn test_simplify_filters_and_normalizes() {
        let pr = PullRequestRef::new("acme", "widgets", 3);
        let nodes = vec![
            node("1", "alice", "User"),
            node("2", "github-actions", "Bot"),
            node("3", "bob", "User"),
        ];

        let simplified = simplify_comments(&nodes, &pr);
        let ids: Vec<_> = simplified.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(simplified[0].org, "acme");
        assert_eq!(simplified[0].repo, "widgets");
        assert_eq!(simplified[0].issue_url, "https://github.com/acme/widgets/issues/3");
        assert_eq!(simplified[1].user.login, "bob");
    }

    #[test]
    fn test_simplify_ghost_author() {
        let pr = PullRequestRef::new("acme", "widgets", 3);
        let nodes = vec![CommentNode {
            id: "9".into(),
            body: "old".into(),
            author: None,
        }];
        let simplified = simplify_comments(&nodes, &pr);
        assert_eq!(simplified[0].user.login, "ghost");
        assert_eq!(simplified[0].user.kind, "User");
    }
}
