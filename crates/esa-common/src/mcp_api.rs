use serde::{Deserialize, Serialize};

use crate::esa::UpstreamPost;

/// A post in the relay's "MCP format".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizedDocument {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub updated_at: String,
    pub created_at: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub url: String,
}

impl From<UpstreamPost> for NormalizedDocument {
    fn from(post: UpstreamPost) -> Self {
        Self {
            id: post.number,
            title: post.name,
            content: post.body_md.unwrap_or_default(),
            updated_at: post.updated_at,
            created_at: post.created_at,
            tags: post.tags.unwrap_or_default(),
            category: post.category,
            url: post.url,
        }
    }
}

/// Maps upstream posts one-to-one, preserving order.
pub fn normalize(posts: Vec<UpstreamPost>) -> Vec<NormalizedDocument> {
    posts.into_iter().map(NormalizedDocument::from).collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Case-insensitive substring matched against title and content.
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: usize,
    pub results: Vec<NormalizedDocument>,
}

impl From<Vec<NormalizedDocument>> for SearchResponse {
    fn from(results: Vec<NormalizedDocument>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(number: i64, name: &str, body: &str) -> UpstreamPost {
        UpstreamPost {
            number,
            name: name.to_string(),
            body_md: Some(body.to_string()),
            updated_at: format!("u{number}"),
            created_at: format!("c{number}"),
            tags: Some(vec!["ops".to_string(), "guide".to_string()]),
            category: Some("dev/infra".to_string()),
            url: format!("https://docs.esa.io/posts/{number}"),
        }
    }

    #[test]
    fn normalize_renames_fields() {
        let docs = normalize(vec![post(42, "Deploy Guide", "steps")]);
        assert_eq!(
            docs,
            vec![NormalizedDocument {
                id: 42,
                title: "Deploy Guide".to_string(),
                content: "steps".to_string(),
                updated_at: "u42".to_string(),
                created_at: "c42".to_string(),
                tags: vec!["ops".to_string(), "guide".to_string()],
                category: Some("dev/infra".to_string()),
                url: "https://docs.esa.io/posts/42".to_string(),
            }]
        );
    }

    #[test]
    fn normalize_preserves_order_and_length() {
        let posts = vec![post(3, "c", ""), post(1, "a", ""), post(2, "b", "")];
        let ids: Vec<i64> = normalize(posts).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(normalize(Vec::new()).is_empty());
    }

    #[test]
    fn missing_category_serializes_as_null() {
        let mut p = post(1, "a", "");
        p.category = None;
        let value = serde_json::to_value(NormalizedDocument::from(p)).unwrap();
        assert!(value["category"].is_null());
        assert_eq!(value["id"], 1);
    }

    #[test]
    fn null_body_and_tags_become_empty() {
        let mut p = post(5, "Untitled", "");
        p.body_md = None;
        p.tags = None;
        let doc = NormalizedDocument::from(p);
        assert_eq!(doc.content, "");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn search_response_count_matches_results() {
        let response = SearchResponse::from(normalize(vec![post(1, "a", ""), post(2, "b", "")]));
        assert_eq!(response.count, response.results.len());
        assert_eq!(response.count, 2);
    }
}
