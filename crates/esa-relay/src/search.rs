use esa_common::mcp_api::NormalizedDocument;

/// Keeps documents whose title or content contains `query`, ignoring case.
/// Relative order is preserved and no ranking is applied.
pub fn filter_documents(documents: Vec<NormalizedDocument>, query: &str) -> Vec<NormalizedDocument> {
    let needle = query.to_lowercase();
    documents
        .into_iter()
        .filter(|doc| {
            doc.title.to_lowercase().contains(&needle) || doc.content.to_lowercase().contains(&needle)
        })
        .collect()
}
