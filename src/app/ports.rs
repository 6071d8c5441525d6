use async_trait::async_trait;

/// Text-completion service used by the AI-assisted enrichment strategy.
/// Input is a rendered prompt; output is the raw completion text.
#[async_trait]
pub trait CompletionPort: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, String>;
}

/// Web search/retrieval service used by the OEM lookup strategy.
/// Input is a query string; output is a short descriptive text snippet,
/// possibly empty when the source has nothing for the query.
#[async_trait]
pub trait WebLookupPort: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<String, String>;
}
