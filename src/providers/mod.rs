//! Summarization collaborator implementations.

pub mod gemini;
pub mod shared;

pub use shared::{ProviderError, ProviderErrorKind};

/// Capability interface over the hosted model.
///
/// One prompt in, free-form text out; may fail or report an empty response.
/// The session driver and document writer only ever see this trait, so they
/// can be exercised with a stub implementation.
pub trait Summarizer {
    fn generate(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}
