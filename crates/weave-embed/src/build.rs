//! Batched computation of the embedding cache from a [`ToolRegistry`].

use tracing::{info, warn};
use weave_core::ToolRegistry;
use weave_llm::EmbeddingProvider;

use crate::cache::EmbeddingCache;
use crate::normalize::{is_zero_vector, l2_normalize};

/// Default batch granularity (spec.md §6 `embedding_batch_size`).
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Build the embedding cache for every tool (and every tool's parameters)
/// in `registry`. Batches run sequentially — "the default is sequential
/// batches because vendor rate limits dominate" (spec.md §5) — but a
/// single batch's failure does not abort the run; the affected
/// tools/parameters are simply omitted from the cache (spec.md §4.2).
pub async fn build_embedding_cache(
    registry: &ToolRegistry,
    provider: &dyn EmbeddingProvider,
    batch_size: usize,
) -> EmbeddingCache {
    let batch_size = batch_size.max(1);
    let mut cache = EmbeddingCache::new();

    // --- Producer (tool description) vectors ---
    let tool_names: Vec<&str> = registry.names().collect();
    let desc_texts: Vec<String> = registry.iter().map(|t| t.description_embedding_text()).collect();

    let desc_vectors = embed_in_batches(provider, &desc_texts, batch_size, "descriptions").await;
    let mut embedded = 0usize;
    for (name, vector) in tool_names.iter().zip(desc_vectors.into_iter()) {
        if let Some(mut vector) = vector {
            if is_zero_vector(&vector) || !l2_normalize(&mut vector) {
                warn!(tool = name, "degenerate (zero) embedding, dropping from producer set");
                continue;
            }
            cache.insert_tool_vector(*name, vector);
            embedded += 1;
        }
    }
    info!(embedded, total = tool_names.len(), "producer embeddings computed");

    // --- Consumer (tool, parameter) vectors ---
    let mut param_texts = Vec::new();
    let mut param_index: Vec<(&str, &str)> = Vec::new();
    for tool in registry.iter() {
        for param_name in tool.parameters.properties.keys() {
            if let Some(text) = tool.parameter_embedding_text(param_name) {
                param_texts.push(text);
                param_index.push((tool.name.as_str(), param_name.as_str()));
            }
        }
    }

    let param_vectors = embed_in_batches(provider, &param_texts, batch_size, "parameters").await;
    let mut param_embedded = 0usize;
    for ((tool, param), vector) in param_index.into_iter().zip(param_vectors.into_iter()) {
        if let Some(mut vector) = vector {
            if is_zero_vector(&vector) || !l2_normalize(&mut vector) {
                warn!(tool, param, "degenerate (zero) embedding, dropping from consumer set");
                continue;
            }
            cache.insert_param_vector(tool, param, vector);
            param_embedded += 1;
        }
    }
    info!(embedded = param_embedded, total = param_texts.len(), "consumer embeddings computed");

    cache
}

/// Embed `texts` in fixed-size sequential batches. A batch whose `Embed`
/// call errors contributes `None` for every text in that batch rather
/// than aborting the whole run.
async fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
    batch_size: usize,
    label: &str,
) -> Vec<Option<Vec<f32>>> {
    let mut results = Vec::with_capacity(texts.len());

    for chunk in texts.chunks(batch_size) {
        match provider.embed(chunk).await {
            Ok(vectors) if vectors.len() == chunk.len() => {
                results.extend(vectors.into_iter().map(Some));
            }
            Ok(vectors) => {
                warn!(
                    label,
                    expected = chunk.len(),
                    got = vectors.len(),
                    "embedding batch returned a mismatched vector count, dropping batch"
                );
                results.extend(std::iter::repeat(None).take(chunk.len()));
            }
            Err(e) => {
                warn!(label, error = %e, batch_len = chunk.len(), "embedding batch failed, skipping");
                results.extend(std::iter::repeat(None).take(chunk.len()));
            }
        }
    }

    results
}
