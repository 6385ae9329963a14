//! Processor configuration

/// Configuration for chunking text.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    /// Maximum UTF-8 byte length of a single chunk.
    pub max_chunk_bytes: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunk_bytes: 36_000,
        }
    }
}

/// Configuration for the processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Options for chunking.
    pub chunk_options: ChunkOptions,

    /// Dimensions of the embedding vectors.
    pub embedding_dimensions: usize,

    /// Maximum concurrent embedding requests per page.
    pub embed_concurrency: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            chunk_options: ChunkOptions::default(),
            embedding_dimensions: 768,
            embed_concurrency: 5,
        }
    }
}

/// Builder for [`ProcessorConfig`].
#[derive(Debug, Default)]
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    /// Set the chunk options.
    pub fn chunk_options(mut self, chunk_options: ChunkOptions) -> Self {
        self.config.chunk_options = chunk_options;
        self
    }

    /// Set the maximum chunk size in bytes.
    pub fn max_chunk_bytes(mut self, max_chunk_bytes: usize) -> Self {
        self.config.chunk_options.max_chunk_bytes = max_chunk_bytes;
        self
    }

    /// Set the embedding dimensions.
    pub fn embedding_dimensions(mut self, embedding_dimensions: usize) -> Self {
        self.config.embedding_dimensions = embedding_dimensions;
        self
    }

    /// Set the embedding concurrency limit.
    pub fn embed_concurrency(mut self, embed_concurrency: usize) -> Self {
        self.config.embed_concurrency = embed_concurrency;
        self
    }

    pub fn build(self) -> ProcessorConfig {
        self.config
    }
}

impl ProcessorConfig {
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_ingest_profile() {
        let config = ProcessorConfig::default();
        assert_eq!(config.chunk_options.max_chunk_bytes, 36_000);
        assert_eq!(config.embedding_dimensions, 768);
        assert_eq!(config.embed_concurrency, 5);
    }

    #[test]
    fn test_builder() {
        let config = ProcessorConfig::builder()
            .max_chunk_bytes(1_000)
            .embedding_dimensions(384)
            .embed_concurrency(2)
            .build();

        assert_eq!(config.chunk_options.max_chunk_bytes, 1_000);
        assert_eq!(config.embedding_dimensions, 384);
        assert_eq!(config.embed_concurrency, 2);
    }
}
