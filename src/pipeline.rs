//! # Ingestion pipeline
//!
//! End-to-end site ingestion: resolve the sitemap to a list of page URLs,
//! scrape each page, chunk and embed its text, and replace the page's rows
//! in the chunk index. Pages that yield no text are skipped, never fatal.

use rig::{completion::CompletionModel, embeddings::EmbeddingModel};
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::crawler::PageScraper;
use crate::error::Result;
use crate::index::Database;
use crate::model::Client;
use crate::processor::{ProcessorConfig, process_page};
use crate::resolver::{SitemapFetcher, SitemapResolver};

/// Per-page progress update: the page URL and the number of chunks indexed
/// for it (zero means the page was skipped).
pub type PageProgress = (String, usize);

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Pages whose chunks were written to the index.
    pub pages_ingested: usize,

    /// Pages skipped because they yielded no text.
    pub pages_skipped: usize,

    /// Total chunks written across all pages.
    pub chunks_indexed: usize,

    /// The resolved page URLs, in ingestion order.
    pub urls: Vec<String>,
}

/// Drop the first `www.` from a URL, if present.
///
/// Used when a resolved site yields nothing beyond its root: some hosts only
/// serve their sitemap on the bare domain.
pub fn without_www(url: &str) -> Option<String> {
    url.contains("www.").then(|| url.replacen("www.", "", 1))
}

/// Ingest a whole site into the chunk index.
///
/// The site URL is resolved through its sitemap hierarchy; when resolution
/// finds nothing beyond the root and the root carries a `www.` prefix, the
/// bare-domain variant is probed once before giving up on the sitemap. Each
/// resolved page is then scraped, processed, and written to the index,
/// replacing any rows from a previous run.
#[instrument(skip_all, fields(site_url = site_url))]
pub async fn ingest_site<F, C, E>(
    resolver: &SitemapResolver<F>,
    scraper: &PageScraper,
    client: &Client<C, E>,
    db: &Database,
    processor_config: &ProcessorConfig,
    site_url: &str,
    progress: Option<mpsc::Sender<PageProgress>>,
) -> Result<IngestReport>
where
    F: SitemapFetcher,
    C: CompletionModel + Clone + Send + Sync + 'static,
    E: EmbeddingModel + Clone + Send + Sync + 'static,
{
    let mut urls = resolver.resolve(site_url).await;

    if urls.len() <= 1 {
        if let Some(root) = urls.first() {
            if let Some(bare) = without_www(root) {
                info!("No sitemap under {}, retrying as {}", root, bare);
                let retried = resolver.resolve_exact(&bare).await;
                if retried.len() > urls.len() {
                    urls = retried;
                }
            }
        }
    }

    let mut report = IngestReport {
        urls: urls.clone(),
        ..IngestReport::default()
    };

    for url in &urls {
        let text = scraper.fetch_text(url).await;
        if text.trim().is_empty() {
            warn!("No text extracted from {}, skipping", url);
            report.pages_skipped += 1;
            if let Some(tx) = &progress {
                let _ = tx.send((url.clone(), 0)).await;
            }
            continue;
        }

        let chunks = process_page(client, url, &text, processor_config).await?;
        let inserted = db.replace_chunks(url, &chunks).await?;

        report.pages_ingested += 1;
        report.chunks_indexed += inserted;
        if let Some(tx) = &progress {
            let _ = tx.send((url.clone(), inserted)).await;
        }
    }

    info!(
        "Ingested {} pages ({} chunks), skipped {}",
        report.pages_ingested, report.chunks_indexed, report.pages_skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::CrawlerConfig;
    use crate::model::mock_model::{MockCompletionModel, MockEmbeddingModel};
    use crate::resolver::test_support::StubFetcher;

    fn test_client() -> Client<MockCompletionModel, MockEmbeddingModel> {
        Client::new(MockCompletionModel::new(), MockEmbeddingModel::new(768))
    }

    fn test_scraper() -> PageScraper {
        PageScraper::new(CrawlerConfig::builder().render_fallback(false).build())
    }

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("test.db");
        let db = Database::new_from_path(path.to_str().expect("utf-8 path"))
            .await
            .expect("open test database");
        (dir, db)
    }

    #[test]
    fn test_without_www() {
        assert_eq!(
            without_www("https://www.example.com"),
            Some("https://example.com".to_string())
        );
        assert_eq!(without_www("https://example.com"), None);
    }

    #[tokio::test]
    async fn test_ingest_scrapes_and_indexes_resolved_pages() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html><body><p>Hello world. This is a page.</p></body></html>")
            .create_async()
            .await;
        let page_url = format!("{}/page", server.url());

        // The root itself is unresolvable, so only the sitemap page yields text.
        let fetcher = StubFetcher::new([(
            "https://www.unreachable.invalid/sitemap.xml",
            vec![page_url.as_str()],
        )]);
        let resolver = SitemapResolver::new(fetcher);

        let (_dir, db) = test_db().await;
        let report = ingest_site(
            &resolver,
            &test_scraper(),
            &test_client(),
            &db,
            &ProcessorConfig::default(),
            "unreachable.invalid",
            None,
        )
        .await
        .expect("ingest succeeds");

        assert_eq!(report.urls, vec!["https://www.unreachable.invalid", page_url.as_str()]);
        assert_eq!(report.pages_ingested, 1);
        assert_eq!(report.pages_skipped, 1);
        assert_eq!(report.chunks_indexed, 1);
        assert_eq!(
            db.count_chunks_for_url(&page_url).await.expect("count"),
            1
        );
    }

    #[tokio::test]
    async fn test_ingest_retries_without_www_when_sitemap_missing() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html><body><p>Bare domain content.</p></body></html>")
            .create_async()
            .await;
        let page_url = format!("{}/page", server.url());

        // Only the bare-domain sitemap exists.
        let fetcher = StubFetcher::new([(
            "https://unreachable.invalid/sitemap.xml",
            vec![page_url.as_str()],
        )]);
        let resolver = SitemapResolver::new(fetcher);

        let (_dir, db) = test_db().await;
        let report = ingest_site(
            &resolver,
            &test_scraper(),
            &test_client(),
            &db,
            &ProcessorConfig::default(),
            "unreachable.invalid",
            None,
        )
        .await
        .expect("ingest succeeds");

        assert_eq!(report.urls, vec!["https://unreachable.invalid", page_url.as_str()]);
        assert_eq!(report.pages_ingested, 1);
    }

    #[tokio::test]
    async fn test_ingest_reports_progress_per_page() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html><body><p>Progress page.</p></body></html>")
            .create_async()
            .await;
        let page_url = format!("{}/page", server.url());

        let fetcher = StubFetcher::new([(
            "https://www.unreachable.invalid/sitemap.xml",
            vec![page_url.as_str()],
        )]);
        let resolver = SitemapResolver::new(fetcher);

        let (_dir, db) = test_db().await;
        let (tx, mut rx) = mpsc::channel(16);
        ingest_site(
            &resolver,
            &test_scraper(),
            &test_client(),
            &db,
            &ProcessorConfig::default(),
            "unreachable.invalid",
            Some(tx),
        )
        .await
        .expect("ingest succeeds");

        let mut updates = Vec::new();
        while let Some(update) = rx.recv().await {
            updates.push(update);
        }
        assert_eq!(
            updates,
            vec![
                ("https://www.unreachable.invalid".to_string(), 0),
                (page_url, 1),
            ]
        );
    }
}
