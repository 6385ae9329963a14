//! # Sitemap Resolver
//!
//! Given a site's root URL, produce the definitive list of content-page URLs
//! reachable through the site's sitemap hierarchy, with defined fallback when
//! no valid sitemap exists.
//!
//! Resolution is sequential and depth-first: the root sitemap is fetched,
//! nested sitemap references (entries ending in `.xml`) are traversed
//! recursively, and final URLs are collected in first-seen order. Every fetch
//! failure degrades to an empty result at the point of failure, so the public
//! surface never returns an error: an unreachable or sitemap-less site
//! resolves to a list containing only the normalized root URL.

mod fetcher;
mod normalize;
mod tree;

pub use fetcher::{HttpSitemapFetcher, SitemapFetcher, parse_locations};
pub use normalize::normalize_url;
pub use tree::build_tree;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use tracing::{info, instrument};

/// Reserved key under which a branch's directly-collected final URLs appear
/// in the JSON tree dump.
pub const FINAL_URLS_KEY: &str = "_final_urls";

/// One node of the sitemap hierarchy.
///
/// A sitemap document containing only content-page URLs becomes a `Leaf`;
/// a sitemap index becomes a `Branch` whose children are keyed by the nested
/// sitemap URL, with any final URLs found at the same level kept alongside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapTree {
    /// Final URLs of a sitemap with no nested sitemap references.
    Leaf(Vec<String>),
    /// Nested sitemaps, in document order, plus final URLs collected
    /// directly at this level (if any).
    Branch {
        children: Vec<(String, SitemapTree)>,
        final_urls: Option<Vec<String>>,
    },
}

impl SitemapTree {
    /// The shape a sitemap that yielded nothing collapses to: a branch with
    /// a single entry mapping the sitemap URL to an empty leaf. Preserved
    /// rather than dropped so dead ends remain visible in tree dumps.
    pub fn empty_branch(sitemap_url: &str) -> Self {
        SitemapTree::Branch {
            children: vec![(sitemap_url.to_string(), SitemapTree::Leaf(Vec::new()))],
            final_urls: None,
        }
    }

    /// Total count of final URLs anywhere in the tree.
    pub fn final_url_count(&self) -> usize {
        match self {
            SitemapTree::Leaf(urls) => urls.len(),
            SitemapTree::Branch {
                children,
                final_urls,
            } => {
                let direct = final_urls.as_ref().map_or(0, Vec::len);
                direct
                    + children
                        .iter()
                        .map(|(_, child)| child.final_url_count())
                        .sum::<usize>()
            }
        }
    }
}

// The JSON form mirrors the diagnostic dump consumers expect: a leaf is an
// array of URLs, a branch an object keyed by nested sitemap URL with the
// level's own URLs under "_final_urls".
impl Serialize for SitemapTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SitemapTree::Leaf(urls) => {
                let mut seq = serializer.serialize_seq(Some(urls.len()))?;
                for url in urls {
                    seq.serialize_element(url)?;
                }
                seq.end()
            }
            SitemapTree::Branch {
                children,
                final_urls,
            } => {
                let len = children.len() + usize::from(final_urls.is_some());
                let mut map = serializer.serialize_map(Some(len))?;
                for (url, child) in children {
                    map.serialize_entry(url, child)?;
                }
                if let Some(urls) = final_urls {
                    map.serialize_entry(FINAL_URLS_KEY, urls)?;
                }
                map.end()
            }
        }
    }
}

/// Order in which a branch's own final URLs and its nested subtrees are
/// visited while flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Final URLs at a level before its nested sitemaps.
    #[default]
    FinalsFirst,
    /// Nested sitemaps before the level's own final URLs.
    NestedFirst,
}

/// Sitemap resolver over a pluggable fetcher.
#[derive(Debug, Clone)]
pub struct SitemapResolver<F> {
    fetcher: F,
    order: TraversalOrder,
}

impl Default for SitemapResolver<HttpSitemapFetcher> {
    fn default() -> Self {
        Self::new(HttpSitemapFetcher::new())
    }
}

impl<F: SitemapFetcher> SitemapResolver<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            order: TraversalOrder::default(),
        }
    }

    pub fn with_order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    /// Resolve a site URL to its flattened list of final URLs.
    ///
    /// The input is normalized first ([`normalize_url`]) and the normalized
    /// root is always the first element of the result, regardless of what
    /// the sitemap traversal finds. Never fails; a site without a usable
    /// sitemap resolves to just the root.
    #[instrument(skip(self))]
    pub async fn resolve(&self, site_url: &str) -> Vec<String> {
        self.collect(normalize_url(site_url)).await
    }

    /// Resolve without normalizing the root first.
    ///
    /// Callers probing host variants the normalizer would rewrite (the
    /// retry-without-`www` policy) use this to keep the root verbatim. A root
    /// that is itself a sitemap URL resolves to that sitemap's contents only;
    /// it is not seeded into the result.
    #[instrument(skip(self))]
    pub async fn resolve_exact(&self, root_url: &str) -> Vec<String> {
        self.collect(root_url.trim().to_string()).await
    }

    /// Build the sitemap tree for a site URL, for diagnostics and dumps.
    pub async fn tree(&self, site_url: &str) -> SitemapTree {
        let root = normalize_url(site_url);
        build_tree(&self.fetcher, &sitemap_url_for(&root)).await
    }

    async fn collect(&self, root: String) -> Vec<String> {
        let sitemap_url = sitemap_url_for(&root);
        let tree = build_tree(&self.fetcher, &sitemap_url).await;

        // Seed the root as the first final URL unless it is a sitemap
        // itself; sitemap URLs never belong in the output.
        let mut finals = if root.ends_with(".xml") {
            Vec::new()
        } else {
            vec![root]
        };
        walk(&tree, self.order, &mut finals);
        info!("Resolved {} final URLs from {}", finals.len(), sitemap_url);
        finals
    }
}

fn sitemap_url_for(root: &str) -> String {
    if root.ends_with("/sitemap.xml") {
        root.to_string()
    } else {
        format!("{}/sitemap.xml", root.trim_end_matches('/'))
    }
}

/// Depth-first accumulation of final URLs. Leaf entries are defensively
/// filtered against `.xml` suffixes; by construction none should carry one.
fn walk(tree: &SitemapTree, order: TraversalOrder, out: &mut Vec<String>) {
    match tree {
        SitemapTree::Leaf(urls) => {
            out.extend(urls.iter().filter(|u| !u.ends_with(".xml")).cloned());
        }
        SitemapTree::Branch {
            children,
            final_urls,
        } => {
            let append_finals = |out: &mut Vec<String>| {
                if let Some(urls) = final_urls {
                    out.extend(urls.iter().cloned());
                }
            };

            match order {
                TraversalOrder::FinalsFirst => {
                    append_finals(out);
                    for (_, child) in children {
                        walk(child, order, out);
                    }
                }
                TraversalOrder::NestedFirst => {
                    for (_, child) in children {
                        walk(child, order, out);
                    }
                    append_finals(out);
                }
            }
        }
    }
}
