//! Recursive sitemap tree construction

use std::collections::HashSet;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, warn};

use crate::resolver::SitemapTree;
use crate::resolver::fetcher::SitemapFetcher;

/// Build the sitemap tree rooted at `sitemap_url`.
///
/// Each fetched document is partitioned into nested sitemap references
/// (entries ending in `.xml`) and final URLs, preserving document order.
/// Nested sitemaps are traversed depth-first, one at a time. A fetch that
/// yields nothing produces the empty-branch shape
/// `Branch { children: [(url, Leaf([]))], .. }` so the dead end stays visible
/// in diagnostic dumps instead of collapsing away.
///
/// Sitemap URLs already on the current recursion path are not fetched again:
/// a self- or ancestor-referencing sitemap gets the same empty-branch shape,
/// which turns a malformed cyclic index into a terminating traversal.
/// Repeated references across sibling branches are still fetched repeatedly;
/// there is no cross-branch memoization.
pub async fn build_tree<F: SitemapFetcher>(fetcher: &F, sitemap_url: &str) -> SitemapTree {
    let mut path = HashSet::new();
    build_node(fetcher, sitemap_url.to_string(), &mut path).await
}

fn build_node<'a, F: SitemapFetcher>(
    fetcher: &'a F,
    sitemap_url: String,
    path: &'a mut HashSet<String>,
) -> BoxFuture<'a, SitemapTree> {
    async move {
        if !path.insert(sitemap_url.clone()) {
            warn!("Cyclic sitemap reference at {}, treating as empty", sitemap_url);
            return SitemapTree::empty_branch(&sitemap_url);
        }

        let locations = fetcher.fetch_locations(&sitemap_url).await;

        let tree = if locations.is_empty() {
            debug!("Sitemap {} yielded no locations", sitemap_url);
            SitemapTree::empty_branch(&sitemap_url)
        } else {
            let (nested, finals): (Vec<String>, Vec<String>) = locations
                .into_iter()
                .partition(|loc| loc.ends_with(".xml"));

            let mut children = Vec::with_capacity(nested.len());
            for child_url in nested {
                let subtree = build_node(fetcher, child_url.clone(), path).await;
                children.push((child_url, subtree));
            }

            match (children.is_empty(), finals.is_empty()) {
                // Mixed level: nested results keyed by URL plus the final
                // URLs collected directly here.
                (false, false) => SitemapTree::Branch {
                    children,
                    final_urls: Some(finals),
                },
                // Only content pages: a plain leaf.
                (true, false) => SitemapTree::Leaf(finals),
                // Only nested sitemaps.
                (false, true) => SitemapTree::Branch {
                    children,
                    final_urls: None,
                },
                // Unreachable while locations is non-empty, but keep the
                // empty-branch fallback shape anyway.
                (true, true) => SitemapTree::empty_branch(&sitemap_url),
            }
        };

        path.remove(&sitemap_url);
        tree
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::test_support::StubFetcher;

    #[tokio::test]
    async fn test_leaf_only_sitemap() {
        let fetcher = StubFetcher::new([(
            "https://www.x.com/sitemap.xml",
            vec!["https://www.x.com/a", "https://www.x.com/b"],
        )]);

        let tree = build_tree(&fetcher, "https://www.x.com/sitemap.xml").await;
        assert_eq!(
            tree,
            SitemapTree::Leaf(vec![
                "https://www.x.com/a".to_string(),
                "https://www.x.com/b".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn test_empty_sitemap_keeps_diagnostic_branch() {
        let fetcher = StubFetcher::empty();
        let tree = build_tree(&fetcher, "https://www.x.com/sitemap.xml").await;
        assert_eq!(tree, SitemapTree::empty_branch("https://www.x.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_mixed_level_collects_finals_and_recurses() {
        let fetcher = StubFetcher::new([
            (
                "https://x/sitemap.xml",
                vec!["https://x/a.xml", "https://x/b"],
            ),
            ("https://x/a.xml", vec!["https://x/p1", "https://x/p2"]),
        ]);

        let tree = build_tree(&fetcher, "https://x/sitemap.xml").await;
        match tree {
            SitemapTree::Branch {
                children,
                final_urls,
            } => {
                assert_eq!(final_urls, Some(vec!["https://x/b".to_string()]));
                assert_eq!(children.len(), 1);
                assert_eq!(children[0].0, "https://x/a.xml");
                assert_eq!(
                    children[0].1,
                    SitemapTree::Leaf(vec![
                        "https://x/p1".to_string(),
                        "https://x/p2".to_string()
                    ])
                );
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_index_only_sitemap() {
        let fetcher = StubFetcher::new([
            ("https://x/sitemap.xml", vec!["https://x/a.xml", "https://x/b.xml"]),
            ("https://x/a.xml", vec!["https://x/1"]),
            ("https://x/b.xml", vec!["https://x/2"]),
        ]);

        let tree = build_tree(&fetcher, "https://x/sitemap.xml").await;
        match tree {
            SitemapTree::Branch {
                children,
                final_urls: None,
            } => {
                let keys: Vec<&str> = children.iter().map(|(k, _)| k.as_str()).collect();
                assert_eq!(keys, vec!["https://x/a.xml", "https://x/b.xml"]);
            }
            other => panic!("expected index-only branch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_self_referencing_sitemap_terminates() {
        let fetcher = StubFetcher::new([(
            "https://x/sitemap.xml",
            vec!["https://x/sitemap.xml", "https://x/page"],
        )]);

        let tree = build_tree(&fetcher, "https://x/sitemap.xml").await;
        match tree {
            SitemapTree::Branch {
                children,
                final_urls,
            } => {
                assert_eq!(final_urls, Some(vec!["https://x/page".to_string()]));
                // The revisit collapses to the empty-branch shape.
                assert_eq!(
                    children,
                    vec![(
                        "https://x/sitemap.xml".to_string(),
                        SitemapTree::empty_branch("https://x/sitemap.xml")
                    )]
                );
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ancestor_cycle_terminates() {
        let fetcher = StubFetcher::new([
            ("https://x/root.xml", vec!["https://x/child.xml"]),
            ("https://x/child.xml", vec!["https://x/root.xml", "https://x/p"]),
        ]);

        let tree = build_tree(&fetcher, "https://x/root.xml").await;
        match tree {
            SitemapTree::Branch { children, .. } => {
                let (_, child) = &children[0];
                match child {
                    SitemapTree::Branch {
                        children: grandchildren,
                        final_urls,
                    } => {
                        assert_eq!(final_urls, &Some(vec!["https://x/p".to_string()]));
                        assert_eq!(
                            grandchildren[0].1,
                            SitemapTree::empty_branch("https://x/root.xml")
                        );
                    }
                    other => panic!("expected nested branch, got {other:?}"),
                }
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_repeated_sibling_reference_is_fetched_twice() {
        let fetcher = StubFetcher::new([
            (
                "https://x/sitemap.xml",
                vec!["https://x/a.xml", "https://x/a.xml"],
            ),
            ("https://x/a.xml", vec!["https://x/p"]),
        ]);

        let tree = build_tree(&fetcher, "https://x/sitemap.xml").await;
        match tree {
            SitemapTree::Branch { children, .. } => {
                // Siblings are off the recursion path by the time the second
                // reference is reached, so both resolve fully.
                assert_eq!(children.len(), 2);
                for (_, child) in &children {
                    assert_eq!(child, &SitemapTree::Leaf(vec!["https://x/p".to_string()]));
                }
                assert_eq!(fetcher.fetch_count("https://x/a.xml"), 2);
            }
            other => panic!("expected branch, got {other:?}"),
        }
    }
}
