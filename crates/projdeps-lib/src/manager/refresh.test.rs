use super::*;
use crate::registry::MockRegistryClient;
use crate::testing::leaf;

#[tokio::test]
async fn test_settle_collects_every_outcome() {
    let registry = Arc::new(
        MockRegistryClient::new()
            .with_published(leaf("a", "1"))
            .with_published(leaf("b", "3")),
    );
    let mut refresher = MetadataRefresher::new();

    let scheduled = refresher.schedule(&registry, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(scheduled, 2);

    let mut outcomes = refresher.settle().await;
    outcomes.sort_by(|x, y| x.pkg_id.cmp(&y.pkg_id));
    let versions: Vec<Option<&str>> = outcomes
        .iter()
        .map(|o| o.meta.as_ref().map(|m| m.version.as_str()))
        .collect();
    assert_eq!(versions, vec![Some("1"), Some("3")]);
    assert_eq!(refresher.pending(), 0);
}

#[tokio::test]
async fn test_failed_fetch_yields_empty_outcome() {
    let registry = Arc::new(MockRegistryClient::new().with_failure("broken"));
    let mut refresher = MetadataRefresher::new();

    refresher.schedule(&registry, ["broken".to_string()]);
    let outcomes = refresher.settle().await;

    assert_eq!(
        outcomes,
        vec![RefreshOutcome {
            pkg_id: "broken".to_string(),
            meta: None
        }]
    );
}

#[tokio::test]
async fn test_drain_without_work_is_empty() {
    let mut refresher = MetadataRefresher::new();
    assert!(refresher.drain().is_empty());
    assert!(refresher.settle().await.is_empty());
}
