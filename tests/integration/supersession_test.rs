//! End-to-end supersession against a stub index node.

use std::sync::Arc;
use std::time::Duration;

use esgf_publish_client::{PublisherClient, PublisherConfig};
use esgf_supersede::search::SearchError;
use esgf_supersede::{
    HttpSearchClient, Outcome, PublicationRecord, SearchConfig, SupersedeError, Supersession,
};

use crate::common::{SearchReply, StubIndex, SEARCH_PATH, UPDATE_PATH};

const RECORD: &str = r#"[
    {"type": "File", "id": "X.v2.tas.nc|N", "dataset_id": "X.v2|N"},
    {"type": "Dataset", "master_id": "X", "data_node": "N", "version": 2}
]"#;

fn supersession(stub: &StubIndex, timeout: Duration) -> Supersession {
    let search = HttpSearchClient::new(
        SearchConfig::new(stub.index_node()).with_timeout(timeout),
    )
    .unwrap();
    let publisher = PublisherClient::new(
        PublisherConfig::new(stub.index_node())
            .with_service_url(stub.service_url())
            .with_timeout(timeout),
    )
    .unwrap();

    Supersession::new(Arc::new(search), Arc::new(publisher))
}

fn record() -> PublicationRecord {
    PublicationRecord::from_json(RECORD).unwrap()
}

#[tokio::test]
async fn test_prior_version_retired_in_both_cores() {
    let stub = StubIndex::start(SearchReply::found("X.v1|N"), 200).await;

    let outcome = supersession(&stub, Duration::from_secs(5))
        .process(&record())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Superseded {
            prior_id: "X.v1|N".to_string()
        }
    );

    let requests = stub.requests().await;
    assert_eq!(requests.len(), 3);

    let search = &requests[0];
    assert_eq!(search.method, "GET");
    assert!(search.target.starts_with(SEARCH_PATH));
    assert!(search.target.contains("latest=true"));
    assert!(search.target.contains("distrib=false"));
    assert!(search.target.contains("data_node=N"));
    assert!(search.target.contains("master_id=X"));

    let datasets = &requests[1];
    assert_eq!(datasets.method, "POST");
    assert_eq!(datasets.target, UPDATE_PATH);
    assert!(datasets.body.contains(r#"core="datasets""#));
    assert!(datasets.body.contains("<query>id=X.v1|N</query>"));

    let files = &requests[2];
    assert_eq!(files.target, UPDATE_PATH);
    assert!(files.body.contains(r#"core="files""#));
    assert!(files.body.contains("<query>dataset_id=X.v1|N</query>"));
    assert!(files.body.contains("<value>false</value>"));
}

#[tokio::test]
async fn test_first_version_only_searches() {
    let stub = StubIndex::start(SearchReply::not_found(), 200).await;

    let outcome = supersession(&stub, Duration::from_secs(5))
        .process(&record())
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::FirstVersion { .. }));
    assert_eq!(stub.requests().await.len(), 1);
}

#[tokio::test]
async fn test_search_failure_status_is_reported() {
    let stub = StubIndex::start(SearchReply::status(503), 200).await;

    let err = supersession(&stub, Duration::from_secs(5))
        .process(&record())
        .await
        .unwrap_err();

    match &err {
        SupersedeError::Search(SearchError::Status { status, .. }) => {
            assert_eq!(status.as_u16(), 503);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("503"));
    assert_eq!(stub.requests().await.len(), 1);
}

#[tokio::test]
async fn test_rejected_updates_are_both_attempted() {
    let stub = StubIndex::start(SearchReply::found("X.v1|N"), 500).await;

    let err = supersession(&stub, Duration::from_secs(5))
        .process(&record())
        .await
        .unwrap_err();

    match err {
        SupersedeError::Submission(failures) => assert_eq!(failures.len(), 2),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(stub.requests().await.len(), 3);
}

#[tokio::test]
async fn test_search_timeout() {
    let stub = StubIndex::start(SearchReply::Hang, 200).await;

    let err = supersession(&stub, Duration::from_millis(200))
        .process(&record())
        .await
        .unwrap_err();

    match err {
        SupersedeError::Search(SearchError::Http(e)) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}
