mod test_helpers;

use spin_server::notifications::{DispatchError, NOTIFICATION_MESSAGES};
use test_helpers::*;

#[tokio::test]
async fn test_dispatch_isolates_endpoint_failures() {
    let setup = TestServerSetup::new().await;
    let accepting = PushEndpoint::spawn(PushBehaviour::Accept);
    let rejecting = PushEndpoint::spawn(PushBehaviour::RejectTokens(vec!["token-carol".to_string()]));
    let unreachable = "http://127.0.0.1:1/push";

    for token in [
        create_test_token("alice", &accepting.url),
        create_test_token("bob", &accepting.url),
        create_test_token("carol", &rejecting.url),
        create_test_token("dave", unreachable),
    ] {
        setup.notification_repository.save_token(&token).await.unwrap();
    }

    let summary = setup.dispatcher.run().await.unwrap();

    assert!(summary.success);
    assert_eq!(summary.sent, 2);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.results.len(), 3);

    let accepted = summary
        .results
        .iter()
        .find(|r| r.url == accepting.url)
        .unwrap();
    assert!(accepted.success);
    assert_eq!(accepted.count, 2);

    let rejected = summary
        .results
        .iter()
        .find(|r| r.url == rejecting.url)
        .unwrap();
    assert!(!rejected.success);
    assert_eq!(rejected.deactivated, vec!["token-carol".to_string()]);

    let dead = summary.results.iter().find(|r| r.url == unreachable).unwrap();
    assert!(!dead.success);
    assert!(dead.error.is_some());

    // One batched request per endpoint
    let payloads = accepting.payloads();
    assert_eq!(payloads.len(), 1);
    let mut tokens: Vec<&str> = payloads[0]["tokens"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t.as_str().unwrap())
        .collect();
    tokens.sort();
    assert_eq!(tokens, vec!["token-alice", "token-bob"]);
    assert_eq!(payloads[0]["targetUrl"], "https://www.spinon.xyz");
    assert!(payloads[0]["notificationId"].is_string());
    let title = payloads[0]["title"].as_str().unwrap();
    assert!(NOTIFICATION_MESSAGES.iter().any(|m| m.title == title));

    let active: Vec<String> = setup
        .notification_repository
        .active_tokens()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.user_id)
        .collect();
    assert_eq!(active, vec!["alice", "bob", "dave"]);

    let history = setup.notification_repository.recent_history(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].total_sent, 2);
    assert_eq!(history[0].total_failed, 2);
    assert_eq!(history[0].results.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_dispatch_without_tokens_skips_history() {
    let setup = TestServerSetup::new().await;

    let summary = setup.dispatcher.run().await.unwrap();

    assert_eq!(summary.sent, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.message.as_deref(), Some("No active tokens found"));
    assert!(
        setup
            .notification_repository
            .recent_history(10)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_dispatch_fails_when_tokens_cannot_be_read() {
    let setup = TestServerSetup::new().await;
    setup.drop_table("notification_tokens").await;

    let result = setup.dispatcher.run().await;
    assert!(matches!(result, Err(DispatchError::TokenFetch(_))));
}

#[tokio::test]
async fn test_history_survives_logging_failure() {
    let setup = TestServerSetup::new().await;
    let accepting = PushEndpoint::spawn(PushBehaviour::Accept);
    setup
        .notification_repository
        .save_token(&create_test_token("frank", &accepting.url))
        .await
        .unwrap();
    setup.drop_table("notification_history").await;

    let summary = setup.dispatcher.run().await.unwrap();
    assert_eq!(summary.sent, 1);
    assert_eq!(accepting.payloads().len(), 1);
}
