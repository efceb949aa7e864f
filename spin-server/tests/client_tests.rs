mod test_helpers;

use spin_server::client::{ClientError, StatsClient};
use spin_types::{LocalTotals, UserIdentity};
use std::time::Duration;
use warp::Filter;
use test_helpers::*;

#[tokio::test]
async fn test_client_sync_and_fetch() {
    let setup = TestServerSetup::new().await;
    let addr = setup.spawn_server();
    let client = StatsClient::new(&format!("http://{}/", addr)).unwrap();

    assert_eq!(client.get_stats("gina").await.unwrap(), None);

    let identity = UserIdentity {
        user_id: "gina".to_string(),
        username: "gina".to_string(),
        avatar_url: String::new(),
    };
    let local = LocalTotals {
        total_spins: 4,
        total_wins: 2,
        total_winnings: 0.0,
        total_points: 35,
    };

    let stats = client.sync(&identity, &local).await.unwrap();
    assert_eq!(stats.total_spins, 4);

    let fetched = client.get_stats("gina").await.unwrap().unwrap();
    assert_eq!(fetched, stats);
}

#[tokio::test]
async fn test_background_report_and_replay() {
    let setup = TestServerSetup::new().await;
    let addr = setup.spawn_server();
    let client = StatsClient::new(&format!("http://{}", addr)).unwrap();
    let outcome = create_test_outcome("100 Points", 100);

    let first = client
        .report_spin_in_background("hank", outcome.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.total_spins, 1);
    assert_eq!(first.total_points, 100);

    let replay = client
        .report_spin_in_background("hank", outcome.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replay, first);

    let history = client.history("hank", Some(5)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].spin_id, outcome.spin_id);
}

#[tokio::test]
async fn test_server_error_is_retryable() {
    let setup = TestServerSetup::new().await;
    let addr = setup.spawn_server();
    setup.drop_table("user_stats").await;
    let client = StatsClient::new(&format!("http://{}", addr)).unwrap();

    let err = client
        .report_spin("ivy", &create_test_outcome("5 Points", 5))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status(status) if status.as_u16() == 503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_background_report_gives_up_quietly() {
    let client = StatsClient::new("http://127.0.0.1:1").unwrap();

    let result = client
        .report_spin_in_background("jack", create_test_outcome("Empty", 0))
        .await
        .unwrap();
    assert!(result.is_none());

    let synced = client
        .sync_in_background(UserIdentity::new("jack"), LocalTotals::default())
        .await
        .unwrap();
    assert!(synced.is_none());
}

#[tokio::test]
async fn test_user_id_with_reserved_characters() {
    let setup = TestServerSetup::new().await;
    let addr = setup.spawn_server();
    let client = StatsClient::new(&format!("http://{}", addr)).unwrap();
    let identity = UserIdentity::new("fid/42?x#y");

    let local = LocalTotals {
        total_spins: 3,
        total_wins: 1,
        total_winnings: 0.0,
        total_points: 20,
    };
    let stats = client.sync(&identity, &local).await.unwrap();
    assert_eq!(stats.total_spins, 3);

    let fetched = client.get_stats("fid/42?x#y").await.unwrap().unwrap();
    assert_eq!(fetched.total_points, 20);

    assert_eq!(client.get_stats("fid").await.unwrap(), None);
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let route = warp::path!("users" / String / "stats").and_then(|_user: String| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok::<_, warp::Rejection>(warp::reply())
    });
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);

    let client =
        StatsClient::with_timeout(&format!("http://{}", addr), Duration::from_millis(100)).unwrap();
    let err = client.get_stats("lena").await.unwrap_err();

    assert!(matches!(&err, ClientError::Request(e) if e.is_timeout()));
    assert!(err.is_retryable());
}
