#![allow(dead_code)]

use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde_json::{Value, json};
use spin_persistence::StatsReconciler;
use spin_persistence::connection::connect_to_memory_database;
use spin_persistence::repositories::NotificationRepository;
use spin_server::config::Config;
use spin_server::notifications::{DispatcherConfig, NotificationDispatcher};
use spin_types::{NotificationToken, SpinOutcome};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use migration::{Migrator, MigratorTrait};

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        notification_target_url: "https://www.spinon.xyz".to_string(),
        notification_interval_minutes: 1440,
        notification_request_timeout_seconds: 2,
        dispatch_api_key: None,
        history_limit_default: 20,
        history_limit_max: 100,
    }
}

/// Creates a spin outcome for the given label
pub fn create_test_outcome(label: &str, points: i32) -> SpinOutcome {
    SpinOutcome {
        spin_id: Uuid::new_v4(),
        segment_index: 0,
        label: label.to_string(),
        is_win: points > 0,
        amount: 0.0,
        points,
    }
}

pub fn create_test_token(user_id: &str, url: &str) -> NotificationToken {
    NotificationToken {
        user_id: user_id.to_string(),
        fid: 1000,
        notification_url: url.to_string(),
        notification_token: format!("token-{}", user_id),
        is_active: true,
    }
}

/// Everything the stats server needs, backed by an in-memory database
pub struct TestServerSetup {
    pub db: DatabaseConnection,
    pub reconciler: Arc<StatsReconciler>,
    pub notification_repository: Arc<NotificationRepository>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub config: Arc<Config>,
}

impl TestServerSetup {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: Config) -> Self {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let notification_repository = Arc::new(NotificationRepository::new(db.clone()));
        let dispatcher = Arc::new(
            NotificationDispatcher::new(
                notification_repository.clone(),
                DispatcherConfig {
                    target_url: config.notification_target_url.clone(),
                    request_timeout: Duration::from_secs(config.notification_request_timeout_seconds),
                },
            )
            .unwrap(),
        );

        Self {
            reconciler: Arc::new(StatsReconciler::new(db.clone())),
            notification_repository,
            dispatcher,
            config: Arc::new(config),
            db,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = impl warp::Reply + use<>, Error = warp::Rejection> + Clone + use<> {
        spin_server::create_routes(
            self.reconciler.clone(),
            self.dispatcher.clone(),
            self.notification_repository.clone(),
            self.config.clone(),
        )
    }

    /// Serves the routes on a random local port
    pub fn spawn_server(&self) -> SocketAddr {
        let (addr, server) = warp::serve(self.routes()).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        addr
    }

    pub async fn drop_table(&self, table: &str) {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                format!("DROP TABLE {}", table),
            ))
            .await
            .unwrap();
    }
}

#[derive(Clone)]
pub enum PushBehaviour {
    Accept,
    RejectTokens(Vec<String>),
}

/// A fake push provider that records every payload it receives
pub struct PushEndpoint {
    pub url: String,
    pub received: Arc<Mutex<Vec<Value>>>,
}

impl PushEndpoint {
    pub fn spawn(behaviour: PushBehaviour) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let captured = received.clone();

        let route = warp::path("push")
            .and(warp::post())
            .and(warp::body::json::<Value>())
            .map(move |body: Value| {
                captured.lock().unwrap().push(body);
                match &behaviour {
                    PushBehaviour::Accept => warp::reply::with_status(
                        warp::reply::json(&json!({ "result": { "successfulTokens": [] } })),
                        StatusCode::OK,
                    ),
                    PushBehaviour::RejectTokens(tokens) => warp::reply::with_status(
                        warp::reply::json(&json!({ "invalidTokens": tokens })),
                        StatusCode::BAD_REQUEST,
                    ),
                }
            });

        let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        Self {
            url: format!("http://{}/push", addr),
            received,
        }
    }

    pub fn payloads(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}
