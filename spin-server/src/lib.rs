use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

use crate::config::Config;
use crate::notifications::NotificationDispatcher;
use spin_persistence::StatsReconciler;
use spin_persistence::repositories::NotificationRepository;
use spin_types::{LocalTotals, NotificationToken, SpinOutcome, UserIdentity};

pub mod client;
pub mod config;
pub mod notifications;

#[derive(Deserialize)]
struct HistoryQuery {
    limit: Option<u64>,
}

/// Body of a first-login reconciliation
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncRequest {
    pub username: String,
    pub avatar_url: String,
    pub local: LocalTotals,
}

pub fn create_routes(
    reconciler: Arc<StatsReconciler>,
    dispatcher: Arc<NotificationDispatcher>,
    notification_repository: Arc<NotificationRepository>,
    config: Arc<Config>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let reconciler_filter = warp::any().map({
        let reconciler = reconciler.clone();
        move || reconciler.clone()
    });

    let dispatcher_filter = warp::any().map({
        let dispatcher = dispatcher.clone();
        move || dispatcher.clone()
    });

    let notification_repository_filter = warp::any().map({
        let notification_repository = notification_repository.clone();
        move || notification_repository.clone()
    });

    let config_filter = warp::any().map({
        let config = config.clone();
        move || config.clone()
    });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let user_stats = warp::path!("users" / String / "stats")
        .and(warp::get())
        .and(reconciler_filter.clone())
        .and_then(handle_user_stats_request);

    let sync = warp::path!("users" / String / "sync")
        .and(warp::post())
        .and(warp::body::json::<SyncRequest>())
        .and(reconciler_filter.clone())
        .and_then(handle_sync_request);

    let spins = warp::path!("users" / String / "spins")
        .and(warp::post())
        .and(warp::body::json::<SpinOutcome>())
        .and(reconciler_filter.clone())
        .and_then(handle_spin_report);

    let history = warp::path!("users" / String / "history")
        .and(warp::get())
        .and(warp::query::<HistoryQuery>())
        .and(reconciler_filter.clone())
        .and(config_filter.clone())
        .and_then(handle_history_request);

    let send_notifications = warp::path!("notifications" / "send")
        .and(warp::post())
        .and(warp::header::optional::<String>("authorization"))
        .and(dispatcher_filter.clone())
        .and(config_filter.clone())
        .and_then(handle_send_notifications);

    let register_token = warp::path!("notifications" / "tokens")
        .and(warp::post())
        .and(warp::body::json::<NotificationToken>())
        .and(notification_repository_filter.clone())
        .and_then(handle_register_token);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(user_stats)
        .or(sync)
        .or(spins)
        .or(history)
        .or(send_notifications)
        .or(register_token)
        .with(cors)
        .with(warp::log("spinon"))
}

fn stats_unavailable() -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({
            "error": "Stats service unavailable"
        })),
        StatusCode::SERVICE_UNAVAILABLE,
    )
}

async fn handle_user_stats_request(
    user_id: String,
    reconciler: Arc<StatsReconciler>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match reconciler.get_stats(&user_id).await {
        Some(stats) => Ok(warp::reply::with_status(
            warp::reply::json(&stats),
            StatusCode::OK,
        )),
        None => Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "error": "User not found"
            })),
            StatusCode::NOT_FOUND,
        )),
    }
}

async fn handle_sync_request(
    user_id: String,
    request: SyncRequest,
    reconciler: Arc<StatsReconciler>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let identity = UserIdentity {
        user_id,
        username: request.username,
        avatar_url: request.avatar_url,
    };

    match reconciler
        .merge_local_into_remote(&identity, &request.local)
        .await
    {
        Some(stats) => Ok(warp::reply::with_status(
            warp::reply::json(&stats),
            StatusCode::OK,
        )),
        None => Ok(stats_unavailable()),
    }
}

async fn handle_spin_report(
    user_id: String,
    outcome: SpinOutcome,
    reconciler: Arc<StatsReconciler>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match reconciler.record_spin(&user_id, &outcome).await {
        Some(stats) => Ok(warp::reply::with_status(
            warp::reply::json(&stats),
            StatusCode::OK,
        )),
        None => Ok(stats_unavailable()),
    }
}

async fn handle_history_request(
    user_id: String,
    query: HistoryQuery,
    reconciler: Arc<StatsReconciler>,
    config: Arc<Config>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let limit = query
        .limit
        .unwrap_or(config.history_limit_default)
        .clamp(1, config.history_limit_max.max(1));

    let entries = reconciler.spin_history(&user_id, limit).await;
    Ok(warp::reply::json(&entries))
}

async fn handle_send_notifications(
    auth_header: Option<String>,
    dispatcher: Arc<NotificationDispatcher>,
    config: Arc<Config>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Some(expected) = &config.dispatch_api_key {
        let provided = auth_header
            .as_deref()
            .map(|header| header.strip_prefix("Bearer ").unwrap_or(header));

        if provided != Some(expected.as_str()) {
            return Ok(warp::reply::with_status(
                warp::reply::json(&json!({
                    "success": false,
                    "error": "Unauthorized"
                })),
                StatusCode::UNAUTHORIZED,
            ));
        }
    }

    let (ok, body) = dispatcher.run_to_json().await;
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

async fn handle_register_token(
    token: NotificationToken,
    notification_repository: Arc<NotificationRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if token.user_id.is_empty()
        || token.notification_url.is_empty()
        || token.notification_token.is_empty()
    {
        return Ok(warp::reply::with_status(
            warp::reply::json(&json!({
                "success": false,
                "error": "Missing token fields"
            })),
            StatusCode::BAD_REQUEST,
        ));
    }

    match notification_repository.save_token(&token).await {
        Ok(()) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "success": true })),
            StatusCode::CREATED,
        )),
        Err(e) => {
            tracing::error!("Failed to save notification token for {}: {}", token.user_id, e);
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({
                    "success": false,
                    "error": "Failed to save token"
                })),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}
