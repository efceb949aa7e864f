use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NotificationToken {
    pub user_id: UserId,
    pub fid: i64,
    pub notification_url: String,
    pub notification_token: String,
    pub is_active: bool,
}
