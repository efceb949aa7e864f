pub mod dispatcher;
pub mod messages;

pub use dispatcher::{
    DispatchError, DispatchSummary, DispatcherConfig, EndpointOutcome, NotificationDispatcher,
    NotificationPayload,
};
pub use messages::{NOTIFICATION_MESSAGES, NotificationMessage, random_message};
