pub mod errors;
pub mod notifications;
pub mod stats;
pub mod wheel;

// Re-export all types
pub use errors::*;
pub use notifications::*;
pub use stats::*;
pub use wheel::*;

pub type UserId = String;
pub type SpinId = uuid::Uuid;
