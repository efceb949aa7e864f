pub mod allowance;
pub mod outcome;
pub mod reconcile;
pub mod rewards;
pub mod segments;
pub mod session;
pub mod storage;

// Re-export main components
pub use allowance::*;
pub use outcome::*;
pub use reconcile::*;
pub use rewards::*;
pub use segments::*;
pub use session::*;
pub use storage::*;
