pub mod connection;
pub mod entities;
pub mod reconciler;
pub mod repositories;

pub use reconciler::StatsReconciler;
