//! Domain model: ids, tasks and result records.

pub mod ids;
pub mod record;
pub mod task;

pub use ids::{TaskId, WorkerId};
pub use record::ResultRecord;
pub use task::Task;
