pub mod analysis;
pub mod review;
pub mod task;

pub use analysis::{Analysis, AnalysisResponse, Change};
pub use review::{ReviewContext, ReviewStage, TaskBoard, review_stage};
pub use task::{RawTask, RiskLevel, Task, TaskListResponse, TaskStatus};
