pub mod core;
pub mod pacer;
pub mod stats;


pub use self::core::{IterationReport, LoopScheduler};
pub use pacer::{FramePacer, Pacing};
pub use stats::LoopStats;
