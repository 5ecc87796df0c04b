pub mod completion;
pub mod stats;
pub mod tasbeeh;

pub use completion::CompletionTracker;
pub use stats::{calculate_streak, daily_summary};
pub use tasbeeh::{MILESTONE, TasbeehCounter};
