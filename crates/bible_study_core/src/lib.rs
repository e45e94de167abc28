pub mod bible;
pub mod distribution;
pub mod domain;
pub mod plan;
pub mod ports;
pub mod range;
pub mod streak;

pub use bible::{BibleIndex, BookMeta};
pub use distribution::{distribute, DayAssignment, DistributionError};
pub use domain::{
    Bookmark, Collection, DailyReading, Highlight, Note, PlanProgress, PlanStatus, ReadingPlan,
    ReadingStreak, ReadingUnit, ScriptureRange, ScriptureRef, User,
};
pub use plan::{build_days, can_modify, can_view, mark_day_complete, progress, PlanError};
pub use ports::{DatabaseService, PortError, PortResult};
pub use range::{validate, NormalizedRange, RangeError};
pub use streak::record_activity;
