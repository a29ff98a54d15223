// 検索関連のドメインモデル

pub mod config;
pub mod grading;
pub mod result;

pub use config::{FeederCount, FeederHeight, SearchConfig};
pub use grading::GradingMode;
pub use result::{Coord, MoveResult, MoveScore, Swap, TrialScore};
