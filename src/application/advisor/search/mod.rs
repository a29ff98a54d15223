// アプリケーション層 - 手探索の実装

pub mod aggregator;
pub mod dispatcher;
pub mod engine;
pub mod feeder;
pub mod moves;
pub mod trial;

pub use engine::run_search;
