// アプリケーション層 - 検索ユースケースの組み立て

pub mod advisor;
pub mod progress;

pub use advisor::{AdvisorService, SearchHandle};
pub use progress::ProgressManager;
