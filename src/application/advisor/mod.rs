// 手探索アプリケーションサービス

pub mod acceptor;
pub mod event;
pub mod search;
pub mod service;
pub mod snapshot;

pub use acceptor::{ChannelAcceptor, MemoryAcceptor, ResultAcceptor, SearchToken};
pub use event::{SearchEvent, SearchProgress, TrialDelta};
pub use search::run_search;
pub use service::{AdvisorService, SearchHandle};
pub use snapshot::{PlayerState, SearchSnapshot, StaticPlayerState};
