// マッチ3パズル最善手シミュレータ - ライブラリモジュール

pub mod constants;
pub mod domain;         // ドメイン層
pub mod application;    // アプリケーション層
pub mod infrastructure; // インフラ層
pub mod profiling;
pub mod logging;

// 外部クレートの再エクスポート
pub use anyhow::{anyhow, Context, Result};

// 主要な型を再エクスポート
pub use application::advisor::{
    AdvisorService, ChannelAcceptor, MemoryAcceptor, PlayerState, ResultAcceptor, SearchEvent,
    SearchHandle, SearchProgress, SearchToken, StaticPlayerState,
};
pub use constants::{CELLS, COLS, ROWS};
pub use domain::board::{Board, Cell};
pub use domain::search::{GradingMode, MoveResult, MoveScore, SearchConfig, Swap};
pub use domain::species::{EffectKind, SpeciesCatalog, SpeciesId};
