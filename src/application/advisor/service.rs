// 手探索サービス

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{unbounded, Receiver};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::application::advisor::acceptor::{ResultAcceptor, SearchToken};
use crate::application::advisor::event::{SearchEvent, SearchProgress};
use crate::application::advisor::search::run_search;
use crate::application::advisor::snapshot::{PlayerState, SearchSnapshot};
use crate::application::progress::ProgressManager;
use crate::infrastructure::executor::ParallelConfig;

/// 検索ハンドル
///
/// 進捗の読み出しとイベントの受信口。検索スレッドには干渉しない。
pub struct SearchHandle {
    token: SearchToken,
    events: Receiver<SearchEvent>,
    progress: Arc<ProgressManager>,
    join: Option<JoinHandle<()>>,
}

impl SearchHandle {
    pub fn token(&self) -> SearchToken {
        self.token
    }

    /// 検索スレッドからのイベント受信口
    pub fn events(&self) -> &Receiver<SearchEvent> {
        &self.events
    }

    /// 進捗統計を取得
    pub fn progress_report(&self) -> SearchProgress {
        let searching = self
            .join
            .as_ref()
            .map(|join| !join.is_finished())
            .unwrap_or(false);
        self.progress.snapshot_progress(searching)
    }

    /// 検索スレッドの終了を待つ
    pub fn join(mut self) -> Result<()> {
        if let Some(join) = self.join.take() {
            join.join()
                .map_err(|_| anyhow!("検索スレッドが異常終了しました"))?;
        }
        Ok(())
    }
}

/// 手探索を管理するサービス
pub struct AdvisorService {
    parallel: ParallelConfig,
}

impl AdvisorService {
    pub fn new() -> Self {
        Self {
            parallel: ParallelConfig::default(),
        }
    }

    pub fn with_parallel(parallel: ParallelConfig) -> Self {
        Self { parallel }
    }

    /// 入力の検証
    fn validate_inputs(&self, state: &dyn PlayerState) -> Result<()> {
        // 盤面の妥当性チェック
        state
            .board()
            .validate(state.catalog())
            .context("盤面が不正です")?;

        // 設定の妥当性チェック
        state
            .search_config()
            .validate()
            .context("検索設定が不正です")?;

        let stage = state.stage();
        if state.remaining_moves() > stage.moves {
            return Err(anyhow!(
                "残り手数がステージ設定を超えています: {} > {}",
                state.remaining_moves(),
                stage.moves
            ));
        }
        if state.remaining_health() > stage.health {
            return Err(anyhow!(
                "残り体力がステージ設定を超えています: {} > {}",
                state.remaining_health(),
                stage.health
            ));
        }

        Ok(())
    }

    /// 検索を開始（メインユースケース）
    ///
    /// 状態を写し取ってワーカースレッドに渡す。呼び出し側は
    /// 返ってきたハンドルで進捗を追い、結果は acceptor 経由で
    /// 受け取る。token は acceptor の現世代と一致させること。
    pub fn begin_search(
        &self,
        state: &dyn PlayerState,
        acceptor: Arc<dyn ResultAcceptor>,
        token: SearchToken,
    ) -> Result<SearchHandle> {
        // 1. 事前検証
        self.validate_inputs(state)
            .context("入力の検証に失敗しました")?;

        // 2. 状態の複製（以後、元の状態には触らない）
        let snap = Arc::new(SearchSnapshot::capture(state, token)?);

        // 3. 進捗・イベント・ワーカープールの用意
        let progress = Arc::new(ProgressManager::new());
        let (tx, rx) = unbounded();
        let pool = self.parallel.build_pool()?;

        // 4. 検索スレッドの起動
        let worker_progress = Arc::clone(&progress);
        let join = std::thread::spawn(move || {
            pool.install(|| run_search(snap, acceptor, worker_progress, tx));
        });

        Ok(SearchHandle {
            token,
            events: rx,
            progress,
            join: Some(join),
        })
    }
}

impl Default for AdvisorService {
    fn default() -> Self {
        Self::new()
    }
}
