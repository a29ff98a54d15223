// 手探索のイベント定義（呼び出し側のUIに依存しない）

use crate::profiling::StageTimes;

/// 試行統計の増分（ワーカー内部で使用）
#[derive(Clone, Copy, Default, Debug)]
pub struct TrialDelta {
    pub trials: u64,
    pub combos: u64,
    pub failures: u64,
}

/// 検索進捗の統計情報
#[derive(Clone, Debug, Default)]
pub struct SearchProgress {
    pub searching: bool,
    pub moves_total: u64,
    pub moves_done: u64,
    pub trials_done: u64,
    pub combos_seen: u64,
    pub trial_failures: u64,
    pub trials_per_second: f64,
}

/// 検索エンジンからのイベント
#[derive(Clone, Debug)]
pub enum SearchEvent {
    /// ログメッセージ
    Log(String),
    /// 進捗更新
    Progress(SearchProgress),
    /// 検索完了
    Finished(SearchProgress),
    /// エラー発生
    Error(String),
    /// プロファイル情報（段階別の計測データ）
    Profile(StageTimes),
}
