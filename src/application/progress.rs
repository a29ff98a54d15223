// 進捗管理

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::application::advisor::event::{SearchProgress, TrialDelta};

/// 進捗マネージャー（ワーカー間で共有するカウンタ群）
pub struct ProgressManager {
    moves_total: AtomicU64,
    moves_done: AtomicU64,
    trials_done: AtomicU64,
    combos_seen: AtomicU64,
    trial_failures: AtomicU64,
    start_time: Instant,
}

impl ProgressManager {
    pub fn new() -> Self {
        Self {
            moves_total: AtomicU64::new(0),
            moves_done: AtomicU64::new(0),
            trials_done: AtomicU64::new(0),
            combos_seen: AtomicU64::new(0),
            trial_failures: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// 評価対象の手数を設定
    pub fn set_moves_total(&self, count: u64) {
        self.moves_total.store(count, Ordering::Relaxed);
    }

    /// 評価し終えた手数を追加
    pub fn add_moves_done(&self, count: u64) {
        self.moves_done.fetch_add(count, Ordering::Relaxed);
    }

    /// 試行の統計差分を追加
    pub fn add_delta(&self, delta: TrialDelta) {
        self.trials_done.fetch_add(delta.trials, Ordering::Relaxed);
        self.combos_seen.fetch_add(delta.combos, Ordering::Relaxed);
        self.trial_failures
            .fetch_add(delta.failures, Ordering::Relaxed);
    }

    /// 経過時間を取得
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// 試行速度（試行/秒）を取得
    pub fn trials_per_second(&self) -> f64 {
        let trials = self.trials_done.load(Ordering::Relaxed) as f64;
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            trials / elapsed
        } else {
            0.0
        }
    }

    /// 現在のカウンタを進捗レポートに写し取る
    pub fn snapshot_progress(&self, searching: bool) -> SearchProgress {
        SearchProgress {
            searching,
            moves_total: self.moves_total.load(Ordering::Relaxed),
            moves_done: self.moves_done.load(Ordering::Relaxed),
            trials_done: self.trials_done.load(Ordering::Relaxed),
            combos_seen: self.combos_seen.load(Ordering::Relaxed),
            trial_failures: self.trial_failures.load(Ordering::Relaxed),
            trials_per_second: self.trials_per_second(),
        }
    }

    /// リセット
    pub fn reset(&mut self) {
        self.moves_total.store(0, Ordering::Relaxed);
        self.moves_done.store(0, Ordering::Relaxed);
        self.trials_done.store(0, Ordering::Relaxed);
        self.combos_seen.store(0, Ordering::Relaxed);
        self.trial_failures.store(0, Ordering::Relaxed);
        self.start_time = Instant::now();
    }
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_manager_starts_clean() {
        let mgr = ProgressManager::new();
        let progress = mgr.snapshot_progress(false);
        assert_eq!(progress.moves_total, 0);
        assert_eq!(progress.trials_done, 0);
        assert_eq!(progress.trial_failures, 0);
    }

    #[test]
    fn can_track_moves() {
        let mgr = ProgressManager::new();
        mgr.set_moves_total(40);
        mgr.add_moves_done(3);
        mgr.add_moves_done(2);

        let progress = mgr.snapshot_progress(true);
        assert!(progress.searching);
        assert_eq!(progress.moves_total, 40);
        assert_eq!(progress.moves_done, 5);
    }

    #[test]
    fn delta_accumulates_counters() {
        let mgr = ProgressManager::new();
        mgr.add_delta(TrialDelta {
            trials: 10,
            combos: 25,
            failures: 1,
        });
        mgr.add_delta(TrialDelta {
            trials: 5,
            combos: 8,
            failures: 0,
        });

        let progress = mgr.snapshot_progress(false);
        assert_eq!(progress.trials_done, 15);
        assert_eq!(progress.combos_seen, 33);
        assert_eq!(progress.trial_failures, 1);
    }

    #[test]
    fn reset_clears_state() {
        let mut mgr = ProgressManager::new();
        mgr.set_moves_total(10);
        mgr.add_delta(TrialDelta {
            trials: 100,
            combos: 0,
            failures: 0,
        });

        mgr.reset();
        let progress = mgr.snapshot_progress(false);
        assert_eq!(progress.moves_total, 0);
        assert_eq!(progress.trials_done, 0);
    }

    #[test]
    fn trials_per_second_calculation() {
        let mgr = ProgressManager::new();
        mgr.add_delta(TrialDelta {
            trials: 1000,
            combos: 0,
            failures: 0,
        });
        std::thread::sleep(Duration::from_millis(100));

        assert!(mgr.trials_per_second() > 0.0);
    }
}
