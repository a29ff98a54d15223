// 並列実行管理

use anyhow::{Context, Result};

/// 並列実行設定
#[derive(Clone, Debug)]
pub struct ParallelConfig {
    /// ワーカースレッド数
    pub num_workers: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
        }
    }
}

impl ParallelConfig {
    pub fn new(num_workers: usize) -> Self {
        Self { num_workers }
    }

    /// 検索用のワーカープールを作成
    ///
    /// 検索スレッドはこのプールに install して走るため、
    /// 試行の並列度はここで決まる。
    pub fn build_pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_workers)
            .thread_name(|i| format!("matchcast-worker-{}", i))
            .build()
            .context("ワーカープールの作成に失敗しました")
    }
}
