// 試行のファンアウト

use rayon::prelude::*;

use crate::application::advisor::event::TrialDelta;
use crate::application::advisor::search::feeder::Feeder;
use crate::application::advisor::search::trial::{run_trial, TrialOutcome};
use crate::application::advisor::snapshot::SearchSnapshot;
use crate::application::progress::ProgressManager;
use crate::domain::search::result::Swap;
use crate::vlog;

/// フィーダ番号からサブシードを導出する（splitmix64の1ステップ）
///
/// 手には依存しないため、同じフィーダ番号の試行はどの手でも
/// 同じ乱数列を使う。
pub fn sub_seed(base_seed: u64, feeder_index: usize) -> u64 {
    let mut z = base_seed ^ (feeder_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// 1手ぶんの全試行を実行する
///
/// 失敗した試行は記録して捨て、成功分だけをフィーダ順で返す。
pub fn run_trials(
    snap: &SearchSnapshot,
    swap: Option<&Swap>,
    feeders: &[Feeder],
    base_seed: u64,
    progress: &ProgressManager,
) -> Vec<TrialOutcome> {
    feeders
        .par_iter()
        .enumerate()
        .filter_map(
            |(i, feeder)| match run_trial(snap, swap, feeder, sub_seed(base_seed, i)) {
                Ok(outcome) => {
                    progress.add_delta(TrialDelta {
                        trials: 1,
                        combos: outcome.score.combos as u64,
                        failures: 0,
                    });
                    Some(outcome)
                }
                Err(err) => {
                    progress.add_delta(TrialDelta {
                        trials: 1,
                        combos: 0,
                        failures: 1,
                    });
                    vlog!("試行に失敗しました (feeder={}): {:#}", i, err);
                    None
                }
            },
        )
        .collect()
}
