// 試行結果の集約

use crate::application::advisor::search::trial::TrialOutcome;
use crate::domain::search::result::{MoveResult, MoveScore, Swap};

/// 1手ぶんの試行結果を平均して評価値にまとめる
///
/// 代表盤面には期待ダメージに最も近い試行の終了盤面を使う
/// （差が同じなら先のフィーダ番号を採る）。成功した試行が
/// 1本もなければ None。
pub fn aggregate_outcomes(swap: Option<Swap>, outcomes: &[TrialOutcome]) -> Option<MoveResult> {
    if outcomes.is_empty() {
        return None;
    }
    let n = outcomes.len() as f64;

    let mut score = MoveScore::default();
    let mut cleared = 0u32;
    for outcome in outcomes {
        score.damage += outcome.score.damage as f64;
        score.combos += outcome.score.combos as f64;
        score.mega_gain += outcome.score.mega_gain as f64;
        score.feeder_used += outcome.score.feeder_used as f64;
        score.disruptions_left += outcome.score.disruptions_left as f64;
        if outcome.score.cleared {
            cleared += 1;
        }
    }
    score.damage /= n;
    score.combos /= n;
    score.mega_gain /= n;
    score.feeder_used /= n;
    score.disruptions_left /= n;
    score.clear_ratio = cleared as f64 / n;

    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, outcome) in outcomes.iter().enumerate() {
        let dist = (outcome.score.damage as f64 - score.damage).abs();
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }

    Some(MoveResult {
        swap,
        score,
        board: outcomes[best].board.clone(),
        trials: outcomes.len() as u32,
    })
}
