// 採点モード - 手の並べ替え規準

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::search::result::{MoveResult, MoveScore};

/// 手の採点規準
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradingMode {
    /// 期待ダメージの大きい順
    Score,
    /// 期待コンボ数の多い順
    Combos,
    /// メガゲージ増加量の多い順
    MegaAcceleration,
    /// 残存妨害数の少ない順
    Disruptions,
    /// 撃破率の高い順
    ClearChance,
}

impl Default for GradingMode {
    fn default() -> Self {
        GradingMode::Score
    }
}

impl GradingMode {
    /// 第一規準の値を取り出す
    pub fn primary(&self, score: &MoveScore) -> f64 {
        match self {
            GradingMode::Score => score.damage,
            GradingMode::Combos => score.combos,
            GradingMode::MegaAcceleration => score.mega_gain,
            GradingMode::Disruptions => score.disruptions_left,
            GradingMode::ClearChance => score.clear_ratio,
        }
    }

    /// 2つの結果を採点順に比較する
    ///
    /// 第一規準 → 期待ダメージ降順 → 期待コンボ降順 → 座標昇順。
    pub fn cmp(&self, a: &MoveResult, b: &MoveResult) -> Ordering {
        let first = match self {
            GradingMode::Disruptions => cmp_asc(self.primary(&a.score), self.primary(&b.score)),
            _ => cmp_desc(self.primary(&a.score), self.primary(&b.score)),
        };
        first
            .then_with(|| cmp_desc(a.score.damage, b.score.damage))
            .then_with(|| cmp_desc(a.score.combos, b.score.combos))
            .then_with(|| a.swap.cmp(&b.swap))
    }

    /// 採点順に並べ替える
    pub fn rank(&self, results: &mut Vec<MoveResult>) {
        results.sort_by(|a, b| self.cmp(a, b));
    }
}

fn cmp_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

fn cmp_asc(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
