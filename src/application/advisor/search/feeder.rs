// フィーダ - 列ごとの補充キュー

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::constants::COLS;
use crate::domain::species::SpeciesId;
use crate::domain::stage::Stage;

/// 1試行分の補充キュー
///
/// 列ごとに降ってくる種の並びを持つ。全ての手を同じフィーダ群で
/// 試行することで、手どうしの比較から補充運の差を消す。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Feeder {
    columns: [Vec<SpeciesId>; COLS],
    cursors: [usize; COLS],
}

impl Feeder {
    /// 何も降らないフィーダ
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: [Vec<SpeciesId>; COLS]) -> Self {
        Self {
            columns,
            cursors: [0; COLS],
        }
    }

    /// 指定列（1始まり）から次の1個を取り出す
    pub fn draw(&mut self, col: usize) -> Option<SpeciesId> {
        if col == 0 || col > COLS {
            return None;
        }
        let queue = &self.columns[col - 1];
        let cursor = &mut self.cursors[col - 1];
        let piece = queue.get(*cursor).copied()?;
        *cursor += 1;
        Some(piece)
    }

    /// 取り出し済みの総数
    pub fn consumed(&self) -> u32 {
        self.cursors.iter().map(|&c| c as u32).sum()
    }

    /// 指定列（1始まり）の残量を含む全長
    pub fn depth(&self, col: usize) -> usize {
        if col == 0 || col > COLS {
            return 0;
        }
        self.columns[col - 1].len()
    }
}

/// フィーダ群を生成する
///
/// 深さは max(min_height, ステージ設定)。候補が足りず desired_count 種
/// 作れない場合は見つかった分だけ返す。シードが同じなら結果も同じ。
pub fn generate_feeders(
    min_height: u8,
    stage: &Stage,
    pool: &[SpeciesId],
    desired_count: u32,
    seed: u64,
) -> Vec<Feeder> {
    let depth = min_height.max(stage.drop_depth) as usize;
    if pool.is_empty() || depth == 0 {
        return vec![Feeder::empty()];
    }

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut feeders: Vec<Feeder> = Vec::with_capacity(desired_count as usize);
    let max_attempts = (desired_count as u64).saturating_mul(20);

    let mut attempts = 0u64;
    while feeders.len() < desired_count as usize && attempts < max_attempts {
        attempts += 1;
        let mut columns: [Vec<SpeciesId>; COLS] = Default::default();
        for queue in columns.iter_mut() {
            queue.reserve(depth);
            for _ in 0..depth {
                queue.push(pool[rng.gen_range(0..pool.len())]);
            }
        }
        let candidate = Feeder::from_columns(columns);
        if !feeders.contains(&candidate) {
            feeders.push(candidate);
        }
    }

    feeders
}
