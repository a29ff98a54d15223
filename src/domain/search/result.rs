// 検索結果の定義

use serde::{Deserialize, Serialize};

use crate::domain::board::Board;

/// 盤面座標（行・列とも1始まり）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// 1手の表現（つまむマスと落とすマス）
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Swap {
    pub pick: Coord,
    pub drop: Coord,
}

impl Swap {
    pub fn new(pick: Coord, drop: Coord) -> Self {
        Self { pick, drop }
    }

    /// (pick行, pick列, drop行, drop列) の組に展開する
    pub fn as_quad(&self) -> (u8, u8, u8, u8) {
        (self.pick.row, self.pick.col, self.drop.row, self.drop.col)
    }
}

/// 試行1本分の結果
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialScore {
    pub damage: u32,
    pub combos: u32,
    pub mega_gain: u32,
    /// 使い切ったフィーダ供給数
    pub feeder_used: u32,
    pub disruptions_left: u32,
    /// ダメージが残り体力に届いたか
    pub cleared: bool,
}

/// 全試行の平均値（手の評価値）
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveScore {
    pub damage: f64,
    pub combos: f64,
    pub mega_gain: f64,
    pub feeder_used: f64,
    pub disruptions_left: f64,
    /// 残り体力に届いた試行の割合
    pub clear_ratio: f64,
}

/// 1手ぶんの評価結果（swap=Noneは整地のみ）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub swap: Option<Swap>,
    pub score: MoveScore,
    /// 平均に最も近い試行の終了盤面（代表盤面）
    pub board: Board,
    pub trials: u32,
}
