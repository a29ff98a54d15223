// ステージ定義（手数・体力・補充設定）

use serde::{Deserialize, Serialize};

use crate::constants::ROWS;
use crate::domain::species::SpeciesId;

/// ステージの静的パラメータ
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    /// 開始時の手数
    pub moves: u8,
    /// 敵の総体力
    pub health: u32,
    /// フィーダ列の深さ（1列あたりの補充数）
    pub drop_depth: u8,
    /// ステージ固有で降ってくる種（編成外でも補充候補になる）
    pub native_drops: Vec<SpeciesId>,
}

impl Stage {
    pub fn new(moves: u8, health: u32) -> Self {
        Self {
            moves,
            health,
            ..Self::default()
        }
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self {
            moves: 10,
            health: 10_000,
            drop_depth: ROWS as u8,
            native_drops: Vec::new(),
        }
    }
}
