// 種カタログと効果定義

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// 種のインターンID（カタログ内インデックス）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u16);

impl SpeciesId {
    /// 空きマスを表す固定ID
    pub const AIR: SpeciesId = SpeciesId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// 効果種別 - 盤面挙動のフラグとスキル発動の分類
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// 空きマス
    Air,
    /// 障害ブロック（動かせず、揃わない）
    Barrier,
    /// コイン（補充で降るが、揃わない）
    Coin,
    /// スキルなしの通常ピース
    Plain,
    /// ダメージ倍率スキル（確率発動）
    Surge,
    /// メガゲージ加速スキル（確率発動）
    MegaBoost,
}

impl EffectKind {
    /// 移動先マスの占有者として退かせるか
    pub fn is_droppable(self) -> bool {
        !matches!(self, EffectKind::Barrier | EffectKind::Coin)
    }

    /// つまみ上げる側のピースになれるか
    pub fn is_pickable(self) -> bool {
        matches!(
            self,
            EffectKind::Plain | EffectKind::Surge | EffectKind::MegaBoost
        )
    }

    /// フィーダから自動供給されうるか
    pub fn is_auto_generated(self) -> bool {
        matches!(
            self,
            EffectKind::Coin | EffectKind::Plain | EffectKind::Surge | EffectKind::MegaBoost
        )
    }

    /// 3つ並びの対象になるか
    pub fn is_matchable(self) -> bool {
        matches!(
            self,
            EffectKind::Plain | EffectKind::Surge | EffectKind::MegaBoost
        )
    }
}

/// 種の定義（カタログの1エントリ）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    /// 盤面文字列で使う表示コード（大文字英字）
    pub code: char,
    pub base_attack: u16,
    pub effect: EffectKind,
}

/// イミュータブルな種カタログ（ID 0 は常に空きマス）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeciesCatalog {
    defs: Vec<Species>,
    by_name: HashMap<String, SpeciesId>,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        let air = Species {
            name: "air".to_string(),
            code: '.',
            base_attack: 0,
            effect: EffectKind::Air,
        };
        let mut by_name = HashMap::new();
        by_name.insert(air.name.clone(), SpeciesId::AIR);
        Self {
            defs: vec![air],
            by_name,
        }
    }

    /// 種を登録してIDを返す
    pub fn register(
        &mut self,
        name: &str,
        code: char,
        base_attack: u16,
        effect: EffectKind,
    ) -> Result<SpeciesId> {
        if self.by_name.contains_key(name) {
            return Err(anyhow!("種名が重複しています: {}", name));
        }
        if !code.is_ascii_uppercase() {
            return Err(anyhow!("表示コードは大文字英字である必要があります: {}", code));
        }
        if self.defs.iter().any(|s| s.code == code) {
            return Err(anyhow!("表示コードが重複しています: {}", code));
        }
        let id = SpeciesId(self.defs.len() as u16);
        self.defs.push(Species {
            name: name.to_string(),
            code,
            base_attack,
            effect,
        });
        self.by_name.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, id: SpeciesId) -> Option<&Species> {
        self.defs.get(id.index())
    }

    /// IDの効果を引く（カタログ外は空きマス扱い）
    pub fn effect_of(&self, id: SpeciesId) -> EffectKind {
        self.get(id).map(|s| s.effect).unwrap_or(EffectKind::Air)
    }

    pub fn id_of(&self, name: &str) -> Option<SpeciesId> {
        self.by_name.get(name).copied()
    }

    /// 表示コードからIDを引く（小文字は大文字に正規化）
    pub fn id_by_code(&self, code: char) -> Option<SpeciesId> {
        let code = code.to_ascii_uppercase();
        self.defs
            .iter()
            .position(|s| s.code == code)
            .map(|i| SpeciesId(i as u16))
    }

    pub fn contains(&self, id: SpeciesId) -> bool {
        id.index() < self.defs.len()
    }

    /// 登録済みの種数（空きマスを含む）
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.len() <= 1
    }
}

impl Default for SpeciesCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// スキル発動テーブル（発動率と倍率の参照表）
#[derive(Clone, Debug, Default)]
pub struct EffectTable {
    /// (効果, 揃えた個数, スキルレベル) → 発動率 0.0..=1.0
    odds: HashMap<(EffectKind, u8, u8), f64>,
    /// (効果, スキルレベル) → 倍率
    mults: HashMap<(EffectKind, u8), f64>,
}

impl EffectTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 発動率を登録
    pub fn set_odds(
        &mut self,
        effect: EffectKind,
        matched: u8,
        skill_level: u8,
        odds: f64,
    ) -> Result<()> {
        if !(0.0..=1.0).contains(&odds) {
            return Err(anyhow!("発動率は0.0~1.0の範囲: {}", odds));
        }
        self.odds.insert((effect, matched, skill_level), odds);
        Ok(())
    }

    /// 倍率を登録
    pub fn set_mult(&mut self, effect: EffectKind, skill_level: u8, mult: f64) -> Result<()> {
        if mult < 0.0 {
            return Err(anyhow!("倍率は0以上: {}", mult));
        }
        self.mults.insert((effect, skill_level), mult);
        Ok(())
    }

    /// 発動率を引く（未登録は0 = 発動しない）
    pub fn odds(&self, effect: EffectKind, matched: u8, skill_level: u8) -> f64 {
        self.odds
            .get(&(effect, matched, skill_level))
            .copied()
            .unwrap_or(0.0)
    }

    /// 倍率を引く（未登録は等倍）
    pub fn mult(&self, effect: EffectKind, skill_level: u8) -> f64 {
        self.mults.get(&(effect, skill_level)).copied().unwrap_or(1.0)
    }
}
