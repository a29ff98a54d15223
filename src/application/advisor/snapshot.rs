// 検索スナップショット - 検索開始時点のプレイヤー状態の複製

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Context, Result};

use crate::application::advisor::acceptor::SearchToken;
use crate::domain::board::Board;
use crate::domain::search::{GradingMode, SearchConfig};
use crate::domain::species::{EffectKind, EffectTable, SpeciesCatalog, SpeciesId};
use crate::domain::stage::Stage;
use crate::domain::team::Team;

/// 検索に必要なプレイヤー状態の参照元
///
/// 実装側の保持形式には関知しない。検索はスナップショット取得後、
/// この参照元に二度と触らない。
pub trait PlayerState {
    fn board(&self) -> &Board;
    fn stage(&self) -> &Stage;
    fn team(&self) -> &Team;
    fn catalog(&self) -> &SpeciesCatalog;
    fn effect_table(&self) -> &EffectTable;
    fn disabled_effects(&self) -> &HashSet<EffectKind>;
    fn attack_power_up(&self) -> bool;
    /// スキル発動率の足切り（百分率）
    fn effect_threshold(&self) -> u8;
    fn mega_progress(&self) -> u16;
    fn mega_allowed(&self) -> bool;
    fn remaining_health(&self) -> u32;
    fn remaining_moves(&self) -> u8;
    /// 携帯版の連鎖倍率表を使うか
    fn mobile_mode(&self) -> bool;
    fn grading_mode(&self) -> GradingMode;
    fn search_config(&self) -> &SearchConfig;
}

/// 検索開始時点の完全な複製
///
/// 取得後は元の状態が変化しても影響を受けない。
#[derive(Clone, Debug)]
pub struct SearchSnapshot {
    token: SearchToken,
    board: Board,
    catalog: SpeciesCatalog,
    stage: Stage,
    effect_table: EffectTable,
    levels: HashMap<SpeciesId, u8>,
    skill_levels: HashMap<SpeciesId, u8>,
    support: HashSet<SpeciesId>,
    mega_slot: Option<SpeciesId>,
    mega_threshold: u16,
    auto_pool: Vec<SpeciesId>,
    disabled_effects: HashSet<EffectKind>,
    attack_power_up: bool,
    effect_threshold: u8,
    mega_progress: u16,
    mega_allowed: bool,
    remaining_health: u32,
    remaining_moves: u8,
    mobile_mode: bool,
    grading: GradingMode,
    config: SearchConfig,
}

impl SearchSnapshot {
    /// プレイヤー状態を写し取る
    pub fn capture(state: &dyn PlayerState, token: SearchToken) -> Result<Self> {
        state
            .board()
            .validate(state.catalog())
            .context("盤面が不正です")?;
        state.search_config().validate().context("検索設定が不正です")?;

        let remaining_moves = state.remaining_moves();
        if remaining_moves == 0 {
            return Err(anyhow!("残り手数が0のため検索できません"));
        }

        let team = state.team();
        let catalog = state.catalog();
        let stage = state.stage();

        let mut levels = HashMap::new();
        let mut skill_levels = HashMap::new();
        let mut support = HashSet::new();
        for member in &team.members {
            levels.insert(member.species, member.level);
            skill_levels.insert(member.species, member.skill_level);
            support.insert(member.species);
        }

        // 補充候補 = 編成とステージ固有ドロップのうち自動供給される種
        let mut auto_pool: Vec<SpeciesId> = team
            .species()
            .chain(stage.native_drops.iter().copied())
            .filter(|&id| catalog.effect_of(id).is_auto_generated())
            .collect();
        auto_pool.sort();
        auto_pool.dedup();

        Ok(Self {
            token,
            board: state.board().clone(),
            catalog: catalog.clone(),
            stage: stage.clone(),
            effect_table: state.effect_table().clone(),
            levels,
            skill_levels,
            support,
            mega_slot: team.mega_slot,
            mega_threshold: team.mega_threshold,
            auto_pool,
            disabled_effects: state.disabled_effects().clone(),
            attack_power_up: state.attack_power_up(),
            effect_threshold: state.effect_threshold(),
            // ゲージは閾値で頭打ち
            mega_progress: state.mega_progress().min(team.mega_threshold),
            mega_allowed: state.mega_allowed(),
            remaining_health: state.remaining_health(),
            // 評価対象の1手ぶんを消費した残りで試行する
            remaining_moves: remaining_moves - 1,
            mobile_mode: state.mobile_mode(),
            grading: state.grading_mode(),
            config: state.search_config().clone(),
        })
    }

    pub fn token(&self) -> SearchToken {
        self.token
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn grading(&self) -> GradingMode {
        self.grading
    }

    pub fn auto_pool(&self) -> &[SpeciesId] {
        &self.auto_pool
    }

    pub fn mega_slot(&self) -> Option<SpeciesId> {
        self.mega_slot
    }

    pub fn mega_threshold(&self) -> u16 {
        self.mega_threshold
    }

    pub fn mega_progress(&self) -> u16 {
        self.mega_progress
    }

    pub fn mega_allowed(&self) -> bool {
        self.mega_allowed
    }

    pub fn remaining_health(&self) -> u32 {
        self.remaining_health
    }

    pub fn remaining_moves(&self) -> u8 {
        self.remaining_moves
    }

    pub fn mobile_mode(&self) -> bool {
        self.mobile_mode
    }

    pub fn attack_power_up(&self) -> bool {
        self.attack_power_up
    }

    pub fn effect_of(&self, species: SpeciesId) -> EffectKind {
        self.catalog.effect_of(species)
    }

    /// 編成メンバーか
    pub fn is_support(&self, species: SpeciesId) -> bool {
        self.support.contains(&species)
    }

    pub fn is_disabled(&self, effect: EffectKind) -> bool {
        self.disabled_effects.contains(&effect)
    }

    /// 種の攻撃力（基礎値 + レベル成長、編成外はレベル1扱い）
    pub fn attack_of(&self, species: SpeciesId) -> u32 {
        let base = match self.catalog.get(species) {
            Some(def) => def.base_attack as u32,
            None => return 0,
        };
        let level = self.levels.get(&species).copied().unwrap_or(1) as u32;
        base + 5 * level.saturating_sub(1)
    }

    pub fn skill_level_of(&self, species: SpeciesId) -> u8 {
        self.skill_levels.get(&species).copied().unwrap_or(1)
    }

    /// スキル発動率（無効化・足切りを適用済み）
    pub fn odds_for(&self, species: SpeciesId, matched: u8) -> f64 {
        let effect = self.effect_of(species);
        if self.is_disabled(effect) {
            return 0.0;
        }
        let odds = self
            .effect_table
            .odds(effect, matched, self.skill_level_of(species));
        if odds * 100.0 < self.effect_threshold as f64 {
            return 0.0;
        }
        odds
    }

    /// スキル倍率
    pub fn mult_for(&self, species: SpeciesId) -> f64 {
        self.effect_table
            .mult(self.effect_of(species), self.skill_level_of(species))
    }
}

/// 固定値で構成するプレイヤー状態
pub struct StaticPlayerState {
    pub board: Board,
    pub catalog: SpeciesCatalog,
    pub team: Team,
    pub stage: Stage,
    pub effect_table: EffectTable,
    pub disabled_effects: HashSet<EffectKind>,
    pub attack_power_up: bool,
    pub effect_threshold: u8,
    pub mega_progress: u16,
    pub mega_allowed: bool,
    pub remaining_health: u32,
    pub remaining_moves: u8,
    pub mobile_mode: bool,
    pub grading_mode: GradingMode,
    pub search_config: SearchConfig,
}

impl StaticPlayerState {
    pub fn new(board: Board, catalog: SpeciesCatalog, team: Team) -> Self {
        let stage = Stage::default();
        let remaining_health = stage.health;
        let remaining_moves = stage.moves;
        Self {
            board,
            catalog,
            team,
            stage,
            effect_table: EffectTable::new(),
            disabled_effects: HashSet::new(),
            attack_power_up: false,
            effect_threshold: 0,
            mega_progress: 0,
            mega_allowed: true,
            remaining_health,
            remaining_moves,
            mobile_mode: false,
            grading_mode: GradingMode::default(),
            search_config: SearchConfig::default(),
        }
    }

    pub fn with_stage(mut self, stage: Stage) -> Self {
        self.remaining_health = stage.health;
        self.remaining_moves = stage.moves;
        self.stage = stage;
        self
    }
}

impl PlayerState for StaticPlayerState {
    fn board(&self) -> &Board {
        &self.board
    }

    fn stage(&self) -> &Stage {
        &self.stage
    }

    fn team(&self) -> &Team {
        &self.team
    }

    fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    fn effect_table(&self) -> &EffectTable {
        &self.effect_table
    }

    fn disabled_effects(&self) -> &HashSet<EffectKind> {
        &self.disabled_effects
    }

    fn attack_power_up(&self) -> bool {
        self.attack_power_up
    }

    fn effect_threshold(&self) -> u8 {
        self.effect_threshold
    }

    fn mega_progress(&self) -> u16 {
        self.mega_progress
    }

    fn mega_allowed(&self) -> bool {
        self.mega_allowed
    }

    fn remaining_health(&self) -> u32 {
        self.remaining_health
    }

    fn remaining_moves(&self) -> u8 {
        self.remaining_moves
    }

    fn mobile_mode(&self) -> bool {
        self.mobile_mode
    }

    fn grading_mode(&self) -> GradingMode {
        self.grading_mode
    }

    fn search_config(&self) -> &SearchConfig {
        &self.search_config
    }
}
