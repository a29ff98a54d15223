// 編成（手持ちチーム）の定義

use serde::{Deserialize, Serialize};

use crate::domain::species::SpeciesId;

/// 編成メンバー1体分の育成状態
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub species: SpeciesId,
    pub level: u8,
    pub skill_level: u8,
}

impl TeamMember {
    pub fn new(species: SpeciesId) -> Self {
        Self {
            species,
            level: 1,
            skill_level: 1,
        }
    }

    pub fn with_levels(species: SpeciesId, level: u8, skill_level: u8) -> Self {
        Self {
            species,
            level,
            skill_level,
        }
    }
}

/// プレイヤー編成（メンバーとメガ枠）
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub members: Vec<TeamMember>,
    /// メガ進化できる枠（編成中の1種のみ）
    pub mega_slot: Option<SpeciesId>,
    /// メガ発動に必要なゲージ量
    pub mega_threshold: u16,
}

impl Team {
    pub fn new(members: Vec<TeamMember>) -> Self {
        Self {
            members,
            mega_slot: None,
            mega_threshold: 0,
        }
    }

    pub fn with_mega(members: Vec<TeamMember>, mega_slot: SpeciesId, mega_threshold: u16) -> Self {
        Self {
            members,
            mega_slot: Some(mega_slot),
            mega_threshold,
        }
    }

    /// 種IDからメンバーを引く（編成外はNone）
    pub fn member(&self, species: SpeciesId) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.species == species)
    }

    pub fn species(&self) -> impl Iterator<Item = SpeciesId> + '_ {
        self.members.iter().map(|m| m.species)
    }
}
