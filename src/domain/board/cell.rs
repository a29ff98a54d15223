// セル型定義（ドメイン層）

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::domain::species::SpeciesId;

/// 盤面の1マス（占有種と凍結フラグ）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub species: SpeciesId,
    pub frozen: bool,
}

impl Cell {
    /// 空きマス
    pub const AIR: Cell = Cell {
        species: SpeciesId::AIR,
        frozen: false,
    };

    pub fn new(species: SpeciesId) -> Self {
        Self {
            species,
            frozen: false,
        }
    }

    /// 凍結状態のマスを作る
    pub fn frozen(species: SpeciesId) -> Self {
        Self {
            species,
            frozen: true,
        }
    }

    pub fn is_air(self) -> bool {
        self.species == SpeciesId::AIR
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::AIR
    }
}

/// 盤面文字列の1文字を（表示コード, 凍結）に分解する
///
/// 小文字は凍結マスを表す。'・' と '.' は空きマス。
pub fn char_to_code(ch: char) -> Result<(char, bool)> {
    match ch {
        '・' | '.' => Ok(('.', false)),
        c if c.is_ascii_uppercase() => Ok((c, false)),
        c if c.is_ascii_lowercase() => Ok((c.to_ascii_uppercase(), true)),
        _ => Err(anyhow!("不正な文字: {}", ch)),
    }
}

/// （表示コード, 凍結）を盤面文字列の1文字に戻す
pub fn code_to_char(code: char, frozen: bool) -> char {
    if code == '.' {
        '.'
    } else if frozen {
        code.to_ascii_lowercase()
    } else {
        code
    }
}
