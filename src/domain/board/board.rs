// Board型 - 6×6の盤面を表現

use anyhow::{anyhow, Result};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::constants::{cell_index, CELLS, COLS, ROWS};
use crate::domain::board::cell::{char_to_code, code_to_char, Cell};
use crate::domain::species::{SpeciesCatalog, SpeciesId};

/// 6×6の盤面（行・列とも1始まり、行1が最上段）
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Board {
    /// 空の盤面を作成
    pub fn new() -> Self {
        Self {
            cells: [Cell::AIR; CELLS],
        }
    }

    pub fn in_range(row: usize, col: usize) -> bool {
        (1..=ROWS).contains(&row) && (1..=COLS).contains(&col)
    }

    /// セルを取得（範囲外はNone）
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if !Self::in_range(row, col) {
            return None;
        }
        Some(self.cells[cell_index(row, col)])
    }

    /// 占有種を取得（範囲外は空きマス扱い）
    pub fn species_at(&self, row: usize, col: usize) -> SpeciesId {
        self.get(row, col).map(|c| c.species).unwrap_or(SpeciesId::AIR)
    }

    /// セルを設定
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        if !Self::in_range(row, col) {
            return Err(anyhow!("座標が範囲外: ({}, {})", row, col));
        }
        self.cells[cell_index(row, col)] = cell;
        Ok(())
    }

    /// 2マスの中身を入れ替える
    pub fn swap(&mut self, a: (usize, usize), b: (usize, usize)) -> Result<()> {
        let cell_a = self
            .get(a.0, a.1)
            .ok_or_else(|| anyhow!("座標が範囲外: ({}, {})", a.0, a.1))?;
        let cell_b = self
            .get(b.0, b.1)
            .ok_or_else(|| anyhow!("座標が範囲外: ({}, {})", b.0, b.1))?;
        self.set(a.0, a.1, cell_b)?;
        self.set(b.0, b.1, cell_a)?;
        Ok(())
    }

    /// 盤面全体への直接アクセス（読み取り専用、行優先）
    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    /// 盤面の妥当性を検証
    pub fn validate(&self, catalog: &SpeciesCatalog) -> Result<()> {
        for row in 1..=ROWS {
            for col in 1..=COLS {
                let cell = self.cells[cell_index(row, col)];
                if !catalog.contains(cell.species) {
                    return Err(anyhow!(
                        "未登録の種ID {} があります: ({}, {})",
                        cell.species.0,
                        row,
                        col
                    ));
                }
                if cell.frozen && cell.is_air() {
                    return Err(anyhow!("空きマスは凍結できません: ({}, {})", row, col));
                }
            }
        }
        Ok(())
    }

    /// 文字列表現から構築（行1が先頭行、小文字は凍結マス）
    pub fn parse(s: &str, catalog: &SpeciesCatalog) -> Result<Self> {
        let chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELLS {
            return Err(anyhow!("文字数が不正: 期待{}、実際{}", CELLS, chars.len()));
        }

        let mut board = Self::new();
        for (i, &ch) in chars.iter().enumerate() {
            let row = i / COLS + 1;
            let col = i % COLS + 1;
            let (code, frozen) = char_to_code(ch)?;
            let cell = if code == '.' {
                Cell::AIR
            } else {
                let species = catalog
                    .id_by_code(code)
                    .ok_or_else(|| anyhow!("未登録の表示コード: {}", code))?;
                if frozen {
                    Cell::frozen(species)
                } else {
                    Cell::new(species)
                }
            };
            board.set(row, col, cell)?;
        }

        Ok(board)
    }

    /// 文字列表現に変換（行ごとに改行区切り）
    pub fn to_text(&self, catalog: &SpeciesCatalog) -> String {
        let mut s = String::with_capacity(CELLS + ROWS);
        for row in 1..=ROWS {
            for col in 1..=COLS {
                let cell = self.cells[cell_index(row, col)];
                let code = catalog.get(cell.species).map(|sp| sp.code).unwrap_or('?');
                s.push(code_to_char(code, cell.frozen));
            }
            if row < ROWS {
                s.push('\n');
            }
        }
        s
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

// serdeの固定長配列対応は要素数32までのため手動実装
impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.cells.iter())
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cells = Vec::<Cell>::deserialize(deserializer)?;
        let cells: [Cell; CELLS] = cells
            .try_into()
            .map_err(|v: Vec<Cell>| de::Error::invalid_length(v.len(), &"盤面のセル数36"))?;
        Ok(Board { cells })
    }
}
