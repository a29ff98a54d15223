// 合法手の列挙

use crate::constants::COLS;
use crate::domain::board::Board;
use crate::domain::search::result::{Coord, Swap};
use crate::domain::species::SpeciesCatalog;

/// 指定マスの占有種が3つ並びに参加しているか
///
/// 指定マスを中心とした縦横5マスの窓だけを見る。窓の外や盤面外は
/// 一致しない扱い。凍結マスも種が同じなら並びに数える。
pub fn made_a_combo(board: &Board, catalog: &SpeciesCatalog, row: usize, col: usize) -> bool {
    let species = board.species_at(row, col);
    if !catalog.effect_of(species).is_matchable() {
        return false;
    }

    let at = |r: isize, c: isize| -> bool {
        if r < 1 || c < 1 {
            return false;
        }
        board.species_at(r as usize, c as usize) == species
    };

    let r = row as isize;
    let c = col as isize;
    let h = [at(r, c - 2), at(r, c - 1), true, at(r, c + 1), at(r, c + 2)];
    let v = [at(r - 2, c), at(r - 1, c), true, at(r + 1, c), at(r + 2, c)];

    for line in [h, v] {
        for start in 0..=2 {
            if line[start] && line[start + 1] && line[start + 2] {
                return true;
            }
        }
    }
    false
}

/// 1手が成立するか
///
/// 入れ替えた後、動かした2マスのどちらかで3つ並びができること。
pub fn is_allowed(board: &Board, catalog: &SpeciesCatalog, pick: Coord, drop: Coord) -> bool {
    let (pr, pc) = (pick.row as usize, pick.col as usize);
    let (dr, dc) = (drop.row as usize, drop.col as usize);
    let picked = match board.get(pr, pc) {
        Some(cell) => cell,
        None => return false,
    };
    let target = match board.get(dr, dc) {
        Some(cell) => cell,
        None => return false,
    };
    if picked.frozen || target.frozen || picked.species == target.species {
        return false;
    }

    let mut swapped = board.clone();
    if swapped.swap((pr, pc), (dr, dc)).is_err() {
        return false;
    }
    made_a_combo(&swapped, catalog, dr, dc) || made_a_combo(&swapped, catalog, pr, pc)
}

/// 合法手を列挙する
///
/// つまめるのは凍結していない通常ピースのみ。落とす先は障害物と
/// コイン以外の凍結していないマス。結果は座標順に並ぶ。
pub fn possible_moves(board: &Board, catalog: &SpeciesCatalog) -> Vec<Swap> {
    let mut picks: Vec<Coord> = Vec::new();
    let mut drops: Vec<Coord> = Vec::new();
    for (i, cell) in board.cells().iter().enumerate() {
        if cell.frozen {
            continue;
        }
        let effect = catalog.effect_of(cell.species);
        let coord = Coord::new((i / COLS + 1) as u8, (i % COLS + 1) as u8);
        if effect.is_droppable() {
            drops.push(coord);
        }
        if effect.is_pickable() {
            picks.push(coord);
        }
    }

    let mut moves = Vec::new();
    for &pick in &picks {
        for &drop in &drops {
            if pick == drop {
                continue;
            }
            if is_allowed(board, catalog, pick, drop) {
                moves.push(Swap::new(pick, drop));
            }
        }
    }
    moves
}
