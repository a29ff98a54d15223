// 1試行の連鎖解決

use anyhow::{anyhow, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::application::advisor::search::feeder::Feeder;
use crate::application::advisor::snapshot::SearchSnapshot;
use crate::constants::{COLS, MAX_CASCADE_ITERATIONS, ROWS};
use crate::domain::board::{Board, Cell};
use crate::domain::search::result::{Swap, TrialScore};
use crate::domain::species::{EffectKind, SpeciesCatalog, SpeciesId};

/// 連鎖倍率（コンボ累計の下限 → 倍率）
const CHAIN_MULTS: [(u32, f64); 9] = [
    (1, 1.0),
    (2, 1.1),
    (3, 1.15),
    (5, 1.2),
    (10, 1.3),
    (25, 1.4),
    (50, 1.5),
    (75, 2.0),
    (100, 2.5),
];

/// 携帯版の連鎖倍率
const CHAIN_MULTS_MOBILE: [(u32, f64); 9] = [
    (1, 1.0),
    (2, 1.1),
    (3, 1.2),
    (5, 1.3),
    (10, 1.4),
    (25, 1.5),
    (50, 1.75),
    (75, 2.0),
    (100, 3.0),
];

/// 個数ボーナス（3個から順に、6個以上は打ち止め）
const LENGTH_BONUS: [f64; 4] = [1.0, 1.5, 2.0, 3.0];

/// メガ進化中の全ダメージ倍率
const MEGA_BONUS: f64 = 1.5;

/// コンボ累計に対応する連鎖倍率を引く
pub fn chain_mult(combos: u32, mobile: bool) -> f64 {
    let table = if mobile {
        &CHAIN_MULTS_MOBILE
    } else {
        &CHAIN_MULTS
    };
    let mut mult = 1.0;
    for &(threshold, value) in table {
        if combos >= threshold {
            mult = value;
        } else {
            break;
        }
    }
    mult
}

/// 検出した1本の並び
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub species: SpeciesId,
    pub cells: Vec<(usize, usize)>,
}

/// 3つ以上の並びを全て検出する
///
/// 横並びを行順に、続けて縦並びを列順に返す。L字・T字は
/// 横と縦の2本として数える。凍結していても種が同じなら並ぶ。
pub fn find_runs(board: &Board, catalog: &SpeciesCatalog) -> Vec<Run> {
    let mut runs = Vec::new();

    for row in 1..=ROWS {
        let mut col = 1;
        while col <= COLS {
            let species = board.species_at(row, col);
            if !catalog.effect_of(species).is_matchable() {
                col += 1;
                continue;
            }
            let mut end = col;
            while end < COLS && board.species_at(row, end + 1) == species {
                end += 1;
            }
            if end - col + 1 >= 3 {
                runs.push(Run {
                    species,
                    cells: (col..=end).map(|c| (row, c)).collect(),
                });
            }
            col = end + 1;
        }
    }

    for col in 1..=COLS {
        let mut row = 1;
        while row <= ROWS {
            let species = board.species_at(row, col);
            if !catalog.effect_of(species).is_matchable() {
                row += 1;
                continue;
            }
            let mut end = row;
            while end < ROWS && board.species_at(end + 1, col) == species {
                end += 1;
            }
            if end - row + 1 >= 3 {
                runs.push(Run {
                    species,
                    cells: (row..=end).map(|r| (r, col)).collect(),
                });
            }
            row = end + 1;
        }
    }

    runs
}

/// 残存妨害数を数える
///
/// 凍結マス、揃わないピース、編成外のピースが対象。
pub fn count_disruptions(board: &Board, snap: &SearchSnapshot) -> u32 {
    board
        .cells()
        .iter()
        .filter(|cell| {
            if cell.is_air() {
                return false;
            }
            if cell.frozen {
                return true;
            }
            let effect = snap.effect_of(cell.species);
            !effect.is_matchable() || !snap.is_support(cell.species)
        })
        .count() as u32
}

/// 1試行の最終盤面と得点
#[derive(Clone, Debug)]
pub struct TrialOutcome {
    pub board: Board,
    pub score: TrialScore,
}

struct TrialState<'a> {
    snap: &'a SearchSnapshot,
    board: Board,
    feeder: Feeder,
    rng: SmallRng,
    combos: u32,
    damage: u64,
    mega_progress: u16,
    mega_gain: u32,
}

/// 1手を適用し、連鎖が収まるまで解決する
pub fn run_trial(
    snap: &SearchSnapshot,
    swap: Option<&Swap>,
    feeder: &Feeder,
    sub_seed: u64,
) -> Result<TrialOutcome> {
    let mut board = snap.board().clone();
    if let Some(swap) = swap {
        board.swap(
            (swap.pick.row as usize, swap.pick.col as usize),
            (swap.drop.row as usize, swap.drop.col as usize),
        )?;
    }

    let mut state = TrialState {
        snap,
        board,
        feeder: feeder.clone(),
        rng: SmallRng::seed_from_u64(sub_seed),
        combos: 0,
        damage: 0,
        mega_progress: snap.mega_progress(),
        mega_gain: 0,
    };
    state.resolve()?;

    let damage = state.damage.min(u32::MAX as u64) as u32;
    let score = TrialScore {
        damage,
        combos: state.combos,
        mega_gain: state.mega_gain,
        feeder_used: state.feeder.consumed(),
        disruptions_left: count_disruptions(&state.board, snap),
        cleared: damage >= snap.remaining_health(),
    };
    Ok(TrialOutcome {
        board: state.board,
        score,
    })
}

impl TrialState<'_> {
    fn resolve(&mut self) -> Result<()> {
        for _ in 0..MAX_CASCADE_ITERATIONS {
            self.settle_columns();
            let runs = find_runs(&self.board, self.snap.catalog());
            if runs.is_empty() {
                return Ok(());
            }
            for run in &runs {
                self.score_run(run);
            }
            self.clear_runs(&runs);
        }
        Err(anyhow!(
            "盤面が収束しません（連鎖解決が{}回を超えました）",
            MAX_CASCADE_ITERATIONS
        ))
    }

    /// 全列に重力を適用し、空へ開いた区間をフィーダで補充する
    ///
    /// 凍結マスは区間の仕切りとして働き、ピースは仕切りを越えて
    /// 落ちない。補充されるのは行1に開いた区間のみ。
    fn settle_columns(&mut self) {
        for col in 1..=COLS {
            let mut start = 1;
            for row in 1..=ROWS + 1 {
                let closes =
                    row > ROWS || self.board.get(row, col).map(|c| c.frozen).unwrap_or(false);
                if closes {
                    if start < row {
                        self.settle_segment(col, start, row - 1);
                    }
                    start = row + 1;
                }
            }
        }
    }

    fn settle_segment(&mut self, col: usize, top: usize, bottom: usize) {
        let mut stack: Vec<SpeciesId> = Vec::with_capacity(bottom - top + 1);
        for row in top..=bottom {
            let species = self.board.species_at(row, col);
            if species != SpeciesId::AIR {
                stack.push(species);
            }
        }
        let vacancies = (bottom - top + 1) - stack.len();

        // 生き残りを下詰めで書き戻す（順序維持）
        for (i, &species) in stack.iter().enumerate() {
            let _ = self.board.set(top + vacancies + i, col, Cell::new(species));
        }

        if top == 1 {
            // 先に引いた1個が最も下の空きに落ちる
            for i in 0..vacancies {
                let cell = match self.feeder.draw(col) {
                    Some(species) => Cell::new(species),
                    None => Cell::AIR,
                };
                let _ = self.board.set(top + vacancies - 1 - i, col, cell);
            }
        } else {
            for row in top..top + vacancies {
                let _ = self.board.set(row, col, Cell::AIR);
            }
        }
    }

    /// メガ進化が発動中か（この並びを数える前の時点）
    fn mega_active(&self) -> bool {
        self.snap.mega_allowed()
            && self.snap.mega_slot().is_some()
            && self.mega_progress >= self.snap.mega_threshold()
    }

    fn add_mega_progress(&mut self, amount: u16) {
        if self.snap.mega_slot().is_none() {
            return;
        }
        let before = self.mega_progress;
        let after = before
            .saturating_add(amount)
            .min(self.snap.mega_threshold());
        self.mega_progress = after;
        self.mega_gain += after.saturating_sub(before) as u32;
    }

    fn score_run(&mut self, run: &Run) {
        self.combos += 1;
        let species = run.species;
        let len = run.cells.len();
        let mega_active = self.mega_active();

        let attack = self.snap.attack_of(species) as f64;
        let length_bonus = LENGTH_BONUS[(len - 3).min(LENGTH_BONUS.len() - 1)];
        let chain = chain_mult(self.combos, self.snap.mobile_mode());
        let mut damage = attack * length_bonus * chain;

        let odds = self.snap.odds_for(species, len.min(u8::MAX as usize) as u8);
        if odds > 0.0 && self.rng.gen_bool(odds.min(1.0)) {
            let mult = self.snap.mult_for(species);
            if self.snap.effect_of(species) == EffectKind::MegaBoost {
                // ゲージ加速スキルは倍率ぶんをゲージに回す
                self.add_mega_progress(mult as u16);
            } else {
                damage *= mult;
            }
        }

        if self.snap.attack_power_up() {
            damage *= 2.0;
        }
        if mega_active {
            damage *= MEGA_BONUS;
        }

        self.damage += damage.round() as u64;

        // メガ枠の並びはゲージを貯める
        if Some(species) == self.snap.mega_slot() {
            self.add_mega_progress(len as u16);
        }
    }

    /// 並びを消す。凍結マスは解除してピースを残す
    fn clear_runs(&mut self, runs: &[Run]) {
        for run in runs {
            for &(row, col) in &run.cells {
                let cell = match self.board.get(row, col) {
                    Some(c) => c,
                    None => continue,
                };
                let next = if cell.frozen {
                    Cell::new(cell.species)
                } else {
                    Cell::AIR
                };
                let _ = self.board.set(row, col, next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::advisor::acceptor::SearchToken;
    use crate::application::advisor::snapshot::{SearchSnapshot, StaticPlayerState};
    use crate::domain::search::result::Coord;
    use crate::domain::species::SpeciesCatalog;
    use crate::domain::team::{Team, TeamMember};

    struct Fixture {
        state: StaticPlayerState,
        a: SpeciesId,
        b: SpeciesId,
        d: SpeciesId,
        e: SpeciesId,
    }

    fn fixture() -> Fixture {
        let mut catalog = SpeciesCatalog::new();
        let a = catalog.register("alpha", 'A', 100, EffectKind::Plain).unwrap();
        let b = catalog.register("beta", 'B', 100, EffectKind::Plain).unwrap();
        let d = catalog.register("delta", 'D', 100, EffectKind::Plain).unwrap();
        let e = catalog.register("echo", 'E', 100, EffectKind::Plain).unwrap();
        let team = Team::new(vec![
            TeamMember::new(a),
            TeamMember::new(b),
            TeamMember::new(d),
            TeamMember::new(e),
        ]);
        let state = StaticPlayerState::new(Board::new(), catalog, team);
        Fixture { state, a, b, d, e }
    }

    fn snap_of(state: &StaticPlayerState) -> SearchSnapshot {
        SearchSnapshot::capture(state, SearchToken(1)).unwrap()
    }

    #[test]
    fn chain_mult_follows_tables() {
        assert_eq!(chain_mult(1, false), 1.0);
        assert_eq!(chain_mult(2, false), 1.1);
        assert_eq!(chain_mult(3, false), 1.15);
        assert_eq!(chain_mult(4, false), 1.15);
        assert_eq!(chain_mult(5, false), 1.2);
        assert_eq!(chain_mult(100, false), 2.5);
        assert_eq!(chain_mult(200, false), 2.5);

        assert_eq!(chain_mult(3, true), 1.2);
        assert_eq!(chain_mult(50, true), 1.75);
        assert_eq!(chain_mult(100, true), 3.0);
    }

    #[test]
    fn find_runs_detects_horizontal_and_vertical() {
        let fx = fixture();
        let mut board = Board::new();
        for col in 1..=3 {
            board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        for row in 2..=4 {
            board.set(row, 5, Cell::new(fx.b)).unwrap();
        }

        let runs = find_runs(&board, &fx.state.catalog);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].species, fx.a);
        assert_eq!(runs[0].cells, vec![(6, 1), (6, 2), (6, 3)]);
        assert_eq!(runs[1].species, fx.b);
        assert_eq!(runs[1].cells, vec![(2, 5), (3, 5), (4, 5)]);
    }

    #[test]
    fn find_runs_counts_l_shape_twice() {
        let fx = fixture();
        let mut board = Board::new();
        // 角(6,1)を共有するL字
        for col in 1..=3 {
            board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        for row in 4..=5 {
            board.set(row, 1, Cell::new(fx.a)).unwrap();
        }

        let runs = find_runs(&board, &fx.state.catalog);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].cells, vec![(6, 1), (6, 2), (6, 3)]);
        assert_eq!(runs[1].cells, vec![(4, 1), (5, 1), (6, 1)]);
    }

    #[test]
    fn find_runs_ignores_two_long_groups() {
        let fx = fixture();
        let mut board = Board::new();
        board.set(6, 1, Cell::new(fx.a)).unwrap();
        board.set(6, 2, Cell::new(fx.a)).unwrap();
        board.set(6, 4, Cell::new(fx.a)).unwrap();

        assert!(find_runs(&board, &fx.state.catalog).is_empty());
    }

    #[test]
    fn trial_with_no_pieces_scores_nothing() {
        let fx = fixture();
        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert_eq!(outcome.score, TrialScore::default());
        assert_eq!(outcome.board, Board::new());
    }

    #[test]
    fn floating_pieces_settle_to_bottom() {
        let mut fx = fixture();
        fx.state.board.set(1, 3, Cell::new(fx.a)).unwrap();
        fx.state.board.set(2, 3, Cell::new(fx.b)).unwrap();

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();

        // 上下関係を保ったまま着地する
        assert_eq!(outcome.board.get(5, 3), Some(Cell::new(fx.a)));
        assert_eq!(outcome.board.get(6, 3), Some(Cell::new(fx.b)));
        assert_eq!(outcome.score.combos, 0);
    }

    #[test]
    fn frozen_cell_blocks_falling_and_feeding() {
        let mut fx = fixture();
        fx.state.board.set(4, 3, Cell::frozen(fx.b)).unwrap();
        fx.state.board.set(2, 3, Cell::new(fx.a)).unwrap();

        let mut columns: [Vec<SpeciesId>; COLS] = Default::default();
        columns[2] = vec![fx.d, fx.e, fx.d, fx.e];
        let feeder = Feeder::from_columns(columns);

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &feeder, 0).unwrap();

        // 凍結マスの上の区間: Aが(3,3)へ落ち、(1,3)(2,3)にD,Eが入る
        assert_eq!(outcome.board.get(3, 3), Some(Cell::new(fx.a)));
        assert_eq!(outcome.board.get(2, 3), Some(Cell::new(fx.d)));
        assert_eq!(outcome.board.get(1, 3), Some(Cell::new(fx.e)));
        // 凍結マスは動かない
        assert_eq!(outcome.board.get(4, 3), Some(Cell::frozen(fx.b)));
        // 凍結マスの下の区間には補充されない
        assert_eq!(outcome.board.get(5, 3), Some(Cell::AIR));
        assert_eq!(outcome.board.get(6, 3), Some(Cell::AIR));
        assert_eq!(outcome.score.feeder_used, 2);
    }

    #[test]
    fn simple_match_scores_base_attack() {
        let mut fx = fixture();
        fx.state.board.set(6, 1, Cell::new(fx.a)).unwrap();
        fx.state.board.set(6, 2, Cell::new(fx.a)).unwrap();
        fx.state.board.set(6, 4, Cell::new(fx.a)).unwrap();

        let snap = snap_of(&fx.state);
        let swap = Swap::new(Coord::new(6, 4), Coord::new(6, 3));
        let outcome = run_trial(&snap, Some(&swap), &Feeder::empty(), 0).unwrap();

        assert_eq!(outcome.score.damage, 100);
        assert_eq!(outcome.score.combos, 1);
        assert!(!outcome.score.cleared);
        assert_eq!(outcome.score.disruptions_left, 0);
    }

    #[test]
    fn longer_runs_use_length_bonus() {
        let mut fx = fixture();
        for col in 1..=4 {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert_eq!(outcome.score.damage, 150);

        for col in 1..=COLS {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert_eq!(outcome.score.damage, 300);
        assert_eq!(outcome.score.combos, 1);
    }

    #[test]
    fn cascade_raises_chain_multiplier() {
        let mut fx = fixture();
        // 列3を満杯にしておく: B,A,A,A,D,E（縦AAAが1コンボ目）
        fx.state.board.set(1, 3, Cell::new(fx.b)).unwrap();
        fx.state.board.set(2, 3, Cell::new(fx.a)).unwrap();
        fx.state.board.set(3, 3, Cell::new(fx.a)).unwrap();
        fx.state.board.set(4, 3, Cell::new(fx.a)).unwrap();
        fx.state.board.set(5, 3, Cell::new(fx.d)).unwrap();
        fx.state.board.set(6, 3, Cell::new(fx.e)).unwrap();
        // 消去後、残ったBと補充のB2個が縦に揃って2コンボ目になる
        let mut columns: [Vec<SpeciesId>; COLS] = Default::default();
        columns[2] = vec![fx.b, fx.b];
        let feeder = Feeder::from_columns(columns);

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &feeder, 0).unwrap();

        // 100*1.0 + 100*1.1
        assert_eq!(outcome.score.damage, 210);
        assert_eq!(outcome.score.combos, 2);
        assert_eq!(outcome.score.feeder_used, 2);

        let mut expected = Board::new();
        expected.set(5, 3, Cell::new(fx.d)).unwrap();
        expected.set(6, 3, Cell::new(fx.e)).unwrap();
        assert_eq!(outcome.board, expected);
    }

    #[test]
    fn exact_outcome_with_hand_built_feeder() {
        let mut fx = fixture();
        fx.state.board.set(4, 2, Cell::new(fx.a)).unwrap();
        fx.state.board.set(5, 2, Cell::new(fx.a)).unwrap();
        fx.state.board.set(6, 2, Cell::new(fx.b)).unwrap();
        fx.state.board.set(6, 3, Cell::new(fx.a)).unwrap();

        let mut columns: [Vec<SpeciesId>; COLS] = Default::default();
        columns[1] = vec![fx.d, fx.e, fx.d];
        let feeder = Feeder::from_columns(columns);

        let snap = snap_of(&fx.state);
        // (6,3)のAを(6,2)のBと入れ替えて列2を縦AAAにする
        let swap = Swap::new(Coord::new(6, 3), Coord::new(6, 2));
        let outcome = run_trial(&snap, Some(&swap), &feeder, 0).unwrap();

        assert_eq!(outcome.score.damage, 100);
        assert_eq!(outcome.score.combos, 1);
        assert_eq!(outcome.score.feeder_used, 3);

        // 消去後: 補充されたD,E,Dが下詰めで残り、Bは(6,3)に落ちたまま
        let mut expected = Board::new();
        expected.set(4, 2, Cell::new(fx.d)).unwrap();
        expected.set(5, 2, Cell::new(fx.e)).unwrap();
        expected.set(6, 2, Cell::new(fx.d)).unwrap();
        expected.set(6, 3, Cell::new(fx.b)).unwrap();
        assert_eq!(outcome.board, expected);
    }

    #[test]
    fn frozen_run_unfreezes_and_keeps_piece() {
        let mut fx = fixture();
        fx.state.board.set(6, 1, Cell::frozen(fx.a)).unwrap();
        fx.state.board.set(6, 2, Cell::new(fx.a)).unwrap();
        fx.state.board.set(6, 3, Cell::new(fx.a)).unwrap();

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();

        // 凍結マスは解除されてピースが残り、2度目の並びは起きない
        assert_eq!(outcome.board.get(6, 1), Some(Cell::new(fx.a)));
        assert_eq!(outcome.board.get(6, 2), Some(Cell::AIR));
        assert_eq!(outcome.score.combos, 1);
        assert_eq!(outcome.score.disruptions_left, 0);
    }

    #[test]
    fn attack_power_up_doubles_damage() {
        let mut fx = fixture();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        fx.state.attack_power_up = true;

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert_eq!(outcome.score.damage, 200);
    }

    #[test]
    fn active_mega_multiplies_damage() {
        let mut fx = fixture();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        fx.state.team.mega_slot = Some(fx.a);
        fx.state.team.mega_threshold = 3;
        fx.state.mega_progress = 3;

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();

        assert_eq!(outcome.score.damage, 150);
        // ゲージは上限で頭打ちなので増えない
        assert_eq!(outcome.score.mega_gain, 0);
    }

    #[test]
    fn mega_slot_run_fills_gauge() {
        let mut fx = fixture();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        fx.state.team.mega_slot = Some(fx.a);
        fx.state.team.mega_threshold = 10;

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();

        // 発動前なのでボーナスは乗らず、並びの個数ぶんゲージが増える
        assert_eq!(outcome.score.damage, 100);
        assert_eq!(outcome.score.mega_gain, 3);
    }

    #[test]
    fn overfull_gauge_keeps_bonus_without_gain() {
        let mut fx = fixture();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        fx.state.team.mega_slot = Some(fx.a);
        fx.state.team.mega_threshold = 2;
        fx.state.mega_progress = 5;

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();

        // 貯まり過ぎたゲージでも発動扱いのまま、加算は起きない
        assert_eq!(outcome.score.damage, 150);
        assert_eq!(outcome.score.mega_gain, 0);
        assert_eq!(outcome.score.combos, 1);
    }

    #[test]
    fn surge_skill_multiplies_when_certain() {
        let mut fx = fixture();
        let s = fx
            .state
            .catalog
            .register("surge", 'S', 100, EffectKind::Surge)
            .unwrap();
        fx.state.team.members.push(TeamMember::new(s));
        fx.state.effect_table.set_odds(EffectKind::Surge, 3, 1, 1.0).unwrap();
        fx.state.effect_table.set_mult(EffectKind::Surge, 1, 3.0).unwrap();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(s)).unwrap();
        }

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert_eq!(outcome.score.damage, 300);
    }

    #[test]
    fn mega_boost_skill_feeds_gauge_not_damage() {
        let mut fx = fixture();
        let m = fx
            .state
            .catalog
            .register("booster", 'M', 100, EffectKind::MegaBoost)
            .unwrap();
        fx.state.team.members.push(TeamMember::new(m));
        fx.state.team.mega_slot = Some(fx.a);
        fx.state.team.mega_threshold = 20;
        fx.state
            .effect_table
            .set_odds(EffectKind::MegaBoost, 3, 1, 1.0)
            .unwrap();
        fx.state
            .effect_table
            .set_mult(EffectKind::MegaBoost, 1, 4.0)
            .unwrap();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(m)).unwrap();
        }

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();

        assert_eq!(outcome.score.damage, 100);
        assert_eq!(outcome.score.mega_gain, 4);
    }

    #[test]
    fn cleared_flag_follows_remaining_health() {
        let mut fx = fixture();
        for col in 1..=3 {
            fx.state.board.set(6, col, Cell::new(fx.a)).unwrap();
        }
        fx.state.remaining_health = 100;

        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert!(outcome.score.cleared);

        fx.state.remaining_health = 101;
        let snap = snap_of(&fx.state);
        let outcome = run_trial(&snap, None, &Feeder::empty(), 0).unwrap();
        assert!(!outcome.score.cleared);
    }

    #[test]
    fn disruption_census_counts_hindrances() {
        let mut fx = fixture();
        let coin = fx
            .state
            .catalog
            .register("coin", 'C', 0, EffectKind::Coin)
            .unwrap();
        let stray = fx
            .state
            .catalog
            .register("stray", 'X', 10, EffectKind::Plain)
            .unwrap();
        let mut board = Board::new();
        board.set(6, 1, Cell::new(fx.a)).unwrap();
        board.set(6, 2, Cell::frozen(fx.a)).unwrap();
        board.set(6, 3, Cell::new(coin)).unwrap();
        board.set(6, 4, Cell::new(stray)).unwrap();

        let snap = snap_of(&fx.state);
        // 編成中のA(通常)は妨害でない。凍結A・コイン・編成外Xは妨害
        assert_eq!(count_disruptions(&board, &snap), 3);
    }
}
