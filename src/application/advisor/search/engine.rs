// 手探索エンジン

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use rayon::prelude::*;
use std::sync::Arc;

use crate::application::advisor::acceptor::ResultAcceptor;
use crate::application::advisor::event::SearchEvent;
use crate::application::advisor::search::aggregator::aggregate_outcomes;
use crate::application::advisor::search::dispatcher::run_trials;
use crate::application::advisor::search::feeder::generate_feeders;
use crate::application::advisor::search::moves::possible_moves;
use crate::application::advisor::search::trial::TrialOutcome;
use crate::application::advisor::snapshot::SearchSnapshot;
use crate::application::progress::ProgressManager;
use crate::domain::search::result::{MoveResult, Swap};
use crate::profiling::{fmt_dur_ms, stage_times_has_any, StageTimes};
use crate::{prof, vlog};

/// 検索本体（ワーカースレッド側の入口）
///
/// 計算結果は、受け取り口の世代トークンが検索開始時のものと
/// 一致している場合のみ渡す。一致しなければ黙って捨てる。
pub fn run_search(
    snap: Arc<SearchSnapshot>,
    acceptor: Arc<dyn ResultAcceptor>,
    progress: Arc<ProgressManager>,
    tx: Sender<SearchEvent>,
) {
    match compute_results(&snap, &progress, &tx) {
        Ok(results) => {
            if acceptor.accepted_token() == snap.token() {
                acceptor.accept_results(results);
            } else {
                vlog!(
                    "世代トークン不一致のため結果を破棄 (token={})",
                    snap.token().0
                );
                let _ = tx.send(SearchEvent::Log(
                    "検索結果は古くなったため破棄しました".into(),
                ));
            }
        }
        Err(err) => {
            vlog!("検索に失敗しました: {:#}", err);
            let _ = tx.send(SearchEvent::Error(format!("検索に失敗しました: {:#}", err)));
        }
    }
    let _ = tx.send(SearchEvent::Finished(progress.snapshot_progress(false)));
}

fn compute_results(
    snap: &SearchSnapshot,
    progress: &ProgressManager,
    tx: &Sender<SearchEvent>,
) -> Result<Vec<MoveResult>> {
    let config = snap.config();
    let profile_enabled = config.profile_enabled;
    let base_seed = config.base_seed.unwrap_or_else(rand::random::<u64>);
    let mut times = StageTimes::default();

    let _ = tx.send(SearchEvent::Log(format!(
        "検索開始: フィーダ={} / シード={} / 採点={:?} / 計測={}",
        config.feeder_count.get(),
        base_seed,
        snap.grading(),
        if profile_enabled { "ON" } else { "OFF" }
    )));

    // 無操作で盤面が動くなら、手は評価せず整地結果だけを返す
    let settled = prof!(
        profile_enabled,
        times.settle,
        settle_check(snap, base_seed, progress)?
    );
    if let Some(result) = settled {
        let _ = tx.send(SearchEvent::Log(
            "盤面が整地されていないため、整地結果のみを返します".into(),
        ));
        progress.set_moves_total(1);
        progress.add_moves_done(1);
        return Ok(vec![result]);
    }

    let board_moves = prof!(
        profile_enabled,
        times.prep,
        possible_moves(snap.board(), snap.catalog())
    );
    let _ = tx.send(SearchEvent::Log(format!("合法手: {}", board_moves.len())));
    progress.set_moves_total(board_moves.len() as u64);
    if board_moves.is_empty() {
        return Ok(Vec::new());
    }

    let feeders = prof!(
        profile_enabled,
        times.prep,
        generate_feeders(
            config.feeder_height.get(),
            snap.stage(),
            snap.auto_pool(),
            config.feeder_count.get(),
            base_seed,
        )
    );
    let _ = tx.send(SearchEvent::Log(format!(
        "フィーダ生成: {}本 / 深さ={}",
        feeders.len(),
        feeders.first().map(|f| f.depth(1)).unwrap_or(0)
    )));

    // 全ての手に同じフィーダ群を使い、手ごとに試行を流す
    let per_move: Vec<(Swap, Vec<TrialOutcome>)> = prof!(
        profile_enabled,
        times.dispatch,
        board_moves
            .par_iter()
            .map(|&swap| {
                let outcomes = run_trials(snap, Some(&swap), &feeders, base_seed, progress);
                progress.add_moves_done(1);
                let _ = tx.send(SearchEvent::Progress(progress.snapshot_progress(true)));
                (swap, outcomes)
            })
            .collect()
    );

    let mut results: Vec<MoveResult> = prof!(
        profile_enabled,
        times.aggregate,
        per_move
            .into_par_iter()
            .filter_map(|(swap, outcomes)| aggregate_outcomes(Some(swap), &outcomes))
            .collect()
    );

    prof!(profile_enabled, times.grade, snap.grading().rank(&mut results));

    let _ = tx.send(SearchEvent::Log(format!(
        "検索完了: 手={} / 試行={} / {:.2}秒",
        results.len(),
        progress.snapshot_progress(false).trials_done,
        progress.elapsed().as_secs_f64()
    )));

    if profile_enabled && stage_times_has_any(&times) {
        let _ = tx.send(SearchEvent::Log(format!(
            "計測: 整地={} / 準備={} / 試行={} / 集約={} / 採点={}",
            fmt_dur_ms(times.settle),
            fmt_dur_ms(times.prep),
            fmt_dur_ms(times.dispatch),
            fmt_dur_ms(times.aggregate),
            fmt_dur_ms(times.grade)
        )));
        let _ = tx.send(SearchEvent::Profile(times));
    }

    Ok(results)
}

/// 無操作の試行で盤面が変化するか調べる
///
/// 変化しなければ None（整地済み）。変化するなら整地のみの
/// 結果を返す。
fn settle_check(
    snap: &SearchSnapshot,
    base_seed: u64,
    progress: &ProgressManager,
) -> Result<Option<MoveResult>> {
    let feeders = generate_feeders(
        0,
        snap.stage(),
        snap.auto_pool(),
        snap.config().feeder_count.get(),
        base_seed,
    );
    let outcomes = run_trials(snap, None, &feeders, base_seed, progress);
    let result =
        aggregate_outcomes(None, &outcomes).context("整地チェックの試行が全て失敗しました")?;
    if result.board == *snap.board() {
        Ok(None)
    } else {
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    use crate::application::advisor::acceptor::{MemoryAcceptor, SearchToken};
    use crate::application::advisor::snapshot::{SearchSnapshot, StaticPlayerState};
    use crate::domain::board::Board;
    use crate::domain::species::{EffectKind, SpeciesCatalog};
    use crate::domain::team::{Team, TeamMember};

    fn latin_catalog() -> SpeciesCatalog {
        let mut catalog = SpeciesCatalog::new();
        catalog.register("alpha", 'A', 100, EffectKind::Plain).unwrap();
        catalog.register("beta", 'B', 100, EffectKind::Plain).unwrap();
        catalog.register("gamma", 'G', 100, EffectKind::Plain).unwrap();
        catalog
    }

    fn latin_team(catalog: &SpeciesCatalog) -> Team {
        Team::new(vec![
            TeamMember::new(catalog.id_of("alpha").unwrap()),
            TeamMember::new(catalog.id_of("beta").unwrap()),
            TeamMember::new(catalog.id_of("gamma").unwrap()),
        ])
    }

    /// 満杯で並びのない盤面（行6のみ細工して合法手を作る）
    fn full_board(catalog: &SpeciesCatalog) -> Board {
        let text = "ABGABG\nBGABGA\nGABGAB\nABGABG\nBGABGA\nAABGAB";
        Board::parse(text, catalog).unwrap()
    }

    fn full_state() -> StaticPlayerState {
        let catalog = latin_catalog();
        let team = latin_team(&catalog);
        let board = full_board(&catalog);
        let mut state = StaticPlayerState::new(board, catalog, team);
        state.search_config.base_seed = Some(42);
        state
    }

    #[test]
    fn publishes_ranked_results_for_all_legal_moves() {
        let state = full_state();
        let snap = SearchSnapshot::capture(&state, SearchToken(1)).unwrap();
        let legal = possible_moves(snap.board(), snap.catalog());
        assert!(!legal.is_empty());

        let acceptor = Arc::new(MemoryAcceptor::new(SearchToken(1)));
        let progress = Arc::new(ProgressManager::new());
        let (tx, rx) = unbounded();

        run_search(Arc::new(snap.clone()), acceptor.clone(), progress.clone(), tx);

        assert_eq!(acceptor.call_count(), 1);
        let results = &acceptor.received()[0];
        assert_eq!(results.len(), legal.len());

        // 全ての合法手が1回ずつ現れ、採点順に並んでいる
        for result in results {
            assert!(legal.contains(&result.swap.unwrap()));
        }
        for pair in results.windows(2) {
            assert_ne!(
                snap.grading().cmp(&pair[0], &pair[1]),
                std::cmp::Ordering::Greater
            );
        }

        let events: Vec<SearchEvent> = rx.try_iter().collect();
        assert!(matches!(events.last(), Some(SearchEvent::Finished(_))));

        let report = progress.snapshot_progress(false);
        assert_eq!(report.moves_done, legal.len() as u64);
    }

    #[test]
    fn same_seed_publishes_identical_results() {
        let run = || {
            let state = full_state();
            let snap = SearchSnapshot::capture(&state, SearchToken(1)).unwrap();
            let acceptor = Arc::new(MemoryAcceptor::new(SearchToken(1)));
            let (tx, _rx) = unbounded();
            run_search(
                Arc::new(snap),
                acceptor.clone(),
                Arc::new(ProgressManager::new()),
                tx,
            );
            acceptor.received()[0].clone()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn stale_token_discards_results() {
        let state = full_state();
        let snap = SearchSnapshot::capture(&state, SearchToken(1)).unwrap();
        // 受け取り口は既に世代2へ進んでいる
        let acceptor = Arc::new(MemoryAcceptor::new(SearchToken(2)));
        let (tx, rx) = unbounded();

        run_search(
            Arc::new(snap),
            acceptor.clone(),
            Arc::new(ProgressManager::new()),
            tx,
        );

        assert_eq!(acceptor.call_count(), 0);
        let events: Vec<SearchEvent> = rx.try_iter().collect();
        assert!(matches!(events.last(), Some(SearchEvent::Finished(_))));
    }

    #[test]
    fn unsettled_board_returns_settle_only_result() {
        let catalog = latin_catalog();
        let team = latin_team(&catalog);
        // 行6に既成立の並びがある
        let text = "......\n......\n......\n......\n......\nAAAB..";
        let board = Board::parse(text, &catalog).unwrap();
        let mut state = StaticPlayerState::new(board, catalog, team);
        state.search_config.base_seed = Some(42);

        let snap = SearchSnapshot::capture(&state, SearchToken(1)).unwrap();
        let acceptor = Arc::new(MemoryAcceptor::new(SearchToken(1)));
        let (tx, _rx) = unbounded();

        run_search(
            Arc::new(snap),
            acceptor.clone(),
            Arc::new(ProgressManager::new()),
            tx,
        );

        let results = &acceptor.received()[0];
        assert_eq!(results.len(), 1);
        assert!(results[0].swap.is_none());
        assert!(results[0].score.combos >= 1.0);
    }

    #[test]
    fn board_without_moves_publishes_empty_list() {
        let mut catalog = SpeciesCatalog::new();
        let a = catalog.register("alpha", 'A', 100, EffectKind::Plain).unwrap();
        catalog.register("coin", 'C', 0, EffectKind::Coin).unwrap();
        let team = Team::new(vec![TeamMember::new(a)]);
        // コインだけの満杯盤面: つまめるピースがない
        let text = "CCCCCC\n".repeat(5) + "CCCCCC";
        let board = Board::parse(&text, &catalog).unwrap();
        let mut state = StaticPlayerState::new(board, catalog, team);
        state.search_config.base_seed = Some(42);

        let snap = SearchSnapshot::capture(&state, SearchToken(1)).unwrap();
        let acceptor = Arc::new(MemoryAcceptor::new(SearchToken(1)));
        let (tx, _rx) = unbounded();

        run_search(
            Arc::new(snap),
            acceptor.clone(),
            Arc::new(ProgressManager::new()),
            tx,
        );

        assert_eq!(acceptor.call_count(), 1);
        assert!(acceptor.received()[0].is_empty());
    }
}
