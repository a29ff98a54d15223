// 結果の受け取り口と世代トークン

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::domain::search::result::MoveResult;

/// 検索要求の世代トークン
///
/// 検索開始時に発行し、公開時に現在値と照合する。
/// 照合に失敗した結果は捨てられる。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SearchToken(pub u64);

/// 検索結果の受け取り口
pub trait ResultAcceptor: Send + Sync {
    /// 現在受け付けている世代を返す
    fn accepted_token(&self) -> SearchToken;

    /// 採点順に並んだ結果一覧を受け取る
    fn accept_results(&self, results: Vec<MoveResult>);
}

/// チャネルへ結果を流す標準の受け取り口
pub struct ChannelAcceptor {
    current: AtomicU64,
    tx: Sender<Vec<MoveResult>>,
}

impl ChannelAcceptor {
    pub fn new() -> (Self, Receiver<Vec<MoveResult>>) {
        let (tx, rx) = unbounded();
        let acceptor = Self {
            current: AtomicU64::new(0),
            tx,
        };
        (acceptor, rx)
    }

    /// 次の世代を発行する（発行前の検索は公開時に弾かれる）
    pub fn next_token(&self) -> SearchToken {
        SearchToken(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl ResultAcceptor for ChannelAcceptor {
    fn accepted_token(&self) -> SearchToken {
        SearchToken(self.current.load(Ordering::SeqCst))
    }

    fn accept_results(&self, results: Vec<MoveResult>) {
        let _ = self.tx.send(results);
    }
}

/// メモリ内の受け取り口（テスト用）
pub struct MemoryAcceptor {
    current: AtomicU64,
    received: Mutex<Vec<Vec<MoveResult>>>,
}

impl MemoryAcceptor {
    pub fn new(token: SearchToken) -> Self {
        Self {
            current: AtomicU64::new(token.0),
            received: Mutex::new(Vec::new()),
        }
    }

    /// 受け付ける世代を差し替える
    pub fn set_token(&self, token: SearchToken) {
        self.current.store(token.0, Ordering::SeqCst);
    }

    /// 受領した結果一覧のコピーを返す
    pub fn received(&self) -> Vec<Vec<MoveResult>> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// accept_results が呼ばれた回数
    pub fn call_count(&self) -> usize {
        self.received.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

impl ResultAcceptor for MemoryAcceptor {
    fn accepted_token(&self) -> SearchToken {
        SearchToken(self.current.load(Ordering::SeqCst))
    }

    fn accept_results(&self, results: Vec<MoveResult>) {
        if let Ok(mut guard) = self.received.lock() {
            guard.push(results);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Board;
    use crate::domain::search::result::MoveScore;

    fn dummy_result() -> MoveResult {
        MoveResult {
            swap: None,
            score: MoveScore::default(),
            board: Board::new(),
            trials: 1,
        }
    }

    #[test]
    fn channel_acceptor_issues_increasing_tokens() {
        let (acceptor, _rx) = ChannelAcceptor::new();
        let t1 = acceptor.next_token();
        let t2 = acceptor.next_token();
        assert_eq!(t1, SearchToken(1));
        assert_eq!(t2, SearchToken(2));
        assert_eq!(acceptor.accepted_token(), t2);
    }

    #[test]
    fn channel_acceptor_forwards_results() {
        let (acceptor, rx) = ChannelAcceptor::new();
        acceptor.accept_results(vec![dummy_result(), dummy_result()]);
        let received = rx.recv().unwrap();
        assert_eq!(received.len(), 2);
    }

    #[test]
    fn memory_acceptor_records_calls() {
        let acceptor = MemoryAcceptor::new(SearchToken(7));
        assert_eq!(acceptor.accepted_token(), SearchToken(7));
        assert_eq!(acceptor.call_count(), 0);

        acceptor.accept_results(vec![dummy_result()]);
        acceptor.accept_results(vec![]);
        assert_eq!(acceptor.call_count(), 2);
        assert_eq!(acceptor.received()[0].len(), 1);
    }

    #[test]
    fn memory_acceptor_token_can_change() {
        let acceptor = MemoryAcceptor::new(SearchToken(1));
        acceptor.set_token(SearchToken(2));
        assert_eq!(acceptor.accepted_token(), SearchToken(2));
    }
}
