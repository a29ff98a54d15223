// 計測モジュール

use std::time::Duration;

/// 検索パイプラインの段階別処理時間
#[derive(Default, Clone, Copy, Debug)]
pub struct StageTimes {
    pub prep: Duration,
    pub settle: Duration,
    pub dispatch: Duration,
    pub aggregate: Duration,
    pub grade: Duration,
}

impl StageTimes {
    /// 段階別時間の合計
    pub fn total(&self) -> Duration {
        self.prep + self.settle + self.dispatch + self.aggregate + self.grade
    }
}

/// StageTimes に何らかのデータがあるかチェック
pub fn stage_times_has_any(t: &StageTimes) -> bool {
    t.total() != Duration::ZERO
}

/// 計測マクロ：enabled 時のみ計測
#[macro_export]
macro_rules! prof {
    ($enabled:expr, $slot:expr, $e:expr) => {{
        if $enabled {
            let __t0 = std::time::Instant::now();
            let __r = $e;
            $slot += __t0.elapsed();
            __r
        } else {
            $e
        }
    }};
}

/// Duration をミリ秒文字列に整形
pub fn fmt_dur_ms(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms < 1.0 {
        format!("{:.3} ms", ms)
    } else {
        format!("{:.1} ms", ms)
    }
}
