// 盤面定数

/// ====== 盤面定数 ======
pub const ROWS: usize = 6;
pub const COLS: usize = 6;
pub const CELLS: usize = ROWS * COLS;

/// 連鎖解決の安全上限（超えたら盤面が収束しないとみなす）
pub const MAX_CASCADE_ITERATIONS: u32 = 64;

/// 1始まり座標を配列インデックスに変換（範囲チェックなし）
pub const fn cell_index(row: usize, col: usize) -> usize {
    (row - 1) * COLS + (col - 1)
}
