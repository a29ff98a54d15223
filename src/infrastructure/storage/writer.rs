// 評価結果の書き込み

use anyhow::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::search::MoveResult;

/// 評価結果を書き込むためのtrait
pub trait ResultWriter: Send {
    /// 単一の結果を書き込む
    fn write_result(&mut self, result: &MoveResult) -> Result<()>;

    /// 採点済みの結果一覧をまとめて書き込む
    fn write_batch(&mut self, results: &[MoveResult]) -> Result<()> {
        for result in results {
            self.write_result(result)?;
        }
        Ok(())
    }

    /// 書き込みを完了（フラッシュ）
    fn flush(&mut self) -> Result<()>;

    /// 書き込んだ結果数を取得
    fn count(&self) -> u64;
}

/// 出力フォーマット
#[derive(Clone, Copy, Debug)]
pub enum OutputFormat {
    /// JSON Lines形式（1行1結果）
    JsonLines,
    /// JSON配列形式
    JsonArray,
}

/// ファイルへの結果書き込み実装
pub struct FileResultWriter {
    writer: BufWriter<File>,
    count: u64,
    format: OutputFormat,
    closed: bool,
}

impl FileResultWriter {
    /// 新しいファイルライターを作成
    pub fn new(path: &Path, format: OutputFormat) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        if matches!(format, OutputFormat::JsonArray) {
            writer.write_all(b"[\n")?;
        }

        Ok(Self {
            writer,
            count: 0,
            format,
            closed: false,
        })
    }

    /// JSON Lines形式で作成
    pub fn json_lines(path: &Path) -> Result<Self> {
        Self::new(path, OutputFormat::JsonLines)
    }

    /// JSON配列形式で作成
    pub fn json_array(path: &Path) -> Result<Self> {
        Self::new(path, OutputFormat::JsonArray)
    }
}

impl ResultWriter for FileResultWriter {
    fn write_result(&mut self, result: &MoveResult) -> Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                let json = serde_json::to_string(result)?;
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::JsonArray => {
                if self.count > 0 {
                    writeln!(self.writer, ",")?;
                }
                let json = serde_json::to_string(result)?;
                write!(self.writer, "  {}", json)?;
            }
        }
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // 配列の閉じ括弧は一度だけ書く
        if matches!(self.format, OutputFormat::JsonArray) && !self.closed {
            writeln!(self.writer, "\n]")?;
            self.closed = true;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Drop for FileResultWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// メモリ内結果書き込み実装（テスト用）
pub struct MemoryResultWriter {
    results: Vec<MoveResult>,
}

impl MemoryResultWriter {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn results(&self) -> &[MoveResult] {
        &self.results
    }
}

impl Default for MemoryResultWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultWriter for MemoryResultWriter {
    fn write_result(&mut self, result: &MoveResult) -> Result<()> {
        self.results.push(result.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn count(&self) -> u64 {
        self.results.len() as u64
    }
}
