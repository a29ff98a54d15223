// インフラ層 - 結果の書き出し

pub mod writer;

pub use writer::{FileResultWriter, MemoryResultWriter, OutputFormat, ResultWriter};
