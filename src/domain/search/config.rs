// 検索設定のValue Objects

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// フィーダ本数を表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeederCount(u32);

impl FeederCount {
    pub fn new(count: u32) -> Result<Self> {
        if count == 0 {
            return Err(anyhow!("フィーダ本数は1以上である必要があります"));
        }
        if count > 1000 {
            return Err(anyhow!("フィーダ本数が大きすぎます: {}", count));
        }
        Ok(Self(count))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// フィーダ列の最小深さを表すValue Object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeederHeight(u8);

impl FeederHeight {
    pub fn new(height: u8) -> Result<Self> {
        if height > 64 {
            return Err(anyhow!("フィーダ深さが大きすぎます: {}", height));
        }
        Ok(Self(height))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// ステージ設定のみに従う（下限なし）
    pub fn zero() -> Self {
        Self(0)
    }
}

/// 検索設定のValue Object
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    pub feeder_count: FeederCount,
    pub feeder_height: FeederHeight,
    /// 未指定ならエントロピーから採番する乱数シード
    pub base_seed: Option<u64>,
    pub profile_enabled: bool,
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        // Value Objectsで既に検証済み
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            feeder_count: FeederCount::new(50).unwrap(),
            feeder_height: FeederHeight::zero(),
            base_seed: None,
            profile_enabled: false,
        }
    }
}
