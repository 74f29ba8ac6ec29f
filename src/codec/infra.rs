//! 基础设施大类（位掩码固定选项表）

use std::fmt;

use serde::{Deserialize, Serialize};

use super::bitmask::{self, BitmaskOption};

/// 基础设施大类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InfraMajor {
    Health,
    Food,
    Culture,
    Life,
}

impl InfraMajor {
    /// 位掩码使用的固定顺序，不可随意调整（服务端按同一顺序解码）
    pub const ALL: [InfraMajor; 4] = [
        InfraMajor::Health,
        InfraMajor::Food,
        InfraMajor::Culture,
        InfraMajor::Life,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            InfraMajor::Health => "HEALTH",
            InfraMajor::Food => "FOOD",
            InfraMajor::Culture => "CULTURE",
            InfraMajor::Life => "LIFE",
        }
    }

    /// 大小写不敏感地解析标签
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        Self::ALL
            .into_iter()
            .find(|major| major.tag().eq_ignore_ascii_case(tag))
    }

    /// 展示名称
    pub fn label(&self) -> &'static str {
        match self {
            InfraMajor::Health => "의료",
            InfraMajor::Food => "음식",
            InfraMajor::Culture => "문화",
            InfraMajor::Life => "생활",
        }
    }

    pub fn encode_all(selected: &[InfraMajor]) -> u64 {
        bitmask::encode(&Self::ALL, selected.iter().map(|m| m.tag()))
    }

    pub fn decode_all(mask: u64) -> Vec<InfraMajor> {
        bitmask::decode(&Self::ALL, mask)
            .iter()
            .filter_map(|tag| Self::from_tag(tag))
            .collect()
    }
}

impl BitmaskOption for InfraMajor {
    fn option_id(&self) -> &str {
        self.tag()
    }
}

impl fmt::Display for InfraMajor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
