//! 行政区划数据模型定义
//! 仅存储数据，无任何业务逻辑，支持序列化/反序列化

use serde::{Deserialize, Serialize};

/// 省级行政区（시도）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub code: String,
    pub name: String,
}

/// 区县级行政区（시군구），通过 province_code 归属唯一的省级行政区
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    #[serde(rename = "sidoCode")]
    pub province_code: String,
    pub code: String,
    pub name: String,
}

/// 按区县编码查询的结果
/// province_name 为空字符串表示上级省份未能解析
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictRef {
    pub name: String,
    #[serde(rename = "sidoCode")]
    pub province_code: String,
    #[serde(rename = "sidoName")]
    pub province_name: String,
}

/// 省份及其下属区县（已去重、按名称排序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceEntry {
    pub code: String,
    pub name: String,
    #[serde(rename = "sigungu")]
    pub districts: Vec<District>,
}

impl ProvinceEntry {
    /// 上级省份缺失时合成的占位条目
    pub fn placeholder(code: &str) -> Self {
        Self {
            code: code.to_string(),
            name: String::new(),
            districts: Vec::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.name.is_empty()
    }
}

/// 搜索/自动补全结果
/// 区县重名时 label 带上省份名称前缀
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DistrictMatch {
    pub code: String,
    pub name: String,
    pub province_code: String,
    pub label: String,
}
