//! 推荐服务请求参数与编码表类型

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codec::{self, BitmaskOption, InfraMajor};

/// 编码表条目 `{code, name}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CodeItem {
    pub code: String,
    pub name: String,
}

/// 编码表种类；带上级编码的种类按上级编码分别缓存
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeKind {
    JobTop,
    JobMid { top_code: String },
    SupportTag,
    Sido,
    Sigungu { sido_code: String },
}

impl CodeKind {
    pub fn path(&self) -> &'static str {
        match self {
            CodeKind::JobTop => "/api/code/jobTop",
            CodeKind::JobMid { .. } => "/api/code/jobMid",
            CodeKind::SupportTag => "/api/code/supportTag",
            CodeKind::Sido => "/api/code/sido",
            CodeKind::Sigungu { .. } => "/api/code/sigungu",
        }
    }

    pub fn job_mid(top_code: &str) -> Self {
        CodeKind::JobMid {
            top_code: top_code.trim().to_string(),
        }
    }

    pub fn sigungu(sido_code: &str) -> Self {
        CodeKind::Sigungu {
            sido_code: sido_code.trim().to_string(),
        }
    }

    /// 上级编码（去首尾空白）；不需要上级编码的种类返回 None
    fn parent(&self) -> Option<&str> {
        match self {
            CodeKind::JobMid { top_code } => Some(top_code.trim()),
            CodeKind::Sigungu { sido_code } => Some(sido_code.trim()),
            _ => None,
        }
    }

    pub fn params(&self) -> Vec<(&'static str, Option<String>)> {
        match (self, self.parent()) {
            (CodeKind::JobMid { .. }, Some(top)) => vec![("topCode", Some(top.to_string()))],
            (CodeKind::Sigungu { .. }, Some(sido)) => vec![("sidoCode", Some(sido.to_string()))],
            _ => Vec::new(),
        }
    }

    /// 需要上级编码但上级编码为空
    pub fn missing_parent(&self) -> bool {
        self.parent().is_some_and(str::is_empty)
    }

    pub fn cache_key(&self) -> String {
        match (self, self.parent()) {
            (CodeKind::JobMid { .. }, Some(top)) => format!("jobMid:{}", top),
            (CodeKind::Sigungu { .. }, Some(sido)) => format!("sigungu:{}", sido),
            (CodeKind::JobTop, _) => "jobTop".to_string(),
            (CodeKind::SupportTag, _) => "supportTag".to_string(),
            _ => "sido".to_string(),
        }
    }
}

/// 住房类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DwellingType {
    /// 월세
    #[default]
    Monthly,
    /// 전세
    Jeonse,
}

impl DwellingType {
    pub fn as_param(&self) -> &'static str {
        match self {
            DwellingType::Monthly => "MONTHLY",
            DwellingType::Jeonse => "JEONSE",
        }
    }

    /// 默认价格档（单位：万韩元）
    pub fn default_price(&self) -> u32 {
        match self {
            DwellingType::Monthly => 60,
            DwellingType::Jeonse => 9000,
        }
    }
}

impl fmt::Display for DwellingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// 基础设施重要程度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InfraImportance {
    #[default]
    Low,
    Mid,
    High,
}

impl InfraImportance {
    pub fn as_param(&self) -> &'static str {
        match self {
            InfraImportance::Low => "LOW",
            InfraImportance::Mid => "MID",
            InfraImportance::High => "HIGH",
        }
    }
}

impl fmt::Display for InfraImportance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// 推荐接口参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationParams {
    pub dwelling_type: DwellingType,
    pub price: u32,
    pub infra_importance: InfraImportance,
    pub infra_choice: Option<u64>,
    pub support_choice: Option<u64>,
    pub support_tag: Option<String>,
    pub mid_job_code: Option<String>,
}

impl RecommendationParams {
    pub fn new(dwelling_type: DwellingType, price: u32, infra_importance: InfraImportance) -> Self {
        Self {
            dwelling_type,
            price,
            infra_importance,
            ..Default::default()
        }
    }

    /// 选中的基础设施大类编码为位掩码
    pub fn with_infra(mut self, selected: &[InfraMajor]) -> Self {
        self.infra_choice = Some(InfraMajor::encode_all(selected));
        self
    }

    /// 选中的支援标签按标签表顺序编码为位掩码
    pub fn with_support<O, S>(mut self, tags: &[O], selected_codes: &[S]) -> Self
    where
        O: BitmaskOption,
        S: AsRef<str>,
    {
        self.support_choice = Some(codec::encode(tags, selected_codes));
        self
    }

    pub fn with_mid_job_code(mut self, code: impl Into<String>) -> Self {
        self.mid_job_code = Some(code.into());
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("dwellingType", Some(self.dwelling_type.as_param().to_string())),
            ("price", Some(self.price.to_string())),
            ("infraImportance", Some(self.infra_importance.as_param().to_string())),
            ("infraChoice", self.infra_choice.map(|m| m.to_string())),
            ("supportChoice", self.support_choice.map(|m| m.to_string())),
            ("supportTag", self.support_tag.clone()),
            ("midJobCode", self.mid_job_code.clone()),
        ]
    }
}

/// 详情接口参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailParams {
    pub sigungu_code: String,
    pub mid_job_code: Option<String>,
    pub ai_use: Option<bool>,
}

impl DetailParams {
    pub fn new(sigungu_code: impl Into<String>) -> Self {
        Self {
            sigungu_code: sigungu_code.into(),
            ..Default::default()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("sigunguCode", Some(self.sigungu_code.clone())),
            ("midJobCode", self.mid_job_code.clone()),
            ("aiUse", self.ai_use.map(|b| b.to_string())),
        ]
    }
}

/// 旧版界面使用的筛选条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySearchFilters {
    pub housing_type: Option<String>,
    pub price_ranges: Option<Vec<String>>,
    pub occupation: Option<String>,
    pub support_tags: Option<Vec<String>>,
    pub infra_level: Option<String>,
}

/// 旧版支援标签名称 -> 标签编码
const LEGACY_SUPPORT_TAGS: &[(&str, &str)] = &[("주거지원", "HOUSING_SUPPORT")];

impl From<LegacySearchFilters> for RecommendationParams {
    fn from(filters: LegacySearchFilters) -> Self {
        let dwelling_type = match filters.housing_type.as_deref() {
            Some("전세") => DwellingType::Jeonse,
            _ => DwellingType::Monthly,
        };
        let infra_importance = match filters.infra_level.as_deref() {
            Some("3") => InfraImportance::High,
            Some("2") => InfraImportance::Mid,
            _ => InfraImportance::Low,
        };
        let support_tag = filters.support_tags.as_ref().and_then(|tags| {
            tags.iter().find_map(|tag| {
                LEGACY_SUPPORT_TAGS
                    .iter()
                    .find(|(name, _)| *name == tag.as_str())
                    .map(|(_, code)| code.to_string())
            })
        });

        Self {
            dwelling_type,
            price: dwelling_type.default_price(),
            infra_importance,
            support_tag,
            ..Default::default()
        }
    }
}
