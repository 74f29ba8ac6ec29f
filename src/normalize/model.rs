//! 规范化后的推荐/详情数据模型
//! 上游字段可能缺失，所有可选字段都显式表示为 Option 或空列表

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::links::normalize_url;
use crate::api::CodeItem;
use crate::codec::InfraMajor;

/// 岗位数量与检索链接
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub count: Option<f64>,
    pub url: Option<String>,
}

/// 住房费用摘要（월세 / 전세）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DwellingInfo {
    pub month_mid: Option<f64>,
    pub jeonse_mid: Option<f64>,
    pub month_avg: Option<f64>,
    pub jeonse_avg: Option<f64>,
}

/// 基础设施大类计数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfraCount {
    pub major: Option<InfraMajor>,
    /// 上游给出的原始大类标签（未知标签也保留）
    pub tag: Option<String>,
    pub name: Option<String>,
    pub num: Option<f64>,
    pub score: Option<f64>,
}

/// 支援政策条目（标题必填）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportEntry {
    pub title: String,
    pub url: Option<String>,
    pub keyword: Option<String>,
}

impl SupportEntry {
    /// 可直接打开的链接
    pub fn link(&self) -> Option<String> {
        self.url.as_deref().and_then(normalize_url)
    }
}

/// 推荐列表中的一项
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationItem {
    pub sido_code: Option<String>,
    pub sido_name: Option<String>,
    pub sigungu_code: Option<String>,
    pub sigungu_name: Option<String>,
    pub score: Option<f64>,
    pub total_job_info: Option<JobInfo>,
    pub fit_job_info: Option<JobInfo>,
    pub total_support_num: Option<f64>,
    pub fit_support_num: Option<f64>,
    pub dwelling_simple_info: Option<DwellingInfo>,
    pub infra_majors: Vec<InfraCount>,
    pub is_ai_pick: bool,
    pub ai_pick_reason: Option<String>,
}

impl RecommendationItem {
    pub fn total_job_num(&self) -> Option<f64> {
        self.total_job_info.as_ref().and_then(|j| j.count)
    }

    pub fn fit_job_num(&self) -> Option<f64> {
        self.fit_job_info.as_ref().and_then(|j| j.count)
    }

    pub fn monthly_rent_mid(&self) -> Option<f64> {
        self.dwelling_simple_info.as_ref().and_then(|d| d.month_mid)
    }

    pub fn jeonse_mid(&self) -> Option<f64> {
        self.dwelling_simple_info.as_ref().and_then(|d| d.jeonse_mid)
    }

    /// 用于与 AI 推荐比对的区县编码（去首尾空白）
    pub fn match_code(&self) -> Option<&str> {
        self.sigungu_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// AI 推荐条目
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiPick {
    pub sigungu_code: Option<String>,
    pub reason: Option<String>,
}

/// 推荐接口的完整结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationSet {
    pub items: Vec<RecommendationItem>,
    pub ai_picks: Vec<AiPick>,
}

/// 区县详情
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDetail {
    pub sido_code: Option<String>,
    pub sido_name: Option<String>,
    pub sigungu_code: Option<String>,
    pub sigungu_name: Option<String>,
    pub ai_use: Option<bool>,
    pub ai_summary: Option<String>,
    pub population: Option<f64>,
    pub total_job_info: Option<JobInfo>,
    pub fit_job_info: Option<JobInfo>,
    pub job_url: Option<String>,
    pub total_support_num: Option<f64>,
    pub fit_support_num: Option<f64>,
    pub support_list: Vec<SupportEntry>,
    pub dwelling_info: Option<DwellingInfo>,
    pub infra_details: Vec<InfraCount>,
}

impl RegionDetail {
    pub fn total_jobs(&self) -> Option<f64> {
        self.total_job_info.as_ref().and_then(|j| j.count)
    }

    pub fn fit_jobs(&self) -> Option<f64> {
        self.fit_job_info.as_ref().and_then(|j| j.count)
    }

    pub fn job_link(&self) -> Option<String> {
        self.job_url.as_deref().and_then(normalize_url)
    }

    /// 按选中的支援标签编码过滤政策列表
    /// 条目关键字可能是标签名称，借助标签表转换为编码后再比较；未选择任何标签时返回全部
    pub fn filter_support<'a>(
        &'a self,
        selected_codes: &HashSet<String>,
        support_tags: &[CodeItem],
    ) -> Vec<&'a SupportEntry> {
        if selected_codes.is_empty() {
            return self.support_list.iter().collect();
        }

        self.support_list
            .iter()
            .filter(|entry| {
                let Some(keyword) = entry.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty()) else {
                    return false;
                };
                let code = support_tags
                    .iter()
                    .find(|tag| tag.name == keyword)
                    .map(|tag| tag.code.as_str())
                    .unwrap_or(keyword);
                selected_codes.contains(code)
            })
            .collect()
    }

    /// 转换为推荐卡片形态，用于区县对比与地图预览
    /// 基础设施按大类标签汇总数量；政策总数缺失时退回政策列表长度；住房只保留中位数
    pub fn to_summary(&self) -> RecommendationItem {
        let mut infra_majors: Vec<InfraCount> = Vec::new();
        for detail in &self.infra_details {
            let Some(tag) = detail.tag.as_deref() else {
                continue;
            };
            let num = detail.num.unwrap_or(0.0);
            match infra_majors.iter_mut().find(|c| c.tag.as_deref() == Some(tag)) {
                Some(existing) => existing.num = Some(existing.num.unwrap_or(0.0) + num),
                None => infra_majors.push(InfraCount {
                    major: detail.major,
                    tag: Some(tag.to_string()),
                    name: None,
                    num: Some(num),
                    score: None,
                }),
            }
        }

        let total_support_num = self.total_support_num.or_else(|| {
            (!self.support_list.is_empty()).then(|| self.support_list.len() as f64)
        });

        RecommendationItem {
            sido_code: self.sido_code.clone(),
            sido_name: self.sido_name.clone(),
            sigungu_code: self.sigungu_code.clone(),
            sigungu_name: self.sigungu_name.clone(),
            score: None,
            total_job_info: self.total_job_info.clone(),
            fit_job_info: self.fit_job_info.clone(),
            total_support_num,
            fit_support_num: self.fit_support_num,
            dwelling_simple_info: self.dwelling_info.as_ref().map(|d| DwellingInfo {
                month_mid: d.month_mid,
                jeonse_mid: d.jeonse_mid,
                ..Default::default()
            }),
            infra_majors,
            is_ai_pick: false,
            ai_pick_reason: None,
        }
    }
}

impl From<&RegionDetail> for RecommendationItem {
    fn from(detail: &RegionDetail) -> Self {
        detail.to_summary()
    }
}
