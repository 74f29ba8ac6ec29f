//! 推荐服务响应规范化
//! 输入为已成功解码的任意 JSON，输出固定形态；从不返回错误，只把无法解析的字段降级为 None/空

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::fields::{self, bool_field, list_field, number_field, pick, string_field};
use super::model::{AiPick, JobInfo, RecommendationItem, RecommendationSet, RegionDetail};
use super::parts::{to_dwelling_info, to_infra_counts, to_job_info, to_support_entries};
use crate::region::RegionIndex;

/// 规范化器；携带区划索引时会用编码补全缺失的省份/区县名称
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer<'a> {
    regions: Option<&'a RegionIndex>,
}

impl<'a> Normalizer<'a> {
    pub fn new() -> Self {
        Self { regions: None }
    }

    pub fn with_regions(regions: &'a RegionIndex) -> Self {
        Self {
            regions: Some(regions),
        }
    }

    /// 推荐列表中的单项
    pub fn recommendation(&self, raw: &Value) -> RecommendationItem {
        let mut item = RecommendationItem {
            sido_code: string_field(raw, fields::SIDO_CODE),
            sido_name: string_field(raw, fields::SIDO_NAME),
            sigungu_code: string_field(raw, fields::SIGUNGU_CODE),
            sigungu_name: string_field(raw, fields::SIGUNGU_NAME),
            score: number_field(raw, fields::SCORE),
            total_job_info: to_job_info(pick(raw, fields::TOTAL_JOB_INFO)),
            fit_job_info: to_job_info(pick(raw, fields::FIT_JOB_INFO)),
            total_support_num: number_field(raw, fields::TOTAL_SUPPORT_NUM),
            fit_support_num: number_field(raw, fields::FIT_SUPPORT_NUM),
            dwelling_simple_info: to_dwelling_info(pick(raw, fields::DWELLING_SIMPLE)),
            infra_majors: to_infra_counts(list_field(raw, fields::INFRA_MAJORS, &[])),
            is_ai_pick: false,
            ai_pick_reason: None,
        };
        self.enrich_names(
            &mut item.sido_code,
            &mut item.sido_name,
            &item.sigungu_code,
            &mut item.sigungu_name,
        );
        item
    }

    /// 推荐接口完整响应：兼容裸数组（旧版）与 `{items, aiPick}`（新版）
    pub fn recommendations(&self, raw: &Value) -> RecommendationSet {
        let (items, picks): (&[Value], &[Value]) = match raw {
            Value::Array(items) => (items.as_slice(), &[]),
            Value::Object(_) => (
                list_field(raw, fields::RECOMMEND_ITEMS, &[]),
                list_field(raw, fields::AI_PICKS, &[]),
            ),
            _ => (&[], &[]),
        };

        RecommendationSet {
            items: items
                .iter()
                .filter(|item| item.is_object())
                .map(|item| self.recommendation(item))
                .collect(),
            ai_picks: picks
                .iter()
                .filter(|pick| pick.is_object())
                .map(|pick| AiPick {
                    sigungu_code: string_field(pick, fields::AI_PICK_CODE),
                    reason: string_field(pick, fields::AI_PICK_REASON),
                })
                .collect(),
        }
    }

    /// 区县详情
    pub fn detail(&self, raw: &Value) -> RegionDetail {
        let legacy_job_info = |candidates: fields::FieldCandidates| {
            number_field(raw, candidates).map(|count| JobInfo {
                count: Some(count),
                url: string_field(raw, fields::LEGACY_JOB_URL),
            })
        };
        let total_job_info = to_job_info(pick(raw, fields::TOTAL_JOB_INFO))
            .or_else(|| legacy_job_info(fields::LEGACY_TOTAL_JOBS));
        let fit_job_info = to_job_info(pick(raw, fields::FIT_JOB_INFO))
            .or_else(|| legacy_job_info(fields::LEGACY_FIT_JOBS));
        let job_url = total_job_info
            .as_ref()
            .and_then(|info| info.url.clone())
            .or_else(|| string_field(raw, fields::LEGACY_JOB_URL));

        let mut detail = RegionDetail {
            sido_code: string_field(raw, fields::SIDO_CODE),
            sido_name: string_field(raw, fields::SIDO_NAME),
            sigungu_code: string_field(raw, fields::SIGUNGU_CODE),
            sigungu_name: string_field(raw, fields::SIGUNGU_NAME),
            ai_use: bool_field(raw, fields::AI_USE),
            ai_summary: string_field(raw, fields::AI_SUMMARY),
            population: number_field(raw, fields::POPULATION),
            total_job_info,
            fit_job_info,
            job_url,
            total_support_num: number_field(raw, fields::TOTAL_SUPPORT_NUM),
            fit_support_num: number_field(raw, fields::FIT_SUPPORT_NUM),
            support_list: to_support_entries(raw),
            dwelling_info: to_dwelling_info(pick(raw, fields::DWELLING_DETAIL)),
            infra_details: to_infra_counts(list_field(raw, fields::INFRA_DETAILS, &[])),
        };
        self.enrich_names(
            &mut detail.sido_code,
            &mut detail.sido_name,
            &detail.sigungu_code,
            &mut detail.sigungu_name,
        );
        detail
    }

    /// 只补缺失字段，不覆盖服务端给出的值
    fn enrich_names(
        &self,
        sido_code: &mut Option<String>,
        sido_name: &mut Option<String>,
        sigungu_code: &Option<String>,
        sigungu_name: &mut Option<String>,
    ) {
        let Some(regions) = self.regions else {
            return;
        };

        if let Some(district) = sigungu_code
            .as_deref()
            .and_then(|code| regions.resolve_district(code.trim()))
        {
            if sigungu_name.is_none() && !district.name.is_empty() {
                *sigungu_name = Some(district.name.clone());
            }
            if sido_code.is_none() {
                *sido_code = Some(district.province_code.clone());
            }
        }

        if sido_name.is_none() {
            *sido_name = sido_code
                .as_deref()
                .and_then(|code| regions.province_name(code.trim()))
                .map(str::to_string);
        }
    }
}

pub fn normalize_recommendation(raw: &Value) -> RecommendationItem {
    Normalizer::new().recommendation(raw)
}

pub fn normalize_recommendations(raw: &Value) -> RecommendationSet {
    Normalizer::new().recommendations(raw)
}

pub fn normalize_detail(raw: &Value) -> RegionDetail {
    Normalizer::new().detail(raw)
}

impl RecommendationSet {
    /// 标注 AI 推荐并排序：AI 推荐按 AI 给出的顺序排在最前，其余保持服务端顺序
    pub fn ranked(&self) -> Vec<RecommendationItem> {
        let mut ai_order: Vec<&str> = Vec::new();
        let mut reasons: HashMap<&str, String> = HashMap::new();
        for pick in &self.ai_picks {
            let Some(code) = pick.sigungu_code.as_deref().map(str::trim).filter(|c| !c.is_empty()) else {
                continue;
            };
            ai_order.push(code);
            reasons.insert(
                code,
                pick.reason.as_deref().map(str::trim).unwrap_or_default().to_string(),
            );
        }

        let annotated: Vec<RecommendationItem> = self
            .items
            .iter()
            .map(|item| {
                let mut item = item.clone();
                let reason = item.match_code().and_then(|code| reasons.get(code)).cloned();
                item.is_ai_pick = reason.is_some();
                item.ai_pick_reason = reason;
                item
            })
            .collect();

        let mut picked: HashSet<&str> = HashSet::new();
        let mut ranked: Vec<RecommendationItem> = Vec::with_capacity(annotated.len());
        for code in ai_order {
            if picked.contains(code) {
                continue;
            }
            if let Some(item) = annotated.iter().find(|item| item.match_code() == Some(code)) {
                picked.insert(code);
                ranked.push(item.clone());
            }
        }

        ranked.extend(
            annotated
                .iter()
                .filter(|item| item.match_code().is_none_or(|code| !picked.contains(code)))
                .cloned(),
        );
        ranked
    }
}
