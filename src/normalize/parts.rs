//! 子对象规范化：岗位、住房、基础设施、支援政策、编码表
//! 每个子对象独立处理，缺失或形态不对时返回 None / 空列表

use serde_json::Value;
use tracing::debug;

use super::fields::{self, list_field, number_field, pick, string_field};
use super::model::{DwellingInfo, InfraCount, JobInfo, SupportEntry};
use crate::api::CodeItem;
use crate::codec::InfraMajor;

pub fn to_job_info(raw: Option<&Value>) -> Option<JobInfo> {
    let raw = raw.filter(|v| v.is_object())?;
    Some(JobInfo {
        count: number_field(raw, fields::JOB_COUNT),
        url: pick(raw, fields::JOB_URL)
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

pub fn to_dwelling_info(raw: Option<&Value>) -> Option<DwellingInfo> {
    let raw = raw.filter(|v| v.is_object())?;
    Some(DwellingInfo {
        month_mid: number_field(raw, fields::MONTH_MID),
        jeonse_mid: number_field(raw, fields::JEONSE_MID),
        month_avg: number_field(raw, fields::MONTH_AVG),
        jeonse_avg: number_field(raw, fields::JEONSE_AVG),
    })
}

/// 基础设施列表：非对象元素不构成条目，直接跳过；未知大类标签原样保留在 tag 中
pub fn to_infra_counts(list: &[Value]) -> Vec<InfraCount> {
    list.iter()
        .filter(|item| item.is_object())
        .map(|item| {
            let tag = string_field(item, fields::INFRA_MAJOR);
            InfraCount {
                major: tag.as_deref().and_then(InfraMajor::from_tag),
                tag,
                name: string_field(item, fields::INFRA_NAME),
                num: number_field(item, fields::INFRA_NUM),
                score: number_field(item, fields::SCORE),
            }
        })
        .collect()
}

/// 单条支援政策；没有标题的条目无法展示，返回 None（唯一会丢弃数据的规则）
pub fn map_support_entry(raw: &Value) -> Option<SupportEntry> {
    let title = string_field(raw, fields::SUPPORT_TITLE)?;
    Some(SupportEntry {
        title,
        url: string_field(raw, fields::SUPPORT_URL),
        keyword: string_field(raw, fields::SUPPORT_KEYWORD),
    })
}

pub fn to_support_entries(raw: &Value) -> Vec<SupportEntry> {
    let list = list_field(raw, fields::SUPPORT_LIST, fields::SUPPORT_LIST_WRAPPER);
    let entries: Vec<SupportEntry> = list.iter().filter_map(map_support_entry).collect();
    if entries.len() < list.len() {
        debug!("丢弃无标题的支援政策 {} 条", list.len() - entries.len());
    }
    entries
}

/// 编码表接口：code 必填，name 缺失时为空字符串
pub fn to_code_items(raw: &Value) -> Vec<CodeItem> {
    let Some(list) = raw.as_array() else {
        return Vec::new();
    };
    list.iter()
        .filter_map(|item| {
            let code = string_field(item, fields::CODE)?;
            Some(CodeItem {
                code,
                name: string_field(item, fields::NAME).unwrap_or_default(),
            })
        })
        .collect()
}
