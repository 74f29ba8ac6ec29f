//! 字段兼容表与取值工具
//! 同一语义值在不同版本接口中可能使用不同字段名，这里为每个语义值列出候选字段名，
//! 按优先级依次尝试。所有"是否有值"的判断统一走 is_present

use serde_json::Value;

/// 候选字段名（按优先级）
pub type FieldCandidates = &'static [&'static str];

pub const SIDO_CODE: FieldCandidates = &["sidoCode"];
pub const SIDO_NAME: FieldCandidates = &["sidoName"];
pub const SIGUNGU_CODE: FieldCandidates = &["sigunguCode"];
pub const SIGUNGU_NAME: FieldCandidates = &["sigunguName"];
pub const SCORE: FieldCandidates = &["score"];

pub const TOTAL_JOB_INFO: FieldCandidates = &["totalJobInfo"];
pub const FIT_JOB_INFO: FieldCandidates = &["fitJobInfo"];
pub const JOB_COUNT: FieldCandidates = &["count"];
pub const JOB_URL: FieldCandidates = &["url"];
pub const LEGACY_JOB_URL: FieldCandidates = &["jobURL", "jobUrl"];
/// 旧版详情接口直接给出岗位数量
pub const LEGACY_TOTAL_JOBS: FieldCandidates = &["totalJobs"];
pub const LEGACY_FIT_JOBS: FieldCandidates = &["fitJobs"];

pub const TOTAL_SUPPORT_NUM: FieldCandidates = &["totalSupportNum"];
pub const FIT_SUPPORT_NUM: FieldCandidates = &["fitSupportNum"];

pub const DWELLING_SIMPLE: FieldCandidates = &["dwellingSimpleInfo", "dwellingInfo"];
pub const DWELLING_DETAIL: FieldCandidates = &["dwellingInfo", "dwellingSimpleInfo"];
pub const MONTH_MID: FieldCandidates = &["monthMid", "MonthMid", "month_mid"];
pub const JEONSE_MID: FieldCandidates = &["jeonseMid", "JeonseMid", "jeonse_mid"];
pub const MONTH_AVG: FieldCandidates = &["monthAvg", "MonthAvg", "month_avg"];
pub const JEONSE_AVG: FieldCandidates = &["jeonseAvg", "JeonseAvg", "jeonse_avg"];

pub const INFRA_MAJORS: FieldCandidates = &["infraMajors"];
pub const INFRA_DETAILS: FieldCandidates = &["infraDetails", "infra"];
pub const INFRA_MAJOR: FieldCandidates = &["major"];
pub const INFRA_NAME: FieldCandidates = &["name"];
pub const INFRA_NUM: FieldCandidates = &["num"];

pub const SUPPORT_LIST: FieldCandidates = &["supportList", "totalSupportList"];
/// 列表被对象包裹时的键
pub const SUPPORT_LIST_WRAPPER: FieldCandidates = &["supportDTOList"];
pub const SUPPORT_TITLE: FieldCandidates = &["plcyNm", "title"];
pub const SUPPORT_URL: FieldCandidates = &["aplyUrlAddr", "url"];
pub const SUPPORT_KEYWORD: FieldCandidates = &["plcyKywdNm", "keyword"];

pub const AI_USE: FieldCandidates = &["aiUse"];
pub const AI_SUMMARY: FieldCandidates = &["aiSummary"];
pub const POPULATION: FieldCandidates = &["population"];

pub const RECOMMEND_ITEMS: FieldCandidates = &["items"];
pub const AI_PICKS: FieldCandidates = &["aiPick", "aiPicks"];
pub const AI_PICK_CODE: FieldCandidates = &["aiPickSigunguCode"];
pub const AI_PICK_REASON: FieldCandidates = &["aiPickReason"];

pub const CODE: FieldCandidates = &["code"];
pub const NAME: FieldCandidates = &["name"];

/// 有值：非 null 且非空字符串
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// 按候选字段名依次取第一个有值的字段；非对象输入返回 None
pub fn pick<'a>(raw: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    let object = raw.as_object()?;
    candidates
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| is_present(value))
}

/// 按数值语义转换，结果非有限值时视为缺失，绝不补 0
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

pub fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(u)) => u.to_string(),
            _ => n.to_string(),
        }),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "y" | "yes" | "1" => Some(true),
            "false" | "n" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn number_field(raw: &Value, candidates: &[&str]) -> Option<f64> {
    pick(raw, candidates).and_then(coerce_number)
}

pub fn string_field(raw: &Value, candidates: &[&str]) -> Option<String> {
    pick(raw, candidates).and_then(coerce_string)
}

pub fn bool_field(raw: &Value, candidates: &[&str]) -> Option<bool> {
    pick(raw, candidates).and_then(coerce_bool)
}

/// 列表字段：接受裸数组，或用 wrapper 键包裹数组的对象；其他形态返回空
pub fn list_field<'a>(raw: &'a Value, candidates: &[&str], wrappers: &[&str]) -> &'a [Value] {
    match pick(raw, candidates) {
        Some(Value::Array(items)) => items.as_slice(),
        Some(wrapped) if wrapped.is_object() => match pick(wrapped, wrappers) {
            Some(Value::Array(items)) => items.as_slice(),
            _ => &[],
        },
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_present() {
        assert!(!is_present(&json!(null)));
        assert!(!is_present(&json!("")));
        assert!(is_present(&json!(" ")));
        assert!(is_present(&json!(0)));
        assert!(is_present(&json!(false)));
        assert!(is_present(&json!([])));
    }

    #[test]
    fn test_pick_respects_priority_and_presence() {
        let raw = json!({ "MonthMid": 45, "month_mid": 50, "monthMid": "" });
        assert_eq!(pick(&raw, MONTH_MID), Some(&json!(45)));
        assert_eq!(pick(&json!([1, 2]), MONTH_MID), None);
        assert_eq!(pick(&json!({}), MONTH_MID), None);
    }

    #[test]
    fn test_coerce_number_never_fabricates_zero() {
        assert_eq!(coerce_number(&json!("12.5")), Some(12.5));
        assert_eq!(coerce_number(&json!(" 7 ")), Some(7.0));
        assert_eq!(coerce_number(&json!("not-a-number")), None);
        assert_eq!(coerce_number(&json!("   ")), None);
        assert_eq!(coerce_number(&json!("Infinity")), None);
        assert_eq!(coerce_number(&json!("NaN")), None);
        assert_eq!(coerce_number(&json!({"v": 1})), None);
        assert_eq!(coerce_number(&json!(true)), Some(1.0));
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(coerce_string(&json!(11)).as_deref(), Some("11"));
        assert_eq!(coerce_string(&json!("11110")).as_deref(), Some("11110"));
        assert_eq!(coerce_string(&json!("")), None);
        assert_eq!(coerce_string(&json!(["11"])), None);
    }

    #[test]
    fn test_list_field_shapes() {
        let bare = json!({ "supportList": [1, 2] });
        assert_eq!(list_field(&bare, SUPPORT_LIST, SUPPORT_LIST_WRAPPER).len(), 2);

        let wrapped = json!({ "totalSupportList": { "supportDTOList": [1] } });
        assert_eq!(list_field(&wrapped, SUPPORT_LIST, SUPPORT_LIST_WRAPPER).len(), 1);

        let odd = json!({ "supportList": "x" });
        assert!(list_field(&odd, SUPPORT_LIST, SUPPORT_LIST_WRAPPER).is_empty());
        let odd_wrapper = json!({ "supportList": { "other": [1] } });
        assert!(list_field(&odd_wrapper, SUPPORT_LIST, SUPPORT_LIST_WRAPPER).is_empty());
    }
}
