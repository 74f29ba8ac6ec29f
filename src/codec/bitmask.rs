//! 位掩码编解码
//! 以调用方给定的有序选项列表为基准：列表第一个选项占最高位，
//! 长度为 N 的列表中第 i 个选项的权重为 2^(N-1-i)

use std::collections::HashMap;

use serde_json::Value;

use crate::api::CodeItem;

/// 可参与位掩码编码的选项
pub trait BitmaskOption {
    fn option_id(&self) -> &str;
}

impl BitmaskOption for &str {
    fn option_id(&self) -> &str {
        self
    }
}

impl BitmaskOption for String {
    fn option_id(&self) -> &str {
        self.as_str()
    }
}

impl BitmaskOption for CodeItem {
    fn option_id(&self) -> &str {
        &self.code
    }
}

/// 第 index 个选项对应的位，超出 u64 位宽时返回 None
fn option_bit(len: usize, index: usize) -> Option<u64> {
    let shift = u32::try_from(len - 1 - index).ok()?;
    1u64.checked_shl(shift)
}

/// 选中集合 -> 位掩码，未知ID直接忽略
pub fn encode<O, I, S>(options: &[O], selected_ids: I) -> u64
where
    O: BitmaskOption,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if options.is_empty() {
        return 0;
    }

    let option_index: HashMap<&str, usize> = options
        .iter()
        .enumerate()
        .map(|(index, option)| (option.option_id(), index))
        .collect();

    selected_ids.into_iter().fold(0u64, |mask, id| {
        match option_index
            .get(id.as_ref())
            .and_then(|&index| option_bit(options.len(), index))
        {
            Some(bit) => mask | bit,
            None => mask,
        }
    })
}

/// 位掩码 -> 选中ID列表（按选项列表顺序）
pub fn decode<O: BitmaskOption>(options: &[O], mask: u64) -> Vec<String> {
    if mask == 0 {
        return Vec::new();
    }

    options
        .iter()
        .enumerate()
        .filter(|(index, _)| {
            option_bit(options.len(), *index).is_some_and(|bit| mask & bit != 0)
        })
        .map(|(_, option)| option.option_id().to_string())
        .collect()
}

/// 从松散的JSON值解码（查询参数、请求回显等）
/// 非数字、非有限值、非正数一律返回空集合
pub fn decode_value<O: BitmaskOption>(options: &[O], mask: &Value) -> Vec<String> {
    let raw = match mask {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match raw {
        Some(value) if value.is_finite() && value >= 1.0 => decode(options, value.trunc() as u64),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    const INFRA: [&str; 4] = ["HEALTH", "FOOD", "CULTURE", "LIFE"];

    fn as_set(ids: Vec<String>) -> HashSet<String> {
        ids.into_iter().collect()
    }

    #[test]
    fn test_encode_msb_first() {
        assert_eq!(encode(&INFRA, ["FOOD", "LIFE"]), 5);
        assert_eq!(encode(&INFRA, ["HEALTH"]), 8);
        assert_eq!(encode(&INFRA, INFRA), 15);
    }

    #[test]
    fn test_decode_example() {
        assert_eq!(decode(&INFRA, 5), vec!["FOOD".to_string(), "LIFE".to_string()]);
    }

    #[test]
    fn test_zero_cases() {
        let empty: [&str; 0] = [];
        assert_eq!(encode(&empty, ["FOOD"]), 0);
        assert_eq!(encode(&INFRA, Vec::<String>::new()), 0);
        assert!(decode(&INFRA, 0).is_empty());
    }

    #[test]
    fn test_round_trip_every_subset() {
        for mask in 0u64..16 {
            let ids = decode(&INFRA, mask);
            assert_eq!(encode(&INFRA, &ids), mask);
            assert_eq!(as_set(decode(&INFRA, encode(&INFRA, &ids))), as_set(ids));
        }
    }

    #[test]
    fn test_duplicates_and_unknown_ids() {
        let base = encode(&INFRA, ["CULTURE"]);
        assert_eq!(encode(&INFRA, ["CULTURE", "CULTURE"]), base);
        assert_eq!(encode(&INFRA, ["CULTURE", "not-a-real-id"]), base);
    }

    #[test]
    fn test_wide_option_list_does_not_overflow() {
        let options: Vec<String> = (0..70).map(|i| format!("OPT{}", i)).collect();
        // 前6个选项超出 u64 位宽，被忽略
        assert_eq!(encode(&options, ["OPT0", "OPT5"]), 0);
        assert_eq!(encode(&options, ["OPT69"]), 1);
        assert_eq!(decode(&options, 1), vec!["OPT69".to_string()]);
    }

    #[test]
    fn test_decode_value_fails_closed() {
        assert_eq!(decode_value(&INFRA, &json!(5)), vec!["FOOD", "LIFE"]);
        assert_eq!(decode_value(&INFRA, &json!("5")), vec!["FOOD", "LIFE"]);
        assert!(decode_value(&INFRA, &json!(-3)).is_empty());
        assert!(decode_value(&INFRA, &json!(0)).is_empty());
        assert!(decode_value(&INFRA, &json!("NaN")).is_empty());
        assert!(decode_value(&INFRA, &json!("inf")).is_empty());
        assert!(decode_value(&INFRA, &json!(null)).is_empty());
        assert!(decode_value(&INFRA, &json!({"mask": 5})).is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// 互不重复的选项列表（至多64个）及对应的选中标记
    fn options_and_selection() -> impl Strategy<Value = (Vec<String>, Vec<bool>)> {
        prop::collection::hash_set("[A-Z_]{1,8}", 0..=64)
            .prop_map(|ids| ids.into_iter().collect::<Vec<String>>())
            .prop_flat_map(|ids| {
                let len = ids.len();
                (Just(ids), prop::collection::vec(any::<bool>(), len))
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_decode_inverts_encode((options, flags) in options_and_selection()) {
            let selected: Vec<String> = options
                .iter()
                .zip(&flags)
                .filter(|(_, on)| **on)
                .map(|(id, _)| id.clone())
                .collect();

            let mask = encode(&options, &selected);
            // 结果按选项列表顺序返回
            prop_assert_eq!(decode(&options, mask), selected);
        }

        #[test]
        fn prop_encode_inverts_decode((options, _) in options_and_selection(), raw in any::<u64>()) {
            let width = options.len() as u32;
            let mask = if width >= 64 { raw } else { raw & ((1u64 << width) - 1) };
            prop_assert_eq!(encode(&options, decode(&options, mask)), mask);
        }
    }
}
