//! 省份标准名称表与名称排序规则

use std::cmp::Ordering;
use std::collections::HashMap;

use once_cell::sync::Lazy;

/// 省份标准名称（原始数据集中 50=제주, 51=강원, 52=전북）
static CANON_PROVINCE_NAMES: Lazy<HashMap<u32, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (11, "서울특별시"),
        (26, "부산광역시"),
        (27, "대구광역시"),
        (28, "인천광역시"),
        (29, "광주광역시"),
        (30, "대전광역시"),
        (31, "울산광역시"),
        (36, "세종특별자치시"),
        (41, "경기도"),
        (43, "충청북도"),
        (44, "충청남도"),
        (46, "전라남도"),
        (47, "경상북도"),
        (48, "경상남도"),
        (50, "제주특별자치도"),
        (51, "강원특별자치도"),
        (52, "전라북도"),
    ])
});

/// 按数值比较编码（"011" 与 "11" 视为同一省份）
pub fn canonical_province_name(code: &str) -> Option<&'static str> {
    let numeric = code.trim().parse::<u32>().ok()?;
    CANON_PROVINCE_NAMES.get(&numeric).copied()
}

/// 名称排序：先按忽略大小写的字符序比较，再按原文比较保证全序
/// 韩文音节在 Unicode 中已按字典序排列
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}
