//! 行政区划索引
//! 启动时由原始省份/区县列表一次性构建，此后只读

use std::collections::HashMap;

use tracing::{debug, warn};

use super::loader::RegionRow;
use super::model::{District, DistrictMatch, DistrictRef, Province, ProvinceEntry};
use super::names::{canonical_province_name, compare_names};

/// 两级区划索引
#[derive(Debug, Clone, Default)]
pub struct RegionIndex {
    provinces: Vec<Province>,
    districts: Vec<District>,
    by_province: HashMap<String, ProvinceEntry>,
    by_district: HashMap<String, DistrictRef>,
    // 区县名称出现次数，用于搜索时判断是否需要省份前缀
    name_counts: HashMap<String, usize>,
}

/// 按编码去重（后出现的覆盖先出现的）
fn dedup_by_code<T, F>(items: impl IntoIterator<Item = T>, code_of: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<T> = Vec::new();
    for item in items {
        let code = code_of(&item).to_string();
        if let Some(&pos) = positions.get(&code) {
            unique[pos] = item;
        } else {
            positions.insert(code, unique.len());
            unique.push(item);
        }
    }
    unique
}

fn sort_districts(districts: &mut [District]) {
    districts.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.code.cmp(&b.code)));
}

impl RegionIndex {
    /// 构建索引
    /// 上级编码找不到对应省份的区县不会被丢弃，而是挂到名称为空的占位省份下
    pub fn build(
        provinces: impl IntoIterator<Item = Province>,
        districts: impl IntoIterator<Item = District>,
    ) -> Self {
        let mut provinces = dedup_by_code(provinces, |p| p.code.as_str());
        provinces.sort_by(|a, b| compare_names(&a.name, &b.name).then_with(|| a.code.cmp(&b.code)));

        let mut districts = dedup_by_code(districts, |d| d.code.as_str());
        sort_districts(&mut districts);

        let mut by_province: HashMap<String, ProvinceEntry> = provinces
            .iter()
            .map(|p| {
                (p.code.clone(), ProvinceEntry {
                    code: p.code.clone(),
                    name: p.name.clone(),
                    districts: Vec::new(),
                })
            })
            .collect();

        let mut orphan_parents = 0usize;
        for district in &districts {
            let entry = by_province
                .entry(district.province_code.clone())
                .or_insert_with(|| {
                    orphan_parents += 1;
                    ProvinceEntry::placeholder(&district.province_code)
                });
            // districts 已排序，按序追加即保持有序
            entry.districts.push(district.clone());
        }
        if orphan_parents > 0 {
            warn!("{} 个上级省份编码无对应省份记录，已合成占位省份", orphan_parents);
        }

        let by_district: HashMap<String, DistrictRef> = districts
            .iter()
            .map(|d| {
                let province_name = by_province
                    .get(&d.province_code)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                (d.code.clone(), DistrictRef {
                    name: d.name.clone(),
                    province_code: d.province_code.clone(),
                    province_name,
                })
            })
            .collect();

        let mut name_counts: HashMap<String, usize> = HashMap::new();
        for district in &districts {
            *name_counts.entry(district.name.clone()).or_insert(0) += 1;
        }

        debug!(
            "区划索引构建完成，省份{}个、区县{}个",
            provinces.len(),
            districts.len()
        );

        Self {
            provinces,
            districts,
            by_province,
            by_district,
            name_counts,
        }
    }

    /// 由区县行构建，省份列表来自标准名称表
    /// 无标准名称的省份不出现在省份列表中，其区县挂在占位省份下
    pub fn from_rows(rows: &[RegionRow]) -> Self {
        let provinces: Vec<Province> = rows
            .iter()
            .filter_map(|row| {
                canonical_province_name(&row.province_code).map(|name| Province {
                    code: row.province_code.clone(),
                    name: name.to_string(),
                })
            })
            .collect();

        let districts = rows.iter().map(|row| District {
            province_code: row.province_code.clone(),
            code: row.code.clone(),
            name: row.name.clone(),
        });

        Self::build(provinces, districts)
    }

    pub fn list_provinces(&self) -> &[Province] {
        &self.provinces
    }

    pub fn list_districts(&self) -> &[District] {
        &self.districts
    }

    /// 省份下属区县；未知省份返回空切片
    pub fn districts_of(&self, province_code: &str) -> &[District] {
        self.by_province
            .get(province_code)
            .map(|entry| entry.districts.as_slice())
            .unwrap_or(&[])
    }

    /// 省份条目（含合成的占位省份）
    pub fn province(&self, province_code: &str) -> Option<&ProvinceEntry> {
        self.by_province.get(province_code)
    }

    /// 省份名称，占位省份的空名称视为未解析
    pub fn province_name(&self, province_code: &str) -> Option<&str> {
        self.by_province
            .get(province_code)
            .filter(|entry| entry.is_resolved())
            .map(|entry| entry.name.as_str())
    }

    pub fn resolve_district(&self, code: &str) -> Option<&DistrictRef> {
        self.by_district.get(code)
    }

    /// 区县展示名称；重名区县带省份前缀
    pub fn district_label(&self, code: &str) -> Option<String> {
        let district = self.by_district.get(code)?;
        Some(self.label_for(&district.name, &district.province_name))
    }

    fn label_for(&self, name: &str, province_name: &str) -> String {
        let shared = self.name_counts.get(name).copied().unwrap_or(0) > 1;
        if shared && !province_name.is_empty() {
            format!("{} {}", province_name, name)
        } else {
            name.to_string()
        }
    }

    /// 搜索/自动补全：区县名称或「省份 区县」标签包含查询词（忽略大小写）
    pub fn search_districts(&self, query: &str) -> Vec<DistrictMatch> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.districts
            .iter()
            .filter_map(|d| {
                let province_name = self
                    .by_district
                    .get(&d.code)
                    .map(|r| r.province_name.as_str())
                    .unwrap_or_default();
                let full = format!("{} {}", province_name, d.name).to_lowercase();
                if !d.name.to_lowercase().contains(&needle) && !full.contains(&needle) {
                    return None;
                }
                Some(DistrictMatch {
                    code: d.code.clone(),
                    name: d.name.clone(),
                    province_code: d.province_code.clone(),
                    label: self.label_for(&d.name, province_name),
                })
            })
            .collect()
    }

    /// 全部省份条目（含占位省份），无序
    pub fn province_entries(&self) -> impl Iterator<Item = &ProvinceEntry> {
        self.by_province.values()
    }

    /// 区县编码 -> 查询结果，无序
    pub fn district_refs(&self) -> impl Iterator<Item = (&str, &DistrictRef)> {
        self.by_district.iter().map(|(code, r)| (code.as_str(), r))
    }

    pub fn is_empty(&self) -> bool {
        self.provinces.is_empty() && self.districts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn province(code: &str, name: &str) -> Province {
        Province {
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn district(province_code: &str, code: &str, name: &str) -> District {
        District {
            province_code: province_code.to_string(),
            code: code.to_string(),
            name: name.to_string(),
        }
    }

    fn sample_index() -> RegionIndex {
        RegionIndex::build(
            vec![province("26", "부산광역시"), province("11", "서울특별시")],
            vec![
                district("11", "11140", "중구"),
                district("11", "11110", "종로구"),
                district("26", "26110", "중구"),
                district("26", "26350", "해운대구"),
            ],
        )
    }

    #[test]
    fn test_province_dedup_last_wins() {
        let index = RegionIndex::build(vec![province("11", "A"), province("11", "B")], vec![]);
        assert_eq!(index.list_provinces(), &[province("11", "B")]);
    }

    #[test]
    fn test_district_dedup_last_wins() {
        let index = RegionIndex::build(
            vec![province("11", "서울특별시")],
            vec![district("11", "11110", "옛이름"), district("11", "11110", "종로구")],
        );
        assert_eq!(index.list_districts().len(), 1);
        assert_eq!(index.resolve_district("11110").unwrap().name, "종로구");
        assert_eq!(index.districts_of("11").len(), 1);
    }

    #[test]
    fn test_lists_sorted_by_name() {
        let index = sample_index();
        let provinces: Vec<&str> = index.list_provinces().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(provinces, vec!["부산광역시", "서울특별시"]);

        let seoul: Vec<&str> = index.districts_of("11").iter().map(|d| d.name.as_str()).collect();
        assert_eq!(seoul, vec!["종로구", "중구"]);
    }

    #[test]
    fn test_orphan_district_kept_under_placeholder() {
        let index = RegionIndex::build(
            vec![province("11", "서울특별시")],
            vec![district("99", "99010", "어딘가군")],
        );
        assert!(index.list_districts().iter().any(|d| d.code == "99010"));
        assert_eq!(index.districts_of("99").len(), 1);

        let placeholder = index.province("99").unwrap();
        assert_eq!(placeholder.name, "");
        assert!(!placeholder.is_resolved());
        assert_eq!(index.province_name("99"), None);

        let resolved = index.resolve_district("99010").unwrap();
        assert_eq!(resolved.province_code, "99");
        assert_eq!(resolved.province_name, "");
    }

    #[test]
    fn test_unknown_lookups_are_absent() {
        let index = sample_index();
        assert!(index.districts_of("00").is_empty());
        assert!(index.resolve_district("00000").is_none());
        assert!(index.province("00").is_none());
    }

    #[test]
    fn test_resolve_district_with_province_name() {
        let index = sample_index();
        let resolved = index.resolve_district("26350").unwrap();
        assert_eq!(resolved.name, "해운대구");
        assert_eq!(resolved.province_name, "부산광역시");
    }

    #[test]
    fn test_search_disambiguates_shared_names() {
        let index = sample_index();
        let matches = index.search_districts("중구");
        let labels: Vec<&str> = matches.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels.len(), 2);
        assert!(labels.contains(&"서울특별시 중구"));
        assert!(labels.contains(&"부산광역시 중구"));

        let unique = index.search_districts("해운대");
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].label, "해운대구");

        let by_province = index.search_districts("부산광역시 중");
        assert_eq!(by_province.len(), 1);
        assert_eq!(by_province[0].code, "26110");

        assert!(index.search_districts("   ").is_empty());
    }

    #[test]
    fn test_from_rows_uses_canonical_names() {
        let rows = vec![
            RegionRow {
                province_code: "51".to_string(),
                code: "51110".to_string(),
                name: "춘천시".to_string(),
            },
            RegionRow {
                province_code: "77".to_string(),
                code: "77001".to_string(),
                name: "미확인".to_string(),
            },
        ];
        let index = RegionIndex::from_rows(&rows);
        assert_eq!(index.list_provinces(), &[province("51", "강원특별자치도")]);
        assert_eq!(index.list_districts().len(), 2);
        assert_eq!(index.province_name("51"), Some("강원특별자치도"));
        assert_eq!(index.district_label("77001").as_deref(), Some("미확인"));
    }
}
