//! 区划表格数据加载
//! 从 CSV 读取区县行（上级省份编码、区县编码、区县名称），列名兼容多种写法

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RpResult;

/// 上级省份编码列的候选列名（按优先级）
const PROVINCE_CODE_COLUMNS: &[&str] = &["sido_code", "sidoCode", "sido"];
/// 区县编码列的候选列名
const DISTRICT_CODE_COLUMNS: &[&str] = &["code", "sigunguCode", "sigungu_code"];
/// 区县名称列的候选列名
const DISTRICT_NAME_COLUMNS: &[&str] = &["name", "sigunguName", "sigungu_name"];

/// CSV 中的一行区县数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRow {
    pub province_code: String,
    pub code: String,
    pub name: String,
}

/// 区划数据加载器
pub struct RegionLoader;

impl RegionLoader {
    /// 从文件加载
    pub fn load_csv_path(path: impl AsRef<Path>) -> RpResult<Vec<RegionRow>> {
        let file = std::fs::File::open(path.as_ref())?;
        let rows = Self::load_csv_reader(file)?;
        debug!("从 {} 加载区县行 {} 条", path.as_ref().display(), rows.len());
        Ok(rows)
    }

    /// 从任意读取器加载，缺少任一字段的行直接跳过
    pub fn load_csv_reader<R: Read>(reader: R) -> RpResult<Vec<RegionRow>> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let province_cols = Self::column_indices(&headers, PROVINCE_CODE_COLUMNS);
        let code_cols = Self::column_indices(&headers, DISTRICT_CODE_COLUMNS);
        let name_cols = Self::column_indices(&headers, DISTRICT_NAME_COLUMNS);

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in rdr.records() {
            let record = result?;
            let row = (
                Self::first_value(&record, &province_cols),
                Self::first_value(&record, &code_cols),
                Self::first_value(&record, &name_cols),
            );
            match row {
                (Some(province_code), Some(code), Some(name)) => rows.push(RegionRow {
                    province_code,
                    code,
                    name,
                }),
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!("跳过字段不完整的区县行 {} 条", skipped);
        }
        Ok(rows)
    }

    /// 候选列名 -> 表头中的列下标（保持候选优先级）
    fn column_indices(headers: &StringRecord, candidates: &[&str]) -> Vec<usize> {
        candidates
            .iter()
            .filter_map(|candidate| headers.iter().position(|h| h.trim() == *candidate))
            .collect()
    }

    /// 取第一个非空值，同时去掉残留的引号
    fn first_value(record: &StringRecord, indices: &[usize]) -> Option<String> {
        indices
            .iter()
            .filter_map(|&i| record.get(i))
            .map(|v| v.trim_matches('"').trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_with_aliases() {
        let csv = "sidoCode,sigunguCode,sigunguName\n\
                   11,11110,종로구\n\
                   11, 11140 ,\"중구\"\n\
                   26,,빈코드\n";
        let rows = RegionLoader::load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], RegionRow {
            province_code: "11".to_string(),
            code: "11140".to_string(),
            name: "중구".to_string(),
        });
    }

    #[test]
    fn test_first_non_empty_column_wins() {
        let csv = "sido_code,sido,code,name\n,26,26110,중구\n";
        let rows = RegionLoader::load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].province_code, "26");
    }

    #[test]
    fn test_missing_columns_yield_nothing() {
        let csv = "foo,bar\n1,2\n";
        let rows = RegionLoader::load_csv_reader(csv.as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
