//! 区划索引快照
//! 把构建好的索引序列化为 JSON，供前端静态资源或下次启动直接加载

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::index::RegionIndex;
use super::model::{District, DistrictRef, Province, ProvinceEntry};
use crate::error::RpResult;

/// 索引快照（字段名与静态资源 regions.json 一致）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSnapshot {
    pub sido_list: Vec<Province>,
    pub sigungu_list: Vec<District>,
    #[serde(default)]
    pub by_sido: BTreeMap<String, ProvinceEntry>,
    #[serde(default)]
    pub sido_by_code: BTreeMap<String, String>,
    #[serde(default)]
    pub sigungu_by_code: BTreeMap<String, DistrictRef>,
}

impl RegionSnapshot {
    pub fn from_index(index: &RegionIndex) -> Self {
        Self {
            sido_list: index.list_provinces().to_vec(),
            sigungu_list: index.list_districts().to_vec(),
            by_sido: index
                .province_entries()
                .map(|entry| (entry.code.clone(), entry.clone()))
                .collect(),
            sido_by_code: index
                .list_provinces()
                .iter()
                .map(|p| (p.code.clone(), p.name.clone()))
                .collect(),
            sigungu_by_code: index
                .district_refs()
                .map(|(code, r)| (code.to_string(), r.clone()))
                .collect(),
        }
    }

    /// 派生表只用于外部消费，重建时以两个列表为准
    pub fn into_index(self) -> RegionIndex {
        RegionIndex::build(self.sido_list, self.sigungu_list)
    }
}

/// 快照文件读写
pub struct RegionSnapshotStore;

impl RegionSnapshotStore {
    /// 从快照文件加载索引
    pub async fn load(path: impl AsRef<Path>) -> RpResult<RegionIndex> {
        let data = tokio::fs::read(path.as_ref()).await?;
        let snapshot: RegionSnapshot = serde_json::from_slice(&data)?;
        debug!(
            "快照加载成功，省份{}个、区县{}个",
            snapshot.sido_list.len(),
            snapshot.sigungu_list.len()
        );
        Ok(snapshot.into_index())
    }

    /// 将索引写入快照文件
    pub async fn save(path: impl AsRef<Path>, index: &RegionIndex) -> RpResult<()> {
        let snapshot = RegionSnapshot::from_index(index);
        let mut data = serde_json::to_vec_pretty(&snapshot)?;
        data.push(b'\n');
        debug!("快照序列化成功，大小：{} 字节", data.len());
        tokio::fs::write(path.as_ref(), data).await?;
        Ok(())
    }
}
