//! 行政区划模块：省级（시도）/区县级（시군구）两级层级的加载、索引与查询
pub mod model;
pub mod names;
pub mod loader;
pub mod index;
pub mod snapshot;

// 导出核心接口
pub use self::model::{Province, District, DistrictRef, ProvinceEntry, DistrictMatch};
pub use self::names::{canonical_province_name, compare_names};
pub use self::loader::{RegionRow, RegionLoader};
pub use self::index::RegionIndex;
pub use self::snapshot::{RegionSnapshot, RegionSnapshotStore};
