//! 规范化模块：把推荐服务返回的松散 JSON 转换为固定的内部结构
pub mod fields;
pub mod links;
pub mod model;
pub mod parts;
pub mod normalizer;

// 导出核心接口
pub use self::fields::{is_present, FieldCandidates};
pub use self::links::normalize_url;
pub use self::model::{
    AiPick, DwellingInfo, InfraCount, JobInfo, RecommendationItem, RecommendationSet,
    RegionDetail, SupportEntry,
};
pub use self::parts::{map_support_entry, to_code_items};
pub use self::normalizer::{
    Normalizer, normalize_detail, normalize_recommendation, normalize_recommendations,
};
