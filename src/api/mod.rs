//! 推荐服务接口模块：请求参数、编码表缓存与 HTTP 客户端
pub mod model;
pub mod cache;
pub mod client;

// 导出核心接口
pub use self::model::{
    CodeItem, CodeKind, DetailParams, DwellingType, InfraImportance, LegacySearchFilters,
    RecommendationParams,
};
pub use self::cache::CodeCache;
pub use self::client::RecommendClient;
