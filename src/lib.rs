//! regionpick - 地区推荐服务客户端核心：筛选项位掩码编解码、行政区划索引与接口响应规范化

// 导出全局错误类型
pub use self::error::{ApiError, ErrorPayload, RegionPickError, RpResult};

// 导出配置模块
pub use self::config::{ClientConfig, ConfigManager, CustomConfigBuilder};

// 导出编码模块核心接口
pub use self::codec::{BitmaskOption, InfraMajor, decode, decode_value, encode};

// 导出行政区划模块核心接口
pub use self::region::{
    District, DistrictMatch, DistrictRef, Province, ProvinceEntry, RegionIndex, RegionLoader,
    RegionSnapshot, RegionSnapshotStore, canonical_province_name,
};

// 导出规范化模块核心接口
pub use self::normalize::{
    AiPick, DwellingInfo, InfraCount, JobInfo, Normalizer, RecommendationItem, RecommendationSet,
    RegionDetail, SupportEntry, is_present, normalize_detail, normalize_recommendation,
    normalize_recommendations, normalize_url,
};

// 导出接口模块核心接口
pub use self::api::{
    CodeCache, CodeItem, CodeKind, DetailParams, DwellingType, InfraImportance,
    LegacySearchFilters, RecommendClient, RecommendationParams,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod codec;
pub mod region;
pub mod normalize;
pub mod api;
