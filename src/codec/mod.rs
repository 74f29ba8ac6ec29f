//! 编码模块：多选筛选项与整数位掩码的互相转换
pub mod bitmask;
pub mod infra;

// 导出核心接口
pub use self::bitmask::{BitmaskOption, encode, decode, decode_value};
pub use self::infra::InfraMajor;
