//! 应用层
//!
//! 包含：
//! - ports: 六边形架构端口定义（ResponseCache）

pub mod ports;

pub use ports::{CacheError, ResponseCachePort};
