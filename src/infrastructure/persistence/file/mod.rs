//! File-backed Response Cache
//!
//! 裸音频文件 + JSON 元数据快照

mod response_cache;
mod snapshot;

pub use response_cache::FileResponseCache;
pub use snapshot::{CacheEntry, CacheSnapshot};
