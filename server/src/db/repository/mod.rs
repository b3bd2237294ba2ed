//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables using Graph DB patterns.

// Staff
pub mod staff;

// Product Domain
pub mod product;

// Discounts
pub mod discount_code;

// Orders
pub mod order;

// Re-exports
pub use discount_code::DiscountCodeRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use staff::StaffRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Map a write error to [`RepoError::Duplicate`] when it is a unique index
/// violation, otherwise to [`RepoError::Database`].
///
/// 唯一索引冲突是"重复"的唯一事实来源 (没有先查后插的竞态窗口)
pub(crate) fn map_unique_violation(err: surrealdb::Error, duplicate_msg: String) -> RepoError {
    let text = err.to_string();
    if text.contains("already contains") {
        RepoError::Duplicate(duplicate_msg)
    } else {
        RepoError::Database(text)
    }
}

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// 使用 surrealdb::RecordId 处理所有 ID：
//   - 解析: let id: RecordId = "order:abc".parse()?;
//   - 创建: let id = RecordId::from_table_key("order", "abc");
//   - CRUD: db.select(id) / db.delete(id) 直接使用 RecordId

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
