//! Database Module
//!
//! Embedded SurrealDB (RocksDB backend) connection and schema setup.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "printdesk";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database and apply the schema.
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        let service = Self { db };
        service.define_schema().await?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");
        Ok(service)
    }

    /// Apply table and index definitions.
    ///
    /// Idempotent: re-opening an existing data directory is safe.
    async fn define_schema(&self) -> Result<(), AppError> {
        // 唯一性约束下沉到存储层：索引冲突是"重复"的唯一事实来源
        self.db
            .query(
                r#"
                DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_order_orderno ON order FIELDS orderno UNIQUE;

                DEFINE TABLE IF NOT EXISTS order_item SCHEMALESS;
                DEFINE TABLE IF NOT EXISTS item_option SCHEMALESS;
                DEFINE TABLE IF NOT EXISTS has_item TYPE RELATION FROM order TO order_item;
                DEFINE TABLE IF NOT EXISTS has_option TYPE RELATION FROM order_item TO item_option;

                DEFINE TABLE IF NOT EXISTS product SCHEMALESS;

                DEFINE TABLE IF NOT EXISTS discount_code SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_discount_code_code ON discount_code FIELDS code UNIQUE;

                DEFINE TABLE IF NOT EXISTS staff SCHEMALESS;
                DEFINE INDEX IF NOT EXISTS idx_staff_email ON staff FIELDS email UNIQUE;
                "#,
            )
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

        tracing::info!("Database schema applied");
        Ok(())
    }
}
