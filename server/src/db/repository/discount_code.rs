//! Discount Code Repository

use super::{BaseRepository, RepoError, RepoResult, map_unique_violation};
use crate::db::models::{DiscountCode, DiscountCodeCreate, DiscountMode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct DiscountCodeRepository {
    base: BaseRepository,
}

impl DiscountCodeRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all discount codes, newest first
    pub async fn find_all(&self) -> RepoResult<Vec<DiscountCode>> {
        let codes: Vec<DiscountCode> = self
            .base
            .db()
            .query("SELECT * FROM discount_code ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(codes)
    }

    /// Find discount code by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<DiscountCode>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let code: Option<DiscountCode> = self.base.db().select(thing).await?;
        Ok(code)
    }

    /// Find discount code by its code string
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<DiscountCode>> {
        let code_owned = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM discount_code WHERE code = $code LIMIT 1")
            .bind(("code", code_owned))
            .await?;
        let codes: Vec<DiscountCode> = result.take(0)?;
        Ok(codes.into_iter().next())
    }

    /// Create a new discount code
    ///
    /// code 唯一性由数据库唯一索引保证。Auto 模式在此生成随机码
    pub async fn create(&self, data: DiscountCodeCreate) -> RepoResult<DiscountCode> {
        let code = match data.mode {
            DiscountMode::Manual => data
                .code
                .ok_or_else(|| RepoError::Validation("Manual mode requires a code".to_string()))?,
            DiscountMode::Auto => generate_code(),
        };
        let amount = rust_decimal::Decimal::try_from(data.amount)
            .map_err(|_| RepoError::Validation("amount is not a valid number".to_string()))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE discount_code SET
                    code = $code,
                    kind = $kind,
                    mode = $mode,
                    amount = $amount,
                    expiration_date = $expiration_date ?? NONE,
                    use_limit = $use_limit ?? NONE,
                    times_used = 0,
                    is_active = true,
                    created_at = time::now()
                RETURN AFTER"#,
            )
            .bind(("code", code.clone()))
            .bind(("kind", data.kind))
            .bind(("mode", data.mode))
            .bind(("amount", amount))
            .bind(("expiration_date", data.expiration_date))
            .bind(("use_limit", data.use_limit))
            .await
            .map_err(|e| map_unique_violation(e, format!("Code '{}' already exists", code)))?;

        let created: Option<DiscountCode> = result
            .take(0)
            .map_err(|e| map_unique_violation(e, format!("Code '{}' already exists", code)))?;
        created.ok_or_else(|| RepoError::Database("Failed to create discount code".to_string()))
    }

    /// Toggle the active flag
    pub async fn toggle_active(&self, id: &str) -> RepoResult<DiscountCode> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount code {} not found", id)))?;

        let mut result = self
            .base
            .db()
            .query("UPDATE $thing SET is_active = !is_active RETURN AFTER")
            .bind(("thing", thing))
            .await?;

        result
            .take::<Option<DiscountCode>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Discount code {} not found", id)))
    }

    /// Hard delete a discount code
    ///
    /// 引用置空与删除在同一事务内完成，避免订单悬挂引用
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Discount code {} not found", id)))?;

        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE order SET discount = NONE WHERE discount = $thing;
                DELETE $thing;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .await?
            .check()?;
        Ok(true)
    }
}

/// Generate an 8-character uppercase alphanumeric code from a UUID
fn generate_code() -> String {
    uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_uppercase()
}
