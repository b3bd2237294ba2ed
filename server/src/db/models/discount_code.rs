//! Discount Code Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

pub type DiscountCodeId = RecordId;

/// Discount kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiscountKind {
    /// 固定金额
    Fixed,
    /// 小计的百分比
    Percentage,
}

/// Discount mode enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DiscountMode {
    /// 系统生成的折扣码
    Auto,
    /// 员工录入的折扣码
    #[default]
    Manual,
}

/// Reason a discount code failed apply-time validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DiscountRejection {
    #[error("Discount code is not active")]
    Inactive,
    #[error("Discount code has expired")]
    Expired,
    #[error("Discount code usage limit reached")]
    Exhausted,
}

/// Discount code entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCode {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<DiscountCodeId>,
    /// 折扣码文本 (全局唯一，由数据库唯一索引保证)
    pub code: String,
    pub kind: DiscountKind,
    #[serde(default)]
    pub mode: DiscountMode,
    /// Fixed: 金额；Percentage: 百分比值 (10 = 10%)
    pub amount: Decimal,
    pub expiration_date: Option<DateTime<Utc>>,
    /// 使用次数上限 (None = 不限)
    pub use_limit: Option<u32>,
    #[serde(default)]
    pub times_used: u32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl DiscountCode {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_date.is_some_and(|exp| exp < now)
    }

    pub fn is_exhausted(&self) -> bool {
        self.use_limit
            .is_some_and(|limit| self.times_used >= limit)
    }

    /// Apply-time validation: active flag, expiry, usage cap
    pub fn validate_at(&self, now: DateTime<Utc>) -> Result<(), DiscountRejection> {
        if !self.is_active {
            return Err(DiscountRejection::Inactive);
        }
        if self.is_expired(now) {
            return Err(DiscountRejection::Expired);
        }
        if self.is_exhausted() {
            return Err(DiscountRejection::Exhausted);
        }
        Ok(())
    }
}

/// Create discount code payload
///
/// Auto 模式下 `code` 留空，由服务端生成
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DiscountCodeCreate {
    pub code: Option<String>,
    pub kind: DiscountKind,
    #[serde(default)]
    pub mode: DiscountMode,
    #[validate(range(min = 0.0, message = "amount must not be negative"))]
    pub amount: f64,
    pub expiration_date: Option<DateTime<Utc>>,
    pub use_limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn make_code(is_active: bool, expires_in_hours: Option<i64>, use_limit: Option<u32>, times_used: u32) -> DiscountCode {
        DiscountCode {
            id: None,
            code: "SAVE10".to_string(),
            kind: DiscountKind::Percentage,
            mode: DiscountMode::Manual,
            amount: Decimal::new(10, 0),
            expiration_date: expires_in_hours.map(|h| Utc::now() + Duration::hours(h)),
            use_limit,
            times_used,
            is_active,
            created_at: None,
        }
    }

    #[test]
    fn valid_code_passes() {
        let code = make_code(true, Some(24), Some(5), 0);
        assert!(code.validate_at(Utc::now()).is_ok());
    }

    #[test]
    fn inactive_code_rejected() {
        let code = make_code(false, Some(24), Some(5), 0);
        assert_eq!(
            code.validate_at(Utc::now()),
            Err(DiscountRejection::Inactive)
        );
    }

    #[test]
    fn expired_code_rejected() {
        let code = make_code(true, Some(-1), Some(5), 0);
        assert_eq!(code.validate_at(Utc::now()), Err(DiscountRejection::Expired));
    }

    #[test]
    fn exhausted_code_rejected() {
        let code = make_code(true, Some(24), Some(5), 5);
        assert_eq!(
            code.validate_at(Utc::now()),
            Err(DiscountRejection::Exhausted)
        );
    }

    #[test]
    fn unlimited_code_never_exhausts() {
        let code = make_code(true, None, None, 10_000);
        assert!(code.validate_at(Utc::now()).is_ok());
    }
}
