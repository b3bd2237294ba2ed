//! Staff Repository

use super::{BaseRepository, RepoError, RepoResult, map_unique_violation};
use crate::db::models::{Staff, StaffCreate, StaffRole};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct StaffRepository {
    base: BaseRepository,
}

impl StaffRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active staff
    pub async fn find_all(&self) -> RepoResult<Vec<Staff>> {
        let staff: Vec<Staff> = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE is_active = true ORDER BY display_name")
            .await?
            .take(0)?;
        Ok(staff)
    }

    /// Find staff member by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Staff>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let staff: Option<Staff> = self.base.db().select(thing).await?;
        Ok(staff)
    }

    /// Find staff member by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<Staff>> {
        let email_owned = email.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE email = $email LIMIT 1")
            .bind(("email", email_owned))
            .await?;
        let staff: Vec<Staff> = result.take(0)?;
        Ok(staff.into_iter().next())
    }

    /// Create a new staff member
    ///
    /// email 唯一性由数据库唯一索引保证
    pub async fn create(&self, data: StaffCreate) -> RepoResult<Staff> {
        let hash_pass = Staff::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE staff SET
                    email = $email,
                    display_name = $display_name,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_active = true,
                    created_at = time::now()
                RETURN AFTER"#,
            )
            .bind(("email", data.email.clone()))
            .bind(("display_name", data.name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .await
            .map_err(|e| {
                map_unique_violation(e, format!("Email '{}' already exists", data.email))
            })?;

        let created: Option<Staff> = result
            .take(0)
            .map_err(|e| map_unique_violation(e, format!("Email '{}' already exists", data.email)))?;
        created.ok_or_else(|| RepoError::Database("Failed to create staff member".to_string()))
    }

    /// Count active admins
    pub async fn count_active_admins(&self) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM staff WHERE role = $role AND is_active = true")
            .bind(("role", StaffRole::Admin))
            .await?;
        let admins: Vec<Staff> = result.take(0)?;
        Ok(admins.len())
    }

    /// Hard delete a staff member
    ///
    /// 不允许删除最后一名活跃管理员
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Staff {} not found", id)))?;

        if existing.is_admin() && existing.is_active && self.count_active_admins().await? <= 1 {
            return Err(RepoError::Validation(
                "Cannot delete the last active admin".to_string(),
            ));
        }

        // 指派引用置空后删除，避免订单悬挂引用
        self.base
            .db()
            .query(
                r#"BEGIN TRANSACTION;
                UPDATE order SET assigned_to = NONE WHERE assigned_to = $thing;
                DELETE $thing;
                COMMIT TRANSACTION;"#,
            )
            .bind(("thing", thing))
            .await?
            .check()?;
        Ok(true)
    }
}
