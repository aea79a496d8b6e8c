//! Postgres-backed store.
//!
//! Uniqueness is enforced by named constraints and surfaced as
//! [`StoreError::Duplicate`]. Like/unlike, activation and applicant-list
//! changes are single conditional `UPDATE ... WHERE ... RETURNING` statements,
//! so concurrent requests cannot double-apply them. `likes` is always
//! recomputed as `cardinality(liked_by)` in the same statement.
//!
//! ## Error Mapping
//!
//! | SQLx error | PostgreSQL code | StoreError |
//! |------------|-----------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate(constraint)` |
//! | Database (other) | any | `Backend` |
//! | PoolClosed / PoolTimedOut / Io | n/a | `Unavailable` |
//! | Other | n/a | `Backend` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use hireboard_applications::{Application, ApplicationStatus};
use hireboard_auth::{Account, Role};
use hireboard_core::{AccountId, ApplicationId, JobId};
use hireboard_jobs::{Job, JobPatch};

use super::{AccountStore, ApplicationStore, JobStore, StoreError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id            UUID PRIMARY KEY,
    username      TEXT NOT NULL,
    email         TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    roles         TEXT[] NOT NULL,
    first_name    TEXT,
    last_name     TEXT,
    created_at    TIMESTAMPTZ NOT NULL,
    CONSTRAINT accounts_username_key UNIQUE (username),
    CONSTRAINT accounts_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS jobs (
    id          UUID PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    job_type    TEXT NOT NULL,
    category    TEXT NOT NULL,
    author      UUID NOT NULL,
    author_name TEXT NOT NULL,
    is_active   BOOLEAN NOT NULL DEFAULT TRUE,
    likes       INTEGER NOT NULL DEFAULT 0 CHECK (likes >= 0),
    liked_by    UUID[] NOT NULL DEFAULT '{}',
    applicants  UUID[] NOT NULL DEFAULT '{}',
    CONSTRAINT jobs_title_author_key UNIQUE (title, author)
);

CREATE INDEX IF NOT EXISTS jobs_author_idx ON jobs (author);
CREATE INDEX IF NOT EXISTS jobs_liked_by_idx ON jobs USING GIN (liked_by);

CREATE TABLE IF NOT EXISTS applications (
    id           UUID PRIMARY KEY,
    user_id      UUID NOT NULL,
    job_id       UUID NOT NULL,
    status       TEXT NOT NULL,
    cover_letter TEXT NOT NULL,
    applied_at   TIMESTAMPTZ NOT NULL,
    CONSTRAINT applications_user_job_key UNIQUE (user_id, job_id)
);

CREATE INDEX IF NOT EXISTS applications_job_idx ON applications (job_id);
"#;

const JOB_COLUMNS: &str =
    "id, title, description, job_type, category, author, author_name, is_active, likes, liked_by, applicants";
const ACCOUNT_COLUMNS: &str =
    "id, username, email, password_hash, roles, first_name, last_name, created_at";
const APPLICATION_COLUMNS: &str = "id, user_id, job_id, status, cover_letter, applied_at";

/// Postgres-backed store for all three collections.
///
/// Uses SQLx connection pool which is thread-safe (Arc + Send + Sync).
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Arc<PgPool>,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables, constraints and indexes if missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }

    async fn fetch_jobs(&self, operation: &str, sql: &str, bind: Option<Uuid>) -> Result<Vec<Job>, StoreError> {
        let mut query = sqlx::query(sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        rows.iter().map(|r| job_from_row(r).map_err(|e| map_sqlx_error(operation, e))).collect()
    }

    async fn fetch_applications(
        &self,
        operation: &str,
        column: &str,
        id: Uuid,
    ) -> Result<Vec<Application>, StoreError> {
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE {column} = $1 ORDER BY applied_at, id");
        let rows = sqlx::query(&sql)
            .bind(id)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        rows.iter().map(|r| application_from_row(r, operation)).collect()
    }
}

#[async_trait]
impl AccountStore for PgStore {
    #[instrument(skip(self, account), fields(account_id = %account.id), err)]
    async fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO accounts ({ACCOUNT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(account.id.as_uuid())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.roles.iter().map(|r| r.as_str().to_string()).collect::<Vec<_>>())
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_account", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(account_id = %id), err)]
    async fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_account", e))?;
        row.as_ref().map(|r| account_from_row(r, "get_account")).transpose()
    }

    #[instrument(skip(self, login), err)]
    async fn find_account_by_login(&self, login: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1 OR email = $1 \
             ORDER BY (username = $1) DESC LIMIT 1"
        ))
        .bind(login)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_account_by_login", e))?;
        row.as_ref().map(|r| account_from_row(r, "find_account_by_login")).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_accounts", e))?;
        rows.iter().map(|r| account_from_row(r, "list_accounts")).collect()
    }

    #[instrument(skip(self, ids), fields(count = ids.len()), err)]
    async fn get_accounts(&self, ids: &[AccountId]) -> Result<Vec<Account>, StoreError> {
        let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_accounts", e))?;
        rows.iter().map(|r| account_from_row(r, "get_accounts")).collect()
    }

    #[instrument(skip(self, account), fields(account_id = %account.id), err)]
    async fn update_account(&self, account: &Account) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE accounts SET username = $2, email = $3, password_hash = $4, \
             first_name = $5, last_name = $6 WHERE id = $1",
        )
        .bind(account.id.as_uuid())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_account", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(account_id = %id), err)]
    async fn delete_account(&self, id: AccountId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_account", e))?;
        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl JobStore for PgStore {
    #[instrument(skip(self, job), fields(job_id = %job.id, author = %job.author), err)]
    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        let liked_by: Vec<Uuid> = job.liked_by.iter().map(|id| *id.as_uuid()).collect();
        let applicants: Vec<Uuid> = job.applicants.iter().map(|id| *id.as_uuid()).collect();

        sqlx::query(&format!(
            "INSERT INTO jobs ({JOB_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)"
        ))
        .bind(job.id.as_uuid())
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.job_type)
        .bind(&job.category)
        .bind(job.author.as_uuid())
        .bind(&job.author_name)
        .bind(job.is_active)
        .bind(liked_by.len() as i32)
        .bind(liked_by)
        .bind(applicants)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_job", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id), err)]
    async fn get_job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_job", e))?;
        row.as_ref()
            .map(job_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("get_job", e))
    }

    #[instrument(skip(self), err)]
    async fn list_active_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE is_active ORDER BY id");
        self.fetch_jobs("list_active_jobs", &sql, None).await
    }

    #[instrument(skip(self), err)]
    async fn list_jobs_by_author(&self, author: AccountId) -> Result<Vec<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE author = $1 ORDER BY id");
        self.fetch_jobs("list_jobs_by_author", &sql, Some(*author.as_uuid())).await
    }

    #[instrument(skip(self), fields(account_id = %account), err)]
    async fn list_jobs_liked_by(&self, account: AccountId) -> Result<Vec<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE is_active AND $1 = ANY(liked_by) ORDER BY id");
        self.fetch_jobs("list_jobs_liked_by", &sql, Some(*account.as_uuid())).await
    }

    #[instrument(skip(self, patch), fields(job_id = %id), err)]
    async fn update_job_details(&self, id: JobId, patch: &JobPatch) -> Result<Option<Job>, StoreError> {
        let patch = patch.normalized();
        let sql = format!(
            "UPDATE jobs SET title = COALESCE($2, title), \
                             description = COALESCE($3, description), \
                             job_type = COALESCE($4, job_type), \
                             category = COALESCE($5, category) \
             WHERE id = $1 \
             RETURNING {JOB_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(patch.title)
            .bind(patch.description)
            .bind(patch.job_type)
            .bind(patch.category)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_job_details", e))?;
        row.as_ref()
            .map(job_from_row)
            .transpose()
            .map_err(|e| map_sqlx_error("update_job_details", e))
    }

    #[instrument(skip(self), fields(job_id = %id), err)]
    async fn set_job_active(&self, id: JobId, active: bool) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE jobs SET is_active = $2 WHERE id = $1 AND is_active <> $2")
            .bind(id.as_uuid())
            .bind(active)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_job_active", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(job_id = %id), err)]
    async fn delete_job(&self, id: JobId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_job", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(job_id = %id, account_id = %account), err)]
    async fn add_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError> {
        let likes: Option<i32> = sqlx::query_scalar(
            "UPDATE jobs SET liked_by = array_append(liked_by, $2), \
                             likes = cardinality(liked_by) + 1 \
             WHERE id = $1 AND is_active AND author <> $2 AND NOT ($2 = ANY(liked_by)) \
             RETURNING likes",
        )
        .bind(id.as_uuid())
        .bind(account.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("add_like", e))?;
        Ok(likes.map(count_from_db))
    }

    #[instrument(skip(self), fields(job_id = %id, account_id = %account), err)]
    async fn remove_like(&self, id: JobId, account: AccountId) -> Result<Option<u32>, StoreError> {
        let likes: Option<i32> = sqlx::query_scalar(
            "UPDATE jobs SET liked_by = array_remove(liked_by, $2), \
                             likes = cardinality(array_remove(liked_by, $2)) \
             WHERE id = $1 AND is_active AND $2 = ANY(liked_by) \
             RETURNING likes",
        )
        .bind(id.as_uuid())
        .bind(account.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("remove_like", e))?;
        Ok(likes.map(count_from_db))
    }

    #[instrument(skip(self), fields(account_id = %account), err)]
    async fn remove_likes_by(&self, account: AccountId) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE jobs SET liked_by = array_remove(liked_by, $1), \
                             likes = cardinality(array_remove(liked_by, $1)) \
             WHERE $1 = ANY(liked_by)",
        )
        .bind(account.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("remove_likes_by", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(job_id = %id, application_id = %application), err)]
    async fn push_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE jobs SET applicants = array_append(applicants, $2) WHERE id = $1 AND is_active",
        )
        .bind(id.as_uuid())
        .bind(application.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("push_applicant", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(job_id = %id, application_id = %application), err)]
    async fn pull_applicant(&self, id: JobId, application: ApplicationId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE jobs SET applicants = array_remove(applicants, $2) \
             WHERE id = $1 AND $2 = ANY(applicants)",
        )
        .bind(id.as_uuid())
        .bind(application.as_uuid())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("pull_applicant", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), err)]
    async fn deactivate_jobs_by(&self, author: AccountId) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE jobs SET is_active = FALSE WHERE author = $1 AND is_active")
            .bind(author.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("deactivate_jobs_by", e))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl ApplicationStore for PgStore {
    #[instrument(skip(self, application), fields(application_id = %application.id, job_id = %application.job), err)]
    async fn insert_application(&self, application: &Application) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO applications ({APPLICATION_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6)"
        ))
        .bind(application.id.as_uuid())
        .bind(application.user.as_uuid())
        .bind(application.job.as_uuid())
        .bind(application.status.as_str())
        .bind(&application.cover_letter)
        .bind(application.applied_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_application", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(application_id = %id), err)]
    async fn get_application(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        let row = sqlx::query(&format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_application", e))?;
        row.as_ref().map(|r| application_from_row(r, "get_application")).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_applications_by_user(&self, user: AccountId) -> Result<Vec<Application>, StoreError> {
        self.fetch_applications("list_applications_by_user", "user_id", *user.as_uuid()).await
    }

    #[instrument(skip(self), fields(job_id = %job), err)]
    async fn list_applications_by_job(&self, job: JobId) -> Result<Vec<Application>, StoreError> {
        self.fetch_applications("list_applications_by_job", "job_id", *job.as_uuid()).await
    }

    #[instrument(skip(self), fields(application_id = %id), err)]
    async fn set_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE applications SET status = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(status.as_str())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_application_status", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), fields(application_id = %id), err)]
    async fn delete_application(&self, id: ApplicationId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_application", e))?;
        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self), err)]
    async fn delete_applications_by_user(&self, user: AccountId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM applications WHERE user_id = $1")
            .bind(user.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_applications_by_user", e))?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(job_id = %job), err)]
    async fn delete_applications_by_job(&self, job: JobId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(job.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_applications_by_job", e))?;
        Ok(result.rows_affected())
    }
}

/// Map SQLx errors to `StoreError`.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                StoreError::Duplicate(db_err.constraint().unwrap_or("unique").to_string())
            } else {
                StoreError::Backend(format!("database error in {operation}: {}", db_err.message()))
            }
        }
        sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("connection pool unavailable in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        other => StoreError::Backend(format!("sqlx error in {operation}: {other}")),
    }
}

fn count_from_db(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

// Row decoding

fn job_from_row(row: &PgRow) -> Result<Job, sqlx::Error> {
    let id: Uuid = row.try_get("id")?;
    let author: Uuid = row.try_get("author")?;
    let likes: i32 = row.try_get("likes")?;
    let liked_by: Vec<Uuid> = row.try_get("liked_by")?;
    let applicants: Vec<Uuid> = row.try_get("applicants")?;

    Ok(Job {
        id: JobId::from_uuid(id),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        job_type: row.try_get("job_type")?,
        category: row.try_get("category")?,
        author: AccountId::from_uuid(author),
        author_name: row.try_get("author_name")?,
        is_active: row.try_get("is_active")?,
        likes: count_from_db(likes),
        liked_by: liked_by.into_iter().map(AccountId::from_uuid).collect(),
        applicants: applicants.into_iter().map(ApplicationId::from_uuid).collect(),
    })
}

fn account_from_row(row: &PgRow, operation: &str) -> Result<Account, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error(operation, e);

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let raw_roles: Vec<String> = row.try_get("roles").map_err(decode)?;
    let roles = raw_roles
        .iter()
        .map(|r| r.parse::<Role>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StoreError::Backend(format!("corrupt account row in {operation}: {e}")))?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    Ok(Account {
        id: AccountId::from_uuid(id),
        username: row.try_get("username").map_err(decode)?,
        email: row.try_get("email").map_err(decode)?,
        password_hash: row.try_get("password_hash").map_err(decode)?,
        roles,
        first_name: row.try_get("first_name").map_err(decode)?,
        last_name: row.try_get("last_name").map_err(decode)?,
        created_at,
    })
}

fn application_from_row(row: &PgRow, operation: &str) -> Result<Application, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error(operation, e);

    let id: Uuid = row.try_get("id").map_err(decode)?;
    let user: Uuid = row.try_get("user_id").map_err(decode)?;
    let job: Uuid = row.try_get("job_id").map_err(decode)?;
    let status: String = row.try_get("status").map_err(decode)?;
    let status = status
        .parse::<ApplicationStatus>()
        .map_err(|_| StoreError::Backend(format!("corrupt application status '{status}' in {operation}")))?;

    Ok(Application {
        id: ApplicationId::from_uuid(id),
        user: AccountId::from_uuid(user),
        job: JobId::from_uuid(job),
        status,
        cover_letter: row.try_get("cover_letter").map_err(decode)?,
        applied_at: row.try_get("applied_at").map_err(decode)?,
    })
}
