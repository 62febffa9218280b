use crate::error::CustomError;

use super::model::{Account, AccountRow};

pub struct AccountRepository {
    pool: sqlx::AnyPool,
}

impl AccountRepository {
    pub fn new(pool: sqlx::AnyPool) -> Self {
        AccountRepository { pool }
    }

    pub fn pool(&self) -> &sqlx::AnyPool {
        &self.pool
    }

    pub async fn find(
        &self,
        name: Option<&str>,
        account_number: Option<&str>,
    ) -> Result<Vec<Account>, CustomError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, account_number, name, account_type,
                   CAST(CASE WHEN active THEN 1 ELSE 0 END AS BIGINT) AS active
            FROM accounts
            WHERE (CAST($1 AS TEXT) IS NULL OR name = $1)
              AND (CAST($2 AS TEXT) IS NULL OR account_number = $2)
            ORDER BY id
            "#,
        )
        .bind(name)
        .bind(account_number)
        .fetch_all(&self.pool)
        .await
        .map_err(CustomError::DBError)?;

        rows.into_iter()
            .map(|row| Account::try_from(row).map_err(CustomError::CorruptRow))
            .collect()
    }

    pub async fn insert(&self, account: &Account) -> Result<i64, CustomError> {
        let row: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO accounts (account_number, name, account_type, active)
            VALUES ($1, $2, $3, $4)
            RETURNING id"#,
        )
        .bind(&account.account_number)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.active)
        .fetch_one(&self.pool)
        .await
        .map_err(CustomError::DBError)?;

        Ok(row.0)
    }

    /// Returns the number of rows touched; zero means no such account.
    pub async fn update(&self, id: i64, account: &Account) -> Result<u64, CustomError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET account_number = $1, name = $2, account_type = $3, active = $4
            WHERE id = $5"#,
        )
        .bind(&account.account_number)
        .bind(&account.name)
        .bind(account.account_type.as_str())
        .bind(account.active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(CustomError::DBError)?;

        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: i64) -> Result<u64, CustomError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(CustomError::DBError)?;

        Ok(result.rows_affected())
    }
}
