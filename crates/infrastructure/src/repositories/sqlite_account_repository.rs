use crate::database::{accounts, run_blocking, storage_failure, with_connection, SqlitePool};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use domain::{Account, AccountRepository, DomainError, ObjectId, ProfileUpdate, StoredAccount};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct AccountRow {
    id: String,
    email: String,
    display_name: String,
    password_hash: String,
    profile_pic: Option<String>,
    bio: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = accounts)]
struct NewAccountRow {
    id: String,
    email: String,
    display_name: String,
    password_hash: String,
    profile_pic: Option<String>,
    bio: Option<String>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Only the fields that are `Some` get written.
#[derive(AsChangeset)]
#[diesel(table_name = accounts)]
struct ProfileChanges {
    display_name: Option<String>,
    profile_pic: Option<String>,
    bio: Option<String>,
    updated_at: NaiveDateTime,
}

impl TryFrom<AccountRow> for StoredAccount {
    type Error = DomainError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let id = ObjectId::parse(&row.id)
            .ok_or_else(|| storage_failure("decode account", format!("row {}: bad id", row.id)))?;
        Ok(StoredAccount {
            account: Account {
                id,
                email: row.email,
                display_name: row.display_name,
                profile_pic: row.profile_pic,
                bio: row.bio,
                created_at: row.created_at.and_utc(),
                updated_at: row.updated_at.and_utc(),
            },
            password_hash: row.password_hash,
        })
    }
}

impl From<&StoredAccount> for NewAccountRow {
    fn from(stored: &StoredAccount) -> Self {
        let account = &stored.account;
        NewAccountRow {
            id: account.id.to_string(),
            email: account.email.clone(),
            display_name: account.display_name.clone(),
            password_hash: stored.password_hash.clone(),
            profile_pic: account.profile_pic.clone(),
            bio: account.bio.clone(),
            created_at: account.created_at.naive_utc(),
            updated_at: account.updated_at.naive_utc(),
        }
    }
}

fn account_of(row: AccountRow) -> Result<Account, DomainError> {
    StoredAccount::try_from(row).map(|stored| stored.account)
}

pub struct SqliteAccountRepository {
    pool: SqlitePool,
}

impl SqliteAccountRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for SqliteAccountRepository {
    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Account>, DomainError> {
        let id = id.to_string();
        let row = run_blocking(&self.pool, "find account", move |conn| {
            accounts::table
                .filter(accounts::id.eq(id))
                .select(AccountRow::as_select())
                .first::<AccountRow>(conn)
                .optional()
        })
        .await?;

        row.map(account_of).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredAccount>, DomainError> {
        let email = email.to_string();
        let row = run_blocking(&self.pool, "find account by email", move |conn| {
            accounts::table
                .filter(accounts::email.eq(email))
                .select(AccountRow::as_select())
                .first::<AccountRow>(conn)
                .optional()
        })
        .await?;

        row.map(StoredAccount::try_from).transpose()
    }

    async fn insert(&self, account: &StoredAccount) -> Result<Account, DomainError> {
        let new_row = NewAccountRow::from(account);
        let id = new_row.id.clone();

        let result = with_connection(&self.pool, "insert account", move |conn| {
            diesel::insert_into(accounts::table)
                .values(&new_row)
                .execute(conn)?;
            accounts::table
                .filter(accounts::id.eq(id))
                .select(AccountRow::as_select())
                .first::<AccountRow>(conn)
        })
        .await?;

        match result {
            Ok(row) => account_of(row),
            // Lost a signup race on the same email.
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(DomainError::validation("Account already exists"))
            }
            Err(e) => Err(storage_failure("insert account", e)),
        }
    }

    async fn update_profile(
        &self,
        id: &ObjectId,
        update: &ProfileUpdate,
    ) -> Result<Option<Account>, DomainError> {
        let id = id.to_string();
        let changes = ProfileChanges {
            display_name: update.display_name.clone(),
            profile_pic: update.profile_pic.clone(),
            bio: update.bio.clone(),
            updated_at: Utc::now().naive_utc(),
        };

        let row = run_blocking(&self.pool, "update profile", move |conn| {
            conn.transaction(|conn| {
                let changed = diesel::update(accounts::table.filter(accounts::id.eq(&id)))
                    .set(&changes)
                    .execute(conn)?;
                if changed == 0 {
                    return Ok(None);
                }
                accounts::table
                    .filter(accounts::id.eq(&id))
                    .select(AccountRow::as_select())
                    .first::<AccountRow>(conn)
                    .optional()
            })
        })
        .await?;

        row.map(account_of).transpose()
    }
}
