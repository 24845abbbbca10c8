//! User accounts

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::entities::users;
use crate::error::{Result, StoreError};
use crate::ids::generate_id;
use crate::marshal::{self, marshal_all, Marshal};
use crate::repository::{newest_first, Repository};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub is_agent: bool,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Salted password digest; empty for accounts that cannot sign in.
    #[serde(skip)]
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub is_agent: bool,
    pub is_owner: bool,
}

/// Fields left `None` are unchanged. On nullable columns `Some(None)`
/// writes NULL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub full_name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub avatar_url: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub phone: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub bio: Option<Option<String>>,
    pub is_agent: Option<bool>,
    pub is_owner: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub is_agent: Option<bool>,
    pub is_owner: Option<bool>,
}

fn checked_email(email: String) -> Result<String> {
    let email = email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(StoreError::invalid("email", email));
    }
    Ok(email)
}

/// Store for the `users` table
#[derive(Clone)]
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a user together with its password digest.
    pub(crate) async fn create_with_password(
        &self,
        draft: NewUser,
        password_hash: String,
    ) -> Result<User> {
        let now = marshal::now();
        let user = User {
            id: generate_id(),
            email: checked_email(draft.email)?,
            full_name: draft.full_name,
            avatar_url: draft.avatar_url,
            phone: draft.phone,
            bio: draft.bio,
            is_agent: draft.is_agent,
            is_owner: draft.is_owner,
            created_at: now,
            updated_at: now,
            password_hash,
        };

        let model = user
            .marshal_out()?
            .into_active_model()
            .reset_all()
            .insert(&self.db)
            .await?;

        info!("Created user {} ({})", model.id, model.email);
        User::marshal_in(model)
    }

    /// Look up a user by exact email.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim()))
            .one(&self.db)
            .await?
            .map(User::marshal_in)
            .transpose()
    }

    /// Number of registered users.
    pub async fn count(&self) -> Result<u64> {
        Ok(users::Entity::find().count(&self.db).await?)
    }
}

#[async_trait]
impl Repository for UserStore {
    type Record = User;
    type Draft = NewUser;
    type Patch = UserPatch;
    type Filter = UserFilter;

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>> {
        let mut query = users::Entity::find();
        if let Some(is_agent) = filter.is_agent {
            query = query.filter(users::Column::IsAgent.eq(marshal::flag(is_agent)));
        }
        if let Some(is_owner) = filter.is_owner {
            query = query.filter(users::Column::IsOwner.eq(marshal::flag(is_owner)));
        }

        let rows = newest_first(query, users::Column::CreatedAt)
            .all(&self.db)
            .await?;
        marshal_all(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<User>> {
        users::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(User::marshal_in)
            .transpose()
    }

    /// Accounts created here have no password and cannot sign in; use
    /// `AuthManager::sign_up` for that.
    async fn create(&self, draft: NewUser) -> Result<User> {
        self.create_with_password(draft, String::new()).await
    }

    async fn update(&self, id: &str, patch: UserPatch) -> Result<Option<User>> {
        let Some(model) = users::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let mut active: users::ActiveModel = model.clone().into();
        if let Some(email) = patch.email {
            active.email = Set(checked_email(email)?);
        }
        if let Some(full_name) = patch.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(avatar_url) = patch.avatar_url {
            active.avatar_url = Set(avatar_url);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(phone);
        }
        if let Some(bio) = patch.bio {
            active.bio = Set(bio);
        }
        if let Some(is_agent) = patch.is_agent {
            active.is_agent = Set(marshal::flag(is_agent));
        }
        if let Some(is_owner) = patch.is_owner {
            active.is_owner = Set(marshal::flag(is_owner));
        }

        if !active.is_changed() {
            return User::marshal_in(model).map(Some);
        }
        active.updated_at = Set(marshal::encode_timestamp(&marshal::now()));

        let model = active.update(&self.db).await?;
        debug!("Updated user {}", id);
        User::marshal_in(model).map(Some)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = users::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected > 0 {
            info!("Deleted user {}", id);
        }
        Ok(result.rows_affected > 0)
    }
}
