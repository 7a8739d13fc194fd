use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use super::{db_err, update_err, write_err};
use crate::domain::{DomainResult, User, UserRepository, UserRole};
use crate::infrastructure::database::entities::user;

const DUPLICATE_USER: &str = "Username or email already exists";

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn entity_role_to_domain(role: user::UserRole) -> UserRole {
    match role {
        user::UserRole::Admin => UserRole::Admin,
        user::UserRole::Editor => UserRole::Editor,
    }
}

fn domain_role_to_entity(role: UserRole) -> user::UserRole {
    match role {
        UserRole::Admin => user::UserRole::Admin,
        UserRole::Editor => user::UserRole::Editor,
    }
}

fn user_model_to_domain(model: user::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        name: model.name,
        email: model.email,
        role: entity_role_to_domain(model.role),
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn user_to_active(user: User) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(user.id),
        username: Set(user.username),
        email: Set(user.email),
        password_hash: Set(user.password_hash),
        name: Set(user.name),
        role: Set(domain_role_to_entity(user.role)),
        last_login_at: Set(user.last_login_at),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
    }
}

// ── Repository implementation ───────────────────────────────────

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(user_model_to_domain))
    }

    async fn insert(&self, user: User) -> DomainResult<User> {
        let model = user_to_active(user)
            .insert(&self.db)
            .await
            .map_err(|e| write_err(e, DUPLICATE_USER))?;

        Ok(user_model_to_domain(model))
    }

    async fn update(&self, user: User) -> DomainResult<User> {
        let id = user.id.clone();
        let model = user_to_active(user).update(&self.db).await.map_err(|e| {
            match e.sql_err() {
                Some(_) => write_err(e, DUPLICATE_USER),
                None => update_err(e, "User", &id),
            }
        })?;

        Ok(user_model_to_domain(model))
    }

    async fn count(&self) -> DomainResult<u64> {
        user::Entity::find().count(&self.db).await.map_err(db_err)
    }
}
