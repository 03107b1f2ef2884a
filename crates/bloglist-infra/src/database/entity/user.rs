//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub name: Option<String>,
    pub password_hash: String,
    /// JSON array of blog id strings, kept in creation order.
    #[sea_orm(column_type = "JsonBinary")]
    pub blog_ids: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::blog::Entity")]
    Blog,
}

impl Related<super::blog::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Blog.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) fn blog_ids_to_json(ids: &[Uuid]) -> Json {
    Json::Array(ids.iter().map(|id| Json::String(id.to_string())).collect())
}

pub(crate) fn blog_ids_from_json(value: Json) -> Vec<Uuid> {
    match serde_json::from_value(value) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed blog id list");
            Vec::new()
        }
    }
}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for bloglist_core::domain::User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            name: model.name,
            password_hash: model.password_hash,
            blog_ids: blog_ids_from_json(model.blog_ids),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<bloglist_core::domain::User> for ActiveModel {
    fn from(user: bloglist_core::domain::User) -> Self {
        Self {
            id: Set(user.id),
            username: Set(user.username),
            name: Set(user.name),
            password_hash: Set(user.password_hash),
            blog_ids: Set(blog_ids_to_json(&user.blog_ids)),
            created_at: Set(user.created_at.into()),
            updated_at: Set(user.updated_at.into()),
        }
    }
}
