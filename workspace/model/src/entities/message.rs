use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, Set};

use super::{like, user};

/// Longest message a user may post.
pub const MAX_TEXT_LENGTH: usize = 140;

/// A short message ("warble") posted by a user.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "messages")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(140))")]
    pub text: String,
    /// Set to the insertion time when left unset.
    pub timestamp: DateTime,
    /// The author. Messages are removed together with their author.
    pub user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::like::Entity")]
    Like,
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Like.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if insert && self.timestamp.is_not_set() {
            self.timestamp = Set(Utc::now().naive_utc());
        }
        Ok(self)
    }
}

impl Entity {
    /// A message together with its author.
    pub async fn find_with_author<C>(db: &C, id: i32) -> Result<Option<(Model, user::Model)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let found = Self::find_by_id(id)
            .find_also_related(user::Entity)
            .one(db)
            .await?;
        Ok(found.and_then(|(message, author)| author.map(|author| (message, author))))
    }
}
