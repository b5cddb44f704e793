use sea_orm::entity::prelude::*;
use sea_orm::ConnectionTrait;

/// A directed "follower follows followed" edge between two users.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_being_followed_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_following_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The user being followed.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserBeingFollowedId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Followed,
    /// The user doing the following.
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserFollowingId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Follower,
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    pub async fn edge_exists<C>(db: &C, followed_id: i32, follower_id: i32) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        Ok(Self::find_by_id((followed_id, follower_id))
            .one(db)
            .await?
            .is_some())
    }
}
