use std::fmt;

use sea_orm::entity::prelude::*;
use sea_orm::{
    ActiveValue::NotSet, ConnectionTrait, JoinType, QueryOrder, QuerySelect, Set,
};
use tracing::{debug, info, instrument, warn};

use super::{follows, like, message};
use crate::error::Result as ModelResult;
use crate::password::{hash_password, verify_password};

pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

/// A registered Warbler user.
#[derive(Clone, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub image_url: String,
    pub header_image_url: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub location: Option<String>,
    /// Argon2 PHC string, never the plaintext.
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user authors many messages.
    #[sea_orm(has_many = "super::message::Entity")]
    Message,
    #[sea_orm(has_many = "super::like::Entity")]
    Like,
}

impl Related<message::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Message.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// The password hash stays out of logs.
impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<User #{}: {}, {}>", self.id, self.username, self.email)
    }
}

/// Input for [`Entity::signup`].
///
/// `username` and `email` are optional so that a missing value reaches the
/// database and is rejected there by the NOT NULL constraint.
#[derive(Clone, Default)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
    pub image_url: Option<String>,
}

impl Entity {
    /// Hash the password and insert a new user.
    ///
    /// Uniqueness and presence of username and email are enforced by the
    /// database; on failure the caller must roll back its transaction.
    #[instrument(skip(db, new_user), fields(username = ?new_user.username))]
    pub async fn signup<C>(db: &C, new_user: NewUser) -> ModelResult<Model>
    where
        C: ConnectionTrait,
    {
        let hashed = hash_password(&new_user.password)?;
        let image_url = new_user
            .image_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());

        let user = ActiveModel {
            username: new_user.username.map_or(NotSet, Set),
            email: new_user.email.map_or(NotSet, Set),
            password: Set(hashed),
            image_url: Set(image_url),
            header_image_url: Set(DEFAULT_HEADER_IMAGE_URL.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("User signed up with ID: {}, username: {}", user.id, user.username);
        Ok(user)
    }

    /// Find a user by username and verify the password.
    ///
    /// Returns `Ok(None)` when the username is unknown or the password does
    /// not match.
    #[instrument(skip(db, password))]
    pub async fn authenticate<C>(db: &C, username: &str, password: &str) -> ModelResult<Option<Model>>
    where
        C: ConnectionTrait,
    {
        let Some(user) = Self::find_by_username(db, username).await? else {
            debug!("No user named {}", username);
            return Ok(None);
        };

        if verify_password(password, &user.password) {
            Ok(Some(user))
        } else {
            warn!("Password mismatch for user {}", username);
            Ok(None)
        }
    }

    pub async fn find_by_username<C>(db: &C, username: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Self::find()
            .filter(Column::Username.eq(username))
            .one(db)
            .await
    }

    /// Users whose username contains `query`, or everyone when it is empty.
    pub async fn search<C>(db: &C, query: Option<&str>) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut select = Self::find();
        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            select = select.filter(Column::Username.contains(query));
        }
        select.order_by_asc(Column::Username).all(db).await
    }
}

impl Model {
    /// This user's messages, newest first.
    pub async fn messages<C>(&self, db: &C) -> Result<Vec<message::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        self.find_related(message::Entity)
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .all(db)
            .await
    }

    /// Users following this user.
    pub async fn followers<C>(&self, db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .join_rev(JoinType::InnerJoin, follows::Relation::Follower.def())
            .filter(follows::Column::UserBeingFollowedId.eq(self.id))
            .order_by_asc(Column::Username)
            .all(db)
            .await
    }

    /// Users this user follows.
    pub async fn following<C>(&self, db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .join_rev(JoinType::InnerJoin, follows::Relation::Followed.def())
            .filter(follows::Column::UserFollowingId.eq(self.id))
            .order_by_asc(Column::Username)
            .all(db)
            .await
    }

    /// Is this user following `other`?
    pub async fn is_following<C>(&self, db: &C, other: &Model) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        follows::Entity::edge_exists(db, other.id, self.id).await
    }

    /// Is `other` following this user?
    pub async fn is_followed_by<C>(&self, db: &C, other: &Model) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        follows::Entity::edge_exists(db, self.id, other.id).await
    }

    /// Start following `other`. Following someone twice is a no-op.
    pub async fn follow<C>(&self, db: &C, other: &Model) -> Result<(), DbErr>
    where
        C: ConnectionTrait,
    {
        if self.is_following(db, other).await? {
            debug!("User {} already follows {}", self.id, other.id);
            return Ok(());
        }

        follows::ActiveModel {
            user_being_followed_id: Set(other.id),
            user_following_id: Set(self.id),
        }
        .insert(db)
        .await?;
        info!("User {} now follows {}", self.id, other.id);
        Ok(())
    }

    /// Stop following `other`. Returns whether an edge was removed.
    pub async fn unfollow<C>(&self, db: &C, other: &Model) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let result = follows::Entity::delete_by_id((other.id, self.id)).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// Messages this user liked, newest first.
    pub async fn likes<C>(&self, db: &C) -> Result<Vec<(message::Model, Option<Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        message::Entity::find()
            .join_rev(JoinType::InnerJoin, like::Relation::Message.def())
            .filter(like::Column::UserId.eq(self.id))
            .order_by_desc(message::Column::Timestamp)
            .find_also_related(Entity)
            .all(db)
            .await
    }

    /// Ids of the messages this user liked.
    pub async fn liked_message_ids<C>(&self, db: &C) -> Result<Vec<i32>, DbErr>
    where
        C: ConnectionTrait,
    {
        like::Entity::find()
            .filter(like::Column::UserId.eq(self.id))
            .select_only()
            .column(like::Column::MessageId)
            .into_tuple()
            .all(db)
            .await
    }

    /// Like `message`, or remove the like if it already exists.
    /// Returns whether the message is liked afterwards.
    pub async fn toggle_like<C>(&self, db: &C, message: &message::Model) -> Result<bool, DbErr>
    where
        C: ConnectionTrait,
    {
        let removed = like::Entity::delete_by_id((self.id, message.id)).exec(db).await?;
        if removed.rows_affected > 0 {
            debug!("User {} unliked message {}", self.id, message.id);
            return Ok(false);
        }

        like::ActiveModel {
            user_id: Set(self.id),
            message_id: Set(message.id),
        }
        .insert(db)
        .await?;
        debug!("User {} liked message {}", self.id, message.id);
        Ok(true)
    }

    /// The newest `limit` messages written by this user or by anyone they
    /// follow, each with its author.
    pub async fn feed<C>(&self, db: &C, limit: u64) -> Result<Vec<(message::Model, Option<Model>)>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut author_ids: Vec<i32> = follows::Entity::find()
            .filter(follows::Column::UserFollowingId.eq(self.id))
            .select_only()
            .column(follows::Column::UserBeingFollowedId)
            .into_tuple()
            .all(db)
            .await?;
        author_ids.push(self.id);

        message::Entity::find()
            .filter(message::Column::UserId.is_in(author_ids))
            .order_by_desc(message::Column::Timestamp)
            .order_by_desc(message::Column::Id)
            .limit(limit)
            .find_also_related(Entity)
            .all(db)
            .await
    }
}
