//! SeaORM entities for Warbler: users, their messages, the self-referencing
//! follows relation and likes.

pub mod follows;
pub mod like;
pub mod message;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::follows::Entity as Follows;
    pub use super::like::Entity as Like;
    pub use super::message::Entity as Message;
    pub use super::user::Entity as User;
}
