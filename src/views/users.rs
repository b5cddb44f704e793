use model::entities::{message, user};

use super::{escape, form_errors, layout, messages, PageContext};

/// Counters shown in the profile header.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProfileStats {
    pub messages: usize,
    pub following: usize,
    pub followers: usize,
    pub likes: usize,
}

fn follow_button(ctx: &PageContext, target: &user::Model, viewer_following: &[i32]) -> String {
    match ctx.current_user_id() {
        Some(viewer) if viewer != target.id => {
            if viewer_following.contains(&target.id) {
                format!(
                    r#"<form method="POST" action="/users/stop-following/{}">
          <button class="btn btn-primary btn-sm">Unfollow</button>
        </form>"#,
                    target.id
                )
            } else {
                format!(
                    r#"<form method="POST" action="/users/follow/{}">
          <button class="btn btn-outline-primary btn-sm">Follow</button>
        </form>"#,
                    target.id
                )
            }
        }
        _ => String::new(),
    }
}

/// A user summary card as used in user lists.
pub fn user_card(ctx: &PageContext, target: &user::Model, viewer_following: &[i32]) -> String {
    format!(
        r#"<div class="col-lg-4 col-md-6 col-12">
  <div class="card user-card">
    <div class="card-inner">
      <div class="image-wrapper">
        <img src="{header}" alt="" class="card-hero">
      </div>
      <div class="card-contents">
        <a href="/users/{id}" class="card-link">
          <img src="{image}" alt="Image for {username}" class="card-image">
          <p>@{username}</p>
        </a>
        {follow}
      </div>
      <p class="card-bio">{bio}</p>
    </div>
  </div>
</div>"#,
        id = target.id,
        header = escape(&target.header_image_url),
        image = escape(&target.image_url),
        username = escape(&target.username),
        bio = escape(target.bio.as_deref().unwrap_or("")),
        follow = follow_button(ctx, target, viewer_following),
    )
}

fn card_grid(ctx: &PageContext, users: &[user::Model], viewer_following: &[i32]) -> String {
    let cards: String = users
        .iter()
        .map(|u| user_card(ctx, u, viewer_following))
        .collect();
    format!("<div class=\"row\">\n{}\n</div>", cards)
}

/// The user search page.
pub fn index_page(ctx: &PageContext, users: &[user::Model], viewer_following: &[i32]) -> String {
    let content = if users.is_empty() {
        "<h3>Sorry, no users found</h3>".to_string()
    } else {
        format!(
            "<div class=\"row justify-content-end\">\n<div class=\"col-sm-9\">\n{}\n</div>\n</div>",
            card_grid(ctx, users, viewer_following)
        )
    };
    layout::page(ctx, "Users", "", &content)
}

/// Wrap a profile section in the shared header with the user's counters.
fn detail_layout(
    ctx: &PageContext,
    target: &user::Model,
    stats: ProfileStats,
    viewer_following: &[i32],
    inner: &str,
) -> String {
    let owner_actions = if ctx.current_user_id() == Some(target.id) {
        r#"<a href="/users/profile" class="btn btn-outline-secondary">Edit Profile</a>
            <form method="POST" action="/users/delete" class="form-inline">
              <button class="btn btn-outline-danger ml-2">Delete Profile</button>
            </form>"#
            .to_string()
    } else {
        follow_button(ctx, target, viewer_following)
    };

    let content = format!(
        r#"<img src="{header}" alt="" id="warbler-hero" class="full-width">
<img src="{image}" alt="Image for {username}" id="profile-avatar">
<div class="row full-width">
  <div class="container">
    <div class="row justify-content-end">
      <div class="col-9">
        <ul class="user-stats nav nav-pills">
          <li class="stat">
            <p class="small">Messages</p>
            <h4><a href="/users/{id}">{messages}</a></h4>
          </li>
          <li class="stat">
            <p class="small">Following</p>
            <h4><a href="/users/{id}/following">{following}</a></h4>
          </li>
          <li class="stat">
            <p class="small">Followers</p>
            <h4><a href="/users/{id}/followers">{followers}</a></h4>
          </li>
          <li class="stat">
            <p class="small">Likes</p>
            <h4><a href="/users/{id}/likes">{likes}</a></h4>
          </li>
          <div class="ml-auto">
            {owner_actions}
          </div>
        </ul>
      </div>
    </div>
  </div>
</div>
<div class="row">
  <div class="col-sm-3">
    <h4 id="sidebar-username">@{username}</h4>
    <p class="user-bio">{bio}</p>
    <p class="user-location"><span class="fa fa-map-marker"></span>{location}</p>
  </div>
  <div class="col-sm-9">
{inner}
  </div>
</div>"#,
        id = target.id,
        header = escape(&target.header_image_url),
        image = escape(&target.image_url),
        username = escape(&target.username),
        bio = escape(target.bio.as_deref().unwrap_or("")),
        location = escape(target.location.as_deref().unwrap_or("")),
        messages = stats.messages,
        following = stats.following,
        followers = stats.followers,
        likes = stats.likes,
    );
    layout::page(ctx, &target.username, "", &content)
}

/// Profile page listing the user's own messages.
pub fn show_page(
    ctx: &PageContext,
    target: &user::Model,
    stats: ProfileStats,
    viewer_following: &[i32],
    user_messages: &[message::Model],
    liked_ids: &[i32],
) -> String {
    let with_author: Vec<(message::Model, Option<user::Model>)> = user_messages
        .iter()
        .map(|m| (m.clone(), Some(target.clone())))
        .collect();
    let inner = messages::message_list(ctx, &with_author, liked_ids);
    detail_layout(ctx, target, stats, viewer_following, &inner)
}

/// Followed or following users of `target`.
pub fn follow_list_page(
    ctx: &PageContext,
    target: &user::Model,
    stats: ProfileStats,
    viewer_following: &[i32],
    users: &[user::Model],
) -> String {
    let inner = card_grid(ctx, users, viewer_following);
    detail_layout(ctx, target, stats, viewer_following, &inner)
}

/// Messages `target` has liked.
pub fn likes_page(
    ctx: &PageContext,
    target: &user::Model,
    stats: ProfileStats,
    viewer_following: &[i32],
    liked: &[(message::Model, Option<user::Model>)],
    viewer_liked_ids: &[i32],
) -> String {
    let inner = messages::message_list(ctx, liked, viewer_liked_ids);
    detail_layout(ctx, target, stats, viewer_following, &inner)
}

/// Current values shown in the profile edit form.
#[derive(Debug, Default)]
pub struct ProfileFields<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub image_url: &'a str,
    pub header_image_url: &'a str,
    pub bio: &'a str,
    pub location: &'a str,
}

impl<'a> From<&'a user::Model> for ProfileFields<'a> {
    fn from(user: &'a user::Model) -> Self {
        Self {
            username: &user.username,
            email: &user.email,
            image_url: &user.image_url,
            header_image_url: &user.header_image_url,
            bio: user.bio.as_deref().unwrap_or(""),
            location: user.location.as_deref().unwrap_or(""),
        }
    }
}

pub fn edit_profile_page(ctx: &PageContext, fields: &ProfileFields<'_>, errors: &[String]) -> String {
    let input = |name: &str, placeholder: &str, value: &str| {
        format!(
            r#"<input type="text" id="{name}" name="{name}" class="form-control" placeholder="{placeholder}" value="{value}">"#,
            value = escape(value),
        )
    };

    let content = format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <h2 class="join-message">Edit Your Profile.</h2>
    {errors}
    <form method="POST" action="/users/profile" id="user_form">
      {username}
      {email}
      {image_url}
      {header_image_url}
      <textarea name="bio" id="bio" class="form-control" placeholder="Bio">{bio}</textarea>
      {location}
      <p>To confirm changes, enter your password:</p>
      <input type="password" id="password" name="password" class="form-control" placeholder="Password">
      <div class="edit-btn-area">
        <button class="btn btn-success">Edit this user!</button>
        <a href="/users/{id}" class="btn btn-outline-secondary">Cancel</a>
      </div>
    </form>
  </div>
</div>"#,
        errors = form_errors(errors),
        username = input("username", "Username", fields.username),
        email = input("email", "E-mail", fields.email),
        image_url = input("image_url", "(Optional) Image URL", fields.image_url),
        header_image_url = input("header_image_url", "(Optional) Header Image URL", fields.header_image_url),
        bio = escape(fields.bio),
        location = input("location", "(Optional) Location", fields.location),
        id = ctx.current_user_id().unwrap_or_default(),
    );
    layout::page(ctx, "Edit Profile", "", &content)
}
