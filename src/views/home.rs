use model::entities::{message, user};

use super::{escape, layout, messages, users::ProfileStats, PageContext};

/// Landing page for visitors without a session.
pub fn anon_home_page(ctx: &PageContext) -> String {
    let content = r#"<div class="home-hero">
  <h1>What's Happening?</h1>
  <h4>New to Warbler?</h4>
  <a href="/signup" class="btn btn-primary">Sign up now</a>
</div>"#;
    layout::page(ctx, "Warbler", "", content)
}

/// Home view of a logged-in user: profile summary aside plus the feed.
pub fn home_page(
    ctx: &PageContext,
    user: &user::Model,
    stats: ProfileStats,
    feed: &[(message::Model, Option<user::Model>)],
    liked_ids: &[i32],
) -> String {
    let content = format!(
        r#"<div class="row">
  <aside class="col-md-4 col-lg-3 col-sm-12" id="home-aside">
    <div class="card user-card">
      <div>
        <div class="image-wrapper">
          <img src="{header}" alt="" class="card-hero">
        </div>
        <a href="/users/{id}" class="card-link">
          <img src="{image}" alt="Image for {username}" class="card-image">
          <h4 id="home-username">@{username}</h4>
        </a>
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
        </ul>
      </div>
    </div>
  </aside>
  <div class="col-lg-6 col-md-8 col-sm-12">
{feed}
  </div>
</div>"#,
        id = user.id,
        header = escape(&user.header_image_url),
        image = escape(&user.image_url),
        username = escape(&user.username),
        messages = stats.messages,
        following = stats.following,
        followers = stats.followers,
        feed = messages::message_list(ctx, feed, liked_ids),
    );
    layout::page(ctx, "Warbler", "", &content)
}
