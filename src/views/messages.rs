use model::entities::{message, user};

use super::{escape, form_errors, layout, PageContext};

fn format_timestamp(message: &message::Model) -> String {
    message.timestamp.format("%d %B %Y").to_string()
}

/// One entry of a message list.
///
/// Logged-in viewers get a like toggle on messages they did not write.
pub fn message_item(ctx: &PageContext, message: &message::Model, author: &user::Model, liked: bool) -> String {
    let like_button = match ctx.current_user_id() {
        Some(viewer) if viewer != author.id => format!(
            r#"<form method="POST" action="/users/add_like/{id}" class="messages-like">
        <button class="btn btn-sm {class}"><i class="fa fa-thumbs-up"></i></button>
      </form>"#,
            id = message.id,
            class = if liked { "btn-primary" } else { "btn-secondary" },
        ),
        _ => String::new(),
    };

    format!(
        r#"<li class="list-group-item">
  <a href="/messages/{id}" class="message-link"></a>
  <a href="/users/{author_id}"><img src="{image}" alt="user image" class="timeline-image"></a>
  <div class="message-area">
    <a href="/users/{author_id}">@{username}</a>
    <span class="text-muted">{timestamp}</span>
    <p>{text}</p>
  </div>
  {like_button}
</li>"#,
        id = message.id,
        author_id = author.id,
        image = escape(&author.image_url),
        username = escape(&author.username),
        timestamp = format_timestamp(message),
        text = escape(&message.text),
    )
}

/// A list of messages with their authors; entries whose author is gone are skipped.
pub fn message_list(ctx: &PageContext, messages: &[(message::Model, Option<user::Model>)], liked_ids: &[i32]) -> String {
    let items: String = messages
        .iter()
        .filter_map(|(msg, author)| {
            author
                .as_ref()
                .map(|author| message_item(ctx, msg, author, liked_ids.contains(&msg.id)))
        })
        .collect();
    format!("<ul class=\"list-group\" id=\"messages\">\n{}\n</ul>", items)
}

pub fn new_message_page(ctx: &PageContext, text: &str, errors: &[String]) -> String {
    let content = format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    {errors}
    <form method="POST" action="/messages/new">
      <textarea name="text" class="form-control" rows="3" placeholder="What's happening?">{text}</textarea>
      <button class="btn btn-outline-success btn-block">Add my message!</button>
    </form>
  </div>
</div>"#,
        errors = form_errors(errors),
        text = escape(text),
    );
    layout::page(ctx, "New Message", "", &content)
}

pub fn show_message_page(ctx: &PageContext, message: &message::Model, author: &user::Model) -> String {
    let delete_button = if ctx.current_user_id() == Some(author.id) {
        format!(
            r#"<form method="POST" action="/messages/{}/delete">
        <button class="btn btn-outline-danger">Delete</button>
      </form>"#,
            message.id
        )
    } else {
        String::new()
    };

    let content = format!(
        r#"<div class="bg"></div>
<div class="row justify-content-center">
  <div class="col-md-6">
    <ul class="list-group no-hover" id="messages">
      <li class="list-group-item">
        <a href="/users/{author_id}"><img src="{image}" alt="" class="timeline-image"></a>
        <div class="message-area">
          <div class="message-heading">
            <a href="/users/{author_id}">@{username}</a>
            {delete_button}
          </div>
          <p class="single-message">{text}</p>
          <span class="text-muted">{timestamp}</span>
        </div>
      </li>
    </ul>
  </div>
</div>"#,
        author_id = author.id,
        image = escape(&author.image_url),
        username = escape(&author.username),
        text = escape(&message.text),
        timestamp = format_timestamp(message),
    );
    layout::page(ctx, "Message", "", &content)
}
