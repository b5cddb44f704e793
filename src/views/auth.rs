use super::{escape, form_errors, layout, PageContext};

fn text_input(name: &str, kind: &str, placeholder: &str, value: &str) -> String {
    format!(
        r#"<input type="{kind}" id="{name}" name="{name}" class="form-control" placeholder="{placeholder}" value="{value}">"#,
        value = escape(value),
    )
}

/// Signup form, prefilled with whatever was submitted before.
pub fn signup_page(
    ctx: &PageContext,
    username: &str,
    email: &str,
    image_url: &str,
    errors: &[String],
) -> String {
    let content = format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <h2 class="join-message">Join Warbler today.</h2>
    {errors}
    <form method="POST" action="/signup" id="user_form">
      {email}
      {username}
      {password}
      {image_url}
      <button class="btn btn-primary btn-lg btn-block">Sign me up!</button>
    </form>
  </div>
</div>"#,
        errors = form_errors(errors),
        email = text_input("email", "email", "E-mail", email),
        username = text_input("username", "text", "Username", username),
        password = text_input("password", "password", "Password", ""),
        image_url = text_input("image_url", "text", "(Optional) Image URL", image_url),
    );
    layout::page(ctx, "Sign up", "", &content)
}

/// Login form. The password is never echoed back.
pub fn login_page(ctx: &PageContext, username: &str, errors: &[String]) -> String {
    let content = format!(
        r#"<div class="row justify-content-md-center">
  <div class="col-md-7 col-lg-5">
    <h2 class="join-message">Welcome back.</h2>
    {errors}
    <form method="POST" action="/login" id="user_form">
      {username}
      {password}
      <button class="btn btn-primary btn-block btn-lg">Log in</button>
    </form>
  </div>
</div>"#,
        errors = form_errors(errors),
        username = text_input("username", "text", "Username", username),
        password = text_input("password", "password", "Password", ""),
    );
    layout::page(ctx, "Log in", "", &content)
}
