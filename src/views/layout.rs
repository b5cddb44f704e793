use super::{escape, PageContext};

fn navbar(ctx: &PageContext) -> String {
    let links = match &ctx.current_user {
        None => r#"<li><a href="/signup">Sign up</a></li>
        <li><a href="/login">Log in</a></li>"#
            .to_string(),
        Some(user) => format!(
            r#"<li>
          <form class="navbar-form navbar-right" action="/users">
            <input name="q" class="form-control" placeholder="Search Warbler" id="search">
            <button class="btn btn-default"><span class="fa fa-search"></span></button>
          </form>
        </li>
        <li><a href="/users/{id}"><img src="{image}" alt="{username}"></a></li>
        <li><a href="/messages/new">New Message</a></li>
        <li><a href="/logout">Log out</a></li>"#,
            id = user.id,
            image = escape(&user.image_url),
            username = escape(&user.username),
        ),
    };

    format!(
        r#"<nav class="navbar navbar-expand">
  <div class="container-fluid">
    <div class="navbar-header">
      <a href="/" class="navbar-brand">
        <img src="/static/images/warbler-logo.png" alt="logo">
        <span>Warbler</span>
      </a>
    </div>
    <ul class="nav navbar-nav navbar-right">
        {links}
    </ul>
  </div>
</nav>"#
    )
}

fn flashes(ctx: &PageContext) -> String {
    ctx.flashes
        .iter()
        .map(|f| {
            format!(
                "<div class=\"alert alert-{}\">{}</div>\n",
                f.category.as_str(),
                escape(&f.message)
            )
        })
        .collect()
}

/// Wrap page content in the shared document shell.
pub fn page(ctx: &PageContext, title: &str, body_class: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>{title}</title>
  <link rel="stylesheet" href="https://unpkg.com/bootstrap/dist/css/bootstrap.css">
  <link rel="stylesheet" href="https://use.fontawesome.com/releases/v5.3.1/css/all.css">
  <link rel="stylesheet" href="/static/stylesheets/style.css">
  <link rel="shortcut icon" href="/static/favicon.ico">
</head>
<body class="{body_class}">
{navbar}
<div class="container">
{flashes}
{content}
</div>
</body>
</html>
"#,
        title = escape(title),
        body_class = body_class,
        navbar = navbar(ctx),
        flashes = flashes(ctx),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Flash;

    #[test]
    fn test_flashes_are_rendered_escaped() {
        let ctx = PageContext::new(None, vec![Flash::danger("<b>Access unauthorized.</b>")]);
        let html = page(&ctx, "Warbler", "", "<p>content</p>");

        assert!(html.contains(r#"<div class="alert alert-danger">&lt;b&gt;Access unauthorized.&lt;/b&gt;</div>"#));
        assert!(html.contains("<p>content</p>"));
        assert!(html.contains(r#"<a href="/login">Log in</a>"#));
    }
}
