use super::{layout, PageContext};

fn error_page(title: &str, heading: &str, detail: &str) -> String {
    let content = format!(
        r#"<div class="row justify-content-center">
  <div class="col-md-6 text-center">
    <h1>{heading}</h1>
    <p>{detail}</p>
    <a href="/" class="btn btn-primary">Back home</a>
  </div>
</div>"#
    );
    layout::page(&PageContext::default(), title, "", &content)
}

pub fn not_found_page() -> String {
    error_page("Not Found", "404", "The page you were looking for does not exist.")
}

pub fn forbidden_page() -> String {
    error_page("Forbidden", "403", "You are not allowed to do that.")
}

pub fn server_error_page() -> String {
    error_page("Server Error", "500", "Something went wrong on our end.")
}
