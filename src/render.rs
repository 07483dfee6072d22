//! Text rendering with `tinytemplate`.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tinytemplate::TinyTemplate;

use crate::contexts::{HeadContext, PostListContext};

const HEAD_TEMPLATE: &str = r#"<meta charset="utf-8">
<title>{title}</title>
{{ if description }}<meta name="description" content="{description}">
{{ endif }}{{ if author }}<meta name="author" content="{author}">
{{ endif }}{{ if twitter }}<meta name="twitter:site" content="{twitter}">
{{ endif }}<style>
{theme_css | unescaped}
</style>
"#;

const POST_LIST_TEMPLATE: &str = "{site_title} ({count} posts)
{{ for post in posts }}{post.date | long_date}  {post.title}  [{post.slug}]{{ if post.tags }}  #{post.tags}{{ endif }}{{ if post.draft }}  (draft){{ endif }}
{{ endfor }}";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("could not compile the `{0}` template")]
    Compile(&'static str, #[source] tinytemplate::error::Error),
    #[error("could not render the `{0}` template")]
    Render(&'static str, #[source] tinytemplate::error::Error),
}

fn render<C: Serialize>(
    name: &'static str,
    template: &'static str,
    context: &C,
    escape_html: bool,
) -> Result<String, RenderError> {
    let mut tt = TinyTemplate::new();
    if !escape_html {
        tt.set_default_formatter(&tinytemplate::format_unescaped);
    }
    tt.add_formatter("long_date", long_date_formatter);
    tt.add_template(name, template)
        .map_err(|err| RenderError::Compile(name, err))?;
    tt.render(name, context)
        .map_err(|err| RenderError::Render(name, err))
}

/// `<head>` fragment: meta tags plus the theme stylesheet.
pub fn render_head(context: &HeadContext) -> Result<String, RenderError> {
    render("head", HEAD_TEMPLATE, context, true)
}

/// Plain-text post listing for the terminal.
pub fn render_post_list(context: &PostListContext) -> Result<String, RenderError> {
    render("posts", POST_LIST_TEMPLATE, context, false)
}

fn long_date_formatter(value: &Value, output: &mut String) -> tinytemplate::error::Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::String(s) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                tinytemplate::error::Error::GenericError {
                    msg: format!("date `{s}` is not formatted as YYYY-MM-DD"),
                }
            })?;
            output.push_str(&date.format("%B %e, %Y").to_string());
            Ok(())
        }
        _ => Err(tinytemplate::error::Error::GenericError {
            msg: "Incorrect date".to_string(),
        }),
    }
}
