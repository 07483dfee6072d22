use serde::Serialize;

use crate::config::GitvoyConfig;
use crate::post::Post;

/// Values for the `<head>` fragment.
#[derive(Serialize)]
pub struct HeadContext {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub twitter: Option<String>,
    pub theme_css: String,
}

impl HeadContext {
    pub fn new(config: &GitvoyConfig, theme_css: String) -> HeadContext {
        let site = &config.site;
        HeadContext {
            title: site.title.clone(),
            description: site.description.clone(),
            author: site.author.clone(),
            twitter: site.social.as_ref().and_then(|s| s.twitter.clone()),
            theme_css,
        }
    }
}

#[derive(Serialize)]
pub struct PostEntryContext {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub tags: String,
    pub draft: bool,
}

impl From<&Post> for PostEntryContext {
    fn from(post: &Post) -> PostEntryContext {
        let fm = &post.frontmatter;
        PostEntryContext {
            slug: post.slug.clone(),
            title: fm.title.clone(),
            date: fm.date.format("%Y-%m-%d").to_string(),
            tags: fm.tags.join(", "),
            draft: fm.draft,
        }
    }
}

#[derive(Serialize)]
pub struct PostListContext {
    pub site_title: String,
    pub posts: Vec<PostEntryContext>,
    pub count: usize,
}
