use std::fs::{self, read_dir};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use crate::frontmatter::Frontmatter;

/// Where posts live, relative to the site root.
pub const POSTS_DIR: &str = "src/content/posts";

#[derive(Debug, Error)]
pub enum PostError {
    #[error("could not read `{0}`")]
    Io(PathBuf, #[source] io::Error),
    #[error("[{0}] missing `---` or `+++` front-matter block")]
    MissingFrontmatter(PathBuf),
    #[error("[{0}] could not parse YAML front-matter")]
    Yaml(PathBuf, #[source] serde_yaml_ng::Error),
    #[error("[{0}] could not parse TOML front-matter")]
    Toml(PathBuf, #[source] toml::de::Error),
}

/// Front-matter flavour, picked by the opening delimiter line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// `---`
    Yaml,
    /// `+++`
    Toml,
}

impl Format {
    fn delimiter(self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Post {
    /// Path below the posts directory, without extension, `/`-separated.
    pub slug: String,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl Post {
    pub fn from_source(source_path: &Path, slug: String) -> Result<Post, PostError> {
        let source = fs::read_to_string(source_path)
            .map_err(|err| PostError::Io(source_path.to_path_buf(), err))?;

        let (format, front, body) = split_frontmatter(&source)
            .ok_or_else(|| PostError::MissingFrontmatter(source_path.to_path_buf()))?;

        let frontmatter: Frontmatter = match format {
            Format::Yaml => serde_yaml_ng::from_str(front)
                .map_err(|err| PostError::Yaml(source_path.to_path_buf(), err))?,
            Format::Toml => toml::from_str(front)
                .map_err(|err| PostError::Toml(source_path.to_path_buf(), err))?,
        };

        Ok(Post {
            slug,
            frontmatter,
            body: body.to_string(),
        })
    }
}

/// Split `source` into its front-matter format, the text between the
/// opening and closing delimiter lines, and everything after the closing
/// line.
fn split_frontmatter(source: &str) -> Option<(Format, &str, &str)> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let (first, rest) = source.split_once('\n').unwrap_or((source, ""));
    let format = match first.trim_end() {
        "---" => Format::Yaml,
        "+++" => Format::Toml,
        _ => return None,
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == format.delimiter() {
            return Some((format, &rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Load every `*.md` post under `dir`, recursively, newest first.
pub fn load_posts(dir: &Path, include_drafts: bool) -> Result<Vec<Post>, PostError> {
    let mut sources = Vec::new();
    collect_markdown(dir, &mut sources)?;

    let mut posts = Vec::new();
    for p in sources {
        let post = Post::from_source(&p, slug_for(dir, &p))?;
        if post.frontmatter.draft && !include_drafts {
            debug!("skipping draft {}", p.display());
            continue;
        }
        posts.push(post);
    }
    posts.sort_by(|a, b| {
        b.frontmatter
            .date
            .cmp(&a.frontmatter.date)
            .then_with(|| a.slug.cmp(&b.slug))
    });

    Ok(posts)
}

fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), PostError> {
    let entries = read_dir(dir).map_err(|err| PostError::Io(dir.to_path_buf(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| PostError::Io(dir.to_path_buf(), err))?;
        let p = entry.path();
        if p.is_dir() {
            collect_markdown(&p, out)?;
        } else if p.extension() == Some(std::ffi::OsStr::new("md")) {
            out.push(p);
        }
    }
    Ok(())
}

fn slug_for(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path).with_extension("");
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn post_source(title: &str, date: &str, draft: bool) -> String {
        format!("---\ntitle: {title}\ndate: {date}\ndraft: {draft}\n---\n\nBody of {title}.\n")
    }

    #[test]
    fn splits_yaml_front_matter_and_body() {
        let (format, front, body) = split_frontmatter("---\ntitle: a\n---\nhello\n").unwrap();
        assert_eq!(format, Format::Yaml);
        assert_eq!(front, "title: a\n");
        assert_eq!(body, "hello\n");
    }

    #[test]
    fn splits_toml_front_matter() {
        let (format, front, _) = split_frontmatter("+++\ntitle = \"a\"\n+++\n").unwrap();
        assert_eq!(format, Format::Toml);
        assert_eq!(front, "title = \"a\"\n");
    }

    #[test]
    fn handles_crlf_and_missing_trailing_newline() {
        let (_, front, body) = split_frontmatter("---\r\ntitle: a\r\n---").unwrap();
        assert_eq!(front, "title: a\r\n");
        assert_eq!(body, "");
    }

    #[test]
    fn delimiters_must_match() {
        assert!(split_frontmatter("---\ntitle: a\n+++\n").is_none());
        assert!(split_frontmatter("---\ntitle: a\n").is_none());
        assert!(split_frontmatter("# no front matter\n").is_none());
    }

    #[test]
    fn body_may_contain_rules() {
        let (_, _, body) = split_frontmatter("---\ntitle: a\n---\none\n\n---\ntwo\n").unwrap();
        assert_eq!(body, "one\n\n---\ntwo\n");
    }

    #[test]
    fn parses_yaml_post_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hello.md");
        fs::write(&path, "---\ntitle: Hello\ndate: 2024-01-02\n---\nHi\n").unwrap();

        let post = Post::from_source(&path, "hello".to_string()).unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.frontmatter.title, "Hello");
        assert_eq!(post.frontmatter.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(post.body, "Hi\n");
    }

    #[test]
    fn parses_toml_post_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("old.md");
        fs::write(&path, "+++\ntitle = \"Old\"\ndate = 2020-02-02\n+++\n").unwrap();

        let post = Post::from_source(&path, "old".to_string()).unwrap();
        assert_eq!(post.frontmatter.date, NaiveDate::from_ymd_opt(2020, 2, 2).unwrap());
    }

    #[test]
    fn bad_front_matter_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.md");
        fs::write(&path, "---\ndate: 2024-01-01\n---\n").unwrap();

        let err = Post::from_source(&path, "broken".to_string()).unwrap_err();
        assert!(matches!(err, PostError::Yaml(..)));
        assert!(err.to_string().contains("broken.md"));
    }

    #[test]
    fn loads_posts_recursively_newest_first_without_drafts() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("2024");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("old.md"), post_source("Old", "2023-01-01", false)).unwrap();
        fs::write(nested.join("new.md"), post_source("New", "2024-01-01", false)).unwrap();
        fs::write(dir.path().join("wip.md"), post_source("Wip", "2025-01-01", true)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let posts = load_posts(dir.path(), false).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["2024/new", "old"]);

        let titles: Vec<_> = load_posts(dir.path(), true)
            .unwrap()
            .into_iter()
            .map(|p| p.frontmatter.title)
            .collect();
        assert_eq!(titles, ["Wip", "New", "Old"]);
    }

    #[test]
    fn missing_posts_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_posts(&dir.path().join(POSTS_DIR), false).unwrap_err();
        assert!(matches!(err, PostError::Io(..)));
    }
}
