use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Blog post front-matter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "fm_date_format")]
    pub date: NaiveDate,
    #[serde(default)]
    pub tags: Vec<String>,
    pub cover_image: Option<String>,
    #[serde(default)]
    pub draft: bool,
}

mod fm_date_format {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = format!("{}", date.format("%Y-%m-%d"));
        serializer.serialize_str(&s)
    }

    // Accepts a string in one of the formats below, or a bare TOML
    // date/datetime. YAML dates arrive as plain strings. Time and offset
    // are dropped.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = match toml::Value::deserialize(deserializer)? {
            toml::Value::String(s) => s,
            toml::Value::Datetime(dt) => dt.to_string(),
            other => {
                return Err(de::Error::custom(format!(
                    "expected a date, found {}",
                    other.type_str()
                )))
            }
        };
        coerce(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{raw}`")))
    }

    pub(super) fn coerce(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
            .or_else(|| {
                ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default() {
        let fm: Frontmatter = toml::from_str(
            "title = \"Hello\"\ndate = \"2024-03-01\"\n",
        ).unwrap();

        assert_eq!(fm.title, "Hello");
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert!(fm.tags.is_empty());
        assert!(!fm.draft);
        assert_eq!(fm.description, None);
        assert_eq!(fm.cover_image, None);
    }

    #[test]
    fn full_front_matter() {
        let fm: Frontmatter = toml::from_str(r#"
            title = "Hello"
            description = "First post"
            date = 2024-03-01
            tags = ["rust", "blog"]
            coverImage = "/img/cover.png"
            draft = true
        "#).unwrap();

        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(fm.tags, ["rust", "blog"]);
        assert_eq!(fm.cover_image.as_deref(), Some("/img/cover.png"));
        assert!(fm.draft);
    }

    #[test]
    fn yaml_front_matter() {
        let fm: Frontmatter = serde_yaml_ng::from_str(
            "title: Hello\ndate: 2024-01-02\ntags: [rust, blog]\ncoverImage: ./cover.png\ndraft: true\n",
        ).unwrap();

        assert_eq!(fm.title, "Hello");
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(fm.tags, ["rust", "blog"]);
        assert_eq!(fm.cover_image.as_deref(), Some("./cover.png"));
        assert!(fm.draft);
    }

    #[test]
    fn yaml_defaults_and_quoted_datetime() {
        let fm: Frontmatter = serde_yaml_ng::from_str(
            "title: 'Hello: again'\ndate: '2024-01-02T09:00:00Z'\n",
        ).unwrap();

        assert_eq!(fm.title, "Hello: again");
        assert_eq!(fm.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert!(fm.tags.is_empty());
        assert!(!fm.draft);
    }

    #[test]
    fn datetimes_are_coerced_to_dates() {
        let day = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(fm_date_format::coerce("2023-12-31T23:00:00+09:00"), Some(day));
        assert_eq!(fm_date_format::coerce("2023-12-31T08:30:00"), Some(day));
        assert_eq!(fm_date_format::coerce("2023-12-31 08:30:00"), Some(day));
        assert_eq!(fm_date_format::coerce("2023-12-31T08:30:00.000Z"), Some(day));
        assert_eq!(fm_date_format::coerce("yesterday"), None);
    }

    #[test]
    fn title_and_date_are_required() {
        assert!(toml::from_str::<Frontmatter>("date = \"2024-01-01\"").is_err());
        assert!(toml::from_str::<Frontmatter>("title = \"x\"").is_err());
        assert!(toml::from_str::<Frontmatter>("title = \"x\"\ndate = \"soon\"").is_err());
    }
}
