use chrono::NaiveDate;
use derive_more::{Display, From};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub mod error;
pub mod file;
pub mod memory;
pub mod sample;

pub use error::*;
pub use file::FileSchedule;
pub use memory::MemorySchedule;
pub use sample::SampleSchedule;

use crate::calendar::MonthIndex;

/// Posts of a single month keyed by their day of month (1-based).
pub type DayPosts = BTreeMap<u8, Vec<PostSummary>>;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn generate() -> Self {
        Uid(uuid::Uuid::new_v4().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Uid {
    fn from(s: &str) -> Self {
        Uid(s.to_owned())
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay)]
pub enum Platform {
    Instagram,
    Facebook,
    Linkedin,
    Twitter,
}

static PLATFORMS: phf::Map<&'static str, Platform> = phf_map! {
    "instagram" => Platform::Instagram,
    "facebook" => Platform::Facebook,
    "linkedin" => Platform::Linkedin,
    "twitter" => Platform::Twitter,
};

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::Linkedin,
        Platform::Twitter,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Linkedin => "LinkedIn",
            Platform::Twitter => "Twitter",
        }
    }

    /// Single character used where a grid cell has no room for the label.
    pub fn glyph(&self) -> char {
        match self {
            Platform::Instagram => 'I',
            Platform::Facebook => 'F',
            Platform::Linkedin => 'L',
            Platform::Twitter => 'T',
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Platform::Instagram
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PLATFORMS
            .get(s.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| Error::new(ErrorKind::PlatformParse, &format!("'{}'", s)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay)]
#[non_exhaustive]
pub enum PostStatus {
    Scheduled,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Scheduled
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostStatus::Scheduled => f.write_str("scheduled"),
        }
    }
}

impl FromStr for PostStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" => Ok(PostStatus::Scheduled),
            _ => Err(Error::new(ErrorKind::StatusParse, &format!("'{}'", s))),
        }
    }
}

/// Display-only record of a scheduled post.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    #[serde(default = "Uid::generate")]
    pub id: Uid,
    pub content: String,
    pub platform: Platform,
    pub time: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub status: PostStatus,
}

impl PostSummary {
    pub fn new(content: &str, platform: Platform, time: &str) -> Self {
        PostSummary {
            id: Uid::generate(),
            content: content.to_owned(),
            platform,
            time: time.to_owned(),
            image: None,
            status: PostStatus::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<Uid>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_image(mut self, url: &str) -> Self {
        self.image = if url.trim().is_empty() {
            None
        } else {
            Some(url.to_owned())
        };
        self
    }

    /// First line of the content, shortened to at most `max` characters.
    pub fn excerpt(&self, max: usize) -> String {
        let line = self.content.lines().next().unwrap_or("");
        if line.chars().count() <= max {
            line.to_owned()
        } else {
            let mut short: String = line.chars().take(max.saturating_sub(1)).collect();
            short.push('…');
            short
        }
    }
}

/// Supplies the posts shown by the calendar and list views.
pub trait ScheduleProvider {
    fn name(&self) -> &str;
    fn posts_of_month(&self, month: MonthIndex) -> DayPosts;

    fn reload(&mut self) -> Result<()> {
        Ok(())
    }

    fn posts_of_day(&self, date: &NaiveDate) -> Vec<PostSummary> {
        use chrono::Datelike;
        self.posts_of_month(MonthIndex::from(*date))
            .remove(&(date.day() as u8))
            .unwrap_or_default()
    }
}

/// Groups dated posts into the `DayPosts` of one month, keeping input order.
pub(crate) fn group_by_day<'a, I>(month: MonthIndex, posts: I) -> DayPosts
where
    I: IntoIterator<Item = &'a (NaiveDate, PostSummary)>,
{
    let mut days = DayPosts::new();
    for (date, post) in posts {
        if MonthIndex::from(*date) == month {
            use chrono::Datelike;
            days.entry(date.day() as u8)
                .or_insert_with(Vec::new)
                .push(post.clone());
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_case_insensitive() {
        assert_eq!("LinkedIn".parse::<Platform>().unwrap(), Platform::Linkedin);
        assert_eq!(" twitter ".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(Error {
                kind: ErrorKind::PlatformParse,
                ..
            })
        ));
    }

    #[test]
    fn platform_display_matches_name() {
        for platform in Platform::ALL.iter() {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), *platform);
        }
        assert_eq!(Platform::default(), Platform::Instagram);
    }

    #[test]
    fn status_parse() {
        assert_eq!("Scheduled".parse::<PostStatus>().unwrap(), PostStatus::Scheduled);
        assert!("published".parse::<PostStatus>().is_err());
    }

    #[test]
    fn excerpt_shortens_long_content() {
        let post = PostSummary::new("Summer sale starts today\nsecond line", Platform::Facebook, "09:00");
        assert_eq!(post.excerpt(80), "Summer sale starts today");
        assert_eq!(post.excerpt(7), "Summer…");
    }

    #[test]
    fn blank_image_is_none() {
        let post = PostSummary::new("x", Platform::Twitter, "10:00").with_image("  ");
        assert_eq!(post.image, None);
    }
}
