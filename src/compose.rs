use chrono::{NaiveDate, NaiveTime};
use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1},
    character::complete::{alpha1, char, space0, space1},
    combinator::all_consuming,
    multi::separated_list1,
    sequence::{delimited, separated_pair},
    IResult,
};
use serde::Serialize;

use crate::provider::{Error, ErrorKind, Platform, PostSummary, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
const DISPLAY_TIME_FORMAT: &str = "%I:%M %p";

/// Payload handed to the submission callback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub platform: Platform,
    pub content: String,
    pub image_url: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
}

impl ScheduleRequest {
    pub fn when(&self) -> String {
        format!("{} {}", self.scheduled_date, self.scheduled_time)
    }

    pub fn to_post(&self) -> Result<(NaiveDate, PostSummary)> {
        let date = NaiveDate::parse_from_str(self.scheduled_date.trim(), DATE_FORMAT).map_err(|e| {
            Error::new(
                ErrorKind::DateParse,
                &format!("'{}': {}", self.scheduled_date, e),
            )
        })?;
        let time = NaiveTime::parse_from_str(self.scheduled_time.trim(), TIME_FORMAT).map_err(|e| {
            Error::new(
                ErrorKind::TimeParse,
                &format!("'{}': {}", self.scheduled_time, e),
            )
        })?;

        let post = PostSummary::new(
            &self.content,
            self.platform,
            &time.format(DISPLAY_TIME_FORMAT).to_string(),
        )
        .with_image(&self.image_url);

        Ok((date, post))
    }
}

/// State of the compose form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposeForm {
    pub platform: Platform,
    pub content: String,
    pub image_url: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    default_platform: Platform,
}

impl Default for ComposeForm {
    fn default() -> Self {
        ComposeForm::new(Platform::default())
    }
}

impl ComposeForm {
    pub fn new(default_platform: Platform) -> Self {
        ComposeForm {
            platform: default_platform,
            content: String::new(),
            image_url: String::new(),
            scheduled_date: String::new(),
            scheduled_time: String::new(),
            default_platform,
        }
    }

    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = content.to_owned();
        self
    }

    pub fn image_url(mut self, url: &str) -> Self {
        self.image_url = url.to_owned();
        self
    }

    pub fn scheduled_date(mut self, date: &str) -> Self {
        self.scheduled_date = date.to_owned();
        self
    }

    pub fn scheduled_time(mut self, time: &str) -> Self {
        self.scheduled_time = time.to_owned();
        self
    }

    /// Content, date and time must be non-empty. Nothing else is checked.
    pub fn is_complete(&self) -> bool {
        [&self.content, &self.scheduled_date, &self.scheduled_time]
            .iter()
            .all(|field| !field.is_empty())
    }

    pub fn reset(&mut self) {
        *self = ComposeForm::new(self.default_platform);
    }

    /// Hands the form to `on_submit` and clears it. An incomplete form is left
    /// untouched and the callback is not called.
    pub fn submit<F>(&mut self, on_submit: F) -> bool
    where
        F: FnOnce(ScheduleRequest),
    {
        if !self.is_complete() {
            log::debug!("Ignoring submission of incomplete form");
            return false;
        }

        on_submit(ScheduleRequest {
            platform: self.platform,
            content: self.content.clone(),
            image_url: self.image_url.clone(),
            scheduled_date: self.scheduled_date.clone(),
            scheduled_time: self.scheduled_time.clone(),
        });
        self.reset();
        true
    }

    /// Applies a line like `platform:twitter content:"Hello there" date:2025-06-10 time:10:00`.
    /// Either every field is applied or, on error, none.
    pub fn apply_line(&mut self, line: &str) -> Result<()> {
        let mut updated = self.clone();
        for (key, value) in parse_compose_line(line)? {
            let (_, setter) = COMPOSE_FIELDS
                .iter()
                .find(|(name, _)| *name == key)
                .ok_or_else(|| {
                    Error::new(ErrorKind::ComposeParse, &format!("unknown field '{}'", key))
                })?;
            setter(&mut updated, value)?;
        }

        *self = updated;
        Ok(())
    }
}

type FieldSetter = fn(&mut ComposeForm, &str) -> Result<()>;
const COMPOSE_FIELDS: &[(&str, FieldSetter)] = &[
    ("platform", |f, v| {
        f.platform = v.parse()?;
        Ok(())
    }),
    ("content", |f, v| {
        f.content = v.to_owned();
        Ok(())
    }),
    ("image", |f, v| {
        f.image_url = v.to_owned();
        Ok(())
    }),
    ("date", |f, v| {
        f.scheduled_date = v.to_owned();
        Ok(())
    }),
    ("time", |f, v| {
        f.scheduled_time = v.to_owned();
        Ok(())
    }),
];

fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till(|c: char| c == '"'), char('"'))(input)
}

fn bare(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace() || c == '"')(input)
}

fn key_value(input: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(alpha1, char(':'), alt((quoted, bare)))(input)
}

/// Splits a compose line into its `key:value` pairs.
pub fn parse_compose_line(line: &str) -> Result<Vec<(&str, &str)>> {
    let (_, pairs) = all_consuming(delimited(
        space0,
        separated_list1(space1, key_value),
        space0,
    ))(line)
    .map_err(|_| Error::new(ErrorKind::ComposeParse, &format!("'{}'", line)))?;

    Ok(pairs)
}
