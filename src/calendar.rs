use chrono::{Datelike, Local, Month, NaiveDate};
use num_traits::FromPrimitive;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::provider::{DayPosts, Error, ErrorKind, PostSummary, Result};

const DAYS_PER_WEEK: usize = 7;

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_of_month(month: &Month, year: i32) -> u8 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthIndex {
    index: Month,
    year: i32,
}

impl MonthIndex {
    pub fn new(index: Month, year: i32) -> Self {
        MonthIndex { index, year }
    }

    pub fn month(&self) -> Month {
        self.index
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn next(&self) -> Self {
        *self + 1
    }

    pub fn prev(&self) -> Self {
        *self - 1
    }

    pub fn days(&self) -> u8 {
        days_of_month(&self.index, self.year)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.index.number_from_month(), 1)
    }

    /// Date of `day` in this month, clamped to the last day.
    pub fn date(&self, day: u8) -> Option<NaiveDate> {
        let day = day.max(1).min(self.days());
        NaiveDate::from_ymd_opt(self.year, self.index.number_from_month(), day as u32)
    }

    fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + self.index.number_from_month() as i64 - 1
    }

    fn from_ordinal(ordinal: i64) -> Self {
        let month0 = ordinal.rem_euclid(12) as u32;
        MonthIndex {
            index: Month::from_u32(month0 + 1).unwrap_or(Month::January),
            year: ordinal.div_euclid(12) as i32,
        }
    }
}

impl Default for MonthIndex {
    fn default() -> Self {
        MonthIndex::from(Local::now().date_naive())
    }
}

impl<T: Datelike> From<T> for MonthIndex {
    fn from(m: T) -> Self {
        MonthIndex::new(
            Month::from_u32(m.month()).unwrap_or(Month::January),
            m.year(),
        )
    }
}

impl Add<u32> for MonthIndex {
    type Output = MonthIndex;
    fn add(self, rhs: u32) -> Self::Output {
        MonthIndex::from_ordinal(self.ordinal() + rhs as i64)
    }
}

impl Sub<u32> for MonthIndex {
    type Output = MonthIndex;
    fn sub(self, rhs: u32) -> Self::Output {
        MonthIndex::from_ordinal(self.ordinal() - rhs as i64)
    }
}

impl PartialOrd for MonthIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MonthIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.index.name(), self.year)
    }
}

/// Parses `YYYY-MM`.
impl FromStr for MonthIndex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::DateParse, &format!("'{}' is not YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month
            .parse::<u32>()
            .ok()
            .and_then(Month::from_u32)
            .ok_or_else(invalid)?;
        Ok(MonthIndex::new(month, year))
    }
}

/// Parameters driving the shape of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthContext {
    days_in_month: u8,
    filler_days: u8,
    days_in_previous_month: u8,
}

impl MonthContext {
    pub fn new(days_in_month: u8, filler_days: u8, days_in_previous_month: u8) -> Result<Self> {
        if !(1..=31).contains(&days_in_month) {
            return Err(Error::new(
                ErrorKind::MonthRange,
                &format!("{} days in month", days_in_month),
            ));
        }
        if !(28..=31).contains(&days_in_previous_month) {
            return Err(Error::new(
                ErrorKind::MonthRange,
                &format!("{} days in previous month", days_in_previous_month),
            ));
        }
        if filler_days as usize >= DAYS_PER_WEEK || filler_days > days_in_previous_month {
            return Err(Error::new(
                ErrorKind::MonthRange,
                &format!(
                    "{} filler days from a month of {} days",
                    filler_days, days_in_previous_month
                ),
            ));
        }

        Ok(MonthContext {
            days_in_month,
            filler_days,
            days_in_previous_month,
        })
    }

    /// Context of a real calendar month with weeks starting on Monday.
    pub fn for_month(month: MonthIndex) -> Result<Self> {
        let first = month.first_day().ok_or_else(|| {
            Error::new(ErrorKind::MonthRange, &format!("{} is not representable", month))
        })?;

        MonthContext::new(
            month.days(),
            first.weekday().num_days_from_monday() as u8,
            month.prev().days(),
        )
    }

    pub fn days_in_month(&self) -> u8 {
        self.days_in_month
    }

    pub fn filler_days(&self) -> u8 {
        self.filler_days
    }

    pub fn days_in_previous_month(&self) -> u8 {
        self.days_in_previous_month
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Membership {
    Previous,
    Current,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: u8,
    pub membership: Membership,
    pub posts: Vec<PostSummary>,
}

impl CalendarCell {
    fn filler(day: u8, membership: Membership) -> Self {
        CalendarCell {
            day,
            membership,
            posts: Vec::new(),
        }
    }

    /// Only days of the composed month accept selection.
    pub fn is_interactive(&self) -> bool {
        self.membership == Membership::Current
    }

    pub fn has_posts(&self) -> bool {
        !self.posts.is_empty()
    }
}

pub fn compose(ctx: &MonthContext, posts: &DayPosts) -> Vec<CalendarCell> {
    let first_filler = ctx.days_in_previous_month + 1 - ctx.filler_days;

    (first_filler..=ctx.days_in_previous_month)
        .map(|day| CalendarCell::filler(day, Membership::Previous))
        .chain((1..=ctx.days_in_month).map(|day| CalendarCell {
            day,
            membership: Membership::Current,
            posts: posts.get(&day).cloned().unwrap_or_default(),
        }))
        .collect()
}

/// Like `compose`, but fills the last week with days of the next month.
pub fn compose_padded(ctx: &MonthContext, posts: &DayPosts) -> Vec<CalendarCell> {
    let mut cells = compose(ctx, posts);
    let trailing = (DAYS_PER_WEEK - cells.len() % DAYS_PER_WEEK) % DAYS_PER_WEEK;
    cells.extend((1..=trailing as u8).map(|day| CalendarCell::filler(day, Membership::Next)));
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{Platform, PostSummary};

    fn post(id: &str) -> PostSummary {
        PostSummary::new(id, Platform::Instagram, "10:00 AM").with_id(id)
    }

    fn sample_mapping() -> DayPosts {
        let mut mapping = DayPosts::new();
        mapping.insert(4, vec![post("p1")]);
        mapping.insert(18, vec![post("p2"), post("p3")]);
        mapping
    }

    #[test]
    fn cell_count_is_filler_plus_days() {
        for &(days, filler) in &[(28u8, 0u8), (30, 6), (31, 3), (1, 0)] {
            let ctx = MonthContext::new(days, filler, 31).unwrap();
            assert_eq!(
                compose(&ctx, &DayPosts::new()).len(),
                days as usize + filler as usize
            );
        }
    }

    #[test]
    fn posts_land_on_their_days() {
        let ctx = MonthContext::new(30, 6, 31).unwrap();
        let cells = compose(&ctx, &sample_mapping());

        assert_eq!(cells[0].day, 26);
        assert_eq!(cells[0].membership, Membership::Previous);
        assert!(cells[0].posts.is_empty());

        assert_eq!(cells[9].day, 4);
        assert_eq!(cells[9].posts, vec![post("p1")]);

        assert_eq!(cells[23].day, 18);
        let ids: Vec<&str> = cells[23].posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p3"]);

        assert!(cells[10].posts.is_empty());
    }

    #[test]
    fn filler_days_never_carry_posts() {
        let mut mapping = sample_mapping();
        mapping.insert(30, vec![post("late")]);
        mapping.insert(27, vec![post("filler-number")]);

        let ctx = MonthContext::new(30, 6, 31).unwrap();
        let cells = compose(&ctx, &mapping);

        let fillers: Vec<u8> = cells
            .iter()
            .filter(|c| c.membership == Membership::Previous)
            .map(|c| c.day)
            .collect();
        assert_eq!(fillers, vec![26, 27, 28, 29, 30, 31]);
        assert!(cells
            .iter()
            .filter(|c| !c.is_interactive())
            .all(|c| c.posts.is_empty()));
    }

    #[test]
    fn current_days_ascend_from_one() {
        let ctx = MonthContext::new(31, 2, 30).unwrap();
        let days: Vec<u8> = compose(&ctx, &DayPosts::new())
            .iter()
            .filter(|c| c.is_interactive())
            .map(|c| c.day)
            .collect();
        assert_eq!(days, (1..=31).collect::<Vec<u8>>());
    }

    #[test]
    fn compose_is_idempotent() {
        let ctx = MonthContext::new(30, 6, 31).unwrap();
        let mapping = sample_mapping();
        assert_eq!(compose(&ctx, &mapping), compose(&ctx, &mapping));
    }

    #[test]
    fn padded_grid_fills_whole_weeks() {
        let ctx = MonthContext::new(30, 6, 31).unwrap();
        let cells = compose_padded(&ctx, &sample_mapping());
        assert_eq!(cells.len() % 7, 0);
        assert_eq!(cells.len(), 42);
        let last = cells.last().unwrap();
        assert_eq!((last.day, last.membership), (6, Membership::Next));
        assert!(!last.is_interactive());

        let exact = MonthContext::new(28, 0, 31).unwrap();
        assert_eq!(compose_padded(&exact, &DayPosts::new()).len(), 28);
    }

    #[test]
    fn context_bounds_are_checked() {
        assert!(MonthContext::new(0, 0, 31).is_err());
        assert!(MonthContext::new(32, 0, 31).is_err());
        assert!(MonthContext::new(30, 7, 31).is_err());
        assert!(MonthContext::new(30, 0, 32).is_err());
        assert!(MonthContext::new(30, 0, 255).is_err());
        assert!(MonthContext::new(30, 6, 5).is_err());
        assert!(MonthContext::new(30, 0, 27).is_err());
        assert!(MonthContext::new(30, 6, 31).is_ok());
        assert!(MonthContext::new(31, 6, 28).is_ok());
    }

    #[test]
    fn short_previous_month_fills_its_tail() {
        let ctx = MonthContext::new(31, 6, 28).unwrap();
        let cells = compose(&ctx, &DayPosts::new());
        assert_eq!(cells.len(), 37);
        assert_eq!(
            cells[..6].iter().map(|c| c.day).collect::<Vec<_>>(),
            vec![23, 24, 25, 26, 27, 28]
        );
    }

    #[test]
    fn context_of_real_months() {
        let june = MonthIndex::new(Month::June, 2025);
        let ctx = MonthContext::for_month(june).unwrap();
        assert_eq!(
            (ctx.days_in_month(), ctx.filler_days(), ctx.days_in_previous_month()),
            (30, 6, 31)
        );

        let feb = MonthIndex::new(Month::February, 2024);
        assert_eq!(feb.days(), 29);
        assert_eq!(MonthIndex::new(Month::February, 1900).days(), 28);
        assert_eq!(MonthIndex::new(Month::February, 2000).days(), 29);

        // 2024-07-01 is a Monday
        let july = MonthContext::for_month(MonthIndex::new(Month::July, 2024)).unwrap();
        assert_eq!(july.filler_days(), 0);
    }

    #[test]
    fn month_index_wraps_years() {
        let dec = MonthIndex::new(Month::December, 2024);
        assert_eq!(dec.next(), MonthIndex::new(Month::January, 2025));
        assert_eq!(dec.next().prev(), dec);
        assert_eq!(dec + 13, MonthIndex::new(Month::January, 2026));
        assert_eq!(dec - 12, MonthIndex::new(Month::December, 2023));
        assert_eq!(
            MonthIndex::new(Month::March, 2025) - 3,
            MonthIndex::new(Month::December, 2024)
        );
        assert!(dec < dec.next());
    }

    #[test]
    fn month_index_parse_and_display() {
        let idx: MonthIndex = "2025-06".parse().unwrap();
        assert_eq!(idx, MonthIndex::new(Month::June, 2025));
        assert_eq!(idx.to_string(), "June 2025");
        assert!("2025-13".parse::<MonthIndex>().is_err());
        assert!("June".parse::<MonthIndex>().is_err());
    }

    #[test]
    fn date_clamps_to_month_end() {
        let feb = MonthIndex::new(Month::February, 2025);
        assert_eq!(feb.date(31), NaiveDate::from_ymd_opt(2025, 2, 28));
    }
}
