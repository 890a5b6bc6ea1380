//! Plain-text rendering of the calendar and list views.

use itertools::Itertools;
use std::fmt::{self, Display};

use crate::calendar::{CalendarCell, MonthIndex};
use crate::provider::PostSummary;

pub const WEEKDAYS: &[&str] = &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub struct DayCell<'a> {
    cell: &'a CalendarCell,
    selected: bool,
    is_today: bool,
}

impl<'a> DayCell<'a> {
    pub const WIDTH: usize = 6;
    const MAX_GLYPHS: usize = 2;

    pub fn new(cell: &'a CalendarCell) -> Self {
        DayCell {
            cell,
            selected: false,
            is_today: false,
        }
    }

    pub fn select(mut self, selected: bool) -> Self {
        self.selected = selected && self.cell.is_interactive();
        self
    }

    pub fn today(mut self, is_today: bool) -> Self {
        self.is_today = is_today && self.cell.is_interactive();
        self
    }

    fn glyphs(&self) -> String {
        let posts = &self.cell.posts;
        if posts.len() > Self::MAX_GLYPHS {
            format!("{}+", posts[0].platform.glyph())
        } else {
            posts.iter().map(|p| p.platform.glyph()).collect()
        }
    }
}

impl Display for DayCell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.cell.is_interactive() {
            return write!(f, "·{:>2}   ", self.cell.day);
        }

        let marker = if self.selected {
            '>'
        } else if self.is_today {
            '*'
        } else {
            ' '
        };

        write!(f, "{}{:>2} {:<2}", marker, self.cell.day, self.glyphs())
    }
}

/// A month grid, one week per line.
pub struct MonthSheet<'a> {
    month: MonthIndex,
    cells: &'a [CalendarCell],
    today: Option<u8>,
    selected: Option<u8>,
}

impl<'a> MonthSheet<'a> {
    pub fn new(month: MonthIndex, cells: &'a [CalendarCell]) -> Self {
        MonthSheet {
            month,
            cells,
            today: None,
            selected: None,
        }
    }

    pub fn today(mut self, day: Option<u8>) -> Self {
        self.today = day;
        self
    }

    pub fn selected(mut self, day: Option<u8>) -> Self {
        self.selected = day;
        self
    }
}

impl Display for MonthSheet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.month)?;
        writeln!(
            f,
            "{}",
            WEEKDAYS
                .iter()
                .map(|d| format!("{:<width$}", d, width = DayCell::WIDTH))
                .join("")
                .trim_end()
        )?;

        for week in self.cells.chunks(WEEKDAYS.len()) {
            let line = week
                .iter()
                .map(|cell| {
                    DayCell::new(cell)
                        .today(self.today == Some(cell.day))
                        .select(self.selected == Some(cell.day))
                })
                .join("");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

pub struct PostLine<'a>(pub &'a PostSummary);

impl Display for PostLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let post = self.0;
        write!(
            f,
            "{:>8}  {:<9}  {}",
            post.time,
            post.platform.label(),
            post.excerpt(PostList::EXCERPT_LEN)
        )?;
        if post.image.is_some() {
            write!(f, " [image]")?;
        }
        Ok(())
    }
}

/// Posts of a month grouped by day.
pub struct PostList<'a> {
    month: MonthIndex,
    cells: &'a [CalendarCell],
}

impl<'a> PostList<'a> {
    pub const EXCERPT_LEN: usize = 60;

    pub fn new(month: MonthIndex, cells: &'a [CalendarCell]) -> Self {
        PostList { month, cells }
    }
}

impl Display for PostList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let days = self
            .cells
            .iter()
            .filter(|cell| cell.is_interactive() && cell.has_posts())
            .collect::<Vec<_>>();

        if days.is_empty() {
            return writeln!(f, "No posts scheduled in {}", self.month);
        }

        for cell in days {
            match self.month.date(cell.day) {
                Some(date) => writeln!(f, "{}", date.format("%a %d %B"))?,
                None => writeln!(f, "{}", cell.day)?,
            }
            for post in &cell.posts {
                writeln!(f, "  {}", PostLine(post))?;
            }
        }
        Ok(())
    }
}
