use chrono::Datelike;
use std::fmt::Write;
use unsegen::base::*;
use unsegen::input::Scrollable;
use unsegen::widget::*;

use super::Context;
use crate::render::{DayCell, PostLine, WEEKDAYS};

pub struct MonthPane<'a> {
    context: &'a Context,
}

impl<'a> MonthPane<'a> {
    const ROWS: usize = 6;
    const HEADER_ROWS: usize = 2;

    pub fn new(context: &'a Context) -> Self {
        MonthPane { context }
    }
}

impl Widget for MonthPane<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::exact(WEEKDAYS.len() * DayCell::WIDTH),
            height: RowDemand::exact(Self::HEADER_ROWS + Self::ROWS),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let cells = match self.context.grid() {
            Ok(cells) => cells,
            Err(e) => {
                log::error!("Could not lay out {}: {}", self.context.month(), e);
                return;
            }
        };

        let today = self.context.today_in_month();
        let selected = self.context.cursor().day() as u8;

        let mut cursor = Cursor::new(&mut window)
            .wrapping_mode(WrappingMode::Wrap)
            .style_modifier(theme.month_header_style);

        writeln!(&mut cursor, "{}", self.context.month()).unwrap();

        cursor.set_style_modifier(theme.weekday_header_style);
        for head in WEEKDAYS {
            write!(&mut cursor, "{:<width$}", head, width = DayCell::WIDTH).unwrap();
        }
        cursor.fill_and_wrap_line();

        for week in cells.chunks(WEEKDAYS.len()) {
            for cell in week {
                let is_today = cell.is_interactive() && today == Some(cell.day);
                let is_selected = cell.is_interactive() && cell.day == selected;

                let style = if !cell.is_interactive() {
                    theme.filler_day_style
                } else if is_selected {
                    theme.focus_day_style
                } else if is_today {
                    theme.today_day_style
                } else {
                    theme.day_style
                };
                cursor.set_style_modifier(style);

                let text = DayCell::new(cell).today(is_today).select(is_selected);
                if let Err(err) = write!(&mut cursor, "{}", text) {
                    log::warn!("Error while writing day {}: {}", cell.day, err);
                }
            }
            cursor.set_style_modifier(theme.day_style);
            cursor.fill_and_wrap_line();
        }
    }
}

/// Posts of the selected day.
pub struct DayWindow<'a> {
    context: &'a Context,
}

impl<'a> DayWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        DayWindow { context }
    }
}

impl Widget for DayWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(10),
            height: RowDemand::at_least(10),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let posts = self.context.posts_of_cursor();

        let mut cursor = Cursor::new(&mut window).style_modifier(theme.month_header_style);
        writeln!(&mut cursor, "{}", self.context.cursor().format("%A, %d %B %Y")).unwrap();
        cursor.set_style_modifier(theme.day_style);

        if posts.is_empty() {
            writeln!(&mut cursor, "No posts").unwrap();
            return;
        }

        for (idx, post) in posts.iter().enumerate() {
            let saved_style = cursor.get_style_modifier();

            if idx == self.context.postlist_index {
                cursor.apply_style_modifier(theme.post_focus_style);
            }

            if let Err(err) = write!(&mut cursor, "{}", PostLine(post)) {
                log::warn!("Error while writing post {}: {}", post.id, err);
            }

            cursor.fill_and_wrap_line();
            cursor.set_style_modifier(saved_style);
        }
    }
}

pub struct DayWindowBehaviour<'a>(pub &'a mut Context, pub usize);

impl Scrollable for DayWindowBehaviour<'_> {
    fn scroll_backwards(&mut self) -> unsegen::input::OperationResult {
        if self.0.postlist_index > 0 {
            self.0.postlist_index -= 1;
            Ok(())
        } else {
            Err(())
        }
    }

    fn scroll_forwards(&mut self) -> unsegen::input::OperationResult {
        if self.0.postlist_index + 1 < self.1 {
            self.0.postlist_index += 1;
            Ok(())
        } else {
            Err(())
        }
    }
}
