use std::fmt::Write;
use unsegen::base::*;
use unsegen::widget::*;

use super::Context;
use crate::render::PostLine;

/// Every post of the shown month, grouped by day.
pub struct ListWindow<'a> {
    context: &'a Context,
}

impl<'a> ListWindow<'a> {
    pub fn new(context: &'a Context) -> Self {
        ListWindow { context }
    }
}

impl Widget for ListWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(20),
            height: RowDemand::at_least(10),
        }
    }

    fn draw(&self, mut window: Window, _hints: RenderingHints) {
        let theme = &self.context.theme;
        let month = self.context.month();
        let cells = match self.context.cells() {
            Ok(cells) => cells,
            Err(e) => {
                log::error!("Could not list {}: {}", month, e);
                return;
            }
        };

        let mut cursor = Cursor::new(&mut window).style_modifier(theme.month_header_style);
        writeln!(&mut cursor, "{}", month).unwrap();

        let days = cells
            .iter()
            .filter(|cell| cell.is_interactive() && cell.has_posts())
            .collect::<Vec<_>>();

        if days.is_empty() {
            cursor.set_style_modifier(theme.day_style);
            writeln!(&mut cursor, "No posts scheduled in {}", month).unwrap();
            return;
        }

        let selected = self.context.cursor();
        for cell in days {
            let date = match month.date(cell.day) {
                Some(date) => date,
                None => continue,
            };

            let style = if date == selected {
                theme.focus_day_style
            } else {
                theme.weekday_header_style
            };
            cursor.set_style_modifier(style);
            write!(&mut cursor, "{}", date.format("%a %d %B")).unwrap();
            cursor.fill_and_wrap_line();

            cursor.set_style_modifier(theme.day_style);
            for post in &cell.posts {
                writeln!(&mut cursor, "  {}", PostLine(post)).unwrap();
            }
        }
    }
}
