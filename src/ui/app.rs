use std::fmt::Write;
use unsegen::base::{Cursor, GraphemeCluster, Terminal, Window};
use unsegen::input::{Behavior, EditBehavior, Event as InputEvent, Input, Key, ScrollBehavior};
use unsegen::widget::*;

use crate::agenda::Agenda;
use crate::config::Config;
use crate::events::{Dispatcher, Event};

use super::calendar_window::{DayWindow, DayWindowBehaviour, MonthPane};
use super::command::CommandParser;
use super::insert::InsertParser;
use super::post_list::ListWindow;
use super::{Context, Mode, ViewMode};

pub struct App {
    context: Context,
}

impl App {
    pub fn new(config: &Config, agenda: Agenda) -> App {
        App {
            context: Context::new(config, agenda),
        }
    }

    pub fn with_context(context: Context) -> App {
        App { context }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    fn as_widget<'w>(&'w self) -> impl Widget + 'w {
        VLayout::new()
            .widget(MainWindow(&self.context))
            .widget(BottomBar(&self.context))
    }

    pub fn run(
        &mut self,
        dispatcher: Dispatcher,
        mut term: Terminal,
    ) -> Result<(), Box<dyn std::error::Error>> {
        while !self.context.quit {
            match dispatcher.next()? {
                Event::Update => self.context.update(),
                Event::ExternalModification => self.context.reload(),
                Event::Input(input) => self.handle_input(input),
            }

            let root = term.create_root_window();
            self.as_widget().draw(root, RenderingHints::new());
            term.present();
        }

        Ok(())
    }

    fn handle_input(&mut self, input: Input) {
        if input.matches(Key::Esc) {
            self.context.mode = Mode::Normal;
            return;
        }

        match self.context.mode {
            Mode::Normal => {
                let num_posts = self.context.posts_of_cursor().len();
                let leftover = input
                    .chain(
                        ScrollBehavior::new(&mut DayWindowBehaviour(&mut self.context, num_posts))
                            .forwards_on(Key::Char(']'))
                            .backwards_on(Key::Char('[')),
                    )
                    .finish();

                if let Some(Input {
                    event: InputEvent::Key(Key::Char(c)),
                    ..
                }) = leftover
                {
                    self.normal_key(c);
                }
            }
            mode @ (Mode::Command | Mode::Insert) => {
                let leftover = match mode {
                    Mode::Insert => InsertParser::new(&mut self.context).input(input),
                    _ => CommandParser::new(&mut self.context).input(input),
                };

                if let Some(input) = leftover {
                    input
                        .chain(
                            EditBehavior::new(self.context.input_sink_mut(mode))
                                .delete_forwards_on(Key::Delete)
                                .delete_backwards_on(Key::Backspace)
                                .left_on(Key::Left)
                                .right_on(Key::Right),
                        )
                        .chain(
                            ScrollBehavior::new(self.context.input_sink_mut(mode))
                                .backwards_on(Key::Up)
                                .forwards_on(Key::Down),
                        )
                        .finish();
                }
            }
        }
    }

    fn normal_key(&mut self, key: char) {
        let ctx = &mut self.context;
        match key {
            'q' => ctx.quit = true,
            ':' => ctx.mode = Mode::Command,
            'i' => ctx.mode = Mode::Insert,
            'h' => ctx.move_days(-1),
            'l' => ctx.move_days(1),
            'j' => ctx.move_days(7),
            'k' => ctx.move_days(-7),
            'n' => ctx.move_months(1),
            'p' => ctx.move_months(-1),
            'v' => ctx.view = ctx.view.toggled(),
            't' => ctx.select_today(),
            'u' => ctx.trigger_latest_action(),
            _ => {}
        }
    }
}

struct MainWindow<'a>(&'a Context);

impl Widget for MainWindow<'_> {
    fn space_demand(&self) -> Demand2D {
        match self.0.view {
            ViewMode::Calendar => HLayout::new()
                .widget(MonthPane::new(self.0))
                .widget(DayWindow::new(self.0))
                .space_demand(),
            ViewMode::List => ListWindow::new(self.0).space_demand(),
        }
    }

    fn draw(&self, window: Window, hints: RenderingHints) {
        match self.0.view {
            ViewMode::Calendar => HLayout::new()
                .separator(GraphemeCluster::try_from('│').unwrap())
                .widget(MonthPane::new(self.0))
                .widget(DayWindow::new(self.0))
                .draw(window, hints),
            ViewMode::List => ListWindow::new(self.0).draw(window, hints),
        }
    }
}

/// Prompt line while typing, otherwise the newest toast or the form state.
struct BottomBar<'a>(&'a Context);

impl Widget for BottomBar<'_> {
    fn space_demand(&self) -> Demand2D {
        Demand2D {
            width: ColDemand::at_least(1),
            height: RowDemand::exact(1),
        }
    }

    fn draw(&self, mut window: Window, hints: RenderingHints) {
        let ctx = self.0;
        if let mode @ (Mode::Command | Mode::Insert) = ctx.mode {
            ctx.input_sink(mode).as_widget().draw(window, hints);
            return;
        }

        let latest = ctx
            .toasts()
            .notifier()
            .queue()
            .and_then(|queue| queue.latest());

        let mut cursor = Cursor::new(&mut window);
        let result = match latest {
            Some(toast) => {
                if toast.kind == crate::notification::NotificationKind::Error {
                    cursor.set_style_modifier(ctx.theme.error_toast_style);
                } else {
                    cursor.set_style_modifier(ctx.theme.toast_style);
                }
                write!(cursor, "{}", toast)
            }
            None => {
                let form = &ctx.form;
                write!(
                    cursor,
                    "{} | {} | {} {}",
                    form.platform.label(),
                    if form.content.is_empty() {
                        "(no content)"
                    } else {
                        form.content.as_str()
                    },
                    form.scheduled_date,
                    form.scheduled_time
                )
            }
        };

        if let Err(err) = result {
            log::warn!("Error while writing status: {}", err);
        }
    }
}
