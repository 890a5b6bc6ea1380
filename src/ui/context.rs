use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use unsegen::base::style::*;
use unsegen::widget::builtin::PromptLine;

use crate::agenda::Agenda;
use crate::calendar::{CalendarCell, MonthIndex};
use crate::compose::{ComposeForm, ScheduleRequest};
use crate::config::{Config, NotificationBackend};
use crate::notification::*;
use crate::provider::{PostSummary, Result, Uid};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Calendar,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Calendar => ViewMode::List,
            ViewMode::List => ViewMode::Calendar,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub day_style: StyleModifier,
    pub filler_day_style: StyleModifier,
    pub focus_day_style: StyleModifier,
    pub today_day_style: StyleModifier,
    pub month_header_style: StyleModifier,
    pub weekday_header_style: StyleModifier,
    pub post_focus_style: StyleModifier,
    pub error_toast_style: StyleModifier,
    pub toast_style: StyleModifier,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            day_style: StyleModifier::default(),
            filler_day_style: StyleModifier::default().fg_color(Color::LightBlack),
            focus_day_style: StyleModifier::default().bg_color(Color::Blue),
            today_day_style: StyleModifier::default()
                .invert(true)
                .format(TextFormatModifier::default().italic(true)),
            month_header_style: StyleModifier::default()
                .fg_color(Color::Yellow)
                .format(TextFormatModifier::default().bold(true)),
            weekday_header_style: StyleModifier::default().fg_color(Color::Yellow),
            post_focus_style: StyleModifier::default().invert(true),
            error_toast_style: StyleModifier::default().fg_color(Color::LightRed),
            toast_style: StyleModifier::default().fg_color(Color::Green),
        }
    }
}

/// Notifier of the TUI: toasts are either kept for the bottom bar or handed to
/// another backend.
pub enum SessionNotifier {
    Toast(ToastQueue),
    Forward(Box<dyn Notifier>),
}

impl SessionNotifier {
    pub fn from_config(config: &Config) -> Self {
        match config.notification_backend {
            NotificationBackend::Toast => {
                SessionNotifier::Toast(ToastQueue::new(config.durations.clone()))
            }
            NotificationBackend::Desktop => SessionNotifier::Forward(Box::new(
                DesktopNotifier::new("magpie", config.durations.clone()),
            )),
            NotificationBackend::Log => SessionNotifier::Forward(Box::new(LogNotifier::default())),
        }
    }

    pub fn queue(&self) -> Option<&ToastQueue> {
        match self {
            SessionNotifier::Toast(queue) => Some(queue),
            SessionNotifier::Forward(_) => None,
        }
    }

    pub fn queue_mut(&mut self) -> Option<&mut ToastQueue> {
        match self {
            SessionNotifier::Toast(queue) => Some(queue),
            SessionNotifier::Forward(_) => None,
        }
    }
}

impl Notifier for SessionNotifier {
    fn enqueue(
        &mut self,
        kind: NotificationKind,
        message: &str,
        options: NotifyOptions,
    ) -> NotificationId {
        match self {
            SessionNotifier::Toast(queue) => queue.enqueue(kind, message, options),
            SessionNotifier::Forward(notifier) => notifier.enqueue(kind, message, options),
        }
    }

    fn dismiss(&mut self, id: NotificationId) {
        match self {
            SessionNotifier::Toast(queue) => queue.dismiss(id),
            SessionNotifier::Forward(notifier) => notifier.dismiss(id),
        }
    }
}

pub struct Context {
    pub mode: Mode,
    pub view: ViewMode,
    pub theme: Theme,
    pub form: ComposeForm,
    pub postlist_index: usize,
    pub quit: bool,
    cursor: NaiveDate,
    now: DateTime<Local>,
    agenda: Agenda,
    toasts: Toasts<SessionNotifier>,
    command_line: PromptLine,
    insert_line: PromptLine,
    pending_undo: Rc<RefCell<Option<Uid>>>,
}

impl Context {
    pub fn new(config: &Config, agenda: Agenda) -> Self {
        let now = Local::now();
        Context {
            mode: Mode::Normal,
            view: ViewMode::Calendar,
            theme: Theme::default(),
            form: ComposeForm::new(config.default_platform),
            postlist_index: 0,
            quit: false,
            cursor: now.date_naive(),
            now,
            agenda,
            toasts: Toasts::new(SessionNotifier::from_config(config)),
            command_line: PromptLine::with_prompt(":".to_owned()),
            insert_line: PromptLine::with_prompt("+ ".to_owned()),
            pending_undo: Rc::new(RefCell::new(None)),
        }
    }

    pub fn with_cursor(mut self, cursor: NaiveDate) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn toasts(&self) -> &Toasts<SessionNotifier> {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts<SessionNotifier> {
        &mut self.toasts
    }

    pub fn now(&self) -> &DateTime<Local> {
        &self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn month(&self) -> MonthIndex {
        MonthIndex::from(self.cursor)
    }

    /// Day of the shown month that is today, if any.
    pub fn today_in_month(&self) -> Option<u8> {
        let today = self.today();
        if MonthIndex::from(today) == self.month() {
            Some(today.day() as u8)
        } else {
            None
        }
    }

    pub fn grid(&self) -> Result<Vec<CalendarCell>> {
        self.agenda.grid_of_month(self.month())
    }

    pub fn cells(&self) -> Result<Vec<CalendarCell>> {
        self.agenda.cells_of_month(self.month())
    }

    pub fn posts_of_cursor(&self) -> Vec<PostSummary> {
        self.agenda.posts_of_day(&self.cursor)
    }

    pub fn update(&mut self) {
        self.now = Local::now();
        if let Some(queue) = self.toasts.notifier_mut().queue_mut() {
            queue.tick(Instant::now());
        }
    }

    pub fn reload(&mut self) {
        self.agenda.reload();
        self.toasts.info("Schedule reloaded");
    }

    pub fn move_days(&mut self, days: i64) {
        if let Some(date) = self.cursor.checked_add_signed(Duration::days(days)) {
            self.set_cursor(date);
        }
    }

    pub fn move_months(&mut self, months: i64) {
        let month = if months >= 0 {
            self.month() + months as u32
        } else {
            self.month() - months.unsigned_abs() as u32
        };
        if let Some(date) = month.date(self.cursor.day() as u8) {
            self.set_cursor(date);
        }
    }

    pub fn select_today(&mut self) {
        self.set_cursor(self.today());
    }

    fn set_cursor(&mut self, date: NaiveDate) {
        if date != self.cursor {
            self.postlist_index = 0;
        }
        self.cursor = date;
    }

    pub fn input_sink(&self, mode: Mode) -> &PromptLine {
        match mode {
            Mode::Insert => &self.insert_line,
            _ => &self.command_line,
        }
    }

    pub fn input_sink_mut(&mut self, mode: Mode) -> &mut PromptLine {
        match mode {
            Mode::Insert => &mut self.insert_line,
            _ => &mut self.command_line,
        }
    }

    pub fn report_error(&mut self, message: &str) {
        log::warn!("{}", message);
        self.toasts.error(message);
    }

    /// Submits the compose form. Incomplete forms are ignored.
    pub fn submit_form(&mut self) {
        let mut request = None;
        self.form.submit(|req| request = Some(req));

        if let Some(request) = request {
            self.schedule(request);
        }
    }

    fn schedule(&mut self, request: ScheduleRequest) {
        match request.to_post() {
            Ok((date, post)) => {
                log::info!("Scheduling {:?}", request);
                let id = post.id.clone();
                self.agenda.session_mut().insert(date, post);
                self.set_cursor(date);
                self.toasts.post_scheduled(request.platform, &request.when());

                // Only the toast queue can run actions.
                if self.toasts.notifier().queue().is_some() {
                    let pending = self.pending_undo.clone();
                    self.toasts.with_action("Scheduled post can be undone", "u", move || {
                        *pending.borrow_mut() = Some(id.clone());
                    });
                }
            }
            Err(e) => {
                self.form = self
                    .form
                    .clone()
                    .platform(request.platform)
                    .content(&request.content)
                    .image_url(&request.image_url)
                    .scheduled_date(&request.scheduled_date)
                    .scheduled_time(&request.scheduled_time);
                self.report_error(&e.to_string());
            }
        }
    }

    /// Runs the action of the newest toast offering one.
    pub fn trigger_latest_action(&mut self) {
        let triggered = match self.toasts.notifier_mut().queue_mut() {
            Some(queue) => match queue.latest_action() {
                Some(id) => queue.trigger_action(id),
                None => false,
            },
            None => false,
        };

        if !triggered {
            return;
        }

        let undo = self.pending_undo.borrow_mut().take();
        if let Some(id) = undo {
            if self.agenda.session_mut().remove(&id) {
                self.toasts.info("Scheduling undone");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Platform;
    use chrono::Month;

    fn context() -> Context {
        let config = Config::default();
        Context::new(&config, Agenda::new(Vec::new()))
            .with_cursor(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
    }

    fn visible(ctx: &Context) -> Vec<String> {
        ctx.toasts()
            .notifier()
            .queue()
            .unwrap()
            .visible()
            .iter()
            .map(|t| t.message.clone())
            .collect()
    }

    #[test]
    fn cursor_moves_across_months() {
        let mut ctx = context();
        ctx.move_days(21);
        assert_eq!(ctx.cursor(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(ctx.month(), MonthIndex::new(Month::July, 2025));

        ctx.move_months(-5);
        assert_eq!(ctx.cursor(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());

        let mut end = context().with_cursor(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
        end.move_months(1);
        assert_eq!(end.cursor(), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    }

    #[test]
    fn submitted_post_shows_up_and_can_be_undone() {
        let mut ctx = context();
        ctx.form = ctx
            .form
            .clone()
            .platform(Platform::Twitter)
            .content("Hello")
            .scheduled_date("2025-06-12")
            .scheduled_time("10:00");

        ctx.submit_form();
        assert_eq!(ctx.cursor(), NaiveDate::from_ymd_opt(2025, 6, 12).unwrap());
        assert_eq!(ctx.posts_of_cursor().len(), 1);
        assert_eq!(
            visible(&ctx),
            vec![
                "Post scheduled for Twitter on 2025-06-12 10:00".to_owned(),
                "Scheduled post can be undone".to_owned(),
            ]
        );

        ctx.trigger_latest_action();
        assert!(ctx.posts_of_cursor().is_empty());
        assert_eq!(visible(&ctx).last().map(String::as_str), Some("Scheduling undone"));
    }

    #[test]
    fn no_undo_offer_without_toast_queue() {
        let mut config = Config::default();
        config.notification_backend = NotificationBackend::Log;
        let mut ctx = Context::new(&config, Agenda::new(Vec::new()))
            .with_cursor(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
        ctx.form = ctx
            .form
            .clone()
            .content("Hello")
            .scheduled_date("2025-06-12")
            .scheduled_time("10:00");

        ctx.submit_form();
        ctx.trigger_latest_action();

        assert!(ctx.toasts().notifier().queue().is_none());
        assert!(ctx.pending_undo.borrow().is_none());
        assert_eq!(ctx.agenda().session().len(), 1);
    }

    #[test]
    fn incomplete_form_is_ignored_silently() {
        let mut ctx = context();
        ctx.form = ctx.form.clone().content("Hello");
        ctx.submit_form();

        assert!(visible(&ctx).is_empty());
        assert_eq!(ctx.form.content, "Hello");
        assert!(ctx.agenda().session().is_empty());
    }

    #[test]
    fn unparsable_date_keeps_the_form() {
        let mut ctx = context();
        ctx.form = ctx
            .form
            .clone()
            .content("Hello")
            .scheduled_date("tomorrow")
            .scheduled_time("10:00");
        ctx.submit_form();

        assert_eq!(ctx.form.scheduled_date, "tomorrow");
        assert_eq!(visible(&ctx).len(), 1);
        assert!(ctx.agenda().session().is_empty());
    }
}
