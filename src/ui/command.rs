use unsegen::input::*;

use nom::{
    character::complete::{alpha1, digit0, space1},
    combinator::{all_consuming, opt, rest},
    sequence::{preceded, tuple},
    IResult,
};

use super::context::{Context, Mode, ViewMode};
use crate::provider::{Error, ErrorKind, Result};

pub type ActionResult = Result<()>;

pub enum Action {
    Arg(fn(&mut Context, &str) -> ActionResult),
    NoArg(fn(&mut Context) -> ActionResult),
    Repeatable(fn(&mut Context, u32) -> ActionResult),
}

const COMMANDS: &[(&str, Action)] = &[
    (
        "next",
        Action::Repeatable(|c, p| {
            c.move_months(p as i64);
            Ok(())
        }),
    ),
    (
        "prev",
        Action::Repeatable(|c, p| {
            c.move_months(-(p as i64));
            Ok(())
        }),
    ),
    (
        "today",
        Action::NoArg(|c| {
            c.select_today();
            Ok(())
        }),
    ),
    (
        "calendar",
        Action::NoArg(|c| {
            c.view = ViewMode::Calendar;
            Ok(())
        }),
    ),
    (
        "list",
        Action::NoArg(|c| {
            c.view = ViewMode::List;
            Ok(())
        }),
    ),
    (
        "platform",
        Action::Arg(|c, name| {
            c.form.platform = name.trim().parse()?;
            Ok(())
        }),
    ),
    (
        "clear",
        Action::NoArg(|c| {
            c.form.reset();
            Ok(())
        }),
    ),
    (
        "q",
        Action::NoArg(|c| {
            c.quit = true;
            Ok(())
        }),
    ),
];

fn split_command(cmd: &str) -> IResult<&str, (&str, &str, Option<&str>)> {
    all_consuming(tuple((digit0, alpha1, opt(preceded(space1, rest)))))(cmd)
}

pub struct CommandParser<'a> {
    context: &'a mut Context,
}

impl<'a> CommandParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        CommandParser { context }
    }

    pub fn run_command(&mut self, cmd: &str) -> ActionResult {
        run_command(self.context, cmd)
    }
}

/// Runs a line like `3next`, `platform twitter` or `today`.
pub fn run_command(context: &mut Context, cmd: &str) -> ActionResult {
    let invalid = || Error::new(ErrorKind::CommandParse, &format!("'{}'", cmd));

    let (_, (repeat, name, arg)) = split_command(cmd.trim()).map_err(|_| invalid())?;
    let (_, action) = COMMANDS
        .iter()
        .find(|(n, _)| *n == name)
        .ok_or_else(invalid)?;

    let repeats = if repeat.is_empty() {
        None
    } else {
        Some(repeat.parse::<u32>().map_err(|_| invalid())?)
    };

    log::debug!("Running command '{}'", cmd);
    match (action, repeats, arg) {
        (Action::Repeatable(a), repeats, None) => a(context, repeats.unwrap_or(1)),
        (Action::NoArg(a), None, None) => a(context),
        (Action::Arg(a), None, Some(arg)) => a(context, arg),
        _ => Err(invalid()),
    }
}

impl Behavior for CommandParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(key) = input.event {
            match key {
                Key::Char('\n') => {
                    let cmd = self
                        .context
                        .input_sink_mut(Mode::Command)
                        .finish_line()
                        .to_owned();
                    match self.run_command(&cmd) {
                        Err(e) => self.context.report_error(&e.to_string()),
                        Ok(()) => self.context.mode = Mode::Normal,
                    }
                    None
                }
                _ => Some(input),
            }
        } else {
            Some(input)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::Agenda;
    use crate::config::Config;
    use crate::provider::Platform;
    use chrono::NaiveDate;

    fn context() -> Context {
        Context::new(&Config::default(), Agenda::new(Vec::new()))
            .with_cursor(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap())
    }

    #[test]
    fn repeat_prefix_moves_months() {
        let mut ctx = context();
        run_command(&mut ctx, "next").unwrap();
        assert_eq!(ctx.cursor(), NaiveDate::from_ymd_opt(2025, 7, 10).unwrap());

        run_command(&mut ctx, "13prev").unwrap();
        assert_eq!(ctx.cursor(), NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    }

    #[test]
    fn arguments_reach_the_form() {
        let mut ctx = context();
        run_command(&mut ctx, "platform LinkedIn").unwrap();
        assert_eq!(ctx.form.platform, Platform::Linkedin);

        run_command(&mut ctx, "list").unwrap();
        assert_eq!(ctx.view, ViewMode::List);

        run_command(&mut ctx, "q").unwrap();
        assert!(ctx.quit);
    }

    #[test]
    fn malformed_commands_are_rejected() {
        let mut ctx = context();
        for cmd in &["", "jump", "2today", "today now", "platform", "platform myspace", "next 3"] {
            assert!(run_command(&mut ctx, cmd).is_err(), "{}", cmd);
        }
        assert_eq!(ctx.cursor(), NaiveDate::from_ymd_opt(2025, 6, 10).unwrap());
    }
}
