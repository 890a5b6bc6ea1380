use unsegen::input::*;

use super::context::{Context, Mode};

/// Turns compose lines typed in insert mode into form updates.
///
/// Every line is applied to the form and the form is submitted right away.
/// A line that leaves the form incomplete is kept, so a post can be written
/// over several lines, e.g. `content:"Summer sale"` followed by
/// `date:2025-06-10 time:10:00`.
pub struct InsertParser<'a> {
    context: &'a mut Context,
}

impl<'a> InsertParser<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        InsertParser { context }
    }

    fn parse_line(&mut self, line: &str) {
        if line.trim().is_empty() {
            self.context.submit_form();
            return;
        }

        match self.context.form.apply_line(line) {
            Ok(()) => self.context.submit_form(),
            Err(e) => self.context.report_error(&e.to_string()),
        }
    }
}

impl Behavior for InsertParser<'_> {
    fn input(mut self, input: Input) -> Option<Input> {
        if let Event::Key(key) = input.event {
            match key {
                Key::Char('\n') => {
                    let line = self
                        .context
                        .input_sink_mut(Mode::Insert)
                        .finish_line()
                        .to_owned();
                    self.parse_line(&line);
                    None
                }
                _ => Some(input),
            }
        } else {
            Some(input)
        }
    }
}
