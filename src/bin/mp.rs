extern crate magpie as lib;

use chrono::{Datelike, Local};
use flexi_logger::{FileSpec, Logger};
use lib::agenda::Agenda;
use lib::calendar::MonthIndex;
use lib::events::Dispatcher;
use lib::render::{MonthSheet, PostList};
use lib::ui::{App, Context};
use nix::sys::termios;
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "mp",
    about = "Magpie - plan and schedule social media posts from the terminal."
)]
pub struct Args {
    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the month non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "list", help = "with --show, print posts as a list")]
    pub list: bool,

    #[structopt(long = "month", help = "month to start with, as YYYY-MM")]
    pub month: Option<MonthIndex>,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn show(agenda: &Agenda, month: MonthIndex, list: bool) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();
    let today_day = if MonthIndex::from(today) == month {
        Some(today.day() as u8)
    } else {
        None
    };

    if list {
        let cells = agenda.cells_of_month(month)?;
        print!("{}", PostList::new(month, &cells));
    } else {
        let cells = agenda.grid_of_month(month)?;
        print!("{}", MonthSheet::new(month, &cells).today(today_day));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = &args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    let _logger = logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let month = args.month.unwrap_or_default();

    if args.show {
        let agenda = Agenda::from_config(&config, month, None)?;
        return show(&agenda, month, args.list);
    }

    const STDIN: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDIN)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDIN, termios::SetArg::TCSANOW, &attr);
        }

        println!("Magpie ran into a fatal error!");
        println!("Consider filing an issue with a log file and the backtrace below.");

        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let dispatcher = Dispatcher::from_config(&config)?;

    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let agenda = Agenda::from_config(&config, month, Some(dispatcher.event_sink()))?;

    let today = Local::now().date_naive();
    let cursor = month.date(today.day() as u8).unwrap_or(today);
    let context = Context::new(&config, agenda).with_cursor(cursor);

    let mut app = App::with_context(context);
    app.run(dispatcher, term)
}
