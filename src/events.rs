use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use unsegen::input::Input;

use crate::config::Config;

pub enum Event {
    Input(Input),
    /// Periodic tick, used to expire toasts and refresh "today".
    Update,
    /// The schedule file changed on disk.
    ExternalModification,
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: thread::JoinHandle<()>,
}

impl Dispatcher {
    pub fn from_config(config: &Config) -> io::Result<Dispatcher> {
        Dispatcher::with_tick_rate(config.tick_rate())
    }

    pub fn with_tick_rate(tick_rate: Duration) -> io::Result<Dispatcher> {
        let (tx, rx) = mpsc::channel();
        let input_handle = {
            let tx = tx.clone();
            thread::Builder::new()
                .name("magpie-input".to_owned())
                .spawn(move || {
                    let stdin = io::stdin();
                    let stdin = stdin.lock();
                    for evt in Input::read_all(stdin) {
                        match evt {
                            Ok(key) => {
                                if tx.send(Event::Input(key)).is_err() {
                                    return;
                                }
                            }
                            Err(e) => log::warn!("Could not read input: {}", e),
                        }
                    }
                })?
        };
        let update_handle = {
            let tx = tx.clone();
            thread::Builder::new()
                .name("magpie-update".to_owned())
                .spawn(move || {
                    while tx.send(Event::Update).is_ok() {
                        thread::sleep(tick_rate);
                    }
                })?
        };
        Ok(Dispatcher {
            rx,
            tx,
            _input_handle: input_handle,
            _update_handle: update_handle,
        })
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }

    pub fn event_sink(&self) -> &mpsc::Sender<Event> {
        &self.tx
    }
}
