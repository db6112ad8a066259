//! Interactive loop: reads commands from stdin and applies page fetches as
//! they finish.

use std::io::Write;
use std::path::PathBuf;

use bookdesk_lib::api::CatalogSource;
use bookdesk_lib::export::write_csv;
use bookdesk_lib::table::{Applied, Column, FetchOutcome, FetchRequest, TableController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::input::{self, Action, HELP};
use crate::render::render;

pub struct App<S: CatalogSource + ?Sized + 'static> {
    controller: TableController<S>,
    output: PathBuf,
    outcomes_tx: mpsc::UnboundedSender<FetchOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<FetchOutcome>,
}

impl<S: CatalogSource + ?Sized + 'static> App<S> {
    pub fn new(controller: TableController<S>, output: PathBuf) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            output,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub async fn run(mut self) -> std::io::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        let request = self.controller.reload();
        self.spawn_fetch(request);
        self.redraw();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        log::info!("Input closed, exiting");
                        break;
                    };
                    if !self.handle_line(&line) {
                        break;
                    }
                }
                Some(outcome) = self.outcomes_rx.recv() => {
                    if self.controller.apply(outcome) != Applied::Stale {
                        self.redraw();
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> bool {
        let action = match input::parse(line) {
            Ok(action) => action,
            Err(e) => {
                eprintln!("{}", e);
                return true;
            }
        };

        match action {
            Action::Quit => return false,
            Action::Help => println!("{}", HELP),
            Action::Show => self.redraw(),
            Action::Export(path) => self.export(path.unwrap_or_else(|| self.output.clone())),
            Action::Table(command) => {
                log::debug!("Command: {:?}", command);
                match self.controller.dispatch(command) {
                    Ok(request) => {
                        if let Some(request) = request {
                            self.spawn_fetch(request);
                        }
                        self.redraw();
                    }
                    Err(e) => eprintln!("{}", e),
                }
            }
        }

        true
    }

    fn spawn_fetch(&self, request: FetchRequest) {
        log::debug!("Fetching page {} (request {})", request.page.index + 1, request.id);
        let fetch = self.controller.fetch(request);
        let tx = self.outcomes_tx.clone();
        tokio::spawn(async move {
            // The receiver lives as long as the app
            let _ = tx.send(fetch.await);
        });
    }

    fn export(&self, path: PathBuf) {
        let rows = self.controller.state().rows();
        match write_csv(&path, rows, &Column::ALL) {
            Ok(()) => println!("Exported {} rows to {}", rows.len(), path.display()),
            Err(e) => {
                log::error!("Export to {} failed: {}", path.display(), e);
                eprintln!("Export failed: {}", e);
            }
        }
    }

    fn redraw(&self) {
        let mut stdout = std::io::stdout().lock();
        let _ = write!(stdout, "\n{}> ", render(self.controller.state()));
        let _ = stdout.flush();
    }
}

