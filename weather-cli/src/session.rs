//! Interactive search session: stdin lines drive the controller, state changes are printed.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::watch,
};
use tracing::debug;
use weather_core::{SearchController, SearchState};

use crate::render::{Theme, render_state};

pub const HELP: &str = "Type a city name to search (debounced). Commands: \
                        /go [city] search now, /theme toggle light/dark, /quit exit.";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// New contents of the search box.
    Edit(String),
    /// Search immediately; `None` means "whatever is in the search box".
    Go(Option<String>),
    Theme,
    Quit,
}

pub fn parse_line(line: &str) -> Input {
    let trimmed = line.trim();

    match trimmed.split_once(char::is_whitespace) {
        Some(("/go", rest)) => Input::Go(Some(rest.trim().to_string())),
        _ => match trimmed {
            "/go" => Input::Go(None),
            "/theme" => Input::Theme,
            "/quit" | "/exit" => Input::Quit,
            _ => Input::Edit(line.trim_end_matches(['\r', '\n']).to_string()),
        },
    }
}

/// What the loop should do after an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Redraw,
    Quit,
}

/// Search box contents and theme, driving one controller.
#[derive(Debug)]
pub struct Session {
    controller: SearchController,
    theme: Theme,
    debounce: Duration,
    search_box: String,
}

impl Session {
    pub fn new(controller: SearchController, theme: Theme, debounce: Duration) -> Self {
        Self { controller, theme, debounce, search_box: String::new() }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn handle(&mut self, input: Input) -> Flow {
        match input {
            Input::Edit(text) => {
                self.controller.on_input_change(&text);
                self.search_box = text;
                Flow::Continue
            }
            Input::Go(city) => {
                let city = city.unwrap_or_else(|| self.search_box.clone());
                self.controller.on_explicit_search(&city);
                Flow::Continue
            }
            Input::Theme => {
                self.theme = self.theme.toggle();
                Flow::Redraw
            }
            Input::Quit => Flow::Quit,
        }
    }
}

/// Interactive session on stdin/stdout.
pub async fn run(session: Session) -> Result<()> {
    let stdin = BufReader::new(tokio::io::stdin());
    drive(session, stdin, &mut std::io::stdout()).await
}

/// Run until `/quit` or end of input.
///
/// At end of input, any search still scheduled is allowed to fire and settle
/// before returning, so piped input behaves like typing.
pub async fn drive<R, W>(mut session: Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut states = session.controller.subscribe();
    let mut lines = input.lines();

    writeln!(out, "{HELP}")?;

    loop {
        tokio::select! {
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = states.borrow_and_update().clone();
                print_state(out, &state, session.theme())?;
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    debug!("end of input");
                    settle_remaining(&mut states, session.debounce).await;
                    print_state(out, &session.controller.state(), session.theme())?;
                    break;
                };

                match session.handle(parse_line(&line)) {
                    Flow::Continue => {}
                    Flow::Redraw => print_state(out, &session.controller.state(), session.theme())?,
                    Flow::Quit => break,
                }
            }
        }
    }

    session.controller.cancel_pending();
    Ok(())
}

async fn settle_remaining(states: &mut watch::Receiver<SearchState>, debounce: Duration) {
    // Give a scheduled search time to fire, then wait for whatever is in flight.
    tokio::time::sleep(debounce + Duration::from_millis(10)).await;
    let _ = states.wait_for(|s| !s.pending).await;
}

fn print_state(out: &mut impl Write, state: &SearchState, theme: Theme) -> Result<()> {
    writeln!(out, "{}\n", render_state(state, theme, Local::now()))?;
    Ok(())
}
