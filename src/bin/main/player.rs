//! Raw-mode tick loop and ANSI word rendering.

use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal,
};
use saccade_core::{
    orp,
    playback::{PlaybackObserver, PlaybackPhase},
    session::ReaderSession,
    settings::WPM_KEYBOARD_STEP,
};

const TICK_INTERVAL: Duration = Duration::from_millis(8);
/// Column the focal character is pinned to, so the eye never moves.
const ORP_ANCHOR_COL: u16 = 28;
const WORD_ROW: u16 = 2;
const STATUS_ROW: u16 = 5;

#[derive(Clone, Copy, Debug, Default)]
struct NotifyState {
    dirty: bool,
    completed: bool,
}

/// Observer handle shared between the session and the draw loop. Clones see
/// the same flags.
#[derive(Clone, Debug, Default)]
pub struct UiNotifications {
    state: Rc<RefCell<NotifyState>>,
}

impl UiNotifications {
    fn take_dirty(&self) -> bool {
        let mut state = self.state.borrow_mut();
        std::mem::take(&mut state.dirty)
    }

    fn take_completed(&self) -> bool {
        let mut state = self.state.borrow_mut();
        std::mem::take(&mut state.completed)
    }
}

impl PlaybackObserver for UiNotifications {
    fn token_changed(&mut self, _index: usize) {
        self.state.borrow_mut().dirty = true;
    }

    fn completed(&mut self) {
        let mut state = self.state.borrow_mut();
        state.dirty = true;
        state.completed = true;
    }
}

pub fn run(
    session: &mut ReaderSession<UiNotifications>,
    notifications: &UiNotifications,
) -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = event_loop(&mut stdout, session, notifications);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn event_loop(
    stdout: &mut io::Stdout,
    session: &mut ReaderSession<UiNotifications>,
    notifications: &UiNotifications,
) -> io::Result<()> {
    let origin = Instant::now();
    session.play();
    draw(stdout, session)?;

    loop {
        let mut redraw = false;

        if event::poll(TICK_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char(' ') => {
                            if session.is_playing() {
                                session.pause();
                            } else {
                                session.play();
                            }
                        }
                        KeyCode::Left => {
                            let wpm = session.current_wpm().saturating_sub(WPM_KEYBOARD_STEP);
                            session.set_wpm(wpm);
                        }
                        KeyCode::Right => {
                            let wpm = session.current_wpm().saturating_add(WPM_KEYBOARD_STEP);
                            session.set_wpm(wpm);
                        }
                        KeyCode::Char('r') => session.reset(),
                        KeyCode::Char('s') => session.seek_to_sentence_start(),
                        _ => {}
                    }
                    redraw = true;
                }
            }
        }

        session.tick(origin.elapsed().as_millis() as u64);

        if notifications.take_dirty() || redraw {
            draw(stdout, session)?;
        }
        if notifications.take_completed() {
            draw(stdout, session)?;
        }
    }
}

fn draw(stdout: &mut io::Stdout, session: &ReaderSession<UiNotifications>) -> io::Result<()> {
    queue!(
        stdout,
        cursor::MoveTo(0, WORD_ROW),
        terminal::Clear(terminal::ClearType::CurrentLine),
    )?;

    if let Some(token) = session.current_token() {
        let (before, focal, after) = orp::split_at_orp(&token.raw, token.focal_index);
        let before_cols = before.chars().count() as u16;
        let start_col = ORP_ANCHOR_COL.saturating_sub(before_cols);

        queue!(
            stdout,
            cursor::MoveTo(start_col, WORD_ROW),
            Print(before),
            SetForegroundColor(Color::Red),
            SetAttribute(Attribute::Bold),
            Print(focal),
            SetAttribute(Attribute::Reset),
            ResetColor,
            Print(after),
        )?;
    }

    let remaining = session.estimated_remaining().as_secs();
    let status = format!(
        "{:>4} wpm   {:>3.0}%   {}m {:02}s left   [space] play/pause  [<-/->] speed  [s] sentence  [r] restart  [q] quit",
        session.current_wpm(),
        session.progress() * 100.0,
        remaining / 60,
        remaining % 60,
    );
    let state_label = match session.phase() {
        PlaybackPhase::Playing => "reading",
        PlaybackPhase::Paused => "paused",
        PlaybackPhase::Stopped => "ready",
        PlaybackPhase::Completed => "done",
    };

    queue!(
        stdout,
        cursor::MoveTo(0, STATUS_ROW),
        terminal::Clear(terminal::ClearType::CurrentLine),
        Print(format!("{state_label:<8} {status}")),
    )?;
    stdout.flush()
}
