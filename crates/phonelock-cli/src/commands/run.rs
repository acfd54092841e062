//! Interactive session loop: drives the engine from terminal input and
//! renders a minimal textual lock/home screen.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Args;
use crossterm::{
    cursor,
    event::{self, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use phonelock_core::{
    AudioOutputFactory, Config, Event, LockClock, LockSessionEngine, NoCamera, NullAudio,
    SessionState,
};

#[derive(Args)]
pub struct RunArgs {
    /// Seed for deterministic notification content
    #[arg(long)]
    pub seed: Option<u64>,
    /// Disable the audio output capability entirely
    #[arg(long)]
    pub silent: bool,
}

/// Input poll cadence. Deadlines are millisecond-granular, so anything
/// well under the shortest dwell keeps the display honest.
const POLL_MS: u64 = 50;

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let audio = audio_factory(args.silent);
    let now = Utc::now();
    let mut engine = match args.seed {
        Some(seed) => {
            LockSessionEngine::with_seed(config.clone(), audio, Box::new(NoCamera), seed, now)
        }
        None => LockSessionEngine::new(config.clone(), audio, Box::new(NoCamera), now),
    };
    let mut clock = LockClock::new(config.clock.refresh_secs);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let result = event_loop(&mut engine, &mut clock, &mut stdout);
    execute!(stdout, cursor::Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

#[cfg(feature = "audio")]
fn audio_factory(silent: bool) -> Box<dyn AudioOutputFactory> {
    if silent {
        Box::new(NullAudio)
    } else {
        Box::new(crate::audio::CpalAudio)
    }
}

#[cfg(not(feature = "audio"))]
fn audio_factory(_silent: bool) -> Box<dyn AudioOutputFactory> {
    Box::new(NullAudio)
}

fn event_loop(
    engine: &mut LockSessionEngine,
    clock: &mut LockClock,
    stdout: &mut io::Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut detected = false;
    let mut dirty = true;

    loop {
        let events = engine.tick(Utc::now());
        for event in &events {
            match event {
                Event::FaceDetected { .. } => detected = true,
                Event::ScanStarted { .. }
                | Event::ScanCancelled { .. }
                | Event::SessionUnlocked { .. } => detected = false,
                _ => {}
            }
        }
        if !events.is_empty() {
            dirty = true;
        }
        if clock.tick(Local::now()).is_some() {
            dirty = true;
        }

        if dirty {
            draw(engine, clock, detected, stdout)?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(POLL_MS))? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') => {
                        if engine.request_unlock(Utc::now()).is_some() {
                            dirty = true;
                        }
                    }
                    KeyCode::Char('l') | KeyCode::Char('L') => {
                        if engine.request_lock(Utc::now()).is_some() {
                            dirty = true;
                        }
                    }
                    KeyCode::Char('m') | KeyCode::Char('M') => {
                        engine.toggle_audio(Utc::now());
                        dirty = true;
                    }
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

fn draw(
    engine: &LockSessionEngine,
    clock: &LockClock,
    detected: bool,
    stdout: &mut io::Stdout,
) -> Result<(), Box<dyn std::error::Error>> {
    execute!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

    let sound = if engine.audio_enabled() {
        "🔈 sound on"
    } else {
        "🔊 sound off"
    };
    write!(stdout, "phonelock · {sound}\r\n\r\n")?;

    match engine.state() {
        SessionState::Locked => {
            if let Some(text) = clock.current() {
                write!(stdout, "        {}\r\n        {}\r\n\r\n", text.time, text.date)?;
            }
            if engine.notifications().is_empty() {
                write!(stdout, "  (no notifications yet)\r\n")?;
            }
            for record in engine.notifications().iter() {
                write!(
                    stdout,
                    "  {} {}  {}  ({})\r\n",
                    record.glyph, record.sender, record.message, record.app_name
                )?;
            }
            write!(stdout, "\r\n  enter/space: unlock   m: sound   q: quit\r\n")?;
        }
        SessionState::Scanning => {
            let status = if detected { "face detected" } else { "scanning…" };
            write!(stdout, "\r\n        [ Face ID — {status} ]\r\n")?;
            write!(stdout, "\r\n  l: cancel   q: quit\r\n")?;
        }
        SessionState::Unlocked => {
            write!(stdout, "\r\n  You have no new notifications...\r\n")?;
            write!(stdout, "\r\n  l: lock   q: quit\r\n")?;
        }
    }
    stdout.flush()?;
    Ok(())
}
