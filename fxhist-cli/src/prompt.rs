//! Interactive credential prompts.
//!
//! Login and server are read as plain lines. The password is read with echo
//! disabled when stdin is a terminal, and as a plain line when it is piped.

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use fxhist_core::Credentials;
use std::io::{self, BufRead, IsTerminal, Write};

/// Ask for login, password and server, in that order.
pub fn read_credentials() -> Result<Credentials> {
    let login = prompt_line("Enter your MT5 Login: ")?;
    let password = prompt_password("Enter your MT5 Password: ")?;
    let server = prompt_line("Enter your MT5 Server: ")?;
    Credentials::new(&login, password, &server).context("invalid credentials")
}

fn prompt_line(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read from stdin")?;
    if read == 0 {
        bail!("stdin closed before '{}' was answered", label.trim_end());
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn prompt_password(label: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        return prompt_line(label);
    }

    print!("{label}");
    io::stdout().flush()?;

    terminal::enable_raw_mode().context("failed to disable terminal echo")?;
    let password = read_hidden();
    terminal::disable_raw_mode().context("failed to restore terminal mode")?;
    println!();

    password
}

/// Collect key presses until Enter, without echoing them.
fn read_hidden() -> Result<String> {
    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = event::read()?
        else {
            continue;
        };
        // Windows reports both Press and Release.
        if kind != KeyEventKind::Press {
            continue;
        }
        match code {
            KeyCode::Enter => return Ok(buf),
            KeyCode::Backspace => {
                buf.pop();
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("password entry interrupted")
            }
            KeyCode::Char(c) => buf.push(c),
            _ => {}
        }
    }
}
