//! Console Implementation
//!
//! Real terminal: crossterm clear, stdout writes, blocking stdin reads,
//! wall-clock pacing. Output failures are swallowed; a terminal that
//! cannot print has nothing useful to report to.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};

use super::{Ui, UiError};
use crate::game::item::Item;
use crate::game::state::GameState;

/// Terminal-backed [`Ui`].
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    /// Create a console UI on the current terminal.
    pub fn new() -> Self {
        Self
    }

    fn read_line(&mut self) -> Result<String, UiError> {
        let mut line = String::new();
        let bytes = io::stdin().lock().read_line(&mut line)?;
        if bytes == 0 {
            // EOF: stdin closed or Ctrl-D; the session treats this as an
            // interrupt and shuts down cleanly.
            return Err(UiError::Interrupted);
        }
        Ok(line.trim().to_string())
    }
}

impl Ui for ConsoleUi {
    fn clear(&mut self) {
        let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
    }

    fn print_message(&mut self, text: &str) {
        let mut out = io::stdout();
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn print_menu(&mut self, state: &GameState) {
        let mut out = io::stdout();
        let _ = writeln!(
            out,
            "oreminer\n\n${}\n\nitem capacity: {}\nmining time: {:.2}s\n\n\
             [1] go mining\n[2] inventory\n[3] upgrades\n[4] shop\n[5] save & exit\n",
            state.money(),
            state.item_capacity(),
            state.mining_time(),
        );
        let _ = out.flush();
    }

    fn print_inventory(&mut self, items: &[Item], total_value: i64) {
        let mut out = io::stdout();
        for item in items {
            let _ = writeln!(out, "{} - ${}", item.name, item.price);
        }
        let _ = writeln!(
            out,
            "\nTotal inventory value: ${total_value}\n\n[1] sell all\n[2] back\n"
        );
        let _ = out.flush();
    }

    fn print_upgrades(&mut self, money: i64, speed_cost: i64, capacity_cost: i64) {
        let mut out = io::stdout();
        let _ = writeln!(
            out,
            "${money}\n\n[1] Increase mining speed | ${speed_cost}\n\
             [2] Increase item capacity by 1 | ${capacity_cost}\n[3] Exit\n"
        );
        let _ = out.flush();
    }

    fn slow_reveal(&mut self, text: &str, per_char_delay: f64) {
        let mut out = io::stdout();
        for c in text.chars() {
            let _ = write!(out, "{c}");
            let _ = out.flush();
            thread::sleep(Duration::from_secs_f64(per_char_delay.max(0.0)));
        }
        let _ = writeln!(out);
        let _ = out.flush();
    }

    fn read_choice(&mut self, prompt: &str) -> Result<String, UiError> {
        let mut out = io::stdout();
        let _ = write!(out, "{prompt}");
        let _ = out.flush();
        self.read_line()
    }

    fn wait_for_acknowledgement(&mut self, prompt: &str) -> Result<(), UiError> {
        let mut out = io::stdout();
        let _ = write!(out, "{prompt}");
        let _ = out.flush();
        self.read_line().map(|_| ())
    }

    fn pause(&mut self, seconds: f64) {
        thread::sleep(Duration::from_secs_f64(seconds.max(0.0)));
    }
}
