//! Line-oriented prompts over any reader/writer pair.
//!
//! Every prompt returns `Ok(None)` at end of input so the caller can stop
//! cleanly when stdin closes.

use std::io::{self, BufRead, Write};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Reads answers from `input` and writes prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
    masked: bool,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter. Secrets are read as plain lines until
    /// [`Prompter::masked`] is enabled.
    pub const fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            masked: false,
        }
    }

    /// Reads secrets keystroke by keystroke from the terminal, echoing `*`.
    ///
    /// Only enable this when stdin is a terminal.
    #[must_use]
    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    /// Where prompts and rendered output are written.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    /// Prompts for one line of text.
    pub fn line(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompts for one line of text, keeping `default` on an empty answer.
    pub fn line_with_default(&mut self, label: &str, default: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{label} (press Enter to keep):")?;
        writeln!(self.output, "{default}")?;
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(self.read_line()?.map(|answer| {
            if answer.trim().is_empty() {
                default.to_string()
            } else {
                answer
            }
        }))
    }

    /// Shows a numbered list and returns the index picked.
    ///
    /// Accepts a 1-based number or an option's exact text (case-insensitive)
    /// and asks again on anything else.
    pub fn choose(&mut self, title: &str, options: &[String]) -> io::Result<Option<usize>> {
        writeln!(self.output, "{title}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {option}", i + 1)?;
        }

        loop {
            let Some(answer) = self.line(&format!("Choose [1-{}]", options.len()))? else {
                return Ok(None);
            };
            if let Some(index) = pick(&answer, options) {
                return Ok(Some(index));
            }
            writeln!(
                self.output,
                "Please enter a number between 1 and {}.",
                options.len()
            )?;
        }
    }

    /// Prompts for a secret without echoing it.
    pub fn secret(&mut self, label: &str) -> io::Result<Option<String>> {
        if !self.masked {
            return self.line(label);
        }

        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        enable_raw_mode()?;
        let secret = read_masked(&mut self.output);
        disable_raw_mode()?;
        writeln!(self.output)?;
        secret
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn pick(answer: &str, options: &[String]) -> Option<usize> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=options.len()).contains(&n).then(|| n - 1);
    }
    options
        .iter()
        .position(|option| option.eq_ignore_ascii_case(answer))
}

/// Reads keystrokes until Enter. Ctrl-C, Ctrl-D and Esc abandon the input.
fn read_masked<W: Write>(output: &mut W) -> io::Result<Option<String>> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Char('c' | 'd') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Esc => return Ok(None),
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(output, "\u{8} \u{8}")?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(output, "*")?;
            }
            _ => {}
        }
        output.flush()?;
    }
}
