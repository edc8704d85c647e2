use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    interactive: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Take over the terminal: raw mode, alternate screen, mouse capture
    pub fn new() -> io::Result<Self> {
        let (width, height) = size()?;

        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, Hide, EnableMouseCapture)?;

        Ok(Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            interactive: true,
        })
    }

    /// A buffer-only terminal for print mode and tests
    pub fn offscreen(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            interactive: false,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Resize the back buffer, discarding its contents
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = vec![vec![Cell::default(); width as usize]; height as usize];
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(&mut self.buffer[y as usize][x as usize])
        } else {
            None
        }
    }

    #[cfg(test)]
    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize)?.get(x as usize)
    }

    /// Set a character at position, keeping any background already there
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.ch = ch;
            cell.fg = fg;
            cell.bold = bold;
        }
    }

    pub fn set_bg(&mut self, x: i32, y: i32, bg: Option<Color>) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.bg = bg;
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if let Some(bg) = cell.bg {
                    queue!(out, SetBackgroundColor(bg))?;
                }
                if let Some(color) = cell.fg {
                    queue!(out, SetForegroundColor(color))?;
                }
                queue!(out, Print(cell.ch))?;
                if cell.bold || cell.bg.is_some() || cell.fg.is_some() {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Next pending input event, without blocking
    pub fn next_event(&self) -> io::Result<Option<Event>> {
        if !self.interactive {
            return Ok(None);
        }
        if poll(Duration::from_millis(0))? {
            return Ok(Some(read()?));
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds.max(0.0)));
    }

    /// Buffer as ANSI-coloured text (for print mode)
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in &self.buffer {
            for cell in row {
                if cell.ch == ' ' && cell.bg.is_none() {
                    out.push(' ');
                    continue;
                }

                if cell.bold {
                    out.push_str("\x1b[1m");
                }
                if let Some(Color::Rgb { r, g, b }) = cell.bg {
                    out.push_str(&format!("\x1b[48;2;{};{};{}m", r, g, b));
                }
                match cell.fg {
                    Some(Color::Rgb { r, g, b }) => out.push_str(&format!("\x1b[38;2;{};{};{}m", r, g, b)),
                    Some(Color::AnsiValue(v)) => out.push_str(&format!("\x1b[38;5;{}m", v)),
                    Some(Color::White) => out.push_str("\x1b[97m"),
                    Some(Color::Grey) => out.push_str("\x1b[37m"),
                    Some(Color::DarkGrey) => out.push_str("\x1b[90m"),
                    _ => {}
                }

                out.push(cell.ch);
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }
        out
    }

    /// Buffer as plain characters, one line per row
    pub fn to_plain(&self) -> String {
        self.buffer
            .iter()
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.interactive {
            let _ = execute!(stdout(), DisableMouseCapture, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
