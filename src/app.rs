use std::io;
use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::debug;

use crate::input::{KeyBuffer, KeyResult};
use crate::style::Theme;
use crate::table::TableView;
use crate::ui;

pub struct App {
    pub view: TableView,
    pub theme: Theme,
    pub file_name: String,
    pub message: Option<String>,
    pub should_quit: bool,
    key_buffer: KeyBuffer,
}

impl App {
    pub fn new(view: TableView, theme: Theme, file_name: String) -> Self {
        Self {
            view,
            theme,
            file_name,
            message: None,
            should_quit: false,
            key_buffer: KeyBuffer::new(),
        }
    }

    /// Pending count prefix, for the status bar
    pub fn pending_count(&self) -> Option<usize> {
        self.key_buffer.count()
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| ui::render(f, self))?;

            if poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    // === Key handling ===

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.key_buffer.process(key) {
            KeyResult::Action(action, count) => {
                self.message = None;
                action.apply(&mut self.view, count);
                debug!(
                    ?action,
                    count,
                    row = self.view.cursor_row(),
                    col = self.view.cursor_col(),
                    offset = self.view.y_offset(),
                    "navigated"
                );
            }
            KeyResult::Quit => self.should_quit = true,
            KeyResult::Pending | KeyResult::Ignored => {}
        }
    }
}
