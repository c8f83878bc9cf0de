//! Editor core - tabs, key dispatch and the main loop
//!
//! Owns the open tabs (one buffer plus cursor state each), routes keys to
//! the indent engine, search, completion and file commands, and drives the
//! prompt loop in the minibuffer.

use std::path::PathBuf;

use crate::buffer::Buffer;
use crate::complete;
use crate::config::Config;
use crate::display::{Display, Frame};
use crate::error::Result;
use crate::highlight::PythonHighlighter;
use crate::indent::{self, EditOp};
use crate::input::{self, Key};
use crate::search::{self, SearchOptions};
use crate::terminal::Terminal;

/// One open file: a buffer plus its cursor and scroll state
pub struct Tab {
    pub buffer: Buffer,
    /// Cursor line index
    pub cursor_line: usize,
    /// Cursor byte offset within the line
    pub cursor_col: usize,
    /// First visible line
    pub top_line: usize,
}

impl Tab {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor_line: 0,
            cursor_col: 0,
            top_line: 0,
        }
    }
}

/// In-flight completion cycle state
///
/// Lives across consecutive completion presses and dies on any other key.
struct CompletionState {
    line: usize,
    /// Byte offset where the completed word starts
    start: usize,
    /// Bytes currently occupied by the inserted candidate
    inserted_len: usize,
    candidates: Vec<String>,
    /// Next candidate to apply
    index: usize,
}

/// The editor application
pub struct Editor {
    terminal: Terminal,
    display: Display,
    config: Config,
    tabs: Vec<Tab>,
    current: usize,
    highlighter: Option<PythonHighlighter>,
    running: bool,
    /// Last executed search, reused by find-next
    last_search: Option<(String, SearchOptions)>,
    completion: Option<CompletionState>,
}

impl Editor {
    /// Create an editor with the given initial buffers (at least one)
    pub fn new(config: Config, buffers: Vec<Buffer>) -> Result<Self> {
        let terminal = Terminal::new()?;
        let tabs: Vec<Tab> = if buffers.is_empty() {
            vec![Tab::new(Buffer::new("untitled"))]
        } else {
            buffers.into_iter().map(Tab::new).collect()
        };

        Ok(Self {
            terminal,
            display: Display::new(),
            config,
            tabs,
            current: 0,
            highlighter: PythonHighlighter::new(),
            running: true,
            last_search: None,
            completion: None,
        })
    }

    /// Main loop: draw, read a key, dispatch
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            self.refresh(None)?;
            let event = self.terminal.read_key()?;
            if let Some(key) = input::translate(event) {
                self.dispatch(key)?;
            }
        }
        Ok(())
    }

    fn tab(&self) -> &Tab {
        &self.tabs[self.current]
    }

    fn tab_mut(&mut self) -> &mut Tab {
        &mut self.tabs[self.current]
    }

    /// Draw one frame, optionally with an active minibuffer prompt
    fn refresh(&mut self, prompt: Option<&str>) -> Result<()> {
        let tab = &self.tabs[self.current];
        let top = self.display.scroll_to_cursor(
            &self.terminal,
            tab.top_line,
            tab.cursor_line,
            &tab.buffer,
            &self.config,
        );
        self.tabs[self.current].top_line = top;

        let tab = &self.tabs[self.current];
        let frame = Frame {
            buffer: &tab.buffer,
            tab_label: format!("{}/{}", self.current + 1, self.tabs.len()),
            cursor_line: tab.cursor_line,
            cursor_col: tab.cursor_col,
            top_line: tab.top_line,
            config: &self.config,
            highlighter: self.highlighter.as_ref(),
            prompt,
        };
        self.display.render(&mut self.terminal, &frame)
    }

    fn dispatch(&mut self, key: Key) -> Result<()> {
        // Any key other than the completion chord ends the cycle
        if !matches!(key, Key::Ctrl('n')) {
            self.completion = None;
        }

        if let Some(edit_key) = key.edit_key() {
            self.display.clear_message();
            self.apply_edit(edit_key);
            return Ok(());
        }

        match key {
            Key::Char(ch) => {
                self.display.clear_message();
                let tab = self.tab_mut();
                tab.buffer.insert_char(tab.cursor_line, tab.cursor_col, ch);
                tab.cursor_col += ch.len_utf8();
            }
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete_forward(),

            Key::Up => self.move_vertical(-1),
            Key::Down => self.move_vertical(1),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.tab_mut().cursor_col = 0,
            Key::End => {
                let tab = self.tab_mut();
                tab.cursor_col = tab
                    .buffer
                    .line(tab.cursor_line)
                    .map(|l| l.len())
                    .unwrap_or(0);
            }
            Key::PageUp => {
                let page = self.terminal.rows().saturating_sub(2) as isize;
                self.move_vertical(-page);
            }
            Key::PageDown => {
                let page = self.terminal.rows().saturating_sub(2) as isize;
                self.move_vertical(page);
            }

            Key::CtrlPageUp => self.cycle_tab(-1),
            Key::CtrlPageDown => self.cycle_tab(1),

            Key::Ctrl('q') => self.quit()?,
            Key::Ctrl('s') => self.save_current()?,
            Key::Alt('s') => self.save_all()?,
            Key::Ctrl('o') => self.open_file()?,
            Key::Ctrl('t') => self.new_tab(),
            Key::Ctrl('w') => self.close_tab()?,

            Key::Ctrl('f') => self.find()?,
            Key::Ctrl('g') => self.find_next(),
            Key::Ctrl('h') => self.replace()?,
            Key::Ctrl('n') => self.complete_word(),

            Key::Ctrl('l') => self.display.force_redraw(),
            Key::Esc => self.display.clear_message(),
            _ => {}
        }
        Ok(())
    }

    /// Route one of the four edit keys through the indent engine
    fn apply_edit(&mut self, key: indent::EditKey) {
        let tab_size = self.config.tab_size;
        let tab = self.tab_mut();
        let (text, column) = match tab.buffer.line(tab.cursor_line) {
            Some(line) => (line.text().to_string(), line.byte_to_col(tab.cursor_col)),
            None => return,
        };

        match indent::apply(key, &text, tab.cursor_col, column, tab_size) {
            EditOp::InsertText(s) => {
                tab.buffer.insert_str(tab.cursor_line, tab.cursor_col, &s);
                tab.cursor_col += s.len();
            }
            EditOp::PrependText(s) => {
                tab.buffer.insert_str(tab.cursor_line, 0, &s);
                tab.cursor_col += s.len();
            }
            EditOp::StripPrefix(n) => {
                tab.buffer.strip_prefix(tab.cursor_line, n);
                tab.cursor_col = tab.cursor_col.saturating_sub(n);
            }
            EditOp::NewlineIndent(enter) => {
                tab.buffer.insert_newline(tab.cursor_line, tab.cursor_col);
                tab.buffer.insert_str(tab.cursor_line + 1, 0, &enter.indent);
                tab.cursor_line += 1;
                tab.cursor_col = enter.cursor;
            }
        }
    }

    fn backspace(&mut self) {
        let tab = self.tab_mut();
        if tab.cursor_col > 0 {
            if let Some(pos) = tab.buffer.delete_backward(tab.cursor_line, tab.cursor_col) {
                tab.cursor_col = pos;
            }
        } else if tab.cursor_line > 0 {
            if let Some(join_pos) = tab.buffer.join_with_previous(tab.cursor_line) {
                tab.cursor_line -= 1;
                tab.cursor_col = join_pos;
            }
        }
    }

    fn delete_forward(&mut self) {
        let tab = self.tab_mut();
        let line_len = tab
            .buffer
            .line(tab.cursor_line)
            .map(|l| l.len())
            .unwrap_or(0);
        if tab.cursor_col < line_len {
            tab.buffer.delete_char(tab.cursor_line, tab.cursor_col);
        } else {
            tab.buffer.join_line(tab.cursor_line);
        }
    }

    fn move_vertical(&mut self, delta: isize) {
        let tab = self.tab_mut();
        let last = tab.buffer.line_count().saturating_sub(1);
        let target = tab.cursor_line as isize + delta;
        tab.cursor_line = target.clamp(0, last as isize) as usize;
        tab.cursor_col = clamp_to_line(&tab.buffer, tab.cursor_line, tab.cursor_col);
    }

    fn move_left(&mut self) {
        let tab = self.tab_mut();
        if tab.cursor_col > 0 {
            if let Some(len) = tab
                .buffer
                .line(tab.cursor_line)
                .and_then(|l| l.prev_char_len(tab.cursor_col))
            {
                tab.cursor_col -= len;
            }
        } else if tab.cursor_line > 0 {
            tab.cursor_line -= 1;
            tab.cursor_col = tab
                .buffer
                .line(tab.cursor_line)
                .map(|l| l.len())
                .unwrap_or(0);
        }
    }

    fn move_right(&mut self) {
        let tab = self.tab_mut();
        let line_len = tab
            .buffer
            .line(tab.cursor_line)
            .map(|l| l.len())
            .unwrap_or(0);
        if tab.cursor_col < line_len {
            if let Some(len) = tab
                .buffer
                .line(tab.cursor_line)
                .and_then(|l| l.next_char_len(tab.cursor_col))
            {
                tab.cursor_col += len;
            }
        } else if tab.cursor_line + 1 < tab.buffer.line_count() {
            tab.cursor_line += 1;
            tab.cursor_col = 0;
        }
    }

    fn cycle_tab(&mut self, delta: isize) {
        let count = self.tabs.len() as isize;
        self.current = ((self.current as isize + delta + count) % count) as usize;
        self.display.force_redraw();
    }

    fn new_tab(&mut self) {
        self.tabs.push(Tab::new(Buffer::new("untitled")));
        self.current = self.tabs.len() - 1;
        self.display.force_redraw();
    }

    fn close_tab(&mut self) -> Result<()> {
        if self.tab().buffer.is_modified()
            && !self.confirm("Buffer modified; close anyway? (y/n) ")?
        {
            return Ok(());
        }

        self.tabs.remove(self.current);
        if self.tabs.is_empty() {
            // The editor always shows at least one tab
            self.tabs.push(Tab::new(Buffer::new("untitled")));
        }
        if self.current >= self.tabs.len() {
            self.current = self.tabs.len() - 1;
        }
        self.display.force_redraw();
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        let dirty = self.tabs.iter().filter(|t| t.buffer.is_modified()).count();
        if dirty > 0 && !self.confirm("Modified buffers exist; quit anyway? (y/n) ")? {
            return Ok(());
        }
        // Settings persist across sessions; failure to write must not
        // block the exit
        let _ = self.config.save();
        self.running = false;
        Ok(())
    }

    fn save_current(&mut self) -> Result<()> {
        if self.tab().buffer.filename().is_none() {
            let name = match self.prompt("Save as: ")? {
                Some(name) if !name.is_empty() => name,
                _ => {
                    self.display.set_message("Save aborted");
                    return Ok(());
                }
            };
            self.tab_mut().buffer.set_filename(PathBuf::from(name));
        }

        match self.tab_mut().buffer.save() {
            Ok(()) => {
                let name = self.tab().buffer.name().to_string();
                self.display.set_message(format!("Saved {}", name));
            }
            Err(e) => self.display.set_message(format!("Save failed: {}", e)),
        }
        Ok(())
    }

    fn save_all(&mut self) -> Result<()> {
        let mut saved = 0;
        let mut skipped = 0;
        for tab in &mut self.tabs {
            if !tab.buffer.is_modified() {
                continue;
            }
            if tab.buffer.filename().is_none() {
                // Unnamed buffers need the per-buffer save prompt
                skipped += 1;
                continue;
            }
            match tab.buffer.save() {
                Ok(()) => saved += 1,
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            self.display
                .set_message(format!("Saved {} buffer(s), {} skipped", saved, skipped));
        } else {
            self.display.set_message(format!("Saved {} buffer(s)", saved));
        }
        Ok(())
    }

    fn open_file(&mut self) -> Result<()> {
        let name = match self.prompt("Open file: ")? {
            Some(name) if !name.is_empty() => name,
            _ => return Ok(()),
        };

        match Buffer::from_file(&PathBuf::from(&name)) {
            Ok(buffer) => {
                self.tabs.push(Tab::new(buffer));
                self.current = self.tabs.len() - 1;
                self.display.force_redraw();
            }
            Err(e) => self.display.set_message(format!("Cannot open {}: {}", name, e)),
        }
        Ok(())
    }

    /// Find prompt with option toggles (Ctrl+C case, Ctrl+W word,
    /// Ctrl+B backward) available while typing the query
    fn find(&mut self) -> Result<()> {
        let mut opts = self
            .last_search
            .as_ref()
            .map(|(_, o)| *o)
            .unwrap_or_default();

        let mut query = String::new();
        loop {
            let label = format!("{}Find: {}", search_flags(opts), query);
            self.refresh(Some(&label))?;

            let key = match input::translate(self.terminal.read_key()?) {
                Some(key) => key,
                None => continue,
            };
            match key {
                Key::Enter => break,
                Key::Esc | Key::Ctrl('g') => return Ok(()),
                Key::Backspace => {
                    query.pop();
                }
                Key::Ctrl('c') => opts.match_case = !opts.match_case,
                Key::Ctrl('w') => opts.whole_word = !opts.whole_word,
                Key::Ctrl('b') => opts.backward = !opts.backward,
                Key::Char(ch) => query.push(ch),
                _ => {}
            }
        }

        if query.is_empty() {
            return Ok(());
        }
        self.last_search = Some((query, opts));
        self.find_next();
        Ok(())
    }

    /// Jump to the next match of the last search
    fn find_next(&mut self) {
        let (query, opts) = match &self.last_search {
            Some((q, o)) => (q.clone(), *o),
            None => {
                self.display.set_message("No previous search");
                return;
            }
        };

        let tab = self.tab();
        match search::find_from(&tab.buffer, &query, opts, tab.cursor_line, tab.cursor_col) {
            Some((line, col)) => {
                let total = search::count_matches(&tab.buffer, &query, opts);
                let tab = self.tab_mut();
                tab.cursor_line = line;
                tab.cursor_col = col;
                self.display
                    .set_message(format!("{} match(es) for '{}'", total, query));
            }
            None => {
                let _ = self.terminal.beep();
                self.display.set_message(format!("Not found: '{}'", query));
            }
        }
    }

    /// Replace-all: query prompt, replacement prompt, then one sweep
    fn replace(&mut self) -> Result<()> {
        let query = match self.prompt("Replace: ")? {
            Some(q) if !q.is_empty() => q,
            _ => return Ok(()),
        };
        let replacement = match self.prompt(&format!("Replace '{}' with: ", query))? {
            Some(r) => r,
            None => return Ok(()),
        };

        let opts = self
            .last_search
            .as_ref()
            .map(|(_, o)| SearchOptions {
                backward: false,
                ..*o
            })
            .unwrap_or_default();

        let count = search::replace_all(&mut self.tab_mut().buffer, &query, &replacement, opts);
        let tab = self.tab_mut();
        tab.cursor_col = clamp_to_line(&tab.buffer, tab.cursor_line, tab.cursor_col);
        if count == 0 {
            self.display.set_message(format!("Not found: '{}'", query));
        } else {
            self.display
                .set_message(format!("Replaced {} occurrence(s)", count));
        }
        Ok(())
    }

    /// Cycle word completion at the cursor
    fn complete_word(&mut self) {
        let state = match self.completion.take() {
            Some(state) => state,
            None => {
                let tab = self.tab();
                let (start, prefix) = match tab
                    .buffer
                    .line(tab.cursor_line)
                    .and_then(|l| complete::prefix_at(l.text(), tab.cursor_col))
                {
                    Some((start, prefix)) => (start, prefix.to_string()),
                    None => {
                        self.display.set_message("Nothing to complete");
                        return;
                    }
                };

                let candidates = complete::completions(&tab.buffer, &prefix);
                if candidates.is_empty() {
                    let _ = self.terminal.beep();
                    self.display
                        .set_message(format!("No completions for '{}'", prefix));
                    return;
                }
                CompletionState {
                    line: tab.cursor_line,
                    start,
                    inserted_len: prefix.len(),
                    candidates,
                    index: 0,
                }
            }
        };

        let candidate = state.candidates[state.index % state.candidates.len()].clone();
        let tab = self.tab_mut();
        if let Some(line) = tab.buffer.line_mut(state.line) {
            line.delete_range(state.start, state.start + state.inserted_len);
            line.insert_str(state.start, &candidate);
        }
        tab.buffer.set_modified(true);
        tab.cursor_col = state.start + candidate.len();

        self.display.set_message(format!(
            "Completion {}/{}: {}",
            state.index % state.candidates.len() + 1,
            state.candidates.len(),
            candidate
        ));
        self.completion = Some(CompletionState {
            inserted_len: candidate.len(),
            index: state.index + 1,
            ..state
        });
    }

    /// Read a line of input in the minibuffer
    ///
    /// Enter accepts, Esc (or Ctrl+G) cancels with None.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        let mut input = String::new();
        loop {
            let text = format!("{}{}", label, input);
            self.refresh(Some(&text))?;

            let key = match input::translate(self.terminal.read_key()?) {
                Some(key) => key,
                None => continue,
            };
            match key {
                Key::Enter => return Ok(Some(input)),
                Key::Esc | Key::Ctrl('g') => return Ok(None),
                Key::Backspace => {
                    input.pop();
                }
                Key::Char(ch) => input.push(ch),
                _ => {}
            }
        }
    }

    /// Yes/no question in the minibuffer
    fn confirm(&mut self, question: &str) -> Result<bool> {
        loop {
            self.refresh(Some(question))?;
            match input::translate(self.terminal.read_key()?) {
                Some(Key::Char('y')) | Some(Key::Char('Y')) => return Ok(true),
                Some(Key::Char('n')) | Some(Key::Char('N')) | Some(Key::Esc) => return Ok(false),
                _ => {}
            }
        }
    }
}

/// Prompt prefix showing the active search options, e.g. "[Cc Wd] "
fn search_flags(opts: SearchOptions) -> String {
    let mut flags = Vec::new();
    if opts.match_case {
        flags.push("Cc");
    }
    if opts.whole_word {
        flags.push("Wd");
    }
    if opts.backward {
        flags.push("Up");
    }
    if flags.is_empty() {
        String::new()
    } else {
        format!("[{}] ", flags.join(" "))
    }
}

/// Clamp a byte offset into the given line, snapping to a char boundary
fn clamp_to_line(buffer: &Buffer, line_idx: usize, col: usize) -> usize {
    let text = match buffer.line(line_idx) {
        Some(line) => line.text(),
        None => return 0,
    };
    let mut col = col.min(text.len());
    while col > 0 && !text.is_char_boundary(col) {
        col -= 1;
    }
    col
}
