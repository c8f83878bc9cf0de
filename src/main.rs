//! pynote - a terminal Python code editor
//!
//! Tabbed editing with Python syntax highlighting, tab-stop aware
//! indentation, find/replace and word completion.

mod buffer;
mod complete;
mod config;
mod display;
mod editor;
mod error;
mod highlight;
mod indent;
mod input;
mod line;
mod search;
mod terminal;

use std::path::Path;
use std::process::ExitCode;

use buffer::Buffer;
use config::Config;
use editor::Editor;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage() {
    println!("pynote {} - terminal Python code editor", VERSION);
    println!();
    println!("Usage: pynote [OPTIONS] [FILE]...");
    println!();
    println!("Options:");
    println!("  -h, --help     Show this help");
    println!("  -V, --version  Show version");
    println!();
    println!("Keys:");
    println!("  Ctrl+Q         Quit");
    println!("  Ctrl+S         Save (prompts for a name if unnamed)");
    println!("  Alt+S          Save all");
    println!("  Ctrl+O         Open file in a new tab");
    println!("  Ctrl+T         New tab");
    println!("  Ctrl+W         Close tab");
    println!("  Ctrl+PgUp/PgDn Previous / next tab");
    println!("  Ctrl+F         Find (Ctrl+C case, Ctrl+W word, Ctrl+B backward)");
    println!("  Ctrl+G         Find next");
    println!("  Ctrl+H         Replace all");
    println!("  Ctrl+N         Complete word at cursor");
    println!("  Tab / Shift+Tab / Ctrl+Tab   Indent controls");
    println!();
    println!("Configuration: ~/.pynote.toml");
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut files = Vec::new();
    for arg in &args {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            "-V" | "--version" => {
                println!("pynote {}", VERSION);
                return ExitCode::SUCCESS;
            }
            other if other.starts_with('-') => {
                eprintln!("pynote: unknown option '{}'", other);
                eprintln!("Try 'pynote --help'");
                return ExitCode::FAILURE;
            }
            path => files.push(path.to_string()),
        }
    }

    let config = Config::load();

    let mut buffers = Vec::new();
    for file in &files {
        let path = Path::new(file);
        let buffer = if path.exists() {
            match Buffer::from_file(path) {
                Ok(b) => b,
                Err(e) => {
                    eprintln!("pynote: cannot open {}: {}", file, e);
                    return ExitCode::FAILURE;
                }
            }
        } else {
            // New file: empty buffer already pointing at the path
            let mut b = Buffer::new("untitled");
            b.set_filename(path.to_path_buf());
            b
        };
        buffers.push(buffer);
    }

    let result = Editor::new(config, buffers).and_then(|mut editor| editor.run());

    if let Err(e) = result {
        eprintln!("pynote: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
