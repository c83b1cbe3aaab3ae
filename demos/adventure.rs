//! Adventure Demo: a two-room story driven through the console.
//!
//! Demonstrates:
//! - Streamed output with scrolling at the bottom of the screen
//! - Line input with history (Up/Down), word motion and paste
//! - Double-click a word in the story to type it
//! - Single-key input with `get_next_key`
//!
//! Logs go to `adventure.log` (set `RUST_LOG=debug` for detail).
//! Type `quit` or press Ctrl-C to leave.

use fable::{
    Console, ConsoleConfig, FontFlags, Image, KeyPress, Outcome, Rgb, Style, TerminalHost,
};
use std::fs::File;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Writes story text line by line, scrolling when the bottom is reached.
struct Story {
    row: u16,
}

impl Story {
    fn say(&mut self, console: &mut Console<TerminalHost>, text: &str) {
        let (width, height) = (console.surface().width(), console.surface().height());
        for line in wrap(text, usize::from(width.saturating_sub(1))) {
            console.print_text(&line, 0, self.row);
            self.advance(console, width, height);
        }
    }

    fn advance(&mut self, console: &mut Console<TerminalHost>, width: u16, height: u16) {
        if self.row + 1 >= height {
            console.scroll_up(0, 0, width - 1, height - 1, 1);
        } else {
            self.row += 1;
        }
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = vec![String::new()];
    for word in text.split(' ') {
        let current = lines.last_mut().map_or(0, |l| l.chars().count());
        if current > 0 && current + 1 + word.chars().count() > width {
            lines.push(String::new());
        }
        if let Some(line) = lines.last_mut() {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
    }
    lines
}

fn describe(room: usize) -> &'static str {
    if room == 0 {
        "You are standing in an open field west of a white house, with a boarded front door. There is a small mailbox here."
    } else {
        "You are behind the white house. A path leads into the forest to the east. In one corner of the house there is a small window which is slightly ajar."
    }
}

fn show_leaflet(console: &mut Console<TerminalHost>, story: &mut Story) {
    let leaflet = Image::from_lines(
        &[
            "+-----------------+",
            "| WELCOME TO ZORK |",
            "+-----------------+",
        ],
        Style::new(Rgb::new(40, 30, 20), Rgb::new(235, 225, 200)),
    );
    for _ in 0..leaflet.height() {
        story.say(console, "");
    }
    let top = story.row.saturating_sub(leaflet.height());
    console.print_image(&leaflet, 2, top);
}

fn main() -> fable::Result<()> {
    let log = File::create("adventure.log")?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log)),
        )
        .init();

    let config = match std::env::var("FABLE_CONFIG") {
        Ok(path) => ConsoleConfig::load(path)?,
        Err(_) => ConsoleConfig {
            background: Rgb::new(250, 246, 235),
            foreground: Rgb::new(40, 30, 20),
            ..ConsoleConfig::default()
        },
    };

    let host = TerminalHost::new()?;
    let mut console = Console::new(host, config)?;
    console.set_context_commands(["look", "inventory", "-", "quit"]);
    console.clear_region(0, 0, 0, 0);

    let mut story = Story { row: 0 };
    console.set_font(FontFlags::BOLD);
    story.say(&mut console, "WEST OF HOUSE");
    console.set_font(FontFlags::empty());
    story.say(&mut console, describe(0));

    let mut room = 0;
    loop {
        story.say(&mut console, "");
        console.print_text(">", 0, story.row);
        let command = match console.get_input(120, 1, story.row) {
            Outcome::Ready(command) => command,
            Outcome::SessionEnded => break,
        };
        let (width, height) = (console.surface().width(), console.surface().height());
        story.advance(&mut console, width, height);

        match command.trim().to_lowercase().as_str() {
            "quit" | "q" => break,
            "look" | "l" => story.say(&mut console, describe(room)),
            "go north" | "north" | "n" | "go south" | "south" | "s" => {
                room = 1 - room;
                story.say(&mut console, describe(room));
            }
            "inventory" | "i" => story.say(&mut console, "You are empty-handed."),
            "open mailbox" => {
                story.say(&mut console, "Opening the small mailbox reveals a leaflet.");
                show_leaflet(&mut console, &mut story);
            }
            "" => story.say(&mut console, "I beg your pardon?"),
            other => story.say(&mut console, &format!("I don't know how to \"{other}\".")),
        }
    }

    story.say(&mut console, "");
    story.say(&mut console, "Press any key to leave.");
    if let KeyPress::Code(code) = console.get_next_key() {
        tracing::info!(code, "left with key");
    }
    Ok(())
}
