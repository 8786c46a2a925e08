//! Line-oriented interactive chat on stdin/stdout.

use std::error::Error;
use std::io::{self, IsTerminal, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::commands::{process_input, CommandResult};
use crate::core::app::App;
use crate::core::constants::{ASSISTANT_SENDER, PROVIDER_ERROR_PREFIX, USER_SENDER};
use crate::core::settings::TextColor;
use crate::core::update::current_version;

const RESET: &str = "\x1b[0m";

/// Emits colour codes only when stdout is a terminal.
#[derive(Clone, Copy)]
struct Painter {
    enabled: bool,
}

impl Painter {
    fn detect() -> Self {
        Self {
            enabled: io::stdout().is_terminal(),
        }
    }

    fn color(self, color: TextColor) -> &'static str {
        if self.enabled {
            color.ansi()
        } else {
            ""
        }
    }

    fn reset(self) -> &'static str {
        if self.enabled {
            RESET
        } else {
            ""
        }
    }
}

pub async fn run_chat(mut app: App) -> Result<(), Box<dyn Error>> {
    let painter = Painter::detect();
    println!(
        "chatdesk {} · model {} · theme {}",
        current_version(),
        app.session.model(),
        app.session.theme()
    );
    println!("Type a message and press Enter. /help lists commands, /quit leaves.");
    if app.logging.is_active() {
        println!("Logging: {}", app.logging.status_string());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!(
            "{}{}> ",
            painter.color(app.session.theme().text_color()),
            USER_SENDER
        );
        io::stdout().flush()?;

        let line = lines.next_line().await?;
        print!("{}", painter.reset());
        let Some(line) = line else {
            println!();
            break;
        };

        match process_input(&mut app, &line) {
            CommandResult::Continue => {}
            CommandResult::Status(text) => println!("{text}"),
            CommandResult::Quit => break,
            CommandResult::ProcessAsMessage(message) => {
                send_and_print(&mut app, &message, painter).await?;
            }
        }
    }

    Ok(())
}

/// Send one message, printing the reply as it streams in.
async fn send_and_print(app: &mut App, input: &str, painter: Painter) -> io::Result<()> {
    if input.trim().is_empty() {
        return Ok(());
    }

    print!(
        "{}{}: ",
        painter.color(app.session.theme().assistant_color()),
        ASSISTANT_SENDER
    );
    io::stdout().flush()?;

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let printer = async {
        let mut printed_any = false;
        while let Some(chunk) = rx.recv().await {
            print!("{chunk}");
            let _ = io::stdout().flush();
            printed_any = true;
        }
        printed_any
    };

    let (turn, printed_any) = tokio::join!(app.send(input, Some(tx)), printer);

    if let Some(turn) = turn {
        let is_error = turn.is_assistant() && turn.message.starts_with(PROVIDER_ERROR_PREFIX);
        if is_error && printed_any {
            // The partial reply stays on screen; the error goes below it.
            print!("\n{}", turn.message);
        } else if !printed_any {
            print!("{}", turn.message);
        }
    }
    println!("{}", painter.reset());
    Ok(())
}
