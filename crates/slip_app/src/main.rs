use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use slip_app::logging;
use slip_app::terminal::{format_slip, Command, TerminalClipboard, TerminalRenderer, HELP};
use slip_app::{AppConfig, Collaborators, Controller, PageContext, CONFIG_FILENAME};
use slip_core::{LinkStatus, SessionMode};
use slip_engine::{FileStore, RecordStore, YourlsShortener};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os("SLIP_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));
    let config = AppConfig::load(&config_path);
    logging::initialize(
        config.log_destination,
        slip_logging::parse_level(&config.log_level),
    );

    // Optional first argument: the page address, e.g. an opened share link.
    let address = std::env::args().nth(1);
    let page = PageContext::from_address(address.as_deref(), &config.origin, config.stale_policy());

    let store = RecordStore::new(FileStore::new(config.storage_dir.clone()));
    let mut controller = Controller::new(
        store,
        page,
        Collaborators {
            renderer: Box::new(TerminalRenderer),
            clipboard: Box::new(TerminalClipboard),
            shortener: Arc::new(YourlsShortener::new(config.shorten_settings())),
        },
    );

    let view = controller.view();
    if view.is_link_invalid {
        println!("The shared link is invalid; showing your own slip.");
    }
    if view.mode == SessionMode::Viewing {
        println!("Viewing a shared slip. Use `pay <amount>` to adjust the amount.");
    }
    println!("{HELP}");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match command {
            Command::Amount(value) => controller.on_amount_edited(&value),
            Command::Set { field, value } => controller.on_text_edited(field, &value),
            Command::Pay(value) => controller.on_imported_amount_edited(&value),
            Command::Link => {
                println!("Generating link...");
                match controller.generate_link().await {
                    LinkStatus::Generated => {
                        if let Some(link) = controller.state().generated_link() {
                            println!("short link: {link}");
                        }
                    }
                    _ => println!("Could not generate a link. Try again with `link`."),
                }
            }
            Command::Copy => {
                if !controller.on_copy_link() {
                    println!("No link yet. Use `link` first.");
                }
            }
            Command::Show => {
                let view = controller.view();
                println!("{}", format_slip(view.displayed_record()));
                println!("link status: {:?}", view.link_status);
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
        }
    }

    Ok(())
}
