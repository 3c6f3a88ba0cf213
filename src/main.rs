use anyhow::Result;
use clap::Parser;
use log::{error, info, warn, LevelFilter};
use rand::Rng;
use std::path::PathBuf;

mod ui;
mod utils;

use crate::ui::{ChatUI, UiAction};
use hugup::pipeline::MessagePipeline;
use hugup::sample;
use hugup::session::{self, SessionFlag};
use hugup::store::AppStore;

/// Command line arguments for Hugup
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Hugup: a terminal messaging app mockup with simulated delivery.",
    long_about = "Hugup renders a chat list, conversations, status updates, profile and \
    settings screens over built-in sample data. Message delivery (sent, delivered, read) \
    is simulated with timers; nothing leaves your machine.\n\n\
    Optional parameters:\n\
    --data-dir <PATH>    Override the directory for the session flag and log file\n\
    --logout             Clear the saved session and exit\n\
    Use -h or --help to see all options."
)]
struct Args {
    /// Directory for the session flag and log file
    #[arg(long, value_name = "PATH", help = "Override the directory for the session flag and log file")]
    data_dir: Option<PathBuf>,

    /// Clear the saved session and exit
    #[arg(long, help = "Clear the saved session and exit")]
    logout: bool,
}

/// Prompts for the mock login flow: a phone number and a verification
/// code that is displayed rather than delivered. Any code is accepted.
fn prompt_login(session: &SessionFlag) -> Result<String> {
    eprintln!("Welcome to Hugup: simple, reliable, private messaging.");

    let phone = loop {
        eprintln!("Enter your phone number to get started:");
        let entered = utils::read_line()?;
        if !entered.is_empty() {
            break entered;
        }
    };

    // No SMS gateway here; show the code instead of sending it.
    let code: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    eprintln!("Your verification code is: {}", code);
    eprintln!("Enter the code to continue:");
    let _entered = utils::read_line()?;

    session.set(&phone)?;
    info!("Logged in as {}", phone);
    Ok(phone)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments FIRST
    let args = Args::parse();

    if let Some(dir) = &args.data_dir {
        session::set_data_dir_override(dir.clone());
    }

    // Determine the log file path based on --data-dir
    let log_file_path = match &args.data_dir {
        Some(dir) => {
            if !dir.exists() {
                if let Err(e) = std::fs::create_dir_all(dir) {
                    eprintln!(
                        "Warning: Failed to create data directory {}: {}. Log file might not be created.",
                        dir.display(),
                        e
                    );
                    PathBuf::from("hugup.log")
                } else {
                    dir.join("hugup.log")
                }
            } else {
                dir.join("hugup.log")
            }
        }
        None => PathBuf::from("hugup.log"),
    };

    utils::setup_logging(log_file_path.to_str(), LevelFilter::Debug)?;

    info!("Hugup starting up");
    info!(
        "System information: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    info!("Logging to file: {}", log_file_path.display());

    let session = SessionFlag::open_default()?;

    if args.logout {
        session.clear()?;
        println!("Logged out of Hugup.");
        return Ok(());
    }

    // Startup auth check: the session flag decides between the login
    // prompt and going straight to the main screen.
    if session.is_authenticated() {
        match session.phone() {
            Some(phone) => info!("Resuming session for {}", phone),
            None => info!("Resuming session"),
        }
    } else {
        prompt_login(&session)?;
    }

    // All state lives here, seeded once per session
    let store = AppStore::new(sample::seed());
    let pipeline = MessagePipeline::new(store.clone());

    // Setup terminal UI
    let mut terminal = ui::setup_terminal()?;
    let mut chat_ui = ChatUI::new(store.current_user().await);

    let outcome = run_main_loop(&mut chat_ui, &mut terminal, &store, &pipeline).await;

    // Restore terminal before reporting anything
    ui::restore_terminal(terminal)?;

    match outcome {
        Ok(true) => {
            session.clear()?;
            println!("Logged out of Hugup.");
        }
        Ok(false) => println!("Chat session ended."),
        Err(e) => {
            error!("Main loop failed: {}", e);
            return Err(e);
        }
    }

    Ok(())
}

/// Drive the UI until the user quits or logs out. Returns true when the
/// session flag should be cleared.
async fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<std::io::Stdout>>,
    store: &AppStore,
    pipeline: &MessagePipeline,
) -> Result<bool> {
    loop {
        // Snapshot the store, then draw. The pipeline's timer tasks
        // mutate state between iterations and show up on the next pass.
        chat_ui.sync(
            store.contacts().await,
            store.chats().await,
            store.statuses().await,
            store.active_chat().await,
            store.theme().await,
        );
        terminal.draw(|f| chat_ui.draw(f))?;

        let Some(action) = chat_ui.handle_input()? else {
            continue;
        };

        match action {
            UiAction::Quit => return Ok(false),
            UiAction::Logout => return Ok(true),
            UiAction::OpenChat(chat_id) => {
                store.set_active_chat(Some(chat_id)).await;
            }
            UiAction::CloseChat => {
                store.set_active_chat(None).await;
            }
            UiAction::SendMessage { chat_id, text } => {
                if let Err(e) = pipeline.send(&chat_id, &text).await {
                    warn!("Rejected outgoing message: {}", e);
                }
            }
            UiAction::DeleteChat(chat_id) => {
                info!("Deleting chat {}", chat_id);
                store.remove_chat(&chat_id).await;
            }
            UiAction::ToggleTheme => {
                let theme = store.toggle_theme().await;
                info!("Theme switched to {:?}", theme);
            }
        }
    }
}
