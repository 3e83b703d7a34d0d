pub mod chat;
pub mod cli;
pub mod clock;
pub mod controller;
pub mod history;
pub mod models;
pub mod repl;

use chat::new_client as new_chat_client;
use cli::Args;
use clock::{ new_id_generator, Clock, IdScheme, SystemClock };
use controller::ConversationController;
use history::create_conversation_store;
use log::info;
use std::error::Error;
use std::sync::Arc;
use tokio::io::BufReader;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Backend URL: {}", args.backend_url);
    info!("Verbose Answers: {}", args.verbose_answers);
    info!("Request Timeout: {:?}", args.request_timeout_secs);
    info!("Store Type: {}", args.store_type);
    info!("Store Path: {}", args.store_path);
    info!("Id Scheme: {}", args.id_scheme);
    info!("-------------------------");

    let chat_client = new_chat_client(&args.chat_client_config())?;
    info!("Chat client configured: Endpoint={}", chat_client.endpoint());

    let store = create_conversation_store(&args)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ids = new_id_generator(args.id_scheme.parse::<IdScheme>()?, clock.clone());

    let mut controller = ConversationController::load(store, chat_client, clock, ids);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    repl::run_session(&mut controller, stdin, &mut stdout).await?;

    Ok(())
}
