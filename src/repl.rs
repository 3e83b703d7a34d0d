use crate::controller::ConversationController;
use crate::models::chat::{ ChatMessage, Conversation, Role };

use log::{ info, warn };
use std::io;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt };

const HELP: &str = "\
Commands:
  /new            start a new conversation
  /list           list conversations (* marks the current one)
  /select <id>    switch to a conversation
  /delete <id>    delete a conversation
  /show           print the current conversation
  /status         check that the backend is reachable
  /help           show this help
  /quit           leave
Anything else is sent as a message.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Select(String),
    Delete(String),
    Show,
    Status,
    Help,
    Quit,
    Send(String),
    Empty,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        if !line.starts_with('/') {
            return Command::Send(line.to_string());
        }

        let (name, arg) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match (name, arg) {
            ("/new", _) => Command::New,
            ("/list", _) => Command::List,
            ("/show", _) => Command::Show,
            ("/status", _) => Command::Status,
            ("/help", _) => Command::Help,
            ("/quit" | "/exit", _) => Command::Quit,
            ("/select", id) if !id.is_empty() => Command::Select(id.to_string()),
            ("/delete", id) if !id.is_empty() => Command::Delete(id.to_string()),
            ("/select" | "/delete", _) => Command::Invalid(format!("usage: {} <id>", name)),
            _ => Command::Invalid(format!("unknown command {} (try /help)", name)),
        }
    }
}

/// Reads commands line by line until `/quit` or end of input.
///
/// Lines are handled one at a time, so a send blocks the next line until
/// its reply is in.
pub async fn run_session<R, W>(
    controller: &mut ConversationController,
    input: R,
    output: &mut W
) -> io::Result<()>
    where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin
{
    let mut lines = input.lines();
    write_out(output, "Type a message, or /help for commands.\n").await?;
    if let Some(conversation) = controller.current() {
        write_out(output, &format!("Resuming \"{}\"\n", conversation.title)).await?;
    }

    loop {
        write_out(output, "> ").await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Quit => {
                break;
            }
            Command::Help => write_out(output, HELP).await?,
            Command::New => {
                controller.create_conversation();
                write_out(output, "Started a new conversation.\n").await?;
            }
            Command::List => {
                let listing = render_list(controller.conversations(), controller.current_id());
                write_out(output, &listing).await?;
            }
            Command::Select(id) => {
                if controller.select_conversation(&id) {
                    if let Some(conversation) = controller.current() {
                        write_out(output, &render_conversation(conversation)).await?;
                    }
                } else {
                    write_out(output, &format!("No conversation with id {}\n", id)).await?;
                }
            }
            Command::Delete(id) => {
                if controller.delete_conversation(&id) {
                    write_out(output, &format!("Deleted {}\n", id)).await?;
                } else {
                    write_out(output, &format!("No conversation with id {}\n", id)).await?;
                }
            }
            Command::Show => {
                match controller.current() {
                    Some(conversation) => {
                        write_out(output, &render_conversation(conversation)).await?
                    }
                    None => write_out(output, "No conversation selected.\n").await?,
                }
            }
            Command::Status => {
                let endpoint = controller.client().endpoint();
                match controller.client().health().await {
                    Ok(()) => write_out(output, &format!("Backend is up ({})\n", endpoint)).await?,
                    Err(e) => {
                        warn!("Health check failed: {}", e);
                        write_out(output, &format!("Backend unreachable: {}\n", e)).await?
                    }
                }
            }
            Command::Send(text) => {
                let pending = controller.begin_send(&text);
                write_out(output, "thinking...\n").await?;
                let client = controller.client().clone();
                let result = client.ask(&pending.query).await;
                if let Some(reply) = controller.finish_send(pending, result) {
                    write_out(output, &render_message(&reply)).await?;
                }
            }
            Command::Invalid(hint) => write_out(output, &format!("{}\n", hint)).await?,
        }
    }

    info!("Session ended with {} conversations", controller.conversations().len());
    Ok(())
}

pub fn render_list(conversations: &[Conversation], current: Option<&str>) -> String {
    if conversations.is_empty() {
        return "No conversations yet.\n".to_string();
    }
    let mut result = String::new();
    for conversation in conversations {
        let marker = if Some(conversation.id.as_str()) == current { "*" } else { " " };
        result.push_str(
            &format!(
                "{} {}  {}  ({}, {} messages)\n",
                marker,
                conversation.id,
                conversation.title,
                conversation.timestamp,
                conversation.messages.len()
            )
        );
    }
    result
}

pub fn render_conversation(conversation: &Conversation) -> String {
    let mut result = format!("== {} ==\n", conversation.title);
    for message in &conversation.messages {
        result.push_str(&render_message(message));
    }
    result
}

pub fn render_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "You",
        Role::Bot => "Bot",
    };
    format!("[{}] {}: {}\n", message.timestamp.format("%H:%M"), speaker, message.content)
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.flush().await
}
