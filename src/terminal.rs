//! Interactive terminal chat
//!
//! One session transcript per process. Plain lines are questions; lines
//! starting with `/` are commands.

use crate::advisor::AdvisorGateway;
use crate::memory::{ChatSession, Role};
use crate::models::ProductFilter;
use crate::prompts::{GENERIC_FAILURE, GREETING};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::error;

const HELP: &str = "Commands:
  /products [risk level] [max amount]   list matching products, e.g. /products Very Low 5000
  /history                              show this conversation
  /reset                                start a new conversation
  /help                                 show this help
  /quit                                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ask(String),
    Products(ProductFilter),
    History,
    Reset,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

/// Parse one input line. Questions are kept exactly as typed.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Command::Empty;
    }

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Ask(line.to_string());
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = words.collect();

    match name.as_str() {
        "products" | "p" => Command::Products(parse_product_filter(&args)),
        "history" => Command::History,
        "reset" | "clear" => Command::Reset,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(name),
    }
}

/// Trailing number is the investment ceiling; the remaining words form the
/// risk level, matched exactly.
fn parse_product_filter(args: &[&str]) -> ProductFilter {
    let mut filter = ProductFilter::new();
    let mut words = args;

    if let Some((last, init)) = args.split_last() {
        let digits: String = last.chars().filter(|c| *c != ',' && *c != '₹').collect();
        if let Ok(max) = digits.parse::<u64>() {
            filter = filter.with_max_investment(max);
            words = init;
        }
    }

    if !words.is_empty() {
        filter = filter.with_risk_level(words.join(" "));
    }

    filter
}

/// Drive a chat session over any line reader and writer until `/quit` or EOF.
/// Each ask is bounded by `ask_timeout`; a timed-out ask leaves the session
/// unchanged.
pub async fn run_chat<R, W>(
    advisor: &AdvisorGateway,
    ask_timeout: Duration,
    input: R,
    output: &mut W,
) -> crate::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = ChatSession::new();
    let mut lines = input.lines();

    write_block(output, &format!("assistant> {}\n(type /help for commands)", GREETING)).await?;
    output.write_all(b"you> ").await?;
    output.flush().await?;

    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Ask(question) => {
                let ask = advisor.ask_in_session(&mut session, &question);
                match tokio::time::timeout(ask_timeout, ask).await {
                    Ok(Ok(answer)) => write_block(output, &format!("assistant> {}", answer)).await?,
                    Ok(Err(e)) => {
                        error!("Ask failed: {}", e);
                        write_block(output, &format!("assistant> {}", GENERIC_FAILURE)).await?;
                    }
                    Err(_) => {
                        error!("Ask timed out after {:?}", ask_timeout);
                        write_block(output, &format!("assistant> {}", GENERIC_FAILURE)).await?;
                    }
                }
            }
            Command::Products(filter) => {
                let products = advisor.catalog().filter(&filter);
                if products.is_empty() {
                    write_block(output, "No products match your criteria.").await?;
                } else {
                    let cards: Vec<String> = products.iter().map(|p| p.card()).collect();
                    write_block(output, &cards.join("\n\n")).await?;
                }
            }
            Command::History => {
                if session.is_empty() {
                    write_block(output, "(no messages yet)").await?;
                } else {
                    let lines: Vec<String> = session
                        .turns()
                        .iter()
                        .map(|t| {
                            let who = match t.role {
                                Role::User => "you",
                                Role::Model => "assistant",
                            };
                            format!("{}> {}", who, t.text)
                        })
                        .collect();
                    write_block(output, &lines.join("\n")).await?;
                }
            }
            Command::Reset => {
                session = ChatSession::new();
                write_block(output, "Started a new conversation.").await?;
            }
            Command::Help => write_block(output, HELP).await?,
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(name) => {
                write_block(output, &format!("Unknown command /{}. Type /help.", name)).await?
            }
        }

        output.write_all(b"you> ").await?;
        output.flush().await?;
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn write_block<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> crate::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n\n").await?;
    Ok(())
}
