//! Interactive recommendation chat

use std::io::Write;
use std::io::{
    self,
};

use crate::cli::output::*;
use crate::rag::ConversationOrchestrator;
use crate::FoodRag;
use crate::Result;

/// What one line typed at the chat prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Empty,
    Quit,
    Help,
    Compare,
    History,
    Query(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        match line.to_lowercase().as_str() {
            "quit" | "exit" | "q" => Self::Quit,
            "help" | "h" => Self::Help,
            "compare" => Self::Compare,
            "history" => Self::History,
            _ => Self::Query(line.to_string()),
        }
    }
}

/// `None` on end of input
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

pub async fn handle_chat(app: &FoodRag, verbose: bool) -> Result<()> {
    let orchestrator = app.orchestrator()?;

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║  🍽️  Food recommendation chat                                  ║");
    println!("║  Commands: 'compare', 'history', 'help', 'quit'                ║");
    println!("╚════════════════════════════════════════════════════════════════╝");
    if verbose {
        print_info(&format!("Session {}", orchestrator.session_id()));
    }

    loop {
        let Some(line) = read_line("\n👤 You: ")? else {
            println!();
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Empty => continue,
            ChatCommand::Quit => {
                println!();
                print_success("👋 Goodbye! Hope you find something delicious!");
                break;
            }
            ChatCommand::Help => print_chat_help(),
            ChatCommand::History => print_history(&orchestrator.history().await),
            ChatCommand::Compare => compare_interactively(&orchestrator).await?,
            ChatCommand::Query(query) => match orchestrator.handle_query(&query).await {
                Ok(response) => {
                    print_chat_response(&response, verbose);
                    print_related_searches(&response.results);
                }
                // Keep chatting; the index may come back
                Err(e) => print_error(&e.user_message()),
            },
        }
    }

    Ok(())
}

async fn compare_interactively(orchestrator: &ConversationOrchestrator) -> Result<()> {
    println!("\n🔄 COMPARISON MODE");
    println!("{}", "-".repeat(35));

    let Some(first) = read_line("Enter first food query: ")? else {
        return Ok(());
    };
    let Some(second) = read_line("Enter second food query: ")? else {
        return Ok(());
    };
    if first.is_empty() || second.is_empty() {
        print_error("Please enter both queries for comparison");
        return Ok(());
    }

    match orchestrator.handle_comparison(&first, &second).await {
        Ok(response) => print_comparison(&first, &second, &response),
        Err(e) => print_error(&e.user_message()),
    }
    Ok(())
}
