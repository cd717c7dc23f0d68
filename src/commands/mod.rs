//! CLI command implementations

use crate::config::Config;
use crate::embed::OpenAiEmbedder;
use crate::engine::{QaAnswer, QaEngine};
use crate::error::Result;
use crate::ingest::load_documents;
use crate::llm::OpenAiChat;
use crate::provider::OpenAiClient;
use crate::store::VectorStore;
use indicatif::ProgressBar;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

/// Load a document directory and build a ready-to-query engine.
pub async fn build_engine(config: &Config, client: OpenAiClient, dir: &Path) -> Result<QaEngine> {
    let documents = load_documents(dir)?;
    if documents.is_empty() {
        // An empty store is served anyway; every question gets the sentinel
        info!("No documents found in {}", dir.display());
    } else {
        info!("Loaded {} documents from {}", documents.len(), dir.display());
    }

    let embedder = OpenAiEmbedder::new(client.clone(), &config.embedding);
    let chat = OpenAiChat::new(client, &config.chat);

    let bar = ProgressBar::new_spinner();
    bar.set_message("Embedding document fragments...");
    bar.enable_steady_tick(Duration::from_millis(100));
    let store = VectorStore::build(&embedder, &documents, &config.chunk).await;
    bar.finish_and_clear();
    let store = store?;

    println!(
        "Indexed {} fragments from {} documents.",
        store.len(),
        documents.len()
    );

    Ok(QaEngine::new(
        store,
        Box::new(embedder),
        Box::new(chat),
        config.query.clone(),
    ))
}

/// Answer a single question and print it.
pub async fn cmd_ask(engine: &QaEngine, question: &str, k: usize, json: bool) -> Result<()> {
    let answer = engine.retrieve_and_answer(question, k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        print_answer(&answer);
    }

    Ok(())
}

/// Interactive question loop over a built engine.
///
/// A failed question is reported and the loop continues; only EOF or a
/// quit word ends the session.
pub async fn cmd_chat(engine: &QaEngine, k: usize) -> Result<()> {
    println!("\nReady. Type a question, or 'exit' to quit.");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\n> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.is_empty() {
            println!("Type a question.");
            continue;
        }
        if is_quit(question) {
            break;
        }

        match engine.retrieve_and_answer(question, k).await {
            Ok(answer) => print_answer(&answer),
            Err(e) => error!("{}", e),
        }
    }

    println!("Bye.");
    Ok(())
}

fn is_quit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit" | "salir")
}

/// Print the grounding fragments and the answer.
pub fn print_answer(answer: &QaAnswer) {
    if !answer.used.is_empty() {
        println!("\nFragments used:");
        for (rank, fragment) in answer.used.iter().enumerate() {
            println!(
                "  [{}] {} (part {}) - score: {:.3}",
                rank + 1,
                fragment.source_id,
                fragment.part_index,
                fragment.score
            );
        }
    }

    println!("\nAnswer:\n{}", answer.answer);
}
