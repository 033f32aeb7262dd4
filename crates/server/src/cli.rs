//! Terminal front-ends: an interactive chat loop and a one-shot research run.

use futures::StreamExt;
use prodpilot_core::state::Session;
use prodpilot_core::swarm::{Assistant, ResearchEvent};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

type StdinLines = Lines<BufReader<Stdin>>;

fn stdin_lines() -> StdinLines {
    BufReader::new(tokio::io::stdin()).lines()
}

fn prompt(label: &str) -> anyhow::Result<()> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(())
}

/// Chat until EOF or `/quit`. `/reset` starts the conversation over.
pub async fn run_chat(assistant: Assistant) -> anyhow::Result<()> {
    println!("ProdPilot - describe your product idea. Commands: /reset, /quit");
    let mut lines = stdin_lines();
    let mut session = Session::new();

    loop {
        prompt("\nyou> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();

        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset();
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        let turn = assistant.handle_turn(session, message).await;
        session = turn.session;
        println!("\n{}", turn.reply);
    }

    Ok(())
}

/// Research `idea` and print the stream; with `clarify`, ask the three
/// clarifying questions on stdin first
pub async fn run_research(assistant: Assistant, idea: String, clarify: bool) -> anyhow::Result<()> {
    let clarified = if clarify {
        Some(clarify_interactively(&assistant, &idea).await?)
    } else {
        None
    };

    let mut events = assistant.research().run(&idea, clarified.as_deref());
    while let Some(event) = events.next().await {
        match event? {
            ResearchEvent::Progress(notice) => println!("{}", notice),
            ResearchEvent::Report(report) => {
                println!("\n{}", report.markdown_report);
                if !report.follow_up_questions.is_empty() {
                    println!("\nFollow-up questions:");
                    for question in &report.follow_up_questions {
                        println!("- {}", question);
                    }
                }
            }
        }
    }

    Ok(())
}

async fn clarify_interactively(assistant: &Assistant, idea: &str) -> anyhow::Result<String> {
    let questions = assistant.clarifier().questions(idea).await?;
    let mut lines = stdin_lines();
    let mut answers = Vec::with_capacity(questions.questions.len());

    for (i, question) in questions.questions.iter().enumerate() {
        println!("\nQ{}: {}", i + 1, question.question);
        prompt("> ")?;
        answers.push(lines.next_line().await?.unwrap_or_default());
    }

    let clarified = assistant.clarifier().clarify(idea, &answers).await?;
    println!("\nResearching: {}\n", clarified.clarified_query);
    Ok(clarified.clarified_query)
}
