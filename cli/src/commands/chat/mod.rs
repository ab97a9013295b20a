//! # EvType Terminal Chat
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! Runs the conversation on stdin/stdout. One line is one turn; blank lines
//! are ignored. Three slash commands are handled outside the dialogue:
//!
//! - `/clear`: reset the conversation (back to the greeting, empty transcript)
//! - `/history`: replay the transcript with timestamps
//! - `/quit`: leave (EOF works too)
//!
//! ```bash
//! evtype chat --data ~/data/Electric_Vehicle_Population_Data.csv
//! printf 'hi\nTesla Model 3\n270\nno\n' | evtype chat
//! ```
//!
//! When stdin is a terminal the user's own words are already on screen, so only
//! the bot's replies are printed; when input is piped, both sides are echoed so
//! the output reads as a full transcript.
//!
use crate::common::ui::TranscriptRenderer;
use crate::core::error::Result;
use crate::predictor::{ConversationState, Dataset, DialogueController, VehicleLookup};
use anyhow::Context;
use clap::Parser;
use std::io::{IsTerminal, Write};
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Skip the banner printed at start-up.
    #[arg(long)]
    pub quiet: bool,
}

/// Entry point for `evtype chat`: a conversation on stdin and stdout.
///
/// ## Arguments
///
/// * `args`: Parsed `chat` flags.
/// * `data`: The global `--data` override, if given.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` once the user quits or input ends.
///
/// ## Errors
///
/// Returns an error if the configuration or dataset cannot be loaded, or if
/// reading stdin or writing stdout fails.
pub async fn handle_chat(args: ChatArgs, data: Option<&Path>) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    let (cfg, dataset) = super::load_dataset(data)?;

    let options = ChatOptions {
        banner: (!args.quiet).then(|| cfg.server.title.clone()),
        echo_user: !std::io::stdin().is_terminal(),
    };
    let input = BufReader::new(tokio::io::stdin());
    run_chat(&dataset, input, std::io::stdout(), &options).await
}

/// Presentation switches for `run_chat`.
pub struct ChatOptions {
    pub banner: Option<String>,
    pub echo_user: bool,
}

/// Drives one conversation until `/quit` or end of input.
///
/// Blank lines are skipped. `/clear` resets the conversation and `/history`
/// replays the transcript.
///
/// ## Arguments
///
/// * `dataset`: Records the conversation looks vehicles up in.
/// * `input`: Line source, usually buffered stdin.
/// * `output`: Where turns are rendered.
/// * `options`: Banner and echo switches.
///
/// ## Errors
///
/// Returns an error if reading `input` or writing `output` fails.
pub async fn run_chat<R, W>(
    dataset: &Dataset,
    input: R,
    output: W,
    options: &ChatOptions,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let controller = DialogueController::new(VehicleLookup::new(dataset));
    let mut renderer = TranscriptRenderer::new(output);
    let mut state = ConversationState::new();

    if let Some(title) = &options.banner {
        renderer.notice(&format!("{} ({} records)", title, dataset.len()))?;
        renderer.notice("Say hi to start. Commands: /clear, /history, /quit")?;
    }

    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read chat input")?
    {
        let message = line.trim();
        match message {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                state.reset();
                renderer.notice("Chat cleared")?;
                continue;
            }
            "/history" => {
                renderer.replay(&state.history)?;
                continue;
            }
            _ => {}
        }

        let (next, _reply) = controller.advance(state, message);
        state = next;
        debug!("Conversation now at {:?}", state.step);

        let turns = &state.history[state.history.len() - 2..];
        if options.echo_user {
            renderer.render_turn(&turns[0])?;
        }
        renderer.render_turn(&turns[1])?;
    }

    info!("Chat ended after {} turn(s)", state.history.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::VehicleRecord;

    fn dataset() -> Dataset {
        Dataset::new(
            "fixture",
            vec![VehicleRecord::new("tesla", "model 3", "BEV", 272.0)],
        )
    }

    async fn transcript(input: &str, options: ChatOptions) -> String {
        let mut out = Vec::new();
        run_chat(&dataset(), input.as_bytes(), &mut out, &options)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    fn piped() -> ChatOptions {
        ChatOptions {
            banner: None,
            echo_user: true,
        }
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let out = transcript("hi\nTesla Model 3\nabout 270 miles\nno\n", piped()).await;
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "You: hi");
        assert!(lines[1].starts_with("Bot: What's the make and model"));
        assert!(lines[5].contains("runs solely on electricity"));
        assert_eq!(lines[7], "Bot: Goodbye! Have a great day!");
    }

    #[tokio::test]
    async fn test_interactive_mode_prints_only_replies() {
        let options = ChatOptions {
            banner: None,
            echo_user: false,
        };
        let out = transcript("hi\n", options).await;
        assert_eq!(
            out,
            "Bot: What's the make and model of the electric vehicle you want me to look up?\n"
        );
    }

    #[tokio::test]
    async fn test_blank_lines_and_quit() {
        let out = transcript("\n   \n/quit\nhi\n", piped()).await;
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn test_clear_resets_conversation() {
        let out = transcript("hi\nTesla Model 3\n/clear\n/history\nhello\n", piped()).await;
        assert!(out.contains("-- Chat cleared --"));
        assert!(out.contains("(no messages yet)"));
        // After clearing, the next message is treated as a greeting again.
        assert!(out.trim_end().ends_with(
            "Bot: What's the make and model of the electric vehicle you want me to look up?"
        ));
    }

    #[tokio::test]
    async fn test_banner() {
        let options = ChatOptions {
            banner: Some("EV Type Predictor".into()),
            echo_user: false,
        };
        let out = transcript("", options).await;
        assert!(out.starts_with("-- EV Type Predictor (1 records) --"));
    }
}
