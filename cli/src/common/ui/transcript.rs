//! # Terminal Transcript Renderer (`common::ui::transcript`)
//!
//! File: cli/src/common/ui/transcript.rs
//!
//! Prints conversation turns to any `io::Write`. Live turns are printed as
//! `You: ...` / `Bot: ...`; a replay of the full history adds the time each
//! turn was recorded.
//!
use crate::predictor::{Speaker, Turn};
use std::io::{self, Write};

pub struct TranscriptRenderer<W: Write> {
    out: W,
}

impl<W: Write> TranscriptRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Prints one turn as it happens.
    pub fn render_turn(&mut self, turn: &Turn) -> io::Result<()> {
        writeln!(self.out, "{}: {}", label(turn.speaker), turn.text)?;
        self.out.flush()
    }

    /// Prints the whole transcript, oldest first.
    pub fn replay(&mut self, history: &[Turn]) -> io::Result<()> {
        if history.is_empty() {
            writeln!(self.out, "(no messages yet)")?;
        }
        for turn in history {
            writeln!(
                self.out,
                "[{}] {}: {}",
                turn.at.format("%H:%M:%S"),
                label(turn.speaker),
                turn.text
            )?;
        }
        self.out.flush()
    }

    /// Out-of-band line such as a banner or "chat cleared".
    pub fn notice(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "-- {} --", text)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn label(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "You",
        Speaker::Assistant => "Bot",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_turns() {
        let mut renderer = TranscriptRenderer::new(Vec::new());
        renderer.render_turn(&Turn::new(Speaker::User, "hi")).unwrap();
        renderer
            .render_turn(&Turn::new(Speaker::Assistant, "What's the make?"))
            .unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output, "You: hi\nBot: What's the make?\n");
    }

    #[test]
    fn test_replay_empty_history() {
        let mut renderer = TranscriptRenderer::new(Vec::new());
        renderer.replay(&[]).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(output, "(no messages yet)\n");
    }

    #[test]
    fn test_replay_keeps_order_and_timestamps() {
        let history = vec![
            Turn::new(Speaker::User, "tesla model 3"),
            Turn::new(Speaker::Assistant, "Great!"),
        ];
        let mut renderer = TranscriptRenderer::new(Vec::new());
        renderer.replay(&history).unwrap();

        let output = String::from_utf8(renderer.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("You: tesla model 3"));
        assert!(lines[1].ends_with("Bot: Great!"));
    }
}
