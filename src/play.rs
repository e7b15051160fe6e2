//! Terminal game loop.
//!
//! Drives the same stateless engine as the HTTP server, holding the
//! history locally the way a browser client would.

use crate::engine::TurnEngine;
use crate::history::MAX_TURNS;
use crate::mover::MoveProvider;
use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, instrument};

const QUIT: &str = ":q";
const RESTART: &str = ":new";

/// Plays games over stdin/stdout until EOF or `:q`.
pub async fn run_play<P: MoveProvider>(engine: &TurnEngine<P>) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    let mut output = tokio::io::stdout();
    play_session(engine, input, &mut output).await
}

/// Plays games reading moves from `input` and writing to `output`.
#[instrument(skip_all)]
pub async fn play_session<P, R, W>(engine: &TurnEngine<P>, input: R, output: &mut W) -> Result<()>
where
    P: MoveProvider,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut history: Vec<String> = Vec::new();

    write_line(
        output,
        &format!(
            "しりとりであそぼう！ ひらがなで入力してね（{}かいまで、{} でおわり、{} でさいしょから）",
            MAX_TURNS, QUIT, RESTART
        ),
    )
    .await?;

    loop {
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            QUIT => break,
            RESTART => {
                history.clear();
                write_line(output, "さいしょからだよ").await?;
                continue;
            }
            _ => {}
        }

        let result = engine.process_turn(&history, line).await?;
        debug!(outcome = ?result.outcome(), "Turn finished");

        if let Some(ai_word) = result.ai_word() {
            write_line(output, &format!("AI: {}", ai_word)).await?;
        }
        write_line(output, &result.message()).await?;
        history = result.history().to_strings();

        if result.is_game_over() {
            write_line(output, "おしまい！ もういちどあそぼう").await?;
            history.clear();
        }
    }

    Ok(())
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::FallbackDictionary;
    use crate::llm_client::LlmClient;
    use crate::mover::{DictionaryMover, FallbackMover, ModelMover};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_session_plays_and_restarts() {
        let mover: FallbackMover<ModelMover<LlmClient>, _> = FallbackMover::fallback_only(
            DictionaryMover::new(Arc::new(FallbackDictionary::builtin())),
        );
        let engine = TurnEngine::new(mover);
        let input: &[u8] = "あめ\nいぬ\n:new\nほん\n:q\nねこ\n".as_bytes();
        let mut output = Vec::new();

        play_session(&engine, input, &mut output).await.expect("session runs");

        let transcript = String::from_utf8(output).expect("utf-8 output");
        assert!(transcript.contains("AI: めがね"));
        assert!(transcript.contains("『ね』からはじめてね"));
        assert!(transcript.contains("さいしょからだよ"));
        assert!(transcript.contains("おしまい"));
        assert!(!transcript.contains("ねこ"));
    }
}
