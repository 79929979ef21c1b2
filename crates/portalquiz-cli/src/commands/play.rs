//! Interactive terminal session.
//!
//! The terminal is just another presentation layer: it renders from the
//! engine's read model, waits its configured delay after a transition has
//! completed, then sends the next event.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use portalquiz_core::config::PresentationConfig;
use portalquiz_core::error::Result;
use portalquiz_core::quiz::RITUAL_COMPLETE_TEXT;
use portalquiz_core::{CoreError, Phase, QuizEngine};

#[derive(Debug, Clone, Copy)]
struct Pacing {
    answer_delay: Duration,
    interlude_delay: Duration,
    /// Ring the terminal bell on answers and on the result.
    bell: bool,
}

impl Pacing {
    fn from_config(presentation: &PresentationConfig, fast: bool) -> Self {
        let delay = |ms: u64| if fast { Duration::ZERO } else { Duration::from_millis(ms) };
        Self {
            answer_delay: delay(presentation.answer_delay_ms),
            interlude_delay: delay(presentation.interlude_delay_ms),
            bell: !presentation.muted,
        }
    }
}

pub fn run(fast: bool) -> Result<()> {
    let (config, mut engine) = super::engine_from_config()?;
    let pacing = Pacing::from_config(&config.presentation, fast);
    let stdin = io::stdin();
    let stdout = io::stdout();
    play_session(&mut engine, &mut stdin.lock(), &mut stdout.lock(), pacing)
}

fn play_session<R: BufRead, W: Write>(
    engine: &mut QuizEngine,
    input: &mut R,
    out: &mut W,
    pacing: Pacing,
) -> Result<()> {
    writeln!(
        out,
        "The portal awaits. {} questions stand between you and your archetype.",
        engine.question_count()
    )?;
    writeln!(out, "Press Enter to begin.")?;
    read_line(input)?;
    engine.start()?;

    loop {
        match engine.phase() {
            Phase::Question => {
                ask(engine, input, out, pacing)?;
                pause(pacing.answer_delay);
            }
            Phase::Milestone => {
                interlude(engine, input, out)?;
                pause(pacing.interlude_delay);
                engine.resume_from_milestone()?;
            }
            Phase::Result => return show_result(engine, out, pacing),
            Phase::Intro => return Err(CoreError::Custom("session was reset".into())),
        }
    }
}

fn ask<R: BufRead, W: Write>(
    engine: &mut QuizEngine,
    input: &mut R,
    out: &mut W,
    pacing: Pacing,
) -> Result<()> {
    let Some(question) = engine.current_question().cloned() else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(
        out,
        "[{} of {}]  Portal: {}%",
        engine.fragment_count() + 1,
        engine.question_count(),
        engine.progress_percent()
    )?;
    if !question.headline.is_empty() {
        writeln!(out, "{}", question.headline)?;
    }
    writeln!(out, "{}", question.prompt)?;
    for (i, option) in question.options.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, option.label)?;
    }

    loop {
        write!(out, "> ")?;
        out.flush()?;
        let line = read_line(input)?;
        let index = match line.parse::<usize>() {
            Ok(n) if n >= 1 => n - 1,
            _ => {
                writeln!(out, "Pick a number between 1 and {}.", question.options.len())?;
                continue;
            }
        };
        match engine.submit_option_index(index) {
            Ok(_) => {
                if pacing.bell {
                    write!(out, "\x07")?;
                }
                return Ok(());
            }
            Err(e) => writeln!(out, "{e}")?,
        }
    }
}

fn interlude<R: BufRead, W: Write>(
    engine: &QuizEngine,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let Some(milestone) = engine.pending_milestone() else {
        return Ok(());
    };

    writeln!(out)?;
    writeln!(
        out,
        "{} {}%",
        milestone.content.headline,
        engine.progress_percent()
    )?;
    for step in &milestone.content.rituals {
        writeln!(out, "  {}  [Enter]", step.instruction())?;
        read_line(input)?;
    }
    writeln!(out, "{RITUAL_COMPLETE_TEXT}")?;
    Ok(())
}

fn show_result<W: Write>(engine: &QuizEngine, out: &mut W, pacing: Pacing) -> Result<()> {
    let Some(result) = engine.result() else {
        return Err(CoreError::Custom("no result available".into()));
    };
    let archetype = &result.archetype;

    if pacing.bell {
        write!(out, "\x07")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", archetype.title)?;
    writeln!(out, "{}", archetype.prose)?;
    writeln!(out)?;
    writeln!(out, "{}", result.personal_reflection)?;
    writeln!(out, "{}", archetype.reflection)?;
    writeln!(out)?;
    writeln!(out, "Micro-rituals:")?;
    for (i, ritual) in result.micro_rituals.iter().enumerate() {
        writeln!(out, "  {}. {}", i + 1, ritual)?;
    }
    writeln!(out)?;
    if let Some(cta) = archetype.offered_call_to_action() {
        writeln!(out, "{}: {}", cta.label, cta.url)?;
    } else if !archetype.unlocked {
        writeln!(out, "The portal remains closed... yet the book whispers louder.")?;
    }
    writeln!(out, "Score: {}", result.score)?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before the quiz finished",
        )
        .into());
    }
    Ok(line.trim().to_string())
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        thread::sleep(delay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalquiz_core::{NullSink, QuizTables};

    fn quiet() -> Pacing {
        Pacing {
            answer_delay: Duration::ZERO,
            interlude_delay: Duration::ZERO,
            bell: false,
        }
    }

    fn session(script: &str) -> (Result<()>, String, QuizEngine) {
        let mut engine = QuizEngine::new(QuizTables::default()).with_sink(NullSink);
        let mut input = io::Cursor::new(script.as_bytes().to_vec());
        let mut out = Vec::new();
        let result = play_session(&mut engine, &mut input, &mut out, quiet());
        (result, String::from_utf8(out).unwrap(), engine)
    }

    // Intro, then seven answers with three interludes of three ritual steps.
    const SEEKER_SCRIPT: &str = "\n1\n2\n\n\n\n3\n2\n\n\n\n2\n1\n\n\n\n4\n";

    #[test]
    fn full_session_reaches_result() {
        let (result, output, engine) = session(SEEKER_SCRIPT);
        assert!(result.is_ok());
        assert_eq!(engine.phase(), Phase::Result);
        assert!(output.contains("The Seeker"));
        assert!(output.contains("Score: 10"));
        assert_eq!(output.matches(RITUAL_COMPLETE_TEXT).count(), 3);
        assert!(output.contains("The portal widens... 29%"));
    }

    #[test]
    fn unlocked_result_offers_the_gift() {
        let (_, output, _) = session(SEEKER_SCRIPT);
        assert!(output.contains("Receive the Gift: https://cerebralshift.gumroad.com/l/uymfree"));
        assert!(!output.contains("The portal remains closed"));
    }

    #[test]
    fn locked_result_has_no_gift() {
        let (result, output, engine) = session("\n1\n1\n\n\n\n1\n1\n\n\n\n1\n1\n\n\n\n1\n");
        assert!(result.is_ok());
        assert_eq!(engine.result().map(|r| r.score), Some(2));
        assert!(output.contains("The Asleep Mind"));
        assert!(output.contains("The portal remains closed... yet the book whispers louder."));
        assert!(!output.contains("Receive the Gift"));
    }

    #[test]
    fn invalid_choice_is_asked_again() {
        let script = SEEKER_SCRIPT.replacen("\n1\n", "\nnine\n9\n1\n", 1);
        let (result, output, engine) = session(&script);
        assert!(result.is_ok());
        assert!(output.contains("Pick a number between 1 and 4."));
        assert!(output.contains("option 8 out of range"));
        assert_eq!(engine.result().map(|r| r.score), Some(10));
    }

    #[test]
    fn closed_input_is_an_error() {
        let (result, _, engine) = session("\n1\n");
        assert!(result.is_err());
        assert_eq!(engine.fragment_count(), 1);
    }

    #[test]
    fn fast_pacing_drops_delays_but_keeps_bell() {
        let pacing = Pacing::from_config(&PresentationConfig::default(), true);
        assert!(pacing.answer_delay.is_zero());
        assert!(pacing.interlude_delay.is_zero());
        assert!(pacing.bell);

        let pacing = Pacing::from_config(&PresentationConfig::default(), false);
        assert_eq!(pacing.answer_delay, Duration::from_millis(300));
        assert_eq!(pacing.interlude_delay, Duration::from_millis(1500));
    }
}
