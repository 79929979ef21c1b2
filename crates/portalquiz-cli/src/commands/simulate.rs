use portalquiz_core::error::Result;
use portalquiz_core::{CoreError, Phase};

/// Answer each question with the given option index, resuming every
/// interlude right away.
pub fn run(answers: &[usize], summary: bool) -> Result<()> {
    let (_, mut engine) = super::engine_from_config()?;

    let mut events = engine.start()?;
    for index in answers {
        events.extend(engine.submit_option_index(*index)?);
        while engine.phase() == Phase::Milestone {
            events.extend(engine.resume_from_milestone()?);
        }
    }

    let Some(result) = engine.result() else {
        return Err(CoreError::Custom(format!(
            "quiz incomplete: answered {} of {} questions",
            engine.fragment_count(),
            engine.question_count()
        )));
    };

    if summary {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&events)?);
    }
    Ok(())
}
