pub mod config;
pub mod play;
pub mod simulate;
pub mod tables;

use portalquiz_core::error::Result;
use portalquiz_core::{Config, NullSink, QuizEngine};

/// Load the config, validate its tables, and build an engine wired to the
/// configured completion sink.
pub fn engine_from_config() -> Result<(Config, QuizEngine)> {
    let config = Config::load()?;
    let engine = QuizEngine::new(config.tables()?);
    let engine = if config.logging.log_completions {
        engine
    } else {
        engine.with_sink(NullSink)
    };
    Ok((config, engine))
}
