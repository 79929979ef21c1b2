use portalquiz_core::error::Result;
use portalquiz_core::{Config, QuizTables};

fn load_tables() -> Result<QuizTables> {
    Ok(Config::load()?.tables()?)
}

pub fn questions() -> Result<()> {
    let tables = load_tables()?;
    println!("{}", serde_json::to_string_pretty(&tables.bank)?);
    Ok(())
}

pub fn archetypes() -> Result<()> {
    let tables = load_tables()?;
    println!("{}", serde_json::to_string_pretty(&tables.archetypes)?);
    Ok(())
}

pub fn milestones() -> Result<()> {
    let tables = load_tables()?;
    println!("{}", serde_json::to_string_pretty(&tables.milestones)?);
    Ok(())
}

pub fn validate() -> Result<()> {
    let tables = load_tables()?;
    println!(
        "ok: {} questions (max score {}), {} archetypes, {} milestones",
        tables.bank.len(),
        tables.bank.max_score(),
        tables.archetypes.len(),
        tables.milestones.len()
    );
    Ok(())
}
