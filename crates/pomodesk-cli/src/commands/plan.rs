use pomodesk_core::timer::display::{config_summary, format_countdown, session_label};
use pomodesk_core::timer::MAX_PLAN_ROUNDS;
use pomodesk_core::{Config, SessionConfig, SessionPlan};

pub fn run(rounds: u32, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !(1..=MAX_PLAN_ROUNDS).contains(&rounds) {
        return Err(
            format!("--rounds must be between 1 and {MAX_PLAN_ROUNDS}, got {rounds}").into(),
        );
    }
    let config = Config::load_or_default();
    let plan = SessionPlan::build(
        SessionConfig::for_rounds(rounds),
        config.timer.ended_display_secs,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("{}", config_summary(&plan.config));
    for (i, session) in plan.sessions.iter().enumerate() {
        println!(
            "{:>3}. {:<16} {}",
            i + 1,
            session_label(session.kind, session.round),
            format_countdown(session.duration_secs)
        );
    }
    println!("Total: {} min", plan.working_secs() / 60);
    Ok(())
}
