//! Pari-Mutuel Demo
//!
//! Drives one engine through two full rounds the way deployment tooling
//! would, logging every event as JSON.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use pari_mutuel::{
    Address, BettingEngine, EngineConfig, EngineEvent, Outcome, RecordingSink, VERSION,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Pari-Mutuel Engine v{}", VERSION);

    let config = EngineConfig::from_env();
    info!("Config: {:?}", config);

    demo_rounds(config)
}

fn addr(tag: u8) -> Address {
    Address::new([tag; 20])
}

fn log_events(events: Vec<EngineEvent>) -> anyhow::Result<()> {
    for event in events {
        info!("event {}", serde_json::to_string(&event)?);
    }
    Ok(())
}

/// Demo: one proportional round, one round nobody wins.
fn demo_rounds(config: EngineConfig) -> anyhow::Result<()> {
    let owner = addr(0x01);
    let arbiter = addr(0x02);
    let (alice, bob, carol) = (addr(0x0a), addr(0x0b), addr(0x0c));

    let team1 = Outcome::from_label("team1");
    let team2 = Outcome::from_label("team2");
    let team3 = Outcome::from_label("team3");

    info!("=== Round 0 ===");
    let mut engine = BettingEngine::initialize(owner, &[team1, team2], config)?;
    engine.appoint_arbiter(owner, arbiter)?;

    engine.place_bet(alice, team1, 1_000)?;
    engine.place_bet(bob, team1, 2_000)?;
    engine.place_bet(carol, team2, 2_000)?;
    engine.decide(arbiter, team1)?;

    for who in [alice, bob, carol] {
        info!("Credit of {}: {}", who, engine.credit_of(&who));
    }
    info!("Residual retained: {}", engine.residual());

    let mut sink = RecordingSink::new();
    engine.withdraw(alice, engine.credit_of(&alice), &mut sink)?;
    engine.withdraw(bob, 1_000, &mut sink)?;
    log_events(engine.drain_events())?;

    info!("=== Round 1 ===");
    engine.reset(owner)?;
    engine.start_round(owner, &[team1, team2, team3])?;
    engine.place_bet(alice, team1, 500)?;
    engine.place_bet(carol, team2, 700)?;
    engine.decide(arbiter, team3)?;
    info!("Nobody picked team3, arbiter credited {}", engine.credit_of(&arbiter));

    engine.withdraw(arbiter, engine.credit_of(&arbiter), &mut sink)?;
    log_events(engine.drain_events())?;

    info!("=== Ledger ===");
    info!("Custody: {}", engine.custody());
    info!(
        "Outstanding credit: {} (bob: {})",
        engine.outstanding_credit(),
        engine.credit_of(&bob)
    );
    info!("Conservation holds: {}", engine.check_conservation());
    info!("State hash: {}", hex::encode(engine.state_hash()));

    Ok(())
}
