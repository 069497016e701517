//! All-bot demo driver: runs a full game to completion in the terminal.

use anyhow::Error;
use log::info;
use pico_args::Arguments;
use speed_set::{BotTempo, ClassicRules, GameConfig, GameEngine, LogDisplay};
use std::{sync::Arc, time::Duration};

const HELP: &str = "\
Run a timed pattern-matching card game between bots

USAGE:
  speed_set [OPTIONS]

OPTIONS:
  --players    N           Number of bot seats          [default: 4]
  --round-secs SECONDS     Round duration in seconds    [default: 60]
  --tempo      TEMPO       Bot pacing: casual|quick|frenzied
                                                        [default: quick]

FLAGS:
  -h, --help               Print help information
";

struct Args {
    players: usize,
    round_secs: u64,
    tempo: BotTempo,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        players: pargs.value_from_str("--players").unwrap_or(4),
        round_secs: pargs.value_from_str("--round-secs").unwrap_or(60),
        tempo: match pargs
            .value_from_str::<_, String>("--tempo")
            .unwrap_or_else(|_| "quick".to_string())
            .as_str()
        {
            "casual" => BotTempo::Casual,
            "frenzied" => BotTempo::Frenzied,
            _ => BotTempo::Quick,
        },
    };

    env_logger::builder().format_target(false).init();

    let config = GameConfig {
        players: args.players,
        humans: 0,
        round_duration: Duration::from_secs(args.round_secs),
        bot_tempo: args.tempo,
        ..GameConfig::default()
    };
    info!(
        "starting a {}-bot game, {}s rounds, {} tempo",
        config.players, args.round_secs, config.bot_tempo
    );

    let handle = GameEngine::start(config, Arc::new(ClassicRules), Arc::new(LogDisplay))?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, terminating");
            handle.terminate();
        }
        _ = handle.finished() => {}
    }
    let winners = handle.finished().await;

    println!("final standings:");
    for player in 0..handle.config().players {
        let score = handle.score(player)?;
        let tag = if winners.contains(&player) { " (winner)" } else { "" };
        println!("  player {player}: {score}{tag}");
    }

    Ok(())
}
