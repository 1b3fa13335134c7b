//! Generates a match transcript as JSON, one `[player, opponent]` input pair per tick.
//!
//! Usage:
//!   cargo run -p brawler-core --example gen-transcript -- [idle|rush] > transcript.json

use brawler_core::*;

fn main() {
    let mode = std::env::args().nth(1).unwrap_or_else(|| "idle".to_string());

    let mut m = Match::new(default_config(42));
    let max_ticks = 99 * TICK_RATE;

    for tick in 0..max_ticks {
        let input = match mode.as_str() {
            "idle" => NULL_INPUT,
            // Walk in, then alternate light and heavy attacks
            "rush" => {
                let buttons = match tick % 40 {
                    0 => button::LIGHT,
                    20 => button::HEAVY,
                    _ if m.player().x + FIGHTER_WIDTH < m.opponent().x - 10.0 => button::RIGHT,
                    _ => 0,
                };
                PlayerInput::new(buttons)
            }
            other => {
                eprintln!("Unknown mode: {other}. Use idle or rush.");
                std::process::exit(1);
            }
        };
        if m.step(input).outcome.is_over() {
            break;
        }
    }

    eprintln!("{:?} after {} ticks", m.outcome(), m.tick());
    let transcript: Vec<[u8; 2]> = m
        .transcript()
        .iter()
        .map(|[p, o]| [p.buttons, o.buttons])
        .collect();
    println!("{}", serde_json::to_string(&transcript).unwrap());
}
