//! Equation Balance entry point
//!
//! On the web the page drives `EquationGame`; natively this runs the demo
//! player over a few equations and prints each move.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    log::info!("Equation Balance (web) ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Equations the demo plays when no count is given
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_DEMO_ROUNDS: u32 = 5;

/// Safety cap on moves per equation
#[cfg(not(target_arch = "wasm32"))]
const MAX_DEMO_MOVES: usize = 64;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use equation_balance::Settings;
    use equation_balance::platform::now_ms;
    use equation_balance::sim::{GameState, next_move, play};

    env_logger::init();
    log::info!("Equation Balance (native) starting demo...");

    // Usage: equation-balance [seed] [rounds]
    let mut args = std::env::args().skip(1);
    let settings = Settings::load();
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .or(settings.seed)
        .unwrap_or_else(now_ms);
    let rounds = args
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_DEMO_ROUNDS);

    let mut state = GameState::with_settings(seed, settings);
    println!("Seed {seed}, {rounds} equations\n");

    for round in 1..=rounds {
        println!(
            "Equation {round} (difficulty {:.1}): {}",
            state.difficulty().value(),
            state.equation()
        );
        let mut moves = 0;
        while let Some(mv) = next_move(&state) {
            if moves >= MAX_DEMO_MOVES {
                log::warn!("Gave up after {} moves", moves);
                break;
            }
            play(&mut state, mv);
            moves += 1;
            println!("  {:?}\n    -> {}", mv, state.equation());
        }
        println!(
            "  solved in {moves} moves, score {} ({} solved)\n",
            state.score, state.solved_count
        );
        state.reset();
    }
}
