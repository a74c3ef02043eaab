//! Reachability on an n-bit binary counter with an enable input.
//!
//! ```bash
//! cargo run --example counter -- --bits 4
//! ```

use clap::Parser;

use vds_bdd::reachability::Reachability;
use vds_bdd::reference::BddId;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Number of state bits.
    #[clap(long, value_name = "INT", default_value = "3")]
    bits: usize,

    /// Wrap around at this value instead of `2^bits`.
    #[clap(long, value_name = "INT")]
    modulo: Option<u64>,

    /// Log level.
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let n = args.bits;
    let mut fsm = Reachability::new(n, 1)?;
    let s = fsm.states().to_vec();
    let enable = fsm.inputs()[0];
    let bdd = fsm.manager();

    // Ripple-carry increment, gated by the enable input.
    let mut carry = enable;
    let mut next = Vec::with_capacity(n);
    for &bit in s.iter() {
        next.push(bdd.xor2(bit, carry));
        carry = bdd.and2(carry, bit);
    }

    // Synchronous reset once the counter reaches `modulo - 1`.
    if let Some(modulo) = args.modulo {
        let last = modulo.saturating_sub(1);
        let at_last = bdd.and_many(
            s.iter()
                .enumerate()
                .map(|(k, &bit)| bdd.xnor2(bit, BddId::from(last.checked_shr(k as u32).unwrap_or(0) & 1 == 1))),
        );
        let wrap = bdd.and2(enable, at_last);
        next = next.iter().map(|&f| bdd.and2(f, bdd.neg(wrap))).collect();
    }

    fsm.set_transition_functions(&next)?;

    let count = fsm.reachable_state_count();
    println!("Reachable states: {}", count);

    let limit = 1u64 << n.min(6);
    for value in 0..limit {
        let state: Vec<bool> = (0..n).map(|k| value >> k & 1 == 1).collect();
        match fsm.state_distance(&state)? {
            Some(d) => println!("  {:0width$b}: distance {}", value, d, width = n),
            None => println!("  {:0width$b}: unreachable", value, width = n),
        }
    }

    Ok(())
}
