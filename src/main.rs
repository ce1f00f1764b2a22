//! Demo driver for the delegated-execution simulator.
//!
//! Deploys a machine, a calculator, and a token into a fresh world, then
//! dispatches one call per execution mode and prints the state divergence
//! between them.
//!
//! # Usage
//! ```text
//! callsim [OPTIONS]
//! ```
//!
//! # Options
//! - `--initial <value>`: Initial storage cell value (defaults to 0)
//! - `--operands <a> <b>`: Operands passed to both call modes (defaults to 1 2)
//! - `--quiet`: Suppress info-level logging
use callsim::ledger::token::FunToken;
use callsim::runtime::cell::StorageCell;
use callsim::runtime::world::World;
use callsim::types::address::Address;
use callsim::types::hash::Hash;
use callsim::utils::log::set_quiet;
use callsim::{error, info};
use std::env;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut initial: i64 = 0;
    let mut operands: (i64, i64) = (1, 2);

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            "--initial" => {
                i += 1;
                initial = parse_int(&args, i, "--initial");
            }
            "--operands" => {
                operands = (parse_int(&args, i + 1, "--operands"), parse_int(&args, i + 2, "--operands"));
                i += 2;
            }
            "--quiet" => set_quiet(true),
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (a, b) = operands;
    let alice = account(b"alice");
    let bob = account(b"bob");

    let world = World::new();
    let calculator = world.deploy_calculator();
    let machine = world.deploy_machine(StorageCell::new(initial));

    info!("-- own-context dispatch (external call) --");
    let (sum, success) =
        machine.add_values_with_external_call(&world, alice, calculator.address(), a, b);
    info!("result: sum={} success={}", sum, success);
    info!(
        "calculator: last_result={} last_caller={}",
        calculator.last_result(),
        calculator.last_caller()
    );
    info!(
        "machine:    last_result={} last_caller={} cell={}",
        machine.last_result(),
        machine.last_caller(),
        machine.get_value()
    );

    info!("-- borrowed-context dispatch (delegated call) --");
    let (sum, success) =
        machine.add_values_with_borrowed_context(&world, alice, calculator.address(), a, b);
    info!("result: sum={} success={}", sum, success);
    info!(
        "calculator: last_result={} last_caller={}",
        calculator.last_result(),
        calculator.last_caller()
    );
    info!(
        "machine:    last_result={} last_caller={} cell={}",
        machine.last_result(),
        machine.last_caller(),
        machine.get_value()
    );

    info!("-- token ledger --");
    let token = world.deploy_token(alice);
    run_token_demo(&token, alice, bob);
}

/// Moves a few tokens around to exercise the ledger collaborator.
fn run_token_demo(token: &FunToken, alice: Address, bob: Address) {
    if let Err(err) = token.transfer(alice, bob, 1_000) {
        error!("transfer failed: {}", err);
        return;
    }
    info!(
        "{}: alice={} bob={}",
        token.symbol(),
        token.balance_of(alice),
        token.balance_of(bob)
    );
}

/// Derives a deterministic external-account address from a name.
fn account(name: &[u8]) -> Address {
    let mut h = Hash::sha3();
    h.update(b"ACCOUNT");
    h.update(name);
    Address::from_hash(h.finalize())
}

/// Reads an integer argument at `index`, exiting with usage on failure.
fn parse_int(args: &[String], index: usize, flag: &str) -> i64 {
    match args.get(index).and_then(|raw| raw.parse().ok()) {
        Some(value) => value,
        None => {
            eprintln!("{} requires an integer argument", flag);
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --initial <value>     Initial storage cell value (default 0)");
    eprintln!("  --operands <a> <b>    Operands for both call modes (default 1 2)");
    eprintln!("  --quiet               Suppress info-level logging");
}
