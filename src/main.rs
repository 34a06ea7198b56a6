// Adorns the illustrative directory program and prints the result.
// Use RUST_LOG to look inside the search, e.g.
//   RUST_LOG=adornment::adorn=debug cargo run

use adornment::adorn::Engine;
use adornment::construct::{AdornedAtom, Atom};
use adornment::demo::directory_program;
use adornment::report::Report;
use adornment::settings::{Format, Settings};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_ansi(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)))
        .init();

    if let Err(e) = run(&settings) {
        error!(error = %e, "adornment aborted");
        std::process::exit(1);
    }
}

fn run(settings: &Settings) -> adornment::Result<()> {
    let program = directory_program()?;
    let arity = settings.query_pattern.chars().count();
    let variables: Vec<String> = (0..arity).map(|i| format!("V{}", i)).collect();
    let query = AdornedAtom::new(
        Atom::new(&settings.query_predicate, &variables.join(",")),
        &settings.query_pattern,
    )?;

    let engine = Engine::new(&program);
    let mut adornment = engine.adorn(&query)?;
    if settings.deduplicate {
        if let Some(adorned) = adornment.program_mut() {
            adorned.deduplicate();
        }
    }

    match settings.format {
        Format::Json => println!("{}", Report::new(&adornment, &program).to_json()?),
        Format::Text => {
            println!("Adornment algorithm");
            println!("This is the input program: ");
            print!("{}", program);
            println!();
            match adornment.program() {
                Some(adorned) => {
                    println!("This is the final program: ");
                    print!("{}", adorned);
                }
                None => {
                    println!("Failed to adorn program.");
                    for key in adornment.failed_patterns() {
                        println!("  infeasible: {}", key);
                    }
                }
            }
        }
    }
    Ok(())
}
