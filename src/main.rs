//! Sparse Life CLI - Run simulations from JSON configuration.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use sparse_life::{
    engine::{NullRenderer, Simulation},
    schema::SimulationConfig,
};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [generations]", args[0]);
        eprintln!();
        eprintln!("Run a sparse Game of Life simulation from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  generations  Number of generations to run (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let generations: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: SimulationConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    println!("Sparse Life Simulation");
    println!("======================");
    println!("Board: {}x{} (toroidal)", config.cols, config.rows);
    println!("Generations: {}", generations);
    println!();

    let mut renderer = NullRenderer;
    let mut sim = Simulation::new_game(config, &mut renderer).unwrap_or_else(|e| {
        eprintln!("Error creating simulation: {}", e);
        std::process::exit(1);
    });

    let initial = sim.stats();
    println!("Initial state:");
    println!("  Alive cells: {}", initial.alive_cells);
    println!("  Tracked cells: {}", initial.tracked_cells);
    println!();

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..generations {
        sim.run(1, &mut renderer);

        // Print progress every 10%
        if (i + 1) % (generations / 10).max(1) == 0 {
            let stats = sim.stats();
            let elapsed = start.elapsed().as_secs_f32();
            let gens_per_sec = (i + 1) as f32 / elapsed;
            println!(
                "  Generation {}/{}: alive={}, tracked={}, {:.1} gens/s",
                i + 1,
                generations,
                stats.alive_cells,
                stats.tracked_cells,
                gens_per_sec
            );
        }
    }

    let elapsed = start.elapsed();
    let final_stats = sim.stats();

    println!();
    println!("Final state:");
    println!("  Generation: {}", final_stats.generation);
    println!("  Alive cells: {}", final_stats.alive_cells);
    println!("  Tracked cells: {}", final_stats.tracked_cells);
    println!();
    println!(
        "Time: {:.2}s ({:.1} gens/s)",
        elapsed.as_secs_f32(),
        generations as f32 / elapsed.as_secs_f32()
    );
}

fn print_example_config() {
    let config = SimulationConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
