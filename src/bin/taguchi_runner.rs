/// CLI tool for running Taguchi Design of Experiments (DOE) studies on the PEMFC model
use pemfc_taguchi::doe::{DoeConfig, DoeRunner};
use std::env;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "generate" => generate_doe_config(&args[2..]),
        "list" => list_runs(&args[2..]),
        "run" => run_study(&args[2..]),
        "factorial" => run_full_factorial(&args[2..]),
        _ => {
            println!("Unknown command: {}", command);
            print_usage();
        }
    }
}

fn print_usage() {
    println!("\nPEMFC Taguchi Runner - Design of Experiments Tool\n");
    println!("Usage: cargo run --release --bin taguchi_runner <command> [options]\n");
    println!("Commands:");
    println!("  generate    Write the canonical four-factor study configuration");
    println!("  list        List the orthogonal array runs of a study");
    println!("  run         Evaluate every run, rank factor levels and export the results");
    println!("  factorial   Evaluate every factor combination and export the tables\n");
    println!("Examples:");
    println!("  cargo run --release --bin taguchi_runner generate pemfc_study.toml");
    println!("  cargo run --release --bin taguchi_runner list pemfc_study.toml");
    println!("  cargo run --release --bin taguchi_runner run pemfc_study.toml [output_dir]");
    println!("  cargo run --release --bin taguchi_runner factorial pemfc_study.toml [output_dir]\n");
    println!("Set RUST_LOG=debug for per-step logging.\n");
}

fn generate_doe_config(args: &[String]) {
    if args.is_empty() {
        println!("Error: please specify output file name");
        println!("Usage: cargo run --bin taguchi_runner generate <output_file.toml>");
        return;
    }

    let output_file = &args[0];
    let config = DoeConfig::canonical();

    match config.to_file(output_file) {
        Ok(_) => {
            println!("DOE configuration generated: {}", output_file);
            println!("  Factors: {}", config.factors.len());
            println!("  Runs: {} (seed {})\n", config.array_size, config.seed);
        }
        Err(e) => {
            println!("Error generating config: {}", e);
        }
    }
}

fn list_runs(args: &[String]) {
    if args.is_empty() {
        println!("Error: please specify DOE configuration file");
        println!("Usage: cargo run --bin taguchi_runner list <config_file.toml>");
        return;
    }

    match DoeConfig::from_file(&args[0]) {
        Ok(config) => {
            let runner = DoeRunner::new(config, "doe_results");
            if let Err(e) = runner.list_runs() {
                println!("Error designing study: {}", e);
            }
        }
        Err(e) => {
            println!("Error loading config: {}", e);
        }
    }
}

fn run_study(args: &[String]) {
    if args.is_empty() {
        println!("Error: please specify DOE configuration file");
        println!("Usage: cargo run --bin taguchi_runner run <config_file.toml> [output_dir]");
        return;
    }

    let config = match DoeConfig::from_file(&args[0]) {
        Ok(config) => config,
        Err(e) => {
            println!("Error loading config: {}", e);
            return;
        }
    };

    let output_dir = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| format!("doe_results/{}", config.file_stem()));
    let runner = DoeRunner::new(config, output_dir);

    let report = match runner.run() {
        Ok(report) => report,
        Err(e) => {
            println!("Error running DOE: {}\n", e);
            return;
        }
    };

    println!("\nOptimal levels ({:?}):", runner.config().convention);
    for (factor, best) in &report.optimal_levels {
        println!(
            "  {:<24} level {} = {}  (mean S/N {:.3} dB)",
            factor, best.level, best.value, best.mean_snr
        );
    }

    match runner.export(&report) {
        Ok(paths) => {
            println!("\nDOE study '{}' completed successfully!", report.study_name);
            for path in paths {
                println!("  {}", path.display());
            }
            println!();
        }
        Err(e) => println!("Error exporting results: {}\n", e),
    }
}

fn run_full_factorial(args: &[String]) {
    if args.is_empty() {
        println!("Error: please specify DOE configuration file");
        println!("Usage: cargo run --bin taguchi_runner factorial <config_file.toml> [output_dir]");
        return;
    }

    let config = match DoeConfig::from_file(&args[0]) {
        Ok(config) => config,
        Err(e) => {
            println!("Error loading config: {}", e);
            return;
        }
    };

    let output_dir = args
        .get(1)
        .cloned()
        .unwrap_or_else(|| format!("doe_results/{}", config.file_stem()));
    let runner = DoeRunner::new(config, output_dir);

    let array = match runner.run_full_factorial() {
        Ok(array) => array,
        Err(e) => {
            println!("Error evaluating factorial space: {}\n", e);
            return;
        }
    };
    println!("\nEvaluated {} factor combinations", array.len());

    match runner.export_full_factorial(&array) {
        Ok(paths) => {
            for path in paths {
                println!("  {}", path.display());
            }
            println!();
        }
        Err(e) => println!("Error exporting results: {}\n", e),
    }
}
