//! HeavyMatrix CLI — generate and inspect HeavyHash matrices
//!
//! Commands:
//!   heavymatrix generate <seed-hex> [--json]  — generate (through the cache)
//!   heavymatrix derive   <parent-hash-hex>    — SHA3-256 seed derivation, then generate
//!   heavymatrix rank     <seed-hex>           — elimination rank vs SVD rank
//!   heavymatrix check    <matrix.json>        — validate a stored matrix
//!   heavymatrix cache    [stats|clear]        — inspect the on-disk cache
//!   heavymatrix default                       — default matrix fingerprint

use heavymatrix_core::config::{CONFIG_ENV, DEFAULT_CACHE_FILE};
use heavymatrix_core::matrix::{
    is_four_bit_precision, is_full_rank, svd_rank, MATRIX_DIM, SVD_EPSILON,
};
use heavymatrix_core::{
    default_matrix, matrix_rank, HeavyMatrix, HeavyMatrixConfig, MatrixCache, MatrixGenerator,
    MatrixSeed, Result,
};
use std::env;
use std::process::ExitCode;

fn print_usage() {
    println!(
        r#"
HeavyMatrix — full-rank 64x64 nibble matrices for HeavyHash

Usage: heavymatrix <command> [options]

Commands:
  generate <seed-hex> [--json]   Generate the matrix for a 32-byte seed
  derive   <parent-hash-hex>     Seed = SHA3-256(parent hash), then generate
  rank     <seed-hex>            Print elimination and SVD rank of the first candidate
  check    <matrix.json>         Validate 4-bit precision and full rank of a stored matrix
  cache    [stats|clear]         Inspect or clear the matrix cache
  default                        Print the default matrix fingerprint

Configuration is read from the JSON file named by ${}.
Matrices are cached in ./{} unless the config sets cache.path.
"#,
        CONFIG_ENV, DEFAULT_CACHE_FILE
    );
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let config = match HeavyMatrixConfig::from_env() {
        Ok(config) => config.with_default_cache_file(),
        Err(e) => {
            eprintln!("  Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args[1].as_str() {
        "generate" => cmd_generate(&args[2..], &config),
        "derive" => cmd_derive(&args[2..], &config),
        "rank" => cmd_rank(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "cache" => cmd_cache(&args[2..], &config),
        "default" => cmd_default(),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("  Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_matrix(matrix: &HeavyMatrix, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(matrix)?);
    } else {
        print!("{}", matrix);
        println!("  fingerprint: {}", matrix.fingerprint());
    }
    Ok(())
}

fn generate_cached(seed: &MatrixSeed, config: &HeavyMatrixConfig) -> Result<HeavyMatrix> {
    let mut cache = MatrixCache::open(&config.cache);
    let matrix = cache.get_or_generate(seed, &config.generator)?;
    cache.save()?;
    Ok(matrix)
}

fn cmd_generate(args: &[String], config: &HeavyMatrixConfig) -> Result<()> {
    let Some(seed_hex) = args.first() else {
        eprintln!("Usage: heavymatrix generate <seed-hex> [--json]");
        return Ok(());
    };
    let json = args.iter().any(|a| a == "--json");
    let seed = MatrixSeed::from_hex(seed_hex)?;
    let matrix = generate_cached(&seed, config)?;
    print_matrix(&matrix, json)
}

fn cmd_derive(args: &[String], config: &HeavyMatrixConfig) -> Result<()> {
    let Some(parent_hex) = args.first() else {
        eprintln!("Usage: heavymatrix derive <parent-hash-hex> [--json]");
        return Ok(());
    };
    let json = args.iter().any(|a| a == "--json");
    let parent = MatrixSeed::from_hex(parent_hex)?;
    let seed = MatrixSeed::from_parent_hash(parent.as_bytes());
    if !json {
        println!("  seed: {}", seed);
    }
    let matrix = generate_cached(&seed, config)?;
    print_matrix(&matrix, json)
}

fn cmd_rank(args: &[String]) -> Result<()> {
    let Some(seed_hex) = args.first() else {
        eprintln!("Usage: heavymatrix rank <seed-hex>");
        return Ok(());
    };
    let seed = MatrixSeed::from_hex(seed_hex)?;
    let candidate = MatrixGenerator::new(seed.as_bytes())?.next_candidate();
    let check = candidate.to_check_matrix();
    println!("  elimination rank: {}", matrix_rank(check.clone()));
    println!("  svd rank:         {}", svd_rank(&check, SVD_EPSILON));
    Ok(())
}

fn cmd_check(args: &[String]) -> Result<()> {
    let Some(path) = args.first() else {
        eprintln!("Usage: heavymatrix check <matrix.json>");
        return Ok(());
    };
    let json = std::fs::read_to_string(path)?;
    let matrix: HeavyMatrix = serde_json::from_str(&json)?;
    let four_bit = is_four_bit_precision(&matrix);
    let full_rank = is_full_rank(&matrix);
    println!("  4-bit precision: {}", four_bit);
    println!("  full rank ({}):  {}", MATRIX_DIM, full_rank);
    println!("  fingerprint:     {}", matrix.fingerprint());
    Ok(())
}

fn cmd_cache(args: &[String], config: &HeavyMatrixConfig) -> Result<()> {
    let mut cache = MatrixCache::open(&config.cache);
    match args.first().map(String::as_str).unwrap_or("stats") {
        "stats" => {
            println!("  {}", cache.summary());
            for seed in cache.seeds() {
                println!("  {}", seed);
            }
        }
        "clear" => {
            let count = cache.len();
            cache.clear();
            cache.save()?;
            println!("  Cleared {} cached matrices", count);
        }
        other => eprintln!("  Unknown cache command: {}", other),
    }
    Ok(())
}

fn cmd_default() -> Result<()> {
    let matrix = default_matrix();
    println!("  seed:        {}", MatrixSeed::DEFAULT);
    println!("  fingerprint: {}", matrix.fingerprint());
    Ok(())
}
