use anyhow::{Context, Result, ensure};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use starmap_core::{
    DistributionMode, GenerationRequest, GridSize, ReferenceTables, check_sector_invariants, generate_sector,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of random requests to generate
    #[arg(short, long, default_value_t = 500)]
    iterations: u32,
    #[arg(long, default_value_t = 24)]
    max_side: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn below(rng: &mut ChaCha8Rng, bound: u32) -> u32 {
    (rng.next_u64() % u64::from(bound.max(1))) as u32
}

fn signed(rng: &mut ChaCha8Rng, radius: i32) -> i32 {
    (rng.next_u64() % (2 * radius as u64 + 1)) as i32 - radius
}

fn random_request(rng: &mut ChaCha8Rng, max_side: u32) -> GenerationRequest {
    let seed = format!("FUZZ{:08X}", rng.next_u64() as u32);
    let grid = GridSize::new(1 + below(rng, max_side), 1 + below(rng, max_side));
    let request = match below(rng, 3) {
        0 => {
            let preset = choose(rng, &["sparse", "standard", "dense", "packed"]);
            GenerationRequest::preset(seed, grid, preset)
        }
        1 => GenerationRequest::manual(seed, grid, below(rng, grid.width * grid.height + 4)),
        _ => {
            let min = below(rng, 40);
            GenerationRequest::range(seed, grid, min, min + below(rng, 40))
        }
    };
    let distribution = choose(rng, &[DistributionMode::Uniform, DistributionMode::Clustered]);
    request.with_distribution(distribution).with_sector(signed(rng, 200), signed(rng, 200))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();
    println!("Starting sector fuzz on seed {} for {} requests...", args.seed, args.iterations);

    let tables = ReferenceTables::builtin();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for iteration in 0..args.iterations {
        let request = random_request(&mut rng, args.max_side);
        let sector = generate_sector(&request, &tables);
        debug!(iteration, seed = %request.seed, sector = %sector.sector, "checking sector");

        check_sector_invariants(&sector, &tables).with_context(|| {
            format!("Invariant failed on iteration {iteration} for request {request:?}")
        })?;

        let again = generate_sector(&request, &tables);
        ensure!(
            again.fingerprint() == sector.fingerprint(),
            "Regeneration diverged on iteration {iteration} for request {request:?}"
        );
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
