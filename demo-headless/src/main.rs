use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;
use volcano_sim_core::{
    reclassify_outside_extent, AmbientFallback, AtmosphereModel, AtmosphereSample, EjectaCloud,
    ElevationGrid, EruptionConfig, GeoTransform, Material, Particle, PopulationSummary,
    TerrainSampler, Vec3,
};

/// Volcanic eruption simulation without rendering
#[derive(Parser, Debug)]
#[command(name = "volcano-sim-headless")]
#[command(about = "Ballistic ejecta simulation over a synthetic volcano", long_about = None)]
struct Args {
    /// Particles released over the episode (default: random 5000-6999)
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// Largest batch released per tick
    #[arg(long, default_value_t = 30)]
    max_per_tick: usize,

    /// Integration step in seconds
    #[arg(long, default_value_t = 0.05)]
    dt: f64,

    /// Atmosphere turbulence intensity in m/s
    #[arg(short, long, default_value_t = 0.1)]
    turbulence: f64,

    /// Release height above the summit in metres
    #[arg(long, default_value_t = 500.0)]
    vent_height: f64,

    /// DEM size in pixels (square)
    #[arg(long, default_value_t = 201)]
    grid_size: usize,

    /// DEM pixel size in metres
    #[arg(long, default_value_t = 30.0)]
    pixel_size: f64,

    /// Summit height above the surrounding plain in metres
    #[arg(long, default_value_t = 1800.0)]
    relief: f32,

    /// Ignore the sounding and drive particles with the surface snapshot only
    #[arg(long)]
    fallback_only: bool,

    /// Stop after this many ticks
    #[arg(long, default_value_t = 20_000)]
    max_steps: usize,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 50)]
    report_interval: usize,

    /// RNG seed (default: random)
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() -> volcano_sim_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    let config = EruptionConfig {
        vent_height: args.vent_height,
        dt: args.dt,
        total_particles: args
            .particles
            .unwrap_or_else(|| rng.random_range(5000..7000)),
        max_per_tick: args.max_per_tick,
        turbulence: args.turbulence,
        max_steps: args.max_steps,
        ..EruptionConfig::default()
    };
    config.validate()?;

    println!("=== Volcanic Eruption Simulation ===\n");

    // Synthetic stratovolcano on a north-up UTM-like grid
    let n = args.grid_size.max(2);
    let terrain = TerrainSampler::from_grid(
        ElevationGrid::gaussian_hill(n, n, 200.0, args.relief, n as f32 / 6.0),
        GeoTransform::north_up(440_000.0, 4_520_000.0, args.pixel_size),
        Some(-9999.0),
    )?;
    let Some(extent) = terrain.extent() else {
        return Err(volcano_sim_core::SimError::TerrainNotLoaded);
    };
    let (min_h, max_h) = terrain.height_range();
    println!(
        "Terrain: {}x{} px at {:.0} m, elevation {:.0}-{:.0} m",
        terrain.width(),
        terrain.height(),
        args.pixel_size,
        min_h,
        max_h
    );

    let (crater_x, crater_y) = extent.center();
    let crater_z = terrain.elevation_at(crater_x, crater_y) + config.vent_height;
    let crater = Vec3::new(crater_x, crater_y, crater_z);

    let mut atmosphere = AtmosphereModel::new(config.turbulence);
    atmosphere.load_profile(AtmosphereSample::standard_column(21, 500.0))?;
    let surface = *atmosphere.update_for_altitude(crater_z);

    println!("Initial conditions at the crater ({:.0} m):", crater_z);
    println!("  Temperature: {}", surface.temperature);
    println!("  Wind U: {:.2} m/s", surface.wind_u);
    println!("  Wind V: {:.2} m/s", surface.wind_v);
    println!("  Pressure: {}", surface.pressure);
    println!("  Humidity: {}", surface.humidity);
    println!("  Air density: {:.3} kg/m³", surface.air_density());
    println!("Particles to release: {} (seed {})\n", config.total_particles, seed);

    let mut cloud = EjectaCloud::new();
    let mut grounded: Vec<Particle> = Vec::new();
    let mut escaped: Vec<Particle> = Vec::new();
    let mut released = 0usize;
    let mut step = 0usize;

    println!(" Tick | Released | Airborne | Grounded | Escaped | Mean alt (m) | Wind (m/s)");
    println!("------|----------|----------|----------|---------|--------------|-------------");

    while step < config.max_steps {
        let active = released < config.total_particles;
        if active {
            let batch = rng
                .random_range(1..=config.max_per_tick)
                .min(config.total_particles - released);
            let material = Material::from_index(rng.random_range(0..Material::COUNT))?;
            let vent = config.vent.clone().at(crater).with_material(material);
            released += cloud.generate_with_rng(batch, &vent, &mut rng)?;
        } else if cloud.is_empty() {
            break;
        }

        let fallback = AmbientFallback::from_atmosphere(&atmosphere);
        let sounding = (!args.fallback_only).then_some(&atmosphere);
        cloud.advance(
            config.dt,
            sounding,
            &fallback,
            &mut grounded,
            &mut escaped,
            &terrain,
        );
        reclassify_outside_extent(&mut grounded, &mut escaped, &extent);

        let summary = PopulationSummary::from_particles(cloud.particles());
        if let Some(mean) = summary.mean_altitude() {
            atmosphere.update_for_altitude(mean);
        }

        if step % args.report_interval.max(1) == 0 {
            println!(
                "{:5} | {:8} | {:8} | {:8} | {:7} | {:12.1} | ({:.2}, {:.2})",
                step,
                released,
                cloud.len(),
                grounded.len(),
                escaped.len(),
                summary.mean_altitude().unwrap_or(f64::NAN),
                fallback.wind_u,
                fallback.wind_v
            );
        }
        step += 1;
    }

    info!(
        "Stopped after {} ticks ({:.1} s simulated)",
        step,
        step as f64 * config.dt
    );

    println!("\n=== Simulation Complete ===");
    println!("Particles released: {}", released);
    println!("Landed on the ground: {}", grounded.len());
    println!("Left the atmosphere or the map: {}", escaped.len());
    println!("Still airborne: {}", cloud.len());

    let landed = PopulationSummary::from_particles(&grounded);
    println!("\nLanded by material:");
    for material in Material::ALL {
        let count = landed.count_of(material);
        if count > 0 {
            println!("  {:<15} {:6}", material.name(), count);
        }
    }

    Ok(())
}
