//! Whole-population bookkeeping across many steps
//!
//! Run with `RUST_LOG=debug` to see per-step counts.

use rand::rngs::StdRng;
use rand::SeedableRng;
use volcano_sim_core::{
    AmbientFallback, AtmosphereModel, EjectaCloud, ElevationGrid, FlatGround, GeoTransform,
    Material, TerrainSampler, Vec3, VentConfig, ESCAPE_CEILING,
};

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn still_air() -> AmbientFallback {
    AmbientFallback {
        air_density: 1.225,
        wind_u: 0.0,
        wind_v: 0.0,
        updraft: 0.0,
        turbulence: 0.0,
    }
}

#[test]
fn test_all_particles_land_on_flat_ground() {
    let mut cloud = EjectaCloud::new();
    let vent = VentConfig::default().at(Vec3::new(0.0, 0.0, 1000.0));
    let mut rng = StdRng::seed_from_u64(2024);
    cloud.generate_with_rng(100, &vent, &mut rng).unwrap();

    let ground = FlatGround(0.0);
    let (mut grounded, mut escaped) = (Vec::new(), Vec::new());

    let mut steps = 0;
    while !cloud.is_empty() && steps < 100_000 {
        cloud.advance(0.05, None, &still_air(), &mut grounded, &mut escaped, &ground);
        steps += 1;
        assert_eq!(cloud.len() + grounded.len() + escaped.len(), 100);
    }

    assert!(cloud.is_empty(), "still airborne after {steps} steps");
    assert_eq!(grounded.len(), 100);
    assert!(escaped.is_empty());
    assert!(grounded.iter().all(|p| p.altitude() <= 0.0));
}

#[test]
fn test_conservation_with_turbulent_atmosphere() {
    let atmosphere = AtmosphereModel::new(0.5);
    let mut cloud = EjectaCloud::new();
    let (mut grounded, mut escaped) = (Vec::new(), Vec::new());
    let ground = FlatGround(200.0);
    let mut generated = 0;

    for (i, material) in Material::ALL.iter().enumerate() {
        let vent = VentConfig::default()
            .at(Vec3::new(0.0, 0.0, 700.0))
            .with_material(*material);
        generated += cloud.generate(10 + i, &vent).unwrap();

        for _ in 0..50 {
            let report = cloud.advance(
                0.05,
                Some(&atmosphere),
                &still_air(),
                &mut grounded,
                &mut escaped,
                &ground,
            );
            assert_eq!(report.airborne, cloud.len());
            assert_eq!(cloud.len() + grounded.len() + escaped.len(), generated);
        }
    }

    assert!(cloud
        .particles()
        .iter()
        .all(|p| p.altitude() > 200.0 && p.altitude() < ESCAPE_CEILING));
}

#[test]
fn test_particles_off_the_raster_never_land() {
    // 10x10 raster of 10 m pixels around the origin; the vent sits far outside it
    let terrain = TerrainSampler::from_grid(
        ElevationGrid::flat(10, 10, 0.0),
        GeoTransform::north_up(0.0, 100.0, 10.0),
        None,
    )
    .unwrap();

    let mut cloud = EjectaCloud::new();
    let vent = VentConfig {
        radius: 0.0,
        ..VentConfig::default()
    }
    .at(Vec3::new(50_000.0, 50_000.0, 100.0));
    cloud.generate(5, &vent).unwrap();

    let (mut grounded, mut escaped) = (Vec::new(), Vec::new());
    for _ in 0..2000 {
        cloud.advance(0.05, None, &still_air(), &mut grounded, &mut escaped, &terrain);
    }

    assert!(grounded.is_empty());
    assert_eq!(cloud.len() + escaped.len(), 5);
    assert!(cloud.particles().iter().all(|p| p.altitude() < 0.0));
}
