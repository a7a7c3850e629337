use anyhow::Result;
use core_wfc::TileSet;
use grid_wfc::{carcassonne_tileset, terrain_tileset, xml_tileset, TerrainWeights};
use stats::{RollingStdErr, StdErr};
use std::{sync::Arc, time::Instant};

#[path = "./stats/std_err.rs"]
pub mod stats;

/// Times `f` over `iterations` runs. Runs returning false count as failures
/// and are left out of the average.
#[allow(dead_code)]
pub fn time_process<F: FnMut() -> bool>(iterations: usize, mut f: F) -> Result<StdErr<f64>> {
    let mut failures = 0;
    let mut total_time = RollingStdErr::default();
    for _ in 0..iterations {
        let now = Instant::now();
        let result = f();
        let time = now.elapsed().as_secs_f64();

        if result {
            total_time.insert(time);
        } else {
            failures += 1;
        }

        if failures as f32 / iterations as f32 >= 0.5 {
            return Err(anyhow::anyhow!(
                "Too many failures: {} out of {}",
                failures,
                iterations
            ));
        }
    }

    Ok(total_time.avg())
}

#[allow(dead_code)]
pub fn load_tilesets() -> Vec<(Arc<TileSet>, String)> {
    let mut tilesets = vec![
        (
            Arc::new(terrain_tileset::terrain_tileset(&TerrainWeights::default()).unwrap()),
            "Terrain".to_string(),
        ),
        (
            Arc::new(carcassonne_tileset::carcassonne_tileset().unwrap()),
            "Carcassonne".to_string(),
        ),
    ];

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/grid_wfc/assets/terrain.xml");
    match xml_tileset::load(path) {
        Ok(tileset) => tilesets.push((Arc::new(tileset), "TerrainXml".to_string())),
        Err(e) => println!("Skipping {path}: {e:?}"),
    }
    tilesets
}
