use anyhow::Result;
use core_wfc::{
    wfc_backend::Backend, wfc_task::WfcSettings, TileSet, WfcTask,
};
use std::sync::Arc;
use tracing::{error, info};

/// Runs one task per seed on `backend` and returns the finished tasks in seed
/// order, each paired with its result.
pub fn generate_batch(
    tileset: Arc<TileSet>,
    size: usize,
    settings: &WfcSettings,
    seeds: &[u64],
    backend: &mut dyn Backend,
) -> Result<Vec<(WfcTask, Result<()>)>> {
    for &seed in seeds {
        let settings = WfcSettings {
            seed: Some(seed),
            ..settings.clone()
        };
        let task = WfcTask::new(size, tileset.clone(), settings)?;
        backend.queue_task(task)?;
    }

    let mut outputs = Vec::with_capacity(seeds.len());
    for _ in seeds {
        let (task, result) = backend.wait_for_output()?;
        if let Err(e) = &result {
            error!("Error: {:?}", e);
        }
        outputs.push((task, result));
    }
    outputs.sort_by_key(|(task, _)| {
        seeds
            .iter()
            .position(|&seed| seed == task.seed)
            .unwrap_or(usize::MAX)
    });

    let failed = outputs.iter().filter(|(_, result)| result.is_err()).count();
    info!("Generated {} grids, {} failed", outputs.len(), failed);
    Ok(outputs)
}
