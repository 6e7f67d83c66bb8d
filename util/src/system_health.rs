//! Host performance samples broadcast on the `performance` topic and served
//! at `GET /api/performance`.

use serde::Serialize;
use std::collections::HashMap;
use sysinfo::{Disks, MINIMUM_CPU_UPDATE_INTERVAL, System};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DiskSummary {
    pub name: String,
    pub total: u64,
    pub available: u64,
    pub file_system: String,
    pub mount_point: String,
}

#[derive(Debug, Serialize, Clone, Default)]
pub struct PerformanceSample {
    pub ts: String,
    pub env: String,
    pub uptime_seconds: u64,
    pub load_one: f64,
    pub load_five: f64,
    pub load_fifteen: f64,
    pub cpu_cores: usize,
    pub cpu_avg_usage: f32,
    pub mem_total: u64,
    pub mem_used: u64,
    pub mem_pct: f32,
    pub disks: Vec<DiskSummary>,
}

/// De-duplicate disks by (name, total, fs), preferring "/" and then the
/// shortest mount point.
fn dedupe_disks(disks: Vec<DiskSummary>) -> Vec<DiskSummary> {
    fn mount_score(mp: &str) -> (u8, usize) {
        (if mp == "/" { 0 } else { 1 }, mp.len())
    }

    let mut pick: HashMap<(String, u64, String), DiskSummary> = HashMap::new();
    for d in disks {
        let key = (d.name.clone(), d.total, d.file_system.clone());
        let replace = pick
            .get(&key)
            .is_none_or(|prev| mount_score(&d.mount_point) < mount_score(&prev.mount_point));
        if replace {
            pick.insert(key, d);
        }
    }
    let mut out: Vec<DiskSummary> = pick.into_values().collect();
    out.sort_by(|a, b| a.mount_point.cmp(&b.mount_point));
    out
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 / total as f64 * 100.0) as f32
    }
}

/// Samples the host. Blocks for a short CPU measurement window, so call it
/// from `spawn_blocking` in async code.
pub fn sample_performance(env: &str) -> PerformanceSample {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    std::thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let usages: Vec<f32> = sys.cpus().iter().map(|c| c.cpu_usage()).collect();
    let cpu_avg_usage = if usages.is_empty() {
        0.0
    } else {
        usages.iter().sum::<f32>() / usages.len() as f32
    };

    let disks = Disks::new_with_refreshed_list()
        .list()
        .iter()
        .map(|d| DiskSummary {
            name: d.name().to_string_lossy().to_string(),
            total: d.total_space(),
            available: d.available_space(),
            file_system: d.file_system().to_string_lossy().to_string(),
            mount_point: d.mount_point().to_string_lossy().to_string(),
        })
        .collect();

    let load = System::load_average();
    let mem_total = sys.total_memory();
    let mem_used = sys.used_memory();

    PerformanceSample {
        ts: chrono::Utc::now().to_rfc3339(),
        env: env.to_string(),
        uptime_seconds: System::uptime(),
        load_one: load.one,
        load_five: load.five,
        load_fifteen: load.fifteen,
        cpu_cores: usages.len(),
        cpu_avg_usage,
        mem_total,
        mem_used,
        mem_pct: percent(mem_used, mem_total),
        disks: dedupe_disks(disks),
    }
}
