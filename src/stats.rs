use serde::Serialize;
use std::path::Path;

use crate::domain::clock::TickResult;
use crate::error::Result;

/// One CSV row per tick.
///
/// Maps are flattened to stable, human-readable strings so runs can be
/// diffed; absent values are written as `NA`.
#[derive(Debug, Serialize)]
struct TickRow {
    step: u64,
    reward: f64,
    success: String,
    node_mapping: String,
    link_paths: String,
    expires_at: String,
}

impl TickRow {
    fn from_result(result: &TickResult) -> Self {
        Self {
            step: result.step,
            reward: result.reward,
            success: match result.success {
                Some(true) => "true".to_string(),
                Some(false) => "false".to_string(),
                None => "NA".to_string(),
            },
            node_mapping: result.node_mapping.as_ref().map_or_else(|| "NA".to_string(), format_node_mapping),
            link_paths: result.link_paths.as_ref().map_or_else(|| "NA".to_string(), format_link_paths),
            expires_at: result.expires_at.map_or_else(|| "NA".to_string(), |t| t.to_string()),
        }
    }
}

fn format_node_mapping(node_map: &bimap::BiHashMap<usize, usize>) -> String {
    let mut entries: Vec<(usize, usize)> = node_map.iter().map(|(&vnode, &snode)| (vnode, snode)).collect();
    entries.sort_unstable();

    entries.iter().map(|(vnode, snode)| format!("{}->{}", vnode, snode)).collect::<Vec<_>>().join(" ")
}

fn format_link_paths(path_map: &crate::domain::mapping::PathMap) -> String {
    let mut entries: Vec<(&(usize, usize), &Vec<usize>)> = path_map.iter().collect();
    entries.sort_unstable_by_key(|(edge, _)| **edge);

    entries
        .iter()
        .map(|((u, v), path)| {
            let hops = path.iter().map(|node| node.to_string()).collect::<Vec<_>>().join("-");
            format!("({},{}):{}", u, v, hops)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Persists per-tick records of one experiment run.
///
/// The simulation is single-threaded, so a plain synchronous writer is
/// enough; `flush` should be called once at the end of the run.
pub struct RunRecorder {
    writer: csv::Writer<std::fs::File>,
}

impl RunRecorder {
    pub fn to_file(path: impl AsRef<Path>) -> Result<Self> {
        let writer = csv::Writer::from_path(path)?;
        Ok(Self { writer })
    }

    pub fn record(&mut self, result: &TickResult) -> Result<()> {
        self.writer.serialize(TickRow::from_result(result))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
