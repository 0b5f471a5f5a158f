use anyhow::{bail, Result};

/// The pipeline's units of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extract,
    Load,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Extract => "extract",
            Stage::Load => "load",
        }
    }
}

const STAGES: &[Stage] = &[Stage::Extract, Stage::Load];

/// before -> after pairs. Staging is the only hand-off between stages,
/// so the graph is a single edge.
const EDGES: &[(Stage, Stage)] = &[(Stage::Extract, Stage::Load)];

/// Dependency-respecting execution order over STAGES and EDGES. The
/// graph is tiny, but keeping the sort explicit means a new stage only
/// needs an entry in each table.
pub fn execution_order() -> Result<Vec<Stage>> {
    let mut order = Vec::with_capacity(STAGES.len());
    let mut remaining: Vec<Stage> = STAGES.to_vec();

    while !remaining.is_empty() {
        let ready = remaining.iter().position(|s| {
            EDGES
                .iter()
                .all(|(before, after)| after != s || !remaining.contains(before))
        });
        match ready {
            Some(i) => order.push(remaining.remove(i)),
            None => bail!("Stage dependency cycle"),
        }
    }
    Ok(order)
}
