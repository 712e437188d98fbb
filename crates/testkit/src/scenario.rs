//! Step-by-step layout scenarios checked against a golden report.
//!
//! A scenario starts from a tree, applies a list of mutations and rebinds
//! after each one. Every pass is captured as a [`ScenarioFrame`]; the full
//! report is compared with [`assert_json_snapshot`].

use crate::snapshot::assert_json_snapshot;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;
use surviveler_ui::{ItemTree, LayoutSnapshot};
use tracing::debug;

/// Configuration for a layout scenario.
#[derive(Debug, Clone)]
pub struct LayoutScenarioConfig {
    /// Name written into the report.
    pub name: String,
    /// Path to the golden JSON file.
    pub snapshot_path: PathBuf,
}

/// A named mutation applied between binds.
pub struct ScenarioStep {
    label: String,
    apply: Box<dyn FnOnce(&mut ItemTree) -> surviveler_ui::Result<()>>,
}

impl ScenarioStep {
    /// Wrap a mutation.
    pub fn new<F>(label: impl Into<String>, apply: F) -> Self
    where
        F: FnOnce(&mut ItemTree) -> surviveler_ui::Result<()> + 'static,
    {
        Self {
            label: label.into(),
            apply: Box::new(apply),
        }
    }
}

/// Outcome of one bind pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioFrame {
    /// Label of the step that preceded the bind (`initial` for the first).
    pub step: String,
    /// Error text if the mutation or the bind failed.
    pub error: Option<String>,
    /// Geometry after the pass.
    pub layout: LayoutSnapshot,
}

/// Serialized scenario report.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    /// Scenario name.
    pub name: String,
    /// One frame for the initial bind plus one per step.
    pub frames: Vec<ScenarioFrame>,
}

/// Bind `tree`, then apply each step and rebind, collecting a frame per pass.
///
/// Failures are recorded in the frame rather than aborting, so a golden file
/// can pin down error cases as well as geometry.
pub fn record_layout_scenario(
    name: impl Into<String>,
    mut tree: ItemTree,
    steps: Vec<ScenarioStep>,
) -> ScenarioReport {
    let mut frames = Vec::with_capacity(steps.len() + 1);
    frames.push(frame("initial", tree.bind(), &tree));

    for step in steps {
        let outcome = (step.apply)(&mut tree).and_then(|()| tree.bind());
        debug!(step = %step.label, ok = outcome.is_ok(), "scenario step");
        frames.push(frame(step.label, outcome, &tree));
    }

    ScenarioReport {
        name: name.into(),
        frames,
    }
}

/// Run a scenario and assert (or update) the snapshot at `config.snapshot_path`.
pub fn run_layout_scenario(
    config: LayoutScenarioConfig,
    tree: ItemTree,
    steps: Vec<ScenarioStep>,
) -> Result<()> {
    let report = record_layout_scenario(config.name, tree, steps);
    assert_json_snapshot(config.snapshot_path, &report)
}

fn frame(step: impl Into<String>, outcome: surviveler_ui::Result<()>, tree: &ItemTree) -> ScenarioFrame {
    ScenarioFrame {
        step: step.into(),
        error: outcome.err().map(|err| err.to_string()),
        layout: LayoutSnapshot::capture(tree),
    }
}
