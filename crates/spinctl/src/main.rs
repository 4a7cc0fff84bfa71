use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use spinwheel::config::{self, WheelConfig};
use spinwheel::wheel::{SnapDecision, WheelUpdate};
use spinwheel::{Angle, Rotation, RotationState, WedgeState, Wheel, WheelAction, WheelEvent};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "spinctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of the default location
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Show which wedge a rotation selects.
    State {
        /// Rotation in degrees (or radians with --radians)
        #[arg(allow_hyphen_values = true)]
        rotation: f64,

        #[arg(short = 'r', long)]
        radians: bool,

        /// List every wedge, not only the visible ones
        #[arg(short = 'a', long)]
        all: bool,
    },
    /// Replay pointer angles (degrees, one per line) as a single drag.
    Replay {
        /// Trace file; reads stdin when omitted
        file: Option<PathBuf>,

        /// Rotation in degrees the wheel starts from
        #[arg(short = 's', long, default_value_t = 0.0, allow_hyphen_values = true)]
        start: f64,
    },
    /// Write the default config file.
    Init,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let path = config::write_default_config(cli.config.as_deref())?;
            println!("{}", path.display());
            Ok(())
        }
        Commands::State {
            rotation,
            radians,
            all,
        } => {
            let cfg = load(cli.config.as_deref())?;
            let rotation = if radians {
                Rotation::new(rotation)
            } else {
                Rotation::from_degrees(rotation)
            };
            show_state(&cfg, rotation, all, cli.json)
        }
        Commands::Replay { file, start } => {
            let cfg = load(cli.config.as_deref())?;
            let text = match &file {
                Some(path) => fs_err::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read trace from stdin")?;
                    buf
                }
            };
            let samples = parse_samples(&text)?;
            replay(&cfg, Rotation::from_degrees(start), &samples, cli.json)
        }
    }
}

fn load(path: Option<&Path>) -> anyhow::Result<WheelConfig> {
    let cfg = config::load_config(path).context("Failed to load config")?;
    log::debug!("Loaded config: {cfg:?}");
    Ok(cfg)
}

/// Pointer angles in degrees, one per line. `#` starts a comment.
fn parse_samples(text: &str) -> anyhow::Result<Vec<f64>> {
    let mut samples = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let value: f64 = content
            .parse()
            .with_context(|| format!("Line {}: '{}' is not an angle", number + 1, content))?;
        if !value.is_finite() {
            anyhow::bail!("Line {}: angle must be finite", number + 1);
        }
        samples.push(value);
    }
    Ok(samples)
}

#[derive(Serialize)]
struct WedgeReport {
    index: usize,
    label: String,
    selected: bool,
    layout_angle: f64,
    center: f64,
    percent_to_next_wedge: f64,
}

impl WedgeReport {
    fn new(cfg: &WheelConfig, wedge: &WedgeState) -> Self {
        Self {
            index: wedge.index(),
            label: cfg.label(wedge.index()),
            selected: wedge.is_selected(),
            layout_angle: wedge.layout_angle().degrees(),
            center: wedge.center().degrees(),
            percent_to_next_wedge: wedge.percent_to_next_wedge(),
        }
    }
}

#[derive(Serialize)]
struct StateReport {
    rotation: f64,
    wedge_index: usize,
    label: String,
    wedge_center: f64,
    rotation_count: u64,
    polarity: String,
    wedges: Vec<WedgeReport>,
}

impl StateReport {
    fn new(cfg: &WheelConfig, state: &RotationState, all: bool) -> Self {
        Self {
            rotation: state.rotation().degrees(),
            wedge_index: state.wedge_index(),
            label: cfg.label(state.wedge_index()),
            wedge_center: state.wedge_center().degrees(),
            rotation_count: state.rotation_count(),
            polarity: state.polarity().to_string(),
            wedges: state
                .wedges()
                .filter(|w| all || w.is_visible())
                .map(|w| WedgeReport::new(cfg, &w))
                .collect(),
        }
    }
}

fn show_state(cfg: &WheelConfig, rotation: Rotation, all: bool, json: bool) -> anyhow::Result<()> {
    let wheel = cfg.wheel()?.with_rotation(rotation);
    let report = StateReport::new(cfg, &wheel.state(), all);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "rotation {:.3}° -> wedge {} '{}' (center {:.3}°, {} turn(s), {})",
        report.rotation,
        report.wedge_index,
        report.label,
        report.wedge_center,
        report.rotation_count,
        report.polarity
    );
    for w in &report.wedges {
        println!(
            "{} {:>3} {:<12} layout {:>9.3}°  center {:>10.3}°  {:.3}",
            if w.selected { "*" } else { " " },
            w.index,
            w.label,
            w.layout_angle,
            w.center,
            w.percent_to_next_wedge
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct UpdateReport {
    sample: usize,
    pointer: f64,
    rotation: f64,
    wedge_index: usize,
    changed: bool,
    resistance: String,
}

#[derive(Serialize)]
struct SnapReport {
    target: String,
    from: f64,
    rotation: f64,
    wedge_index: usize,
    label: String,
    duration_secs: f64,
    steps: Option<i64>,
    percentage: Option<f64>,
}

impl SnapReport {
    fn new(cfg: &WheelConfig, decision: &SnapDecision) -> Self {
        Self {
            target: decision.target.to_string(),
            from: decision.from.degrees(),
            rotation: decision.rotation.degrees(),
            wedge_index: decision.wedge_index,
            label: cfg.label(decision.wedge_index),
            duration_secs: decision.duration.as_secs_f64(),
            steps: decision.selection_change.map(|c| c.steps),
            percentage: decision.selection_change.map(|c| c.percentage),
        }
    }
}

#[derive(Serialize)]
struct ReplayReport {
    updates: Vec<UpdateReport>,
    snap: Option<SnapReport>,
}

fn run_trace(wheel: &mut Wheel, samples: &[f64]) -> (Vec<(f64, WheelUpdate)>, Option<SnapDecision>) {
    let Some((first, rest)) = samples.split_first() else {
        return (Vec::new(), None);
    };

    wheel.handle(WheelEvent::DragBegan(Angle::from_degrees(*first)));
    let updates = rest
        .iter()
        .filter_map(
            |pointer| match wheel.handle(WheelEvent::DragMoved(Angle::from_degrees(*pointer))) {
                WheelAction::Redraw(update) => Some((*pointer, update)),
                _ => None,
            },
        )
        .collect();

    let decision = match wheel.handle(WheelEvent::DragEnded) {
        WheelAction::Animate(decision) => Some(decision),
        _ => None,
    };
    (updates, decision)
}

fn replay(cfg: &WheelConfig, start: Rotation, samples: &[f64], json: bool) -> anyhow::Result<()> {
    if samples.is_empty() {
        anyhow::bail!("The trace contains no pointer samples.");
    }

    let mut wheel = cfg.wheel()?.with_rotation(start);
    let (updates, decision) = run_trace(&mut wheel, samples);

    let report = ReplayReport {
        updates: updates
            .iter()
            .enumerate()
            .map(|(i, (pointer, u))| UpdateReport {
                sample: i + 1,
                pointer: *pointer,
                rotation: u.rotation.degrees(),
                wedge_index: u.wedge_index,
                changed: u.changed,
                resistance: u.resistance.to_string(),
            })
            .collect(),
        snap: decision.as_ref().map(|d| SnapReport::new(cfg, d)),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for u in &report.updates {
        println!(
            "{:>5} pointer {:>8.3}°  rotation {:>10.3}°  wedge {:>3}{}{}",
            u.sample,
            u.pointer,
            u.rotation,
            u.wedge_index,
            if u.changed { " *" } else { "" },
            if u.resistance == "None" {
                String::new()
            } else {
                format!(" [{}]", u.resistance)
            }
        );
    }
    if let Some(snap) = &report.snap {
        print!(
            "snap to {} at {:.3}° (wedge {} '{}') over {:.3}s",
            snap.target, snap.rotation, snap.wedge_index, snap.label, snap.duration_secs
        );
        match (snap.steps, snap.percentage) {
            (Some(steps), Some(percentage)) => {
                println!(", moved {steps} wedge(s) ({percentage:.3})")
            }
            _ => println!(),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_samples() {
        let text = "# recorded drag\n0\n -15.5 \n\n-30 # crossing\n";
        assert_eq!(parse_samples(text).unwrap(), vec![0.0, -15.5, -30.0]);
    }

    #[test]
    fn test_parse_samples_reports_line() {
        let err = parse_samples("0\n10\nten\n").unwrap_err();
        assert!(err.to_string().contains("Line 3"));
        assert!(parse_samples("inf\n").is_err());
    }

    #[test]
    fn test_run_trace_snaps_to_nearest_wedge() {
        let cfg = WheelConfig::default();
        let mut wheel = cfg.wheel().unwrap();
        let (updates, decision) = run_trace(&mut wheel, &[0.0, -40.0, -80.0, -100.0]);
        assert_eq!(updates.len(), 3);
        assert!(updates[1].1.changed);

        let decision = decision.unwrap();
        assert_eq!(decision.wedge_index, 1);
        assert_eq!(decision.selection_change.map(|c| c.steps), Some(1));
        assert_eq!(wheel.selected_index(), 1);
    }

    #[test]
    fn test_run_trace_empty() {
        let mut wheel = WheelConfig::default().wheel().unwrap();
        let (updates, decision) = run_trace(&mut wheel, &[]);
        assert!(updates.is_empty());
        assert!(decision.is_none());
    }

    #[test]
    fn test_state_report_lists_visible_wedges() {
        let cfg = WheelConfig::default();
        let wheel = cfg.wheel().unwrap().with_rotation(Rotation::from_degrees(91.0));
        let report = StateReport::new(&cfg, &wheel.state(), false);
        assert_eq!(report.wedge_index, 9);
        let indices: Vec<_> = report.wedges.iter().map(|w| w.index).collect();
        assert_eq!(indices, vec![0, 8, 9]);
    }
}
