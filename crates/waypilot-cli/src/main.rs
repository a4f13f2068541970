use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use waypilot_fc::{ActuatorConfig, Actuators, LogActuators};
use waypilot_nav::gnss::{PositionFix, PositionSource, SimConfig, SimGps};
use waypilot_nav::{doctor as nav_doctor, geo, GuidanceConfig, GuidanceEngine, Outcome};
use waypilot_proto::telemetry::{FrameKind, GuidanceFrame};

#[derive(Debug, Parser)]
#[command(name = "waypilot", version, about = "waypilot - waypoint guidance and dual-PID control loop")]
struct Cli {
    #[arg(long)]
    config: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sanity-check the configuration.
    Doctor,
    /// Print the waypoint table with leg lengths and bearings.
    Waypoints,
    /// Fly the simulated vehicle through the guidance loop.
    Run {
        /// Stop after this many cycles (runs until Ctrl-C otherwise).
        #[arg(long)]
        cycles: Option<u64>,
        /// Print one JSON telemetry frame per cycle on stdout.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, serde::Deserialize)]
struct Config {
    #[serde(flatten)]
    nav: GuidanceConfig,

    #[serde(default)]
    sim: SimConfig,
    #[serde(default)]
    dispatch: DispatchCfg,
    #[serde(default)]
    actuators: ActuatorConfig,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct DispatchCfg {
    period_ms: u64,
}

impl Default for DispatchCfg {
    fn default() -> Self {
        Self { period_ms: 100 }
    }
}

fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s).context("parse config toml")?)
}

fn load_config(path: &str) -> Result<Config> {
    let s = std::fs::read_to_string(path).with_context(|| format!("read config {}", path))?;
    parse_config(&s)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg)?,
        Command::Waypoints => waypoints(&cfg)?,
        Command::Run { cycles, json } => run(&cfg, cycles, json).await?,
    }
    Ok(())
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");

    nav_doctor::check_guidance(&cfg.nav)?;
    nav_doctor::check_sim(&cfg.sim)?;
    anyhow::ensure!(
        cfg.dispatch.period_ms >= 1 && cfg.dispatch.period_ms <= 10_000,
        "dispatch.period_ms should be 1..10000"
    );

    if !cfg.nav.safeguards.hold_on_non_finite || cfg.nav.safeguards.min_dt_s == 0.0 {
        warn!("doctor: safeguards partly disabled ({:?})", cfg.nav.safeguards);
    }

    GuidanceEngine::new(&cfg.nav).context("build guidance engine")?;

    info!("doctor: OK");
    Ok(())
}

fn waypoints(cfg: &Config) -> Result<()> {
    let engine = GuidanceEngine::new(&cfg.nav).context("build guidance engine")?;
    let table = engine.table();
    let wrap = engine.params().bearing_wrap;

    for (i, wp) in table.iter().enumerate() {
        let prev = table.get(if i == 0 { table.last_index() } else { i - 1 });
        let leg_m = geo::distance(prev.lat, prev.lon, wp.lat, wp.lon);
        let leg_brg = geo::bearing(prev.lat, prev.lon, wp.lat, wp.lon, wrap);
        let home_m = geo::distance(wp.lat, wp.lon, table.home().lat, table.home().lon);
        println!(
            "{}{} lat={:.6} lon={:.6} alt={}m leg={:.0}m brg={:.0} home={:.0}m{}",
            if i == 0 { "home " } else { "wp" },
            i,
            wp.lat,
            wp.lon,
            wp.alt_m,
            leg_m,
            leg_brg,
            home_m,
            if home_m > cfg.nav.guidance.home_limit_m { " (beyond home limit)" } else { "" },
        );
    }
    Ok(())
}

async fn run(cfg: &Config, cycles: Option<u64>, json: bool) -> Result<()> {
    info!("run: starting");

    let mut engine = GuidanceEngine::new(&cfg.nav).context("build guidance engine")?;
    let mut gps = SimGps::new(&cfg.sim);
    let mut act = LogActuators::new(cfg.actuators.clone());

    let period = std::time::Duration::from_millis(cfg.dispatch.period_ms.max(1));
    let mut tick = tokio::time::interval(period);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = &mut ctrl_c => {
                info!("run: interrupted");
                break;
            }
        }

        let fix = gps.sample();
        engine.set_latitude(fix.lat);
        engine.set_longitude(fix.lon);
        engine.set_altitude(fix.alt_m);
        let outcome = engine.compute();

        act.throttle(engine.speed())?;
        act.yaw(engine.angle())?;

        // sim flies straight at the active leg, whatever the steering says
        gps.nudge(engine.wp_bearing());

        if json {
            let frame = frame(&engine, &fix, outcome);
            println!("{}", serde_json::to_string(&frame).context("encode telemetry frame")?);
        }

        if cycles.is_some_and(|n| engine.cycles() >= n) {
            break;
        }
    }

    info!(cycles = engine.cycles(), commands = act.status().commands, "run: done");
    Ok(())
}

fn frame_kind(outcome: Outcome) -> FrameKind {
    match outcome {
        Outcome::Hold => FrameKind::Hold,
        Outcome::Computed(t) if t.failsafe => FrameKind::Failsafe,
        Outcome::Computed(t) if t.arrived => FrameKind::Arrival,
        Outcome::Computed(_) => FrameKind::Status,
    }
}

fn frame<C: waypilot_nav::clock::Clock>(
    engine: &GuidanceEngine<C>,
    fix: &PositionFix,
    outcome: Outcome,
) -> GuidanceFrame {
    let st = engine.snapshot();
    GuidanceFrame {
        ts_unix_ms: (fix.ts.unix_timestamp_nanos() / 1_000_000) as i64,
        cycle: st.cycle,
        kind: frame_kind(outcome),
        lat: fix.lat,
        lon: fix.lon,
        alt_m: fix.alt_m,
        waypoint: st.waypoint,
        wp_distance_m: st.wp_distance_m,
        wp_bearing_deg: st.wp_bearing_deg,
        speed: st.speed,
        angle: st.angle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypilot_nav::clock::ManualClock;
    use waypilot_nav::nav::Transition;

    const SAMPLE: &str = include_str!("../../../config/waypilot.toml");

    #[test]
    fn sample_config_passes_doctor() {
        let cfg = parse_config(SAMPLE).unwrap();
        assert_eq!(cfg.dispatch.period_ms, 100);
        assert_eq!(cfg.nav.waypoints.len(), 7);
        doctor(&cfg).unwrap();
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg.dispatch.period_ms, 100);
        assert_eq!(cfg.nav.guidance.arrival_radius_m, 30.0);
        assert_eq!(cfg.sim.alt_m, 3);
        assert!(cfg.actuators.log_every_command);
    }

    #[test]
    fn rejects_bad_period() {
        let cfg = parse_config("[dispatch]\nperiod_ms = 0\n").unwrap();
        assert!(doctor(&cfg).is_err());
    }

    #[test]
    fn frame_kind_prefers_failsafe() {
        let t = Transition { failsafe: true, arrived: true, steer_index: 0, next_index: 1 };
        assert_eq!(frame_kind(Outcome::Computed(t)), FrameKind::Failsafe);
        let t = Transition { failsafe: false, arrived: true, steer_index: 2, next_index: 3 };
        assert_eq!(frame_kind(Outcome::Computed(t)), FrameKind::Arrival);
        assert_eq!(frame_kind(Outcome::Hold), FrameKind::Hold);
    }

    #[test]
    fn frame_reflects_engine_state() {
        let cfg = parse_config(SAMPLE).unwrap();
        let mut engine = GuidanceEngine::with_clock(&cfg.nav, ManualClock::new(1_000)).unwrap();
        let mut gps = SimGps::new(&cfg.sim);
        let fix = gps.sample();
        engine.set_latitude(fix.lat);
        engine.set_longitude(fix.lon);
        engine.set_altitude(fix.alt_m);
        let out = engine.compute();

        let f = frame(&engine, &fix, out);
        assert_eq!(f.cycle, 1);
        assert_eq!(f.lat, fix.lat);
        assert_eq!(f.speed, engine.speed());
        assert_eq!(f.angle, engine.angle());
        assert_eq!(f.waypoint, engine.current_waypoint());
    }
}
