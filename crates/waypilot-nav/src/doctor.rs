use anyhow::Result;

use crate::config::GuidanceConfig;
use crate::gnss::SimConfig;
use crate::pid::PidConfig;

pub fn check_guidance(cfg: &GuidanceConfig) -> Result<()> {
    let g = &cfg.guidance;
    anyhow::ensure!(g.arrival_radius_m > 0.0, "guidance.arrival_radius_m must be > 0");
    anyhow::ensure!(
        g.home_limit_m > g.arrival_radius_m,
        "guidance.home_limit_m must exceed arrival_radius_m"
    );
    anyhow::ensure!(g.speed_min <= g.speed_max, "guidance.speed_min > speed_max");
    anyhow::ensure!(cfg.safeguards.min_dt_s >= 0.0, "safeguards.min_dt_s must be >= 0");

    check_gains("heading", &cfg.heading)?;
    check_gains("altitude", &cfg.altitude)?;

    anyhow::ensure!(cfg.waypoints.len() >= 2, "waypoints must have home plus >= 1 route point");
    for (i, wp) in cfg.waypoints.iter().enumerate() {
        anyhow::ensure!(
            wp.lat.abs() <= 90.0 && wp.lon.abs() <= 180.0,
            "waypoint {} coordinates invalid ({}, {})",
            i, wp.lat, wp.lon
        );
    }
    Ok(())
}

fn check_gains(name: &str, pid: &PidConfig) -> Result<()> {
    anyhow::ensure!(
        pid.kp.is_finite() && pid.ki.is_finite() && pid.kd.is_finite(),
        "{}: gains must be finite",
        name
    );
    anyhow::ensure!(
        pid.output_band.lo().is_finite() && pid.output_band.hi().is_finite(),
        "{}.output_band must be finite",
        name
    );
    anyhow::ensure!(
        pid.integral_band.lo().is_finite() && pid.integral_band.hi().is_finite(),
        "{}.integral_band must be finite",
        name
    );
    Ok(())
}

pub fn check_sim(sim: &SimConfig) -> Result<()> {
    anyhow::ensure!(
        sim.start_lat.abs() <= 90.0 && sim.start_lon.abs() <= 180.0,
        "sim start position invalid"
    );
    anyhow::ensure!(sim.step_deg > 0.0 && sim.step_deg < 1.0, "sim.step_deg should be in (0, 1)");
    Ok(())
}
