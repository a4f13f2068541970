use approx::assert_relative_eq;

use waypilot_nav::clock::ManualClock;
use waypilot_nav::gnss::{PositionSource, SimConfig, SimGps};
use waypilot_nav::nav::Transition;
use waypilot_nav::waypoint::Waypoint;
use waypilot_nav::{GuidanceConfig, GuidanceEngine, HeadingReference, Outcome};
use waypilot_proto::encode;

fn short_hop() -> GuidanceConfig {
    GuidanceConfig {
        waypoints: vec![Waypoint::new(0.0, 0.0, 0), Waypoint::new(0.001, 0.001, 50)],
        ..GuidanceConfig::default()
    }
}

fn feed(eng: &mut GuidanceEngine<ManualClock>, lat: f64, lon: f64, alt: i32) -> Outcome {
    eng.set_latitude(encode(lat));
    eng.set_longitude(encode(lon));
    eng.set_altitude(alt);
    eng.compute()
}

#[test]
fn first_leg_from_home() {
    let clock = ManualClock::new(1_000);
    let mut eng = GuidanceEngine::with_clock(&short_hop(), clock).unwrap();

    let out = feed(&mut eng, 0.0, 0.0, 0);

    assert_relative_eq!(eng.wp_distance(), 157.27, epsilon = 0.1);
    assert_eq!(eng.wp_bearing(), 45.0);
    assert!((45..=100).contains(&eng.speed()), "speed={}", eng.speed());
    assert!((-15..=15).contains(&eng.angle_offset()), "angle={}", eng.angle());
    assert_eq!(eng.current_waypoint(), 1);
    assert_eq!(
        out,
        Outcome::Computed(Transition { failsafe: false, arrived: false, steer_index: 1, next_index: 1 })
    );
}

#[test]
fn speed_band_floors_the_altitude_loop() {
    let clock = ManualClock::new(1_000);
    let mut eng = GuidanceEngine::with_clock(&short_hop(), clock.clone()).unwrap();
    feed(&mut eng, 0.0, 0.0, 0);
    // 50 m below target saturates the altitude loop at +40, under the speed floor
    assert_eq!(eng.speed(), 45);

    clock.advance(100);
    feed(&mut eng, 0.0, 0.0, 120);
    // far above target: output floors at -45, speed clamps to its minimum
    assert_eq!(eng.speed(), 45);
}

#[test]
fn standing_on_waypoint_advances() {
    // the reference home sits at the origin, so widen the leash for the Californian route
    let mut cfg = GuidanceConfig::default();
    cfg.waypoints[0] = Waypoint::new(34.02, -118.45, 0);
    cfg.guidance.home_limit_m = 200_000.0;
    let (wp1, wp2) = (cfg.waypoints[1], cfg.waypoints[2]);

    let mut eng = GuidanceEngine::with_clock(&cfg, ManualClock::new(1_000)).unwrap();
    assert_eq!(eng.current_waypoint(), 1);

    feed(&mut eng, wp1.lat, wp1.lon, wp1.alt_m);
    assert!(eng.wp_distance() < 1.0);
    assert_eq!(eng.current_waypoint(), 2);
    assert_eq!(*eng.active_waypoint(), wp2);
}

#[test]
fn arrival_at_last_waypoint_wraps_to_home() {
    let mut cfg = GuidanceConfig::default();
    cfg.waypoints[0] = Waypoint::new(34.02, -118.45, 0);
    let last = *cfg.waypoints.last().unwrap();
    let mut eng = GuidanceEngine::with_clock(&cfg, ManualClock::new(1_000)).unwrap();

    eng.set_current_waypoint(6);
    feed(&mut eng, last.lat, last.lon, last.alt_m);
    assert_eq!(eng.current_waypoint(), 0);
}

#[test]
fn far_from_home_forces_return() {
    // reference table: home at the origin, route in California
    let clock = ManualClock::new(1_000);
    let mut eng = GuidanceEngine::with_clock(&GuidanceConfig::default(), clock.clone()).unwrap();

    for start in [1, 3, 6] {
        eng.set_current_waypoint(start);
        clock.advance(100);
        let out = feed(&mut eng, 34.1, -118.3, 30);
        assert!(matches!(out, Outcome::Computed(t) if t.failsafe));
        assert_eq!(eng.current_waypoint(), 0);
    }
}

#[test]
fn controller_integrals_stay_banded_over_a_long_run() {
    let clock = ManualClock::new(0);
    let mut eng = GuidanceEngine::with_clock(&GuidanceConfig::default(), clock.clone()).unwrap();
    for i in 0..400 {
        clock.advance(20 + (i % 7) * 90);
        let alt = if i % 50 < 25 { 0 } else { 400 };
        feed(&mut eng, 34.0 + i as f64 * 1e-4, -118.45, alt);
        let h = eng.heading_pid();
        let a = eng.altitude_pid();
        assert!(h.integral().abs() <= 15.0, "heading I={}", h.integral());
        assert!(a.integral().abs() <= 20.0, "altitude I={}", a.integral());
        assert!((45..=100).contains(&eng.speed()));
        assert!((-15..=15).contains(&eng.angle_offset()));
    }
}

#[test]
fn closed_loop_sim_flies_the_whole_route() {
    let mut cfg = GuidanceConfig {
        waypoints: vec![
            Waypoint::new(0.0, 0.0, 0),
            Waypoint::new(0.001, 0.0, 10),
            Waypoint::new(0.001, 0.001, 10),
        ],
        ..GuidanceConfig::default()
    };
    cfg.guidance.heading_reference = HeadingReference::Target;

    let clock = ManualClock::new(0);
    let mut eng = GuidanceEngine::with_clock(&cfg, clock.clone()).unwrap();
    let mut gps = SimGps::new(&SimConfig { start_lat: 0.0, start_lon: 0.0, alt_m: 10, step_deg: 0.0001 });

    let mut arrivals = Vec::new();
    for _ in 0..200 {
        clock.advance(100);
        let fix = gps.sample();
        eng.set_latitude(fix.lat);
        eng.set_longitude(fix.lon);
        eng.set_altitude(fix.alt_m);
        if let Outcome::Computed(t) = eng.compute() {
            assert!(!t.failsafe);
            if t.arrived {
                arrivals.push((t.steer_index, t.next_index));
            }
        }
        gps.nudge(eng.wp_bearing());
    }

    assert!(arrivals.len() >= 3, "arrivals={:?}", arrivals);
    assert_eq!(&arrivals[..3], &[(1, 2), (2, 0), (0, 1)]);
}
