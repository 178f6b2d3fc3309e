//! Speed profiler state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
use super::*;
use crate::{
    live_state::StopCmd,
    route::{Route, Waypoint},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Builds the lookahead window and its speed profile.
#[derive(Debug, Clone)]
pub struct SpeedProfiler {
    params: Params,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SpeedProfiler {
    /// Create a new profiler, validating the parameters.
    pub fn new(params: Params) -> Result<Self, SpeedProfError> {
        if params.lookahead_wps == 0 {
            return Err(SpeedProfError::ZeroLookahead);
        }

        if !(params.max_decel_mss.is_finite() && params.max_decel_mss > 0.0) {
            return Err(SpeedProfError::InvalidMaxDecel(params.max_decel_mss));
        }

        if !(params.stop_speed_floor_ms.is_finite() && params.stop_speed_floor_ms >= 0.0) {
            return Err(SpeedProfError::InvalidSpeedFloor(params.stop_speed_floor_ms));
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Build the lookahead window starting at `closest_idx`.
    ///
    /// The window is `route[closest_idx .. closest_idx + lookahead_wps]`, truncated at the end of
    /// the route. A stop line at or beyond `closest_idx + lookahead_wps` is treated as no stop
    /// line. A stop line behind the vehicle gives a stop point at the start of the window.
    pub fn build_window(&self, route: &Route, closest_idx: usize, stop_cmd: StopCmd) -> PlanWindow {
        let farthest_idx = closest_idx + self.params.lookahead_wps;
        let base_wps = route.slice(closest_idx, farthest_idx);

        match stop_cmd {
            StopCmd::StopAt(stop_idx) if stop_idx < farthest_idx => {
                let stop_offset = stop_idx
                    .saturating_sub(closest_idx)
                    .saturating_sub(self.params.stop_margin_wps);

                PlanWindow {
                    start_index: closest_idx,
                    profile: Profile::Braking { stop_offset },
                    waypoints: self.decelerate(base_wps, stop_offset),
                }
            }
            _ => PlanWindow {
                start_index: closest_idx,
                profile: Profile::Cruise,
                waypoints: base_wps.to_vec(),
            },
        }
    }

    /// Compute the braking profile over `waypoints`, bringing the vehicle to rest at
    /// `stop_offset`.
    ///
    /// Poses are kept, only the speeds are replaced.
    fn decelerate(&self, waypoints: &[Waypoint], stop_offset: usize) -> Vec<Waypoint> {
        let smooth_ms = 1.0 / self.params.lookahead_wps as f64;

        waypoints
            .iter()
            .enumerate()
            .map(|(i, wp)| {
                let dist_m = arc_length(waypoints, i, stop_offset);

                let mut vel_ms = (2.0 * self.params.max_decel_mss * dist_m).sqrt()
                    + i as f64 * smooth_ms;

                if vel_ms < self.params.stop_speed_floor_ms {
                    vel_ms = 0.0;
                }

                Waypoint {
                    pose: wp.pose,
                    speed_ms: vel_ms.min(wp.speed_ms),
                }
            })
            .collect()
    }
}

/// Distance along the polyline through `points` from index `i` to index `j`.
///
/// Zero if `j <= i`. If `j` is past the end of `points` the distance is measured to the last
/// point.
pub fn arc_length(points: &[Waypoint], i: usize, j: usize) -> f64 {
    if j <= i || i >= points.len() {
        return 0.0;
    }

    let end = j.min(points.len() - 1);

    points[i..=end]
        .windows(2)
        .map(|pair| (pair[1].pose.position_m - pair[0].pose.position_m).norm())
        .sum()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{loc::Pose, route::test::straight_route};
    use nalgebra::Vector3;

    const TOL: f64 = 1e-9;

    fn profiler() -> SpeedProfiler {
        SpeedProfiler::new(Params::default()).unwrap()
    }

    /// Route with uneven spacing and a change in height, speeds given per waypoint.
    fn uneven_route() -> Route {
        let positions = [
            (0.0, 0.0, 0.0),
            (3.0, 4.0, 0.0),
            (3.0, 4.0, 2.0),
            (6.0, 8.0, 2.0),
            (6.0, 8.0, 2.0),
            (7.0, 8.0, 2.0),
        ];

        Route::new(
            positions
                .iter()
                .map(|&(x, y, z)| Waypoint {
                    pose: Pose::from_position_heading(Vector3::new(x, y, z), 0.0),
                    speed_ms: 20.0,
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_arc_length() {
        let route = uneven_route();
        let wps = route.waypoints();

        assert_eq!(arc_length(wps, 0, 1), 5.0);
        assert_eq!(arc_length(wps, 0, 2), 7.0);
        assert_eq!(arc_length(wps, 1, 3), 7.0);
        assert_eq!(arc_length(wps, 0, 5), 13.0);
    }

    #[test]
    fn test_arc_length_degenerate() {
        let route = uneven_route();
        let wps = route.waypoints();

        for i in 0..wps.len() {
            assert_eq!(arc_length(wps, i, i), 0.0);
        }

        // Backwards walks contribute nothing
        assert_eq!(arc_length(wps, 4, 1), 0.0);

        // Past the end the walk stops at the last point
        assert_eq!(arc_length(wps, 0, 40), 13.0);

        assert_eq!(arc_length(&[], 0, 3), 0.0);
    }

    #[test]
    fn test_arc_length_monotonic() {
        let route = straight_route(30, 5.0);
        let wps = route.waypoints();

        for i in 0..wps.len() {
            let mut last = 0.0;
            for j in i..(wps.len() + 5) {
                let dist = arc_length(wps, i, j);
                assert!(dist >= last);
                last = dist;
            }
        }
    }

    #[test]
    fn test_invalid_params() {
        let mut params = Params::default();
        params.lookahead_wps = 0;
        assert!(matches!(SpeedProfiler::new(params), Err(SpeedProfError::ZeroLookahead)));

        let mut params = Params::default();
        params.max_decel_mss = 0.0;
        assert!(matches!(SpeedProfiler::new(params), Err(SpeedProfError::InvalidMaxDecel(_))));

        let mut params = Params::default();
        params.stop_speed_floor_ms = -1.0;
        assert!(matches!(SpeedProfiler::new(params), Err(SpeedProfError::InvalidSpeedFloor(_))));
    }

    /// 10 collinear waypoints 1 m apart at 5 m/s with no stop line keep their speeds.
    #[test]
    fn test_cruise_short_route() {
        let route = straight_route(10, 5.0);

        let window = profiler().build_window(&route, 0, StopCmd::None);

        assert_eq!(window.profile, Profile::Cruise);
        assert_eq!(window.start_index, 0);
        assert_eq!(window.len(), 10);
        assert!(window.speeds_ms().all(|v| v == 5.0));
        assert_eq!(window.waypoints, route.waypoints().to_vec());
    }

    #[test]
    fn test_cruise_window_length() {
        let route = straight_route(120, 5.0);
        let prof = profiler();

        for &closest_idx in &[0usize, 30, 70, 71, 100, 119] {
            let window = prof.build_window(&route, closest_idx, StopCmd::None);

            assert_eq!(window.len(), 50.min(120 - closest_idx));
            assert_eq!(window.waypoints[0], route[closest_idx]);
        }
    }

    #[test]
    fn test_stop_point_floored() {
        let route = straight_route(10, 5.0);

        let window = profiler().build_window(&route, 0, StopCmd::StopAt(5));

        // Stop point is 2 waypoints short of the line, where the raw speed is 3 * 0.02
        assert_eq!(window.profile, Profile::Braking { stop_offset: 3 });
        assert_eq!(window.waypoints[3].speed_ms, 0.0);

        // Everything at or past the stop point is stopped
        for wp in &window.waypoints[3..] {
            assert_eq!(wp.speed_ms, 0.0);
        }
    }

    #[test]
    fn test_braking_speeds() {
        let route = straight_route(10, 5.0);

        let window = profiler().build_window(&route, 0, StopCmd::StopAt(5));
        let speeds: Vec<f64> = window.speeds_ms().collect();

        // 3 m from the stop point
        assert!((speeds[0] - 3f64.sqrt()).abs() < TOL);

        // 2 m: sqrt(2) + 0.02
        assert!((speeds[1] - (2f64.sqrt() + 0.02)).abs() < TOL);

        // 1 m: 1 + 0.04
        assert!((speeds[2] - 1.04).abs() < TOL);

        // Poses are unchanged
        for (planned, base) in window.waypoints.iter().zip(route.waypoints()) {
            assert_eq!(planned.pose, base.pose);
        }
    }

    #[test]
    fn test_braking_capped_by_reference() {
        let route = straight_route(80, 2.0);

        let window = profiler().build_window(&route, 10, StopCmd::StopAt(55));

        assert_eq!(window.profile, Profile::Braking { stop_offset: 43 });
        for (planned, base) in window.waypoints.iter().zip(&route.waypoints()[10..]) {
            assert!(planned.speed_ms <= base.speed_ms);
            assert!(planned.speed_ms >= 0.0);
        }

        // Far from the line the reference speed applies
        assert_eq!(window.waypoints[0].speed_ms, 2.0);

        // Speeds never increase towards the stop point
        let speeds: Vec<f64> = window.speeds_ms().collect();
        for pair in speeds[..=43].windows(2) {
            assert!(pair[1] <= pair[0] + TOL);
        }
    }

    #[test]
    fn test_stop_beyond_window_is_cruise() {
        let route = straight_route(10, 5.0);
        let prof = profiler();

        let window = prof.build_window(&route, 0, StopCmd::StopAt(200));
        assert_eq!(window.profile, Profile::Cruise);
        assert!(window.speeds_ms().all(|v| v == 5.0));

        // The first index outside the window is also cruise
        let route = straight_route(100, 5.0);
        let window = prof.build_window(&route, 0, StopCmd::StopAt(50));
        assert_eq!(window.profile, Profile::Cruise);

        let window = prof.build_window(&route, 0, StopCmd::StopAt(49));
        assert_eq!(window.profile, Profile::Braking { stop_offset: 47 });
    }

    #[test]
    fn test_stop_line_behind_vehicle() {
        let route = straight_route(100, 5.0);

        let window = profiler().build_window(&route, 40, StopCmd::StopAt(38));

        assert_eq!(window.profile, Profile::Braking { stop_offset: 0 });
        assert!(window.speeds_ms().all(|v| v == 0.0));
    }

    #[test]
    fn test_negative_stop_index_stops_at_once() {
        let route = straight_route(100, 5.0);

        let window = profiler().build_window(&route, 10, StopCmd::from(-2));
        assert_eq!(window.profile, Profile::Braking { stop_offset: 0 });
        assert!(window.speeds_ms().all(|v| v == 0.0));

        let window = profiler().build_window(&route, 10, StopCmd::from(-1));
        assert_eq!(window.profile, Profile::Cruise);
    }

    #[test]
    fn test_stop_line_past_route_end() {
        // The stop line is inside the window's index range but the route ends first, so the
        // vehicle brakes towards the last waypoint.
        let route = straight_route(10, 5.0);

        let window = profiler().build_window(&route, 0, StopCmd::StopAt(30));

        assert_eq!(window.profile, Profile::Braking { stop_offset: 28 });
        assert_eq!(window.len(), 10);
        assert!((window.waypoints[0].speed_ms - 3.0).abs() < TOL);
        assert_eq!(window.waypoints[9].speed_ms, 0.0);
    }

    #[test]
    fn test_window_at_route_end() {
        let route = straight_route(10, 5.0);

        let window = profiler().build_window(&route, 9, StopCmd::None);
        assert_eq!(window.len(), 1);
        assert_eq!(window.start_index, 9);
    }
}
