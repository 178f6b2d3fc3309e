//! # Route index
//!
//! Nearest-waypoint lookup over the route, built once when the route arrives. Waypoint XY
//! positions are bulk loaded into an R-tree, which gives `O(log N)` nearest queries.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::info;
use nalgebra::Vector2;
use rstar::{primitives::GeomWithData, RTree};

use super::Route;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A waypoint's XY position tagged with its index in the route.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Immutable spatial index over a route.
///
/// The index owns the route for its whole lifetime.
#[derive(Debug)]
pub struct RouteIndex {
    route: Route,
    tree: RTree<IndexedPoint>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RouteIndex {
    /// Build the index over the given route.
    pub fn new(route: Route) -> Self {
        let points: Vec<IndexedPoint> = route
            .waypoints()
            .iter()
            .enumerate()
            .map(|(i, wp)| GeomWithData::new([wp.pose.position_m.x, wp.pose.position_m.y], i))
            .collect();

        let tree = RTree::bulk_load(points);

        info!("Route index built over {} waypoints", route.len());

        Self { route, tree }
    }

    /// The indexed route.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Return the index of the nearest waypoint which is not behind `position_m`.
    ///
    /// The nearest waypoint is found first. If the vehicle has already passed it, i.e. the
    /// vehicle lies on the far side of the plane through the waypoint normal to the segment
    /// arriving at it, the next waypoint is returned instead. Index arithmetic wraps, so the
    /// segment arriving at waypoint 0 comes from the last waypoint, and the waypoint after the
    /// last is waypoint 0.
    ///
    /// The test uses the local segment direction only, so it assumes the route is close to
    /// straight at the scale of the waypoint spacing.
    pub fn nearest_ahead_index(&self, position_m: &Vector2<f64>) -> usize {
        let num_wps = self.route.len();
        let closest = self.nearest_index(position_m);

        let prev = match closest {
            0 => num_wps - 1,
            i => i - 1,
        };

        let closest_m = self.route[closest].pose.position2();
        let prev_m = self.route[prev].pose.position2();

        let val = (closest_m - prev_m).dot(&(position_m - closest_m));

        if val > 0.0 {
            (closest + 1) % num_wps
        } else {
            closest
        }
    }

    /// Index of the waypoint nearest to `position_m` in the XY plane.
    pub fn nearest_index(&self, position_m: &Vector2<f64>) -> usize {
        // The tree holds every waypoint and a route is never empty, so a neighbour always exists
        self.tree
            .nearest_neighbor(&[position_m.x, position_m.y])
            .map_or(0, |p| p.data)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        loc::Pose,
        route::{test::straight_route, Waypoint},
    };
    use nalgebra::Vector3;
    use std::f64::consts::TAU;

    /// Counter-clockwise circular route centred on the origin.
    fn circle_route(num_wps: usize, radius_m: f64) -> Route {
        Route::new(
            (0..num_wps)
                .map(|i| {
                    let theta = TAU * i as f64 / num_wps as f64;
                    Waypoint {
                        pose: Pose::from_position_heading(
                            Vector3::new(radius_m * theta.cos(), radius_m * theta.sin(), 0.0),
                            theta + TAU / 4.0,
                        ),
                        speed_ms: 10.0,
                    }
                })
                .collect(),
        )
        .unwrap()
    }

    fn circle_point(num_wps: usize, radius_m: f64, fractional_index: f64) -> Vector2<f64> {
        let theta = TAU * fractional_index / num_wps as f64;
        Vector2::new(radius_m * theta.cos(), radius_m * theta.sin())
    }

    /// The tangent test evaluated at `index`, as done during the lookup.
    fn tangent_test(route: &Route, index: usize, position_m: &Vector2<f64>) -> f64 {
        let prev = if index == 0 { route.len() - 1 } else { index - 1 };
        let closest_m = route[index].pose.position2();
        let prev_m = route[prev].pose.position2();
        (closest_m - prev_m).dot(&(position_m - closest_m))
    }

    #[test]
    fn test_nearest_index() {
        let index = RouteIndex::new(straight_route(10, 5.0));

        assert_eq!(index.nearest_index(&Vector2::new(3.2, 0.5)), 3);
        assert_eq!(index.nearest_index(&Vector2::new(6.7, -2.0)), 7);
        assert_eq!(index.nearest_index(&Vector2::new(42.0, 0.0)), 9);
    }

    #[test]
    fn test_ahead_of_passed_waypoint() {
        let index = RouteIndex::new(straight_route(10, 5.0));

        // Just past waypoint 3, so 3 is behind and 4 is the next ahead
        assert_eq!(index.nearest_ahead_index(&Vector2::new(3.4, 0.0)), 4);

        // Nearest to 4 but not yet reached it
        assert_eq!(index.nearest_ahead_index(&Vector2::new(3.6, 0.0)), 4);

        // Exactly on a waypoint is not past it
        assert_eq!(index.nearest_ahead_index(&Vector2::new(5.0, 0.0)), 5);

        // Lateral offset does not change the result
        assert_eq!(index.nearest_ahead_index(&Vector2::new(3.4, 1.5)), 4);
    }

    #[test]
    fn test_ahead_index_never_behind() {
        let route = straight_route(10, 5.0);
        let index = RouteIndex::new(route.clone());

        let mut x = 0.05;
        while x < 8.95 {
            let position_m = Vector2::new(x, 0.3);
            let ahead = index.nearest_ahead_index(&position_m);

            assert!(
                tangent_test(&route, ahead, &position_m) <= 0.0,
                "Index {} is behind position x = {}",
                ahead,
                x
            );
            x += 0.1;
        }
    }

    #[test]
    fn test_ahead_index_wraps_at_route_end() {
        let num_wps = 100;
        let radius_m = 50.0;
        let index = RouteIndex::new(circle_route(num_wps, radius_m));

        // Just past the last waypoint, the next one ahead is the first
        let position_m = circle_point(num_wps, radius_m, 99.3);
        assert_eq!(index.nearest_ahead_index(&position_m), 0);

        // Just past the first waypoint, the segment arriving at it comes from the last
        let position_m = circle_point(num_wps, radius_m, 0.3);
        assert_eq!(index.nearest_ahead_index(&position_m), 1);

        // Approaching the first waypoint
        let position_m = circle_point(num_wps, radius_m, 99.7);
        assert_eq!(index.nearest_ahead_index(&position_m), 0);
    }

    #[test]
    fn test_ahead_index_on_curve() {
        let num_wps = 100;
        let radius_m = 50.0;
        let route = circle_route(num_wps, radius_m);
        let index = RouteIndex::new(route.clone());

        for k in 0..(num_wps * 4) {
            let position_m = circle_point(num_wps, radius_m, k as f64 * 0.25 + 0.1);
            let ahead = index.nearest_ahead_index(&position_m);

            assert!(tangent_test(&route, ahead, &position_m) <= 0.0);
        }
    }

    #[test]
    fn test_single_waypoint_route() {
        let index = RouteIndex::new(straight_route(1, 5.0));

        assert_eq!(index.nearest_ahead_index(&Vector2::new(10.0, 3.0)), 0);
    }
}
