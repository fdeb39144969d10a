//! Fixed routes leading from the spawn tunnels to the life line.

use lifeline_defence_core::{Path, WorldPoint};
use rand::Rng;

/// Named route an enemy may follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// Straight down the middle.
    Center,
    /// Enters on the left and bends toward the centre.
    Left,
    /// Mirror image of [`Route::Left`].
    Right,
    /// Weaves left and right through the grid.
    Zigzag,
    /// Hugs the far left edge before cutting in.
    Edge,
}

impl Route {
    /// Every route, in the order used for uniform selection.
    pub const ALL: [Route; 5] = [
        Route::Center,
        Route::Left,
        Route::Right,
        Route::Zigzag,
        Route::Edge,
    ];

    /// Waypoints of the route without any jitter applied.
    #[must_use]
    pub fn waypoints(self) -> Vec<WorldPoint> {
        let coordinates: &[(f32, f32)] = match self {
            Route::Center => &[
                (0.0, -15.0),
                (0.0, -12.0),
                (0.0, -9.0),
                (0.0, -6.0),
                (0.0, -4.0),
                (0.0, -2.0),
                (0.0, 0.0),
                (0.0, 2.0),
                (0.0, 4.0),
                (0.0, 6.0),
            ],
            Route::Left => &[
                (-3.0, -15.0),
                (-3.0, -12.0),
                (-3.0, -9.0),
                (-3.0, -6.0),
                (-3.0, -4.0),
                (-2.0, -2.0),
                (-1.0, 0.0),
                (0.0, 2.0),
                (0.0, 4.0),
                (0.0, 6.0),
            ],
            Route::Right => &[
                (3.0, -15.0),
                (3.0, -12.0),
                (3.0, -9.0),
                (3.0, -6.0),
                (3.0, -4.0),
                (2.0, -2.0),
                (1.0, 0.0),
                (0.0, 2.0),
                (0.0, 4.0),
                (0.0, 6.0),
            ],
            Route::Zigzag => &[
                (-2.0, -15.0),
                (-2.0, -12.0),
                (1.0, -9.0),
                (-1.0, -6.0),
                (2.0, -3.0),
                (-1.0, -1.0),
                (2.0, 1.0),
                (0.0, 3.0),
                (0.0, 6.0),
            ],
            Route::Edge => &[
                (-4.0, -15.0),
                (-4.0, -12.0),
                (-4.0, -9.0),
                (-4.0, -6.0),
                (-4.0, -2.0),
                (-3.0, 0.0),
                (-1.0, 1.0),
                (1.0, 2.0),
                (0.0, 4.0),
                (0.0, 6.0),
            ],
        };

        coordinates
            .iter()
            .map(|&(x, z)| WorldPoint::new(x, z))
            .collect()
    }
}

/// Picks one of the fixed routes uniformly and jitters its final waypoint.
///
/// The lateral coordinate of the last waypoint moves by at most `jitter`
/// units in either direction so that enemies sharing a route do not stack on
/// the exact same point.
pub fn pick_path<R: Rng + ?Sized>(rng: &mut R, jitter: f32) -> Path {
    let route = Route::ALL[rng.gen_range(0..Route::ALL.len())];
    let mut waypoints = route.waypoints();

    if jitter > 0.0 {
        let offset = rng.gen_range(-jitter..=jitter);
        if let Some(last) = waypoints.last_mut() {
            *last = WorldPoint::new(last.x() + offset, last.z());
        }
    }

    Path::new(waypoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn routes_run_from_tunnels_to_life_line() {
        for route in Route::ALL {
            let waypoints = route.waypoints();
            assert_eq!(waypoints.first().map(|point| point.z()), Some(-15.0));
            assert_eq!(waypoints.last().copied(), Some(WorldPoint::new(0.0, 6.0)));
            assert!(
                waypoints.windows(2).all(|pair| pair[1].z() >= pair[0].z()),
                "{route:?} walks backwards"
            );
        }
    }

    #[test]
    fn jitter_only_moves_final_waypoint_sideways() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..64 {
            let path = pick_path(&mut rng, 0.5);
            let last = path.get(path.last_index()).expect("final waypoint");
            assert!(last.x().abs() <= 0.5);
            assert_eq!(last.z(), 6.0);

            let untouched = Route::ALL
                .iter()
                .any(|route| route.waypoints()[..path.last_index()] == path.waypoints()[..path.last_index()]);
            assert!(untouched);
        }
    }

    #[test]
    fn every_route_is_eventually_picked() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut starts = std::collections::HashSet::new();
        for _ in 0..200 {
            let path = pick_path(&mut rng, 0.0);
            let first = path.get(0).expect("start");
            let _ = starts.insert((first.x() as i32, path.len()));
        }
        assert_eq!(starts.len(), Route::ALL.len());
    }
}
