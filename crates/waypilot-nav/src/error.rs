/// Errors raised while building navigation state from configuration.
///
/// The guidance loop itself never fails; these only surface at construction time.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("waypoint table needs a home point and at least one route point, got {0} entries")]
    RouteTooShort(usize),

    #[error("waypoint {index} has non-finite coordinates")]
    NonFiniteWaypoint { index: usize },
}
