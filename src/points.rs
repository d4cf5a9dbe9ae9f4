//! Point awards and the leaderboard.

use crate::model::User;

pub const ROUTE_CREATION_POINTS: i64 = 10;
pub const SPOT_CREATION_POINTS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    RouteCreated,
    SpotCreated,
}

impl Activity {
    pub fn points(self) -> i64 {
        match self {
            Activity::RouteCreated => ROUTE_CREATION_POINTS,
            Activity::SpotCreated => SPOT_CREATION_POINTS,
        }
    }
}

/// Credits `user` for `activity` and returns the new total.
pub fn award(user: &mut User, activity: Activity) -> i64 {
    user.points = user.points.saturating_add(activity.points());
    user.points
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedUser<'a> {
    /// 1-based.
    pub rank: usize,
    pub user: &'a User,
}

/// Users ordered by points, highest first. Ties go alphabetically by name.
pub fn leaderboard(users: &[User]) -> Vec<RankedUser<'_>> {
    let mut sorted: Vec<&User> = users.iter().collect();
    sorted.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, user)| RankedUser { rank: i + 1, user })
        .collect()
}
