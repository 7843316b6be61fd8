/// Hit tests shared by the bullet passes.

use crate::config::{ALIEN_HEIGHT, ALIEN_WIDTH, SHIP_WIDTH};
use crate::entities::{Ship, Vec2};

/// True if `point` lies inside the alien footprint anchored at `origin`.
///
/// The box is closed on both ends: `[x, x+5] × [y, y+1]`.
pub fn collides(point: Vec2, origin: Vec2) -> bool {
    point.x >= origin.x
        && point.x <= origin.x + ALIEN_WIDTH - 1
        && point.y >= origin.y
        && point.y <= origin.y + ALIEN_HEIGHT - 1
}

/// True if `point` lands on the ship.  Only the ship's own row counts, unlike
/// the two-row alien box.
pub fn hits_ship(point: Vec2, ship: &Ship) -> bool {
    point.y == ship.pos.y && point.x >= ship.pos.x && point.x <= ship.pos.x + SHIP_WIDTH - 1
}
