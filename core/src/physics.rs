use crate::constants::*;
use crate::types::*;

/// Set horizontal velocity and facing from input, initiate jump if grounded.
pub fn apply_movement_mut(f: &mut Fighter, input: &PlayerInput) {
    let dir = input.horizontal();
    f.vx = dir as f64 * RUN_SPEED;
    if dir != 0 {
        f.facing = dir;
    }
    if input.pressed(button::JUMP) && f.grounded() {
        f.vy = JUMP_VELOCITY;
    }
}

/// Apply gravity to vy.
pub fn apply_gravity_mut(f: &mut Fighter) {
    f.vy += GRAVITY;
}

/// Integrate position, then clamp to the floor and arena walls.
pub fn move_and_clamp_mut(f: &mut Fighter) {
    f.x += f.vx;
    f.y += f.vy;
    clamp_to_arena(f);
}

/// Floor landing zeroes vy. Out-of-range coordinates are clamped, never rejected.
pub fn clamp_to_arena(f: &mut Fighter) {
    if f.x < 0.0 {
        f.x = 0.0;
    }
    if f.x + FIGHTER_WIDTH > ARENA_WIDTH {
        f.x = ARENA_WIDTH - FIGHTER_WIDTH;
    }
    if f.y < 0.0 {
        f.y = 0.0;
        if f.vy < 0.0 {
            f.vy = 0.0;
        }
    }
    if f.y + FIGHTER_HEIGHT >= FLOOR_Y {
        f.y = FLOOR_Y - FIGHTER_HEIGHT;
        f.vy = 0.0;
    }
}

/// Separate overlapping bodies.
///
/// `Push` moves both fighters apart by the same amount. `HardStop` puts the
/// whole correction on the fighter walking into the other; when both or
/// neither are walking in, the overlap is split evenly.
pub fn resolve_body_collision(a: &mut Fighter, b: &mut Fighter, strategy: BodyCollision) {
    if !a.rect().overlaps(&b.rect()) {
        return;
    }

    match strategy {
        BodyCollision::Push { strength } => {
            let dir = if a.center_x() < b.center_x() { -1.0 } else { 1.0 };
            a.x += dir * strength;
            b.x -= dir * strength;
        }
        BodyCollision::HardStop => {
            let a_on_left = a.center_x() <= b.center_x();
            // Direction pointing from a toward b
            let toward_b = if a_on_left { 1.0 } else { -1.0 };
            let overlap = if a_on_left {
                a.rect().right() - b.x
            } else {
                b.rect().right() - a.x
            };
            let a_pressing = a.vx * toward_b > 0.0;
            let b_pressing = b.vx * -toward_b > 0.0;
            let (a_share, b_share) = match (a_pressing, b_pressing) {
                (true, false) => (1.0, 0.0),
                (false, true) => (0.0, 1.0),
                _ => (0.5, 0.5),
            };
            a.x -= toward_b * overlap * a_share;
            b.x += toward_b * overlap * b_share;
        }
    }

    clamp_to_arena(a);
    clamp_to_arena(b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::init::spawn_fighter;

    fn grounded_at(x: f64) -> Fighter {
        spawn_fighter(Side::Player, x, facing::RIGHT)
    }

    #[test]
    fn input_moves_right() {
        let mut f = grounded_at(100.0);
        apply_movement_mut(&mut f, &PlayerInput::new(button::RIGHT));
        move_and_clamp_mut(&mut f);
        assert_eq!(f.x, 100.0 + RUN_SPEED);
        assert_eq!(f.facing, facing::RIGHT);
    }

    #[test]
    fn input_moves_left() {
        let mut f = grounded_at(100.0);
        apply_movement_mut(&mut f, &PlayerInput::new(button::LEFT));
        assert_eq!(f.vx, -RUN_SPEED);
        assert_eq!(f.facing, facing::LEFT);
    }

    #[test]
    fn opposite_directions_cancel() {
        let mut f = grounded_at(100.0);
        apply_movement_mut(&mut f, &PlayerInput::new(button::LEFT | button::RIGHT));
        assert_eq!(f.vx, 0.0);
        assert_eq!(f.facing, facing::RIGHT);
    }

    #[test]
    fn gravity_increases_vy() {
        let mut f = grounded_at(100.0);
        apply_gravity_mut(&mut f);
        assert_eq!(f.vy, GRAVITY);
    }

    #[test]
    fn landing_zeroes_vy() {
        let mut f = grounded_at(100.0);
        apply_gravity_mut(&mut f);
        move_and_clamp_mut(&mut f);
        assert_eq!(f.bottom(), FLOOR_Y);
        assert_eq!(f.vy, 0.0);
        assert!(f.grounded());
    }

    #[test]
    fn jump_only_when_grounded() {
        let input = PlayerInput::new(button::JUMP);
        let mut f = grounded_at(100.0);
        apply_movement_mut(&mut f, &input);
        assert_eq!(f.vy, JUMP_VELOCITY);

        // Airborne: no double jump
        let mut f2 = grounded_at(100.0);
        f2.y -= 50.0;
        f2.vy = -3.0;
        apply_movement_mut(&mut f2, &input);
        assert_eq!(f2.vy, -3.0);
    }

    #[test]
    fn jump_arc_returns_to_floor() {
        let mut f = grounded_at(100.0);
        apply_movement_mut(&mut f, &PlayerInput::new(button::JUMP));
        let mut peak = f.y;
        for _ in 0..120 {
            apply_gravity_mut(&mut f);
            move_and_clamp_mut(&mut f);
            peak = peak.min(f.y);
        }
        assert!(peak < FLOOR_Y - FIGHTER_HEIGHT - 200.0);
        assert!(f.grounded());
    }

    #[test]
    fn walls_clamp_position() {
        let mut f = grounded_at(-40.0);
        clamp_to_arena(&mut f);
        assert_eq!(f.x, 0.0);

        let mut f = grounded_at(ARENA_WIDTH);
        clamp_to_arena(&mut f);
        assert_eq!(f.x, ARENA_WIDTH - FIGHTER_WIDTH);
    }

    #[test]
    fn negative_height_is_clamped() {
        let mut f = grounded_at(100.0);
        f.y = -30.0;
        f.vy = -10.0;
        clamp_to_arena(&mut f);
        assert_eq!(f.y, 0.0);
        assert_eq!(f.vy, 0.0);
    }

    #[test]
    fn push_is_symmetric() {
        let mut a = grounded_at(100.0);
        let mut b = grounded_at(130.0);
        resolve_body_collision(&mut a, &mut b, BodyCollision::Push { strength: 5.0 });
        assert_eq!(a.x, 95.0);
        assert_eq!(b.x, 135.0);
    }

    #[test]
    fn separated_bodies_untouched() {
        let mut a = grounded_at(100.0);
        let mut b = grounded_at(150.0); // touching edges only
        resolve_body_collision(&mut a, &mut b, BodyCollision::HardStop);
        assert_eq!(a.x, 100.0);
        assert_eq!(b.x, 150.0);
    }

    #[test]
    fn hard_stop_halts_the_walker() {
        let mut a = grounded_at(100.0);
        let mut b = grounded_at(140.0);
        a.vx = RUN_SPEED; // a walks into b
        resolve_body_collision(&mut a, &mut b, BodyCollision::HardStop);
        assert_eq!(b.x, 140.0);
        assert_eq!(a.x, 90.0);
        assert!(!a.rect().overlaps(&b.rect()));
    }

    #[test]
    fn hard_stop_splits_when_both_press() {
        let mut a = grounded_at(100.0);
        let mut b = grounded_at(140.0);
        a.vx = RUN_SPEED;
        b.vx = -RUN_SPEED;
        resolve_body_collision(&mut a, &mut b, BodyCollision::HardStop);
        assert_eq!(a.x, 95.0);
        assert_eq!(b.x, 145.0);
    }
}
