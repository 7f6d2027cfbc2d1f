use tilebonk::*;

const LEVEL: &[&str] = &[
    "................",
    "................",
    "..........T.....",
    "..........H....#",
    "..........H....#",
    "################",
];

fn report<W: WorldOracle + ?Sized>(step: &str, c: &BoxCollider<'_, W>) {
    let b = c.body();
    println!(
        "{step:<18} body=({:.2}, {:.2}) landed={} block={} ladder_top={} blocked_right={} down={:?}",
        b.left().to_f64(),
        b.top().to_f64(),
        c.landed(),
        c.landed_on_block(),
        c.landed_on_top_ladder(),
        c.blocked_right(),
        c.down_flags()
    );
}

fn main() {
    env_logger::init();

    let world = TileWorld::from_layout(WorldConfig::default(), LEVEL).expect("level layout");
    let cfg = ColliderConfig { track_placements: true, ..ColliderConfig::default() };
    let mut body = BoxCollider::new(&world, Aabb::from_ints(40, 0, 14, 16), &cfg);
    report("spawn", &body);

    // Fall with gravity until landed.
    let gravity = Vector::new(Fixed::ZERO, Fixed::from_f64(0.25));
    let mut vy = Fixed::ZERO;
    let mut ticks = 0;
    while !body.landed() && ticks < 600 {
        vy = (vy + gravity.y).min(Fixed::from_int(6));
        body.move_contact_solid(Vector::new(Fixed::ZERO, vy), vy, Direction::ALL, CollisionFlags::NONE);
        ticks += 1;
    }
    report("landed", &body);

    // Walk right into the wall at column 15.
    let speed = Fixed::from_f64(1.5);
    for _ in 0..200 {
        if body.blocked_right() { break; }
        body.move_contact_solid(Vector::new(speed, Fixed::ZERO), speed, Direction::ALL, CollisionFlags::NONE);
        if !body.landed() {
            body.move_contact_floor(Fixed::from_int(4), CollisionFlags::NONE);
        }
    }
    report("hit wall", &body);

    // Hop onto the ladder top and center on it.
    body.set_body(Aabb::from_ints(158, 8, 14, 16));
    if body.try_move_contact_floor(Fixed::from_int(16), CollisionFlags::NONE) {
        report("on ladder top", &body);
    }
    if body.adjust_on_the_ladder() {
        report("centered", &body);
    }
}
