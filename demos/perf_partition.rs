use std::hash::{Hash, Hasher};
use std::time::Instant;

use rustc_hash::FxHashSet;
use tilebonk::*;

fn lcg(seed: &mut u32) -> u32 {
    *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
    *seed
}

fn rand_range(seed: &mut u32, lo: i32, hi: i32) -> i32 {
    lo + (lcg(seed) % (hi - lo) as u32) as i32
}

#[derive(Clone)]
struct Mob {
    id: u32,
    hitbox: Aabb,
    last: Aabb,
}

impl PartialEq for Mob {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Mob {}

impl Hash for Mob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Indexed for Mob {
    fn hitbox(&self) -> Aabb { self.hitbox }
    fn last_hitbox(&self) -> Aabb { self.last }
}

fn main() {
    env_logger::init();

    let cfg = PartitionConfig {
        width: Fixed::from_int(4096),
        height: Fixed::from_int(4096),
        rows: 128,
        cols: 128,
        ..PartitionConfig::default()
    };
    let mut partition = Partition::<Mob>::from_config(&cfg).expect("valid partition config");

    let n = 20_000u32;
    let mut seed = 1u32;
    let mut mobs: Vec<Mob> = (0..n)
        .map(|id| {
            let hitbox = Aabb::from_ints(
                rand_range(&mut seed, 0, 4060),
                rand_range(&mut seed, 0, 4060),
                rand_range(&mut seed, 8, 32),
                rand_range(&mut seed, 8, 32),
            );
            Mob { id, hitbox, last: hitbox }
        })
        .collect();

    let t0 = Instant::now();
    for m in &mobs {
        partition.insert(m);
    }
    let t_insert = t0.elapsed();

    let t1 = Instant::now();
    for m in mobs.iter_mut() {
        let d = Vector::from_ints(rand_range(&mut seed, -4, 5), rand_range(&mut seed, -4, 5));
        m.last = m.hitbox;
        m.hitbox = m.hitbox + d;
        partition.update(m, false);
    }
    let t_update = t1.elapsed();

    let queries = 10_000;
    let mut out = FxHashSet::default();
    let mut hits = 0usize;
    let t2 = Instant::now();
    for _ in 0..queries {
        let q = Aabb::from_ints(rand_range(&mut seed, 0, 4000), rand_range(&mut seed, 0, 4000), 64, 64);
        out.clear();
        hits += partition.query_box(&mut out, q, &QueryFilter::new());
    }
    let t_box = t2.elapsed();

    let t3 = Instant::now();
    for _ in 0..queries {
        let a = Vector::from_ints(rand_range(&mut seed, 0, 4096), rand_range(&mut seed, 0, 4096));
        let b = Vector::from_ints(rand_range(&mut seed, 0, 4096), rand_range(&mut seed, 0, 4096));
        out.clear();
        hits += partition.query_segment(&mut out, LineSegment::new(a, b), &QueryFilter::new());
    }
    let t_seg = t3.elapsed();

    let stats = partition.stats();
    println!(
        "N={} grid={}x{} cells={} entries={} max_cell={} insert={:.3}ms update={:.3}ms box_q={:.3}ms seg_q={:.3}ms hits={}",
        n,
        stats.rows,
        stats.cols,
        stats.cells_allocated,
        stats.entries,
        stats.max_cell_len,
        t_insert.as_secs_f64() * 1e3,
        t_update.as_secs_f64() * 1e3,
        t_box.as_secs_f64() * 1e3,
        t_seg.as_secs_f64() * 1e3,
        hits
    );
}
