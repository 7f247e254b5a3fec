// Quick benchmark for getting summary numbers without criterion

use std::time::Instant;

use strand::adjust::Direction;
use strand::builder::RopeBuilder;
use strand::history::position::Position;
use strand::rope::Rope;
use strand::stamp::StampRing;
use strand::tracked::TrackedRope;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn time_ops<F: Fn() -> usize>(f: F, iterations: usize) -> f64 {
    // Warmup
    for _ in 0..3 {
        let _ = f();
    }

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = f();
    }
    let elapsed = start.elapsed();
    return elapsed.as_nanos() as f64 / iterations as f64;
}

fn report(name: &str, ops: usize, nanos: f64) {
    println!(
        "{:<28} {:>12.0} ns total {:>10.1} ns/op",
        name,
        nanos,
        nanos / ops as f64
    );
}

fn main() {
    let size = 10_000;
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let ops: Vec<(usize, u8)> = (0..size)
        .map(|len| (rng.gen_range(0..=len), rng.r#gen::<u8>()))
        .collect();

    println!("strand quick benchmark ({} ops)", size);
    println!("{}", "-".repeat(64));

    let push = time_ops(
        || {
            let mut rope = Rope::new();
            for i in 0..size {
                rope = rope.push(i as u32);
            }
            rope.len()
        },
        10,
    );
    report("rope push", size, push);

    let insert = time_ops(
        || {
            let mut rope = Rope::new();
            for &(pos, byte) in &ops {
                rope = rope.insert_slice(pos, &[byte]).unwrap();
            }
            rope.len()
        },
        10,
    );
    report("rope random insert", size, insert);

    let builder = time_ops(
        || {
            let mut builder = RopeBuilder::new();
            for &(pos, byte) in &ops {
                builder.insert(pos, byte).unwrap();
            }
            builder.len()
        },
        10,
    );
    report("builder random insert", size, builder);

    let tracked = time_ops(
        || {
            let mut text = TrackedRope::from_slice(&[0u8; 8]);
            let position = Position::new(&text, 4, Direction::Positive);
            for &(pos, byte) in &ops {
                text = text.insert_slice(pos.min(text.len()), &[byte]).unwrap();
            }
            position.get_index(&text).unwrap_or(0)
        },
        10,
    );
    report("tracked insert + rebase", size, tracked);

    let stamps = time_ops(
        || {
            let mut ring = StampRing::new();
            let mut order = vec![ring.zero()];
            let mut rng = StdRng::seed_from_u64(7);
            for _ in 0..size {
                let at = rng.gen_range(0..order.len());
                if let Ok(stamp) = ring.new_after(order[at]) {
                    order.insert(at + 1, stamp);
                }
            }
            ring.resize_count()
        },
        10,
    );
    report("stamps random insert", size, stamps);
}
