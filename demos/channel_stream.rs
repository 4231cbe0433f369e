//! A producer thread feeds a channel; the sampler consumes it as a stream.
//!
//! Run with `cargo run --example channel_stream`.

use std::sync::mpsc;
use std::thread;

use strom::Sampler;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let k: i64 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(5);
    let sampler = Sampler::try_new(k)?.with_seed(7);

    let (tx, rx) = mpsc::sync_channel(64);
    let producer = thread::spawn(move || {
        for line in 0..1_000u32 {
            if tx.send(format!("event-{line:04}")).is_err() {
                break;
            }
        }
        // Dropping `tx` ends the stream.
    });

    let picked = sampler.sample(rx);
    producer.join().map_err(|_| "producer panicked")?;

    println!("k={} picked {} of 1000 events:", sampler.k(), picked.len());
    for event in &picked {
        println!("  {event}");
    }

    Ok(())
}
