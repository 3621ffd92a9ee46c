//! Aligning two receiver channels that start 50 samples apart.
//!
//! Two channels sample the same clock at 1 MS/s. Channel 1 starts 50
//! samples later than channel 0, so at equal sample indices channel 1 is
//! 50 microseconds ahead. The aligner trims channel 0's head until index
//! `k` of both outputs refers to the same instant.
//!
//! Run with: `cargo run --example two_stream_alignment`
//!
//! Set `RUST_LOG=align_streams=debug` to watch the correction rounds.

use align_streams::prelude::*;
use tracing_subscriber::EnvFilter;

const FS: f64 = 1_000_000.0;
const LEN: u64 = 10_000;
const TAG_PERIOD: u64 = 1_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Two Stream Alignment ===\n");

    let mut block = AlignStreams::new(2, true)?;
    let rates = block.aligner_mut().subscribe();
    let mut driver = BlockDriver::new(block)?;
    driver.start()?;

    let epoch = GnssTime::from_secs(1_700_000_000);
    for (stream, lead) in [(0usize, 0u64), (1, 50)] {
        // Each sample carries its global index so the result is easy to check
        let samples: Vec<Sample> = (0..LEN)
            .map(|j| Sample::new((lead + j) as f32, 0.0))
            .collect();
        driver.push_samples(stream, &samples)?;
        driver.push_tag(stream, StreamTag::rx_rate(0, FS))?;

        for j in (0..LEN).step_by(TAG_PERIOD as usize) {
            let nanos = (lead + j) as i128 * 1_000;
            if let Some(time) = epoch.checked_add_nanos(nanos) {
                driver.push_tag(stream, StreamTag::rx_time_at(j, time))?;
            }
        }
    }

    let produced = driver.run()?;
    let aligner = driver.block().aligner();

    if let Ok(Some(announcement)) = rates.try_recv() {
        println!("Rates announced on '{}': {:?}", announcement.key(), announcement.rates);
    }
    println!("Phase:     {:?}", aligner.phase());
    println!("Delays:    {:?}", aligner.delays());
    println!("Produced:  {produced} samples per stream");
    println!("Stats:     {:?}", aligner.stats());

    for stream in 0..driver.num_streams() {
        let head: Vec<f32> = driver.output(stream).iter().take(4).map(|s| s.re).collect();
        println!("Stream {stream} head: {head:?}");
    }

    Ok(())
}
