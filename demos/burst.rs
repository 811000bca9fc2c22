use std::sync::Arc;

use hob_log::{FileSink, FileSinkConfig, LogEvent, Severity, Sink, SinkBaseConfig};

const ROUND: usize = 256;
const NUM_LOG: usize = 128;

fn main() -> hob_log::Result<()> {
  let _ = core_affinity::set_for_current(core_affinity::CoreId { id: 6 });

  let path = std::env::temp_dir().join("hob-log-burst.log");
  let sink = Arc::new(FileSink::new(
    "burst",
    &FileSinkConfig {
      base: SinkBaseConfig {
        format: "[{TIME}] [{TAG}] {FILE:short}#{LINE} {MESSAGE}".to_string(),
        async_mode: true,
        worker_core: Some(7),
        ..SinkBaseConfig::default()
      },
      path: path.clone(),
      append: false,
    },
  )?);

  let mut batch_costs = Vec::<u64>::with_capacity(ROUND);
  let mut total_cost_ns = 0u64;

  for round in 0..ROUND {
    let start = minstant::Instant::now();
    for id in 0..NUM_LOG {
      let id = std::hint::black_box(id);
      let message = format!("curr {} u {}", round, id);
      sink.log(&LogEvent::new(Severity::Info.bit(), "info", file!(), "burst::main", line!(), &message));
    }
    let cost_ns = start.elapsed().as_nanos() as u64;
    total_cost_ns += cost_ns;
    batch_costs.push(cost_ns);
    std::thread::park_timeout(std::time::Duration::from_micros(10_000));
  }

  let lost = sink.lost_logs();
  drop(sink);

  let total_logs = (ROUND * NUM_LOG) as f64;
  println!("== burst bench ==");
  println!("ROUND={} NUM_LOG={} total_cost_ns={} lost={}", ROUND, NUM_LOG, total_cost_ns, lost);
  println!("avg per log: {:.3} ns", total_cost_ns as f64 / total_logs);
  println!(
    "batch ns: min={} p50={} p90={} p99={} p999={} max={}",
    percentile_ns(&batch_costs, 0.0),
    percentile_ns(&batch_costs, 0.50),
    percentile_ns(&batch_costs, 0.90),
    percentile_ns(&batch_costs, 0.99),
    percentile_ns(&batch_costs, 0.999),
    percentile_ns(&batch_costs, 1.0),
  );
  println!("written to {}", path.display());
  Ok(())
}

fn percentile_ns(v: &[u64], p: f64) -> u64 {
  let mut v = v.to_vec();
  v.sort_unstable();
  let n = v.len();
  let idx = ((n as f64 - 1.0) * p).floor() as usize;
  v[idx.min(n - 1)]
}
