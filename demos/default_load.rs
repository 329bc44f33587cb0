use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info_span};

use logstash_layout::config::LayoutConfig;
use logstash_layout::init::{init_logstash_tracing_with_config, InitConfig};
use logstash_layout::SchemaVersion;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let layout = Arc::new(LayoutConfig::default());
    layout.set_user_fields("service:default_load,env:dev")?;
    init_logstash_tracing_with_config(InitConfig {
        schema: SchemaVersion::V1,
        layout: Arc::clone(&layout),
        enable_console: false,
    })?;

    let n: u64 = 100_000;
    let start = Instant::now();

    let span = info_span!("load", run = 1u64);
    let _guard = span.enter();
    for i in 0..n {
        if i == n / 2 {
            layout.set_location_info(false);
        }
        error!(iteration = i, "default load test error");
    }

    let elapsed = start.elapsed();
    eprintln!("default config: formatted {} events in {:?} (~{:.0} ev/s)",
        n,
        elapsed,
        n as f64 / elapsed.as_secs_f64()
    );
    Ok(())
}
