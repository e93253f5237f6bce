use logsink::{RotatingFileSinkBuilder, TimeZone};
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let appender = RotatingFileSinkBuilder::new("./logs/tracing.log")
        .rotation_unit("M")
        .interval(1)
        .time_zone(TimeZone::Local)
        .extension("txt") // Rotated as tracing.log.2025-04-01_19-55.txt
        .build_writer()?;
    let (non_blocking, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .finish()
        .try_init()?;

    tracing::info!("This is an info message");
    tracing::warn!("This is a warning message");
    tracing::error!("This is an error message");

    Ok(())
}
