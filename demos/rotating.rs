use {
    logsink::{ChannelRegistry, LogSinkBuilder, RotatingFileSinkBuilder},
    std::{thread, time::Duration},
};

/// Writes a message every five seconds to a file that rotates every second,
/// leaving one rotated copy per message.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = ChannelRegistry::new();
    let file = RotatingFileSinkBuilder::new("./logs/test.log")
        .rotation_unit("S")
        .interval(1)
        .build()?;
    let logger = LogSinkBuilder::new(&registry).name("TEST").sink(file).build()?;

    for _ in 0..5 {
        logger.log("test");
        thread::sleep(Duration::from_secs(5));
    }

    Ok(())
}
