//! Read status from a Lara radio and skip to the next station
//!
//! ```sh
//! LARA_HOST=192.168.1.50 LARA_USER=admin LARA_PASSWORD=admin \
//!     RUST_LOG=lara_api=debug cargo run -p lara-api --example basic_usage
//! ```

use std::time::Duration;

use anyhow::Context;
use lara_api::{ClientConfig, LaraClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lara_api=info".parse()?)
                .add_directive("http_client=info".parse()?),
        )
        .init();

    let config = ClientConfig::from_env()?.with_connect_timeout(Duration::from_secs(5));
    println!("=== Lara radio at {} ===\n", config.host);

    let mut client = LaraClient::new(config);

    let info = client.get_basic_info().await?;
    println!("Name:     {}", info.name);
    println!("Firmware: {}", info.firmware);
    println!("Hardware: {}", info.hardware);
    println!("Address:  {}\n", info.ip_address);

    let signed_in = client.sign_in().await.context("sign-in request failed")?;
    if !signed_in {
        anyhow::bail!("device rejected the credentials");
    }

    let stations = client.get_stations().await?;
    println!("{} stations:", stations.count);
    for (i, station) in stations.entries.iter().enumerate() {
        println!("  {:>2}. {} ({}:{})", i, station.name, station.domain, station.port);
    }

    let eq = client.get_equalizer().await?;
    println!("\nEqualizer band 1 levels: {:?}", eq.bands[0].levels);

    let result = client.next_station().await?;
    println!(
        "\nNow playing '{}' at volume {} (muted: {:?})",
        result.label, result.volume, result.muted
    );

    Ok(())
}
