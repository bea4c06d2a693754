use cdek::{CdekClientBuilder, LocationQuery};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CdekClientBuilder::from_env()?.build()?;
    let query = LocationQuery {
        size: 20,
        ..LocationQuery::default()
    };

    for region in client.regions(query.clone()).await? {
        println!(
            "region {:>4}: {}",
            region.code.as_deref().unwrap_or("-"),
            region.name.as_deref().unwrap_or("-")
        );
    }

    for city in client.cities(query).await? {
        println!(
            "city {:>6}: {} ({})",
            city.code.as_deref().unwrap_or("-"),
            city.name.as_deref().unwrap_or("-"),
            city.region.as_deref().unwrap_or("-")
        );
    }

    Ok(())
}
