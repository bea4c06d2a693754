use cdek::{CdekClientBuilder, DeliveryPointsQuery, PointType};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CdekClientBuilder::from_env()?.build()?;
    let city_id = std::env::var("CDEK_CITY_ID")
        .ok()
        .map(|raw| raw.parse::<u32>())
        .transpose()?;

    let points = client
        .delivery_points(DeliveryPointsQuery {
            city_id,
            point_type: PointType::All,
            ..DeliveryPointsQuery::default()
        })
        .await?;

    for point in points.pvz {
        println!(
            "{} [{}] {} | cashless: {:?}, cod: {:?}",
            point.code.as_deref().unwrap_or("-"),
            point.point_type.as_deref().unwrap_or("-"),
            point.full_address.or(point.address).unwrap_or_default(),
            point.have_cashless,
            point.allowed_cod
        );
    }

    Ok(())
}
