use cdek::{CdekClientBuilder, CityRef, Good, ShippingCostRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CdekClientBuilder::from_env()?.build()?;
    let sender: u32 = std::env::var("CDEK_SENDER_CITY")
        .unwrap_or_else(|_| "270".to_owned())
        .parse()?;
    let receiver: u32 = std::env::var("CDEK_RECEIVER_CITY")
        .unwrap_or_else(|_| "44".to_owned())
        .parse()?;

    let request = ShippingCostRequest::builder(CityRef::Id(sender), CityRef::Id(receiver))
        .good(Good::Dimensions {
            weight: 0.5,
            length: 20,
            width: 15,
            height: 10,
        })
        .tariffs([136_u32, 137, 3])
        .build()?;

    let cost = client.shipping_cost(request).await?;
    println!(
        "tariff: {}, price: {} {}, days: {:?}..{:?}, dates: {}..{}, heavy: {}, oversized: {}",
        cost.tariff_id.value(),
        cost.price,
        cost.currency.as_deref().unwrap_or("RUB"),
        cost.delivery_period_min,
        cost.delivery_period_max,
        cost.delivery_date_min,
        cost.delivery_date_max,
        cost.is_heavy(),
        cost.is_over_sized()
    );

    Ok(())
}
