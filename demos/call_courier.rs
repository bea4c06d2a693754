use cdek::{CallCourier, CallOptions, CallWindow, CdekClientBuilder, CourierAddress};
use chrono::{Duration, Local, NaiveTime};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CdekClientBuilder::from_env()?.build()?;
    let tomorrow = Local::now().date_naive() + Duration::days(1);
    let begin = NaiveTime::from_hms_opt(10, 0, 0).ok_or("invalid time")?;
    let end = NaiveTime::from_hms_opt(15, 0, 0).ok_or("invalid time")?;

    let mut request = CallCourier::new();
    let call = request.add_call(
        CallWindow::new(tomorrow, begin, end),
        CallOptions {
            sender_city_id: Some(270),
            sender_name: Some("Demo sender".to_owned()),
            weight: Some(1000),
            comment: Some("demo pickup".to_owned()),
            ..CallOptions::default()
        },
    );
    request.add_address(
        call,
        CourierAddress {
            street: "Ленина".to_owned(),
            house: "1".to_owned(),
            flat: None,
        },
    )?;

    let call = client.call_courier(request).await?;
    println!("call number: {:?}", call.text("Number"));

    Ok(())
}
