use cdek::{CdekClientBuilder, DispatchNumber, StatusReport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CdekClientBuilder::from_env()?.build()?;
    let dispatch_numbers = std::env::args()
        .skip(1)
        .map(DispatchNumber::new)
        .collect::<Result<Vec<_>, _>>()?;

    let request = StatusReport::new(dispatch_numbers)?;
    for order in client.orders_statuses(request).await? {
        if let Some(code) = order.error_code() {
            println!("error {code}: {}", order.message().unwrap_or_default());
            continue;
        }

        let status = order.node("Status");
        println!(
            "{}: {} ({} states)",
            order.text("DispatchNumber").unwrap_or("-"),
            status
                .and_then(|status| status.text("Description"))
                .unwrap_or("-"),
            status.map_or(0, |status| status.list("State").len())
        );
    }

    Ok(())
}
