use std::io;

use cdek::{
    ActNumber, CdekClientBuilder, DeliveryAddress, DeliveryRequest, ItemDetails, OrderDetails,
    OrderNumber, OrderOptions, PackageOptions, PhoneNumber, PvzCode, RawPhoneNumber,
    RecipientName, TariffCode,
};
use tracing_subscriber::EnvFilter;

fn required(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = CdekClientBuilder::from_env()?.build()?;
    let number = OrderNumber::new(required("CDEK_ORDER_NUMBER")?)?;
    // International format, e.g. +79251234567.
    let phone = PhoneNumber::parse(None, required("CDEK_RECIPIENT_PHONE")?)?;

    let mut request = DeliveryRequest::new(ActNumber::new(number.as_str())?);
    let order = request.add_order(
        OrderDetails {
            number,
            tariff_type_code: TariffCode::new(136),
            recipient_name: RecipientName::new(required("CDEK_RECIPIENT_NAME")?)?,
            phone: RawPhoneNumber::from(phone),
        },
        OrderOptions {
            send_city_code: Some(270),
            rec_city_code: Some(44),
            comment: Some("demo order".to_owned()),
            ..OrderOptions::default()
        },
    );
    request.add_address(
        order,
        DeliveryAddress::Pickup(PvzCode::new(required("CDEK_PVZ_CODE")?)?),
    )?;
    let package = request.add_package(
        order,
        PackageOptions {
            size_a: Some(20),
            size_b: Some(15),
            size_c: Some(10),
            weight: Some(500),
            ..PackageOptions::default()
        },
    )?;
    request.add_item(package, ItemDetails::new("SKU-1", 500, 1000.0).amount(1))?;

    for order in client.create_orders(request).await? {
        println!(
            "number: {:?}, dispatch number: {:?}",
            order.text("Number"),
            order.text("DispatchNumber")
        );
    }

    Ok(())
}
