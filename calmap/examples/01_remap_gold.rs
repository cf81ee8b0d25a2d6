mod common;
use calmap::{Calmap, CollapseFunc, CollapsePeriod, RemapRequest, RollingWindow};
use common::get_connector;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Log pipeline decisions when RUST_LOG asks for them (build with `--features tracing`).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // 2. Build the orchestrator over one connector.
    let calmap = Calmap::builder().with_connector(get_connector()?).build()?;

    // 3. Month-end AM fixings for the first quarter of 2020.
    let req = RemapRequest::new("LBMA/GOLD", "USD (AM)", ["2020-01", "2020-02", "2020-03"]);
    println!("{}", calmap.remap(&req).await?.to_json()?);

    // 4. Monthly maxima smoothed over two months, every field.
    let req = RemapRequest::new("LBMA/GOLD", "ALL", ["2020-Mar", "2020-Jun", "2020-Sep"])
        .with_collapse(CollapsePeriod::Monthly, CollapseFunc::Max)
        .with_rolling(RollingWindow::new(2));
    println!("{}", calmap.remap(&req).await?.to_json()?);

    // 5. The raw JSON surface used by embedders.
    let body = r#"{"symbol":"LBMA/GOLD","column":"USD (PM)","dates":["2020-02-03","2020-02-04"]}"#;
    println!("{}", calmap.handle_json(body).await);

    Ok(())
}
