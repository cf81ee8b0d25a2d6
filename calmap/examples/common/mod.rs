use calmap::CalmapConnector;
use std::sync::Arc;

/// Fixture connector when `CALMAP_EXAMPLES_USE_MOCK` is set, Quandl otherwise.
pub fn get_connector() -> Result<Arc<dyn CalmapConnector>, calmap::CalmapError> {
    if std::env::var("CALMAP_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Connector for CI) ---");
        Ok(Arc::new(calmap_mock::MockConnector::new()))
    } else {
        let cfg = calmap_quandl::QuandlConfig::from_env();
        Ok(Arc::new(calmap_quandl::QuandlConnector::new(cfg)?))
    }
}
