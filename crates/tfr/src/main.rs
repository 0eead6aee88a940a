use std::sync::Arc;

use tfr_core::config::Config;

#[tokio::main]
async fn main() -> Result<(), tfr_core::Error> {
    tfr_core::logging::init("tfr")?;

    let cfg = Arc::new(Config::load()?);

    tfr_telegram::router::run_polling(cfg)
        .await
        .map_err(|e| tfr_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
