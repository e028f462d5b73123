//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire configuration, logging and a storage session to the core contracts.
//! - Run one create/commit/read pass and print the results.

use log::info;
use std::error::Error;
use std::process::ExitCode;
use warehouse_core::{
    core_version, init_logging, init_stderr_logging, open_session_with, SqliteOrderRepository,
    SqliteProductRepository, SqliteUnitOfWork, UnitOfWork, WarehouseConfig, WarehouseService,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("warehouse_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = WarehouseConfig::from_env()?;
    match &config.log_dir {
        Some(dir) => init_logging(&config.log_level, dir)?,
        None => init_stderr_logging(&config.log_level)?,
    }
    info!(
        "event=cli_start module=cli status=ok version={} database_url={}",
        core_version(),
        config.database_url
    );

    let session = open_session_with(&config.storage()?)?;
    let product_repo = SqliteProductRepository::new(&session);
    let order_repo = SqliteOrderRepository::new(&session);
    let service = WarehouseService::new()
        .with_product_repo(&product_repo)
        .with_order_repo(&order_repo);

    let uow = SqliteUnitOfWork::begin(&session)?;
    let product = service.create_product("Widget", 10, 9.99, 1)?;
    let order = service.create_order(vec![product.clone()])?;
    uow.commit()?;
    uow.close()?;

    println!("created product {:?}", service.get_product(product.id)?);
    println!("created order {:?}", service.get_order(order.id)?);
    println!("products in store: {}", service.list_products()?.len());
    Ok(())
}
