use sea_orm_migration::prelude::*;

use syncline_bridge_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
