//! Connect with a YAML config and print the rows of one statement.
//!
//! ```text
//! cargo run -p database --example query -- cassandra.yml "SELECT * FROM system.local"
//! ```

use core_config::{
    Environment,
    tracing::{init_tracing, install_color_eyre},
};
use database::cassandra::connect_from_yaml;
use eyre::{Result, WrapErr};

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "cassandra.yml".to_string());
    let cql = args
        .next()
        .unwrap_or_else(|| "SELECT release_version FROM system.local".to_string());

    let session = connect_from_yaml(&path)
        .await
        .wrap_err_with(|| format!("Failed to connect using {path}"))?;

    let rows = session.query(&cql).await.wrap_err("Query failed")?;

    for (i, row) in rows.iter().enumerate() {
        let mut columns: Vec<_> = row.iter().collect();
        columns.sort_by(|a, b| a.0.cmp(b.0));
        let rendered: Vec<String> = columns.iter().map(|(k, v)| format!("{k}={v}")).collect();
        println!("{i}: {}", rendered.join(", "));
    }
    println!("({} rows)", rows.len());

    Ok(())
}
