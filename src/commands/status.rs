use chrono::Utc;
use std::error::Error;
use std::io::Write;

use crate::api::KspClient;
use crate::format::status_table;

pub async fn execute<W: Write>(
    client: &KspClient,
    task: &str,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let status = client.status(task).await?;
    writeln!(out, "{}", status_table(&status, Utc::now()))?;
    Ok(())
}
