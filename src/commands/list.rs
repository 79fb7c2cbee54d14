use std::error::Error;
use std::io::Write;

use crate::api::KspClient;
use crate::format::pretty_json;

pub async fn execute<W: Write>(client: &KspClient, out: &mut W) -> Result<(), Box<dyn Error>> {
    let tasks = client.list().await?;
    writeln!(out, "{}", pretty_json(&tasks)?)?;
    Ok(())
}
