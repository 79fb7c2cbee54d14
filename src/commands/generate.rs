use std::error::Error;
use std::io::Write;

use crate::api::KspClient;

/// Stáhne vstup podúlohy a vypíše ho
///
/// Server vstup vygeneruje jen tehdy, když ještě žádný platný neexistuje.
pub async fn execute<W: Write>(
    client: &KspClient,
    task: &str,
    subtask: u32,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut input = client.get_test(task, subtask, true).await?;
    if !input.ends_with('\n') {
        input.push('\n');
    }
    write!(out, "{}", input)?;
    Ok(())
}
