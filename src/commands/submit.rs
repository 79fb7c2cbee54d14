//! Odevzdání výstupu jedné podúlohy.
//!
//! ## Hlavní funkce
//! - `execute` - vstupní bod příkazu `submit`
//! - `read_output_file` - načte soubor s odpovědí jako bajty
//!
//! ## Průběh odevzdání
//! 1. `read_output_file` načte soubor; neexistující soubor je chyba ještě před
//!    jakýmkoli požadavkem na server.
//! 2. `KspClient::submit` pošle obsah souboru jako tělo požadavku.
//! 3. Odpověď serveru (verdikt a body) se vypíše jako odsazený JSON.
//!
//! ## Poznámky
//! - Obsah souboru se posílá beze změny, i když nejde o platné UTF-8.

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::api::KspClient;
use crate::format::pretty_json;
use crate::messages::{fill, Msg};

pub async fn execute<W: Write>(
    client: &KspClient,
    task: &str,
    subtask: u32,
    file: &Path,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let content = read_output_file(file)?;
    let response = client.submit(task, subtask, &content).await?;
    writeln!(out, "{}", pretty_json(&response)?)?;
    Ok(())
}

/// Načte soubor s odpovědí
///
/// # Argumenty
/// - `path`: cesta k souboru zadaná na příkazové řádce.
///
/// # Návratová hodnota
/// - `Ok(Vec<u8>)`: obsah souboru.
/// - `Err(Box<dyn Error>)`: soubor neexistuje nebo ho nelze přečíst.
fn read_output_file(path: &Path) -> Result<Vec<u8>, Box<dyn Error>> {
    if !path.exists() {
        return Err(fill(Msg::FileMissing, &[&path.display()]).into());
    }
    let content = fs::read(path)
        .map_err(|e| format!("{}: {}", fill(Msg::FileUnreadable, &[&path.display()]), e))?;
    Ok(content)
}
