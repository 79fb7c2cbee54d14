//! Katalog textů zobrazovaných uživateli.
//!
//! Všechny hlášky, nadpisy tabulek a nápověda jsou v češtině. Texty se
//! neskládají na místě použití, ale vybírají se podle identifikátoru `Msg`,
//! takže případný další jazyk znamená jen další větev v `text`.

/// Identifikátor hlášky v katalogu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    AppAbout,
    HelpTemplate,
    OptionsHeading,
    PositionalHeading,
    HelpFlag,
    VerboseFlag,
    TrainingGroundFlag,
    ApiUrlFlag,
    SubcommandHeading,
    ListAbout,
    StatusAbout,
    GenerateAbout,
    SubmitAbout,
    RunAbout,
    TaskArg,
    SubtaskArg,
    FileArg,
    SolverArg,
    ExampleUsage,
    FileMissing,
    FileUnreadable,
    SettingsInvalid,
    NoConnection,
    NonJsonError,
    UnexpectedResponse,
    SolverSpawnFailed,
    SolverExitFailed,
    SolverIoFailed,
    SubtaskFailed,
    TaskName,
    EarnedPoints,
    ColumnTest,
    ColumnValidity,
    ColumnPoints,
    ColumnVerdict,
    NotGenerated,
    Forever,
    Expired,
    Conjunction,
    SubtaskLine,
}

/// Vrátí český text hlášky
pub fn text(msg: Msg) -> &'static str {
    match msg {
        Msg::AppAbout => "Klient na odevzdávání open-data úloh pomocí KSP API",
        Msg::HelpTemplate => "{about-with-newline}\npoužití: {usage}\n\n{all-args}{after-help}",
        Msg::OptionsHeading => "volitelné argumenty",
        Msg::PositionalHeading => "poziční argumenty",
        Msg::HelpFlag => "zobraz tuto nápovědu a ukonči program",
        Msg::VerboseFlag => "Zobrazit debug log",
        Msg::TrainingGroundFlag => "Zobrazit/pracovat i s úlohami z cvičiště",
        Msg::ApiUrlFlag => "Použít jiný server (např. pro testovací účely)",
        Msg::SubcommandHeading => "Vyber jednu z následujících operací",
        Msg::ListAbout => "Zobrazí všechny úlohy, které lze odevzdávat",
        Msg::StatusAbout => "Zobrazí stav dané úlohy",
        Msg::GenerateAbout => "Vygeneruje a stáhne nový testovací vstup",
        Msg::SubmitAbout => "Odešle odpověď na danou podúlohu",
        Msg::RunAbout => "Spustí Tvůj program na všechny podúlohy dané úlohy",
        Msg::TaskArg => "kód úlohy",
        Msg::SubtaskArg => "číslo podúlohy",
        Msg::FileArg => "cesta k souboru, který chcete odevzdat",
        Msg::SolverArg => "Tvůj program a případně jeho argumenty",
        Msg::ExampleUsage => "Příklad použití",
        Msg::FileMissing => "Soubor {} neexistuje",
        Msg::FileUnreadable => "Soubor {} nelze přečíst",
        Msg::SettingsInvalid => "Konfigurační soubor {} je poškozený",
        Msg::NoConnection => "Nepodařilo se spojit se serverem {}",
        Msg::NonJsonError => "Server vrátil chybu {}, která není ve formátu JSON",
        Msg::UnexpectedResponse => "Server vrátil neočekávanou odpověď",
        Msg::SolverSpawnFailed => "Nepodařilo se spustit program {}",
        Msg::SolverExitFailed => "Program skončil s chybou ({})",
        Msg::SolverIoFailed => "Chyba při komunikaci s programem",
        Msg::SubtaskFailed => "Podúloha {} selhala",
        Msg::TaskName => "Název úlohy",
        Msg::EarnedPoints => "Získané body",
        Msg::ColumnTest => "Test",
        Msg::ColumnValidity => "Délka platnosti",
        Msg::ColumnPoints => "Body",
        Msg::ColumnVerdict => "Výsledek",
        Msg::NotGenerated => "Nevygenerováno",
        Msg::Forever => "stále",
        Msg::Expired => "vypršela",
        Msg::Conjunction => "a",
        Msg::SubtaskLine => "Podúloha",
    }
}

/// Jednotka délky platnosti vstupu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Hour,
    Minute,
    Second,
}

/// Tvary jednotky pro 1, pro 2 až 4 a pro 0 nebo 5 a více
pub fn unit_forms(unit: TimeUnit) -> [&'static str; 3] {
    match unit {
        TimeUnit::Day => ["den", "dny", "dnů"],
        TimeUnit::Hour => ["hodina", "hodiny", "hodin"],
        TimeUnit::Minute => ["minuta", "minuty", "minut"],
        TimeUnit::Second => ["sekunda", "sekundy", "sekund"],
    }
}

/// Vloží argumenty na místa `{}` v textu hlášky, zleva doprava
pub fn fill(msg: Msg, args: &[&dyn std::fmt::Display]) -> String {
    let mut result = String::new();
    let mut args = args.iter();
    let mut rest = text(msg);
    while let Some(pos) = rest.find("{}") {
        result.push_str(&rest[..pos]);
        match args.next() {
            Some(arg) => result.push_str(&arg.to_string()),
            None => result.push_str("{}"),
        }
        rest = &rest[pos + 2..];
    }
    result.push_str(rest);
    result
}

/// Text řádku `Příklad použití: ...` pod nápovědou podpříkazu
pub fn example_usage(command_line: &str) -> String {
    format!("{}: {}", text(Msg::ExampleUsage), command_line)
}
