//! Spuštění řešitele na všechny podúlohy úlohy.
//!
//! ## Průběh
//! 1. `status` zjistí počet podúloh `N`.
//! 2. Pro každou podúlohu `1..=N` v pořadí ze serveru:
//!    - `get_test` stáhne vstup (a případně ho nechá vygenerovat),
//!    - řešitel dostane vstup na standardní vstup, jeho standardní výstup se zachytí,
//!    - `submit` odevzdá zachycený výstup,
//!    - vypíše se řádek s verdiktem a body.
//!
//! Selhání řešitele nebo serveru běh ukončí; chyba uvádí číslo podúlohy a
//! další podúlohy se už nezkouší.

use std::error::Error;
use std::fmt;
use std::io::{self, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use log::debug;

use crate::api::{ApiError, KspClient, SubmitVerdict};
use crate::format::verdict_line;
use crate::messages::{fill, text, Msg};

/// Program, který z textu vstupu vyrobí odpověď
#[cfg_attr(test, mockall::automock)]
pub trait Solver {
    fn solve(&self, input: &[u8]) -> Result<Vec<u8>, SolverError>;
}

#[derive(Debug)]
pub enum SolverError {
    Spawn { program: String, source: io::Error },
    Io(io::Error),
    Exit(ExitStatus),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Spawn { program, source } => write!(
                f,
                "{}: {}",
                fill(Msg::SolverSpawnFailed, &[program]),
                source
            ),
            SolverError::Io(e) => write!(f, "{}: {}", text(Msg::SolverIoFailed), e),
            SolverError::Exit(status) => f.write_str(&fill(Msg::SolverExitFailed, &[status])),
        }
    }
}

impl Error for SolverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SolverError::Spawn { source, .. } => Some(source),
            SolverError::Io(e) => Some(e),
            SolverError::Exit(_) => None,
        }
    }
}

/// Řešitel spouštěný jako samostatný proces
pub struct CommandSolver {
    program: String,
    args: Vec<String>,
}

impl CommandSolver {
    pub fn new(program: impl Into<String>, args: &[String]) -> Self {
        CommandSolver {
            program: program.into(),
            args: args.to_vec(),
        }
    }
}

impl Solver for CommandSolver {
    fn solve(&self, input: &[u8]) -> Result<Vec<u8>, SolverError> {
        debug!("{} {:?}", self.program, self.args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| SolverError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SolverError::Io(io::ErrorKind::BrokenPipe.into()))?;

        // vstup se zapisuje z vlákna, aby velký výstup nezablokoval zápis
        let (output, written) = thread::scope(|scope| {
            let writer = scope.spawn(move || stdin.write_all(input));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::ErrorKind::Other.into()));
            (output, written)
        });
        let output = output.map_err(SolverError::Io)?;
        if let Err(e) = written {
            // řešitel nemusí dočíst celý vstup
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(SolverError::Io(e));
            }
        }
        if !output.status.success() {
            return Err(SolverError::Exit(output.status));
        }
        Ok(output.stdout)
    }
}

#[derive(Debug)]
pub enum RunError {
    Status(ApiError),
    Api { subtask: u32, source: ApiError },
    Solver { subtask: u32, source: SolverError },
    Output(io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Status(e) => write!(f, "{}", e),
            RunError::Api { subtask, source } => {
                write!(f, "{}: {}", fill(Msg::SubtaskFailed, &[subtask]), source)
            }
            RunError::Solver { subtask, source } => {
                write!(f, "{}: {}", fill(Msg::SubtaskFailed, &[subtask]), source)
            }
            RunError::Output(e) => write!(f, "{}", e),
        }
    }
}

impl Error for RunError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunError::Status(e) => Some(e),
            RunError::Api { source, .. } => Some(source),
            RunError::Solver { source, .. } => Some(source),
            RunError::Output(e) => Some(e),
        }
    }
}

pub async fn execute<W: Write>(
    client: &KspClient,
    task: &str,
    solver_command: &[String],
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let (program, args) = solver_command
        .split_first()
        .ok_or_else(|| text(Msg::SolverArg))?;
    let solver = CommandSolver::new(program.as_str(), args);
    run_all(client, task, &solver, out).await?;
    Ok(())
}

/// Projde všechny podúlohy a vrátí verdikty v pořadí podúloh
pub async fn run_all<S: Solver + ?Sized, W: Write>(
    client: &KspClient,
    task: &str,
    solver: &S,
    out: &mut W,
) -> Result<Vec<SubmitVerdict>, RunError> {
    let status = client.status(task).await.map_err(RunError::Status)?;
    let count = status.subtasks.len() as u32;
    debug!("{}: {} podúloh", task, count);

    let mut verdicts = Vec::new();
    for subtask in 1..=count {
        let api_error = |source: ApiError| RunError::Api { subtask, source };

        let input = client
            .get_test(task, subtask, true)
            .await
            .map_err(api_error)?;
        let output = solver
            .solve(input.as_bytes())
            .map_err(|source| RunError::Solver { subtask, source })?;
        let response = client
            .submit(task, subtask, &output)
            .await
            .map_err(api_error)?;
        let verdict: SubmitVerdict = serde_json::from_value(response)
            .map_err(|e| api_error(ApiError::Decode(e)))?;

        writeln!(out, "{}", verdict_line(subtask, &verdict)).map_err(RunError::Output)?;
        verdicts.push(verdict);
    }
    Ok(verdicts)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::commands::config::ClientConfig;
    use crate::credentials::Token;
    use mockall::Sequence;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use std::path::PathBuf;

    fn client_for(server: &ServerGuard) -> KspClient {
        let config = ClientConfig {
            api_url: format!("{}/api/", server.url()),
            token_path: PathBuf::from("unused"),
            training_ground: false,
        };
        KspClient::new(&config, Token::new("mock_token"))
    }

    async fn mock_status(server: &mut ServerGuard, subtasks: usize) -> Mock {
        let subtasks: Vec<String> = (1..=subtasks)
            .map(|id| {
                format!(
                    r#"{{"id": {}, "input_generated": false, "points": 0, "max_points": 5}}"#,
                    id
                )
            })
            .collect();
        server
            .mock("GET", "/api/tasks/status")
            .match_query(Matcher::UrlEncoded("task".into(), "32-Z4-1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"name": "Úloha", "points": 0, "max_points": 15, "subtasks": [{}]}}"#,
                subtasks.join(",")
            ))
            .create_async()
            .await
    }

    async fn mock_input(server: &mut ServerGuard, subtask: u32, hits: usize) -> Mock {
        server
            .mock("POST", "/api/tasks/input")
            .match_header("Authorization", "Bearer mock_token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("task".into(), "32-Z4-1".into()),
                Matcher::UrlEncoded("subtask".into(), subtask.to_string()),
                Matcher::UrlEncoded("generate".into(), "true".into()),
            ]))
            .with_status(200)
            .with_body(format!("in{}", subtask))
            .expect(hits)
            .create_async()
            .await
    }

    async fn mock_submit(server: &mut ServerGuard, subtask: u32, hits: usize) -> Mock {
        server
            .mock("POST", "/api/tasks/submit")
            .match_header("Authorization", "Bearer mock_token")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("task".into(), "32-Z4-1".into()),
                Matcher::UrlEncoded("subtask".into(), subtask.to_string()),
            ]))
            .match_body(Matcher::Exact(format!("out{}", subtask)))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"verdict": "OK", "points": {}, "max_points": 5}}"#,
                subtask
            ))
            .expect(hits)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_run_all_visits_every_subtask_in_order() {
        let mut server = Server::new_async().await;
        let status = mock_status(&mut server, 3).await;
        let mut mocks = Vec::new();
        for subtask in 1..=3 {
            mocks.push(mock_input(&mut server, subtask, 1).await);
            mocks.push(mock_submit(&mut server, subtask, 1).await);
        }

        let mut solver = MockSolver::new();
        let mut seq = Sequence::new();
        for subtask in 1..=3u32 {
            let expected_input = format!("in{}", subtask);
            let output = format!("out{}", subtask);
            solver
                .expect_solve()
                .withf(move |input| input.to_vec() == expected_input.as_bytes())
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| Ok(output.clone().into_bytes()));
        }

        let mut out = Vec::new();
        let verdicts = run_all(&client_for(&server), "32-Z4-1", &solver, &mut out)
            .await
            .unwrap();

        status.assert_async().await;
        for mock in &mocks {
            mock.assert_async().await;
        }
        assert_eq!(verdicts.len(), 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Podúloha 1: OK (1/5b)\nPodúloha 2: OK (2/5b)\nPodúloha 3: OK (3/5b)\n"
        );
    }

    #[tokio::test]
    async fn test_run_all_stops_on_solver_failure() {
        let mut server = Server::new_async().await;
        let _status = mock_status(&mut server, 3).await;
        let input_1 = mock_input(&mut server, 1, 1).await;
        let submit_1 = mock_submit(&mut server, 1, 1).await;
        let input_2 = mock_input(&mut server, 2, 1).await;
        let submit_2 = mock_submit(&mut server, 2, 0).await;
        let input_3 = mock_input(&mut server, 3, 0).await;

        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .withf(|input| input.to_vec() == b"in1")
            .times(1)
            .returning(|_| Ok(b"out1".to_vec()));
        solver
            .expect_solve()
            .withf(|input| input.to_vec() == b"in2")
            .times(1)
            .returning(|_| Err(SolverError::Io(io::ErrorKind::BrokenPipe.into())));

        let mut out = Vec::new();
        let result = run_all(&client_for(&server), "32-Z4-1", &solver, &mut out).await;

        let error = result.unwrap_err();
        assert!(matches!(error, RunError::Solver { subtask: 2, .. }));
        assert!(error.to_string().starts_with("Podúloha 2 selhala"));
        assert_eq!(String::from_utf8(out).unwrap(), "Podúloha 1: OK (1/5b)\n");
        for mock in [&input_1, &submit_1, &input_2, &submit_2, &input_3] {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_run_all_reports_rejected_submit() {
        let mut server = Server::new_async().await;
        let _status = mock_status(&mut server, 2).await;
        let _input = mock_input(&mut server, 1, 1).await;
        let _submit = server
            .mock("POST", "/api/tasks/submit")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"errorMsg": "Vstup vypršel"}"#)
            .create_async()
            .await;

        let mut solver = MockSolver::new();
        solver
            .expect_solve()
            .times(1)
            .returning(|_| Ok(b"out1".to_vec()));

        let mut out = Vec::new();
        let error = run_all(&client_for(&server), "32-Z4-1", &solver, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(error, RunError::Api { subtask: 1, .. }));
        assert_eq!(error.to_string(), "Podúloha 1 selhala: Vstup vypršel");
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_run_all_without_subtasks() {
        let mut server = Server::new_async().await;
        let status = mock_status(&mut server, 0).await;

        let mut solver = MockSolver::new();
        solver.expect_solve().never();

        let mut out = Vec::new();
        let verdicts = run_all(&client_for(&server), "32-Z4-1", &solver, &mut out)
            .await
            .unwrap();
        status.assert_async().await;
        assert!(verdicts.is_empty());
        assert!(out.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_execute_with_real_process() {
        let mut server = Server::new_async().await;
        let _status = mock_status(&mut server, 1).await;
        let _input = mock_input(&mut server, 1, 1).await;
        let submit = server
            .mock("POST", "/api/tasks/submit")
            .match_query(Matcher::Any)
            .match_body(Matcher::Exact("IN1".to_string()))
            .with_status(200)
            .with_body(r#"{"verdict": "OK", "points": 5, "max_points": 5}"#)
            .create_async()
            .await;

        let command = vec!["tr".to_string(), "a-z".to_string(), "A-Z".to_string()];
        let mut out = Vec::new();
        execute(&client_for(&server), "32-Z4-1", &command, &mut out)
            .await
            .unwrap();
        submit.assert_async().await;
        assert_eq!(String::from_utf8(out).unwrap(), "Podúloha 1: OK (5/5b)\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_solver_pipes_input_to_output() {
        let solver = CommandSolver::new("cat", &[]);
        let output = solver.solve(b"1 2 3\n").unwrap();
        assert_eq!(output, b"1 2 3\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_solver_large_input() {
        let input = "0123456789\n".repeat(200_000);
        let solver = CommandSolver::new("cat", &[]);
        let output = solver.solve(input.as_bytes()).unwrap();
        assert_eq!(output.len(), input.len());
    }

    #[cfg(unix)]
    #[test]
    fn test_command_solver_passes_arguments() {
        let args = vec!["-c".to_string(), "echo \"$0 $1\"".to_string(), "a".to_string(), "b".to_string()];
        let solver = CommandSolver::new("sh", &args);
        let output = solver.solve(b"").unwrap();
        assert_eq!(output, b"a b\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_solver_non_zero_exit() {
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let solver = CommandSolver::new("sh", &args);
        let result = solver.solve(b"ignored");
        match result {
            Err(SolverError::Exit(status)) => assert_eq!(status.code(), Some(3)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_command_solver_missing_program() {
        let solver = CommandSolver::new("non_existent_solver_program", &[]);
        let result = solver.solve(b"");
        assert!(matches!(result, Err(SolverError::Spawn { .. })));
        assert!(result
            .unwrap_err()
            .to_string()
            .starts_with("Nepodařilo se spustit program non_existent_solver_program"));
    }
}
