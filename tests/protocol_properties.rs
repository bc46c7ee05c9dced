//! Property tests for command-line tokenising and the command loop
//!
//! Case count follows `PROPTEST_CASES` (default 64).

use dmypy_bridge::{Bridge, Command, DaemonClient, DaemonError, DaemonOutput, Opcode, Request};
use proptest::prelude::*;
use std::cell::Cell;

fn config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(64);
    ProptestConfig::with_cases(cases)
}

/// Token text without colons, so it never contains the separator
fn token() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_./ -]{0,12}"
}

/// Counts calls and always succeeds
#[derive(Default)]
struct CountingClient {
    calls: Cell<usize>,
}

impl DaemonClient for &CountingClient {
    fn invoke(&self, _request: &Request<'_>) -> Result<DaemonOutput, DaemonError> {
        self.calls.set(self.calls.get() + 1);
        Ok(DaemonOutput {
            stdout: "ok\n".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn joined_tokens_split_back(tokens in prop::collection::vec(token(), 1..6)) {
        // Whitespace is only stripped from the ends of the whole line
        let trimmed_ends = {
            let mut t = tokens.clone();
            if let Some(first) = t.first_mut() {
                *first = first.trim_start().to_string();
            }
            if let Some(last) = t.last_mut() {
                *last = last.trim_end().to_string();
            }
            t
        };

        let line = tokens.join("::");
        let command = Command::parse(&line);
        prop_assert_eq!(command.tokens().len(), tokens.len());
        prop_assert_eq!(command.tokens(), trimmed_ends.as_slice());
    }

    #[test]
    fn parse_never_yields_zero_tokens(line in ".{0,40}") {
        let command = Command::parse(&line);
        prop_assert!(!command.tokens().is_empty());
    }

    #[test]
    fn opcodes_are_unique_and_ordered(ops in prop::collection::vec(
        prop::sample::select(vec!["run", "suggest", "inspect", "other"]), 0..8)
    ) {
        let line = std::iter::once("m.py:1:1:1:1").chain(ops.iter().copied()).collect::<Vec<_>>().join("::");
        let found: Vec<Opcode> = Command::parse(&line).opcodes().collect();

        let expected: Vec<Opcode> = Opcode::ALL
            .into_iter()
            .filter(|op| ops.contains(&op.as_str()))
            .collect();
        prop_assert_eq!(found, expected);
    }

    #[test]
    fn lines_without_opcodes_never_call_daemon(tokens in prop::collection::vec(token(), 1..5)) {
        let line = format!("{}\n", tokens.join("::"));
        prop_assume!(Command::parse(&line).opcodes().next().is_none());

        let client = CountingClient::default();
        let bridge = Bridge::new(&client);
        let mut out = Vec::new();
        let mut err = Vec::new();
        bridge.handle_line(&line, &mut out, &mut err).unwrap();

        prop_assert_eq!(client.calls.get(), 0);
        prop_assert!(out.is_empty());
        prop_assert_eq!(String::from_utf8(err).unwrap().lines().count(), 1);
    }
}
