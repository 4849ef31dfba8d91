//! Interactive shell for editing and exchanging an APDU command
//!
//! Drives the exchange model against a scripted mock session, so it runs
//! without a reader. Responses can be queued from the shell before sending.

use std::io::{self, BufRead, Write};

use cardlab_apdu_core::{Bytes, MockSession, Response, hex};
use cardlab_apdu_exchange::{ExchangeEvent, ExchangeModel};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let session = MockSession::with_response(Response::new(
        (0x90, 0x00),
        Bytes::from_static(&[0x85, 0x10, 0x04, 0x00]),
    ));
    let mut model = ExchangeModel::new(session);

    model.subscribe(|event| {
        if let ExchangeEvent::TransmitReady(ready) = event {
            tracing::debug!(ready, "readiness recomputed");
        }
    });

    println!("APDU exchange shell - 'help' for assistance, 'show' for the current command");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = match lines.next() {
            Some(Ok(input)) => input,
            _ => break,
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        match verb.to_lowercase().as_str() {
            "exit" | "quit" | "q" => break,

            "help" | "?" => {
                println!("Commands:");
                println!("  cla|ins|p1|p2 <hex>  - set a header field (2 hex digits)");
                println!("  le <dec>             - set the expected length (decimal 0-255)");
                println!("  data <hex>           - set the data payload (even-length hex)");
                println!("  show                 - print the current command and readiness");
                println!("  queue <hex>          - queue a mock response (SW1 SW2 then data)");
                println!("  connect|disconnect   - flip the mock session state");
                println!("  send                 - transmit the current command");
                println!("  help                 - show this help");
                println!("  exit                 - exit the shell");
            }

            "cla" => model.set_class_text(rest),
            "ins" => model.set_ins_text(rest),
            "p1" => model.set_p1_text(rest),
            "p2" => model.set_p2_text(rest),
            "le" => model.set_le_text(rest),
            "data" => model.set_data_text(rest),

            "show" => {
                println!(
                    "  CLA={} INS={} P1={} P2={} Le={} Data={}",
                    model.class_text(),
                    model.ins_text(),
                    model.p1_text(),
                    model.p2_text(),
                    model.le_text(),
                    model.data_text()
                );
                println!("  wire: {}", hex::buffer_to_hex(&model.command().to_bytes()));
                println!("  ready: {}", model.transmit_ready());
            }

            "queue" => match hex::hex_to_buffer(rest) {
                Ok(raw) => match Response::from_bytes(&raw) {
                    Ok(response) => {
                        model.session_mut().responses.push(response);
                        println!("Queued.");
                    }
                    Err(e) => println!("Invalid response: {e}"),
                },
                Err(e) => println!("Invalid hex input: {e}"),
            },

            "connect" => model.session_mut().set_connected(true),
            "disconnect" => model.session_mut().set_connected(false),

            "send" => {
                if !model.transmit_ready() {
                    println!("Not ready: fix the command fields or connect the session");
                    continue;
                }
                match model.transmit() {
                    Ok(()) => {
                        println!("  SW: {} {}", model.sw1_text(), model.sw2_text());
                        if let Some(response) = model.response() {
                            println!("  ({})", response.status().description());
                        }
                        if !model.response_data_text().is_empty() {
                            println!("  Data: {}", model.response_data_text());
                        }
                    }
                    Err(e) => println!("Transmit failed: {e}"),
                }
            }

            _ => println!("Unknown command '{verb}', try 'help'"),
        }
    }

    println!("Goodbye!");
    Ok(())
}
