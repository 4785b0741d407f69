//! Line-oriented driver for the catalog endpoint.
//!
//! Reads one JSON request per stdin line and writes one JSON response per
//! stdout line. Configuration comes from `CATALOG_*` environment variables.

use catalog_rpc::{CatalogRpc, RpcConfig};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    if std::env::args().skip(1).any(|arg| arg == "--version") {
        println!("catalog_core version={}", catalog_core::core_version());
        return ExitCode::SUCCESS;
    }

    let config = RpcConfig::from_env();
    if let Err(err) = config.init_logging() {
        eprintln!("catalog: logging init failed: {err}");
        return ExitCode::FAILURE;
    }

    let rpc = match CatalogRpc::open(&config) {
        Ok(rpc) => rpc,
        Err(err) => {
            eprintln!(
                "catalog: failed to open store `{}`: {err}",
                config.db_path.display()
            );
            return ExitCode::FAILURE;
        }
    };
    info!("event=serve module=cli status=start");

    let served = serve(&rpc, io::stdin().lock(), io::stdout().lock());
    let closed = rpc.close();

    match (served, closed) {
        (Ok(count), Ok(())) => {
            info!("event=serve module=cli status=ok requests={count}");
            ExitCode::SUCCESS
        }
        (Err(err), _) => {
            error!("event=serve module=cli status=error error={err}");
            eprintln!("catalog: i/o error: {err}");
            ExitCode::FAILURE
        }
        (Ok(_), Err(err)) => {
            eprintln!("catalog: failed to close store: {err}");
            ExitCode::FAILURE
        }
    }
}

fn serve(rpc: &CatalogRpc, input: impl BufRead, mut output: impl Write) -> io::Result<u64> {
    let mut count = 0;
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        writeln!(output, "{}", rpc.handle_json(&line))?;
        output.flush()?;
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::serve;
    use catalog_rpc::CatalogRpc;

    #[test]
    fn serve_answers_each_non_blank_line() {
        let rpc = CatalogRpc::open_in_memory().unwrap();
        let input = concat!(
            r#"{"cmd":"create_product","name":"Widget","price":"10"}"#,
            "\n\n",
            r#"{"cmd":"find_one_product","id":1}"#,
            "\n",
            r#"{"cmd":"find_one_product","id":2}"#,
            "\n",
        );
        let mut output = Vec::new();

        let count = serve(&rpc, input.as_bytes(), &mut output).unwrap();
        assert_eq!(count, 3);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with(r#"{"ok":true"#));
        assert!(lines[1].contains(r#""name":"Widget""#));
        assert!(lines[2].contains(r#""kind":"not_found""#));
    }
}
