#![forbid(unsafe_code)]

//! Replay recorded socket frames through a session and print the transcript.
//!
//! One frame per input line. Display frames land in the output pane; control
//! frames are routed but have no effect without a browser.

use std::env;
use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use webshell_core::logging::LogFormat;
use webshell_session::{MemoryTransport, PageLocation, Session, ShellConfig};

struct Config {
    frames: Option<PathBuf>,
    shell_config: Option<PathBuf>,
    log_format: LogFormat,
}

fn print_usage() {
    eprintln!(
        "Usage: webshell_replay [--config <options.json>] [--log-json] [frames.txt]\n\
         \n\
         Reads frames from stdin when no file is given. Logging follows the\n\
         config's log_filter, then WEBSHELL_LOG, then info."
    );
}

fn parse_args() -> Result<Config, String> {
    let mut args = env::args().skip(1);
    let mut frames: Option<PathBuf> = None;
    let mut shell_config: Option<PathBuf> = None;
    let mut log_format = LogFormat::Text;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "--config requires a value".to_string())?;
                shell_config = Some(PathBuf::from(value));
            }
            "--log-json" => log_format = LogFormat::Json,
            "-h" | "--help" => {
                print_usage();
                std::process::exit(0);
            }
            _ if frames.is_none() => frames = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument {arg}")),
        }
    }

    Ok(Config {
        frames,
        shell_config,
        log_format,
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let cfg = parse_args().inspect_err(|_| {
        print_usage();
    })?;

    let shell_config = match &cfg.shell_config {
        Some(path) => ShellConfig::from_json(&fs::read_to_string(path)?)?,
        None => ShellConfig::default(),
    };
    shell_config.init_logging(cfg.log_format);

    let text = match &cfg.frames {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut session = Session::new(shell_config, PageLocation::new("http:", "localhost", "/"));
    session.connect(|_| Ok(MemoryTransport::new()))?;
    session.on_open();
    for frame in text.lines() {
        // Bad frames are logged by the session and skipped.
        let _ = session.on_message(frame);
    }
    println!("{}", session.transcript());
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("webshell_replay error: {err}");
        std::process::exit(1);
    }
}
