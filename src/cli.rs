// src/cli.rs
use std::{error::Error, fs, path::PathBuf};

use serde_json::Value;

use crate::config::options::AppOptions;
use crate::core::{fsx, hex, net::HttpClient};
use crate::log::{self, LogConfig};
use crate::progress::Progress;
use crate::store::{KeyPath, KeyedJsonDocument, to_pretty_string};

const HELP: &str = "\
Usage: badge_scrape <command> [options]

Commands:
  scrape              Download badge images for every game in the listing
      --source <file>     Saved listing with gamepage-appid links (default: all_url_tbody.txt)
      --out <dir>         Image root (default: images)
      --state <file>      Progress file (default: ./data/state.json)
      --pause-ms <n>      Wait between pages (default: 5000)
      --limit <n>         Stop after n pages
      --resume            Continue where the last run stopped
  get <file> <a/b/c>          Print the value at a key path
  set <file> <a/b/c> <json>   Store a value (plain text if not JSON)
  incr <file> <a/b/c> [step]  Add to an integer value (default step 1)
  pretty <file|json>          Pretty-print JSON
  hex <hex>                   Compact a hex string
  unhex <text>                Expand a compacted hex string
  tail <file> <n>             Print the last n lines of a file

Global:
  --log-dir <dir>     Where lib.log / error.log go (default: ./data)
  --no-debug          Hide debug output
  -V, --version
  -h, --help";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Scrape,
    Get { file: PathBuf, key: KeyPath },
    Set { file: PathBuf, key: KeyPath, value: String },
    Incr { file: PathBuf, key: KeyPath, step: i64 },
    Pretty(String),
    Hex(String),
    Unhex(String),
    Tail { file: PathBuf, lines: usize },
    Version,
    Help,
}

#[derive(Clone, Debug)]
pub struct Params {
    pub command: Command,
    pub options: AppOptions,
}

pub fn parse_args<I>(args: I) -> Result<Params, Box<dyn Error>>
where
    I: IntoIterator<Item = String>,
{
    let mut options = AppOptions::default();
    let mut positional: Vec<String> = Vec::new();

    let mut args = args.into_iter();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--source" => options.scrape.appid_source = PathBuf::from(args.next().ok_or("Missing value for --source")?),
            "--out" => options.scrape.image_dir = PathBuf::from(args.next().ok_or("Missing value for --out")?),
            "--state" => options.scrape.state_file = PathBuf::from(args.next().ok_or("Missing value for --state")?),
            "--pause-ms" => options.scrape.pause_ms = args.next().ok_or("Missing value for --pause-ms")?.parse()?,
            "--limit" => options.scrape.limit = Some(args.next().ok_or("Missing value for --limit")?.parse()?),
            "--resume" => options.scrape.resume = true,
            "--log-dir" => {
                let dir = args.next().ok_or("Missing value for --log-dir")?;
                let debug = options.log.debug;
                options.log = LogConfig { debug, ..LogConfig::in_dir(dir) };
            }
            "--no-debug" => options.log.debug = false,
            "-V" | "--version" => return Ok(Params { command: Command::Version, options }),
            "-h" | "--help" => return Ok(Params { command: Command::Help, options }),
            flag if flag.starts_with("--") => return Err(format!("Unknown arg: {}", flag).into()),
            _ => positional.push(a),
        }
    }

    let command = parse_command(&positional)?;
    Ok(Params { command, options })
}

fn parse_command(words: &[String]) -> Result<Command, Box<dyn Error>> {
    let arg = |i: usize, what: &str| -> Result<String, Box<dyn Error>> {
        words.get(i).cloned().ok_or_else(|| format!("Missing {what}").into())
    };

    let Some(name) = words.first() else {
        return Ok(Command::Help);
    };
    let command = match name.as_str() {
        "scrape" => Command::Scrape,
        "get" => Command::Get {
            file: arg(1, "file")?.into(),
            key: KeyPath::parse_slashed(&arg(2, "key path")?),
        },
        "set" => Command::Set {
            file: arg(1, "file")?.into(),
            key: KeyPath::parse_slashed(&arg(2, "key path")?),
            value: arg(3, "value")?,
        },
        "incr" => Command::Incr {
            file: arg(1, "file")?.into(),
            key: KeyPath::parse_slashed(&arg(2, "key path")?),
            step: match words.get(3) {
                Some(s) => s.parse()?,
                None => 1,
            },
        },
        "pretty" => Command::Pretty(arg(1, "file or JSON text")?),
        "hex" => Command::Hex(arg(1, "hex string")?),
        "unhex" => Command::Unhex(arg(1, "compact string")?),
        "tail" => Command::Tail {
            file: arg(1, "file")?.into(),
            lines: arg(2, "line count")?.parse()?,
        },
        other => return Err(format!("Unknown command: {}", other).into()),
    };
    Ok(command)
}

/// Prints one line per finished game.
struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_done(&mut self, id: u32, name: &str) {
        self.seen += 1;
        println!("[{}/{}] {id} {name}", self.seen, self.total);
    }
    fn item_failed(&mut self, id: u32, reason: &str) {
        self.seen += 1;
        println!("[{}/{}] {id} failed: {reason}", self.seen, self.total);
    }
    fn finish(&mut self) {
        println!("Done.");
    }
}

pub fn run(params: Params) -> Result<(), Box<dyn Error>> {
    let Params { command, options } = params;

    match command {
        Command::Help => {
            println!("{HELP}");
            return Ok(());
        }
        Command::Version => {
            println!("badge_scrape {}", crate::VERSION);
            return Ok(());
        }
        _ => {}
    }

    log::init(options.log.clone());

    match command {
        Command::Scrape => {
            let client = HttpClient::new()?;
            let mut progress = ConsoleProgress { total: 0, seen: 0 };
            let summary = crate::scrape::run(&options.scrape, &client, Some(&mut progress))?;
            println!(
                "{} pages, {} images, {} failed",
                summary.pages,
                summary.images,
                summary.failed.len()
            );
        }
        Command::Get { file, key } => {
            let doc = KeyedJsonDocument::new(key, Value::Null, &file);
            if doc.load_failed() {
                return Err(format!("Could not read {}", file.display()).into());
            }
            println!("{}", to_pretty_string(doc.get())?);
        }
        Command::Set { file, key, value } => {
            let value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let mut doc = KeyedJsonDocument::new(key, Value::Null, &file);
            if !doc.set(value, true) {
                return Err(format!("Could not save {} (see error log)", file.display()).into());
            }
        }
        Command::Incr { file, key, step } => {
            let mut doc = KeyedJsonDocument::new(key, 0, &file);
            if !doc.increment(true, step) {
                return Err(format!("Could not save {} (see error log)", file.display()).into());
            }
            println!("{}", doc.get());
        }
        Command::Pretty(arg) => {
            let text = match fs::read_to_string(&arg) {
                Ok(t) => t,
                Err(_) => arg,
            };
            KeyedJsonDocument::dumps(&Value::String(text)).ok_or("Input is not valid JSON")?;
        }
        Command::Hex(s) => println!("{}", hex::compress_hex(&s)?),
        Command::Unhex(s) => println!("{}", hex::expand_hex(&s)?),
        Command::Tail { file, lines } => {
            for line in fsx::read_tail(&file, lines)? {
                print!("{line}");
            }
        }
        Command::Help | Command::Version => {}
    }
    Ok(())
}
